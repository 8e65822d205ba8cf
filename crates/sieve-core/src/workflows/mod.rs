//! High-level entry points that compose engine tasks into complete runs.
//!
//! `screen` drives the full per-protein pipeline from score stream to
//! ranked table, and also exposes the collection-onward half for re-scoring
//! existing docking logs without re-running the engine.

pub mod screen;
