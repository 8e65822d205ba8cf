//! Provides the stateless data models of the screening pipeline.
//!
//! This module contains the value types that flow through the pipeline stages:
//! per-residue pocket-likelihood scores and the pockets grouped from them,
//! docking jobs and their on-disk artifacts, per-log parse results, aggregated
//! affinities, and the final efficiency records. All types are plain values
//! with no shared mutable state across protein runs.

pub mod descriptor;
pub mod job;
pub mod pocket;
pub mod record;
