//! # Core Module
//!
//! This module provides the fundamental building blocks for the SIEVE++ screening
//! pipeline, serving as the stateless foundation of the library.
//!
//! ## Overview
//!
//! The core module implements the data structures and file-format handling the
//! campaign needs to talk to its external collaborators: the pocket-scoring tool,
//! the receptor structure, the docking engine, and the physicochemical descriptor
//! table. Everything here is pure: no subprocesses, no pipeline state.
//!
//! ## Architecture
//!
//! - **Data Models** ([`models`]) - Pockets, docking jobs, result and efficiency records
//! - **File I/O** ([`io`]) - Score streams, structural records, engine configs/logs, tables
//! - **Utilities** ([`utils`]) - Identifier normalization for the descriptor join

pub mod io;
pub mod models;
pub mod utils;
