//! # SIEVE++ Core Library
//!
//! A modernized, high-performance library for structure-based virtual screening,
//! covering pocket extraction, docking-job orchestration, and ligand-efficiency
//! ranking around an external docking engine.
//!
//! ## Architectural Philosophy
//!
//! The library is designed with a strict three-layer architecture to ensure a clear
//! separation of concerns, making it modular, testable, and extensible.
//!
//! - **[`core`]: The Foundation.** Contains stateless data models (`Pocket`,
//!   `DockingJob`, result records), parsers and writers for the external text
//!   formats the campaign exchanges with its collaborators, and pure utilities
//!   such as identifier normalization.
//!
//! - **[`engine`]: The Logic Core.** This layer hosts the pipeline tasks
//!   (pocket extraction, centroid computation, job-matrix construction, docking
//!   dispatch, log collection, aggregation, descriptor joining, efficiency
//!   scoring, and permeability classification) together with configuration,
//!   error taxonomy, progress reporting, and the per-run report accumulator.
//!
//! - **[`workflows`]: The Public API.** The highest-level, user-facing layer. It
//!   ties the `engine` tasks together into the complete per-protein screening
//!   workflow and is the intended entry point for end-users of the library.

pub mod core;
pub mod engine;
pub mod workflows;
