//! Pipeline stage implementations.
//!
//! Each submodule is one stage of the screening pipeline: pocket extraction,
//! centroid computation, job-matrix materialization, docking, log
//! collection, aggregation, descriptor joining, efficiency scoring, and
//! permeability classification. Stages are plain functions over explicit
//! inputs so the `workflows` layer can compose them and tests can call them
//! in isolation.

pub mod aggregation;
pub mod centroid;
pub mod collection;
pub mod descriptor_join;
pub mod docking;
pub mod efficiency;
pub mod job_matrix;
pub mod permeability;
pub mod pocket_extraction;
