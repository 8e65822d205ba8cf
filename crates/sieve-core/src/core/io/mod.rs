//! Readers and writers for the external file formats the pipeline touches.
//!
//! Inputs: the per-residue pocket score stream, PDB-style receptor
//! structures, docking engine logs, and the auxiliary descriptor table.
//! Outputs: docking engine configuration files and the per-protein result
//! tables. Each format lives in its own module with its own error type.

pub mod descriptors;
pub mod pdb;
pub mod pocket_scores;
pub mod tables;
pub mod vina;
