//! Pure, stateless helpers shared across the core layers.

pub mod keys;
