use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::core::io::descriptors::DescriptorError;
use crate::core::io::pdb::PdbError;
use crate::engine::config::ConfigError;

/// Fatal conditions for one unit of work.
///
/// Every variant aborts exactly one protein run; the campaign loop reports
/// it and moves on to the next protein. Recoverable conditions
/// (failed jobs, unparsable logs, outliers) never appear here; they are
/// accumulated in the run report instead.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("I/O error at '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("receptor structure for '{protein}' not found at '{path}'")]
    MissingReceptor { protein: String, path: PathBuf },

    #[error("pocket score stream for '{protein}' not found at '{path}'")]
    MissingScoreStream { protein: String, path: PathBuf },

    #[error("no ligand structures for '{protein}' in '{path}'")]
    EmptyLigandSet { protein: String, path: PathBuf },

    #[error("no pockets above the score threshold for '{protein}'")]
    EmptyPocketList { protein: String },

    #[error("no docking results collected for '{protein}'")]
    EmptyResultSet { protein: String },

    #[error("failed to parse receptor structure '{path}': {source}")]
    ReceptorParse {
        path: PathBuf,
        #[source]
        source: PdbError,
    },

    #[error("failed to read descriptor table '{path}': {source}")]
    DescriptorTable {
        path: PathBuf,
        #[source]
        source: DescriptorError,
    },

    #[error("failed to write result table '{path}': {source}")]
    TableWrite {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

impl EngineError {
    /// Attaches the offending path to a raw I/O error.
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        EngineError::Io {
            path: path.into(),
            source,
        }
    }
}
