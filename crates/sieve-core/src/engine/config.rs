use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_SCORE_THRESHOLD: f64 = 0.1;
pub const DEFAULT_REFERENCE_ATOM: &str = "CA";
pub const DEFAULT_BOX_EDGE: f64 = 20.0;
pub const DEFAULT_NUM_MODES: u32 = 9;
pub const DEFAULT_EXHAUSTIVENESS: u32 = 8;
pub const DEFAULT_ENERGY_RANGE: f64 = 3.0;
pub const DEFAULT_WORKERS: usize = 4;
pub const DEFAULT_TIMEOUT_SECS: u64 = 600;
pub const DEFAULT_TOP_N: usize = 30;
pub const DEFAULT_ENGINE: &str = "vina";

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid value for {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

/// Root of the campaign workspace and the fixed directory layout under it.
///
/// Every path the pipeline reads or writes is derived from here, so tests
/// can point the whole run at a temporary directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceConfig {
    pub root: PathBuf,
}

impl WorkspaceConfig {
    pub fn receptors_dir(&self) -> PathBuf {
        self.root.join("receptors")
    }

    pub fn receptor_path(&self, protein: &str) -> PathBuf {
        self.receptors_dir().join(format!("{protein}.pdbqt"))
    }

    pub fn scores_path(&self, protein: &str) -> PathBuf {
        self.root.join("pocket_scores").join(format!("{protein}.txt"))
    }

    pub fn ligands_dir(&self, protein: &str) -> PathBuf {
        self.root.join("ligands").join(protein)
    }

    pub fn docking_dir(&self, protein: &str) -> PathBuf {
        self.root.join("docking").join(protein)
    }

    pub fn configs_dir(&self, protein: &str) -> PathBuf {
        self.docking_dir(protein).join("configs")
    }

    pub fn poses_dir(&self, protein: &str) -> PathBuf {
        self.docking_dir(protein).join("poses")
    }

    pub fn logs_dir(&self, protein: &str) -> PathBuf {
        self.docking_dir(protein).join("logs")
    }

    pub fn results_dir(&self) -> PathBuf {
        self.root.join("results")
    }

    pub fn report_path(&self) -> PathBuf {
        self.results_dir().join("report.txt")
    }
}

/// Pocket extraction and centroid parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct PocketConfig {
    /// Scores strictly above this open a pocket run.
    pub score_threshold: f64,
    /// Atom name whose coordinates define the centroid.
    pub reference_atom: String,
}

/// Docking engine invocation parameters, shared by every job.
#[derive(Debug, Clone, PartialEq)]
pub struct DockingConfig {
    /// Engine binary, resolved through `PATH` when not absolute.
    pub engine: PathBuf,
    /// Search-box edge lengths.
    pub box_size: [f64; 3],
    pub num_modes: u32,
    pub exhaustiveness: u32,
    pub energy_range: f64,
    /// Concurrent engine invocations.
    pub workers: usize,
    /// Wall-clock bound per invocation; a job past it is killed and
    /// recorded as timed out.
    pub timeout: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankingConfig {
    /// Rows in the ranked table.
    pub top_n: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScreenConfig {
    pub workspace: WorkspaceConfig,
    pub pockets: PocketConfig,
    pub docking: DockingConfig,
    pub ranking: RankingConfig,
    /// Auxiliary descriptor table; `None` skips the descriptor join.
    pub descriptor_table: Option<PathBuf>,
}

#[derive(Default)]
pub struct ScreenConfigBuilder {
    workspace_root: Option<PathBuf>,
    score_threshold: Option<f64>,
    reference_atom: Option<String>,
    engine: Option<PathBuf>,
    box_size: Option<[f64; 3]>,
    num_modes: Option<u32>,
    exhaustiveness: Option<u32>,
    energy_range: Option<f64>,
    workers: Option<usize>,
    timeout: Option<Duration>,
    top_n: Option<usize>,
    descriptor_table: Option<PathBuf>,
}

impl ScreenConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn workspace_root(mut self, path: PathBuf) -> Self {
        self.workspace_root = Some(path);
        self
    }
    pub fn score_threshold(mut self, threshold: f64) -> Self {
        self.score_threshold = Some(threshold);
        self
    }
    pub fn reference_atom(mut self, atom: impl Into<String>) -> Self {
        self.reference_atom = Some(atom.into());
        self
    }
    pub fn engine(mut self, path: PathBuf) -> Self {
        self.engine = Some(path);
        self
    }
    pub fn box_size(mut self, size: [f64; 3]) -> Self {
        self.box_size = Some(size);
        self
    }
    pub fn num_modes(mut self, n: u32) -> Self {
        self.num_modes = Some(n);
        self
    }
    pub fn exhaustiveness(mut self, n: u32) -> Self {
        self.exhaustiveness = Some(n);
        self
    }
    pub fn energy_range(mut self, range: f64) -> Self {
        self.energy_range = Some(range);
        self
    }
    pub fn workers(mut self, n: usize) -> Self {
        self.workers = Some(n);
        self
    }
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
    pub fn top_n(mut self, n: usize) -> Self {
        self.top_n = Some(n);
        self
    }
    pub fn descriptor_table(mut self, path: PathBuf) -> Self {
        self.descriptor_table = Some(path);
        self
    }

    pub fn build(self) -> Result<ScreenConfig, ConfigError> {
        let workspace = WorkspaceConfig {
            root: self
                .workspace_root
                .ok_or(ConfigError::MissingParameter("workspace_root"))?,
        };

        let score_threshold = self.score_threshold.unwrap_or(DEFAULT_SCORE_THRESHOLD);
        if !score_threshold.is_finite() {
            return Err(ConfigError::InvalidParameter {
                name: "score_threshold",
                reason: "must be finite".into(),
            });
        }

        let reference_atom = self
            .reference_atom
            .unwrap_or_else(|| DEFAULT_REFERENCE_ATOM.to_string());
        if reference_atom.trim().is_empty() {
            return Err(ConfigError::InvalidParameter {
                name: "reference_atom",
                reason: "must not be empty".into(),
            });
        }

        let box_size = self
            .box_size
            .unwrap_or([DEFAULT_BOX_EDGE, DEFAULT_BOX_EDGE, DEFAULT_BOX_EDGE]);
        if box_size.iter().any(|edge| !edge.is_finite() || *edge <= 0.0) {
            return Err(ConfigError::InvalidParameter {
                name: "box_size",
                reason: format!("edges must be positive, got {:?}", box_size),
            });
        }

        let workers = self.workers.unwrap_or(DEFAULT_WORKERS);
        if workers == 0 {
            return Err(ConfigError::InvalidParameter {
                name: "workers",
                reason: "must be at least 1".into(),
            });
        }

        let timeout = self
            .timeout
            .unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        if timeout.is_zero() {
            return Err(ConfigError::InvalidParameter {
                name: "timeout",
                reason: "must be non-zero".into(),
            });
        }

        let top_n = self.top_n.unwrap_or(DEFAULT_TOP_N);
        if top_n == 0 {
            return Err(ConfigError::InvalidParameter {
                name: "top_n",
                reason: "must be at least 1".into(),
            });
        }

        Ok(ScreenConfig {
            workspace,
            pockets: PocketConfig {
                score_threshold,
                reference_atom,
            },
            docking: DockingConfig {
                engine: self.engine.unwrap_or_else(|| PathBuf::from(DEFAULT_ENGINE)),
                box_size,
                num_modes: self.num_modes.unwrap_or(DEFAULT_NUM_MODES),
                exhaustiveness: self.exhaustiveness.unwrap_or(DEFAULT_EXHAUSTIVENESS),
                energy_range: self.energy_range.unwrap_or(DEFAULT_ENERGY_RANGE),
                workers,
                timeout,
            },
            ranking: RankingConfig { top_n },
            descriptor_table: self.descriptor_table,
        })
    }
}

impl ScreenConfig {
    /// Convenience constructor for the all-defaults configuration rooted at
    /// `workspace`.
    pub fn with_workspace(workspace: impl AsRef<Path>) -> Result<Self, ConfigError> {
        ScreenConfigBuilder::new()
            .workspace_root(workspace.as_ref().to_path_buf())
            .build()
    }
}
