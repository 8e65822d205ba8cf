/// Pipeline stages, in execution order, as reported to progress callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Pockets,
    Centroids,
    JobMatrix,
    Docking,
    Collection,
    Aggregation,
    DescriptorJoin,
    Efficiency,
    Permeability,
    Tables,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Pockets => "Extracting pockets",
            Stage::Centroids => "Computing centroids",
            Stage::JobMatrix => "Building job matrix",
            Stage::Docking => "Docking",
            Stage::Collection => "Collecting logs",
            Stage::Aggregation => "Aggregating affinities",
            Stage::DescriptorJoin => "Joining descriptors",
            Stage::Efficiency => "Scoring efficiency",
            Stage::Permeability => "Classifying permeability",
            Stage::Tables => "Writing tables",
        }
    }
}

#[derive(Debug, Clone)]
pub enum Progress {
    StageStart { stage: Stage },
    StageFinish,

    /// A counted batch within the current stage (one unit per docking job
    /// or per log file).
    BatchStart { total_steps: u64 },
    BatchIncrement,
    BatchFinish,

    Message(String),
}

pub type ProgressCallback<'a> = Box<dyn Fn(Progress) + Send + Sync + 'a>;

/// Forwards progress events to an optional callback. Tasks report through
/// this unconditionally; a reporter without a callback is free.
#[derive(Default)]
pub struct ProgressReporter<'a> {
    callback: Option<ProgressCallback<'a>>,
}

impl<'a> ProgressReporter<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_callback(callback: ProgressCallback<'a>) -> Self {
        Self {
            callback: Some(callback),
        }
    }

    #[inline]
    pub fn report(&self, event: Progress) {
        if let Some(cb) = &self.callback {
            cb(event);
        }
    }
}
