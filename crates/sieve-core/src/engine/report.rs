//! Run-level failure and warning accounting.
//!
//! Recoverable conditions never abort a protein run; they are pushed here as
//! events and written to the append-only report file when the run finishes.
//! Every event carries enough identity (protein, ligand, pocket) to re-run
//! just the affected job by hand.

use std::fmt;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;
use std::time::Duration;

/// Why a docking invocation produced no usable result.
#[derive(Debug, Clone, PartialEq)]
pub enum FailureKind {
    /// The engine process could not be started at all.
    Spawn { message: String },
    /// The engine exited with a non-zero status (`None` means killed by a
    /// signal).
    NonZeroExit { code: Option<i32> },
    /// The invocation outlived its wall-clock bound and was killed.
    TimedOut { limit: Duration },
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::Spawn { message } => write!(f, "spawn failed: {}", message),
            FailureKind::NonZeroExit { code: Some(code) } => write!(f, "exit status {}", code),
            FailureKind::NonZeroExit { code: None } => write!(f, "killed by signal"),
            FailureKind::TimedOut { limit } => {
                write!(f, "timed out after {}s", limit.as_secs())
            }
        }
    }
}

/// One recoverable condition observed during a protein run.
#[derive(Debug, Clone, PartialEq)]
pub enum ReportEvent {
    JobFailed {
        protein: String,
        ligand: String,
        pocket: String,
        kind: FailureKind,
    },
    DegradedCentroid {
        protein: String,
        pocket: String,
    },
    MalformedScoreLines {
        protein: String,
        count: usize,
    },
    AmbiguousLogName {
        stem: String,
    },
    UnparsableLogName {
        stem: String,
    },
    MissingAffinity {
        protein: String,
        ligand: String,
        pocket: Option<String>,
    },
    OutOfBandAffinity {
        protein: String,
        ligand: String,
        affinity: f64,
    },
    DescriptorMiss {
        protein: String,
        ligand: String,
    },
}

impl fmt::Display for ReportEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportEvent::JobFailed {
                protein,
                ligand,
                pocket,
                kind,
            } => write!(
                f,
                "[job-failed] protein={} ligand={} pocket={} reason={}",
                protein, ligand, pocket, kind
            ),
            ReportEvent::DegradedCentroid { protein, pocket } => write!(
                f,
                "[degraded-centroid] protein={} pocket={} center defaulted to origin",
                protein, pocket
            ),
            ReportEvent::MalformedScoreLines { protein, count } => write!(
                f,
                "[malformed-score-lines] protein={} count={}",
                protein, count
            ),
            ReportEvent::AmbiguousLogName { stem } => write!(
                f,
                "[ambiguous-log-name] stem={} (positional decode of >3 tokens)",
                stem
            ),
            ReportEvent::UnparsableLogName { stem } => {
                write!(f, "[unparsable-log-name] stem={}", stem)
            }
            ReportEvent::MissingAffinity {
                protein,
                ligand,
                pocket,
            } => write!(
                f,
                "[no-rank1-row] protein={} ligand={} pocket={}",
                protein,
                ligand,
                pocket.as_deref().unwrap_or("-")
            ),
            ReportEvent::OutOfBandAffinity {
                protein,
                ligand,
                affinity,
            } => write!(
                f,
                "[outlier-affinity] protein={} ligand={} affinity={}",
                protein, ligand, affinity
            ),
            ReportEvent::DescriptorMiss { protein, ligand } => {
                write!(f, "[descriptor-miss] protein={} ligand={}", protein, ligand)
            }
        }
    }
}

/// Append-only accumulator for one protein run.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    events: Vec<ReportEvent>,
}

impl RunReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: ReportEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[ReportEvent] {
        &self.events
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn failed_jobs(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, ReportEvent::JobFailed { .. }))
            .count()
    }

    pub fn timed_out_jobs(&self) -> usize {
        self.events
            .iter()
            .filter(|e| {
                matches!(
                    e,
                    ReportEvent::JobFailed {
                        kind: FailureKind::TimedOut { .. },
                        ..
                    }
                )
            })
            .count()
    }

    pub fn degraded_centroids(&self) -> usize {
        self.count(|e| matches!(e, ReportEvent::DegradedCentroid { .. }))
    }

    pub fn missing_affinities(&self) -> usize {
        self.count(|e| matches!(e, ReportEvent::MissingAffinity { .. }))
    }

    pub fn outliers(&self) -> usize {
        self.count(|e| matches!(e, ReportEvent::OutOfBandAffinity { .. }))
    }

    pub fn descriptor_misses(&self) -> usize {
        self.count(|e| matches!(e, ReportEvent::DescriptorMiss { .. }))
    }

    fn count(&self, predicate: impl Fn(&ReportEvent) -> bool) -> usize {
        self.events.iter().filter(|e| predicate(e)).count()
    }
}

/// Completion counters for one protein, printed at the end of its run and
/// appended to the report file.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScreenSummary {
    pub protein: String,
    pub pockets: usize,
    pub degraded_centroids: usize,
    pub jobs_total: usize,
    pub jobs_failed: usize,
    pub jobs_timed_out: usize,
    pub logs_parsed: usize,
    pub missing_affinities: usize,
    pub outliers_excluded: usize,
    pub descriptor_misses: usize,
    pub scored_ligands: usize,
    pub ranked_rows: usize,
}

impl fmt::Display for ScreenSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: pockets={} (degraded={}) jobs={} failed={} (timed_out={}) \
             logs={} no_affinity={} outliers={} descriptor_misses={} scored={} ranked={}",
            self.protein,
            self.pockets,
            self.degraded_centroids,
            self.jobs_total,
            self.jobs_failed,
            self.jobs_timed_out,
            self.logs_parsed,
            self.missing_affinities,
            self.outliers_excluded,
            self.descriptor_misses,
            self.scored_ligands,
            self.ranked_rows,
        )
    }
}

/// Appends one protein's section to the report file: a header, every event
/// line, and the summary line.
pub fn append_section(
    path: &Path,
    summary: &ScreenSummary,
    report: &RunReport,
) -> io::Result<()> {
    let mut file = open_for_append(path)?;
    writeln!(file, "## {}", summary.protein)?;
    for event in report.events() {
        writeln!(file, "{}", event)?;
    }
    writeln!(file, "{}", summary)?;
    writeln!(file)?;
    Ok(())
}

/// Appends a section for a protein whose run aborted before producing any
/// tables, so the report still accounts for every protein attempted.
pub fn append_failure(path: &Path, protein: &str, reason: &str) -> io::Result<()> {
    let mut file = open_for_append(path)?;
    writeln!(file, "## {}", protein)?;
    writeln!(file, "[run-failed] {}", reason)?;
    writeln!(file)?;
    Ok(())
}

fn open_for_append(path: &Path) -> io::Result<std::fs::File> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}
