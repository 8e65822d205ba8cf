use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument, warn};

use crate::core::io::vina;
use crate::core::models::record::ResultRecord;
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::report::{ReportEvent, RunReport};

/// Sweeps a log directory and turns every `.log` file into a result record.
///
/// Filenames are decoded through the two naming conventions; stems the
/// conventions cannot identify (no ligand token, or an empty protein) are
/// reported and skipped, ambiguous positional decodes are reported but
/// kept. A log without a rank-1 row keeps its record with an absent
/// affinity so the affinity table stays auditable. Files are visited in
/// sorted path order, so repeated sweeps produce identical record lists.
#[instrument(skip_all, name = "collection_task", fields(protein = %protein))]
pub fn run(
    protein: &str,
    logs_dir: &Path,
    report: &mut RunReport,
    reporter: &ProgressReporter,
) -> Result<Vec<ResultRecord>, EngineError> {
    let entries = fs::read_dir(logs_dir).map_err(|e| EngineError::io(logs_dir, e))?;
    let mut paths: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().is_some_and(|ext| ext == "log"))
        .collect();
    paths.sort();

    if !paths.is_empty() {
        reporter.report(Progress::BatchStart {
            total_steps: paths.len() as u64,
        });
    }

    let mut records = Vec::with_capacity(paths.len());
    for path in &paths {
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        let identity = vina::parse_log_stem(&stem);
        if identity.ambiguous {
            warn!(stem = %stem, "Ambiguous log name; positional decode kept.");
            report.push(ReportEvent::AmbiguousLogName { stem: stem.clone() });
        }

        let Some(ligand) = identity.ligand.clone() else {
            warn!(stem = %stem, "Log name does not identify a ligand; skipped.");
            report.push(ReportEvent::UnparsableLogName { stem });
            reporter.report(Progress::BatchIncrement);
            continue;
        };
        if identity.protein.is_empty() {
            warn!(stem = %stem, "Log name does not identify a protein; skipped.");
            report.push(ReportEvent::UnparsableLogName { stem });
            reporter.report(Progress::BatchIncrement);
            continue;
        }

        let file = File::open(path).map_err(|e| EngineError::io(path.clone(), e))?;
        let affinity = vina::scan_affinity(&mut BufReader::new(file))
            .map_err(|e| EngineError::io(path.clone(), e))?;

        if affinity.is_none() {
            debug!(stem = %stem, "No rank-1 row in log.");
            report.push(ReportEvent::MissingAffinity {
                protein: identity.protein.clone(),
                ligand: ligand.clone(),
                pocket: identity.pocket.clone(),
            });
        }

        records.push(ResultRecord {
            protein: identity.protein,
            ligand,
            pocket: identity.pocket,
            affinity,
        });
        reporter.report(Progress::BatchIncrement);
    }

    if !paths.is_empty() {
        reporter.report(Progress::BatchFinish);
    }

    info!(
        num_logs = paths.len(),
        num_records = records.len(),
        "Log collection complete."
    );

    Ok(records)
}
