use std::collections::HashMap;

use tracing::{info, instrument};

use crate::core::models::record::{AffinityRecord, ResultRecord};
use crate::engine::report::{ReportEvent, RunReport};

/// Plausibility band for a best affinity, exclusive on both ends. Values
/// outside it are parsing artifacts or non-physical outliers.
pub const PLAUSIBLE_MIN: f64 = -20.0;
pub const PLAUSIBLE_MAX: f64 = 0.0;

/// Reduces per-pocket results to one row per (protein, ligand): the minimum
/// (most negative) affinity across that ligand's pockets. Records without
/// an affinity are skipped. Best rows outside the plausibility band are
/// excluded from the output but reported, never silently dropped.
///
/// Output order is first appearance of each (protein, ligand) pair in the
/// input, which keeps downstream tables stable across re-runs.
#[instrument(skip_all, name = "aggregation_task")]
pub fn run(records: &[ResultRecord], report: &mut RunReport) -> Vec<AffinityRecord> {
    let mut order: Vec<(String, String)> = Vec::new();
    let mut best: HashMap<(String, String), f64> = HashMap::new();

    for record in records {
        let Some(affinity) = record.affinity else {
            continue;
        };
        let key = (record.protein.clone(), record.ligand.clone());
        match best.get_mut(&key) {
            Some(current) => *current = current.min(affinity),
            None => {
                order.push(key.clone());
                best.insert(key, affinity);
            }
        }
    }

    let mut kept = Vec::with_capacity(order.len());
    for (protein, ligand) in order {
        let affinity = best[&(protein.clone(), ligand.clone())];
        if PLAUSIBLE_MIN < affinity && affinity < PLAUSIBLE_MAX {
            kept.push(AffinityRecord {
                protein,
                ligand,
                affinity,
            });
        } else {
            report.push(ReportEvent::OutOfBandAffinity {
                protein,
                ligand,
                affinity,
            });
        }
    }

    info!(
        num_records = records.len(),
        num_ligands = kept.len(),
        outliers = report.outliers(),
        "Aggregation complete."
    );

    kept
}
