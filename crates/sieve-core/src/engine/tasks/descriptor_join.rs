use tracing::{info, instrument};

use crate::core::models::descriptor::{DescriptorRow, DescriptorTable};
use crate::core::models::record::AffinityRecord;
use crate::engine::report::{ReportEvent, RunReport};

/// A best-affinity row with its descriptor lookup resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinedRecord {
    pub record: AffinityRecord,
    /// Absent when the ligand is missing from the descriptor table or no
    /// table was supplied.
    pub descriptors: Option<DescriptorRow>,
}

/// Left-joins best-affinity rows against the descriptor table over the
/// normalized ligand key. Ligands absent from the table keep absent
/// descriptor fields rather than being dropped; each miss is reported.
/// With no table at all, every row passes through unjoined and nothing is
/// reported.
#[instrument(skip_all, name = "descriptor_join_task")]
pub fn run(
    affinities: Vec<AffinityRecord>,
    table: Option<&DescriptorTable>,
    report: &mut RunReport,
) -> Vec<JoinedRecord> {
    let joined: Vec<JoinedRecord> = affinities
        .into_iter()
        .map(|record| {
            let descriptors = match table {
                Some(table) => {
                    let hit = table.lookup(&record.ligand).cloned();
                    if hit.is_none() {
                        report.push(ReportEvent::DescriptorMiss {
                            protein: record.protein.clone(),
                            ligand: record.ligand.clone(),
                        });
                    }
                    hit
                }
                None => None,
            };
            JoinedRecord {
                record,
                descriptors,
            }
        })
        .collect();

    info!(
        num_rows = joined.len(),
        misses = report.descriptor_misses(),
        joined_table = table.is_some(),
        "Descriptor join complete."
    );

    joined
}
