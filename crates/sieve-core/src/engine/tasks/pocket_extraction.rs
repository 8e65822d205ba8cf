use tracing::{info, instrument};

use crate::core::models::pocket::{Pocket, ResidueScore};

/// Groups the score stream into pockets: maximal runs of entries whose score
/// is strictly above `threshold` and whose residue ids increase by exactly 1
/// in input order.
///
/// A sub-threshold score or a contiguity break closes the current run; the
/// end of the stream closes any open run. A single qualifying residue is a
/// valid one-residue pocket. Ids are assigned 1-based in closing order.
#[instrument(skip_all, name = "pocket_extraction_task")]
pub fn run(records: &[ResidueScore], threshold: f64) -> Vec<Pocket> {
    let mut pockets: Vec<Pocket> = Vec::new();
    let mut current: Vec<i64> = Vec::new();

    let mut close = |current: &mut Vec<i64>, pockets: &mut Vec<Pocket>| {
        if !current.is_empty() {
            let id = pockets.len() + 1;
            pockets.push(Pocket::new(id, std::mem::take(current)));
        }
    };

    for record in records {
        if record.score > threshold {
            match current.last() {
                Some(&last) if record.residue_id == last + 1 => {
                    current.push(record.residue_id);
                }
                Some(_) => {
                    close(&mut current, &mut pockets);
                    current.push(record.residue_id);
                }
                None => current.push(record.residue_id),
            }
        } else {
            close(&mut current, &mut pockets);
        }
    }
    close(&mut current, &mut pockets);

    info!(
        num_pockets = pockets.len(),
        threshold, "Pocket extraction complete."
    );

    pockets
}
