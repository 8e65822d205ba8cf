use tracing::{info, instrument};

use crate::core::models::record::EfficiencyRecord;

/// TPSA ceiling for high intestinal absorption.
pub const TPSA_HIA_MAX: f64 = 131.6;
/// TPSA ceiling for blood-brain-barrier permeation.
pub const TPSA_BBB_MAX: f64 = 90.0;
/// Lipophilicity window shared by both rules, inclusive.
pub const LOGP_MIN: f64 = -0.7;
pub const LOGP_MAX: f64 = 6.0;

/// The two-rule classification over TPSA and an effective logP. Both flags
/// are independent; absent inputs leave both unset.
pub fn classify(tpsa: Option<f64>, logp: Option<f64>) -> (Option<bool>, Option<bool>) {
    match (tpsa, logp) {
        (Some(tpsa), Some(logp)) => {
            let logp_ok = (LOGP_MIN..=LOGP_MAX).contains(&logp);
            (
                Some(tpsa <= TPSA_HIA_MAX && logp_ok),
                Some(tpsa <= TPSA_BBB_MAX && logp_ok),
            )
        }
        _ => (None, None),
    }
}

/// Fills the absorption and brain-barrier flags on each row. The effective
/// lipophilicity is WLOGP when present (the classifier is parameterized on
/// it), falling back to the row's selected estimate.
#[instrument(skip_all, name = "permeability_task")]
pub fn run(records: &mut [EfficiencyRecord]) {
    let mut classified = 0usize;
    for record in records.iter_mut() {
        let effective_logp = record.wlogp.or(record.logp);
        let (hia, bbb) = classify(record.tpsa, effective_logp);
        if hia.is_some() {
            classified += 1;
        }
        record.hia = hia;
        record.bbb = bbb;
    }

    info!(
        num_rows = records.len(),
        classified, "Permeability classification complete."
    );
}
