use std::cmp::Ordering;

use tracing::{info, instrument};

use crate::core::models::record::EfficiencyRecord;
use crate::engine::tasks::descriptor_join::JoinedRecord;

/// Gas constant in kcal·mol⁻¹·K⁻¹.
pub const GAS_CONSTANT: f64 = 1.9872036e-3;
/// Physiological temperature in kelvin.
pub const TEMPERATURE: f64 = 310.15;

/// Empirical size-dependence of pKd/HA for optimally efficient binders;
/// the FQ index divides by this reference fit. Coefficients are fixed.
fn fq_denominator(heavy_atoms: f64) -> f64 {
    0.0715 + 7.5328 / heavy_atoms + 25.7079 / heavy_atoms.powi(2)
        - 361.4722 / heavy_atoms.powi(3)
}

/// Derives the thermodynamic and efficiency annotations for each joined
/// row: Kd and pKd always, LE and FQ when a positive heavy-atom count is
/// available, LLE when a lipophilicity estimate is available. Permeability
/// flags are left unset for the classification stage.
#[instrument(skip_all, name = "efficiency_task")]
pub fn run(joined: &[JoinedRecord]) -> Vec<EfficiencyRecord> {
    let records: Vec<EfficiencyRecord> = joined
        .iter()
        .map(|row| {
            let affinity = row.record.affinity;
            let kd = (affinity / (GAS_CONSTANT * TEMPERATURE)).exp();
            let pkd = -kd.log10();

            let descriptors = row.descriptors.as_ref();
            let heavy_atoms = descriptors
                .and_then(|d| d.heavy_atoms)
                .filter(|ha| *ha > 0.0);
            let le = heavy_atoms.map(|ha| -affinity / ha);
            let fq = heavy_atoms.map(|ha| (pkd / ha) / fq_denominator(ha));

            let selected = descriptors.and_then(|d| d.selected_logp());
            let logp = selected.map(|(value, _)| value);
            let lle = logp.map(|lp| pkd - lp);

            EfficiencyRecord {
                protein: row.record.protein.clone(),
                ligand: row.record.ligand.clone(),
                affinity,
                kd,
                pkd,
                heavy_atoms,
                le,
                logp,
                logp_source: selected.map(|(_, source)| source),
                wlogp: descriptors.and_then(|d| d.wlogp),
                lle,
                fq,
                tpsa: descriptors.and_then(|d| d.tpsa),
                hia: None,
                bbb: None,
            }
        })
        .collect();

    info!(num_rows = records.len(), "Efficiency scoring complete.");

    records
}

/// Returns the top `top_n` rows by descending LLE. The sort is stable, so
/// ties and unscored rows keep input order; rows without an LLE rank after
/// every scored row.
pub fn rank(records: &[EfficiencyRecord], top_n: usize) -> Vec<&EfficiencyRecord> {
    let mut sorted: Vec<&EfficiencyRecord> = records.iter().collect();
    sorted.sort_by(|a, b| match (a.lle, b.lle) {
        (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    sorted.truncate(top_n);
    sorted
}
