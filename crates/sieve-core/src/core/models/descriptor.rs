use std::collections::HashMap;

use crate::core::models::record::LogpSource;
use crate::core::utils::keys::normalize_key;

/// Physicochemical descriptors for one ligand, as read from the auxiliary
/// descriptor table.
///
/// Every numeric field is optional: descriptor exports routinely carry blank
/// cells, and the downstream efficiency and permeability computations degrade
/// per-field rather than dropping the ligand.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DescriptorRow {
    /// Raw ligand name as spelled in the table (first occurrence wins when
    /// duplicate keys collapse).
    pub name: String,
    /// Non-hydrogen atom count.
    pub heavy_atoms: Option<f64>,
    /// Topological polar surface area.
    pub tpsa: Option<f64>,
    /// Consensus lipophilicity estimate.
    pub consensus_logp: Option<f64>,
    pub xlogp3: Option<f64>,
    pub wlogp: Option<f64>,
    pub mlogp: Option<f64>,
}

impl DescriptorRow {
    /// First present estimate in the fixed preference chain: consensus,
    /// XLOGP3, WLOGP, MLOGP.
    pub fn selected_logp(&self) -> Option<(f64, LogpSource)> {
        if let Some(v) = self.consensus_logp {
            Some((v, LogpSource::Consensus))
        } else if let Some(v) = self.xlogp3 {
            Some((v, LogpSource::Xlogp3))
        } else if let Some(v) = self.wlogp {
            Some((v, LogpSource::Wlogp))
        } else if let Some(v) = self.mlogp {
            Some((v, LogpSource::Mlogp))
        } else {
            None
        }
    }

    /// Lipophilicity value used by the permeability classifier: WLOGP when
    /// present (the classifier is defined over it), otherwise whatever the
    /// preference chain selects.
    pub fn effective_logp(&self) -> Option<f64> {
        self.wlogp.or_else(|| self.selected_logp().map(|(v, _)| v))
    }
}

/// The auxiliary descriptor table, keyed by normalized ligand name.
///
/// Rows whose names normalize to the same key are collapsed at construction:
/// numeric fields take the median of the present values, the name keeps its
/// first occurrence. Lookups normalize the query the same way, so docking-side
/// and table-side spelling differences (case, accents, punctuation) do not
/// break the join.
#[derive(Debug, Clone, Default)]
pub struct DescriptorTable {
    rows: HashMap<String, DescriptorRow>,
}

impl DescriptorTable {
    /// Builds the table from raw rows, collapsing duplicate normalized keys.
    ///
    /// Rows whose name normalizes to the empty key (no letters or digits at
    /// all) are unreachable by any lookup and are dropped.
    pub fn from_rows(raw: Vec<DescriptorRow>) -> Self {
        let mut groups: HashMap<String, Vec<DescriptorRow>> = HashMap::new();
        let mut order: Vec<String> = Vec::new();
        for row in raw {
            let key = normalize_key(&row.name);
            if key.is_empty() {
                continue;
            }
            let group = groups.entry(key.clone()).or_default();
            if group.is_empty() {
                order.push(key);
            }
            group.push(row);
        }

        let mut rows = HashMap::with_capacity(order.len());
        for key in order {
            let group = groups.remove(&key).unwrap_or_default();
            if let Some(collapsed) = collapse(group) {
                rows.insert(key, collapsed);
            }
        }
        Self { rows }
    }

    /// Looks up the descriptors for a docking-side ligand identifier.
    pub fn lookup(&self, ligand: &str) -> Option<&DescriptorRow> {
        let key = normalize_key(ligand);
        if key.is_empty() {
            return None;
        }
        self.rows.get(&key)
    }

    /// Number of distinct normalized keys.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn collapse(group: Vec<DescriptorRow>) -> Option<DescriptorRow> {
    let mut iter = group.into_iter();
    let first = iter.next()?;
    let rest: Vec<DescriptorRow> = iter.collect();
    if rest.is_empty() {
        return Some(first);
    }

    let all: Vec<DescriptorRow> = std::iter::once(first.clone()).chain(rest).collect();
    Some(DescriptorRow {
        name: first.name,
        heavy_atoms: median(all.iter().filter_map(|r| r.heavy_atoms)),
        tpsa: median(all.iter().filter_map(|r| r.tpsa)),
        consensus_logp: median(all.iter().filter_map(|r| r.consensus_logp)),
        xlogp3: median(all.iter().filter_map(|r| r.xlogp3)),
        wlogp: median(all.iter().filter_map(|r| r.wlogp)),
        mlogp: median(all.iter().filter_map(|r| r.mlogp)),
    })
}

/// Median over the present values only; absent when none are present. An
/// even count takes the mean of the two middle values.
fn median(values: impl Iterator<Item = f64>) -> Option<f64> {
    let mut values: Vec<f64> = values.collect();
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 1 {
        Some(values[mid])
    } else {
        Some((values[mid - 1] + values[mid]) / 2.0)
    }
}
