/// Identity and best-pose affinity recovered from one docking log.
///
/// `affinity` is the score of the rank-1 pose only; the engine pre-sorts its
/// pose table, so no cross-rank minimum is taken here. An absent affinity
/// means the log had no rank-1 row (crashed or truncated run) and the record
/// is dropped during aggregation rather than treated as zero.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultRecord {
    pub protein: String,
    pub ligand: String,
    /// Pocket label, absent when the filename carried no pocket component.
    pub pocket: Option<String>,
    /// Rank-1 pose score in kcal/mol, absent when no rank-1 row was found.
    pub affinity: Option<f64>,
}

/// Best affinity for one (protein, ligand) pair across all of its pockets,
/// produced by aggregation before the plausibility filter is applied.
#[derive(Debug, Clone, PartialEq)]
pub struct AffinityRecord {
    pub protein: String,
    pub ligand: String,
    /// Minimum (most negative) affinity over the ligand's pockets.
    pub affinity: f64,
}

/// Which lipophilicity estimator the preference chain selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogpSource {
    Consensus,
    Xlogp3,
    Wlogp,
    Mlogp,
}

impl LogpSource {
    /// Column-value spelling used in the efficiency table.
    pub fn as_str(&self) -> &'static str {
        match self {
            LogpSource::Consensus => "consensus",
            LogpSource::Xlogp3 => "xlogp3",
            LogpSource::Wlogp => "wlogp",
            LogpSource::Mlogp => "mlogp",
        }
    }
}

/// Fully annotated efficiency row: thermodynamic conversions, size- and
/// lipophilicity-normalized indices, joined descriptors, and permeability
/// flags. Derived from an [`AffinityRecord`] every run, never persisted as
/// mutable state.
///
/// Optional fields stay absent when their inputs are absent: `le` and `fq`
/// need a positive heavy-atom count, `lle` needs a selected logP, and the
/// permeability flags need both TPSA and an effective logP.
#[derive(Debug, Clone, PartialEq)]
pub struct EfficiencyRecord {
    pub protein: String,
    pub ligand: String,
    pub affinity: f64,
    /// Dissociation constant, `exp(affinity / (R T))`.
    pub kd: f64,
    /// `-log10(Kd)`.
    pub pkd: f64,
    /// Heavy-atom count from the descriptor table. Fractional values are
    /// possible after duplicate-row median collapse.
    pub heavy_atoms: Option<f64>,
    /// Ligand efficiency, `-affinity / heavy_atoms`.
    pub le: Option<f64>,
    /// Selected lipophilicity estimate (first present in the chain).
    pub logp: Option<f64>,
    /// Which estimator `logp` came from.
    pub logp_source: Option<LogpSource>,
    /// WLOGP estimate, kept separately because the permeability classifier
    /// is defined over it rather than over the selected value.
    pub wlogp: Option<f64>,
    /// Lipophilic ligand efficiency, `pKd - logP`.
    pub lle: Option<f64>,
    /// Fit quality, size-corrected pKd against the empirical reference fit.
    pub fq: Option<f64>,
    /// Topological polar surface area from the descriptor table.
    pub tpsa: Option<f64>,
    /// High intestinal absorption flag (BOILED-Egg white region).
    pub hia: Option<bool>,
    /// Blood-brain-barrier permeation flag (BOILED-Egg yolk region).
    pub bbb: Option<bool>,
}
