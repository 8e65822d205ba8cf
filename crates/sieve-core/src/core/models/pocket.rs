use nalgebra::Point3;

/// A single entry of the per-residue pocket-likelihood stream.
///
/// One record per data line of the pocket-scoring tool's output, in input
/// order. Residue ids are not guaranteed sorted or contiguous; grouping them
/// into pockets is the extraction task's job, not the parser's.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResidueScore {
    /// Author-assigned residue sequence number from the scoring tool.
    pub residue_id: i64,
    /// Pocket-likelihood score for this residue.
    pub score: f64,
}

/// A candidate binding pocket: a maximal contiguous run of residues whose
/// pocket-likelihood scores exceed the extraction threshold.
///
/// Invariants maintained by the extraction task:
/// - every member residue scored strictly above the threshold,
/// - consecutive member ids differ by exactly 1 in input order,
/// - `residue_ids` is never empty (a single qualifying residue is a pocket).
///
/// The centroid is absent until the centroid task fills it from the receptor
/// structure; a pocket whose residue numbering found no structural match
/// carries the origin as centroid and is marked degraded.
#[derive(Debug, Clone, PartialEq)]
pub struct Pocket {
    /// 1-based id in assignment (extraction) order.
    pub id: usize,
    /// Member residue ids, a strictly contiguous ascending run.
    pub residue_ids: Vec<i64>,
    /// Mean reference-atom position, filled by the centroid task.
    pub centroid: Option<Point3<f64>>,
    /// True when the centroid defaulted to the origin because no structural
    /// entry matched the pocket's residue ids.
    pub degraded_centroid: bool,
}

impl Pocket {
    /// Creates a pocket from its assignment-order id and member residues.
    pub fn new(id: usize, residue_ids: Vec<i64>) -> Self {
        Self {
            id,
            residue_ids,
            centroid: None,
            degraded_centroid: false,
        }
    }

    /// Artifact label used in config/output/log filenames, e.g. `pocket3`.
    pub fn label(&self) -> String {
        format!("pocket{}", self.id)
    }

    /// Number of member residues.
    pub fn len(&self) -> usize {
        self.residue_ids.len()
    }

    /// True when the pocket has no members. Extraction never produces this,
    /// but the accessor keeps `len` honest for callers.
    pub fn is_empty(&self) -> bool {
        self.residue_ids.is_empty()
    }

    /// First and last member residue id, as `(start, end)`.
    pub fn span(&self) -> Option<(i64, i64)> {
        match (self.residue_ids.first(), self.residue_ids.last()) {
            (Some(&first), Some(&last)) => Some((first, last)),
            _ => None,
        }
    }
}
