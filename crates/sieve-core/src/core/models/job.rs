use std::path::PathBuf;

use super::pocket::Pocket;

/// One cell of the docking matrix: a receptor, a ligand, and a pocket,
/// together with the artifact paths the docking run reads and writes.
///
/// Job identity is the `<protein>_<ligand>_<pocketN>` stem; every artifact
/// filename is derived from it so a run directory can be reconciled with its
/// matrix without external bookkeeping.
#[derive(Debug, Clone, PartialEq)]
pub struct DockingJob {
    /// Receptor identifier (structure file stem).
    pub protein: String,
    /// Ligand identifier (ligand file stem).
    pub ligand: String,
    /// Target pocket, centroid already resolved.
    pub pocket: Pocket,
    /// Receptor structure file handed to the docking engine.
    pub receptor_path: PathBuf,
    /// Ligand structure file handed to the docking engine.
    pub ligand_path: PathBuf,
    /// Generated engine configuration file.
    pub config_path: PathBuf,
    /// Docked-pose output file the engine writes.
    pub output_path: PathBuf,
    /// Captured engine log, later consumed by the collection task.
    pub log_path: PathBuf,
}

impl DockingJob {
    /// The `<protein>_<ligand>_<pocketN>` stem shared by all artifacts of
    /// this job.
    pub fn stem(&self) -> String {
        format!("{}_{}_{}", self.protein, self.ligand, self.pocket.label())
    }
}
