use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use nalgebra::Point3;
use tracing::{info, instrument};

use crate::core::io::vina::{self, ConfigParams};
use crate::core::models::job::DockingJob;
use crate::core::models::pocket::Pocket;
use crate::engine::config::ScreenConfig;
use crate::engine::error::EngineError;

/// Materializes the full (ligand × pocket) cross product for one protein:
/// creates the docking working directories, writes one engine configuration
/// per pair, and returns the immutable job list.
///
/// Artifact stems are `<protein>_<ligand>_<pocketN>`, which the collection
/// stage later inverts. Jobs are emitted ligand-major in the order the
/// ligand list was given, pockets in extraction order, so re-runs produce
/// the same matrix.
#[instrument(skip_all, name = "job_matrix_task", fields(protein = %protein))]
pub fn run(
    config: &ScreenConfig,
    protein: &str,
    pockets: &[Pocket],
    ligands: &[PathBuf],
) -> Result<Vec<DockingJob>, EngineError> {
    let ws = &config.workspace;
    let configs_dir = ws.configs_dir(protein);
    let poses_dir = ws.poses_dir(protein);
    let logs_dir = ws.logs_dir(protein);
    for dir in [&configs_dir, &poses_dir, &logs_dir] {
        fs::create_dir_all(dir).map_err(|e| EngineError::io(dir.clone(), e))?;
    }

    let receptor = ws.receptor_path(protein);
    let mut jobs = Vec::with_capacity(ligands.len() * pockets.len());

    for ligand_path in ligands {
        let ligand = ligand_stem(ligand_path);
        for pocket in pockets {
            let stem = format!("{}_{}_{}", protein, ligand, pocket.label());
            let config_path = configs_dir.join(format!("{stem}.txt"));
            let output_path = poses_dir.join(format!("{stem}.pdbqt"));
            let log_path = logs_dir.join(format!("{stem}.log"));

            let file = File::create(&config_path)
                .map_err(|e| EngineError::io(config_path.clone(), e))?;
            let mut writer = BufWriter::new(file);
            let params = ConfigParams {
                receptor: &receptor,
                ligand: ligand_path,
                center: pocket.centroid.unwrap_or_else(Point3::origin),
                size: config.docking.box_size,
                num_modes: config.docking.num_modes,
                exhaustiveness: config.docking.exhaustiveness,
                energy_range: config.docking.energy_range,
                out: &output_path,
            };
            vina::write_config(&mut writer, &params)
                .and_then(|_| writer.flush())
                .map_err(|e| EngineError::io(config_path.clone(), e))?;

            jobs.push(DockingJob {
                protein: protein.to_string(),
                ligand: ligand.clone(),
                pocket: pocket.clone(),
                receptor_path: receptor.clone(),
                ligand_path: ligand_path.clone(),
                config_path,
                output_path,
                log_path,
            });
        }
    }

    info!(
        num_jobs = jobs.len(),
        num_ligands = ligands.len(),
        num_pockets = pockets.len(),
        "Job matrix materialized."
    );

    Ok(jobs)
}

fn ligand_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}
