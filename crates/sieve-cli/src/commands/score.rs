use crate::cli::ScoreArgs;
use crate::config::PartialScreenConfig;
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use sievepp::engine::config::ScreenConfig;
use sievepp::engine::progress::ProgressReporter;
use sievepp::workflows;
use std::fs;
use tracing::{error, info};

pub fn run(args: ScoreArgs) -> Result<()> {
    let partial = PartialScreenConfig::load(args.config.as_deref())?;
    info!("Merging configuration from file and CLI arguments...");
    let config = partial.merge_with_score_args(&args)?;

    let proteins = if args.proteins.is_empty() {
        discover_log_targets(&config)?
    } else {
        args.proteins.clone()
    };
    info!(num_proteins = proteins.len(), "Re-scoring campaign starting.");
    println!("Re-scoring {} protein(s)...", proteins.len());

    let descriptor_table = workflows::screen::load_descriptor_table(&config)?;

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    let mut failures = 0usize;
    for protein in &proteins {
        match workflows::screen::score(protein, &config, descriptor_table.as_ref(), &reporter) {
            Ok(outcome) => {
                println!("✓ {}", outcome.summary);
            }
            Err(e) => {
                failures += 1;
                error!(protein = %protein, error = %e, "Protein re-score failed.");
                eprintln!("✗ {}: {}", protein, e);
                super::run::record_run_failure(&config, protein, &e);
            }
        }
    }

    if failures == proteins.len() {
        return Err(CliError::Campaign {
            attempted: proteins.len(),
        });
    }
    if failures > 0 {
        println!(
            "⚠ {} of {} protein re-score(s) failed; see the report for details.",
            failures,
            proteins.len()
        );
    }
    Ok(())
}

/// Re-scoring works off the docking output tree, so targets are the
/// per-protein directories under `docking/` rather than the receptor files.
fn discover_log_targets(config: &ScreenConfig) -> Result<Vec<String>> {
    let docking_root = config.workspace.root.join("docking");
    let entries = fs::read_dir(&docking_root).map_err(|e| {
        CliError::Config(format!(
            "No docking output under '{}': {}",
            docking_root.display(),
            e
        ))
    })?;

    let mut targets: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_dir())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .collect();
    targets.sort();

    if targets.is_empty() {
        return Err(CliError::Config(format!(
            "No docking output directories under '{}'.",
            docking_root.display()
        )));
    }
    Ok(targets)
}
