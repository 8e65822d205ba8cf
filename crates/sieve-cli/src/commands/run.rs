use crate::cli::RunArgs;
use crate::config::PartialScreenConfig;
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use sievepp::engine::config::ScreenConfig;
use sievepp::engine::progress::ProgressReporter;
use sievepp::engine::report;
use sievepp::engine::tasks::docking::CommandEngine;
use sievepp::workflows;
use tracing::{error, info, warn};

pub fn run(args: RunArgs, jobs: Option<usize>) -> Result<()> {
    let partial = PartialScreenConfig::load(args.config.as_deref())?;
    info!("Merging configuration from file and CLI arguments...");
    let config = partial.merge_with_run_args(&args, jobs)?;

    let proteins = resolve_proteins(&args.proteins, &config)?;
    info!(
        num_proteins = proteins.len(),
        workspace = %config.workspace.root.display(),
        "Screening campaign starting."
    );
    println!(
        "Screening {} protein(s) in {}...",
        proteins.len(),
        config.workspace.root.display()
    );

    let descriptor_table = workflows::screen::load_descriptor_table(&config)?;
    let engine = CommandEngine::new(&config.docking);

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    let mut failures = 0usize;
    for protein in &proteins {
        match workflows::screen::run(
            protein,
            &config,
            &engine,
            descriptor_table.as_ref(),
            &reporter,
        ) {
            Ok(outcome) => {
                println!("✓ {}", outcome.summary);
            }
            Err(e) => {
                failures += 1;
                error!(protein = %protein, error = %e, "Protein run failed.");
                eprintln!("✗ {}: {}", protein, e);
                record_run_failure(&config, protein, &e);
            }
        }
    }

    println!(
        "Tables and report written to: {}",
        config.workspace.results_dir().display()
    );

    if failures == proteins.len() {
        return Err(CliError::Campaign {
            attempted: proteins.len(),
        });
    }
    if failures > 0 {
        println!(
            "⚠ {} of {} protein run(s) failed; see the report for details.",
            failures,
            proteins.len()
        );
    }
    Ok(())
}

/// Uses the explicitly named proteins when given, otherwise every receptor
/// in the workspace. Explicit names become path components, so separators
/// are rejected.
pub fn resolve_proteins(named: &[String], config: &ScreenConfig) -> Result<Vec<String>> {
    if !named.is_empty() {
        for name in named {
            if name.is_empty() || name.contains(['/', '\\']) {
                return Err(CliError::Argument(format!(
                    "invalid protein name: '{}'",
                    name
                )));
            }
        }
        return Ok(named.to_vec());
    }

    let proteins = workflows::screen::discover_proteins(config)?;
    if proteins.is_empty() {
        return Err(CliError::Config(format!(
            "No receptor structures found under '{}'.",
            config.workspace.receptors_dir().display()
        )));
    }
    Ok(proteins)
}

/// Failed runs produce no tables, but they still get a report section so
/// the report accounts for every protein attempted.
pub fn record_run_failure(config: &ScreenConfig, protein: &str, error: &impl ToString) {
    let report_path = config.workspace.report_path();
    if let Err(io_err) = report::append_failure(&report_path, protein, &error.to_string()) {
        warn!(
            protein = %protein,
            error = %io_err,
            "Could not record the run failure in the report file."
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn config_for(root: &std::path::Path) -> ScreenConfig {
        ScreenConfig::with_workspace(root).unwrap()
    }

    #[test]
    fn explicit_protein_names_bypass_discovery() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_for(dir.path());

        // No receptors directory exists, but explicit names never touch it.
        let proteins = resolve_proteins(&["wnv_e".to_string()], &config).unwrap();
        assert_eq!(proteins, vec!["wnv_e"]);
    }

    #[test]
    fn protein_names_with_separators_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_for(dir.path());

        let result = resolve_proteins(&["../escape".to_string()], &config);
        assert!(matches!(result, Err(CliError::Argument(_))));
    }

    #[test]
    fn empty_receptor_directory_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("receptors")).unwrap();
        let config = config_for(dir.path());

        let result = resolve_proteins(&[], &config);
        assert!(matches!(result, Err(CliError::Config(_))));
    }

    #[test]
    fn run_failures_append_to_the_report() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_for(dir.path());

        record_run_failure(&config, "wnv_e", &"no pockets above the score threshold");

        let text = fs::read_to_string(config.workspace.report_path()).unwrap();
        assert!(text.contains("## wnv_e"));
        assert!(text.contains("[run-failed] no pockets above the score threshold"));
    }
}
