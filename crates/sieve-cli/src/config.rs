use crate::cli::{RunArgs, ScoreArgs};
use crate::error::{CliError, Result};
use serde::Deserialize;
use sievepp::engine::config as core_config;
use std::path::Path;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialPocketConfig {
    #[serde(rename = "score-threshold")]
    score_threshold: Option<f64>,
    #[serde(rename = "reference-atom")]
    reference_atom: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialDockingConfig {
    engine: Option<PathBuf>,
    #[serde(rename = "box-size")]
    box_size: Option<[f64; 3]>,
    #[serde(rename = "num-modes")]
    num_modes: Option<u32>,
    exhaustiveness: Option<u32>,
    #[serde(rename = "energy-range")]
    energy_range: Option<f64>,
    workers: Option<usize>,
    #[serde(rename = "timeout-secs")]
    timeout_secs: Option<u64>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialRankingConfig {
    #[serde(rename = "top-n")]
    top_n: Option<usize>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialDescriptorConfig {
    table: Option<PathBuf>,
}

/// Configuration file contents before CLI overrides are applied. Every
/// field is optional; anything left unset falls through to the core
/// defaults.
#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct PartialScreenConfig {
    pockets: Option<PartialPocketConfig>,
    docking: Option<PartialDockingConfig>,
    ranking: Option<PartialRankingConfig>,
    descriptors: Option<PartialDescriptorConfig>,
}

impl PartialScreenConfig {
    /// Reads the TOML configuration file, or yields the empty partial when
    /// no file was given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    /// Resolves the final screening configuration for `run`: CLI arguments
    /// take precedence over the file, the file over the built-in defaults.
    pub fn merge_with_run_args(
        mut self,
        args: &RunArgs,
        jobs: Option<usize>,
    ) -> Result<core_config::ScreenConfig> {
        self.apply_set_values(&args.set_values)?;

        let pockets = self.pockets.take().unwrap_or_default();
        let docking = self.docking.take().unwrap_or_default();
        let ranking = self.ranking.take().unwrap_or_default();
        let descriptors = self.descriptors.take().unwrap_or_default();

        let mut builder =
            core_config::ScreenConfigBuilder::new().workspace_root(args.workspace.clone());

        if let Some(threshold) = args.score_threshold.or(pockets.score_threshold) {
            builder = builder.score_threshold(threshold);
        }
        if let Some(atom) = args.reference_atom.clone().or(pockets.reference_atom) {
            builder = builder.reference_atom(atom);
        }
        if let Some(engine) = args.engine.clone().or(docking.engine) {
            builder = builder.engine(engine);
        }
        if let Some(size) = args.box_edge.map(|e| [e, e, e]).or(docking.box_size) {
            builder = builder.box_size(size);
        }
        if let Some(n) = docking.num_modes {
            builder = builder.num_modes(n);
        }
        if let Some(n) = args.exhaustiveness.or(docking.exhaustiveness) {
            builder = builder.exhaustiveness(n);
        }
        if let Some(range) = docking.energy_range {
            builder = builder.energy_range(range);
        }
        if let Some(workers) = jobs.or(docking.workers) {
            builder = builder.workers(workers);
        }
        if let Some(secs) = args.timeout.or(docking.timeout_secs) {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        if let Some(n) = args.top_n.or(ranking.top_n) {
            builder = builder.top_n(n);
        }
        if let Some(table) = args.descriptors.clone().or(descriptors.table) {
            builder = builder.descriptor_table(table);
        }

        builder.build().map_err(|e| CliError::Config(e.to_string()))
    }

    /// Resolves the final configuration for `score`. Pocket and docking
    /// sections are accepted in the file but not consulted; only the
    /// workspace, ranking, and descriptor settings matter here.
    pub fn merge_with_score_args(
        mut self,
        args: &ScoreArgs,
    ) -> Result<core_config::ScreenConfig> {
        self.apply_set_values(&args.set_values)?;

        let ranking = self.ranking.take().unwrap_or_default();
        let descriptors = self.descriptors.take().unwrap_or_default();

        let mut builder =
            core_config::ScreenConfigBuilder::new().workspace_root(args.workspace.clone());

        if let Some(n) = args.top_n.or(ranking.top_n) {
            builder = builder.top_n(n);
        }
        if let Some(table) = args.descriptors.clone().or(descriptors.table) {
            builder = builder.descriptor_table(table);
        }

        builder.build().map_err(|e| CliError::Config(e.to_string()))
    }

    fn apply_set_values(&mut self, set_values: &[String]) -> Result<()> {
        if set_values.is_empty() {
            return Ok(());
        }
        for kv_pair in set_values {
            let parts: Vec<_> = kv_pair.splitn(2, '=').collect();
            if parts.len() != 2 {
                return Err(CliError::Config(format!(
                    "Invalid --set format: '{}'. Expected KEY=VALUE.",
                    kv_pair
                )));
            }
            let key = parts[0];
            let value = parts[1];

            match key {
                "pockets.score-threshold" => {
                    self.pockets
                        .get_or_insert_with(Default::default)
                        .score_threshold = Some(parse_value(key, value)?);
                }
                "pockets.reference-atom" => {
                    self.pockets
                        .get_or_insert_with(Default::default)
                        .reference_atom = Some(value.to_string());
                }
                "docking.num-modes" => {
                    self.docking.get_or_insert_with(Default::default).num_modes =
                        Some(parse_value(key, value)?);
                }
                "docking.exhaustiveness" => {
                    self.docking
                        .get_or_insert_with(Default::default)
                        .exhaustiveness = Some(parse_value(key, value)?);
                }
                "docking.energy-range" => {
                    self.docking
                        .get_or_insert_with(Default::default)
                        .energy_range = Some(parse_value(key, value)?);
                }
                "docking.workers" => {
                    self.docking.get_or_insert_with(Default::default).workers =
                        Some(parse_value(key, value)?);
                }
                "docking.timeout-secs" => {
                    self.docking
                        .get_or_insert_with(Default::default)
                        .timeout_secs = Some(parse_value(key, value)?);
                }
                "ranking.top-n" => {
                    self.ranking.get_or_insert_with(Default::default).top_n =
                        Some(parse_value(key, value)?);
                }
                _ => {
                    return Err(CliError::Config(format!(
                        "Unsupported configuration key for --set: '{}'",
                        key
                    )));
                }
            }
        }
        Ok(())
    }
}

fn parse_value<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| CliError::Config(format!("Invalid value for {}: '{}'", key, value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;
    use once_cell::sync::Lazy;
    use std::fs;
    use tempfile::{TempDir, tempdir};

    static TEST_DIR: Lazy<TempDir> = Lazy::new(|| tempdir().expect("Failed to create temp dir"));

    fn write_config_file(name: &str, content: &str) -> PathBuf {
        let file_path = TEST_DIR.path().join(name);
        fs::write(&file_path, content).unwrap();
        file_path
    }

    fn parse_run(extra: &[&str]) -> RunArgs {
        let mut argv = vec!["sieve", "run", "-w", "/data/campaign"];
        argv.extend_from_slice(extra);
        let cli = Cli::parse_from(argv);
        match cli.command {
            Commands::Run(args) => args,
            _ => panic!("Expected 'run' subcommand"),
        }
    }

    #[test]
    fn file_values_override_defaults() {
        let config_path = write_config_file(
            "file_over_defaults.toml",
            r#"
            [pockets]
            score-threshold = 0.25

            [docking]
            engine = "/opt/vina/bin/vina"
            exhaustiveness = 16
            timeout-secs = 900

            [ranking]
            top-n = 50
            "#,
        );

        let partial = PartialScreenConfig::load(Some(&config_path)).unwrap();
        let args = parse_run(&[]);
        let config = partial.merge_with_run_args(&args, None).unwrap();

        assert_eq!(config.pockets.score_threshold, 0.25);
        assert_eq!(config.docking.engine, PathBuf::from("/opt/vina/bin/vina"));
        assert_eq!(config.docking.exhaustiveness, 16);
        assert_eq!(config.docking.timeout, Duration::from_secs(900));
        assert_eq!(config.ranking.top_n, 50);
        // Untouched settings keep the built-in defaults.
        assert_eq!(config.docking.num_modes, 9);
        assert_eq!(config.pockets.reference_atom, "CA");
    }

    #[test]
    fn cli_args_override_file_values() {
        let config_path = write_config_file(
            "cli_over_file.toml",
            r#"
            [pockets]
            score-threshold = 0.25

            [docking]
            exhaustiveness = 16
            workers = 2
            "#,
        );

        let partial = PartialScreenConfig::load(Some(&config_path)).unwrap();
        let args = parse_run(&["--score-threshold", "0.4", "--box-edge", "25.0"]);
        let config = partial.merge_with_run_args(&args, Some(8)).unwrap();

        assert_eq!(config.pockets.score_threshold, 0.4);
        assert_eq!(config.docking.box_size, [25.0, 25.0, 25.0]);
        // -j beats the file's worker count.
        assert_eq!(config.docking.workers, 8);
        // File values without CLI overrides survive.
        assert_eq!(config.docking.exhaustiveness, 16);
    }

    #[test]
    fn set_values_override_file_values() {
        let config_path = write_config_file(
            "set_over_file.toml",
            r#"
            [ranking]
            top-n = 50
            "#,
        );

        let partial = PartialScreenConfig::load(Some(&config_path)).unwrap();
        let args = parse_run(&["-S", "ranking.top-n=5", "-S", "docking.energy-range=5.0"]);
        let config = partial.merge_with_run_args(&args, None).unwrap();

        assert_eq!(config.ranking.top_n, 5);
        assert_eq!(config.docking.energy_range, 5.0);
    }

    #[test]
    fn no_config_file_yields_core_defaults() {
        let partial = PartialScreenConfig::load(None).unwrap();
        let args = parse_run(&[]);
        let config = partial.merge_with_run_args(&args, None).unwrap();

        assert_eq!(config.workspace.root, PathBuf::from("/data/campaign"));
        assert_eq!(config.pockets.score_threshold, 0.1);
        assert_eq!(config.docking.box_size, [20.0, 20.0, 20.0]);
        assert_eq!(config.docking.engine, PathBuf::from("vina"));
        assert!(config.descriptor_table.is_none());
    }

    #[test]
    fn unknown_file_keys_are_rejected() {
        let config_path = write_config_file(
            "unknown_key.toml",
            r#"
            [docking]
            exhaustivenes = 16
            "#,
        );

        let result = PartialScreenConfig::load(Some(&config_path));
        assert!(matches!(result, Err(CliError::FileParsing { .. })));
    }

    #[test]
    fn malformed_set_pairs_are_rejected() {
        let partial = PartialScreenConfig::default();
        let args = parse_run(&["-S", "ranking.top-n"]);
        let result = partial.merge_with_run_args(&args, None);
        assert!(matches!(result, Err(CliError::Config(_))));

        let partial = PartialScreenConfig::default();
        let args = parse_run(&["-S", "nonsense.key=1"]);
        let result = partial.merge_with_run_args(&args, None);
        assert!(matches!(result, Err(CliError::Config(_))));
    }

    #[test]
    fn score_merge_reads_ranking_and_descriptors_only() {
        let table_path = TEST_DIR.path().join("descriptors.csv");
        fs::write(&table_path, "molecule,tpsa\n").unwrap();
        let config_path = write_config_file(
            "score_merge.toml",
            &format!(
                r#"
                [docking]
                exhaustiveness = 64

                [ranking]
                top-n = 10

                [descriptors]
                table = "{}"
                "#,
                table_path.to_str().unwrap()
            ),
        );

        let partial = PartialScreenConfig::load(Some(&config_path)).unwrap();
        let cli = Cli::parse_from(["sieve", "score", "-w", "/data/campaign"]);
        let args = match cli.command {
            Commands::Score(args) => args,
            _ => panic!("Expected 'score' subcommand"),
        };
        let config = partial.merge_with_score_args(&args).unwrap();

        assert_eq!(config.ranking.top_n, 10);
        assert_eq!(config.descriptor_table, Some(table_path));
        // Docking settings in the file are tolerated but ignored here.
        assert_eq!(config.docking.exhaustiveness, 8);
    }

    #[test]
    fn invalid_builder_values_surface_as_config_errors() {
        let partial = PartialScreenConfig::default();
        let args = parse_run(&["-S", "docking.workers=0"]);
        let result = partial.merge_with_run_args(&args, None);
        assert!(matches!(result, Err(CliError::Config(_))));
    }
}
