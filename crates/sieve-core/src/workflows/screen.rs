//! Per-protein screening pipeline, from pocket score stream to ranked table.
//!
//! A run is fatal only for conditions that leave nothing to work with: a
//! missing receptor or score stream, an empty ligand set, no pockets above
//! threshold, or an empty result set. Everything else (failed jobs,
//! unparsable logs, outliers, descriptor misses) is accumulated in the run
//! report and the pipeline carries on with what remains.

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter};
use std::path::{Path, PathBuf};

use tracing::{info, instrument, warn};

use crate::core::io::descriptors::read_descriptor_table;
use crate::core::io::pdb::read_reference_atoms;
use crate::core::io::pocket_scores::read_scores;
use crate::core::io::tables;
use crate::core::models::descriptor::DescriptorTable;
use crate::core::models::job::DockingJob;
use crate::core::models::pocket::Pocket;
use crate::core::models::record::{EfficiencyRecord, ResultRecord};
use crate::engine::config::ScreenConfig;
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter, Stage};
use crate::engine::report::{ReportEvent, RunReport, ScreenSummary, append_section};
use crate::engine::tasks;
use crate::engine::tasks::docking::DockingEngine;

/// Everything a completed protein run leaves behind in memory. The tables
/// and the report section are already on disk by the time this is returned.
#[derive(Debug)]
pub struct ScreenOutcome {
    pub summary: ScreenSummary,
    pub report: RunReport,
}

/// Lists the proteins in a workspace: the sorted stems of the receptor
/// structures under `receptors/`.
pub fn discover_proteins(config: &ScreenConfig) -> Result<Vec<String>, EngineError> {
    let dir = config.workspace.receptors_dir();
    let entries = fs::read_dir(&dir).map_err(|e| EngineError::io(&dir, e))?;
    let mut proteins: Vec<String> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().is_some_and(|ext| ext == "pdbqt"))
        .filter_map(|path| path.file_stem().map(|stem| stem.to_string_lossy().into_owned()))
        .collect();
    proteins.sort();
    proteins.dedup();
    Ok(proteins)
}

/// Loads the campaign-wide descriptor table named in the configuration, or
/// `None` when no table is configured.
pub fn load_descriptor_table(
    config: &ScreenConfig,
) -> Result<Option<DescriptorTable>, EngineError> {
    let Some(path) = &config.descriptor_table else {
        return Ok(None);
    };
    let file = File::open(path).map_err(|e| EngineError::io(path, e))?;
    let table = read_descriptor_table(BufReader::new(file)).map_err(|source| {
        EngineError::DescriptorTable {
            path: path.clone(),
            source,
        }
    })?;
    info!(
        path = %path.display(),
        num_ligands = table.len(),
        "Descriptor table loaded."
    );
    Ok(Some(table))
}

/// Runs the full pipeline for one protein: pocket extraction, centroids,
/// job matrix, docking, collection, aggregation, join, scoring,
/// classification, and table output.
#[instrument(skip_all, name = "screen_workflow", fields(protein = protein))]
pub fn run(
    protein: &str,
    config: &ScreenConfig,
    engine: &dyn DockingEngine,
    descriptors: Option<&DescriptorTable>,
    reporter: &ProgressReporter,
) -> Result<ScreenOutcome, EngineError> {
    info!("Starting screening run.");
    let mut report = RunReport::new();

    // === Phase 1: Pocket Discovery ===
    let pockets = extract_pockets(protein, config, &mut report, reporter)?;
    let pockets = compute_centroids(protein, config, pockets, &mut report, reporter)?;

    // === Phase 2: Job Matrix ===
    let ligands = discover_ligands(config, protein)?;
    reporter.report(Progress::StageStart {
        stage: Stage::JobMatrix,
    });
    let jobs = tasks::job_matrix::run(config, protein, &pockets, &ligands)?;
    reporter.report(Progress::StageFinish);

    // === Phase 3: Docking ===
    dispatch_jobs(engine, &jobs, config, &mut report, reporter);

    // === Phase 4: Collection ===
    let records = collect_records(protein, config, &mut report, reporter)?;

    // === Phase 5: Scoring ===
    let scored = score_records(&records, descriptors, &mut report, reporter);

    // === Phase 6: Tables and Report ===
    finalize(
        protein,
        config,
        Some(&pockets),
        &records,
        scored,
        report,
        jobs.len(),
        reporter,
    )
}

/// Re-scores the logs already in a protein's log directory without invoking
/// the docking engine. Receptor, score stream, and ligand set are not
/// consulted; only the collection-onward half of the pipeline runs.
#[instrument(skip_all, name = "score_workflow", fields(protein = protein))]
pub fn score(
    protein: &str,
    config: &ScreenConfig,
    descriptors: Option<&DescriptorTable>,
    reporter: &ProgressReporter,
) -> Result<ScreenOutcome, EngineError> {
    info!("Re-scoring existing docking logs.");
    let mut report = RunReport::new();

    let records = collect_records(protein, config, &mut report, reporter)?;
    let scored = score_records(&records, descriptors, &mut report, reporter);
    finalize(protein, config, None, &records, scored, report, 0, reporter)
}

fn extract_pockets(
    protein: &str,
    config: &ScreenConfig,
    report: &mut RunReport,
    reporter: &ProgressReporter,
) -> Result<Vec<Pocket>, EngineError> {
    reporter.report(Progress::StageStart {
        stage: Stage::Pockets,
    });

    let scores_path = config.workspace.scores_path(protein);
    if !scores_path.is_file() {
        return Err(EngineError::MissingScoreStream {
            protein: protein.to_string(),
            path: scores_path,
        });
    }
    let file = File::open(&scores_path).map_err(|e| EngineError::io(&scores_path, e))?;
    let stream = read_scores(&mut BufReader::new(file))
        .map_err(|e| EngineError::io(&scores_path, e))?;

    if !stream.skipped_lines.is_empty() {
        warn!(
            count = stream.skipped_lines.len(),
            "Malformed score lines skipped."
        );
        report.push(ReportEvent::MalformedScoreLines {
            protein: protein.to_string(),
            count: stream.skipped_lines.len(),
        });
    }

    let pockets = tasks::pocket_extraction::run(&stream.records, config.pockets.score_threshold);
    if pockets.is_empty() {
        return Err(EngineError::EmptyPocketList {
            protein: protein.to_string(),
        });
    }
    info!(num_pockets = pockets.len(), "Pockets extracted.");
    reporter.report(Progress::StageFinish);
    Ok(pockets)
}

fn compute_centroids(
    protein: &str,
    config: &ScreenConfig,
    mut pockets: Vec<Pocket>,
    report: &mut RunReport,
    reporter: &ProgressReporter,
) -> Result<Vec<Pocket>, EngineError> {
    reporter.report(Progress::StageStart {
        stage: Stage::Centroids,
    });

    let receptor_path = config.workspace.receptor_path(protein);
    if !receptor_path.is_file() {
        return Err(EngineError::MissingReceptor {
            protein: protein.to_string(),
            path: receptor_path,
        });
    }
    let file = File::open(&receptor_path).map_err(|e| EngineError::io(&receptor_path, e))?;
    let atoms = read_reference_atoms(&mut BufReader::new(file), &config.pockets.reference_atom)
        .map_err(|source| EngineError::ReceptorParse {
            path: receptor_path.clone(),
            source,
        })?;
    info!(
        num_atoms = atoms.len(),
        atom = %config.pockets.reference_atom,
        "Reference atoms loaded."
    );

    tasks::centroid::run(&mut pockets, &atoms);
    for pocket in pockets.iter().filter(|p| p.degraded_centroid) {
        report.push(ReportEvent::DegradedCentroid {
            protein: protein.to_string(),
            pocket: pocket.label(),
        });
    }

    reporter.report(Progress::StageFinish);
    Ok(pockets)
}

fn discover_ligands(config: &ScreenConfig, protein: &str) -> Result<Vec<PathBuf>, EngineError> {
    let dir = config.workspace.ligands_dir(protein);
    let entries = match fs::read_dir(&dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(EngineError::EmptyLigandSet {
                protein: protein.to_string(),
                path: dir,
            });
        }
        Err(e) => return Err(EngineError::io(dir, e)),
    };

    let mut ligands: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().is_some_and(|ext| ext == "pdbqt"))
        .collect();
    ligands.sort();

    if ligands.is_empty() {
        return Err(EngineError::EmptyLigandSet {
            protein: protein.to_string(),
            path: dir,
        });
    }
    info!(num_ligands = ligands.len(), "Ligand set discovered.");
    Ok(ligands)
}

fn dispatch_jobs(
    engine: &dyn DockingEngine,
    jobs: &[DockingJob],
    config: &ScreenConfig,
    report: &mut RunReport,
    reporter: &ProgressReporter,
) {
    reporter.report(Progress::StageStart {
        stage: Stage::Docking,
    });

    let outcomes = tasks::docking::run(engine, jobs, config.docking.workers, reporter);
    for outcome in outcomes {
        if let Err(kind) = outcome.result {
            report.push(ReportEvent::JobFailed {
                protein: outcome.protein,
                ligand: outcome.ligand,
                pocket: outcome.pocket,
                kind,
            });
        }
    }

    reporter.report(Progress::StageFinish);
}

fn collect_records(
    protein: &str,
    config: &ScreenConfig,
    report: &mut RunReport,
    reporter: &ProgressReporter,
) -> Result<Vec<ResultRecord>, EngineError> {
    reporter.report(Progress::StageStart {
        stage: Stage::Collection,
    });

    let logs_dir = config.workspace.logs_dir(protein);
    let records = tasks::collection::run(protein, &logs_dir, report, reporter)?;
    if records.is_empty() {
        return Err(EngineError::EmptyResultSet {
            protein: protein.to_string(),
        });
    }

    reporter.report(Progress::StageFinish);
    Ok(records)
}

fn score_records(
    records: &[ResultRecord],
    descriptors: Option<&DescriptorTable>,
    report: &mut RunReport,
    reporter: &ProgressReporter,
) -> Vec<EfficiencyRecord> {
    reporter.report(Progress::StageStart {
        stage: Stage::Aggregation,
    });
    let affinities = tasks::aggregation::run(records, report);
    reporter.report(Progress::StageFinish);

    reporter.report(Progress::StageStart {
        stage: Stage::DescriptorJoin,
    });
    let joined = tasks::descriptor_join::run(affinities, descriptors, report);
    reporter.report(Progress::StageFinish);

    reporter.report(Progress::StageStart {
        stage: Stage::Efficiency,
    });
    let mut scored = tasks::efficiency::run(&joined);
    reporter.report(Progress::StageFinish);

    reporter.report(Progress::StageStart {
        stage: Stage::Permeability,
    });
    tasks::permeability::run(&mut scored);
    reporter.report(Progress::StageFinish);

    scored
}

#[allow(clippy::too_many_arguments)]
fn finalize(
    protein: &str,
    config: &ScreenConfig,
    pockets: Option<&[Pocket]>,
    records: &[ResultRecord],
    scored: Vec<EfficiencyRecord>,
    report: RunReport,
    jobs_total: usize,
    reporter: &ProgressReporter,
) -> Result<ScreenOutcome, EngineError> {
    reporter.report(Progress::StageStart {
        stage: Stage::Tables,
    });

    let results_dir = config.workspace.results_dir();
    fs::create_dir_all(&results_dir).map_err(|e| EngineError::io(&results_dir, e))?;

    if let Some(pockets) = pockets {
        let path = results_dir.join(format!("{protein}_pockets.csv"));
        write_table(&path, |w| tables::write_pockets(w, pockets))?;
    }

    let path = results_dir.join(format!("{protein}_affinities.csv"));
    write_table(&path, |w| tables::write_affinities(w, records))?;

    let path = results_dir.join(format!("{protein}_efficiency.csv"));
    write_table(&path, |w| tables::write_efficiency(w, &scored))?;

    let ranked = tasks::efficiency::rank(&scored, config.ranking.top_n);
    let ranked_rows = ranked.len();
    let path = results_dir.join(format!("{protein}_ranked.csv"));
    write_table(&path, |w| tables::write_ranked(w, &ranked))?;

    let summary = ScreenSummary {
        protein: protein.to_string(),
        pockets: pockets.map_or(0, |p| p.len()),
        degraded_centroids: report.degraded_centroids(),
        jobs_total,
        jobs_failed: report.failed_jobs(),
        jobs_timed_out: report.timed_out_jobs(),
        logs_parsed: records.len(),
        missing_affinities: report.missing_affinities(),
        outliers_excluded: report.outliers(),
        descriptor_misses: report.descriptor_misses(),
        scored_ligands: scored.len(),
        ranked_rows,
    };

    let report_path = config.workspace.report_path();
    append_section(&report_path, &summary, &report)
        .map_err(|e| EngineError::io(&report_path, e))?;

    reporter.report(Progress::StageFinish);
    info!(%summary, "Run complete.");
    Ok(ScreenOutcome { summary, report })
}

fn write_table(
    path: &Path,
    write: impl FnOnce(BufWriter<File>) -> Result<(), csv::Error>,
) -> Result<(), EngineError> {
    let file = File::create(path).map_err(|e| EngineError::io(path, e))?;
    write(BufWriter::new(file)).map_err(|source| EngineError::TableWrite {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::config::ScreenConfigBuilder;
    use crate::engine::report::FailureKind;
    use std::io::Write;

    /// Engine double that writes a plausible result log for every job,
    /// failing any ligand named in `fail`.
    struct FakeEngine {
        fail: Vec<&'static str>,
    }

    impl FakeEngine {
        fn reliable() -> Self {
            Self { fail: Vec::new() }
        }
    }

    impl DockingEngine for FakeEngine {
        fn dock(&self, job: &DockingJob) -> Result<(), FailureKind> {
            if self.fail.contains(&job.ligand.as_str()) {
                return Err(FailureKind::NonZeroExit { code: Some(1) });
            }
            let affinity = match job.ligand.as_str() {
                "druga" => -7.5,
                "drugb" => -6.2,
                _ => -5.0,
            };
            let mut file = File::create(&job.log_path)
                .map_err(|e| FailureKind::Spawn {
                    message: e.to_string(),
                })?;
            writeln!(file, "mode |   affinity | dist from best mode").unwrap();
            writeln!(file, "-----+------------+----------").unwrap();
            writeln!(file, "   1       {affinity}      0.000      0.000").unwrap();
            Ok(())
        }
    }

    /// Two scored residue runs for `wnv_e`: residues 1-2 form one pocket,
    /// residue 5 a second. The receptor carries CA atoms for residues 1 and
    /// 2 only, so the second pocket degrades to the origin.
    fn seed_workspace(root: &Path) {
        fs::create_dir_all(root.join("receptors")).unwrap();
        fs::create_dir_all(root.join("pocket_scores")).unwrap();
        fs::create_dir_all(root.join("ligands/wnv_e")).unwrap();
        fs::write(
            root.join("receptors/wnv_e.pdbqt"),
            "ATOM      1  N   MET A   1      10.000  10.000  10.000  1.00  0.00     0.000 N\n\
             ATOM      2  CA  MET A   1      11.000  12.000  13.000  1.00  0.00     0.180 C\n\
             ATOM      3  CA  GLY A   2      13.000  14.000  15.000  1.00  0.00     0.220 C\n",
        )
        .unwrap();
        fs::write(
            root.join("pocket_scores/wnv_e.txt"),
            "1 A 0.50\n2 A 0.45\n5 A 0.30\n",
        )
        .unwrap();
        fs::write(root.join("ligands/wnv_e/druga.pdbqt"), "REMARK ligand\n").unwrap();
        fs::write(root.join("ligands/wnv_e/drugb.pdbqt"), "REMARK ligand\n").unwrap();
    }

    fn config_for(root: &Path) -> ScreenConfig {
        ScreenConfig::with_workspace(root).unwrap()
    }

    #[test]
    fn full_run_produces_all_four_tables_and_a_report_section() {
        let dir = tempfile::tempdir().unwrap();
        seed_workspace(dir.path());
        let config = config_for(dir.path());

        let outcome = run(
            "wnv_e",
            &config,
            &FakeEngine::reliable(),
            None,
            &ProgressReporter::new(),
        )
        .unwrap();

        let summary = &outcome.summary;
        assert_eq!(summary.pockets, 2);
        assert_eq!(summary.degraded_centroids, 1);
        assert_eq!(summary.jobs_total, 4);
        assert_eq!(summary.jobs_failed, 0);
        assert_eq!(summary.logs_parsed, 4);
        assert_eq!(summary.scored_ligands, 2);
        assert_eq!(summary.ranked_rows, 2);

        let results = dir.path().join("results");
        for table in [
            "wnv_e_pockets.csv",
            "wnv_e_affinities.csv",
            "wnv_e_efficiency.csv",
            "wnv_e_ranked.csv",
        ] {
            assert!(results.join(table).is_file(), "missing {table}");
        }

        let report = fs::read_to_string(results.join("report.txt")).unwrap();
        assert!(report.contains("## wnv_e"));
        assert!(report.contains("[degraded-centroid] protein=wnv_e pocket=pocket2"));
    }

    #[test]
    fn affinity_table_keeps_every_job_while_efficiency_keeps_best_per_ligand() {
        let dir = tempfile::tempdir().unwrap();
        seed_workspace(dir.path());
        let config = config_for(dir.path());

        run(
            "wnv_e",
            &config,
            &FakeEngine::reliable(),
            None,
            &ProgressReporter::new(),
        )
        .unwrap();

        let results = dir.path().join("results");
        let affinities = fs::read_to_string(results.join("wnv_e_affinities.csv")).unwrap();
        assert_eq!(affinities.lines().count(), 5); // header + 2 ligands x 2 pockets

        let efficiency = fs::read_to_string(results.join("wnv_e_efficiency.csv")).unwrap();
        assert_eq!(efficiency.lines().count(), 3); // header + 1 row per ligand
        assert!(efficiency.contains("wnv_e,druga,-7.5,"));
        assert!(efficiency.contains("wnv_e,drugb,-6.2,"));
    }

    #[test]
    fn descriptor_table_feeds_efficiency_and_permeability_columns() {
        let dir = tempfile::tempdir().unwrap();
        seed_workspace(dir.path());
        let descriptors = dir.path().join("descriptors.csv");
        fs::write(
            &descriptors,
            "Molecule,#Heavy atoms,TPSA,Consensus Log P,WLOGP\nDrugA,20,80.0,2.0,2.5\n",
        )
        .unwrap();

        let config = ScreenConfigBuilder::new()
            .workspace_root(dir.path().to_path_buf())
            .descriptor_table(descriptors)
            .build()
            .unwrap();
        let table = load_descriptor_table(&config).unwrap();

        let outcome = run(
            "wnv_e",
            &config,
            &FakeEngine::reliable(),
            table.as_ref(),
            &ProgressReporter::new(),
        )
        .unwrap();

        // drugb has no descriptor row.
        assert_eq!(outcome.summary.descriptor_misses, 1);

        let efficiency =
            fs::read_to_string(dir.path().join("results/wnv_e_efficiency.csv")).unwrap();
        let druga_row = efficiency
            .lines()
            .find(|line| line.starts_with("wnv_e,druga"))
            .unwrap();
        // LE = 7.5 / 20; HIA and BBB both pass at TPSA 80 with WLOGP 2.5.
        assert!(druga_row.contains(",0.375,"));
        assert!(druga_row.ends_with(",true,true"));

        // druga carries an LLE, drugb does not, so druga ranks first.
        let ranked = fs::read_to_string(dir.path().join("results/wnv_e_ranked.csv")).unwrap();
        let mut lines = ranked.lines().skip(1);
        assert!(lines.next().unwrap().starts_with("1,wnv_e,druga"));
        assert!(lines.next().unwrap().starts_with("2,wnv_e,drugb"));
    }

    #[test]
    fn failed_jobs_are_reported_but_do_not_abort_the_run() {
        let dir = tempfile::tempdir().unwrap();
        seed_workspace(dir.path());
        let config = config_for(dir.path());

        let engine = FakeEngine {
            fail: vec!["drugb"],
        };
        let outcome = run("wnv_e", &config, &engine, None, &ProgressReporter::new()).unwrap();

        assert_eq!(outcome.summary.jobs_total, 4);
        assert_eq!(outcome.summary.jobs_failed, 2);
        assert_eq!(outcome.summary.logs_parsed, 2);
        assert_eq!(outcome.summary.scored_ligands, 1);

        let report = fs::read_to_string(dir.path().join("results/report.txt")).unwrap();
        assert!(report.contains("[job-failed] protein=wnv_e ligand=drugb pocket=pocket1"));
        assert!(report.contains("[job-failed] protein=wnv_e ligand=drugb pocket=pocket2"));
    }

    #[test]
    fn missing_score_stream_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        seed_workspace(dir.path());
        fs::remove_file(dir.path().join("pocket_scores/wnv_e.txt")).unwrap();
        let config = config_for(dir.path());

        let result = run(
            "wnv_e",
            &config,
            &FakeEngine::reliable(),
            None,
            &ProgressReporter::new(),
        );
        assert!(matches!(
            result,
            Err(EngineError::MissingScoreStream { .. })
        ));
    }

    #[test]
    fn empty_ligand_directory_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        seed_workspace(dir.path());
        fs::remove_file(dir.path().join("ligands/wnv_e/druga.pdbqt")).unwrap();
        fs::remove_file(dir.path().join("ligands/wnv_e/drugb.pdbqt")).unwrap();
        let config = config_for(dir.path());

        let result = run(
            "wnv_e",
            &config,
            &FakeEngine::reliable(),
            None,
            &ProgressReporter::new(),
        );
        assert!(matches!(result, Err(EngineError::EmptyLigandSet { .. })));
    }

    #[test]
    fn all_scores_at_or_below_threshold_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        seed_workspace(dir.path());
        fs::write(
            dir.path().join("pocket_scores/wnv_e.txt"),
            "1 A 0.10\n2 A 0.05\n",
        )
        .unwrap();
        let config = config_for(dir.path());

        let result = run(
            "wnv_e",
            &config,
            &FakeEngine::reliable(),
            None,
            &ProgressReporter::new(),
        );
        assert!(matches!(result, Err(EngineError::EmptyPocketList { .. })));
    }

    #[test]
    fn score_reuses_existing_logs_without_an_engine() {
        let dir = tempfile::tempdir().unwrap();
        let logs = dir.path().join("docking/wnv_e/logs");
        fs::create_dir_all(&logs).unwrap();
        fs::write(
            logs.join("wnv_e_druga_pocket1.log"),
            "mode |   affinity\n   1       -9.1      0.000\n",
        )
        .unwrap();
        let config = config_for(dir.path());

        let outcome = score("wnv_e", &config, None, &ProgressReporter::new()).unwrap();

        assert_eq!(outcome.summary.jobs_total, 0);
        assert_eq!(outcome.summary.pockets, 0);
        assert_eq!(outcome.summary.scored_ligands, 1);
        assert!(!dir.path().join("results/wnv_e_pockets.csv").exists());
        assert!(dir.path().join("results/wnv_e_efficiency.csv").is_file());
    }

    #[test]
    fn score_with_no_logs_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("docking/wnv_e/logs")).unwrap();
        let config = config_for(dir.path());

        let result = score("wnv_e", &config, None, &ProgressReporter::new());
        assert!(matches!(result, Err(EngineError::EmptyResultSet { .. })));
    }

    #[test]
    fn rerunning_overwrites_tables_and_appends_to_the_report() {
        let dir = tempfile::tempdir().unwrap();
        seed_workspace(dir.path());
        let config = config_for(dir.path());
        let engine = FakeEngine::reliable();

        let tables = [
            "results/wnv_e_pockets.csv",
            "results/wnv_e_affinities.csv",
            "results/wnv_e_efficiency.csv",
            "results/wnv_e_ranked.csv",
        ];

        run("wnv_e", &config, &engine, None, &ProgressReporter::new()).unwrap();
        let first: Vec<Vec<u8>> = tables
            .iter()
            .map(|table| fs::read(dir.path().join(table)).unwrap())
            .collect();

        run("wnv_e", &config, &engine, None, &ProgressReporter::new()).unwrap();
        for (table, before) in tables.iter().zip(&first) {
            let after = fs::read(dir.path().join(table)).unwrap();
            assert_eq!(&after, before, "{table} changed between identical runs");
        }

        let report = fs::read_to_string(dir.path().join("results/report.txt")).unwrap();
        assert_eq!(report.matches("## wnv_e").count(), 2);
    }

    #[test]
    fn discover_proteins_lists_sorted_receptor_stems() {
        let dir = tempfile::tempdir().unwrap();
        let receptors = dir.path().join("receptors");
        fs::create_dir_all(&receptors).unwrap();
        fs::write(receptors.join("zika_ns5.pdbqt"), "ATOM\n").unwrap();
        fs::write(receptors.join("wnv_e.pdbqt"), "ATOM\n").unwrap();
        fs::write(receptors.join("notes.txt"), "not a receptor\n").unwrap();
        let config = config_for(dir.path());

        let proteins = discover_proteins(&config).unwrap();
        assert_eq!(proteins, vec!["wnv_e", "zika_ns5"]);
    }
}
