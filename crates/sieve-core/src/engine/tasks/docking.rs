use std::fs::File;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use rayon::prelude::*;
use tracing::{debug, info, instrument, warn};

use crate::core::models::job::DockingJob;
use crate::engine::config::DockingConfig;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::report::FailureKind;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// One docking invocation. Implementations run exactly one job to
/// completion (or failure) and leave the job's log file behind.
///
/// The production implementation spawns the external engine binary; tests
/// substitute a scripted stand-in so the driver's isolation and ordering
/// behavior can be exercised without a real engine.
pub trait DockingEngine: Sync {
    fn dock(&self, job: &DockingJob) -> Result<(), FailureKind>;
}

/// Spawns the configured engine binary as `<engine> --config <path>` with
/// stdout and stderr redirected to the job's log file.
///
/// The child is polled rather than waited on so the caller-supplied timeout
/// can be enforced; a child past its deadline is killed and reaped, and the
/// job is reported as timed out.
pub struct CommandEngine {
    binary: PathBuf,
    timeout: Duration,
}

impl CommandEngine {
    pub fn new(config: &DockingConfig) -> Self {
        Self {
            binary: config.engine.clone(),
            timeout: config.timeout,
        }
    }
}

impl DockingEngine for CommandEngine {
    fn dock(&self, job: &DockingJob) -> Result<(), FailureKind> {
        let log = File::create(&job.log_path).map_err(|e| FailureKind::Spawn {
            message: format!("cannot create log '{}': {}", job.log_path.display(), e),
        })?;
        let log_err = log.try_clone().map_err(|e| FailureKind::Spawn {
            message: e.to_string(),
        })?;

        let mut child = Command::new(&self.binary)
            .arg("--config")
            .arg(&job.config_path)
            .stdin(Stdio::null())
            .stdout(Stdio::from(log))
            .stderr(Stdio::from(log_err))
            .spawn()
            .map_err(|e| FailureKind::Spawn {
                message: e.to_string(),
            })?;

        let deadline = Instant::now() + self.timeout;
        loop {
            match child.try_wait() {
                Ok(Some(status)) => {
                    return if status.success() {
                        Ok(())
                    } else {
                        Err(FailureKind::NonZeroExit {
                            code: status.code(),
                        })
                    };
                }
                Ok(None) => {
                    if Instant::now() >= deadline {
                        let _ = child.kill();
                        let _ = child.wait();
                        return Err(FailureKind::TimedOut {
                            limit: self.timeout,
                        });
                    }
                    thread::sleep(POLL_INTERVAL);
                }
                Err(e) => {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(FailureKind::Spawn {
                        message: e.to_string(),
                    });
                }
            }
        }
    }
}

/// The result of one job, in matrix order.
#[derive(Debug, Clone, PartialEq)]
pub struct JobOutcome {
    pub protein: String,
    pub ligand: String,
    pub pocket: String,
    pub result: Result<(), FailureKind>,
}

/// Runs every job through the engine on a pool of `workers` threads.
///
/// Failure isolation: each job's result is captured in its outcome and
/// never propagated, so one crashed or timed-out invocation cannot abort
/// its siblings. Outcomes come back in job order regardless of completion
/// order.
#[instrument(skip_all, name = "docking_task")]
pub fn run(
    engine: &dyn DockingEngine,
    jobs: &[DockingJob],
    workers: usize,
    reporter: &ProgressReporter,
) -> Vec<JobOutcome> {
    if jobs.is_empty() {
        return Vec::new();
    }

    info!(num_jobs = jobs.len(), workers, "Dispatching docking jobs.");
    reporter.report(Progress::BatchStart {
        total_steps: jobs.len() as u64,
    });

    let dock_one = |job: &DockingJob| {
        debug!(stem = %job.stem(), "Invoking docking engine.");
        let result = engine.dock(job);
        if let Err(kind) = &result {
            warn!(stem = %job.stem(), reason = %kind, "Docking job failed.");
        }
        reporter.report(Progress::BatchIncrement);
        JobOutcome {
            protein: job.protein.clone(),
            ligand: job.ligand.clone(),
            pocket: job.pocket.label(),
            result,
        }
    };

    let outcomes = match rayon::ThreadPoolBuilder::new().num_threads(workers).build() {
        Ok(pool) => pool.install(|| jobs.par_iter().map(dock_one).collect()),
        Err(e) => {
            warn!(error = %e, "Worker pool unavailable; docking sequentially.");
            jobs.iter().map(dock_one).collect()
        }
    };

    reporter.report(Progress::BatchFinish);

    outcomes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::pocket::Pocket;
    use std::collections::HashSet;

    fn job(ligand: &str, pocket_id: usize) -> DockingJob {
        DockingJob {
            protein: "wnv_e".to_string(),
            ligand: ligand.to_string(),
            pocket: Pocket::new(pocket_id, vec![1, 2]),
            receptor_path: PathBuf::from("r.pdbqt"),
            ligand_path: PathBuf::from("l.pdbqt"),
            config_path: PathBuf::from("c.txt"),
            output_path: PathBuf::from("o.pdbqt"),
            log_path: PathBuf::from("l.log"),
        }
    }

    struct ScriptedEngine {
        failing: HashSet<String>,
    }

    impl ScriptedEngine {
        fn failing_on(stems: &[&str]) -> Self {
            Self {
                failing: stems.iter().map(|s| s.to_string()).collect(),
            }
        }
    }

    impl DockingEngine for ScriptedEngine {
        fn dock(&self, job: &DockingJob) -> Result<(), FailureKind> {
            if self.failing.contains(&job.stem()) {
                Err(FailureKind::NonZeroExit { code: Some(1) })
            } else {
                Ok(())
            }
        }
    }

    #[test]
    fn one_failure_does_not_abort_the_rest() {
        let engine = ScriptedEngine::failing_on(&["wnv_e_drugb_pocket1"]);
        let jobs = vec![job("druga", 1), job("drugb", 1), job("drugc", 1)];

        let outcomes = run(&engine, &jobs, 2, &ProgressReporter::new());

        assert_eq!(outcomes.len(), 3);
        assert!(outcomes[0].result.is_ok());
        assert_eq!(
            outcomes[1].result,
            Err(FailureKind::NonZeroExit { code: Some(1) })
        );
        assert!(outcomes[2].result.is_ok());
    }

    #[test]
    fn outcomes_preserve_matrix_order() {
        let engine = ScriptedEngine::failing_on(&[]);
        let jobs: Vec<DockingJob> = (1..=8).map(|i| job("lig", i)).collect();

        let outcomes = run(&engine, &jobs, 4, &ProgressReporter::new());

        let pockets: Vec<String> = outcomes.iter().map(|o| o.pocket.clone()).collect();
        let expected: Vec<String> = (1..=8).map(|i| format!("pocket{i}")).collect();
        assert_eq!(pockets, expected);
    }

    #[test]
    fn empty_matrix_is_a_no_op() {
        let engine = ScriptedEngine::failing_on(&[]);
        assert!(run(&engine, &[], 4, &ProgressReporter::new()).is_empty());
    }

    #[cfg(unix)]
    mod subprocess {
        use super::*;
        use std::fs;
        use std::os::unix::fs::PermissionsExt;

        fn scripted_binary(dir: &std::path::Path, body: &str) -> PathBuf {
            let path = dir.join("fake-engine.sh");
            fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
            fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
            path
        }

        fn engine_for(binary: PathBuf, timeout: Duration) -> CommandEngine {
            CommandEngine {
                binary,
                timeout,
            }
        }

        fn job_in(dir: &std::path::Path) -> DockingJob {
            let mut j = job("druga", 1);
            j.log_path = dir.join("druga.log");
            j
        }

        #[test]
        fn successful_engine_output_lands_in_the_log() {
            let dir = tempfile::tempdir().unwrap();
            let binary = scripted_binary(dir.path(), "echo '   1   -7.5   0.000   0.000'");
            let engine = engine_for(binary, Duration::from_secs(10));
            let job = job_in(dir.path());

            engine.dock(&job).unwrap();

            let log = fs::read_to_string(&job.log_path).unwrap();
            assert!(log.contains("-7.5"));
        }

        #[test]
        fn non_zero_exit_is_reported_with_its_code() {
            let dir = tempfile::tempdir().unwrap();
            let binary = scripted_binary(dir.path(), "exit 3");
            let engine = engine_for(binary, Duration::from_secs(10));

            let result = engine.dock(&job_in(dir.path()));
            assert_eq!(result, Err(FailureKind::NonZeroExit { code: Some(3) }));
        }

        #[test]
        fn missing_binary_is_a_spawn_failure() {
            let dir = tempfile::tempdir().unwrap();
            let engine = engine_for(dir.path().join("does-not-exist"), Duration::from_secs(10));

            assert!(matches!(
                engine.dock(&job_in(dir.path())),
                Err(FailureKind::Spawn { .. })
            ));
        }

        #[test]
        fn overrunning_child_is_killed_and_reported_as_timed_out() {
            let dir = tempfile::tempdir().unwrap();
            let binary = scripted_binary(dir.path(), "sleep 30");
            let timeout = Duration::from_millis(300);
            let engine = engine_for(binary, timeout);

            let started = Instant::now();
            let result = engine.dock(&job_in(dir.path()));

            assert_eq!(result, Err(FailureKind::TimedOut { limit: timeout }));
            assert!(started.elapsed() < Duration::from_secs(5));
        }
    }
}
