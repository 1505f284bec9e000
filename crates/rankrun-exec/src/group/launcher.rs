use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace};

use rankrun_core::launcher::{GroupLauncher, LaunchError};
use rankrun_model::LaunchPlan;

use crate::{group::output::prepare_output_dir, process::run_to_completion, utils::resolve_program};

/// Runs a [`LaunchPlan`] through an `mpiexec`-compatible executable.
///
/// The launcher fans out the peers itself and reports one exit status for the whole group;
/// this type only starts it and waits.
#[derive(Debug, Default, Clone, Copy)]
pub struct MpiexecLauncher;

impl MpiexecLauncher {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl GroupLauncher for MpiexecLauncher {
    fn name(&self) -> &'static str {
        "mpiexec"
    }

    async fn launch(
        &self,
        plan: &LaunchPlan,
        cancel: CancellationToken,
    ) -> Result<i32, LaunchError> {
        let program = resolve_program(plan.program()).ok_or_else(|| LaunchError::NotFound {
            program: plan.program().to_string(),
        })?;
        trace!(resolved = %program.display(), "group launcher resolved");

        let removed = prepare_output_dir(plan.template()).await?;
        if removed > 0 {
            debug!(removed, template = %plan.template(), "stale rank output removed");
        }

        info!(
            program = %program.display(),
            flavor = %plan.flavor(),
            workers = plan.worker_count(),
            "starting process group"
        );
        let code = run_to_completion(&program, plan.argv(), &cancel).await?;
        info!(code, "process group terminated");
        Ok(code)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::group::{
        VersionProbe,
        testkit::{FAKE_HYDRA, FAKE_OPENRTE, PEER_FAILS_ON_RANK_2, write_script},
    };

    use std::{fs, path::Path, sync::Arc, time::Duration};

    use rankrun_core::prelude::*;
    use rankrun_model::{OutputTemplate, RuntimeFlavor};
    use tempfile::TempDir;

    fn ok_peer() -> Vec<String> {
        vec!["sh".into(), "-c".into(), "echo starting; echo OK".into()]
    }

    fn failing_peer() -> Vec<String> {
        vec!["sh".into(), "-c".into(), PEER_FAILS_ON_RANK_2.into()]
    }

    fn harness_for(launcher_exe: &Path) -> Harness {
        let program = launcher_exe.to_str().unwrap().to_string();
        Harness::new(
            PlanBuilder::new(program.clone()),
            Arc::new(VersionProbe::new(program)),
            Arc::new(MpiexecLauncher::new()),
        )
    }

    fn request(out: &Path, command: Vec<String>) -> RunRequest {
        RunRequest {
            worker_count: 4,
            template: OutputTemplate::new(out, "py3", "group").unwrap(),
            command,
        }
    }

    #[tokio::test]
    async fn all_peers_pass_openrte() {
        let tmp = TempDir::new().unwrap();
        let exe = write_script(tmp.path(), "mpiexec", FAKE_OPENRTE);
        let out = tmp.path().join("out");
        let h = harness_for(&exe);

        let result = h
            .run(&request(&out, ok_peer()), CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(h.flavor().await, RuntimeFlavor::OpenRte);
        assert_eq!(result.exit_code, 0);
        assert_eq!(result.per_rank.len(), 4);
        for (i, rank) in result.per_rank.iter().enumerate() {
            assert_eq!(rank.rank, i as u32);
            assert_eq!(rank.tail_line.as_deref(), Some("OK"));
            assert!(rank.stdout_path.as_ref().unwrap().ends_with(format!("py3-group.{i}")));
        }

        let summary = Summary(&result).render();
        assert_eq!(summary.matches("\nOK\n").count(), 4);
        assert!(summary.ends_with("4 rank(s), group exit code 0: PASS"));
    }

    #[tokio::test]
    async fn failing_rank_propagates_exit_code_hydra() {
        let tmp = TempDir::new().unwrap();
        let exe = write_script(tmp.path(), "mpiexec", FAKE_HYDRA);
        let out = tmp.path().join("out");
        let h = harness_for(&exe);

        let result = h
            .run(&request(&out, failing_peer()), CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(h.flavor().await, RuntimeFlavor::Hydra);
        assert_eq!(result.exit_code, 3);
        assert_eq!(
            result.per_rank[2].tail_line.as_deref(),
            Some("FAIL: assertion x")
        );
        for rank in [0, 1, 3] {
            assert_eq!(result.per_rank[rank].tail_line.as_deref(), Some("OK"));
            assert!(result.per_rank[rank].stderr_path.is_some());
            assert_eq!(result.per_rank[rank].stderr_tail, None);
        }

        let summary = Summary(&result).render();
        assert!(summary.contains("py3-group.2.stdout <==\nFAIL: assertion x\n"));
        assert!(summary.ends_with("group exit code 3: FAIL"));
    }

    #[tokio::test]
    async fn missing_launcher_fails_before_touching_output_dir() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("out");
        let h = Harness::new(
            PlanBuilder::new("rankrun-no-such-launcher"),
            Arc::new(VersionProbe::new("rankrun-no-such-launcher")),
            Arc::new(MpiexecLauncher::new()),
        );

        let err = h
            .run(&request(&out, ok_peer()), CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, CoreError::Launch(LaunchError::NotFound { .. })));
        assert!(!out.exists());
    }

    #[tokio::test]
    async fn stale_output_is_removed_before_launch() {
        let tmp = TempDir::new().unwrap();
        let exe = write_script(tmp.path(), "mpiexec", FAKE_OPENRTE);
        let out = tmp.path().join("out");
        fs::create_dir_all(&out).unwrap();
        // left over from an earlier 8-rank run
        fs::write(out.join("py3-group.7"), "FAIL: stale\n").unwrap();
        fs::write(out.join("py3-group-coverage.0"), "keep\n").unwrap();

        let result = harness_for(&exe)
            .run(&request(&out, ok_peer()), CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(result.per_rank.len(), 4);
        assert!(!out.join("py3-group.7").exists());
        assert!(out.join("py3-group-coverage.0").exists());
    }

    #[tokio::test]
    async fn peer_without_output_is_reported_missing() {
        let tmp = TempDir::new().unwrap();
        // Writes files only for ranks 0, 1 and 3.
        let exe = write_script(
            tmp.path(),
            "mpiexec",
            r#"#!/bin/sh
shift 2; shift; out="$1"; shift
for r in 0 1 3; do RANK=$r "$@" > "$out.$r" 2>&1; done
"#,
        );
        let out = tmp.path().join("out");
        let plan = PlanBuilder::new(exe.to_str().unwrap())
            .build(
                RuntimeFlavor::OpenRte,
                4,
                OutputTemplate::new(&out, "py3", "plain").unwrap(),
                ok_peer(),
            )
            .unwrap();

        let code = MpiexecLauncher::new()
            .launch(&plan, CancellationToken::new())
            .await
            .unwrap();
        let ranks = collect(plan.template(), plan.worker_count());

        assert_eq!(code, 0);
        assert_eq!(ranks.len(), 4);
        assert!(ranks[2].is_missing());
        assert_eq!(ranks[3].tail_line.as_deref(), Some("OK"));
    }

    #[tokio::test]
    async fn cancellation_kills_the_launcher() {
        let tmp = TempDir::new().unwrap();
        let exe = write_script(tmp.path(), "mpiexec", "#!/bin/sh\nexec sleep 30\n");
        let plan = PlanBuilder::new(exe.to_str().unwrap())
            .build(
                RuntimeFlavor::OpenRte,
                1,
                OutputTemplate::new(tmp.path().join("out"), "py3", "plain").unwrap(),
                ok_peer(),
            )
            .unwrap();

        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            trigger.cancel();
        });

        let err = tokio::time::timeout(
            Duration::from_secs(10),
            MpiexecLauncher::new().launch(&plan, cancel),
        )
        .await
        .expect("launch must return promptly after cancellation")
        .unwrap_err();
        assert!(matches!(err, LaunchError::Interrupted));
    }
}
