//! Drives the pipeline with mocked collaborators to pin down the
//! fatal-versus-recoverable failure policy.

use knowl_docgen::context::RunContext;
use knowl_docgen::contract::{
    AnalyserOutcome, MockAnalyser, MockPreprocessor, PreprocessError,
};
use knowl_docgen::pipeline;
use tempfile::tempdir;

fn local_context(target: &std::path::Path) -> RunContext {
    RunContext::new(target, "app.urls".into(), "app.settings".into(), true)
}

#[tokio::test]
async fn local_mode_happy_path_completes_without_network() {
    let target = tempdir().expect("tempdir");
    // Local mode skips tool acquisition entirely and the collaborators are
    // mocks, so no network call can occur.
    let ctx = local_context(target.path());

    let mut preprocessor = MockPreprocessor::new();
    preprocessor
        .expect_invoke()
        .times(1)
        .returning(|_| Ok(()));

    let mut analyser = MockAnalyser::new();
    analyser.expect_run().times(1).returning(|_| {
        Ok(AnalyserOutcome {
            exit_code: Some(0),
            success: true,
        })
    });

    let report = pipeline::run(&ctx, &preprocessor, &analyser)
        .await
        .expect("pipeline succeeds");

    assert!(report.preprocess_succeeded);
    let outcome = report.analyser.expect("analyser ran");
    assert!(outcome.success);
    assert_eq!(outcome.exit_code, Some(0));

    // Provisioning happened as part of the run.
    assert!(ctx.result_dir.is_dir());
    assert!(ctx.tools_dir.is_dir());
}

#[tokio::test]
async fn preprocessor_execution_error_still_runs_analyser() {
    let target = tempdir().expect("tempdir");
    let ctx = local_context(target.path());

    let mut preprocessor = MockPreprocessor::new();
    preprocessor
        .expect_invoke()
        .times(1)
        .returning(|_| Err(PreprocessError::Execution("extraction blew up".into())));

    // The analyser must still be invoked exactly once.
    let mut analyser = MockAnalyser::new();
    analyser.expect_run().times(1).returning(|_| {
        Ok(AnalyserOutcome {
            exit_code: Some(0),
            success: true,
        })
    });

    let report = pipeline::run(&ctx, &preprocessor, &analyser)
        .await
        .expect("execution failure is recoverable");

    assert!(!report.preprocess_succeeded);
    assert!(report.analyser.expect("analyser ran").success);
}

#[tokio::test]
async fn preprocessor_load_failure_aborts_before_analyser() {
    let target = tempdir().expect("tempdir");
    let ctx = local_context(target.path());

    let mut preprocessor = MockPreprocessor::new();
    preprocessor.expect_invoke().times(1).returning(|req| {
        Err(PreprocessError::Load {
            path: req.result_dir.join("preprocess_django.py"),
            reason: "script is not a regular file".into(),
        })
    });

    let mut analyser = MockAnalyser::new();
    analyser.expect_run().times(0);

    let err = pipeline::run(&ctx, &preprocessor, &analyser)
        .await
        .expect_err("load failure is fatal");
    assert!(err.contains("load"), "unexpected error: {err}");
}

#[tokio::test]
async fn analyser_exit_code_two_is_reported_not_raised() {
    let target = tempdir().expect("tempdir");
    let ctx = local_context(target.path());

    let mut preprocessor = MockPreprocessor::new();
    preprocessor.expect_invoke().times(1).returning(|_| Ok(()));

    let mut analyser = MockAnalyser::new();
    analyser.expect_run().times(1).returning(|_| {
        Ok(AnalyserOutcome {
            exit_code: Some(2),
            success: false,
        })
    });

    let report = pipeline::run(&ctx, &preprocessor, &analyser)
        .await
        .expect("analyser failure is the terminal state, not an error");

    let outcome = report.analyser.expect("analyser ran");
    assert_eq!(outcome.exit_code, Some(2));
    assert!(!outcome.success);
}

#[tokio::test]
async fn preprocessor_receives_conf_identifiers_opaquely() {
    let target = tempdir().expect("tempdir");
    let ctx = RunContext::new(target.path(), "proj.urls".into(), "proj.settings".into(), true);

    let mut preprocessor = MockPreprocessor::new();
    preprocessor
        .expect_invoke()
        .times(1)
        .withf(|req| req.urlconf == "proj.urls" && req.settingsconf == "proj.settings")
        .returning(|_| Ok(()));

    let mut analyser = MockAnalyser::new();
    analyser.expect_run().times(1).returning(|_| {
        Ok(AnalyserOutcome {
            exit_code: Some(0),
            success: true,
        })
    });

    pipeline::run(&ctx, &preprocessor, &analyser)
        .await
        .expect("pipeline succeeds");
}
