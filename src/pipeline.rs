//! High-level pipeline: provision → acquire tools → preprocess → analyse.
//!
//! This module provides the top-level orchestration for a single
//! documentation run. The sequence is strictly linear with no retries:
//!   - Provision the result and tools directories (fatal on failure)
//!   - Download the analyser binary and preprocessor script, skipped
//!     entirely in local mode (fatal on failure)
//!   - Invoke the preprocessor: a load failure aborts the run, an execution
//!     failure is logged and the pipeline continues
//!   - Run the analyser and classify its exit code; never fatal, it is the
//!     terminal step
//!
//! # Callable from
//! Used by the CLI and by integration tests, which inject mock
//! [`Preprocessor`]/[`Analyser`] implementations.
//!
//! # Error handling
//! Fatal steps return immediately with a formatted error; recoverable
//! failures are logged with context and recorded on the [`PipelineReport`].

use tracing::{error, info};

use crate::context::RunContext;
use crate::contract::{
    AnalyseRequest, Analyser, AnalyserOutcome, PreprocessError, PreprocessRequest, Preprocessor,
};
use crate::fetch::download_tools;
use crate::provision::ensure_directory;

/// What actually happened during a run, for the caller's final summary.
#[derive(Debug, serde::Serialize)]
pub struct PipelineReport {
    pub preprocess_succeeded: bool,
    /// `None` when the analyser could not be spawned or timed out.
    pub analyser: Option<AnalyserOutcome>,
}

pub async fn run<P, A>(
    ctx: &RunContext,
    preprocessor: &P,
    analyser: &A,
) -> Result<PipelineReport, String>
where
    P: Preprocessor + Sync,
    A: Analyser + Sync,
{
    info!("--New Run--");
    info!(dir = %ctx.target_dir.display(), "[DOCGEN] Processing directory");

    // Step 1: Provision directories.
    if let Err(e) = ensure_directory(&ctx.result_dir) {
        error!(error = ?e, path = %ctx.result_dir.display(), "[DOCGEN][ERROR] Failed to provision result dir");
        return Err(format!("Failed to provision result dir: {e}"));
    }
    if let Err(e) = ensure_directory(&ctx.tools_dir) {
        error!(error = ?e, path = %ctx.tools_dir.display(), "[DOCGEN][ERROR] Failed to provision tools dir");
        return Err(format!("Failed to provision tools dir: {e}"));
    }

    // Step 2: Tool acquisition, a hard prerequisite unless local mode.
    if ctx.local {
        info!("[DOCGEN] Local mode: skipping tool download");
    } else {
        info!("[DOCGEN] --getting tools--");
        if let Err(e) = download_tools(ctx).await {
            error!(error = %e, "[DOCGEN][ERROR] Tool acquisition failed");
            return Err(format!("Tool acquisition failed: {e}"));
        }
    }

    // Step 3: Endpoint extraction. A preprocessor that cannot be loaded
    // makes the tool unusable; one that errors on this codebase does not
    // block the analysis that can still happen.
    info!("[DOCGEN] --getting endpoints--");
    let request = PreprocessRequest {
        target_dir: ctx.target_dir.clone(),
        result_dir: ctx.result_dir.clone(),
        urlconf: ctx.urlconf.clone(),
        settingsconf: ctx.settingsconf.clone(),
    };
    let preprocess_succeeded = match preprocessor.invoke(request).await {
        Ok(()) => {
            info!("[DOCGEN] Endpoint extraction succeeded");
            true
        }
        Err(e @ PreprocessError::Load { .. }) => {
            error!(error = %e, "[DOCGEN][ERROR] Failed to load the preprocessor");
            return Err(format!("Failed to load the preprocessor: {e}"));
        }
        Err(e) => {
            error!(error = %e, "[DOCGEN][ERROR] An error occurred during getting endpoints");
            false
        }
    };

    // Step 4: Run the analyser. Terminal step; failure ends the run with a
    // failure indication but is never escalated.
    info!("[DOCGEN] --running analyser--");
    let outcome = match analyser
        .run(AnalyseRequest {
            target_dir: ctx.target_dir.clone(),
            result_dir: ctx.result_dir.clone(),
        })
        .await
    {
        Ok(outcome) => {
            if outcome.success {
                info!("[DOCGEN] Analyser completed successfully.");
            } else {
                error!(
                    exit_code = ?outcome.exit_code,
                    "[DOCGEN][ERROR] Analyser failed with return code {:?}.",
                    outcome.exit_code
                );
            }
            Some(outcome)
        }
        Err(e) => {
            error!(error = %e, "[DOCGEN][ERROR] An error occurred during the analyser run");
            None
        }
    };

    Ok(PipelineReport {
        preprocess_succeeded,
        analyser: outcome,
    })
}
