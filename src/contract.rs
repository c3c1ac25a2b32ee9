//! # contract: interfaces between the pipeline driver and its collaborators
//!
//! The driver never resolves its collaborators at run time: the preprocessor
//! and the analyser are injected as trait objects/generics at construction.
//! This module defines those traits plus the plain data types that cross the
//! boundary.
//!
//! ## Mocking & testing
//! Both traits are annotated for `mockall`, so integration tests can drive
//! the pipeline with deterministic collaborators and no network or child
//! processes. The mocks are exported under the `test-export-mocks` feature.

use async_trait::async_trait;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

#[cfg(any(test, feature = "test-export-mocks"))]
use mockall::automock;

/// Everything the preprocessor entry point receives for one invocation.
#[derive(Debug, Clone)]
pub struct PreprocessRequest {
    pub target_dir: PathBuf,
    pub result_dir: PathBuf,
    pub urlconf: String,
    pub settingsconf: String,
}

/// Failure modes of a preprocessor invocation.
///
/// The pipeline treats `Load` as fatal (a missing preprocessor means the
/// tool is unusable) and everything else as recoverable: a preprocessor that
/// errors on a particular codebase must not block analysis that can still
/// happen.
#[derive(Debug)]
pub enum PreprocessError {
    /// The script could not be located or read at its expected path.
    Load { path: PathBuf, reason: String },
    /// Launching the interpreter failed.
    Spawn(std::io::Error),
    /// The entry point ran and reported failure.
    Execution(String),
}

impl fmt::Display for PreprocessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PreprocessError::Load { path, reason } => {
                write!(f, "failed to load preprocessor {}: {}", path.display(), reason)
            }
            PreprocessError::Spawn(e) => write!(f, "failed to launch preprocessor: {}", e),
            PreprocessError::Execution(msg) => {
                write!(f, "error during endpoint extraction: {}", msg)
            }
        }
    }
}

impl std::error::Error for PreprocessError {}

/// External component that extracts route/URL definitions from the target
/// project before analysis.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait Preprocessor: Send + Sync {
    /// Invoke the preprocessor entry point with the run's directories and
    /// conf identifiers, writing intermediate artifacts into the result dir.
    async fn invoke(&self, req: PreprocessRequest) -> Result<(), PreprocessError>;
}

/// Positional arguments handed to the analyser process.
#[derive(Debug, Clone)]
pub struct AnalyseRequest {
    pub target_dir: PathBuf,
    pub result_dir: PathBuf,
}

/// How an analyser process ended.
#[derive(Debug, Clone, Copy, serde::Serialize)]
pub struct AnalyserOutcome {
    /// Exit code of the child; `None` when terminated by a signal.
    pub exit_code: Option<i32>,
    pub success: bool,
}

/// Failure to observe an analyser outcome at all.
#[derive(Debug)]
pub enum AnalyserError {
    /// The child process could not be spawned or waited on.
    Spawn(std::io::Error),
    /// The child did not finish within the configured deadline and was killed.
    TimedOut(Duration),
}

impl fmt::Display for AnalyserError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalyserError::Spawn(e) => write!(f, "failed to run analyser: {}", e),
            AnalyserError::TimedOut(limit) => {
                write!(f, "analyser exceeded deadline of {:?} and was killed", limit)
            }
        }
    }
}

impl std::error::Error for AnalyserError {}

/// External executable that inspects source code and writes its findings
/// into the result directory, signalling success via a zero exit code.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait Analyser: Send + Sync {
    /// Run the analyser over the target and block until it exits.
    async fn run(&self, req: AnalyseRequest) -> Result<AnalyserOutcome, AnalyserError>;
}
