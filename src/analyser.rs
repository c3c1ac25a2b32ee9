//! Supervised execution of the analyser as a child process.

use async_trait::async_trait;
use std::path::PathBuf;
use std::time::Duration;
use tokio::process::Command;
use tracing::info;

use crate::contract::{AnalyseRequest, Analyser, AnalyserError, AnalyserOutcome};

const LOCAL_INTERPRETER: &str = "python";
const LOCAL_ANALYSER_SCRIPT: &str = "python_analyser.py";

/// Runs the analyser binary (or, in local mode, a local script through the
/// Python interpreter) with `[target_dir, result_dir]` as positional
/// arguments and classifies the outcome by exit code.
pub struct ProcessAnalyser {
    local: bool,
    analyser_path: PathBuf,
    deadline: Option<Duration>,
}

impl ProcessAnalyser {
    /// `analyser_path` is the downloaded platform-specific binary; it is
    /// ignored in local mode, where a fixed interpreter-plus-script command
    /// is used instead.
    pub fn new(local: bool, analyser_path: PathBuf) -> Self {
        Self {
            local,
            analyser_path,
            deadline: None,
        }
    }

    /// Bound the analyser's runtime. Without a deadline a hung analyser
    /// blocks the pipeline indefinitely.
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }
}

#[async_trait]
impl Analyser for ProcessAnalyser {
    async fn run(&self, req: AnalyseRequest) -> Result<AnalyserOutcome, AnalyserError> {
        let mut command = if self.local {
            let mut c = Command::new(LOCAL_INTERPRETER);
            c.arg(LOCAL_ANALYSER_SCRIPT);
            c
        } else {
            Command::new(&self.analyser_path)
        };
        command.arg(&req.target_dir).arg(&req.result_dir);

        info!(
            local = self.local,
            target_dir = %req.target_dir.display(),
            "Spawning analyser process"
        );

        let mut child = command.spawn().map_err(AnalyserError::Spawn)?;

        let status = match self.deadline {
            Some(limit) => match tokio::time::timeout(limit, child.wait()).await {
                Ok(waited) => waited.map_err(AnalyserError::Spawn)?,
                Err(_) => {
                    let _ = child.kill().await;
                    return Err(AnalyserError::TimedOut(limit));
                }
            },
            None => child.wait().await.map_err(AnalyserError::Spawn)?,
        };

        Ok(AnalyserOutcome {
            exit_code: status.code(),
            success: status.success(),
        })
    }
}
