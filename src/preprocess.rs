//! Bridge to the external route-extraction preprocessor.
//!
//! The preprocessor is a Python script downloaded into (or already present
//! in) the tools directory. Its entry point takes the target directory, the
//! result directory and the two conf identifiers, and writes intermediate
//! artifacts into the result directory.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::{debug, info};

use crate::context::PREPROCESSOR_FILE_NAME;
use crate::contract::{PreprocessError, PreprocessRequest, Preprocessor};

const PYTHON_INTERPRETER: &str = "python";

/// Runs the preprocessor script through the Python interpreter.
pub struct ScriptPreprocessor {
    script_path: PathBuf,
}

impl ScriptPreprocessor {
    pub fn new(script_path: PathBuf) -> Self {
        Self { script_path }
    }

    /// Expected path of the preprocessor script within the tools directory.
    ///
    /// Does not touch the filesystem; existence is verified when the script
    /// is loaded for invocation.
    pub fn locate(tools_dir: &Path) -> PathBuf {
        tools_dir.join(PREPROCESSOR_FILE_NAME)
    }
}

#[async_trait]
impl Preprocessor for ScriptPreprocessor {
    async fn invoke(&self, req: PreprocessRequest) -> Result<(), PreprocessError> {
        // Load step: a script that cannot be found makes the tool unusable.
        if !self.script_path.is_file() {
            return Err(PreprocessError::Load {
                path: self.script_path.clone(),
                reason: "script is not a regular file".into(),
            });
        }

        info!(script = %self.script_path.display(), "Invoking preprocessor");
        debug!(?req, "Preprocessor request");

        let status = Command::new(PYTHON_INTERPRETER)
            .arg(&self.script_path)
            .arg(&req.target_dir)
            .arg(&req.result_dir)
            .arg(&req.urlconf)
            .arg(&req.settingsconf)
            .status()
            .await
            .map_err(PreprocessError::Spawn)?;

        if status.success() {
            info!("Preprocessor completed successfully");
            Ok(())
        } else {
            Err(PreprocessError::Execution(format!(
                "preprocessor exited with status {}",
                status
            )))
        }
    }
}
