use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// All state for a single documentation run.
///
/// Every derived path is a deterministic function of the target directory,
/// computed once here and never recomputed mid-run.
#[derive(Debug, Clone, Serialize)]
pub struct RunContext {
    /// Absolute path to the project being processed.
    pub target_dir: PathBuf,
    /// `<target>/knowl_results` - where all output lands.
    pub result_dir: PathBuf,
    /// `<result>/knowl_tools` - where downloaded tooling lives.
    pub tools_dir: PathBuf,
    /// Expected location of the preprocessor script inside the tools dir.
    pub preprocessor_path: PathBuf,
    /// Expected location of the analyser binary inside the tools dir.
    pub analyser_path: PathBuf,
    /// Url conf identifier, passed through opaquely to the preprocessor.
    pub urlconf: String,
    /// Settings conf identifier, passed through opaquely to the preprocessor.
    pub settingsconf: String,
    /// Skip remote tool acquisition and use locally available tooling.
    pub local: bool,
}

pub const RESULT_DIR_NAME: &str = "knowl_results";
pub const TOOLS_DIR_NAME: &str = "knowl_tools";
pub const PREPROCESSOR_FILE_NAME: &str = "preprocess_django.py";
pub const ANALYSER_FILE_NAME: &str = "analyser";

impl RunContext {
    pub fn new(target_dir: &Path, urlconf: String, settingsconf: String, local: bool) -> Self {
        let result_dir = target_dir.join(RESULT_DIR_NAME);
        let tools_dir = result_dir.join(TOOLS_DIR_NAME);
        let preprocessor_path = tools_dir.join(PREPROCESSOR_FILE_NAME);
        let analyser_path = tools_dir.join(ANALYSER_FILE_NAME);
        Self {
            target_dir: target_dir.to_path_buf(),
            result_dir,
            tools_dir,
            preprocessor_path,
            analyser_path,
            urlconf,
            settingsconf,
            local,
        }
    }

    pub fn trace_loaded(&self) {
        info!(
            target_dir = %self.target_dir.display(),
            result_dir = %self.result_dir.display(),
            local = self.local,
            "Loaded run context"
        );
        debug!(?self, "Run context (full debug)");
    }
}
