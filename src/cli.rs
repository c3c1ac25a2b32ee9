use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::debug;

use crate::analyser::ProcessAnalyser;
use crate::context::RunContext;
use crate::pipeline;
use crate::preprocess::ScriptPreprocessor;

/// CLI for knowl-docgen: generate Knowl code docs for a project directory.
#[derive(Parser)]
#[clap(
    name = "knowl-docgen",
    version,
    about = "Generate Knowl Code Docs: provision analysis tooling and run it over a project"
)]
pub struct Cli {
    /// Directory path to process.
    pub directory: PathBuf,

    /// Django url conf.
    #[clap(short = 'u', long = "urlconf")]
    pub urlconf: String,

    /// Django settings conf.
    #[clap(short = 's', long = "settingsconf")]
    pub settingsconf: String,

    /// Skip remote tool acquisition and use locally available tooling.
    #[clap(short = 'l', long = "local")]
    pub local: bool,
}

/// Extracted async CLI logic entrypoint for integration tests and main().
pub async fn run(cli: Cli) -> Result<()> {
    let target_dir = std::fs::canonicalize(&cli.directory)
        .with_context(|| format!("cannot resolve target directory {:?}", cli.directory))?;

    let ctx = RunContext::new(&target_dir, cli.urlconf, cli.settingsconf, cli.local);
    ctx.trace_loaded();

    let preprocessor = ScriptPreprocessor::new(ScriptPreprocessor::locate(&ctx.tools_dir));
    let analyser = ProcessAnalyser::new(ctx.local, ctx.analyser_path.clone());

    println!("Documentation run starting...");
    match pipeline::run(&ctx, &preprocessor, &analyser).await {
        Ok(report) => {
            println!("Documentation run complete.\nReport:");
            println!("{:#?}", report);
            if let Ok(json) = serde_json::to_string_pretty(&report) {
                debug!(json = %json, "Pipeline report as JSON");
            }
            // Analyser failure is already logged by the pipeline and does
            // not set a distinct process exit code.
            Ok(())
        }
        Err(e) => {
            eprintln!("[ERROR] Documentation run failed: {}", e);
            Err(anyhow::Error::msg(e))
        }
    }
}
