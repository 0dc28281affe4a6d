//! up: regenerate workspace artifacts from Lua declaration files.
//!
//! Each origin path passed on the command line contains an `up.lua` file
//! declaring source modules and jar libraries. One run regenerates the
//! build-target file, the path-alias file, the symlink farm, and the IDE
//! project descriptors from those declarations.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use uplua_lib::eval::{EvalError, evaluate_origins};
use uplua_lib::fetch::HashFetcher;
use uplua_lib::generate::generate;

mod output;

/// Regenerate build targets, path aliases, the symlink farm, and IDE
/// descriptors from `up.lua` declaration files.
#[derive(Parser)]
#[command(name = "up", version, about, long_about = None)]
struct Cli {
  /// Origin paths containing `up.lua` declaration files, relative to the
  /// current directory.
  #[arg(required = true)]
  origins: Vec<String>,
}

// Helper to convert EvalError to anyhow::Error (works around mlua not being Send+Sync)
fn map_eval_err<T>(result: Result<T, EvalError>) -> Result<T> {
  result.map_err(|e| anyhow::anyhow!("{}", e))
}

fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .without_time()
    .init();

  let cli = Cli::parse();
  let root_dir: PathBuf = std::env::current_dir().context("cannot determine working directory")?;

  output::banner(&cli.origins);

  let registry = map_eval_err(evaluate_origins(&root_dir, &cli.origins))?;

  let fetcher = HashFetcher::from_env();
  info!(root = %root_dir.display(), repo = %fetcher.repo_url(), "starting generation");

  let rt = tokio::runtime::Runtime::new().context("failed to create async runtime")?;
  rt.block_on(generate(&root_dir, &registry, &fetcher))
    .context("generation failed")?;

  output::summary(&registry);
  output::final_hints();
  Ok(())
}
