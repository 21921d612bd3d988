//! CLI argument parsing using clap derive macros.

use clap::Parser;
use std::path::PathBuf;

/// ghdash - generate issue dashboards from declarative configuration
#[derive(Parser, Debug)]
#[command(name = "ghdash")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the dashboard configuration (JSON or YAML)
    #[arg(short, long)]
    pub config: PathBuf,

    /// GitHub API token for authenticated (higher rate limit) queries
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Write output here instead of the configuration's `output.filename`
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}
