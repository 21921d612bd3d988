use clap::Parser;
use std::path::Path;
use std::process::ExitCode;

mod cli;
mod error;
mod render;

use cli::Cli;
use dashboard_api::GitHubClient;
use dashboard_engine::{DashboardConfig, EvaluationContext, FormulaHost};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run(cli: &Cli) -> error::Result<()> {
    let input = std::fs::read_to_string(&cli.config)?;
    let config = DashboardConfig::load(&input)?;

    let client = GitHubClient::new(cli.token.clone());
    let host = FormulaHost::new();
    let mut ctx = EvaluationContext::new(&client, &host);

    let evaluated = config.dashboard.evaluate(&mut ctx).await?;
    let output = render::render(&evaluated, config.output.format)?;

    // The command line overrides the configured filename; with neither,
    // the output goes to stdout.
    let filename = cli
        .output
        .clone()
        .or_else(|| config.output.filename.as_deref().map(Into::into));

    write_output(filename.as_deref(), &output)
}

fn write_output(filename: Option<&Path>, output: &str) -> error::Result<()> {
    match filename {
        Some(path) => std::fs::write(path, output)?,
        None => print!("{output}"),
    }

    Ok(())
}
