mod cli;
mod config;
mod output;

use anyhow::{Context, Result};
use archive_core::{run_archive, RepoName};
use clap::error::ErrorKind;
use clap::Parser;
use cli::Cli;
use config::Config;
use github_source::{GitHubClient, HttpAssetTransport};
use output::{output_error, output_summary, output_usage};
use std::process::ExitCode;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            let _ = e.print();
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            let _ = e.print();
            output_usage();
            return ExitCode::from(1);
        }
    };

    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        output_error(&e);
        return ExitCode::from(1);
    }

    ExitCode::SUCCESS
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        _ => LevelFilter::DEBUG,
    };
    let env_filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let mut config = Config::load(cli.config.clone())?;
    config.merge_with_cli(&cli);
    config.validate()?;

    let repo = RepoName::new(cli.owner.as_str(), cli.repo.as_str());
    let out_dir = config.repo_output_dir(&repo.owner, &repo.name);

    let client = GitHubClient::with_base_url(&config.api_url, &repo.owner, &repo.name, config.token());
    let transport = HttpAssetTransport::new(config.asset_timeout());

    let summary = run_archive(
        &client,
        &transport,
        config.token(),
        &repo,
        &out_dir,
        &config.archive_options(),
    )
    .with_context(|| format!("archiving {}", repo))?;

    output_summary(&summary, &out_dir);
    Ok(())
}
