use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use tracing::error;
use tracing_subscriber::EnvFilter;

use chainmap_sync::clients::{HttpChainSource, HttpMapTarget};
use chainmap_sync::config::SyncConfig;
use chainmap_sync::doctor;
use chainmap_sync::sync::{report_outcome, run_cycle, run_loop};

#[derive(Parser, Debug)]
#[command(name = "chainmap-sync", about = "Wormhole chain map synchronizer")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sync continuously on the configured poll interval.
    Run(RunArgs),
    /// Run a single sync cycle and exit.
    Once(RunArgs),
    /// Probe connectivity to both services and report.
    Doctor,
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Build and print the snapshot without touching the target map.
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();

    let config = match SyncConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            error!(error = %err, "configuration is invalid");
            return ExitCode::FAILURE;
        }
    };

    let source = match HttpChainSource::new(&config) {
        Ok(source) => source,
        Err(err) => {
            error!(error = %err, "failed to build source client");
            return ExitCode::FAILURE;
        }
    };
    let target = match HttpMapTarget::new(&config) {
        Ok(target) => target,
        Err(err) => {
            error!(error = %err, "failed to build target client");
            return ExitCode::FAILURE;
        }
    };

    match cli.command {
        Command::Run(args) => {
            run_loop(&source, &target, &config, args.dry_run).await;
            ExitCode::SUCCESS
        }
        Command::Once(args) => {
            match run_cycle(&source, &target, &config, args.dry_run).await {
                Ok(outcome) => {
                    report_outcome(&outcome);
                    ExitCode::SUCCESS
                }
                Err(err) => {
                    error!(error = %err, "sync cycle failed");
                    ExitCode::FAILURE
                }
            }
        }
        Command::Doctor => {
            let report = doctor::diagnose(&source, &target, &config).await;
            match serde_json::to_string_pretty(&report) {
                Ok(rendered) => println!("{rendered}"),
                Err(err) => {
                    error!(error = %err, "failed to render doctor report");
                    return ExitCode::FAILURE;
                }
            }
            if report.healthy() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
    }
}
