use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod app;

fn main() -> ExitCode {
    // initialize tracing; library `log` records are forwarded too
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = app::Args::parse();
    tracing::debug!(?args, "starting match");

    match app::run(&args) {
        Ok(summary) => {
            println!("{summary}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!("{err}");
            ExitCode::FAILURE
        }
    }
}
