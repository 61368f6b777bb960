mod charts;
mod cli;
mod error;
mod filter;
mod fmt;
mod insights;
mod kpis;
mod loader;
mod models;
mod settings;
mod snapshot;
mod tui;

use clap::Parser;

use cli::{Cli, Commands, SourceArgs};

fn init_logging(verbose: bool) {
    let filter = if verbose {
        tracing_subscriber::EnvFilter::from_default_env()
            .add_directive(tracing::Level::DEBUG.into())
    } else {
        tracing_subscriber::EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        None => cli::dashboard::run(&SourceArgs::default()),
        Some(Commands::Dashboard { source }) => cli::dashboard::run(&source),
        Some(Commands::Summary { source, filter }) => cli::summary::run(&source, &filter),
        Some(Commands::Export {
            source,
            filter,
            output,
        }) => cli::export::run(&source, &filter, output),
        Some(Commands::Status { source }) => cli::status::run(&source),
        Some(Commands::Load { path, sheet }) => cli::load::run(&path, sheet),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
