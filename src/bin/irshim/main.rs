//! irshim CLI - a reference host for the compiler and tool adapters

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use irshim::util::config::{global_config_path, load_config, project_config_path};
use irshim::Config;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("irshim=debug")
    } else {
        EnvFilter::new("irshim=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    let config = match cli.config {
        Some(ref path) => Config::load(path)?,
        None => {
            let cwd = std::env::current_dir()?;
            load_config(global_config_path().as_deref(), &project_config_path(&cwd))
        }
    };

    match cli.command {
        Commands::Backend(args) => commands::backend::execute(args, &config),
        Commands::Compile(args) => commands::compile::execute(args, &config),
        Commands::Run(args) => commands::run::execute(args, &config),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}
