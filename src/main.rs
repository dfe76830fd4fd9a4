mod canvas;
mod chemistry;
mod config;
mod ctl;
mod ipc;
mod power;
mod renderer;
mod status;
mod wayland;

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "voltie", version, about = "Lightweight Wayland layer-shell battery status widget")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override text size in px
    #[arg(long)]
    font_size: Option<f32>,

    /// Override battery poll interval in seconds
    #[arg(long)]
    interval: Option<u64>,

    /// Override IPC socket path
    #[arg(long)]
    socket: Option<PathBuf>,

    /// Generate shell completions and exit
    #[arg(long, value_name = "SHELL")]
    completions: Option<Shell>,

    #[command(subcommand)]
    command: Option<CliCommand>,
}

#[derive(Subcommand, Debug)]
enum CliCommand {
    /// Control a running voltie instance
    Ctl(ctl::CtlArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(CliCommand::Ctl(args)) => ctl::run(args),
        None => run_daemon(cli),
    }
}

fn run_daemon(args: Cli) -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Some(shell) = args.completions {
        let mut cmd = Cli::command();
        clap_complete::generate(shell, &mut cmd, "voltie", &mut std::io::stdout());
        return Ok(());
    }

    let config_path = args.config.unwrap_or_else(config::default_config_path);
    let mut config = config::load_config(&config_path)?;

    // Apply CLI overrides
    if let Some(size) = args.font_size {
        anyhow::ensure!(size >= 8.0, "Font size must be at least 8px");
        config.display.font_size = size;
    }
    if let Some(interval) = args.interval {
        anyhow::ensure!(interval >= 1, "Poll interval must be at least 1 second");
        config.display.poll_interval = interval;
    }

    log::info!(
        "Starting voltie with font_size={}, poll_interval={}s",
        config.display.font_size,
        config.display.poll_interval
    );

    wayland::run(config, config_path, args.socket)?;

    Ok(())
}
