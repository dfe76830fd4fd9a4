use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use serde_json::json;
use std::io::{BufRead, BufReader, Write};
use std::os::unix::net::UnixStream;
use std::path::PathBuf;

use crate::ipc;

#[derive(Parser, Debug)]
#[command(name = "ctl", about = "Control a running voltie instance")]
pub struct CtlArgs {
    /// Override socket path
    #[arg(long)]
    socket: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Set text size, or scale by +/-N
    Size {
        /// Size in px, or +N / -N delta
        value: String,
    },
    /// Control drag lock
    Lock {
        /// on, off, or toggle
        mode: String,
    },
    /// Move the widget to a specific output (monitor name, "next", or "prev")
    Output {
        /// Output name (e.g. HDMI-A-1), or "next"/"prev" to cycle
        name: String,
    },
    /// Reload configuration file
    Reload,
    /// Print current battery state and window geometry as JSON
    State,
    /// Shut down voltie
    Quit,
    /// Generate shell completions for the ctl subcommand
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

fn send_command(socket: &PathBuf, cmd: serde_json::Value) -> Result<serde_json::Value> {
    let mut stream = UnixStream::connect(socket)
        .with_context(|| format!("Failed to connect to voltie at {}", socket.display()))?;

    let msg = serde_json::to_string(&cmd)? + "\n";
    stream.write_all(msg.as_bytes())?;
    stream.flush()?;

    let mut reader = BufReader::new(&stream);
    let mut response = String::new();
    reader.read_line(&mut response)?;

    let resp: serde_json::Value = serde_json::from_str(&response)
        .context("Failed to parse response from voltie")?;
    Ok(resp)
}

pub fn run(args: CtlArgs) -> Result<()> {
    // Handle completions before connecting to socket
    if let Commands::Completions { shell } = &args.command {
        let mut cmd = crate::Cli::command();
        clap_complete::generate(*shell, &mut cmd, "voltie", &mut std::io::stdout());
        return Ok(());
    }

    let sock = ipc::socket_path(args.socket.as_ref());

    let cmd = match &args.command {
        Commands::Size { value } => {
            if value.starts_with('+') || value.starts_with('-') {
                let delta: i32 = value.parse().context("Invalid delta")?;
                json!({"cmd": "scale-by", "delta": delta})
            } else {
                let size: f32 = value.parse().context("Invalid size value")?;
                json!({"cmd": "set-font-size", "size": size})
            }
        }
        Commands::Lock { mode } => match mode.as_str() {
            "on" => json!({"cmd": "set-locked", "locked": true}),
            "off" => json!({"cmd": "set-locked", "locked": false}),
            "toggle" => json!({"cmd": "toggle-locked"}),
            other => anyhow::bail!("Unknown lock mode: {}. Use on, off, or toggle", other),
        },
        Commands::Output { name } => json!({"cmd": "move-to-output", "name": name}),
        Commands::Reload => json!({"cmd": "reload-config"}),
        Commands::State => json!({"cmd": "get-state"}),
        Commands::Quit => json!({"cmd": "quit"}),
        Commands::Completions { .. } => unreachable!("handled above"),
    };

    let resp = send_command(&sock, cmd)?;

    if let Some(true) = resp.get("ok").and_then(|v| v.as_bool()) {
        if matches!(&args.command, Commands::State) {
            println!("{}", serde_json::to_string_pretty(&resp)?);
        }
    } else {
        let err = resp.get("error").and_then(|v| v.as_str()).unwrap_or("Unknown error");
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }

    Ok(())
}
