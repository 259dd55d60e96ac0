//! clipsplit: split uploaded videos into an audio track and a relocated video.
//!
//! Configuration comes from the environment (see `Config::from_env`). The
//! response JSON is printed on stdout; logs go to stderr.

use anyhow::Context;
use clap::{Parser, Subcommand};
use clipsplit_core::Config;
use clipsplit_handler::{build_orchestrator, handle_payload, init_telemetry, verify_toolchain};
use clipsplit_processing::check_toolchain;
use std::path::PathBuf;
use tokio::io::AsyncReadExt;

#[derive(Parser)]
#[command(name = "clipsplit", about = "Extract audio from uploaded videos")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process one upload event and print the invocation response
    Invoke {
        /// Path to the event JSON; read from stdin when omitted
        #[arg(long)]
        event: Option<PathBuf>,
    },
    /// Verify that ffmpeg and ffprobe are installed and runnable
    CheckToolchain,
}

async fn read_payload(path: Option<PathBuf>) -> anyhow::Result<String> {
    match path {
        Some(path) => tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("Failed to read event file {}", path.display())),
        None => {
            let mut payload = String::new();
            tokio::io::stdin()
                .read_to_string(&mut payload)
                .await
                .context("Failed to read event from stdin")?;
            Ok(payload)
        }
    }
}

fn print_json(value: &impl serde::Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string(value).context("Serialize response")?;
    println!("{}", out);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = Config::from_env().context("Failed to load configuration")?;
    init_telemetry(config.log_format).context("Failed to initialize telemetry")?;

    tracing::info!(
        environment = %config.environment,
        storage_backend = %config.storage_backend,
        "Configuration loaded"
    );

    match cli.command {
        Commands::Invoke { event } => {
            verify_toolchain(&config).await?;
            let orchestrator = build_orchestrator(&config).await?;

            let payload = read_payload(event).await?;
            let response = handle_payload(&orchestrator, &payload).await;
            print_json(&response)?;
        }
        Commands::CheckToolchain => {
            let report = check_toolchain(&config.ffmpeg_path, &config.ffprobe_path).await?;
            print_json(&report)?;
        }
    }

    Ok(())
}
