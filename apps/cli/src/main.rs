//! modpacker command-line interface.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use modpacker::source::Passthrough;
use modpacker::{Http, HttpConfig, Installer, Manifest, default_registry};

#[derive(Parser)]
#[command(name = "modpacker", version, about = "Generate and maintain Minecraft modpacks")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Download the latest release of every mod in a modpack manifest.
    Install {
        /// Path to the modpack manifest.
        modpack: PathBuf,
        /// Output directory; files land in its `mods` subdirectory.
        directory: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Install { modpack, directory } => {
            let manifest = Manifest::load(&modpack)
                .with_context(|| format!("failed to load manifest {}", modpack.display()))?;
            let http = Http::new(HttpConfig::default())?;
            let registry = default_registry(&http, Arc::new(Passthrough));
            let directory = directory.unwrap_or_else(|| PathBuf::from("."));
            Installer::new(registry, http)
                .install(&manifest, &directory)
                .await?;
        }
    }
    Ok(())
}
