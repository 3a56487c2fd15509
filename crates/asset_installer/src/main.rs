//! Asset Installer CLI
//!
//! Headless install of the full asset bundle, driving the same dialog the
//! game shows.

#[cfg(feature = "cli")]
use anyhow::{Context, Result};
#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
use asset_installer::{
    AssetsConfig, DialogEvent, DialogState, DownloadAssetsDialog, HttpRequestFactory,
};

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "asset_installer")]
#[command(about = "Download and install the full game assets", long_about = None)]
struct Cli {
    /// YAML config file (defaults are used when omitted)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// Download and extract the bundle
    Download {
        /// Frame interval in milliseconds
        #[arg(long, default_value = "100")]
        tick_ms: u64,
    },

    /// Extract an already downloaded archive
    Extract {
        #[arg(long)]
        archive: PathBuf,

        /// Target directory (config download_dir when omitted)
        #[arg(long)]
        dest: Option<PathBuf>,

        /// Print the archive SHA256 before extracting
        #[arg(long, default_value = "false")]
        checksum: bool,
    },

    /// Show whether the configured version is installed
    Status,

    /// Print the download size label
    Size,
}

#[cfg(feature = "cli")]
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => AssetsConfig::load(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => AssetsConfig::default(),
    };

    match cli.command {
        Commands::Download { tick_ms } => download(config, tick_ms),

        Commands::Extract { archive, dest, checksum } => {
            if checksum {
                println!("SHA256: {}", asset_installer::file_checksum(&archive)?);
            }
            let dest = dest.unwrap_or_else(|| config.download_dir.clone());
            let manifest = asset_installer::extract_assets(&archive, &dest, &config.version)?;
            println!(
                "Extracted {} files ({:.1} MB) into {}",
                manifest.files,
                manifest.bytes as f64 / 1024.0 / 1024.0,
                dest.display()
            );
            Ok(())
        }

        Commands::Status => {
            match asset_installer::installed_manifest(&config.download_dir) {
                Some(m) if m.version == config.version => {
                    println!("Installed: version {} ({} files, {})", m.version, m.files, m.installed_at);
                }
                Some(m) => {
                    println!("Outdated: version {} installed, {} expected", m.version, config.version);
                }
                None => println!("Not installed in {}", config.download_dir.display()),
            }
            Ok(())
        }

        Commands::Size => {
            println!("Size: {}", asset_installer::format_size_mb(config.expected_size_bytes));
            Ok(())
        }
    }
}

#[cfg(feature = "cli")]
fn download(config: AssetsConfig, tick_ms: u64) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new().context("Failed to start tokio runtime")?;
    let factory = HttpRequestFactory::new(config.clone(), runtime.handle().clone())?;
    let mut dialog = DownloadAssetsDialog::new(factory, &config);

    println!("{}", dialog.widgets().size_label);
    println!("Downloading {}", config.download_url());
    dialog.process_event("actions", "install");

    let tick = std::time::Duration::from_millis(tick_ms.max(1));
    let mut last_percent = -1i32;
    while !dialog.is_dismissed() && dialog.state() != DialogState::Error {
        std::thread::sleep(tick);
        dialog.on_update(tick.as_secs_f32());

        let percent = dialog.widgets().progress_value as i32;
        if percent != last_percent && dialog.widgets().progress_visible {
            println!("{:>3}%", percent);
            last_percent = percent;
        }
    }

    for event in dialog.take_events() {
        match event {
            DialogEvent::ShowMessage { text } => eprintln!("{}", text),
            DialogEvent::AssetsReady { dir } => println!("Assets ready in {}", dir.display()),
            DialogEvent::Dismissed => {}
        }
    }

    if dialog.state() == DialogState::Error {
        anyhow::bail!("Asset install failed");
    }
    if let Some(manifest) = dialog.installed_manifest() {
        println!(
            "Installed version {}: {} files ({:.1} MB)",
            manifest.version,
            manifest.files,
            manifest.bytes as f64 / 1024.0 / 1024.0
        );
    }
    Ok(())
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("asset_installer CLI is not available. Enable the 'cli' feature to use it.");
    std::process::exit(1);
}
