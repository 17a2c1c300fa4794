use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use squaregrid_core::{AppConfig, RowMode};

mod commands;

#[derive(Parser)]
#[command(name = "squaregrid")]
#[command(author, version, about = "A selectable, scrollable grid of numbered tiles")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Config file to use instead of ~/.config/squaregrid/config.toml
    #[arg(short = 'c', long, global = true)]
    config: Option<PathBuf>,

    /// Items per row (1-5)
    #[arg(short = 'n', long, global = true)]
    columns: Option<usize>,

    /// Arrangement of two-image items
    #[arg(short = 'm', long, value_enum, global = true)]
    mode: Option<ModeArg>,
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    /// Two tiles side by side
    Strip,
    /// Two by two block
    Block,
}

impl From<ModeArg> for RowMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Strip => RowMode::Strip,
            ModeArg::Block => RowMode::Block,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Start the TUI
    Run,
    /// Print the computed rows and tile geometry
    Layout {
        /// Container width in layout units
        #[arg(short = 'w', long, default_value_t = 80.0)]
        width: f64,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Show configuration
    Config {
        /// Only print the config file path
        #[arg(long)]
        path: bool,
        /// Write the effective configuration to the config file if it does not exist
        #[arg(long, conflicts_with = "path")]
        init: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(AppConfig::config_path);
    let mut config = AppConfig::load_from(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    if let Some(columns) = cli.columns {
        config.grid.columns = columns;
    }
    if let Some(mode) = cli.mode {
        config.grid.row_mode = mode.into();
    }
    config.validate()?;

    let is_tui = matches!(cli.command, Some(Commands::Run) | None);
    init_logging(&config, is_tui)?;

    let config = Arc::new(config);
    match cli.command {
        Some(Commands::Run) | None => commands::run::run(config).await,
        Some(Commands::Layout { width, json }) => commands::layout::run(&config, width, json),
        Some(Commands::Config { path, init }) => {
            commands::config::run(&config, &config_path, path, init)
        }
    }
}

/// Log to a file while the TUI owns the terminal, to stderr otherwise
fn init_logging(config: &AppConfig, to_file: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));
    let registry = tracing_subscriber::registry().with(filter);

    if to_file {
        let log_path = config.log_path();
        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)
            .with_context(|| format!("Failed to open log file {}", log_path.display()))?;
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
            .init();
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
    Ok(())
}
