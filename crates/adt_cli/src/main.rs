//! adt CLI
//!
//! Renders the widgets described by a TOML configuration into a headless
//! document and prints the resulting tree.

mod config;
mod render;

use anyhow::{Context, Result};
use adt_core::{Host, ToolkitConfig};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::config::{CliConfig, DataFile};
use crate::render::{render_document, RenderOptions};

#[derive(Parser, Debug)]
#[command(name = "adt")]
#[command(about = "Render adt widgets into a headless document")]
#[command(version)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render the configured widgets and print the document
    Render {
        /// Render configuration (adt.toml)
        #[arg(short, long)]
        config: PathBuf,

        /// JSON records: an array shared by every chart, or an object keyed
        /// by widget name
        #[arg(short, long)]
        data: Option<PathBuf>,

        /// Width of the root container
        #[arg(long, default_value = "960")]
        width: f64,

        /// Height of the root container
        #[arg(long, default_value = "540")]
        height: f64,

        /// Transition duration (defaults to the toolkit setting)
        #[arg(long)]
        duration_ms: Option<u64>,

        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Print an empty configuration with the default toolkit settings
    Defaults,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Indented outline, one node per line
    Text,
    /// Node snapshot as JSON
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Render {
            config,
            data,
            width,
            height,
            duration_ms,
            format,
        } => cmd_render(config, data, width, height, duration_ms, format),
        Commands::Defaults => {
            print!("{}", CliConfig::default().to_toml()?);
            Ok(())
        }
    }
}

fn cmd_render(
    config_path: PathBuf,
    data_path: Option<PathBuf>,
    width: f64,
    height: f64,
    duration_ms: Option<u64>,
    format: OutputFormat,
) -> Result<()> {
    let config = CliConfig::load(&config_path)?;
    let duration_ms = duration_ms.unwrap_or(config.toolkit.render_duration_ms);
    ToolkitConfig::init(config.toolkit.clone()).context("Failed to install toolkit config")?;

    let data = match &data_path {
        Some(path) => DataFile::load(path)?,
        None => DataFile::default(),
    };

    tracing::info!(
        config = %config_path.display(),
        widgets = config.widgets.len(),
        "rendering"
    );

    let host = Host::new();
    host.install();
    let options = RenderOptions {
        width,
        height,
        duration_ms,
    };
    let root = render_document(&host, &config, &data, options)?;

    let doc = host.document();
    match format {
        OutputFormat::Text => print!("{}", doc.outline(root)),
        OutputFormat::Json => {
            let snapshot = doc
                .snapshot(root)
                .context("Root node missing after render")?;
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
        }
    }
    Ok(())
}
