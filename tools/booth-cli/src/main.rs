//! Photobooth CLI: shoot sessions, compose strips, manage the gallery.
//!
//! Usage:
//!   photobooth shoot [OPTIONS]          Run a full capture session
//!   photobooth compose <IMAGES>...      Build a composite from image files
//!   photobooth layouts                  List layouts
//!   photobooth filters                  List filters
//!   photobooth gallery <COMMAND>        List, export, or delete saved sessions
//!   photobooth config                   Show or initialize configuration
//!   photobooth check                    Check camera capabilities

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use photobooth_common::config::AppConfig;
use photobooth_model::{EncodedFormat, FilterId, LayoutId, RecordId};

mod commands;

#[derive(Parser)]
#[command(
    name = "photobooth",
    about = "Webcam photobooth: countdown, capture, and printable strips",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Session store directory (overrides config)
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Where frames come from.
#[derive(Args, Debug, Clone)]
#[group(multiple = false)]
pub struct SourceArgs {
    /// Use a still image as the camera
    #[arg(long, value_name = "IMAGE")]
    source: Option<PathBuf>,

    /// Use a generated test pattern as the camera
    #[arg(long)]
    synthetic: bool,

    /// V4L2 device to open, e.g. /dev/video0
    #[arg(long)]
    device: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a full capture session and save the result
    Shoot {
        /// Layout id (see `photobooth layouts`)
        #[arg(short, long)]
        layout: Option<LayoutId>,

        /// Filter id (see `photobooth filters`)
        #[arg(short, long)]
        filter: Option<FilterId>,

        #[command(flatten)]
        source: SourceArgs,

        /// Output file (defaults to <product>-<date>.<ext> in the current directory)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format: png or jpg
        #[arg(long, default_value = "png", value_parser = parse_format)]
        format: EncodedFormat,

        /// JPEG quality in 0.0..=1.0
        #[arg(long)]
        quality: Option<f32>,

        /// Skip the countdown and completion pauses
        #[arg(long)]
        instant: bool,

        /// Do not save the session to the gallery
        #[arg(long)]
        no_save: bool,
    },

    /// Build a composite from image files
    Compose {
        /// Images, one per cell in order
        #[arg(required = true)]
        images: Vec<PathBuf>,

        #[arg(short, long)]
        layout: Option<LayoutId>,

        #[arg(short, long)]
        filter: Option<FilterId>,

        #[arg(short, long)]
        output: Option<PathBuf>,

        #[arg(long, default_value = "png", value_parser = parse_format)]
        format: EncodedFormat,

        #[arg(long)]
        quality: Option<f32>,
    },

    /// List layouts
    Layouts,

    /// List filters
    Filters,

    /// Manage saved sessions
    Gallery {
        #[command(subcommand)]
        command: GalleryCommand,
    },

    /// Show the effective configuration
    Config {
        /// Write the defaults to the config file if none exists
        #[arg(long)]
        init: bool,
    },

    /// Check camera capabilities
    Check,
}

#[derive(Subcommand)]
pub enum GalleryCommand {
    /// List saved sessions, newest first
    List {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Write a session's composite to a file or directory
    Export { id: RecordId, path: PathBuf },

    /// Delete one session
    Delete { id: RecordId },

    /// Delete every session
    Clear {
        /// Confirm deletion
        #[arg(long)]
        yes: bool,
    },
}

fn parse_format(s: &str) -> Result<EncodedFormat, String> {
    EncodedFormat::from_extension(s).ok_or_else(|| format!("unsupported format {s:?} (png or jpg)"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load();
    if cli.verbose {
        config.logging.level = "debug".to_string();
    }
    if let Some(store) = cli.store {
        config.store_dir = store;
    }
    photobooth_common::logging::init_logging(&config.logging);

    match cli.command {
        Commands::Shoot {
            layout,
            filter,
            source,
            output,
            format,
            quality,
            instant,
            no_save,
        } => {
            commands::shoot::run(
                &config,
                commands::shoot::ShootOptions {
                    layout,
                    filter,
                    source,
                    output,
                    format,
                    quality,
                    instant,
                    save: !no_save,
                },
            )
            .await?;
        }
        Commands::Compose {
            images,
            layout,
            filter,
            output,
            format,
            quality,
        } => {
            commands::compose::run(&config, images, layout, filter, output, format, quality)?;
        }
        Commands::Layouts => {
            commands::registry::layouts(&config);
        }
        Commands::Filters => {
            commands::registry::filters();
        }
        Commands::Gallery { command } => {
            commands::gallery::run(&config, command).await?;
        }
        Commands::Config { init } => {
            commands::config::run(&config, init)?;
        }
        Commands::Check => {
            commands::check::run(&config).await?;
        }
    }

    Ok(())
}
