//! CLI argument parsing with clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

use crate::camera::CameraSettings;
use crate::config::Config;
use crate::grabber::{GrabSettings, ReadFailurePolicy};

/// Save webcam frames to a directory while showing a live preview
#[derive(Parser, Debug)]
#[command(name = "frame-grabber")]
#[command(version, about = "Periodically save webcam frames as PNG files", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Directory to save frames into [default: raw_images]
    pub output_dir: Option<PathBuf>,

    /// Camera device index (from list-cameras)
    #[arg(long)]
    pub camera: Option<u32>,

    /// Pause between captures in milliseconds
    #[arg(long)]
    pub interval_ms: Option<u64>,

    /// What to do when a frame can't be read: skip or abort
    #[arg(long)]
    pub on_read_failure: Option<ReadFailurePolicy>,

    /// Mirror camera horizontally
    #[arg(long)]
    pub mirror: bool,

    /// Don't open a preview window; stop with Ctrl+C
    #[arg(long)]
    pub no_preview: bool,

    /// Config file path
    #[arg(long, short)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List available cameras
    ListCameras,
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Show current configuration
    Show,
    /// Create default config file
    Init,
}

/// Effective settings of a grab run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub output_dir: PathBuf,
    pub camera: CameraSettings,
    pub grab: GrabSettings,
    pub preview: bool,
    pub window_title: String,
}

impl RunOptions {
    /// Merge settings: CLI args > config file > built-in defaults.
    pub fn resolve(args: &Args, config: &Config) -> Self {
        let mut grab = config.grab_settings();
        if let Some(ms) = args.interval_ms {
            grab.interval = Duration::from_millis(ms);
        }
        if let Some(policy) = args.on_read_failure {
            grab.on_read_failure = policy;
        }

        Self {
            output_dir: args.output_dir.clone().unwrap_or_else(|| config.output_dir()),
            camera: CameraSettings {
                device_index: args.camera.unwrap_or(config.camera.device),
                mirror: args.mirror || config.camera.mirror,
            },
            grab,
            preview: !args.no_preview && config.preview.enabled,
            window_title: config.preview.window_title.clone(),
        }
    }
}
