use clap::Parser;

use frame_grabber::camera;
use frame_grabber::cli::{handle_config_action, list_cameras, Args, Command, RunOptions};
use frame_grabber::config::Config;
use frame_grabber::grabber::{FrameGrabber, StopReason};
use frame_grabber::preview;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    // If --config is specified, require the file to exist.
    // Otherwise, fall back to defaults if the default config is missing or broken.
    let cfg = if let Some(ref path) = args.config {
        match Config::load_from_explicit(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        match Config::load() {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Warning: Failed to load config file: {}", e);
                eprintln!("Using default settings.\n");
                Config::default()
            }
        }
    };

    let opts = RunOptions::resolve(&args, &cfg);

    match args.command {
        Some(Command::ListCameras) => {
            if let Err(e) = list_cameras() {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
        Some(Command::Config { action }) => {
            if let Err(e) = handle_config_action(action, &opts) {
                eprintln!("{}", e);
                std::process::exit(1);
            }
        }
        None => grab(opts),
    }
}

fn grab(opts: RunOptions) {
    let grabber = FrameGrabber::new(opts.grab.clone());
    let result = grabber.run(
        &opts.output_dir,
        || camera::open_camera(opts.camera.clone()),
        || preview::open_preview(opts.preview, &opts.window_title),
    );

    match result {
        Ok(summary) if summary.stop_reason == StopReason::DeviceOpenFailed => {
            println!("Unable to open camera");
        }
        Ok(summary) => {
            println!(
                "Saved {} frame(s) to {} ({})",
                summary.frames_saved(),
                opts.output_dir.display(),
                summary.stop_reason
            );
            if summary.skipped > 0 {
                println!("Skipped {} unreadable frame(s)", summary.skipped);
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
