//! Subcommand handlers.

use std::path::Path;

use super::args::{ConfigAction, RunOptions};
use crate::camera;
use crate::config::{default_path as get_config_path, DEFAULT_CONFIG_TOML};

/// List available cameras and print them to stdout.
pub fn list_cameras() -> Result<(), camera::CameraError> {
    let devices = camera::list_devices()?;
    if devices.is_empty() {
        println!("No cameras found.");
        println!();
        println!("Make sure your camera is connected and permissions are granted.");
        if cfg!(not(feature = "webcam")) {
            println!("This build has no capture backend; rebuild with `--features webcam`.");
        }
    } else {
        println!("Available cameras:");
        for device in devices {
            println!("  {}", device);
        }
        println!();
        println!("Use --camera <index> to select a camera.");
    }
    Ok(())
}

/// Handle config subcommand actions.
pub fn handle_config_action(action: ConfigAction, opts: &RunOptions) -> Result<(), String> {
    match action {
        ConfigAction::Show => {
            println!("Current configuration:");
            println!("  Output dir: {}", opts.output_dir.display());
            println!("  Camera: {}", opts.camera.device_index);
            println!("  Mirror: {}", if opts.camera.mirror { "yes" } else { "no" });
            println!("  Interval: {} ms", opts.grab.interval.as_millis());
            println!("  Key timeout: {} ms", opts.grab.key_timeout.as_millis());
            println!("  On read failure: {:?}", opts.grab.on_read_failure);
            println!(
                "  Preview: {}",
                if opts.preview {
                    opts.window_title.as_str()
                } else {
                    "off"
                }
            );
            println!();

            let config_path = get_config_path();
            if config_path.exists() {
                println!("Config file: {} (exists)", config_path.display());
            } else {
                println!("Config file: {} (not found)", config_path.display());
            }
            Ok(())
        }
        ConfigAction::Init => {
            let config_path = get_config_path();
            write_default_config(&config_path)?;
            println!("Created config file: {}", config_path.display());
            Ok(())
        }
    }
}

/// Write the commented default config to `path`, refusing to overwrite.
pub fn write_default_config(path: &Path) -> Result<(), String> {
    if path.exists() {
        return Err(format!(
            "Config file already exists: {}\nUse 'frame-grabber config show' to view current settings.",
            path.display()
        ));
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| format!("Error creating config directory: {}", e))?;
    }

    std::fs::write(path, DEFAULT_CONFIG_TOML)
        .map_err(|e| format!("Error writing config file: {}", e))
}
