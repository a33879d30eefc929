//! File System Utilities
//!
//! Configuration and data directory management.

use std::fs;
use std::path::PathBuf;

use directories::ProjectDirs;

use crate::error::{Error, Result};

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("io", "sbiot", "sbiot-console").ok_or_else(|| Error::Invalid {
        message: "Could not determine project directories".to_string(),
    })
}

/// Get or create the application's configuration directory
///
/// Platform-specific locations:
/// - **Linux**: `~/.config/sbiot-console/` or `$XDG_CONFIG_HOME/sbiot-console/`
/// - **macOS**: `~/Library/Application Support/io.sbiot.sbiot-console/`
/// - **Windows**: `C:\Users\<User>\AppData\Roaming\sbiot\sbiot-console\config\`
pub fn get_or_create_config_dir() -> Result<PathBuf> {
    let dirs = project_dirs()?;
    let config_dir = dirs.config_dir();
    if !config_dir.exists() {
        fs::create_dir_all(config_dir)?;
    }
    Ok(config_dir.to_path_buf())
}

/// Get or create the data directory, used for log files
///
/// Platform-specific locations:
/// - **Linux**: `~/.local/share/sbiot-console/`
/// - **macOS**: `~/Library/Application Support/io.sbiot.sbiot-console/`
/// - **Windows**: `C:\Users\<User>\AppData\Roaming\sbiot\sbiot-console\data\`
pub fn get_or_create_data_dir() -> Result<PathBuf> {
    let dirs = project_dirs()?;
    let data_dir = dirs.data_dir();
    if !data_dir.exists() {
        fs::create_dir_all(data_dir)?;
    }
    Ok(data_dir.to_path_buf())
}
