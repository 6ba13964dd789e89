use directories::ProjectDirs;
use std::path::PathBuf;

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    pub fn config_path() -> PathBuf {
        if let Some(pd) = ProjectDirs::from("", "", "racewheel") {
            pd.config_dir().join("config.json")
        } else {
            PathBuf::from("racewheel_config.json")
        }
    }

    /// Default log file. The TUI owns the terminal, so logs go to disk.
    pub fn log_path() -> PathBuf {
        if let Ok(home) = std::env::var("HOME") {
            PathBuf::from(home)
                .join(".local")
                .join("state")
                .join("racewheel")
                .join("racewheel.log")
        } else if let Some(pd) = ProjectDirs::from("", "", "racewheel") {
            pd.data_local_dir().join("racewheel.log")
        } else {
            PathBuf::from("racewheel.log")
        }
    }
}
