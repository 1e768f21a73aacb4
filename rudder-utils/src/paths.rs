//! Path utilities for rudder
//!
//! Handles XDG Base Directory locations for the default configuration
//! file and log output.

use std::path::PathBuf;

use directories::ProjectDirs;

/// Application identifier for XDG directories
const APP_NAME: &str = "rudder";

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", APP_NAME)
}

/// Get the configuration directory
///
/// Location: `$XDG_CONFIG_HOME/rudder` or `~/.config/rudder`
pub fn config_dir() -> PathBuf {
    project_dirs()
        .map(|p| p.config_dir().to_path_buf())
        .unwrap_or_else(|| {
            std::env::var("HOME")
                .map(|h| PathBuf::from(h).join(".config").join(APP_NAME))
                .unwrap_or_else(|_| PathBuf::from(".").join(APP_NAME))
        })
}

/// Get the default configuration file path
///
/// Location: `$XDG_CONFIG_HOME/rudder/rudder.conf`
pub fn config_file() -> PathBuf {
    config_dir().join("rudder.conf")
}

/// Get the log directory
///
/// Location: `$XDG_STATE_HOME/rudder` or `~/.local/state/rudder`
pub fn log_dir() -> PathBuf {
    project_dirs()
        .and_then(|p| p.state_dir().map(|d| d.to_path_buf()))
        .unwrap_or_else(|| config_dir().join("logs"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_file_under_config_dir() {
        let file = config_file();
        assert!(file.starts_with(config_dir()));
        assert_eq!(file.file_name().unwrap(), "rudder.conf");
    }

    #[test]
    fn test_paths_are_absolute_or_relative_fallback() {
        // Just exercise the lookups; exact locations depend on the host env.
        let _ = config_dir();
        let _ = log_dir();
    }
}
