//! Platform-specific directory paths.
//!
//! Uses XDG on Linux, standard locations on macOS/Windows.

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;

const QUALIFIER: &str = "com";
const ORGANIZATION: &str = "soundcms";
const APPLICATION: &str = "soundcms-admin";

const LATEST_LOG: &str = "latest.log";

/// Maximum number of old log files to keep.
const MAX_OLD_LOGS: usize = 10;

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
}

/// Get the cache directory, where logs go.
///
/// - Linux: `$XDG_CACHE_HOME/soundcms-admin` or `~/.cache/soundcms-admin`
/// - macOS: `~/Library/Caches/com.soundcms.soundcms-admin`
/// - Windows: `C:\Users\<User>\AppData\Local\soundcms\soundcms-admin\cache`
pub fn cache_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.cache_dir().to_path_buf())
}

/// Get the config directory.
///
/// - Linux: `$XDG_CONFIG_HOME/soundcms-admin` or `~/.config/soundcms-admin`
/// - macOS: `~/Library/Application Support/com.soundcms.soundcms-admin`
/// - Windows: `C:\Users\<User>\AppData\Roaming\soundcms\soundcms-admin\config`
pub fn config_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to `config.json`.
pub fn config_file() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.json"))
}

/// Get the path to the latest log file.
pub fn log_file() -> Option<PathBuf> {
    cache_dir().map(|dir| dir.join(LATEST_LOG))
}

/// Archive `latest.log` under a timestamped name and prune old logs.
///
/// Call this at startup before creating the new log file.
pub fn rotate_logs() {
    let Some(cache) = cache_dir() else { return };
    rotate_in(&cache);
}

fn rotate_in(dir: &Path) {
    let latest = dir.join(LATEST_LOG);
    if latest.exists() {
        let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        let archived = dir.join(format!("{}.log", timestamp));
        let _ = fs::rename(&latest, &archived);
    }
    cleanup_old_logs(dir);
}

/// Remove old log files, keeping only the most recent MAX_OLD_LOGS.
fn cleanup_old_logs(dir: &Path) {
    let Ok(entries) = fs::read_dir(dir) else { return };

    let mut logs: Vec<_> = entries
        .filter_map(|e| e.ok())
        .filter(|e| {
            let name = e.file_name();
            let name = name.to_string_lossy();
            name.ends_with(".log") && name != LATEST_LOG
        })
        .collect();

    // oldest first
    logs.sort_by_key(|e| e.metadata().and_then(|m| m.modified()).ok());

    if logs.len() > MAX_OLD_LOGS {
        for entry in logs.iter().take(logs.len() - MAX_OLD_LOGS) {
            let _ = fs::remove_file(entry.path());
        }
    }
}
