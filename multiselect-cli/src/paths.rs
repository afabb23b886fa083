//! Platform-specific directory paths.

use std::path::PathBuf;

use directories::ProjectDirs;

const QUALIFIER: &str = "dev";
const ORGANIZATION: &str = "multiselect";
const APPLICATION: &str = "multiselect";

/// Get project directories, or None if home directory cannot be determined.
fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
}

/// Get the cache directory for logs.
///
/// - Linux: `$XDG_CACHE_HOME/multiselect` or `~/.cache/multiselect`
/// - macOS: `~/Library/Caches/dev.multiselect.multiselect`
/// - Windows: `C:\Users\<User>\AppData\Local\multiselect\multiselect\cache`
pub fn cache_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.cache_dir().to_path_buf())
}

/// Get the path to the latest log file, falling back to the working directory.
pub fn log_file() -> PathBuf {
    cache_dir()
        .map(|dir| dir.join("latest.log"))
        .unwrap_or_else(|| PathBuf::from("multiselect.log"))
}
