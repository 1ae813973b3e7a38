//! Platform-specific paths for local data

use std::path::PathBuf;

const APP_DIR: &str = "SwapAndShare";

/// Get the platform-specific data directory for storing application data
///
/// Returns:
/// - Windows: %LOCALAPPDATA%\SwapAndShare
/// - macOS: ~/Library/Application Support/SwapAndShare
/// - Linux/Other: ~/.local/share/SwapAndShare
pub fn get_data_dir() -> PathBuf {
    let base = dirs::data_local_dir()
        .or_else(dirs::data_dir)
        .or_else(|| dirs::home_dir().map(|h| h.join(".data")))
        .unwrap_or_else(|| PathBuf::from("."));

    base.join(APP_DIR)
}

/// Get the default item store path
pub fn get_default_store_path() -> PathBuf {
    get_data_dir().join("items.db")
}

/// Ensure the data directory exists, creating it if necessary
pub fn ensure_data_dir() -> std::io::Result<PathBuf> {
    let dir = get_data_dir();
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_data_dir() {
        let dir = get_data_dir();
        assert!(dir.to_string_lossy().ends_with(APP_DIR));
    }

    #[test]
    fn test_get_default_store_path() {
        let path = get_default_store_path();
        assert!(path.to_string_lossy().ends_with("items.db"));
        assert_eq!(path.parent().unwrap(), get_data_dir());
    }
}
