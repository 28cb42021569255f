use crate::error::{Error, Result};
use std::env;
use std::path::PathBuf;

/// Base packsmith config directory (universal ~/.config/packsmith/ on all platforms)
pub fn packsmith() -> Result<PathBuf> {
    #[cfg(windows)]
    {
        let appdata = env::var("APPDATA").map_err(|_| {
            Error::internal_unexpected(
                "APPDATA environment variable not set on Windows".to_string(),
            )
        })?;
        Ok(PathBuf::from(appdata).join("packsmith"))
    }

    #[cfg(not(windows))]
    {
        let home = env::var("HOME").map_err(|_| {
            Error::internal_unexpected(
                "HOME environment variable not set on Unix-like system".to_string(),
            )
        })?;
        Ok(PathBuf::from(home).join(".config").join("packsmith"))
    }
}

/// Global packsmith.json config file path
pub fn packsmith_json() -> Result<PathBuf> {
    Ok(packsmith()?.join("packsmith.json"))
}

/// Installed templates directory
pub fn templates() -> Result<PathBuf> {
    Ok(packsmith()?.join("templates"))
}
