//! Platform detection and OS-specific utilities.

use std::path::PathBuf;
use crate::error::{CourierError, CourierResult};

/// Detected operating system platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    MacOs,
    Linux,
}

impl Platform {
    /// Detect the current platform at compile time.
    pub fn current() -> Self {
        if cfg!(target_os = "windows") {
            Platform::Windows
        } else if cfg!(target_os = "macos") {
            Platform::MacOs
        } else {
            Platform::Linux
        }
    }

    /// Get the platform-specific application data directory.
    ///
    /// - Windows: `%APPDATA%/Courier`
    /// - macOS: `~/Library/Application Support/Courier`
    /// - Linux: `~/.local/share/Courier`
    pub fn data_dir() -> CourierResult<PathBuf> {
        let base = dirs::data_dir()
            .ok_or_else(|| CourierError::Config("could not determine data directory".into()))?;
        Ok(base.join("Courier"))
    }

    /// Get the platform-specific configuration directory.
    pub fn config_dir() -> CourierResult<PathBuf> {
        let base = dirs::config_dir()
            .ok_or_else(|| CourierError::Config("could not determine config directory".into()))?;
        Ok(base.join("Courier"))
    }

    /// Get the platform-specific cache directory.
    pub fn cache_dir() -> CourierResult<PathBuf> {
        let base = dirs::cache_dir()
            .ok_or_else(|| CourierError::Config("could not determine cache directory".into()))?;
        Ok(base.join("Courier"))
    }

    /// Get a human-readable platform name.
    pub fn name(&self) -> &'static str {
        match self {
            Platform::Windows => "Windows",
            Platform::MacOs => "macOS",
            Platform::Linux => "Linux",
        }
    }

    /// Get the system hostname, used as the device label at login.
    pub fn hostname() -> String {
        hostname::get()
            .ok()
            .and_then(|h| h.into_string().ok())
            .unwrap_or_else(|| "courier-client".to_string())
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_current() {
        let p = Platform::current();
        assert!(!p.name().is_empty());
    }

    #[test]
    fn test_hostname_nonempty() {
        assert!(!Platform::hostname().is_empty());
    }
}
