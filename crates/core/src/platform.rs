//! Platform detection
//!
//! Provides OS and architecture information using standard Unix conventions:
//! - macOS → `"darwin"` (kernel name)
//! - Linux → `"linux"`
//! - Windows → `"windows"`
//!
//! The platform name selects the per-platform variables directory
//! (`.dotweave/variables/<os>/`). Detection runs once on first access.

use std::sync::LazyLock;

/// Current platform information (cached)
///
/// # Example
/// ```
/// use dotweave_core::platform::CURRENT_PLATFORM;
///
/// let platform_dir = format!(".dotweave/variables/{}", CURRENT_PLATFORM.os);
/// assert!(platform_dir.starts_with(".dotweave/variables/"));
/// ```
pub static CURRENT_PLATFORM: LazyLock<Platform> = LazyLock::new(Platform::detect);

/// Platform information
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Platform {
    /// OS: "darwin" (macOS), "linux", "windows", "unknown"
    pub os: &'static str,
    /// OS family: "unix", "windows"
    pub family: &'static str,
    /// CPU architecture: "x86_64", "aarch64", etc.
    pub arch: &'static str,
}

impl Platform {
    /// Detect the platform this binary was compiled for
    pub fn detect() -> Self {
        Self {
            os: Self::detect_os(),
            family: std::env::consts::FAMILY,
            arch: std::env::consts::ARCH,
        }
    }

    const fn detect_os() -> &'static str {
        #[cfg(target_os = "macos")]
        {
            "darwin"
        }

        #[cfg(target_os = "linux")]
        {
            "linux"
        }

        #[cfg(target_os = "windows")]
        {
            "windows"
        }

        #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
        {
            "unknown"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_is_stable() {
        assert_eq!(Platform::detect(), *CURRENT_PLATFORM);
    }

    #[test]
    fn test_arch_matches_std() {
        assert_eq!(CURRENT_PLATFORM.arch, std::env::consts::ARCH);
    }
}
