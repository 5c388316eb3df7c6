//! Host platform classification

use serde::Serialize;
use std::fmt;

/// Closed set of platform families the sensor catalog knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlatformId {
    /// Linux and Android: sensors exposed through sysfs
    LinuxLike,
    WindowsLike,
    DarwinLike,
    Other,
}

impl PlatformId {
    /// Platform this binary was compiled for
    pub fn current() -> Self {
        if cfg!(any(target_os = "linux", target_os = "android")) {
            PlatformId::LinuxLike
        } else if cfg!(target_os = "windows") {
            PlatformId::WindowsLike
        } else if cfg!(target_os = "macos") {
            PlatformId::DarwinLike
        } else {
            PlatformId::Other
        }
    }

    /// Whether block devices are reachable by the SMART tool
    pub fn exposes_block_devices(self) -> bool {
        matches!(self, PlatformId::LinuxLike | PlatformId::DarwinLike)
    }
}

impl fmt::Display for PlatformId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PlatformId::LinuxLike => "linux",
            PlatformId::WindowsLike => "windows",
            PlatformId::DarwinLike => "darwin",
            PlatformId::Other => "other",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_device_platforms() {
        assert!(PlatformId::LinuxLike.exposes_block_devices());
        assert!(PlatformId::DarwinLike.exposes_block_devices());
        assert!(!PlatformId::WindowsLike.exposes_block_devices());
        assert!(!PlatformId::Other.exposes_block_devices());
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_current_platform_linux() {
        assert_eq!(PlatformId::current(), PlatformId::LinuxLike);
    }
}
