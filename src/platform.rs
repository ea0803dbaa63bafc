//! TeX Live platform detection
//!
//! Maps the host operating system and machine architecture onto the
//! platform identifiers used in TeX Live's `bin/` directory layout.

use crate::error::{SetupError, SetupResult};
use std::fmt;

/// Platforms a TeX Live installation can be provisioned for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TlPlatform {
    /// macOS, any architecture (universal binaries)
    UniversalDarwin,
    /// Windows, any architecture
    Windows,
    /// Linux on x86_64
    X86_64Linux,
    /// Linux on arm64
    Aarch64Linux,
}

impl TlPlatform {
    /// Detect the platform of the running host
    pub fn detect() -> SetupResult<Self> {
        Self::from_host(std::env::consts::OS, std::env::consts::ARCH)
    }

    /// Map an OS name and machine architecture to a platform.
    ///
    /// Accepts both Rust's `std::env::consts` spellings and the `uname`
    /// style names (`darwin`, `win32`, `arm64`).
    pub fn from_host(os: &str, arch: &str) -> SetupResult<Self> {
        match os {
            "macos" | "darwin" => Ok(Self::UniversalDarwin),
            "windows" | "win32" => Ok(Self::Windows),
            "linux" => match arch {
                "x86_64" => Ok(Self::X86_64Linux),
                "aarch64" | "arm64" => Ok(Self::Aarch64Linux),
                other => Err(SetupError::UnsupportedArchitecture(other.to_string())),
            },
            other => Err(SetupError::UnsupportedPlatform(other.to_string())),
        }
    }

    /// Identifier as used by TeX Live (`bin/<id>`)
    pub fn id(&self) -> &'static str {
        match self {
            Self::UniversalDarwin => "universal-darwin",
            Self::Windows => "windows",
            Self::X86_64Linux => "x86_64-linux",
            Self::Aarch64Linux => "aarch64-linux",
        }
    }

    pub fn is_windows(&self) -> bool {
        matches!(self, Self::Windows)
    }

    /// File name of the installer archive on a TeX Live repository
    pub fn installer_archive(&self) -> &'static str {
        if self.is_windows() {
            "install-tl.zip"
        } else {
            "install-tl-unx.tar.gz"
        }
    }

    /// Installer entry point inside the extracted archive
    pub fn installer_script(&self) -> &'static str {
        if self.is_windows() {
            "install-tl-windows.bat"
        } else {
            "install-tl"
        }
    }

    /// Executable name of the TeX Live package manager
    pub fn tlmgr(&self) -> &'static str {
        if self.is_windows() {
            "tlmgr.bat"
        } else {
            "tlmgr"
        }
    }
}

impl fmt::Display for TlPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_supported_hosts() {
        assert_eq!(
            TlPlatform::from_host("macos", "aarch64").unwrap(),
            TlPlatform::UniversalDarwin
        );
        assert_eq!(
            TlPlatform::from_host("windows", "x86_64").unwrap(),
            TlPlatform::Windows
        );
        assert_eq!(
            TlPlatform::from_host("linux", "x86_64").unwrap(),
            TlPlatform::X86_64Linux
        );
        assert_eq!(
            TlPlatform::from_host("linux", "aarch64").unwrap(),
            TlPlatform::Aarch64Linux
        );
        assert_eq!(
            TlPlatform::from_host("linux", "arm64").unwrap(),
            TlPlatform::Aarch64Linux
        );
    }

    #[test]
    fn rejects_unknown_os() {
        let err = TlPlatform::from_host("freebsd", "x86_64").unwrap_err();
        assert!(matches!(err, SetupError::UnsupportedPlatform(ref os) if os == "freebsd"));
        assert_eq!(err.to_string(), "Unsupported platform freebsd");
    }

    #[test]
    fn rejects_unknown_linux_arch() {
        let err = TlPlatform::from_host("linux", "riscv64").unwrap_err();
        assert!(matches!(err, SetupError::UnsupportedArchitecture(ref a) if a == "riscv64"));
    }

    #[test]
    fn platform_ids() {
        assert_eq!(TlPlatform::UniversalDarwin.to_string(), "universal-darwin");
        assert_eq!(TlPlatform::Windows.id(), "windows");
        assert_eq!(TlPlatform::X86_64Linux.id(), "x86_64-linux");
        assert_eq!(TlPlatform::Aarch64Linux.id(), "aarch64-linux");
    }

    #[test]
    fn windows_specific_names() {
        assert_eq!(TlPlatform::Windows.installer_archive(), "install-tl.zip");
        assert_eq!(TlPlatform::Windows.installer_script(), "install-tl-windows.bat");
        assert_eq!(TlPlatform::Windows.tlmgr(), "tlmgr.bat");
        assert_eq!(TlPlatform::X86_64Linux.installer_archive(), "install-tl-unx.tar.gz");
        assert_eq!(TlPlatform::X86_64Linux.tlmgr(), "tlmgr");
    }
}
