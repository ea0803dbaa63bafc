//! Installation provisioning
//!
//! [`Orchestrator`] ties the cache store to the installer: restore the best
//! matching snapshot, install or refresh, then save a new snapshot.

pub mod exec;
pub mod orchestrator;
pub mod profile;
pub mod texlive;

pub use exec::{ExecOptions, ProcessExecutor, TokioExecutor};
pub use orchestrator::{InstallRequest, Orchestrator, Outcome};
pub use texlive::TexLiveInstaller;

use crate::platform::TlPlatform;
use std::path::PathBuf;

/// Filesystem locations for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallContext {
    /// User home, root of the per-user TEXMF trees
    pub home: PathBuf,
    /// Scratch space for the installer and its profile
    pub temp_dir: PathBuf,
    /// TEXDIR of the installation; this is what gets cached
    pub install_root: PathBuf,
    /// Where the installer is downloaded from when no repository is set
    pub default_repository: String,
}

impl InstallContext {
    /// Directory holding the platform's executables
    pub fn bin_dir(&self, platform: TlPlatform) -> PathBuf {
        self.install_root.join("bin").join(platform.id())
    }

    pub fn tlmgr(&self, platform: TlPlatform) -> PathBuf {
        self.bin_dir(platform).join(platform.tlmgr())
    }
}
