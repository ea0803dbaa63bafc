//! Restore, install or refresh, save
//!
//! ```text
//! restore(full, [prefix])
//!   ├─ exact hit ─────────────────────────────► output restored key
//!   ├─ prefix hit ─► refresh ─┬─ ok ─► save ─► output saved key
//!   │                         └─ err ─► accept_stale? output restored key
//!   └─ miss ──────► install ──┬─ ok ─► save ─► output saved key
//!                             └─ err ─► fail
//! ```

use super::exec::ProcessExecutor;
use super::texlive::TexLiveInstaller;
use super::InstallContext;
use crate::archive::Extractor;
use crate::cache::{CacheKey, CacheStore};
use crate::error::SetupResult;
use crate::http::HttpClient;
use crate::mirror::ResolvedRepository;
use crate::output::OutputSink;
use crate::packages::PackageSet;
use crate::platform::TlPlatform;
use tracing::{info, warn};

/// Name of the output carrying the cache key
pub const KEY_OUTPUT: &str = "key";

/// How the installation came to be
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The exact snapshot was restored; nothing ran
    ExactHit { key: String },
    /// Installed from scratch and saved
    Installed { key: String },
    /// An older snapshot was updated and saved
    Refreshed { key: String },
    /// Updating an older snapshot failed; it is used as-is
    StaleAccepted { key: String, reason: String },
}

impl Outcome {
    /// Key reported as the run's output
    pub fn key(&self) -> &str {
        match self {
            Self::ExactHit { key }
            | Self::Installed { key }
            | Self::Refreshed { key }
            | Self::StaleAccepted { key, .. } => key,
        }
    }
}

/// Everything decided before provisioning starts
#[derive(Debug, Clone)]
pub struct InstallRequest {
    pub platform: TlPlatform,
    pub repository: ResolvedRepository,
    pub packages: PackageSet,
    pub key: CacheKey,
    pub accept_stale: bool,
}

/// Drives one provisioning run against its collaborators
pub struct Orchestrator<'a> {
    pub http: &'a dyn HttpClient,
    pub extractor: &'a dyn Extractor,
    pub executor: &'a dyn ProcessExecutor,
    pub store: &'a dyn CacheStore,
    pub sink: &'a dyn OutputSink,
    pub context: &'a InstallContext,
}

impl Orchestrator<'_> {
    pub async fn run(&self, request: &InstallRequest) -> SetupResult<Outcome> {
        let InstallRequest {
            platform,
            repository,
            packages,
            key,
            accept_stale,
        } = request;

        self.sink.add_path(&self.context.bin_dir(*platform)).await?;

        let paths = [self.context.install_root.clone()];
        self.sink.info(&format!("Trying to restore with key {}", key.full));
        let restored = self
            .store
            .restore(&paths, &key.full, std::slice::from_ref(&key.prefix))
            .await?;

        if let Some(restored) = &restored {
            if key.is_exact(restored) {
                self.sink.info(&format!("Restored cache with key {}", restored));
                self.sink.set_output(KEY_OUTPUT, restored).await?;
                return Ok(Outcome::ExactHit {
                    key: restored.clone(),
                });
            }
            self.sink
                .info(&format!("Restored stale cache with key {}", restored));
        }

        let installer = TexLiveInstaller {
            http: self.http,
            extractor: self.extractor,
            executor: self.executor,
            context: self.context,
            platform: *platform,
        };
        let initial = restored.is_none();

        if let Err(e) = installer.run(initial, repository, packages).await {
            return match restored {
                Some(stale) if *accept_stale => {
                    warn!("Update failed, keeping snapshot {}: {}", stale, e);
                    self.sink.warning(&format!(
                        "Updating TeX Live failed, using stale cache {}: {}",
                        stale, e
                    ));
                    self.sink.set_output(KEY_OUTPUT, &stale).await?;
                    Ok(Outcome::StaleAccepted {
                        key: stale,
                        reason: e.to_string(),
                    })
                }
                _ => Err(e),
            };
        }

        let saved = self.store.save(&paths, &key.full).await?;
        info!("Saved installation as {}", saved);
        self.sink.info(&format!("Updated cache with key {}", saved));
        self.sink.set_output(KEY_OUTPUT, &saved).await?;

        Ok(if initial {
            Outcome::Installed { key: saved }
        } else {
            Outcome::Refreshed { key: saved }
        })
    }
}
