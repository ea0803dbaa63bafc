//! Installer and package manager invocation
//!
//! A fresh installation downloads `install-tl`, runs it with a minimal
//! profile, then configures `tlmgr` and installs the requested packages.
//! An installation restored from an older snapshot only gets its
//! repository updated. Both end with `tlmgr update --self --all`.

use super::exec::{ExecOptions, ProcessExecutor};
use super::profile::render_profile;
use super::InstallContext;
use crate::archive::{ArchiveKind, Extractor};
use crate::error::{SetupError, SetupResult};
use crate::http::HttpClient;
use crate::mirror::ResolvedRepository;
use crate::packages::PackageSet;
use crate::platform::TlPlatform;
use tokio::fs;
use tracing::{debug, info};

/// Directory the installer archive is extracted into
const INSTALLER_DIR: &str = "install-texlive";

/// Profile file written next to the installer
const PROFILE_FILE: &str = "texlive.profile";

/// Runs `install-tl` and `tlmgr` for one installation
pub struct TexLiveInstaller<'a> {
    pub http: &'a dyn HttpClient,
    pub extractor: &'a dyn Extractor,
    pub executor: &'a dyn ProcessExecutor,
    pub context: &'a InstallContext,
    pub platform: TlPlatform,
}

impl TexLiveInstaller<'_> {
    /// Bring the installation up to date.
    ///
    /// `initial` selects a full install; otherwise an existing installation
    /// is assumed under the install root.
    pub async fn run(
        &self,
        initial: bool,
        repository: &ResolvedRepository,
        packages: &PackageSet,
    ) -> SetupResult<()> {
        if initial {
            info!("Installing TeX Live for {}", self.platform);
            self.install(repository).await?;
            self.tlmgr("Setting tlmgr options", &["option", "--", "autobackup", "0"], false)
                .await?;
            self.set_repository(repository).await?;
            if packages.is_empty() {
                debug!("No packages requested");
            } else {
                let mut args = vec!["install".to_string()];
                args.extend(packages.iter().map(str::to_string));
                self.tlmgr_args("Installing packages", &args, false).await?;
            }
        } else {
            info!("Updating cached TeX Live installation");
            self.set_repository(repository).await?;
        }

        self.tlmgr("Updating TeX Live", &["update", "--self", "--all"], true)
            .await
    }

    async fn install(&self, repository: &ResolvedRepository) -> SetupResult<()> {
        let base = repository
            .url
            .as_deref()
            .unwrap_or(&self.context.default_repository);
        let archive = self.platform.installer_archive();
        let url = format!("{}/{}", base.trim_end_matches('/'), archive);

        info!("Downloading {}", url);
        let response = self.http.get(&url).await?;
        if !response.is_ok() {
            return Err(SetupError::DownloadFailed {
                description: "Downloading installer".to_string(),
                status: response.status,
            });
        }

        let kind = ArchiveKind::from_file_name(archive)
            .ok_or_else(|| SetupError::Internal(format!("Unknown archive format: {}", archive)))?;
        let installer_dir = self.context.temp_dir.join(INSTALLER_DIR);
        self.extractor
            .extract(response.body, kind, &installer_dir, 1)
            .await?;

        let profile = self.context.temp_dir.join(PROFILE_FILE);
        let contents = render_profile(&self.context.home, &self.context.install_root);
        fs::write(&profile, contents)
            .await
            .map_err(|e| SetupError::io(format!("writing {}", profile.display()), e))?;

        let mut args = Vec::new();
        if let Some(url) = &repository.url {
            args.push(format!("--repository={}", url));
        }
        args.push(format!("--profile={}", profile.display()));

        let script = installer_dir.join(self.platform.installer_script());
        let status = self
            .executor
            .exec(&script, &args, ExecOptions::verbatim())
            .await?;
        if status != 0 {
            return Err(SetupError::InstallerExit {
                description: "Installing TeX Live".to_string(),
                status,
            });
        }
        Ok(())
    }

    async fn set_repository(&self, repository: &ResolvedRepository) -> SetupResult<()> {
        self.tlmgr(
            "Setting repository",
            &["option", "repository", repository.tlmgr_repository()],
            false,
        )
        .await
    }

    async fn tlmgr(&self, description: &str, args: &[&str], verbatim: bool) -> SetupResult<()> {
        let args: Vec<String> = args.iter().map(|a| a.to_string()).collect();
        self.tlmgr_args(description, &args, verbatim).await
    }

    async fn tlmgr_args(
        &self,
        description: &str,
        args: &[String],
        verbatim: bool,
    ) -> SetupResult<()> {
        let program = self.context.tlmgr(self.platform);
        let options = ExecOptions {
            verbatim_args: verbatim,
        };
        debug!("{}", description);
        check_status(description, self.executor.exec(&program, args, options).await?)
    }
}

fn check_status(description: &str, status: i32) -> SetupResult<()> {
    if status == 0 {
        Ok(())
    } else {
        Err(SetupError::PackageManagerExit {
            description: description.to_string(),
            status,
        })
    }
}
