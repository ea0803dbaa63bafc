//! Run command - restore, install or update TeX Live

use crate::archive::ArchiveExtractor;
use crate::cache::{CacheKey, LocalCacheStore};
use crate::cli::args::RunArgs;
use crate::cli::inputs::{EnvInputs, RunInputs};
use crate::config::{Config, ConfigManager};
use crate::error::{SetupError, SetupResult};
use crate::http::{HttpClient, UreqClient};
use crate::install::{InstallContext, InstallRequest, Orchestrator, Outcome, TokioExecutor};
use crate::mirror::{resolve_repository, ResolvedRepository};
use crate::output::{ActionsSink, OutputSink};
use crate::packages::load_packages;
use crate::platform::TlPlatform;
use chrono::Utc;
use tokio::fs;
use tracing::{debug, info};

/// Execute the run command
pub async fn execute(args: RunArgs, config: &Config) -> SetupResult<()> {
    let sink = ActionsSink::from_env();

    match provision(&args, config, &sink).await {
        Ok(outcome) => {
            debug!("Run finished: {:?}", outcome);
            Ok(())
        }
        Err(e) => {
            sink.set_failed(&e.to_string());
            Err(e)
        }
    }
}

async fn provision(args: &RunArgs, config: &Config, sink: &dyn OutputSink) -> SetupResult<Outcome> {
    let inputs = RunInputs::resolve(&args.inputs, &EnvInputs)?;
    let http = UreqClient::new();
    let request = plan(&inputs, config, &http, true).await?;
    let context = install_context(config).await?;

    let store = LocalCacheStore::new(
        config
            .cache
            .dir
            .clone()
            .unwrap_or_else(ConfigManager::default_cache_dir),
    );

    Orchestrator {
        http: &http,
        extractor: &ArchiveExtractor,
        executor: &TokioExecutor,
        store: &store,
        sink,
        context: &context,
    }
    .run(&request)
    .await
}

/// Work out everything a run needs before touching the installation.
///
/// With `use_catalog` unset no mirror is looked up and the repository is
/// only known when given explicitly.
pub async fn plan(
    inputs: &RunInputs,
    config: &Config,
    client: &dyn HttpClient,
    use_catalog: bool,
) -> SetupResult<InstallRequest> {
    let platform = TlPlatform::detect()?;
    let packages = load_packages(inputs.packages.as_deref(), inputs.package_file.as_deref()).await?;
    debug!("Requested {} packages", packages.len());

    let repository = match (&inputs.repository, use_catalog) {
        (Some(url), _) => ResolvedRepository::explicit(url.clone()),
        (None, false) => ResolvedRepository::default(),
        (None, true) => {
            resolve_repository(None, inputs.texlive_version, &config.mirror, client).await?
        }
    };

    let key = CacheKey::derive(
        platform,
        &inputs.cache_version,
        &packages,
        &repository,
        Utc::now().date_naive(),
    );
    info!("Cache key {}", key.full);

    Ok(InstallRequest {
        platform,
        repository,
        packages,
        key,
        accept_stale: inputs.accept_stale,
    })
}

/// Locations for this host, honouring `[install]` overrides
async fn install_context(config: &Config) -> SetupResult<InstallContext> {
    let home = dirs::home_dir()
        .ok_or_else(|| SetupError::Internal("Could not determine home directory".to_string()))?;
    let install_root = config
        .install
        .root
        .clone()
        .unwrap_or_else(|| home.join("texlive"));
    let temp_dir = config
        .install
        .temp_dir
        .clone()
        .unwrap_or_else(std::env::temp_dir);

    fs::create_dir_all(&temp_dir)
        .await
        .map_err(|e| SetupError::io(format!("creating {}", temp_dir.display()), e))?;

    Ok(InstallContext {
        home,
        temp_dir,
        install_root,
        default_repository: config.mirror.default_repository.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::HttpResponse;
    use async_trait::async_trait;
    use std::path::PathBuf;
    use tempfile::TempDir;

    struct OfflineClient;

    #[async_trait]
    impl HttpClient for OfflineClient {
        async fn get(&self, url: &str) -> SetupResult<HttpResponse> {
            Err(SetupError::http(url, "offline"))
        }
    }

    fn inputs() -> RunInputs {
        RunInputs {
            repository: None,
            package_file: None,
            packages: Some("latexmk amsmath".to_string()),
            cache_version: "v1".to_string(),
            texlive_version: None,
            accept_stale: false,
        }
    }

    #[tokio::test]
    async fn plan_without_catalog_uses_date_key() {
        let request = plan(&inputs(), &Config::default(), &OfflineClient, false)
            .await
            .unwrap();

        assert_eq!(request.repository, ResolvedRepository::default());
        assert_eq!(request.packages.as_slice(), ["amsmath", "latexmk"]);
        assert!(request.key.prefix.ends_with("-NONE-"));
        assert_eq!(
            request.key.full,
            format!("{}{}", request.key.prefix, Utc::now().date_naive().format("%Y-%m-%d"))
        );
    }

    #[tokio::test]
    async fn plan_with_unreachable_catalog_falls_back() {
        let request = plan(&inputs(), &Config::default(), &OfflineClient, true)
            .await
            .unwrap();
        assert_eq!(request.repository.url, None);
    }

    #[tokio::test]
    async fn plan_prefers_explicit_repository() {
        let inputs = RunInputs {
            repository: Some("https://example.org/tlnet".to_string()),
            ..inputs()
        };
        let request = plan(&inputs, &Config::default(), &OfflineClient, true)
            .await
            .unwrap();
        assert_eq!(request.repository.url.as_deref(), Some("https://example.org/tlnet"));
        assert_eq!(request.repository.version, None);
    }

    #[tokio::test]
    async fn plan_requires_packages() {
        let inputs = RunInputs {
            packages: None,
            ..inputs()
        };
        let err = plan(&inputs, &Config::default(), &OfflineClient, false)
            .await
            .unwrap_err();
        assert!(matches!(err, SetupError::MissingPackageInput));
    }

    #[tokio::test]
    async fn context_honours_overrides() {
        let temp = TempDir::new().unwrap();
        let mut config = Config::default();
        config.install.root = Some(temp.path().join("tl"));
        config.install.temp_dir = Some(temp.path().join("scratch"));

        let context = install_context(&config).await.unwrap();

        assert_eq!(context.install_root, temp.path().join("tl"));
        assert_eq!(context.temp_dir, temp.path().join("scratch"));
        assert!(context.temp_dir.is_dir());
        assert_eq!(
            context.default_repository,
            "https://mirrors.ctan.org/systems/texlive/tlnet"
        );
        assert_ne!(context.home, PathBuf::new());
    }
}
