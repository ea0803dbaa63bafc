//! Repository resolution
//!
//! Decides which TeX Live repository the installer and `tlmgr` talk to:
//! an explicitly configured one, a mirror chosen from the status catalog,
//! or none at all (leaving the choice to `tlmgr`'s own CTAN redirector).

pub mod catalog;
pub mod select;

pub use catalog::{fetch_catalog, CatalogFetch, MirrorCatalog, MirrorEntry, MirrorRecord};
pub use select::{select_mirror, MirrorSelection, Region};

use crate::config::schema::MirrorConfig;
use crate::error::SetupResult;
use crate::http::HttpClient;
use rand::Rng;
use tracing::{info, warn};

/// Repository name that makes `tlmgr` pick a CTAN mirror by itself
pub const CTAN_AUTO: &str = "ctan";

/// Location of the TeX Live network installation below a CTAN root
const TLNET_PATH: &str = "systems/texlive/tlnet";

/// Repository to install from, with the snapshot it is known to serve
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedRepository {
    /// `None` lets `tlmgr` select a mirror automatically
    pub url: Option<String>,
    pub version: Option<u32>,
    pub revision: Option<u64>,
}

impl ResolvedRepository {
    /// A repository given by the user; its snapshot is unknown
    pub fn explicit(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            version: None,
            revision: None,
        }
    }

    pub fn from_selection(selection: &MirrorSelection) -> Self {
        Self {
            url: Some(tlnet_url(&selection.url)),
            version: Some(selection.version),
            revision: Some(selection.revision),
        }
    }

    /// Value for `tlmgr option repository`
    pub fn tlmgr_repository(&self) -> &str {
        self.url.as_deref().unwrap_or(CTAN_AUTO)
    }
}

/// URL of the network installation on a CTAN mirror
pub fn tlnet_url(mirror: &str) -> String {
    format!("{}/{}", mirror.trim_end_matches('/'), TLNET_PATH)
}

/// Turn a catalog fetch into a repository.
///
/// An unavailable catalog is not an error: the repository stays unset.
pub fn resolve_from_catalog<R: Rng>(
    fetched: &CatalogFetch,
    region: &Region,
    requested: Option<u32>,
    rng: &mut R,
) -> SetupResult<ResolvedRepository> {
    match fetched {
        CatalogFetch::Unavailable => {
            warn!("Unable to retrieve mirror list, falling back to CTAN auto selection");
            Ok(ResolvedRepository::default())
        }
        CatalogFetch::Available(catalog) => {
            let selection = select_mirror(catalog, region, requested, rng)?;
            info!(
                "Selected mirror {} (TeX Live {}, revision {})",
                selection.url, selection.version, selection.revision
            );
            Ok(ResolvedRepository::from_selection(&selection))
        }
    }
}

/// Resolve the repository for this run
pub async fn resolve_repository(
    explicit: Option<&str>,
    requested: Option<u32>,
    config: &MirrorConfig,
    client: &dyn HttpClient,
) -> SetupResult<ResolvedRepository> {
    if let Some(url) = explicit {
        info!("Using configured repository {}", url);
        return Ok(ResolvedRepository::explicit(url));
    }

    let fetched = fetch_catalog(client, &config.catalog_url).await?;
    resolve_from_catalog(&fetched, &config.region(), requested, &mut rand::rng())
}
