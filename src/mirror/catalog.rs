//! Mirror status catalog
//!
//! The catalog is a JSON document published by a mirror monitor:
//!
//! ```json
//! {
//!   "North America": {
//!     "USA": {
//!       "https://mirror.example.edu/ctan/": {
//!         "status": "Alive", "texlive_version": 2024, "revision": 71234
//!       },
//!       "https://old.example.com/CTAN/": { "status": "Dead" }
//!     }
//!   }
//! }
//! ```
//!
//! It is flattened into one record per mirror on load.

use crate::error::{SetupError, SetupResult};
use crate::http::HttpClient;
use serde::Deserialize;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Status of a single mirror as reported by the monitor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(tag = "status")]
pub enum MirrorEntry {
    /// Up to date and serving the current release
    Alive { texlive_version: u32, revision: u64 },
    /// Serving a pinned release only
    Special { texlive_version: u32, revision: u64 },
    Dead,
    Timeout,
}

impl MirrorEntry {
    /// `(version, revision)` for mirrors that serve content
    pub fn snapshot(&self) -> Option<(u32, u64)> {
        match *self {
            Self::Alive {
                texlive_version,
                revision,
            }
            | Self::Special {
                texlive_version,
                revision,
            } => Some((texlive_version, revision)),
            Self::Dead | Self::Timeout => None,
        }
    }
}

/// One mirror with its location in the catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirrorRecord {
    pub continent: String,
    pub country: String,
    pub url: String,
    pub entry: MirrorEntry,
}

type RawCatalog = BTreeMap<String, BTreeMap<String, BTreeMap<String, MirrorEntry>>>;

/// Snapshot of all known mirrors
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MirrorCatalog {
    records: Vec<MirrorRecord>,
}

impl MirrorCatalog {
    /// Parse the catalog JSON document
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        let raw: RawCatalog = serde_json::from_str(text)?;
        let records = raw
            .into_iter()
            .flat_map(|(continent, countries)| {
                countries.into_iter().flat_map(move |(country, mirrors)| {
                    let continent = continent.clone();
                    mirrors.into_iter().map(move |(url, entry)| MirrorRecord {
                        continent: continent.clone(),
                        country: country.clone(),
                        url,
                        entry,
                    })
                })
            })
            .collect();
        Ok(Self { records })
    }

    pub fn from_records(records: Vec<MirrorRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[MirrorRecord] {
        &self.records
    }

    /// Mirrors located in one country of one continent
    pub fn in_region<'a>(
        &'a self,
        continent: &'a str,
        country: &'a str,
    ) -> impl Iterator<Item = &'a MirrorRecord> + 'a {
        self.records
            .iter()
            .filter(move |r| r.continent == continent && r.country == country)
    }
}

/// Result of trying to obtain the catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogFetch {
    Available(MirrorCatalog),
    /// The catalog could not be retrieved; mirror choice is left to `tlmgr`
    Unavailable,
}

/// Download and parse the catalog.
///
/// Network trouble and non-200 answers yield `Unavailable`; a body that
/// arrives but does not parse is an error.
pub async fn fetch_catalog(client: &dyn HttpClient, url: &str) -> SetupResult<CatalogFetch> {
    let response = match client.get(url).await {
        Ok(response) => response,
        Err(e) => {
            warn!("Mirror catalog request failed: {}", e);
            return Ok(CatalogFetch::Unavailable);
        }
    };

    if !response.is_ok() {
        warn!(
            "Mirror catalog returned status code {}",
            response.status
        );
        return Ok(CatalogFetch::Unavailable);
    }

    let text = String::from_utf8_lossy(&response.body);
    let catalog = MirrorCatalog::from_json(&text).map_err(|e| SetupError::CatalogParse {
        url: url.to_string(),
        reason: e.to_string(),
    })?;
    debug!("Loaded {} mirrors from catalog", catalog.records().len());
    Ok(CatalogFetch::Available(catalog))
}
