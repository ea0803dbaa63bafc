//! Mirror selection
//!
//! Picks the freshest applicable mirror in the configured region: highest
//! release first, then highest revision, then a uniform random choice among
//! the mirrors that tie on both.

use crate::error::{SetupError, SetupResult};
use crate::mirror::catalog::{MirrorCatalog, MirrorEntry, MirrorRecord};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Country whose mirrors are considered
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub continent: String,
    pub country: String,
}

impl Default for Region {
    fn default() -> Self {
        Self {
            continent: "North America".to_string(),
            country: "USA".to_string(),
        }
    }
}

/// The chosen mirror and the snapshot it serves
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirrorSelection {
    pub url: String,
    pub version: u32,
    pub revision: u64,
}

/// Whether a mirror may serve the requested release.
///
/// Without a request only `Alive` mirrors qualify; `Special` mirrors only
/// serve explicitly pinned releases.
fn is_applicable(entry: &MirrorEntry, requested: Option<u32>) -> bool {
    match (entry, requested) {
        (MirrorEntry::Alive { .. }, None) => true,
        (
            MirrorEntry::Alive {
                texlive_version, ..
            }
            | MirrorEntry::Special {
                texlive_version, ..
            },
            Some(version),
        ) => *texlive_version == version,
        _ => false,
    }
}

/// Select a mirror from `catalog`
pub fn select_mirror<R: Rng>(
    catalog: &MirrorCatalog,
    region: &Region,
    requested: Option<u32>,
    rng: &mut R,
) -> SetupResult<MirrorSelection> {
    let applicable: Vec<(&MirrorRecord, u32, u64)> = catalog
        .in_region(&region.continent, &region.country)
        .filter(|r| is_applicable(&r.entry, requested))
        .filter_map(|r| r.entry.snapshot().map(|(v, rev)| (r, v, rev)))
        .collect();

    let no_mirror = || SetupError::NoMirrorAvailable {
        requested: match requested {
            Some(version) => format!("TeX Live {}", version),
            None => "the current TeX Live release".to_string(),
        },
    };

    let max_version = applicable
        .iter()
        .map(|&(_, v, _)| v)
        .max()
        .ok_or_else(no_mirror)?;
    let max_revision = applicable
        .iter()
        .filter(|&&(_, v, _)| v == max_version)
        .map(|&(_, _, rev)| rev)
        .max()
        .ok_or_else(no_mirror)?;

    let tied: Vec<&MirrorRecord> = applicable
        .iter()
        .filter(|&&(_, v, rev)| v == max_version && rev == max_revision)
        .map(|&(r, _, _)| r)
        .collect();

    debug!(
        candidates = applicable.len(),
        tied = tied.len(),
        "Selecting among mirrors at {} r{}",
        max_version,
        max_revision
    );

    let index = rng.random_range(0..tied.len());
    let chosen = tied.get(index).ok_or_else(no_mirror)?;

    Ok(MirrorSelection {
        url: chosen.url.clone(),
        version: max_version,
        revision: max_revision,
    })
}
