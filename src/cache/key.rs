//! Cache key derivation
//!
//! A cache key addresses one snapshot of an installation. The prefix pins
//! everything that changes the installed content (platform, namespace,
//! package set, release); the suffix pins the snapshot within that release,
//! either the repository revision or, when no revision is known, the day.

use crate::mirror::ResolvedRepository;
use crate::packages::PackageSet;
use crate::platform::TlPlatform;
use chrono::NaiveDate;
use sha2::{Digest, Sha256};
use std::fmt;

/// Version placeholder used when no release is known
const NO_VERSION: &str = "NONE";

/// Coarse (`prefix`) and exact (`full`) cache addresses
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheKey {
    /// Stable across runs with the same packages and release
    pub prefix: String,
    /// `prefix` followed by the revision or the current date
    pub full: String,
}

impl CacheKey {
    /// Derive the key for a package set.
    ///
    /// `today` is only consulted when the repository revision is unknown.
    pub fn derive(
        platform: TlPlatform,
        namespace: &str,
        packages: &PackageSet,
        repository: &ResolvedRepository,
        today: NaiveDate,
    ) -> Self {
        let version = repository
            .version
            .map_or_else(|| NO_VERSION.to_string(), |v| v.to_string());
        let prefix = format!(
            "texlive-{}-{}-{}-{}-",
            platform.id(),
            namespace,
            hash_packages(packages),
            version
        );
        let suffix = repository.revision.map_or_else(
            || today.format("%Y-%m-%d").to_string(),
            |r| r.to_string(),
        );
        let full = format!("{}{}", prefix, suffix);
        Self { prefix, full }
    }

    /// Whether a restored key is this exact snapshot
    pub fn is_exact(&self, restored: &str) -> bool {
        self.full == restored
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full)
    }
}

/// SHA256 of the sorted package names, newline separated.
///
/// Names never contain whitespace, so distinct sets hash distinct inputs.
fn hash_packages(packages: &PackageSet) -> String {
    let mut hasher = Sha256::new();
    for (index, package) in packages.iter().enumerate() {
        if index > 0 {
            hasher.update(b"\n");
        }
        hasher.update(package.as_bytes());
    }
    hex::encode(hasher.finalize())
}
