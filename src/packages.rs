//! Requested package set
//!
//! Packages are given either inline or through a file, one or more names per
//! line with `#` starting a comment. The set is sorted so the cache key does
//! not depend on how the input was formatted.

use crate::error::{SetupError, SetupResult};
use std::path::Path;
use tokio::fs;
use tracing::debug;

/// Sorted list of package names
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageSet(Vec<String>);

impl PackageSet {
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for PackageSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut packages: Vec<String> = iter.into_iter().map(Into::into).collect();
        packages.sort();
        Self(packages)
    }
}

/// Parse package names, dropping comments and normalising order
pub fn parse_packages(text: &str) -> PackageSet {
    text.lines()
        .map(|line| line.split_once('#').map_or(line, |(before, _)| before))
        .flat_map(str::split_whitespace)
        .collect()
}

/// Load the package list from inline text or a file.
///
/// Inline text wins when both are given.
pub async fn load_packages(inline: Option<&str>, file: Option<&Path>) -> SetupResult<PackageSet> {
    if let Some(text) = inline {
        debug!("Using inline package list");
        return Ok(parse_packages(text));
    }

    let Some(path) = file else {
        return Err(SetupError::MissingPackageInput);
    };

    debug!("Reading package list from {}", path.display());
    let text = fs::read_to_string(path)
        .await
        .map_err(|e| SetupError::PackageFileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
    Ok(parse_packages(&text))
}
