//! Snapshot store
//!
//! Snapshots are saved under an exact key and restored either by that key
//! or, failing that, by the most recent snapshot whose key starts with one
//! of the given prefixes.
//!
//! The local store keeps one directory per key holding a tarball per saved
//! path. Keys are opaque, so directory names percent-encode everything
//! outside `[A-Za-z0-9._-]` (and a leading `.`):
//!
//! ```text
//! <root>/
//!   texlive-x86_64-linux-v1%2Fubuntu-<hash>-2024-71234/
//!     0.tar.gz
//! ```

use crate::archive::{pack_tar_gz, unpack_tar_gz_file};
use crate::error::{SetupError, SetupResult};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tokio::fs;
use tokio::task;
use tracing::{debug, info, warn};

/// Maximum length of an encoded entry name
const MAX_ENTRY_NAME_LEN: usize = 255;

/// Prefix of in-progress save directories
const STAGING_PREFIX: &str = ".staging-";

/// Suffix of directories a snapshot is unpacked into before replacing the target
const RESTORING_SUFFIX: &str = ".restoring";

/// Key/value storage for directory snapshots
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Restore `paths` from the snapshot stored under `key`, or from the
    /// newest snapshot matching one of `restore_prefixes`.
    ///
    /// Returns the key that was actually restored. On `None` the paths
    /// are left as they were.
    async fn restore(
        &self,
        paths: &[PathBuf],
        key: &str,
        restore_prefixes: &[String],
    ) -> SetupResult<Option<String>>;

    /// Store `paths` under `key`, returning the saved key
    async fn save(&self, paths: &[PathBuf], key: &str) -> SetupResult<String>;
}

/// Directory name for `key`
fn entry_name(key: &str) -> String {
    let mut name = String::with_capacity(key.len());
    for (index, byte) in key.bytes().enumerate() {
        let plain = byte.is_ascii_alphanumeric()
            || matches!(byte, b'-' | b'_')
            || (byte == b'.' && index > 0);
        if plain {
            name.push(byte as char);
        } else {
            name.push_str(&format!("%{:02X}", byte));
        }
    }
    name
}

/// Key stored in the directory `name`, if it is a valid entry name
fn entry_key(name: &str) -> Option<String> {
    let bytes = name.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = name.get(i + 1..i + 3)?;
            out.push(u8::from_str_radix(hex, 16).ok()?);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8(out).ok()
}

/// Sibling directory a restored path is unpacked into first
fn restoring_path(path: &Path) -> SetupResult<PathBuf> {
    let name = path.file_name().ok_or_else(|| {
        SetupError::CacheStore(format!("Cannot restore into {}", path.display()))
    })?;
    Ok(path.with_file_name(format!(".{}{}", name.to_string_lossy(), RESTORING_SUFFIX)))
}

fn remove_dir_if_exists(path: &Path) -> SetupResult<()> {
    match std::fs::remove_dir_all(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(SetupError::io(format!("removing {}", path.display()), e)),
    }
}

/// Unpack every archive of an entry next to its target, then swap the
/// results into place. Nothing is replaced unless all archives unpack.
fn unpack_entry(entry_dir: &Path, paths: &[PathBuf]) -> SetupResult<()> {
    let mut staged = Vec::new();
    for (index, path) in paths.iter().enumerate() {
        let archive = entry_dir.join(format!("{}.tar.gz", index));
        if !archive.is_file() {
            continue;
        }
        let staging = restoring_path(path)?;
        remove_dir_if_exists(&staging)?;
        staged.push((staging.clone(), path.clone()));

        if let Err(e) = unpack_tar_gz_file(&archive, &staging) {
            for (staging, _) in &staged {
                remove_dir_if_exists(staging).ok();
            }
            return Err(e);
        }
    }

    for (staging, path) in staged {
        remove_dir_if_exists(&path)?;
        std::fs::rename(&staging, &path)
            .map_err(|e| SetupError::io(format!("restoring {}", path.display()), e))?;
    }
    Ok(())
}

/// Store keeping snapshots as tarballs in a local directory
#[derive(Debug, Clone)]
pub struct LocalCacheStore {
    root: PathBuf,
}

impl LocalCacheStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Entry directory name for `key`
    fn checked_entry_name(key: &str) -> SetupResult<String> {
        let invalid = |reason: &str| {
            Err(SetupError::CacheStore(format!(
                "Invalid key {:?}: {}",
                key, reason
            )))
        };
        if key.is_empty() {
            return invalid("key is empty");
        }
        let name = entry_name(key);
        if name.len() > MAX_ENTRY_NAME_LEN {
            return invalid("key is too long");
        }
        Ok(name)
    }

    /// Committed snapshots whose key starts with `prefix`, newest first.
    ///
    /// Yields `(key, directory name)` pairs.
    async fn matching_entries(&self, prefix: &str) -> SetupResult<Vec<(String, String)>> {
        let mut dir = match fs::read_dir(&self.root).await {
            Ok(dir) => dir,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(SetupError::io(
                    format!("listing {}", self.root.display()),
                    e,
                ))
            }
        };

        let mut matches = Vec::new();
        while let Some(entry) = dir
            .next_entry()
            .await
            .map_err(|e| SetupError::io(format!("listing {}", self.root.display()), e))?
        {
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with('.') {
                continue;
            }
            let Some(key) = entry_key(&name).filter(|k| k.starts_with(prefix)) else {
                continue;
            };
            let modified = entry
                .metadata()
                .await
                .and_then(|m| m.modified())
                .unwrap_or(SystemTime::UNIX_EPOCH);
            matches.push((key, name, modified));
        }

        matches.sort_by(|a, b| b.2.cmp(&a.2).then_with(|| b.0.cmp(&a.0)));
        Ok(matches
            .into_iter()
            .map(|(key, name, _)| (key, name))
            .collect())
    }

    async fn find(
        &self,
        key: &str,
        name: &str,
        restore_prefixes: &[String],
    ) -> SetupResult<Option<(String, String)>> {
        if fs::metadata(self.root.join(name))
            .await
            .is_ok_and(|m| m.is_dir())
        {
            return Ok(Some((key.to_string(), name.to_string())));
        }

        for prefix in restore_prefixes {
            if let Some(found) = self.matching_entries(prefix).await?.into_iter().next() {
                return Ok(Some(found));
            }
        }
        Ok(None)
    }

    async fn unpack(&self, name: &str, paths: &[PathBuf]) -> SetupResult<()> {
        let entry_dir = self.root.join(name);
        let paths = paths.to_vec();
        task::spawn_blocking(move || unpack_entry(&entry_dir, &paths))
            .await
            .map_err(|e| SetupError::Internal(format!("Restore task failed: {}", e)))?
    }
}

#[async_trait]
impl CacheStore for LocalCacheStore {
    async fn restore(
        &self,
        paths: &[PathBuf],
        key: &str,
        restore_prefixes: &[String],
    ) -> SetupResult<Option<String>> {
        let name = Self::checked_entry_name(key)?;

        let Some((found, found_name)) = self.find(key, &name, restore_prefixes).await? else {
            debug!("No snapshot matches {}", key);
            return Ok(None);
        };

        if let Err(e) = self.unpack(&found_name, paths).await {
            warn!("Failed to restore snapshot {}: {}", found, e);
            return Ok(None);
        }

        info!("Restored snapshot {}", found);
        Ok(Some(found))
    }

    async fn save(&self, paths: &[PathBuf], key: &str) -> SetupResult<String> {
        let name = Self::checked_entry_name(key)?;

        for path in paths {
            if !fs::metadata(path).await.is_ok_and(|m| m.is_dir()) {
                return Err(SetupError::CacheStore(format!(
                    "Path to cache does not exist: {}",
                    path.display()
                )));
            }
        }

        let staging = self.root.join(format!("{}{}", STAGING_PREFIX, name));
        if fs::metadata(&staging).await.is_ok() {
            fs::remove_dir_all(&staging)
                .await
                .map_err(|e| SetupError::io(format!("clearing {}", staging.display()), e))?;
        }
        fs::create_dir_all(&staging)
            .await
            .map_err(|e| SetupError::io(format!("creating {}", staging.display()), e))?;

        let staged = staging.clone();
        let sources = paths.to_vec();
        task::spawn_blocking(move || {
            for (index, path) in sources.iter().enumerate() {
                pack_tar_gz(path, &staged.join(format!("{}.tar.gz", index)))?;
            }
            Ok::<(), SetupError>(())
        })
        .await
        .map_err(|e| SetupError::Internal(format!("Save task failed: {}", e)))??;

        let target = self.root.join(&name);
        if fs::metadata(&target).await.is_ok() {
            fs::remove_dir_all(&target)
                .await
                .map_err(|e| SetupError::io(format!("replacing {}", target.display()), e))?;
        }
        fs::rename(&staging, &target)
            .await
            .map_err(|e| SetupError::io(format!("committing {}", target.display()), e))?;

        info!("Saved snapshot {}", key);
        Ok(key.to_string())
    }
}
