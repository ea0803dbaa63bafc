//! Archive extraction and packing
//!
//! Installer archives wrap their content in a single versioned directory
//! (`install-tl-20240312/`), so extraction can strip leading path
//! components. Entries that would land outside the destination are skipped.

use crate::error::{SetupError, SetupResult};
use async_trait::async_trait;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs::{self, File};
use std::io::{Cursor, Read};
use std::path::{Component, Path, PathBuf};
use tar::Archive as TarArchive;
use tokio::task;
use tracing::debug;

/// Supported archive formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveKind {
    TarGz,
    Zip,
}

impl ArchiveKind {
    /// Guess the format from a file name
    pub fn from_file_name(name: &str) -> Option<Self> {
        let lower = name.to_ascii_lowercase();
        if lower.ends_with(".tar.gz") || lower.ends_with(".tgz") {
            Some(Self::TarGz)
        } else if lower.ends_with(".zip") {
            Some(Self::Zip)
        } else {
            None
        }
    }
}

/// Unpacks downloaded archives
#[async_trait]
pub trait Extractor: Send + Sync {
    /// Extract `bytes` into `dest`, dropping `strip_components` leading
    /// path components from every entry
    async fn extract(
        &self,
        bytes: Vec<u8>,
        kind: ArchiveKind,
        dest: &Path,
        strip_components: usize,
    ) -> SetupResult<()>;
}

/// Extractor backed by `tar`/`flate2` and `zip`
#[derive(Debug, Clone, Copy, Default)]
pub struct ArchiveExtractor;

#[async_trait]
impl Extractor for ArchiveExtractor {
    async fn extract(
        &self,
        bytes: Vec<u8>,
        kind: ArchiveKind,
        dest: &Path,
        strip_components: usize,
    ) -> SetupResult<()> {
        let dest = dest.to_path_buf();
        task::spawn_blocking(move || match kind {
            ArchiveKind::TarGz => {
                unpack_tar(GzDecoder::new(Cursor::new(bytes)), &dest, strip_components)
            }
            ArchiveKind::Zip => unpack_zip(bytes, &dest, strip_components),
        })
        .await
        .map_err(|e| SetupError::Internal(format!("Extraction task failed: {}", e)))?
    }
}

/// Relative path of an entry after stripping, or `None` if nothing is left
/// or the path would escape the destination
fn stripped_path(path: &Path, strip_components: usize) -> Option<PathBuf> {
    let mut out = PathBuf::new();
    for component in path.components().skip(strip_components) {
        match component {
            Component::Normal(part) => out.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    if out.as_os_str().is_empty() {
        None
    } else {
        Some(out)
    }
}

fn archive_error(dest: &Path, reason: impl ToString) -> SetupError {
    SetupError::Archive {
        dest: dest.to_path_buf(),
        reason: reason.to_string(),
    }
}

fn create_dir(dest: &Path, dir: &Path) -> SetupResult<()> {
    fs::create_dir_all(dir).map_err(|e| archive_error(dest, format!("{}: {}", dir.display(), e)))
}

/// Unpack an uncompressed tar stream
pub fn unpack_tar<R: Read>(reader: R, dest: &Path, strip_components: usize) -> SetupResult<()> {
    create_dir(dest, dest)?;
    let mut archive = TarArchive::new(reader);
    let entries = archive.entries().map_err(|e| archive_error(dest, e))?;

    let mut count = 0usize;
    for entry in entries {
        let mut entry = entry.map_err(|e| archive_error(dest, e))?;
        let path = entry.path().map_err(|e| archive_error(dest, e))?.into_owned();
        let Some(relative) = stripped_path(&path, strip_components) else {
            continue;
        };

        let target = dest.join(relative);
        if let Some(parent) = target.parent() {
            create_dir(dest, parent)?;
        }
        entry
            .unpack(&target)
            .map_err(|e| archive_error(dest, format!("{}: {}", path.display(), e)))?;
        count += 1;
    }

    debug!("Unpacked {} tar entries into {}", count, dest.display());
    Ok(())
}

/// Unpack a zip archive held in memory
pub fn unpack_zip(bytes: Vec<u8>, dest: &Path, strip_components: usize) -> SetupResult<()> {
    create_dir(dest, dest)?;
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).map_err(|e| archive_error(dest, e))?;

    let mut count = 0usize;
    for i in 0..archive.len() {
        let mut file = archive.by_index(i).map_err(|e| archive_error(dest, e))?;
        let Some(relative) = file
            .enclosed_name()
            .and_then(|name| stripped_path(&name, strip_components))
        else {
            continue;
        };
        let outpath = dest.join(relative);

        if file.is_dir() {
            create_dir(dest, &outpath)?;
            continue;
        }

        if let Some(parent) = outpath.parent() {
            create_dir(dest, parent)?;
        }
        let mut outfile = File::create(&outpath)
            .map_err(|e| archive_error(dest, format!("{}: {}", outpath.display(), e)))?;
        std::io::copy(&mut file, &mut outfile)
            .map_err(|e| archive_error(dest, format!("{}: {}", outpath.display(), e)))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if let Some(mode) = file.unix_mode() {
                fs::set_permissions(&outpath, fs::Permissions::from_mode(mode)).ok();
            }
        }
        count += 1;
    }

    debug!("Unpacked {} zip entries into {}", count, dest.display());
    Ok(())
}

/// Pack the contents of `src` into a gzip-compressed tarball at `out`.
///
/// Symlinks are stored as links, not followed.
pub fn pack_tar_gz(src: &Path, out: &Path) -> SetupResult<()> {
    let file = File::create(out).map_err(|e| archive_error(out, e))?;
    let mut builder = tar::Builder::new(GzEncoder::new(file, Compression::fast()));
    builder.follow_symlinks(false);
    builder
        .append_dir_all(".", src)
        .map_err(|e| archive_error(out, format!("{}: {}", src.display(), e)))?;
    let encoder = builder.into_inner().map_err(|e| archive_error(out, e))?;
    encoder.finish().map_err(|e| archive_error(out, e))?;
    Ok(())
}

/// Unpack a tarball written by [`pack_tar_gz`]
pub fn unpack_tar_gz_file(archive: &Path, dest: &Path) -> SetupResult<()> {
    let file = File::open(archive)
        .map_err(|e| archive_error(dest, format!("{}: {}", archive.display(), e)))?;
    unpack_tar(GzDecoder::new(file), dest, 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn tar_gz(entries: &[(&str, &[u8])]) -> Vec<u8> {
        let mut builder = tar::Builder::new(GzEncoder::new(Vec::new(), Compression::default()));
        for (path, data) in entries {
            let mut header = tar::Header::new_gnu();
            header.set_size(data.len() as u64);
            header.set_mode(0o755);
            header.set_cksum();
            builder.append_data(&mut header, path, *data).unwrap();
        }
        builder.into_inner().unwrap().finish().unwrap()
    }

    fn zip(entries: &[(&str, &[u8])]) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options = zip::write::SimpleFileOptions::default();
        for (path, data) in entries {
            writer.start_file(*path, options).unwrap();
            writer.write_all(data).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn kind_from_file_name() {
        assert_eq!(
            ArchiveKind::from_file_name("install-tl-unx.tar.gz"),
            Some(ArchiveKind::TarGz)
        );
        assert_eq!(ArchiveKind::from_file_name("install-tl.zip"), Some(ArchiveKind::Zip));
        assert_eq!(ArchiveKind::from_file_name("install-tl.exe"), None);
    }

    #[test]
    fn stripped_path_rules() {
        assert_eq!(
            stripped_path(Path::new("install-tl-2024/install-tl"), 1),
            Some(PathBuf::from("install-tl"))
        );
        assert_eq!(stripped_path(Path::new("install-tl-2024/"), 1), None);
        assert_eq!(stripped_path(Path::new("top/../../etc/passwd"), 1), None);
        assert_eq!(
            stripped_path(Path::new("./a/b"), 0),
            Some(PathBuf::from("a/b"))
        );
    }

    #[tokio::test]
    async fn extract_tar_gz_strips_top_directory() {
        let dir = TempDir::new().unwrap();
        let bytes = tar_gz(&[
            ("install-tl-20240312/install-tl", b"#!/bin/sh\n"),
            ("install-tl-20240312/tlpkg/TeXLive/TLUtils.pm", b"1;"),
        ]);

        ArchiveExtractor
            .extract(bytes, ArchiveKind::TarGz, dir.path(), 1)
            .await
            .unwrap();

        assert!(dir.path().join("install-tl").is_file());
        assert!(dir.path().join("tlpkg/TeXLive/TLUtils.pm").is_file());
        assert!(!dir.path().join("install-tl-20240312").exists());

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = fs::metadata(dir.path().join("install-tl")).unwrap().permissions().mode();
            assert_eq!(mode & 0o111, 0o111);
        }
    }

    #[tokio::test]
    async fn extract_zip_strips_top_directory() {
        let dir = TempDir::new().unwrap();
        let bytes = zip(&[
            ("install-tl-20240312/install-tl-windows.bat", b"@echo off"),
            ("install-tl-20240312/tlpkg/installer/readme.txt", b"hi"),
        ]);

        ArchiveExtractor
            .extract(bytes, ArchiveKind::Zip, dir.path(), 1)
            .await
            .unwrap();

        assert_eq!(
            fs::read(dir.path().join("install-tl-windows.bat")).unwrap(),
            b"@echo off"
        );
        assert!(dir.path().join("tlpkg/installer/readme.txt").is_file());
    }

    #[tokio::test]
    async fn extract_rejects_garbage() {
        let dir = TempDir::new().unwrap();
        let err = ArchiveExtractor
            .extract(b"not an archive".to_vec(), ArchiveKind::Zip, dir.path(), 1)
            .await
            .unwrap_err();
        assert!(matches!(err, SetupError::Archive { .. }));
    }

    #[test]
    fn pack_and_unpack_directory() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("texlive");
        fs::create_dir_all(src.join("bin/x86_64-linux")).unwrap();
        fs::write(src.join("bin/x86_64-linux/tlmgr"), b"tlmgr").unwrap();
        fs::write(src.join("texmf.cnf"), b"% cnf").unwrap();

        let archive = dir.path().join("snapshot.tar.gz");
        pack_tar_gz(&src, &archive).unwrap();

        let dest = dir.path().join("restored");
        unpack_tar_gz_file(&archive, &dest).unwrap();

        assert_eq!(fs::read(dest.join("bin/x86_64-linux/tlmgr")).unwrap(), b"tlmgr");
        assert_eq!(fs::read(dest.join("texmf.cnf")).unwrap(), b"% cnf");
    }
}
