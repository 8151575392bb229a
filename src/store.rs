//! Named-file collections that manifests and assets are read from
//!
//! Paths handed to a store are relative, '/'-separated and may not climb
//! above the store root. Content is always bytes; callers decode UTF-8
//! themselves when they know a file is textual.

use crate::error::{CollagenError, Result};
use crate::utils::normalize_path;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub trait ManifestStore {
    /// Read a file. Missing files fail with `AssetNotFound`.
    fn read(&self, path: &str) -> Result<Vec<u8>>;

    fn exists(&self, path: &str) -> bool;

    /// All file paths under `prefix` (a directory path, `""` for everything),
    /// sorted.
    fn list(&self, prefix: &str) -> Result<Vec<String>>;

    /// Directory on the local file system backing this store, if any.
    fn local_root(&self) -> Option<&Path> {
        None
    }

    /// Identity of a directory for include-cycle detection. Every alias of a
    /// directory (a symlink, `a/../b`) maps to the same string.
    fn canonical_dir(&self, dir: &str) -> Result<String> {
        normalize_path(dir)
    }
}

/// Read a file and decode it as UTF-8.
pub fn read_text(store: &dyn ManifestStore, path: &str) -> Result<String> {
    let bytes = store.read(path)?;
    String::from_utf8(bytes).map_err(|_| CollagenError::InvalidUtf8 {
        path: path.to_string(),
    })
}

fn under_prefix(path: &str, prefix: &str) -> bool {
    prefix.is_empty()
        || path == prefix
        || (path.starts_with(prefix) && path.as_bytes().get(prefix.len()) == Some(&b'/'))
}

/// A store backed by a directory on disk.
#[derive(Debug, Clone)]
pub struct DiskStore {
    root: PathBuf,
}

impl DiskStore {
    pub fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = fs::canonicalize(root.as_ref()).map_err(|e| CollagenError::ManifestNotFound {
            path: format!("{}: {}", root.as_ref().display(), e),
        })?;
        if !root.is_dir() {
            return Err(CollagenError::ManifestNotFound {
                path: format!("{}: not a directory", root.display()),
            });
        }
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a store path onto the file system, refusing anything that lands
    /// outside the root once symlinks are followed.
    fn full_path(&self, path: &str) -> Result<PathBuf> {
        let normalized = normalize_path(path)?;
        let mut full = self.root.clone();
        for segment in normalized.split('/').filter(|s| !s.is_empty()) {
            full.push(segment);
        }

        if let Ok(canonical) = fs::canonicalize(&full) {
            if !canonical.starts_with(&self.root) {
                return Err(CollagenError::invalid_path(
                    path,
                    "resolves outside the skeleton root",
                ));
            }
            return Ok(canonical);
        }
        Ok(full)
    }

    /// Store path of a file system path under the root.
    fn store_path(&self, full: &Path) -> Result<String> {
        let relative = full.strip_prefix(&self.root).map_err(|_| {
            CollagenError::invalid_path(full.display().to_string(), "resolves outside the skeleton root")
        })?;
        let segments: Option<Vec<&str>> = relative.components().map(|c| c.as_os_str().to_str()).collect();
        segments
            .map(|segments| segments.join("/"))
            .ok_or_else(|| CollagenError::invalid_path(full.display().to_string(), "path is not valid UTF-8"))
    }
}

impl ManifestStore for DiskStore {
    fn read(&self, path: &str) -> Result<Vec<u8>> {
        let full = self.full_path(path)?;
        match fs::read(&full) {
            Ok(bytes) => {
                log::trace!("Read {} bytes from {}", bytes.len(), full.display());
                Ok(bytes)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(CollagenError::asset_not_found(path)),
            Err(e) if full.is_dir() => {
                log::debug!("Cannot read directory {}: {}", full.display(), e);
                Err(CollagenError::asset_not_found(path))
            }
            Err(e) => Err(CollagenError::Io(e)),
        }
    }

    fn exists(&self, path: &str) -> bool {
        self.full_path(path).map(|full| full.is_file()).unwrap_or(false)
    }

    fn list(&self, prefix: &str) -> Result<Vec<String>> {
        let prefix = normalize_path(prefix)?;
        let start = self.full_path(&prefix)?;
        if !start.exists() {
            return Ok(Vec::new());
        }

        let mut paths = Vec::new();
        for entry in WalkDir::new(&start).follow_links(false) {
            let entry = entry.map_err(|e| {
                CollagenError::Io(io::Error::new(
                    io::ErrorKind::Other,
                    format!("Directory traversal error: {}", e),
                ))
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            paths.push(self.store_path(entry.path())?);
        }

        paths.sort();
        Ok(paths)
    }

    fn local_root(&self) -> Option<&Path> {
        Some(&self.root)
    }

    fn canonical_dir(&self, dir: &str) -> Result<String> {
        let full = self.full_path(dir)?;
        match fs::canonicalize(&full) {
            Ok(canonical) => self.store_path(&canonical),
            // missing folders are reported when their manifest is looked up
            Err(_) => normalize_path(dir),
        }
    }
}

/// A store holding files in memory, e.g. files uploaded through a browser.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    files: BTreeMap<String, Vec<u8>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: &str, content: impl Into<Vec<u8>>) -> Result<()> {
        let normalized = normalize_path(path)?;
        if normalized.is_empty() {
            return Err(CollagenError::invalid_path(path, "a file needs a name"));
        }
        self.files.insert(normalized, content.into());
        Ok(())
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with_file(mut self, path: &str, content: impl Into<Vec<u8>>) -> Result<Self> {
        self.insert(path, content)?;
        Ok(self)
    }

    /// Copy every file of another store.
    pub fn snapshot(store: &dyn ManifestStore) -> Result<Self> {
        let mut snapshot = Self::new();
        for path in store.list("")? {
            let content = store.read(&path)?;
            snapshot.files.insert(path, content);
        }
        Ok(snapshot)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl ManifestStore for MemoryStore {
    fn read(&self, path: &str) -> Result<Vec<u8>> {
        let normalized = normalize_path(path)?;
        self.files
            .get(&normalized)
            .cloned()
            .ok_or_else(|| CollagenError::asset_not_found(path))
    }

    fn exists(&self, path: &str) -> bool {
        normalize_path(path)
            .map(|normalized| self.files.contains_key(&normalized))
            .unwrap_or(false)
    }

    fn list(&self, prefix: &str) -> Result<Vec<String>> {
        let prefix = normalize_path(prefix)?;
        Ok(self
            .files
            .keys()
            .filter(|path| under_prefix(path, &prefix))
            .cloned()
            .collect())
    }
}
