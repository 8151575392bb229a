//! Read-only table of fonts that manifests can reference with `"bundled": true`

use crate::error::{CollagenError, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::{Arc, OnceLock};

/// Fonts compiled into the binary. Licenses live next to the files in
/// `assets/fonts/`.
const BUILTIN_FONTS: &[(&str, &[u8])] = &[
    ("Open Sans", include_bytes!("../assets/fonts/OpenSans-Regular.woff2")),
    ("Source Code Pro", include_bytes!("../assets/fonts/SourceCodePro-Medium.woff2")),
];

/// Bundled woff2 fonts keyed by family name.
///
/// Built once at start-up and shared read-only with every generation run.
#[derive(Debug, Clone, Default)]
pub struct BundledFonts {
    fonts: BTreeMap<String, Arc<[u8]>>,
}

impl BundledFonts {
    /// An empty table. Most callers want [`builtin`](Self::builtin).
    pub fn new() -> Self {
        Self::default()
    }

    /// The fonts shipped with the binary, built on first use.
    pub fn builtin() -> Arc<BundledFonts> {
        static BUILTIN: OnceLock<Arc<BundledFonts>> = OnceLock::new();
        BUILTIN
            .get_or_init(|| {
                let mut fonts = Self::new();
                for (name, woff2) in BUILTIN_FONTS {
                    fonts.fonts.insert(name.to_string(), Arc::from(*woff2));
                }
                Arc::new(fonts)
            })
            .clone()
    }

    pub fn with_font(mut self, name: impl Into<String>, woff2: impl Into<Vec<u8>>) -> Self {
        let bytes: Vec<u8> = woff2.into();
        self.fonts.insert(name.into(), Arc::from(bytes));
        self
    }

    /// Load every `<Name>.woff2` file of a directory. The file stem is the
    /// family name.
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let mut fonts = Self::new();
        fonts.extend_from_dir(dir)?;
        Ok(fonts)
    }

    /// Add the `*.woff2` files of a directory, replacing fonts of the same
    /// name. Returns how many were loaded.
    pub fn extend_from_dir(&mut self, dir: impl AsRef<Path>) -> Result<usize> {
        let dir = dir.as_ref();
        let entries = fs::read_dir(dir).map_err(|e| CollagenError::Config {
            message: format!("Cannot read fonts directory {}: {}", dir.display(), e),
        })?;

        let mut loaded = 0;
        for entry in entries {
            let path = entry?.path();
            let is_woff2 = path
                .extension()
                .map(|ext| ext.eq_ignore_ascii_case("woff2"))
                .unwrap_or(false);
            if !is_woff2 || !path.is_file() {
                continue;
            }
            let name = match path.file_stem().and_then(|stem| stem.to_str()) {
                Some(name) => name.to_string(),
                None => {
                    log::warn!("Skipping font with non-UTF-8 name {}", path.display());
                    continue;
                }
            };
            let bytes = fs::read(&path)?;
            log::debug!("Bundled font '{}' ({} bytes)", name, bytes.len());
            self.fonts.insert(name, Arc::from(bytes));
            loaded += 1;
        }

        Ok(loaded)
    }

    pub fn get(&self, name: &str) -> Result<&[u8]> {
        self.fonts
            .get(name)
            .map(|bytes| bytes.as_ref())
            .ok_or_else(|| CollagenError::UnknownBundledFont {
                name: name.to_string(),
            })
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fonts.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fonts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }
}
