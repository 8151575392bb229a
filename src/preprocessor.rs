//! Manifest loading: pick the manifest file of a folder, expand templates,
//! parse JSON and validate it into a tag tree

use crate::ast::RootTag;
use crate::error::{CollagenError, Result};
use crate::store::{read_text, ManifestStore};
use crate::template::{StoreImports, TemplateCompiler};
use crate::types::{MANIFEST_JSON, MANIFEST_JSONNET};
use crate::utils::join_path;
use crate::validator::validate_manifest;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestFormat {
    Json,
    Jsonnet,
}

impl ManifestFormat {
    pub fn file_name(self) -> &'static str {
        match self {
            ManifestFormat::Json => MANIFEST_JSON,
            ManifestFormat::Jsonnet => MANIFEST_JSONNET,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoadedManifest {
    pub root: RootTag,
    /// Folder of the manifest, relative to the store root.
    pub dir: String,
    /// Path of the manifest file itself.
    pub path: String,
    pub format: ManifestFormat,
    pub source_size: usize,
}

pub struct ManifestLoader<'a> {
    store: &'a dyn ManifestStore,
    compiler: Option<&'a dyn TemplateCompiler>,
}

impl<'a> ManifestLoader<'a> {
    pub fn new(store: &'a dyn ManifestStore, compiler: Option<&'a dyn TemplateCompiler>) -> Self {
        Self { store, compiler }
    }

    /// Find the manifest of a folder. The templated format wins when both
    /// files exist.
    pub fn locate(&self, dir: &str) -> Result<(String, ManifestFormat)> {
        for format in [ManifestFormat::Jsonnet, ManifestFormat::Json] {
            let path = join_path(dir, format.file_name())?;
            if self.store.exists(&path) {
                log::debug!("Using manifest {}", path);
                return Ok((path, format));
            }
        }

        Err(CollagenError::ManifestNotFound {
            path: if dir.is_empty() { ".".to_string() } else { dir.to_string() },
        })
    }

    /// Load, expand, parse and validate the manifest of a folder.
    pub fn load(&self, dir: &str) -> Result<LoadedManifest> {
        let (path, format) = self.locate(dir)?;
        let source = read_text(self.store, &path)?;
        let source_size = source.len();

        let json = match format {
            ManifestFormat::Json => source,
            ManifestFormat::Jsonnet => self.compile(&source, dir, &path)?,
        };

        let value: serde_json::Value =
            serde_json::from_str(&json).map_err(|e| CollagenError::ManifestParse {
                path: path.clone(),
                message: e.to_string(),
            })?;

        let root = validate_manifest(&value, &path)?;

        Ok(LoadedManifest {
            root,
            dir: dir.to_string(),
            path,
            format,
            source_size,
        })
    }

    fn compile(&self, source: &str, dir: &str, path: &str) -> Result<String> {
        let compiler = self.compiler.ok_or_else(|| CollagenError::ManifestCompile {
            path: path.to_string(),
            message: "no template compiler is configured".to_string(),
        })?;

        let imports = StoreImports::new(self.store, dir);
        compiler
            .compile(source, &imports)
            .map_err(|message| CollagenError::ManifestCompile {
                path: path.to_string(),
                message,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::store::MemoryStore;
    use crate::template::ImportResolver;

    fn fake_jsonnet(source: &str, _imports: &dyn ImportResolver) -> std::result::Result<String, String> {
        source
            .strip_prefix("// jsonnet\n")
            .map(str::to_string)
            .ok_or_else(|| "syntax error".to_string())
    }

    #[test]
    fn test_plain_manifest() {
        let store = MemoryStore::new()
            .with_file("collagen.json", r#"{"attrs": {"width": 10}}"#)
            .unwrap();
        let loaded = ManifestLoader::new(&store, None).load("").unwrap();

        assert_eq!(loaded.path, "collagen.json");
        assert_eq!(loaded.dir, "");
        assert_eq!(loaded.format, ManifestFormat::Json);
        assert_eq!(loaded.root.attrs.len(), 1);
    }

    #[test]
    fn test_templated_manifest_wins() {
        let store = MemoryStore::new()
            .with_file("sub/collagen.json", r#"{"attrs": {"from": "json"}}"#)
            .unwrap()
            .with_file("sub/collagen.jsonnet", "// jsonnet\n{\"attrs\": {\"from\": \"jsonnet\"}}")
            .unwrap();
        let loader = ManifestLoader::new(&store, Some(&fake_jsonnet));
        let loaded = loader.load("sub").unwrap();

        assert_eq!(loaded.path, "sub/collagen.jsonnet");
        assert_eq!(loaded.format, ManifestFormat::Jsonnet);
        assert_eq!(loaded.root.attrs[0].1.to_string(), "jsonnet");
    }

    #[test]
    fn test_compile_errors() {
        let store = MemoryStore::new()
            .with_file("collagen.jsonnet", "not jsonnet")
            .unwrap();

        let err = ManifestLoader::new(&store, Some(&fake_jsonnet)).load("").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ManifestCompileError);
        assert!(err.to_string().contains("syntax error"));

        let err = ManifestLoader::new(&store, None).load("").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ManifestCompileError);
    }

    #[test]
    fn test_missing_and_malformed_manifests() {
        let store = MemoryStore::new()
            .with_file("bad/collagen.json", "{ not json")
            .unwrap();
        let loader = ManifestLoader::new(&store, None);

        assert_eq!(loader.load("").unwrap_err().kind(), ErrorKind::ManifestNotFound);
        assert_eq!(loader.load("bad").unwrap_err().kind(), ErrorKind::ManifestParseError);
    }

    #[test]
    fn test_validation_errors_surface() {
        let store = MemoryStore::new()
            .with_file("collagen.json", r#"{"children": [{"tag": "rect", "foo": 1}]}"#)
            .unwrap();
        let err = ManifestLoader::new(&store, None).load("").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValidationError);
        assert!(err.to_string().contains("'foo'"));
    }
}
