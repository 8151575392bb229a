//! Template manifests
//!
//! A `collagen.jsonnet` manifest is expanded to JSON text by an external
//! compiler before validation. The compiler is opaque to the generator: it
//! gets the source text and a way to read sibling files, and returns JSON
//! text or an error message.

use crate::store::{read_text, ManifestStore};
use crate::utils::join_path;
use std::fmt;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

/// Gives a template compiler access to files next to the manifest.
pub trait ImportResolver {
    /// Text of an imported file, relative to the manifest's folder.
    fn read_import(&self, path: &str) -> Option<String>;

    /// Folder on the local file system the manifest lives in, for compilers
    /// that resolve imports themselves.
    fn search_dir(&self) -> Option<PathBuf>;
}

pub trait TemplateCompiler {
    fn compile(
        &self,
        source: &str,
        imports: &dyn ImportResolver,
    ) -> std::result::Result<String, String>;
}

impl<F> TemplateCompiler for F
where
    F: Fn(&str, &dyn ImportResolver) -> std::result::Result<String, String>,
{
    fn compile(
        &self,
        source: &str,
        imports: &dyn ImportResolver,
    ) -> std::result::Result<String, String> {
        self(source, imports)
    }
}

/// Resolves imports against a manifest store.
pub struct StoreImports<'a> {
    store: &'a dyn ManifestStore,
    manifest_dir: String,
}

impl<'a> StoreImports<'a> {
    pub fn new(store: &'a dyn ManifestStore, manifest_dir: impl Into<String>) -> Self {
        Self {
            store,
            manifest_dir: manifest_dir.into(),
        }
    }
}

impl ImportResolver for StoreImports<'_> {
    fn read_import(&self, path: &str) -> Option<String> {
        let full = join_path(&self.manifest_dir, path).ok()?;
        match read_text(self.store, &full) {
            Ok(text) => Some(text),
            Err(e) => {
                log::debug!("Import '{}' unavailable: {}", full, e);
                None
            }
        }
    }

    fn search_dir(&self) -> Option<PathBuf> {
        let mut dir = self.store.local_root()?.to_path_buf();
        for segment in self.manifest_dir.split('/').filter(|s| !s.is_empty()) {
            dir.push(segment);
        }
        Some(dir)
    }
}

/// Runs the `jsonnet` command-line tool.
///
/// The source is piped through stdin. When the store is backed by a local
/// directory the tool runs inside the manifest's folder, so relative imports
/// resolve the way they do for a file on disk.
///
/// The external tool cannot call back into [`ImportResolver::read_import`].
/// With a store that has no local directory, such as [`MemoryStore`],
/// templates that `import` sibling files fail to compile; use a
/// [`TemplateCompiler`] that reads through the resolver instead.
///
/// [`MemoryStore`]: crate::store::MemoryStore
#[derive(Clone)]
pub struct JsonnetCommand {
    program: String,
    extra_args: Vec<String>,
}

impl JsonnetCommand {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            extra_args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.extra_args.push(arg.into());
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl Default for JsonnetCommand {
    fn default() -> Self {
        Self::new("jsonnet")
    }
}

impl fmt::Debug for JsonnetCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonnetCommand")
            .field("program", &self.program)
            .field("extra_args", &self.extra_args)
            .finish()
    }
}

impl TemplateCompiler for JsonnetCommand {
    fn compile(
        &self,
        source: &str,
        imports: &dyn ImportResolver,
    ) -> std::result::Result<String, String> {
        let mut command = Command::new(&self.program);
        command.args(&self.extra_args);
        match imports.search_dir() {
            Some(dir) => {
                command.arg("-J").arg(&dir).current_dir(&dir);
            }
            None => log::warn!("'{}' runs without a search folder; imports will not resolve", self.program),
        }
        command
            .arg("-")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        log::debug!("Running template compiler: {:?}", command);
        let mut child = command
            .spawn()
            .map_err(|e| format!("failed to run '{}': {}", self.program, e))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(source.as_bytes())
                .map_err(|e| format!("failed to send source to '{}': {}", self.program, e))?;
        }

        let output = child
            .wait_with_output()
            .map_err(|e| format!("failed to run '{}': {}", self.program, e))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(stderr.trim().to_string());
        }

        String::from_utf8(output.stdout)
            .map_err(|_| format!("'{}' produced output that is not UTF-8", self.program))
    }
}
