//! Collagen: compile a skeleton folder into one self-contained SVG
//!
//! A skeleton is a folder holding a manifest (`collagen.json`, or
//! `collagen.jsonnet` expanded by a template compiler) and the assets it
//! references. The generator embeds images and fonts as base64 data URIs,
//! splices nested skeletons and raw SVG files in as groups, substitutes
//! `{name}` variables and writes the result as a single SVG document.
//!
//! # Basic Usage
//!
//! ```rust,no_run
//! use clgn::{generate_file, Result};
//!
//! fn main() -> Result<()> {
//!     generate_file("skeleton", "out.svg")?;
//!     Ok(())
//! }
//! ```
//!
//! # Generation Pipeline
//!
//! 1. **Load**: pick the manifest file, expand templates, parse JSON
//! 2. **Validate**: classify every object into a typed tag
//! 3. **Resolve**: substitute variables, load assets, include nested skeletons
//! 4. **Serialize**: write the element tree as XML
//!
//! Output is byte-for-byte stable: the same skeleton always produces the
//! same document.

pub mod ast;
pub mod cli;
pub mod codegen;
pub mod error;
pub mod fonts;
pub mod preprocessor;
pub mod resolver;
pub mod store;
pub mod template;
pub mod types;
pub mod utils;
pub mod validator;
pub mod variable_context;

use serde::Serialize;
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

// Re-export commonly used types and functions
pub use ast::{AttrValue, RootTag, Tag, TagKind, TAG_PRIORITY};
pub use codegen::{to_xml, CodeGenerator};
pub use error::{CollagenError, ErrorKind, Result};
pub use fonts::BundledFonts;
pub use preprocessor::{LoadedManifest, ManifestFormat, ManifestLoader};
pub use resolver::{IncludeChain, ResolveStats, Resolver};
pub use store::{DiskStore, ManifestStore, MemoryStore};
pub use template::{ImportResolver, JsonnetCommand, TemplateCompiler};
pub use types::{Element, Node, MAX_INCLUDE_DEPTH};
pub use validator::{validate_manifest, Validator};
pub use variable_context::VariableContext;

/// Generator version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Generation options and settings
#[derive(Clone)]
pub struct GeneratorOptions {
    /// Log each phase of the run
    pub debug_mode: bool,

    /// Maximum number of nested skeletons
    pub max_include_depth: usize,

    /// Variables visible to the top-level manifest, outermost scope
    pub custom_variables: Vec<(String, String)>,

    /// Fonts available to `"bundled": true` font faces, the built-in table
    /// by default
    pub fonts: Arc<BundledFonts>,

    /// Compiler for `collagen.jsonnet` manifests
    pub template_compiler: Option<Arc<dyn TemplateCompiler + Send + Sync>>,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            debug_mode: false,
            max_include_depth: MAX_INCLUDE_DEPTH,
            custom_variables: Vec::new(),
            fonts: BundledFonts::builtin(),
            template_compiler: Some(Arc::new(JsonnetCommand::default())),
        }
    }
}

impl fmt::Debug for GeneratorOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeneratorOptions")
            .field("debug_mode", &self.debug_mode)
            .field("max_include_depth", &self.max_include_depth)
            .field("custom_variables", &self.custom_variables)
            .field("fonts", &self.fonts.names().collect::<Vec<_>>())
            .field("template_compiler", &self.template_compiler.is_some())
            .finish()
    }
}

/// Generation statistics and metrics
#[derive(Debug, Clone, Default, Serialize)]
pub struct GenerationStats {
    /// Size of the top-level manifest source in bytes
    pub source_size: u64,

    /// Size of the SVG document in bytes
    pub output_size: u64,

    /// Counters collected during resolution
    pub resolve: ResolveStats,

    /// Generation time in milliseconds
    pub generate_time_ms: u64,
}

/// Generate with default options, reading from `in_folder` and writing the
/// SVG to `out_file`
pub fn generate_file(in_folder: impl AsRef<Path>, out_file: impl AsRef<Path>) -> Result<GenerationStats> {
    generate_file_with_options(in_folder, out_file, &GeneratorOptions::default())
}

/// Generate from a folder on disk with custom options
pub fn generate_file_with_options(
    in_folder: impl AsRef<Path>,
    out_file: impl AsRef<Path>,
    options: &GeneratorOptions,
) -> Result<GenerationStats> {
    let in_folder = in_folder.as_ref();
    let out_file = out_file.as_ref();

    if options.debug_mode {
        log::info!("{} v{}", NAME, VERSION);
        log::info!("Generating '{}' from '{}'...", out_file.display(), in_folder.display());
        log::debug!("Generator options: {:?}", options);
    }

    let store = DiskStore::new(in_folder)?;
    let (svg, stats) = generate_from_store(&store, options)?;

    std::fs::write(out_file, svg)?;

    if options.debug_mode {
        log::info!("Generation successful!");
        log::info!("Output size: {} bytes", stats.output_size);
        log::info!("Generate time: {}ms", stats.generate_time_ms);
        log::debug!("Full stats: {:?}", stats);
    }

    Ok(stats)
}

/// Generate an SVG document from the skeleton at the root of `store`
pub fn generate_from_store(
    store: &dyn ManifestStore,
    options: &GeneratorOptions,
) -> Result<(String, GenerationStats)> {
    let start_time = Instant::now();

    let compiler = options
        .template_compiler
        .as_deref()
        .map(|compiler| compiler as &dyn TemplateCompiler);

    if options.debug_mode {
        log::debug!("Phase 1: Loading manifest...");
    }
    let manifest = ManifestLoader::new(store, compiler).load("")?;

    let mut globals = Vec::with_capacity(options.custom_variables.len());
    for (name, value) in &options.custom_variables {
        if !utils::is_valid_identifier(name) {
            return Err(CollagenError::Config {
                message: format!("Invalid custom variable name '{}'", name),
            });
        }
        globals.push((name.clone(), AttrValue::String(value.clone())));
    }

    if options.debug_mode {
        log::debug!("Phase 2: Resolving {} ({:?})...", manifest.path, manifest.format);
    }
    let mut resolver = Resolver::new(store, &options.fonts)
        .with_compiler(compiler)
        .with_max_include_depth(options.max_include_depth);
    let root = resolver.resolve_document(&manifest, &globals)?;

    if options.debug_mode {
        log::debug!("Phase 3: Serializing {} elements...", resolver.stats().element_count);
    }
    let svg = to_xml(&root);

    let stats = GenerationStats {
        source_size: manifest.source_size as u64,
        output_size: svg.len() as u64,
        resolve: resolver.stats().clone(),
        generate_time_ms: start_time.elapsed().as_millis() as u64,
    };
    log::info!("Generated {} bytes from {}", stats.output_size, manifest.path);

    Ok((svg, stats))
}

/// Generate an SVG document with default options
pub fn generate_svg(store: &dyn ManifestStore) -> Result<String> {
    let (svg, _stats) = generate_from_store(store, &GeneratorOptions::default())?;
    Ok(svg)
}
