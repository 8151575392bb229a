//! Error types for the Collagen generator

use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CollagenError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("No manifest found in '{path}' (expected collagen.jsonnet or collagen.json)")]
    ManifestNotFound { path: String },

    #[error("Failed to parse manifest '{path}': {message}")]
    ManifestParse { path: String, message: String },

    #[error("Failed to compile manifest '{path}': {message}")]
    ManifestCompile { path: String, message: String },

    #[error("Invalid manifest '{path}' at {location}: {message}")]
    Validation {
        path: String,
        location: String,
        message: String,
    },

    #[error("Asset not found: '{path}'")]
    AssetNotFound { path: String },

    #[error("Cannot determine image type of '{path}'{}", kind_suffix(.kind))]
    UnknownImageKind { path: String, kind: Option<String> },

    #[error("Unknown bundled font '{name}'")]
    UnknownBundledFont { name: String },

    #[error("Unresolved variable '{name}' in <{tag}>")]
    UnresolvedVariable { name: String, tag: String },

    #[error("Cyclic include of '{path}' (include chain: {chain})")]
    CyclicInclude { path: String, chain: String },

    #[error("Maximum include depth ({limit}) exceeded at '{path}'")]
    MaxDepthExceeded { limit: usize, path: String },

    #[error("Invalid path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },

    #[error("File '{path}' is not valid UTF-8")]
    InvalidUtf8 { path: String },

    #[error("Malformed SVG '{path}': {message}")]
    MalformedSvg { path: String, message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },
}

pub type Result<T> = std::result::Result<T, CollagenError>;

fn kind_suffix(kind: &Option<String>) -> String {
    match kind {
        Some(kind) => format!(" (kind '{}' is not supported)", kind),
        None => String::new(),
    }
}

/// The user-facing category of a [`CollagenError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Io,
    ManifestNotFound,
    ManifestParseError,
    ManifestCompileError,
    ValidationError,
    AssetNotFound,
    UnknownImageKind,
    UnknownBundledFont,
    UnresolvedVariable,
    CyclicInclude,
    MaxDepthExceeded,
    InvalidPath,
    InvalidUtf8,
    MalformedSvg,
    ConfigError,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Io => "IoError",
            ErrorKind::ManifestNotFound => "ManifestNotFound",
            ErrorKind::ManifestParseError => "ManifestParseError",
            ErrorKind::ManifestCompileError => "ManifestCompileError",
            ErrorKind::ValidationError => "ValidationError",
            ErrorKind::AssetNotFound => "AssetNotFound",
            ErrorKind::UnknownImageKind => "UnknownImageKind",
            ErrorKind::UnknownBundledFont => "UnknownBundledFont",
            ErrorKind::UnresolvedVariable => "UnresolvedVariable",
            ErrorKind::CyclicInclude => "CyclicInclude",
            ErrorKind::MaxDepthExceeded => "MaxDepthExceeded",
            ErrorKind::InvalidPath => "InvalidPath",
            ErrorKind::InvalidUtf8 => "InvalidUtf8",
            ErrorKind::MalformedSvg => "MalformedSvg",
            ErrorKind::ConfigError => "ConfigError",
        };
        f.write_str(name)
    }
}

impl CollagenError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Io(_) => ErrorKind::Io,
            Self::ManifestNotFound { .. } => ErrorKind::ManifestNotFound,
            Self::ManifestParse { .. } => ErrorKind::ManifestParseError,
            Self::ManifestCompile { .. } => ErrorKind::ManifestCompileError,
            Self::Validation { .. } => ErrorKind::ValidationError,
            Self::AssetNotFound { .. } => ErrorKind::AssetNotFound,
            Self::UnknownImageKind { .. } => ErrorKind::UnknownImageKind,
            Self::UnknownBundledFont { .. } => ErrorKind::UnknownBundledFont,
            Self::UnresolvedVariable { .. } => ErrorKind::UnresolvedVariable,
            Self::CyclicInclude { .. } => ErrorKind::CyclicInclude,
            Self::MaxDepthExceeded { .. } => ErrorKind::MaxDepthExceeded,
            Self::InvalidPath { .. } => ErrorKind::InvalidPath,
            Self::InvalidUtf8 { .. } => ErrorKind::InvalidUtf8,
            Self::MalformedSvg { .. } => ErrorKind::MalformedSvg,
            Self::Config { .. } => ErrorKind::ConfigError,
        }
    }

    pub fn validation(
        path: impl Into<String>,
        location: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Validation {
            path: path.into(),
            location: location.into(),
            message: message.into(),
        }
    }

    pub fn invalid_path(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPath {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn asset_not_found(path: impl Into<String>) -> Self {
        Self::AssetNotFound { path: path.into() }
    }

    pub fn unresolved_variable(name: impl Into<String>, tag: impl Into<String>) -> Self {
        Self::UnresolvedVariable {
            name: name.into(),
            tag: tag.into(),
        }
    }
}
