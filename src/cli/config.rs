// FILE: src/cli/config.rs

use crate::error::{CollagenError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub fonts_dir: Option<String>,
    pub jsonnet_command: Option<String>,
    pub max_include_depth: Option<usize>,
    pub debug: Option<bool>,
    pub variables: Option<BTreeMap<String, String>>,
}

pub fn load(config_path: &str) -> Result<ConfigFile> {
    let config_content = fs::read_to_string(config_path).map_err(|e| CollagenError::Config {
        message: format!("Config file {}: {}", config_path, e),
    })?;
    let config = parse(config_path, &config_content)?;
    log::info!("Loaded configuration from {}", config_path);
    Ok(config)
}

fn parse(config_path: &str, config_content: &str) -> Result<ConfigFile> {
    if config_path.ends_with(".json") {
        serde_json::from_str(config_content).map_err(|e| CollagenError::Config {
            message: format!("Invalid JSON config: {}", e),
        })
    } else if config_path.ends_with(".toml") {
        toml::from_str(config_content).map_err(|e| CollagenError::Config {
            message: format!("Invalid TOML config: {}", e),
        })
    } else {
        Err(CollagenError::Config {
            message: "Config file must be .json or .toml format".to_string(),
        })
    }
}
