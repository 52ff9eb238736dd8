// Copyright (c) 2024-2025 Jesse Morgan / Morgan Forge
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Launcher configuration.
//!
//! Configuration is a Java-style properties file declaring the repositories
//! to fetch from, the dependencies to resolve, the runnable jar, and an
//! optional list of pods to start. Missing required keys and malformed
//! dependency entries are fatal before any fetch begins.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::artifact::ArtifactCoordinate;

/// Directory name under the platform's local app-data dir.
pub const APP_MARKER: &str = "PodRun";

/// Environment variable overriding the install directory.
pub const INSTALL_DIR_ENV: &str = "PODRUN_DIR";

/// Default properties file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "podrun.properties";

/// Fatal configuration errors. These abort startup before any fetch.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} not set!")]
    MissingProperty(&'static str),

    #[error("invalid dependency {0}")]
    InvalidDependency(String),

    #[error("could not determine install directory")]
    NoInstallDir,

    #[error("failed to read config file {path}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Parsed launcher configuration.
#[derive(Debug, Clone)]
pub struct LauncherConfig {
    /// Repository base URLs, tried in order per artifact.
    pub repositories: Vec<String>,
    /// Fully-qualified coordinates to resolve.
    pub dependencies: Vec<ArtifactCoordinate>,
    /// File name of the runnable jar.
    pub jar_name: String,
    /// Application name; selects `apps/<appname>/` under the install dir.
    pub app_name: String,
    /// Pod identifiers to start, may be empty.
    pub pods: Vec<String>,
}

impl LauncherConfig {
    /// Load and parse a properties file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_properties(&parse_properties(&text))
    }

    /// Build a config from an already-parsed property map.
    pub fn from_properties(props: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let repositories = split_list(
            props
                .get("repositories")
                .ok_or(ConfigError::MissingProperty("repositories"))?,
        );

        let mut dependencies = Vec::new();
        for entry in split_list(
            props
                .get("dependencies")
                .ok_or(ConfigError::MissingProperty("dependencies"))?,
        ) {
            dependencies.push(ArtifactCoordinate::parse(&entry)?);
        }

        let jar_name = props
            .get("jarname")
            .ok_or(ConfigError::MissingProperty("jarname"))?
            .clone();
        let app_name = props
            .get("appname")
            .ok_or(ConfigError::MissingProperty("appname"))?
            .clone();

        let pods = props.get("pods").map(|v| split_list(v)).unwrap_or_default();

        Ok(Self {
            repositories,
            dependencies,
            jar_name,
            app_name,
            pods,
        })
    }
}

/// Parse `key=value` properties text.
///
/// Blank lines and lines starting with `#` or `!` are ignored. Values keep
/// everything after the first `=`, so dependency coordinates containing
/// colons pass through untouched. Later keys overwrite earlier ones.
pub fn parse_properties(text: &str) -> HashMap<String, String> {
    let mut props = HashMap::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
            continue;
        }
        if let Some((key, value)) = line.split_once('=') {
            props.insert(key.trim().to_string(), value.trim().to_string());
        }
    }
    props
}

/// Resolve the install directory and make sure it exists.
///
/// Precedence: explicit override (CLI), then `PODRUN_DIR`, then
/// `<platform-local-data-dir>/PodRun`.
pub fn install_dir(override_dir: Option<&Path>) -> Result<PathBuf, ConfigError> {
    let dir = match override_dir {
        Some(dir) => dir.to_path_buf(),
        None => match std::env::var_os(INSTALL_DIR_ENV) {
            Some(dir) => PathBuf::from(dir),
            None => dirs::data_local_dir()
                .ok_or(ConfigError::NoInstallDir)?
                .join(APP_MARKER),
        },
    };
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Cache root under the install directory; created on demand.
pub fn cache_dir(install: &Path) -> Result<PathBuf, ConfigError> {
    let cache = install.join("cache");
    std::fs::create_dir_all(&cache)?;
    Ok(cache)
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
