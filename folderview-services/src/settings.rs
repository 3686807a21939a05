// SPDX-License-Identifier: LGPL-3.0-only
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use smol::fs;
use thiserror::Error;
use xdg::BaseDirectories;

/// XDG prefix under which configuration files are looked up.
pub const XDG_PREFIX: &str = "folderview";

/// File name of the configuration file inside each XDG directory.
pub const CONFIG_FILE: &str = "config.toml";

/// Errors raised while reading or decoding settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The file could not be read.
    #[error("failed to read config file {path:?}: {source}")]
    Read {
        /// File that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The file is not valid TOML or does not match the expected layout.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    /// A section exists but does not deserialize into the requested type.
    #[error("invalid [{name}] section: {source}")]
    Section {
        /// Section name.
        name: String,
        /// Decoding error.
        #[source]
        source: toml::de::Error,
    },
}

/// The main configuration structure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// General settings
    #[serde(default)]
    pub general: GeneralSettings,
    /// Any other sections are captured here, keyed by table name
    #[serde(flatten)]
    pub other: HashMap<String, toml::Value>,
}

/// Settings shared by every component.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeneralSettings {
    pub debug: Option<bool>,
    pub log_level: Option<String>,
}

/// Registry for layered settings.
///
/// Files are merged in load order, later ones overriding single keys of the
/// earlier ones. Components pull their own typed section out with
/// [SettingsRegistry::section].
#[derive(Debug, Clone, Default)]
pub struct SettingsRegistry {
    config: Config,
}

impl SettingsRegistry {
    /// Create a registry and load configuration from the standard locations.
    pub async fn new() -> Result<Self> {
        let mut registry = Self::default();
        registry.load().await?;
        Ok(registry)
    }

    /// Build a registry from a TOML document. Handy for embedding and tests.
    pub fn from_toml_str(content: &str) -> Result<Self, SettingsError> {
        let mut registry = Self::default();
        registry.merge(toml::from_str::<Config>(content)?);
        Ok(registry)
    }

    /// Load configuration from standard locations in precedence order.
    ///
    /// Order (later overrides earlier):
    /// 1. System Data: /usr/share/folderview/config.toml (and XDG_DATA_DIRS)
    /// 2. System Config: /etc/xdg/folderview/config.toml (and XDG_CONFIG_DIRS)
    /// 3. User Config: ~/.config/folderview/config.toml (XDG_CONFIG_HOME)
    pub async fn load(&mut self) -> Result<()> {
        let xdg_dirs = BaseDirectories::with_prefix(XDG_PREFIX)?;

        for path in xdg_dirs.find_data_files(CONFIG_FILE).rev() {
            self.load_file(&path).await;
        }

        // Config dirs are yielded user first, so reversing puts the user file last.
        for path in xdg_dirs.find_config_files(CONFIG_FILE).rev() {
            self.load_file(&path).await;
        }

        Ok(())
    }

    async fn load_file(&mut self, path: &Path) {
        log::info!("Loading config from: {:?}", path);
        if let Err(e) = self.try_load_file(path).await {
            log::warn!("Skipping config file: {}", e);
        }
    }

    async fn try_load_file(&mut self, path: &Path) -> Result<(), SettingsError> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|source| SettingsError::Read {
                path: path.to_path_buf(),
                source,
            })?;
        let loaded = toml::from_str::<Config>(&content)?;
        self.merge(loaded);
        Ok(())
    }

    /// Load configuration from explicit paths, in order. Returns one result per path.
    pub async fn load_from_paths(&mut self, paths: Vec<PathBuf>) -> Vec<Result<(), SettingsError>> {
        let mut results = Vec::with_capacity(paths.len());
        for path in paths {
            results.push(self.try_load_file(&path).await);
        }
        results
    }

    /// Merge a loaded config into the current config.
    fn merge(&mut self, other: Config) {
        if let Some(debug) = other.general.debug {
            self.config.general.debug = Some(debug);
        }
        if other.general.log_level.is_some() {
            self.config.general.log_level = other.general.log_level;
        }

        for (name, value) in other.other {
            match self.config.other.get_mut(&name) {
                Some(existing) => merge_value(existing, value),
                None => {
                    self.config.other.insert(name, value);
                },
            }
        }
    }

    /// Get the current configuration.
    pub fn get(&self) -> &Config {
        &self.config
    }

    /// Decode the `[name]` section. `Ok(None)` when the section is absent.
    pub fn section<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>, SettingsError> {
        match self.config.other.get(name) {
            Some(value) => value
                .clone()
                .try_into()
                .map(Some)
                .map_err(|source| SettingsError::Section {
                    name: name.to_string(),
                    source,
                }),
            None => Ok(None),
        }
    }
}

/// Overlay `overlay` onto `base`, descending into tables so untouched keys survive.
fn merge_value(base: &mut toml::Value, overlay: toml::Value) {
    match (base, overlay) {
        (toml::Value::Table(base), toml::Value::Table(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(existing) => merge_value(existing, value),
                    None => {
                        base.insert(key, value);
                    },
                }
            }
        },
        (base, overlay) => *base = overlay,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[derive(Debug, Deserialize, PartialEq)]
    struct ViewSection {
        mode: Option<String>,
        size: Option<u32>,
    }

    #[test]
    fn test_merge_boolean_override() {
        let mut registry = SettingsRegistry::from_toml_str("[general]\ndebug = false\n").unwrap();
        registry.merge(toml::from_str("[general]\ndebug = true\n").unwrap());
        assert_eq!(registry.get().general.debug, Some(true));
    }

    #[test]
    fn test_sections_merge_per_key() {
        let mut registry =
            SettingsRegistry::from_toml_str("[view]\nmode = \"icon\"\nsize = 48\n").unwrap();
        registry.merge(toml::from_str("[view]\nsize = 64\n").unwrap());

        let section: ViewSection = registry.section("view").unwrap().unwrap();
        assert_eq!(
            section,
            ViewSection {
                mode: Some("icon".into()),
                size: Some(64)
            }
        );
        assert!(registry.section::<ViewSection>("missing").unwrap().is_none());
    }

    #[test]
    fn test_bad_section_type_is_reported() {
        let registry = SettingsRegistry::from_toml_str("[view]\nsize = \"huge\"\n").unwrap();
        let err = registry.section::<ViewSection>("view").unwrap_err();
        assert!(matches!(err, SettingsError::Section { .. }));
    }

    #[test]
    fn test_load_from_paths_keeps_going_after_errors() {
        let mut good = tempfile::NamedTempFile::new().unwrap();
        writeln!(good, "[view]\nsize = 96").unwrap();
        let mut bad = tempfile::NamedTempFile::new().unwrap();
        writeln!(bad, "this is not toml = = =").unwrap();

        let mut registry = SettingsRegistry::default();
        let results = smol::block_on(registry.load_from_paths(vec![
            bad.path().to_path_buf(),
            PathBuf::from("/nonexistent/folderview.toml"),
            good.path().to_path_buf(),
        ]));

        assert!(matches!(results[0], Err(SettingsError::Parse(_))));
        assert!(matches!(results[1], Err(SettingsError::Read { .. })));
        assert!(results[2].is_ok());
        let section: ViewSection = registry.section("view").unwrap().unwrap();
        assert_eq!(section.size, Some(96));
    }
}
