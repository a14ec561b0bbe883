//! # Config Store
//!
//! Persistence for the template editing state. A [`ConfigStore`] holds one
//! versioned [`TemplateConfig`] document per storage key; the bundled
//! [`FileConfigStore`] keeps each document as a TOML file in a base
//! directory.
//!
//! # Examples
//!
//! ```rust
//! use promptdeck_core::store::{ConfigStore, FileConfigStore, TemplateConfig, DEFAULT_STORAGE_KEY};
//! use promptdeck_core::defaults::{default_categories, default_templates, default_tokens, CONFIG_VERSION};
//! use tempfile::TempDir;
//!
//! let temp_dir = TempDir::new().unwrap();
//! let store = FileConfigStore {
//!     base_path: temp_dir.path().to_path_buf(),
//! };
//!
//! let config = TemplateConfig {
//!     version: CONFIG_VERSION,
//!     tokens: default_tokens(),
//!     templates: default_templates(),
//!     categories: default_categories(),
//! };
//! store.save(DEFAULT_STORAGE_KEY, &config).expect("Failed to save config");
//! assert!(store.load(DEFAULT_STORAGE_KEY).unwrap().is_some());
//! ```

use crate::template::PromptTemplate;
use crate::token::{CategoryMeta, Token};
use serde::{Deserialize, Serialize};
use std::fs::{self, create_dir_all};
use std::io;
use std::path::PathBuf;
use thiserror::Error;
use walkdir::WalkDir;

/// Storage key used by the editing state manager unless told otherwise.
pub const DEFAULT_STORAGE_KEY: &str = "prompt-templates-config";

/// The versioned document persisted by the editing state manager.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateConfig {
    pub version: u32,
    #[serde(default)]
    pub tokens: Vec<Token>,
    #[serde(default)]
    pub templates: Vec<PromptTemplate>,
    #[serde(default)]
    pub categories: Vec<CategoryMeta>,
}

#[derive(Debug, Error)]
pub enum ConfigStoreError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] toml::ser::Error),
    #[error("deserialization error: {0}")]
    Deserialization(#[from] toml::de::Error),
    #[error("invalid base path: {0}")]
    InvalidBasePath(String),
}

/// Interface for persisting and retrieving config documents by key.
pub trait ConfigStore {
    type Error: std::error::Error + Send + Sync;

    fn save(&self, key: &str, config: &TemplateConfig) -> Result<(), Self::Error>;
    fn load(&self, key: &str) -> Result<Option<TemplateConfig>, Self::Error>;
    fn clear(&self, key: &str) -> Result<(), Self::Error>;
}

/// A local file store for config documents.
///
/// Saves each document as `<key>.toml` in the base directory.
pub struct FileConfigStore {
    /// The base directory where config documents are stored.
    pub base_path: PathBuf,
}

impl ConfigStore for FileConfigStore {
    type Error = ConfigStoreError;

    /// Saves a config document under `key`.
    ///
    /// If `base_path` doesn't exist, it is created first. An existing
    /// document under the same key is overwritten.
    fn save(&self, key: &str, config: &TemplateConfig) -> Result<(), ConfigStoreError> {
        self.ensure_base_directory_exists()?;
        let serialized = toml::to_string(config)?;
        fs::write(self.document_path(key), serialized)?;
        Ok(())
    }

    /// Loads the config document stored under `key`.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(config))` - If a readable document exists.
    /// * `Ok(None)` - If no document has been stored under `key`.
    /// * `ConfigStoreError` - If the document exists but cannot be read or parsed.
    fn load(&self, key: &str) -> Result<Option<TemplateConfig>, ConfigStoreError> {
        let path = self.document_path(key);
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(path)?;
        let config: TemplateConfig = toml::from_str(&content)?;
        Ok(Some(config))
    }

    /// Removes the document stored under `key`. Clearing a key that was
    /// never saved is not an error.
    fn clear(&self, key: &str) -> Result<(), ConfigStoreError> {
        let path = self.document_path(key);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}

impl FileConfigStore {
    pub fn ensure_base_directory_exists(&self) -> Result<(), ConfigStoreError> {
        if !self.base_path.exists() {
            create_dir_all(&self.base_path)?;
        } else if !self.base_path.is_dir() {
            return Err(ConfigStoreError::InvalidBasePath(
                self.base_path.display().to_string(),
            ));
        }
        Ok(())
    }

    /// Lists the keys of every stored document, sorted.
    pub fn keys(&self) -> Result<Vec<String>, ConfigStoreError> {
        if !self.base_path.exists() {
            return Ok(Vec::new());
        }
        let mut keys: Vec<String> = WalkDir::new(&self.base_path)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| {
                e.file_type().is_file()
                    && e.path().extension().map_or(false, |ext| ext == "toml")
            })
            .filter_map(|e| {
                e.path()
                    .file_stem()
                    .map(|stem| stem.to_string_lossy().to_string())
            })
            .collect();
        keys.sort();
        Ok(keys)
    }

    fn document_path(&self, key: &str) -> PathBuf {
        self.base_path.join(format!("{}.toml", key))
    }
}
