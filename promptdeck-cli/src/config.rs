use confy::ConfyError;
use promptdeck_core::store::{FileConfigStore, DEFAULT_STORAGE_KEY};
use serde::{Deserialize, Serialize};
use std::env::home_dir;
use std::path::PathBuf;

pub const PROMPTDECK_CLI: &str = "promptdeck-cli";

#[derive(Serialize, Deserialize)]
pub struct PromptdeckCliConfig {
    pub base_path: String,
    pub storage_key: String,
}

impl Default for PromptdeckCliConfig {
    fn default() -> Self {
        let base_path = home_dir()
            .map(|p| p.join("promptdeck").join("configs"))
            .unwrap_or_else(|| PathBuf::from("promptdeck/configs"));

        Self {
            base_path: base_path.display().to_string(),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }
}

/// Resolves the config store and storage key, honoring an explicit
/// `--storage-path` override.
pub fn get_store(storage_path: Option<String>) -> (FileConfigStore, String) {
    let config: Result<PromptdeckCliConfig, ConfyError> = confy::load(PROMPTDECK_CLI, None);
    match config {
        Ok(config) => {
            let base_path = storage_path.unwrap_or(config.base_path);
            (
                FileConfigStore {
                    base_path: PathBuf::from(base_path),
                },
                config.storage_key,
            )
        }
        _ => {
            eprintln!("Error: Problem loading config. Exiting...");
            std::process::exit(exitcode::CONFIG);
        }
    }
}
