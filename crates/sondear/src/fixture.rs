//! Fixture data loading.
//!
//! Fixtures are named JSON files of key-value text content, read lazily and
//! asynchronously the first time a verification needs them and cached for
//! the rest of the run. The store owns no test logic; it only resolves
//! dotted paths ("home_page.subtitle") to strings.

use crate::result::{SondearError, SondearResult};
use serde_json::Value;
use std::collections::HashMap;
use std::path::PathBuf;
use tokio::sync::Mutex;

/// Lazy, cached store of JSON fixtures under one directory
#[derive(Debug)]
pub struct FixtureStore {
    dir: PathBuf,
    cache: Mutex<HashMap<String, Value>>,
}

impl FixtureStore {
    /// Create a store rooted at a fixtures directory
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// The fixtures directory
    #[must_use]
    pub fn dir(&self) -> &PathBuf {
        &self.dir
    }

    /// Load `<dir>/<name>.json`, reading the file on first access only.
    ///
    /// # Errors
    ///
    /// Returns a `Fixture` error when the file is missing or not valid JSON
    pub async fn load(&self, name: &str) -> SondearResult<Value> {
        {
            let cache = self.cache.lock().await;
            if let Some(value) = cache.get(name) {
                return Ok(value.clone());
            }
        }

        let path = self.dir.join(format!("{name}.json"));
        let raw = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| SondearError::Fixture {
                message: format!("cannot read fixture '{}': {e}", path.display()),
            })?;
        let value: Value = serde_json::from_str(&raw).map_err(|e| SondearError::Fixture {
            message: format!("fixture '{name}' is not valid JSON: {e}"),
        })?;

        tracing::debug!(fixture = name, path = %path.display(), "fixture loaded");

        let mut cache = self.cache.lock().await;
        let _ = cache.insert(name.to_string(), value.clone());
        Ok(value)
    }

    /// Resolve a dotted key path inside a named fixture to a string.
    ///
    /// `text("texts", "home_page.subtitle")` reads `texts.json` and returns
    /// the string at `home_page.subtitle`.
    ///
    /// # Errors
    ///
    /// Returns a `Fixture` error when the file, key path, or string value
    /// is missing
    pub async fn text(&self, name: &str, key_path: &str) -> SondearResult<String> {
        let value = self.load(name).await?;
        let mut current = &value;
        for key in key_path.split('.') {
            current = current.get(key).ok_or_else(|| SondearError::Fixture {
                message: format!("fixture '{name}' has no key '{key_path}'"),
            })?;
        }
        current
            .as_str()
            .map(ToString::to_string)
            .ok_or_else(|| SondearError::Fixture {
                message: format!("fixture '{name}' value at '{key_path}' is not a string"),
            })
    }
}
