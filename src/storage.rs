use crate::errors::AppError;
use serde::{de::DeserializeOwned, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::error;

pub const PROFILE_KEY: &str = "userProfile";
pub const FOOD_LOG_KEY: &str = "foodLog";
pub const PREFERENCES_KEY: &str = "preferences";

/// Key-value store keeping one pretty-printed JSON document per key.
#[derive(Debug, Clone)]
pub struct JsonStore {
    dir: PathBuf,
}

impl JsonStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self, std::io::Error> {
        let store = Self::new(dir);
        fs::create_dir_all(&store.dir).await?;
        Ok(store)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    /// Missing or unreadable documents yield the default value.
    pub async fn load<T>(&self, key: &str) -> T
    where
        T: DeserializeOwned + Default,
    {
        let path = self.path_for(key);
        match fs::read(&path).await {
            Ok(bytes) => match serde_json::from_slice(&bytes) {
                Ok(value) => value,
                Err(err) => {
                    error!(key, "failed to parse {}: {err}", path.display());
                    T::default()
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => T::default(),
            Err(err) => {
                error!(key, "failed to read {}: {err}", path.display());
                T::default()
            }
        }
    }

    pub async fn persist<T>(&self, key: &str, value: &T) -> Result<(), AppError>
    where
        T: Serialize,
    {
        let payload = serde_json::to_vec_pretty(value)?;
        fs::write(self.path_for(key), payload)
            .await
            .map_err(AppError::internal)?;
        Ok(())
    }
}
