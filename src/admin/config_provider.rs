//! Sources of the store client configuration served by GET.

use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use crate::admin::error::ConfigError;

/// Supplies the current configuration as text.
///
/// Called synchronously on the connection's task for every GET, with no
/// timeout around it. Implementations must not block: a provider that waits
/// on the network or a lock held elsewhere stalls the connection and ties up
/// a runtime worker thread. Reading a small local file is fine; anything
/// slower should be refreshed in the background and served from memory, the
/// way [`StaticConfigProvider::set`] allows.
pub trait ConfigProvider {
    fn get_all_configs(&self) -> Result<String, ConfigError>;
}

impl<T: ConfigProvider + ?Sized> ConfigProvider for Arc<T> {
    fn get_all_configs(&self) -> Result<String, ConfigError> {
        (**self).get_all_configs()
    }
}

/// Configuration held in memory and replaceable at runtime.
#[derive(Debug, Default)]
pub struct StaticConfigProvider {
    configs: RwLock<String>,
}

impl StaticConfigProvider {
    pub fn new(configs: impl Into<String>) -> Self {
        Self {
            configs: RwLock::new(configs.into()),
        }
    }

    /// Replace the configuration returned from now on.
    pub fn set(&self, configs: impl Into<String>) -> Result<(), ConfigError> {
        let mut guard = self
            .configs
            .write()
            .map_err(|_| ConfigError::Unavailable("configuration lock poisoned".to_string()))?;
        *guard = configs.into();
        Ok(())
    }
}

impl ConfigProvider for StaticConfigProvider {
    fn get_all_configs(&self) -> Result<String, ConfigError> {
        self.configs
            .read()
            .map(|configs| configs.clone())
            .map_err(|_| ConfigError::Unavailable("configuration lock poisoned".to_string()))
    }
}

/// Configuration read from a file on every call, so edits show up immediately.
#[derive(Debug, Clone)]
pub struct FileConfigProvider {
    path: PathBuf,
}

impl FileConfigProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigProvider for FileConfigProvider {
    fn get_all_configs(&self) -> Result<String, ConfigError> {
        std::fs::read_to_string(&self.path).map_err(|source| ConfigError::Read {
            path: self.path.clone(),
            source,
        })
    }
}
