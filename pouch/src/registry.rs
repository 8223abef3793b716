use std::collections::HashMap;
use std::sync::Arc;

use tracing::info;

use crate::error::PouchError;
use crate::plugin::StoragePlugin;

/// Adapter table the engine consults when opening a database.
#[derive(Default)]
pub struct AdapterRegistry {
    adapters: HashMap<String, Arc<dyn StoragePlugin>>,
    preferred: Vec<String>,
}

impl AdapterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `plugin` under `name`. Plugins reporting `valid() == false`
    /// are refused. With `preferred`, the name is appended to the preference
    /// list used when no adapter is requested explicitly.
    pub fn register(
        &mut self,
        name: &str,
        plugin: Arc<dyn StoragePlugin>,
        preferred: bool,
    ) -> Result<(), PouchError> {
        if !plugin.valid() {
            return Err(PouchError::InvalidAdapter(name.to_string()));
        }
        self.adapters.insert(name.to_string(), plugin);
        if preferred && !self.preferred.iter().any(|p| p == name) {
            self.preferred.push(name.to_string());
        }
        info!(adapter = name, preferred, "pouch: registered adapter");
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn StoragePlugin>> {
        self.adapters.get(name).cloned()
    }

    /// Resolve `name`, or the first preferred adapter when `name` is `None`.
    pub fn resolve(&self, name: Option<&str>) -> Option<Arc<dyn StoragePlugin>> {
        match name {
            Some(n) => self.get(n),
            None => self.preferred.iter().find_map(|n| self.get(n)),
        }
    }

    pub fn preferred(&self) -> &[String] {
        &self.preferred
    }

    pub fn names(&self) -> Vec<&str> {
        self.adapters.keys().map(|s| s.as_str()).collect()
    }
}
