//! Option bag handed to the engine's adapter constructor.

use std::fmt;
use std::sync::Arc;

use kvpouch_level::LevelDown;
use serde_json::{Map, Value};

use crate::error::PouchError;

/// Opens the low-level store for a database location.
pub type DbFactory = Arc<dyn Fn(&str) -> Arc<dyn LevelDown> + Send + Sync>;

/// Options for constructing one database.
///
/// `name` is the database location. `db`, when set, overrides the plugin's
/// default store factory. Everything else the engine understands travels in
/// `extra` untouched.
#[derive(Clone, Default)]
pub struct AdapterOptions {
    pub name: String,
    pub db: Option<DbFactory>,
    pub extra: Map<String, Value>,
}

impl AdapterOptions {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_db(mut self, db: DbFactory) -> Self {
        self.db = Some(db);
        self
    }

    pub fn with_option(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// Build options from a JSON object such as `{"name": "db", "auto_compaction": true}`.
    pub fn from_json(value: Value) -> Result<Self, PouchError> {
        let Value::Object(mut extra) = value else {
            return Err(PouchError::InvalidOptions("expected a JSON object".into()));
        };
        let name = match extra.remove("name") {
            Some(Value::String(name)) => name,
            Some(other) => {
                return Err(PouchError::InvalidOptions(format!(
                    "name must be a string, got {other}"
                )));
            }
            None => String::new(),
        };
        Ok(Self {
            name,
            db: None,
            extra,
        })
    }

    /// Open the low-level store for this database, if a factory is set.
    pub fn open_db(&self) -> Option<Arc<dyn LevelDown>> {
        self.db.as_ref().map(|db| db(&self.name))
    }
}

impl fmt::Debug for AdapterOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdapterOptions")
            .field("name", &self.name)
            .field("db", &self.db.as_ref().map(|_| "<factory>"))
            .field("extra", &self.extra)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json() {
        let opts = AdapterOptions::from_json(serde_json::json!({
            "name": "notes",
            "revs_limit": 10,
        }))
        .unwrap();
        assert_eq!(opts.name, "notes");
        assert!(opts.db.is_none());
        assert_eq!(opts.extra.get("revs_limit"), Some(&serde_json::json!(10)));
        assert!(!opts.extra.contains_key("name"));
    }

    #[test]
    fn test_from_json_rejects_bad_shapes() {
        assert!(matches!(
            AdapterOptions::from_json(serde_json::json!([1, 2])),
            Err(PouchError::InvalidOptions(_))
        ));
        assert!(matches!(
            AdapterOptions::from_json(serde_json::json!({"name": 7})),
            Err(PouchError::InvalidOptions(_))
        ));
    }
}
