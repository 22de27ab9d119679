//! Host-owned cache of loaded projects.

use std::sync::Arc;

use hashbrown::HashMap;

use crate::config::Config;
use crate::data::Data;
use crate::error::CutoutError;
use crate::pose::Pose;
use crate::Result;

/// Loaded projects keyed by asset name.
///
/// Each project is parsed and normalized once; every pose created from the
/// store shares the same `Arc<Data>`.
#[derive(Debug, Default)]
pub struct ProjectStore {
    config: Config,
    items: HashMap<String, Arc<Data>>,
}

impl ProjectStore {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            items: HashMap::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Store an already loaded project, replacing any previous entry.
    pub fn insert(&mut self, key: impl Into<String>, data: Data) -> Arc<Data> {
        let data = Arc::new(data);
        self.items.insert(key.into(), Arc::clone(&data));
        data
    }

    pub fn get(&self, key: &str) -> Option<Arc<Data>> {
        self.items.get(key).cloned()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.items.contains_key(key)
    }

    /// Parse `text` under `key` unless a project is already stored there,
    /// in which case the stored one is returned and `text` is ignored.
    pub fn load_json(&mut self, key: &str, text: &str) -> Result<Arc<Data>> {
        if let Some(existing) = self.items.get(key) {
            return Ok(Arc::clone(existing));
        }
        let data = crate::parse_project_json(text, &self.config)?;
        log::debug!(
            "loaded project '{key}' with {} entities",
            data.entities.len()
        );
        Ok(self.insert(key, data))
    }

    /// Drop a project. Poses already holding it keep it alive.
    pub fn remove(&mut self, key: &str) -> Option<Arc<Data>> {
        self.items.remove(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.items.keys().map(String::as_str)
    }

    /// New pose over the project stored under `key`.
    pub fn create_pose(&self, key: &str) -> Result<Pose> {
        let data = self.get(key).ok_or_else(|| CutoutError::ProjectNotFound {
            key: key.to_string(),
        })?;
        Ok(Pose::new(data, self.config.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r#"{ "entity": { "name": "hero", "animation": { "name": "idle", "length": 100 } } }"#;

    #[test]
    fn load_once_then_reuse() {
        let mut store = ProjectStore::default();
        let first = store.load_json("hero.scon", DOC).unwrap();
        let second = store.load_json("hero.scon", "not json").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert!(store.contains("hero.scon"));
    }

    #[test]
    fn poses_share_the_project() {
        let mut store = ProjectStore::default();
        store.load_json("hero.scon", DOC).unwrap();
        let a = store.create_pose("hero.scon").unwrap();
        let b = store.create_pose("hero.scon").unwrap();
        assert!(Arc::ptr_eq(a.data(), b.data()));
    }

    #[test]
    fn missing_project_is_an_error() {
        let store = ProjectStore::default();
        let err = store.create_pose("nope").unwrap_err();
        assert_eq!(err.category(), "store");
        assert!(ProjectStore::default().get("nope").is_none());
    }

    #[test]
    fn bad_document_is_not_stored() {
        let mut store = ProjectStore::default();
        assert!(store.load_json("bad", "[1, 2]").is_err());
        assert!(!store.contains("bad"));
    }
}
