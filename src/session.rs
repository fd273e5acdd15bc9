use std::collections::HashMap;

use crate::model::User;
use crate::{Error, Result};

/// Key-value session storage, the `localStorage` stand-in. Values are
/// plain strings; the typed user accessors go through JSON.
#[derive(Debug, Default, Clone)]
pub struct Storage {
    map: HashMap<String, String>,
}

impl Storage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_item(&self, key: &str) -> Option<&str> {
        self.map.get(key).map(String::as_str)
    }

    pub fn set_item(&mut self, key: &str, value: &str) {
        self.map.insert(key.to_string(), value.to_string());
    }

    pub fn remove_item(&mut self, key: &str) {
        self.map.remove(key);
    }

    pub fn set_user(&mut self, user: &User) -> Result<()> {
        let serialized = serde_json::to_string(user)
            .map_err(|err| Error::Storage(format!("serialize user: {err}")))?;
        self.set_item("user", &serialized);
        Ok(())
    }

    /// The stored user, or `None` when nobody is logged in. A stored value
    /// that does not deserialize is a storage error, not an absent user.
    pub fn user(&self) -> Result<Option<User>> {
        match self.get_item("user") {
            None => Ok(None),
            Some(raw) => serde_json::from_str(raw)
                .map(Some)
                .map_err(|err| Error::Storage(format!("deserialize user: {err}"))),
        }
    }
}
