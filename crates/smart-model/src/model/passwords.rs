use serde_json::Value;
use tracing::debug;

use super::definition::ModelDefinition;
use super::entity::SmartModel;
use crate::error::ModelResult;

impl<M: ModelDefinition> SmartModel<M> {
    /// Hash each password attribute whose value changed since it was last
    /// persisted. Null and unchanged values are left as they are; an empty
    /// string is hashed like any other password.
    /// Returns how many attributes were hashed.
    pub fn hash_password_attributes(&mut self) -> ModelResult<usize> {
        let pending: Vec<(&'static str, String)> = M::password_attributes()
            .iter()
            .filter(|name| self.is_dirty(name))
            .filter_map(|&name| match self.attributes.get(name)? {
                Value::Null => None,
                Value::String(plain) => Some((name, plain.clone())),
                other => Some((name, other.to_string())),
            })
            .collect();

        if pending.is_empty() {
            return Ok(0);
        }

        let hasher = self.context.hasher_for(&self.config.hasher)?;
        for (name, plain) in &pending {
            let digest = hasher.hash_password(plain)?;
            self.attributes.insert(name.to_string(), Value::String(digest));
        }

        debug!(
            "Hashed {} password attribute(s) on {} with {}",
            pending.len(),
            M::model_name(),
            hasher.hasher_name()
        );
        Ok(pending.len())
    }
}
