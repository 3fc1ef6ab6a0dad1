//! Purging of attributes that must never reach storage

use tracing::debug;

use super::definition::ModelDefinition;
use super::entity::SmartModel;

/// Returns true for attribute names that should be dropped
pub type PurgeFilter = Box<dyn Fn(&str) -> bool + Send + Sync>;

/// Confirmation fields plus the method-override and CSRF markers
pub fn default_purge_filters() -> Vec<PurgeFilter> {
    vec![
        Box::new(|key: &str| key.ends_with("_confirmation")),
        Box::new(|key: &str| key == "_method"),
        Box::new(|key: &str| key == "_token"),
    ]
}

impl<M: ModelDefinition> SmartModel<M> {
    pub fn add_purge_filter<F>(&mut self, filter: F)
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.purge_filters.push(Box::new(filter));
    }

    /// Back to the default filters only
    pub fn reset_purge_filters(&mut self) {
        self.purge_filters = default_purge_filters();
    }

    pub fn should_purge(&self, key: &str) -> bool {
        self.purge_filters.iter().any(|filter| filter(key))
    }

    /// Drop every matching attribute; returns the dropped names, sorted
    pub fn purge_attributes(&mut self) -> Vec<String> {
        let mut purged: Vec<String> = self
            .attributes
            .keys()
            .filter(|key| self.should_purge(key))
            .cloned()
            .collect();
        purged.sort_unstable();

        for key in &purged {
            self.attributes.remove(key);
        }
        if !purged.is_empty() {
            debug!("Purged {:?} from {}", purged, M::model_name());
        }
        purged
    }
}

#[cfg(test)]
mod tests {
    use crate::model::SmartModel;
    use crate::testing::{context, Widget};
    use serde_json::json;

    fn widget() -> SmartModel<Widget> {
        SmartModel::with_attributes(
            context(),
            [
                ("name", json!("gear")),
                ("password", json!("secret")),
                ("password_confirmation", json!("secret")),
                ("_method", json!("PUT")),
                ("_token", json!("abc")),
                ("_internal", json!(true)),
            ],
        )
    }

    #[test]
    fn test_default_filters() {
        let mut widget = widget();
        let purged = widget.purge_attributes();

        assert_eq!(purged, vec!["_method", "_token", "password_confirmation"]);
        assert!(widget.attribute("password").is_some());
        assert!(widget.attribute("_internal").is_some());
    }

    #[test]
    fn test_custom_filter_and_reset() {
        let mut widget = widget();
        widget.add_purge_filter(|key| key.starts_with('_'));
        assert!(widget.should_purge("_internal"));

        widget.reset_purge_filters();
        assert!(!widget.should_purge("_internal"));
        assert!(widget.should_purge("email_confirmation"));
    }
}
