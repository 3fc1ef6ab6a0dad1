//! Static, per-type model declarations

use smart_validation::{CustomMessages, RuleSet};

use crate::config::SmartModelConfig;
use crate::relationships::RelationTable;

/// Identifier column used when a model does not declare one
pub const DEFAULT_PRIMARY_KEY: &str = "id";

/// Everything SmartModel needs to know about a model type. Implemented on
/// a marker type:
///
/// ```ignore
/// struct Order;
///
/// static ORDER_RELATIONS: Lazy<RelationTable> = Lazy::new(|| {
///     RelationTable::new().relation("items", RelationDescriptor::has_many("Item"))
/// });
///
/// impl ModelDefinition for Order {
///     fn model_name() -> &'static str { "Order" }
///     fn table_name() -> &'static str { "orders" }
///     fn relations() -> &'static RelationTable { &ORDER_RELATIONS }
/// }
/// ```
pub trait ModelDefinition: Send + Sync + 'static {
    fn model_name() -> &'static str;

    fn table_name() -> &'static str;

    /// Explicitly declared identifier column. `None` means the default
    /// `id` attribute.
    fn primary_key_name() -> Option<&'static str> {
        None
    }

    fn relations() -> &'static RelationTable {
        RelationTable::empty()
    }

    /// Default rules, used when a call passes none
    fn rules() -> RuleSet {
        RuleSet::new()
    }

    /// Default message overrides
    fn messages() -> CustomMessages {
        CustomMessages::new()
    }

    /// Attributes hashed before persisting when auto-hashing is on
    fn password_attributes() -> &'static [&'static str] {
        &[]
    }

    fn config() -> SmartModelConfig {
        SmartModelConfig::default()
    }
}
