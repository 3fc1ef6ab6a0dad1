//! The SmartModel entity and its lifecycle

pub mod accessor;
pub mod definition;
pub mod entity;
pub mod passwords;
pub mod purge;
pub mod save;
pub mod uniques;
pub mod validation;

pub use accessor::AttributeValue;
pub use definition::{ModelDefinition, DEFAULT_PRIMARY_KEY};
pub use entity::SmartModel;
pub use purge::{default_purge_filters, PurgeFilter};
pub use save::{AfterSaveHook, BeforeSaveHook, SaveHooks, SaveOptions};
