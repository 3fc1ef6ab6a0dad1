//! Declarative relations: descriptor tables, resolution, and loading

pub mod descriptor;
pub mod handle;
pub mod kind;
pub mod loader;
pub mod resolver;

pub use descriptor::{RelationDescriptor, RelationTable};
pub use handle::{Relation, RelationHandle};
pub use kind::RelationKind;
pub use loader::{RelationLoader, RelationValue};
pub use resolver::RelationResolver;
