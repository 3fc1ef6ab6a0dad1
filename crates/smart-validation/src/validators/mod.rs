//! Built-in rules

pub mod comparison;
pub mod custom;
pub mod email;
pub mod format;
pub mod membership;
pub mod numeric;
pub mod pattern;
pub mod required;
pub mod size;
pub mod unique;

pub use comparison::FieldComparisonValidator;
pub use custom::{BoundCustomRule, CustomCheck, CustomRule};
pub use email::EmailValidator;
pub use format::{Format, FormatValidator};
pub use membership::MembershipValidator;
pub use numeric::NumericValidator;
pub use pattern::{CharacterClass, CharacterClassValidator, PatternValidator};
pub use required::{AcceptedValidator, RequiredValidator};
pub use size::{SizeConstraint, SizeValidator};
pub use unique::UniqueValidator;
