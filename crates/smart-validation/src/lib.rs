//! # smart-validation
//!
//! Rule-string validation for self-validating models. Rules are written the
//! familiar way (`required|email|unique:users,email`) and evaluated
//! asynchronously against a map of JSON attribute values.
//!
//! ```ignore
//! let rules = RuleSet::new().with("email", "required|email|unique:users");
//! Validator::new()
//!     .with_presence_verifier(verifier)
//!     .evaluate(&data, &rules, &CustomMessages::new())
//!     .await?;
//! ```

pub mod engine;
pub mod error;
pub mod presence;
pub mod rule_set;
pub mod traits;
pub mod validators;

pub use engine::{CustomMessages, Validator};
pub use error::{PresenceError, RuleParseError, ValidationError, ValidationErrors, ValidationResult};
pub use presence::{Exclusion, InMemoryPresenceVerifier, PresenceVerifier};
pub use rule_set::{FieldRules, RuleSet, RuleSpec};
pub use traits::{Data, ValidationRule};

pub use validators::{
    custom::CustomRule,
    email::EmailValidator,
    numeric::NumericValidator,
    pattern::PatternValidator,
    required::RequiredValidator,
    size::SizeValidator,
    unique::UniqueValidator,
};
