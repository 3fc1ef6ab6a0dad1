//! Size validators: `min`, `max`, `between` and `size`
//!
//! Strings are measured in characters, arrays and objects in elements, and
//! numbers by value. A numeric string is measured by value only when the
//! field also carries `numeric` or `integer`.

use crate::error::{ValidationError, ValidationResult};
use crate::traits::{display_name, Data, ValidationRule};
use async_trait::async_trait;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Measure {
    Characters,
    Items,
    Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeConstraint {
    Min,
    Max,
    Between,
    Exact,
}

/// Validator for size bounds
#[derive(Debug, Clone)]
pub struct SizeValidator {
    constraint: SizeConstraint,
    lower: f64,
    upper: f64,
    /// Treat numeric strings as numbers
    numeric: bool,
}

impl SizeValidator {
    pub fn min(min: f64) -> Self {
        Self::build(SizeConstraint::Min, min, f64::INFINITY)
    }

    pub fn max(max: f64) -> Self {
        Self::build(SizeConstraint::Max, f64::NEG_INFINITY, max)
    }

    pub fn between(min: f64, max: f64) -> Self {
        Self::build(SizeConstraint::Between, min, max)
    }

    pub fn exact(size: f64) -> Self {
        Self::build(SizeConstraint::Exact, size, size)
    }

    fn build(constraint: SizeConstraint, lower: f64, upper: f64) -> Self {
        Self {
            constraint,
            lower,
            upper,
            numeric: false,
        }
    }

    /// Measure numeric strings by value
    pub fn numeric(mut self, numeric: bool) -> Self {
        self.numeric = numeric;
        self
    }

    fn measure(&self, value: &Value) -> Option<(f64, Measure)> {
        match value {
            Value::Number(n) => n.as_f64().map(|v| (v, Measure::Value)),
            Value::String(s) if self.numeric => s
                .trim()
                .parse::<f64>()
                .ok()
                .map(|v| (v, Measure::Value))
                .or(Some((s.chars().count() as f64, Measure::Characters))),
            Value::String(s) => Some((s.chars().count() as f64, Measure::Characters)),
            Value::Array(arr) => Some((arr.len() as f64, Measure::Items)),
            Value::Object(obj) => Some((obj.len() as f64, Measure::Items)),
            _ => None,
        }
    }

    fn passes(&self, size: f64) -> bool {
        match self.constraint {
            SizeConstraint::Min => size >= self.lower,
            SizeConstraint::Max => size <= self.upper,
            SizeConstraint::Between => size >= self.lower && size <= self.upper,
            SizeConstraint::Exact => (size - self.lower).abs() < f64::EPSILON,
        }
    }

    fn message(&self, field: &str, measure: Measure) -> String {
        let field = display_name(field);
        let unit = match measure {
            Measure::Characters => " characters",
            Measure::Items => " items",
            Measure::Value => "",
        };
        let (lower, upper) = (format_bound(self.lower), format_bound(self.upper));
        match self.constraint {
            SizeConstraint::Min => format!("The {} must be at least {}{}.", field, lower, unit),
            SizeConstraint::Max => format!("The {} may not be greater than {}{}.", field, upper, unit),
            SizeConstraint::Between => {
                format!("The {} must be between {} and {}{}.", field, lower, upper, unit)
            }
            SizeConstraint::Exact => format!("The {} must be {}{}.", field, lower, unit),
        }
    }
}

fn format_bound(bound: f64) -> String {
    if bound.fract() == 0.0 && bound.is_finite() {
        format!("{}", bound as i64)
    } else {
        bound.to_string()
    }
}

#[async_trait]
impl ValidationRule for SizeValidator {
    async fn validate(&self, field: &str, value: &Value, _data: &Data) -> ValidationResult<()> {
        let code = self.rule_name().to_string();
        match self.measure(value) {
            Some((size, _)) if self.passes(size) => Ok(()),
            Some((_, measure)) => {
                Err(ValidationError::with_code(field, self.message(field, measure), code).into())
            }
            None => Err(ValidationError::with_code(
                field,
                format!("The {} has no measurable size.", display_name(field)),
                code,
            )
            .into()),
        }
    }

    fn rule_name(&self) -> &str {
        match self.constraint {
            SizeConstraint::Min => "min",
            SizeConstraint::Max => "max",
            SizeConstraint::Between => "between",
            SizeConstraint::Exact => "size",
        }
    }

    fn replacements(&self) -> Vec<(&'static str, String)> {
        match self.constraint {
            SizeConstraint::Min => vec![(":min", format_bound(self.lower))],
            SizeConstraint::Max => vec![(":max", format_bound(self.upper))],
            SizeConstraint::Between => vec![
                (":min", format_bound(self.lower)),
                (":max", format_bound(self.upper)),
            ],
            SizeConstraint::Exact => vec![(":size", format_bound(self.lower))],
        }
    }
}
