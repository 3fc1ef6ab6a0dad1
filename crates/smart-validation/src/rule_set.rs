//! Structured rule sets
//!
//! Rules arrive either as pipe strings (`"required|email|unique:users"`) or as
//! lists of individual rule strings. Both forms are normalised here into
//! `Vec<RuleSpec>` so nothing downstream branches on the encoding.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::Deserializer;
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

/// Rules whose single argument may itself contain commas
const WHOLE_ARGUMENT_RULES: [&str; 2] = ["regex", "not_regex"];

/// One rule with its parameters, e.g. `between:3,20`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RuleSpec {
    pub name: String,
    pub params: Vec<String>,
}

impl RuleSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
        }
    }

    pub fn with_params<I, S>(name: impl Into<String>, params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            params: params.into_iter().map(Into::into).collect(),
        }
    }

    /// Parse `name` or `name:p1,p2`. Blank input yields `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }

        let (name, rest) = match raw.split_once(':') {
            Some((name, rest)) => (name.trim(), Some(rest)),
            None => (raw, None),
        };

        let params = match rest {
            None => Vec::new(),
            Some(rest) if WHOLE_ARGUMENT_RULES.contains(&name) => vec![rest.to_string()],
            Some("") => Vec::new(),
            Some(rest) => rest.split(',').map(str::to_string).collect(),
        };

        Some(Self {
            name: name.to_string(),
            params,
        })
    }

    pub fn param(&self, index: usize) -> Option<&str> {
        self.params.get(index).map(String::as_str)
    }

    pub fn is(&self, name: &str) -> bool {
        self.name == name
    }
}

impl fmt::Display for RuleSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.params.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}:{}", self.name, self.params.join(","))
        }
    }
}

/// The rules declared for a single field
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldRules(pub Vec<RuleSpec>);

impl FieldRules {
    /// Split a pipe-delimited rule string
    pub fn from_pipe(rules: &str) -> Self {
        Self(rules.split('|').filter_map(RuleSpec::parse).collect())
    }

    /// Parse each entry as exactly one rule
    pub fn from_list<I, S>(rules: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(
            rules
                .into_iter()
                .filter_map(|rule| RuleSpec::parse(rule.as_ref()))
                .collect(),
        )
    }

    pub fn into_inner(self) -> Vec<RuleSpec> {
        self.0
    }
}

impl From<&str> for FieldRules {
    fn from(rules: &str) -> Self {
        Self::from_pipe(rules)
    }
}

impl From<String> for FieldRules {
    fn from(rules: String) -> Self {
        Self::from_pipe(&rules)
    }
}

impl From<Vec<&str>> for FieldRules {
    fn from(rules: Vec<&str>) -> Self {
        Self::from_list(rules)
    }
}

impl From<Vec<String>> for FieldRules {
    fn from(rules: Vec<String>) -> Self {
        Self::from_list(rules)
    }
}

impl From<Vec<RuleSpec>> for FieldRules {
    fn from(rules: Vec<RuleSpec>) -> Self {
        Self(rules)
    }
}

impl From<RuleSpec> for FieldRules {
    fn from(rule: RuleSpec) -> Self {
        Self(vec![rule])
    }
}

/// Field name to ordered rule list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSet {
    fields: BTreeMap<String, Vec<RuleSpec>>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self {
            fields: BTreeMap::new(),
        }
    }

    /// Builder-style insert
    pub fn with(mut self, field: impl Into<String>, rules: impl Into<FieldRules>) -> Self {
        self.insert(field, rules);
        self
    }

    /// Set the rules for `field`, replacing any previous entry
    pub fn insert(&mut self, field: impl Into<String>, rules: impl Into<FieldRules>) {
        self.fields.insert(field.into(), rules.into().into_inner());
    }

    pub fn remove(&mut self, field: &str) -> Option<Vec<RuleSpec>> {
        self.fields.remove(field)
    }

    pub fn get(&self, field: &str) -> Option<&[RuleSpec]> {
        self.fields.get(field).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<RuleSpec>)> {
        self.fields.iter()
    }

    pub fn fields(&self) -> impl Iterator<Item = &String> {
        self.fields.keys()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True when any field carries a rule named `rule`
    pub fn has_rule(&self, rule: &str) -> bool {
        self.fields.values().flatten().any(|spec| spec.is(rule))
    }

    /// Drop fields whose rule list is empty
    pub fn without_empty(mut self) -> Self {
        self.fields.retain(|_, rules| !rules.is_empty());
        self
    }

    /// New set with every spec passed through `f`; the receiver is untouched
    pub fn map_specs<F>(&self, mut f: F) -> Self
    where
        F: FnMut(&str, &RuleSpec) -> RuleSpec,
    {
        let fields = self
            .fields
            .iter()
            .map(|(field, rules)| {
                let rewritten = rules.iter().map(|spec| f(field, spec)).collect();
                (field.clone(), rewritten)
            })
            .collect();
        Self { fields }
    }
}

impl<K, V> FromIterator<(K, V)> for RuleSet
where
    K: Into<String>,
    V: Into<FieldRules>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut set = RuleSet::new();
        for (field, rules) in iter {
            set.insert(field, rules);
        }
        set
    }
}

impl fmt::Display for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, rules) in &self.fields {
            if !first {
                write!(f, "; ")?;
            }
            first = false;
            let joined: Vec<String> = rules.iter().map(RuleSpec::to_string).collect();
            write!(f, "{} => {}", field, joined.join("|"))?;
        }
        Ok(())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawFieldRules {
    Pipe(String),
    List(Vec<String>),
}

impl<'de> Deserialize<'de> for RuleSet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: BTreeMap<String, RawFieldRules> = BTreeMap::deserialize(deserializer)?;
        Ok(raw
            .into_iter()
            .map(|(field, rules)| {
                let rules = match rules {
                    RawFieldRules::Pipe(pipe) => FieldRules::from_pipe(&pipe),
                    RawFieldRules::List(list) => FieldRules::from_list(list),
                };
                (field, rules)
            })
            .collect())
    }
}

impl Serialize for RuleSet {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (field, rules) in &self.fields {
            let list: Vec<String> = rules.iter().map(RuleSpec::to_string).collect();
            map.serialize_entry(field, &list)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rule_with_params() {
        let spec = RuleSpec::parse("between:3,20").unwrap();
        assert_eq!(spec.name, "between");
        assert_eq!(spec.params, vec!["3", "20"]);
        assert_eq!(spec.to_string(), "between:3,20");
    }

    #[test]
    fn test_parse_regex_keeps_commas() {
        let spec = RuleSpec::parse("regex:/^[a-z]{2,4}$/").unwrap();
        assert_eq!(spec.params, vec!["/^[a-z]{2,4}$/"]);
    }

    #[test]
    fn test_blank_rule_is_dropped() {
        assert!(RuleSpec::parse("  ").is_none());
        assert!(FieldRules::from_pipe("").0.is_empty());
        assert_eq!(FieldRules::from_pipe("required||email").0.len(), 2);
    }

    #[test]
    fn test_pipe_and_list_forms_normalise_identically() {
        let piped = RuleSet::new().with("email", "required|email|unique:users");
        let listed = RuleSet::new().with("email", vec!["required", "email", "unique:users"]);
        assert_eq!(piped, listed);
    }

    #[test]
    fn test_without_empty_drops_fields() {
        let rules = RuleSet::new()
            .with("name", "required")
            .with("nickname", "");

        let rules = rules.without_empty();
        assert_eq!(rules.len(), 1);
        assert!(rules.get("nickname").is_none());
    }

    #[test]
    fn test_map_specs_leaves_original_untouched() {
        let rules = RuleSet::new().with("email", "unique");
        let rewritten = rules.map_specs(|_, spec| RuleSpec::with_params(spec.name.clone(), ["users"]));

        assert_eq!(rules.get("email").unwrap()[0].params.len(), 0);
        assert_eq!(rewritten.get("email").unwrap()[0].to_string(), "unique:users");
    }

    #[test]
    fn test_deserialize_mixed_forms() {
        let json = r#"{"name": "required|min:3", "tags": ["array_rule", "max:5"]}"#;
        let rules: RuleSet = serde_json::from_str(json).unwrap();

        assert_eq!(rules.get("name").unwrap()[1], RuleSpec::with_params("min", ["3"]));
        assert_eq!(rules.get("tags").unwrap().len(), 2);
        assert!(rules.has_rule("max"));
    }
}
