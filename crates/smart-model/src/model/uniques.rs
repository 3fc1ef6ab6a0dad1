//! `unique` rules that ignore the entity's own row

use smart_validation::traits::value_to_string;
use smart_validation::validators::unique::NO_EXCLUSION;
use smart_validation::{RuleSet, RuleSpec};

use super::definition::ModelDefinition;
use super::entity::SmartModel;

impl<M: ModelDefinition> SmartModel<M> {
    /// Rewrite every `unique` rule to `unique:table,column,id[,id_column]`.
    ///
    /// Table and column keep any value already given and otherwise default
    /// to the model table and the field. The id column is appended only when
    /// the model declares one. Other rules pass through, and `rules` (or the
    /// type defaults) are left untouched.
    pub fn build_unique_exclusion_rules(&self, rules: Option<&RuleSet>) -> RuleSet {
        let defaults;
        let rules = match rules {
            Some(rules) => rules,
            None => {
                defaults = M::rules();
                &defaults
            }
        };

        let except = self
            .primary_key()
            .map(value_to_string)
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| NO_EXCLUSION.to_string());

        rules.map_specs(|field, spec| {
            if !spec.is("unique") {
                return spec.clone();
            }

            let table = spec.param(0).filter(|t| !t.is_empty()).unwrap_or(M::table_name());
            let column = spec.param(1).filter(|c| !c.is_empty()).unwrap_or(field);

            let mut params = vec![table.to_string(), column.to_string(), except.clone()];
            if let Some(id_column) = M::primary_key_name() {
                params.push(id_column.to_string());
            }
            RuleSpec::with_params("unique", params)
        })
    }
}
