//! Field Validation
//!
//! Declarative validation rules attached to form fields in the resource
//! registry. Rules are evaluated on submit only; for each field the first
//! failing rule supplies the message.

use super::record::Draft;
use super::registry::ResourceDef;
use serde::Deserialize;
use std::collections::HashMap;

/// Field name -> error message
pub type FieldErrors = HashMap<String, String>;

/// Validation rule from JSON
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum Rule {
    /// Value must not be blank after trimming
    Required { message: String },
    /// At least `value` characters
    MinLength { value: usize, message: String },
    /// At most `value` characters
    MaxLength { value: usize, message: String },
}

impl Rule {
    /// Check a value, returning the rule's message if it fails
    pub fn check(&self, value: &str) -> Option<&str> {
        let failed = match self {
            Rule::Required { .. } => value.trim().is_empty(),
            Rule::MinLength { value: min, .. } => value.chars().count() < *min,
            Rule::MaxLength { value: max, .. } => value.chars().count() > *max,
        };

        failed.then(|| self.message())
    }

    pub fn message(&self) -> &str {
        match self {
            Rule::Required { message }
            | Rule::MinLength { message, .. }
            | Rule::MaxLength { message, .. } => message,
        }
    }
}

/// First failing rule message for a value
pub fn check_rules<'a>(rules: &'a [Rule], value: &str) -> Option<&'a str> {
    rules.iter().find_map(|rule| rule.check(value))
}

/// Validate every field of a draft against its resource definition
pub fn validate(resource: &ResourceDef, draft: &Draft) -> FieldErrors {
    resource
        .fields
        .iter()
        .filter_map(|field| {
            check_rules(&field.rules, draft.get(&field.name))
                .map(|message| (field.name.clone(), message.to_string()))
        })
        .collect()
}
