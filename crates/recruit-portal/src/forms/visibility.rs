use super::definition::{Condition, FieldDefinition, FieldId, VisibilityRule};
use super::values::ApplicationValueSet;

impl Condition {
    /// Compare the controlling field's value against the rule literal.
    pub fn holds(self, actual: &str, expected: &str) -> bool {
        match self {
            Condition::Equals => actual == expected,
            Condition::NotEquals => actual != expected,
            Condition::Contains => actual.contains(expected),
        }
    }
}

/// Whether `definition`'s own rule holds against the raw `values`.
///
/// This looks one level deep only: a controlling field that is itself hidden
/// still supplies its raw value here. [`assemble`](super::assemble) reads a
/// suppressed controlling field as empty, so use its outcomes when the whole
/// chain matters.
pub fn is_visible(definition: &FieldDefinition, values: &ApplicationValueSet) -> bool {
    rule_holds(definition.visibility.as_ref(), |field| values.get(field))
}

/// Evaluate a rule against any lookup; missing values read as the empty string.
pub(crate) fn rule_holds<'a, F>(rule: Option<&VisibilityRule>, lookup: F) -> bool
where
    F: Fn(&FieldId) -> Option<&'a str>,
{
    match rule {
        None => true,
        Some(rule) => {
            let actual = lookup(&rule.depends_on).unwrap_or_default();
            rule.condition.holds(actual, &rule.value)
        }
    }
}
