use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable identifier of a custom field within a posting's form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldId(pub String);

impl FieldId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Fresh identifier for fields authored without one.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Input control a custom field renders as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldType {
    Text,
    Number,
    Date,
    Dropdown,
    Textarea,
    Checkbox,
    Radio,
    File,
}

impl FieldType {
    pub const fn label(self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Number => "number",
            FieldType::Date => "date",
            FieldType::Dropdown => "dropdown",
            FieldType::Textarea => "textarea",
            FieldType::Checkbox => "checkbox",
            FieldType::Radio => "radio",
            FieldType::File => "file",
        }
    }

    /// Dropdown and radio fields pick from a fixed option list.
    pub const fn has_options(self) -> bool {
        matches!(self, FieldType::Dropdown | FieldType::Radio)
    }

    /// Pattern and length rules do not apply to booleans or file references.
    pub const fn accepts_text_rules(self) -> bool {
        !matches!(self, FieldType::Checkbox | FieldType::File)
    }
}

/// Optional constraints layered on top of the type check.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationRule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

/// Comparison applied by a visibility rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Condition {
    Equals,
    NotEquals,
    Contains,
}

impl Condition {
    pub const fn label(self) -> &'static str {
        match self {
            Condition::Equals => "EQUALS",
            Condition::NotEquals => "NOT_EQUALS",
            Condition::Contains => "CONTAINS",
        }
    }
}

/// Shows a field only while an earlier field's value satisfies the condition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisibilityRule {
    pub depends_on: FieldId,
    pub condition: Condition,
    #[serde(default)]
    pub value: String,
}

/// Schema of one custom form input attached to a posting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDefinition {
    pub id: FieldId,
    pub label: String,
    pub field_type: FieldType,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<ValidationRule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<VisibilityRule>,
    pub sort_order: i32,
}

impl FieldDefinition {
    pub fn new(id: impl Into<String>, label: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            id: FieldId::new(id),
            label: label.into(),
            field_type,
            required: false,
            placeholder: None,
            options: Vec::new(),
            validation: None,
            visibility: None,
            sort_order: 0,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn at(mut self, sort_order: i32) -> Self {
        self.sort_order = sort_order;
        self
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = options.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_validation(mut self, rule: ValidationRule) -> Self {
        self.validation = Some(rule);
        self
    }

    pub fn visible_when(
        mut self,
        depends_on: impl Into<String>,
        condition: Condition,
        value: impl Into<String>,
    ) -> Self {
        self.visibility = Some(VisibilityRule {
            depends_on: FieldId::new(depends_on),
            condition,
            value: value.into(),
        });
        self
    }

    pub fn depends_on(&self) -> Option<&FieldId> {
        self.visibility.as_ref().map(|rule| &rule.depends_on)
    }
}
