//! Field descriptors: the unit a schema is made of.

use serde_json::json;
use std::fmt;
use std::sync::Arc;

use super::{FieldValue, Schema};

/// Type tag of a field. Nested schemas are shared, never copied.
#[derive(Debug, Clone)]
pub enum FieldType {
    String,
    Email,
    Url,
    Integer,
    Number,
    Boolean,
    Date,
    Binary,
    Enum(Vec<String>),
    Object(Arc<Schema>),
    Array(Box<FieldType>),
}

impl FieldType {
    /// Kind named in "Expected x, received y" messages.
    pub fn expected_kind(&self) -> &'static str {
        match self {
            FieldType::String | FieldType::Email | FieldType::Url | FieldType::Enum(_) => {
                "string"
            }
            FieldType::Integer | FieldType::Number => "number",
            FieldType::Boolean => "boolean",
            FieldType::Date => "date",
            FieldType::Binary => "binary",
            FieldType::Object(_) => "object",
            FieldType::Array(_) => "array",
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, FieldType::Integer | FieldType::Number)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::String => write!(f, "string"),
            FieldType::Email => write!(f, "email"),
            FieldType::Url => write!(f, "url"),
            FieldType::Integer => write!(f, "integer"),
            FieldType::Number => write!(f, "number"),
            FieldType::Boolean => write!(f, "boolean"),
            FieldType::Date => write!(f, "date"),
            FieldType::Binary => write!(f, "binary"),
            FieldType::Enum(options) => write!(f, "enum({})", options.join("|")),
            FieldType::Object(schema) => write!(f, "object({})", schema.name()),
            FieldType::Array(item) => write!(f, "array<{item}>"),
        }
    }
}

/// A constraint checked after the value has been coerced to its type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Check {
    /// Minimum character count of the trimmed string, or minimum array length.
    MinLength(usize),
    /// Maximum character count of the string, or maximum array length.
    MaxLength(usize),
    /// `>= 0`
    NonNegative,
    /// `> 0`
    Positive,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub check: Check,
    /// Overrides the engine's standard message for this check.
    pub message: Option<String>,
}

impl Rule {
    pub fn new(check: Check) -> Self {
        Self {
            check,
            message: None,
        }
    }

    pub fn min_length(min: usize) -> Self {
        Self::new(Check::MinLength(min))
    }

    pub fn max_length(max: usize) -> Self {
        Self::new(Check::MaxLength(max))
    }

    pub fn non_negative() -> Self {
        Self::new(Check::NonNegative)
    }

    pub fn positive() -> Self {
        Self::new(Check::Positive)
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    pub name: String,
    pub field_type: FieldType,
    /// Absence fails validation when set and no default is declared.
    pub required: bool,
    /// Explicit `null` is accepted (and kept) when set.
    pub nullable: bool,
    /// Filled in when the key is absent. Never applied to explicit `null`.
    pub default: Option<FieldValue>,
    pub rules: Vec<Rule>,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            required: true,
            nullable: false,
            default: None,
            rules: Vec::new(),
        }
    }

    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::String)
    }

    pub fn email(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Email)
    }

    pub fn url(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Url)
    }

    pub fn integer(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Integer)
    }

    pub fn number(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Number)
    }

    pub fn boolean(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Boolean)
    }

    pub fn date(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Date)
    }

    pub fn binary(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Binary)
    }

    pub fn enumeration(name: impl Into<String>, options: &[&str]) -> Self {
        Self::new(
            name,
            FieldType::Enum(options.iter().map(|o| (*o).to_string()).collect()),
        )
    }

    pub fn object(name: impl Into<String>, schema: Arc<Schema>) -> Self {
        Self::new(name, FieldType::Object(schema))
    }

    pub fn array(name: impl Into<String>, item: FieldType) -> Self {
        Self::new(name, FieldType::Array(Box::new(item)))
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Optional and nullable: absent stays absent, `null` stays `null`.
    pub fn nullish(self) -> Self {
        self.nullable().optional()
    }

    /// A defaulted field is implicitly optional.
    pub fn with_default(mut self, value: impl Into<FieldValue>) -> Self {
        self.default = Some(value.into());
        self.required = false;
        self
    }

    pub fn with_rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn min_length(self, min: usize, message: impl Into<String>) -> Self {
        self.with_rule(Rule::min_length(min).with_message(message))
    }

    /// Upper bound on string characters or array elements.
    pub fn max_length(self, max: usize) -> Self {
        self.with_rule(Rule::max_length(max))
    }

    pub fn non_negative(self) -> Self {
        self.with_rule(Rule::non_negative())
    }

    pub fn positive(self) -> Self {
        self.with_rule(Rule::positive())
    }

    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }

    /// JSON summary used by schema descriptions.
    pub fn describe(&self) -> serde_json::Value {
        let mut description = json!({
            "type": self.field_type.to_string(),
            "required": self.required,
            "nullable": self.nullable,
        });
        if let Some(default) = &self.default {
            description["default"] = default.to_json();
        }
        if !self.rules.is_empty() {
            description["rules"] = self
                .rules
                .iter()
                .map(|rule| match &rule.check {
                    Check::MinLength(n) => format!("minLength({n})"),
                    Check::MaxLength(n) => format!("maxLength({n})"),
                    Check::NonNegative => "nonNegative".to_string(),
                    Check::Positive => "positive".to_string(),
                })
                .collect::<Vec<_>>()
                .into();
        }
        if let FieldType::Object(schema) = &self.field_type {
            description["schema"] = schema.describe();
        }
        if let FieldType::Array(item) = &self.field_type {
            if let FieldType::Object(schema) = item.as_ref() {
                description["items"] = schema.describe();
            }
        }
        description
    }
}
