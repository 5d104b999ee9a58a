//! Form schemas: field lists with validation rules.
//!
//! Entity forms are data. A schema is usually loaded from JSON:
//!
//! ```
//! use roster_core::form::FormSchema;
//!
//! let schema = FormSchema::from_json(r#"[
//!     {"name": "firstName", "label": "First name", "required": true},
//!     {"name": "age", "kind": "number", "rules": [{"rule": "numeric"}]},
//!     {"name": "gender", "kind": "select",
//!      "rules": [{"rule": "one_of", "values": ["Male", "Female"]}]},
//!     {"name": "phone", "rules": [{"rule": "pattern", "regex": "^\\+?[0-9]{10,13}$"}]}
//! ]"#).unwrap();
//!
//! assert_eq!(schema.check("age", "forty"), Err("Age must be a number".to_string()));
//! assert_eq!(schema.check("phone", "+233241234567"), Ok(()));
//! ```

use regex::Regex;
use serde::{Deserialize, Serialize};

use serde_json::Value;

use crate::error::{Error, InvalidInputError};
use crate::record::{EntityRef, Record};

/// Fields that belong to the server, never to a form.
const SERVER_FIELDS: [&str; 5] = ["_id", "id", "__v", "createdAt", "updatedAt"];

/// How a field is entered and how its value is sent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputKind {
    #[default]
    Text,
    /// Sent as a JSON number.
    Number,
    /// `true` or `false`, sent as a JSON boolean.
    Boolean,
    Email,
    Date,
    Select,
    /// Id of another record.
    Reference,
}

/// A validation rule. Rules other than `NonEmpty` skip empty values;
/// emptiness of required fields is checked separately at submit time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum Rule {
    NonEmpty,
    Pattern {
        regex: String,
        #[serde(default)]
        message: Option<String>,
    },
    Numeric,
    OneOf {
        values: Vec<String>,
    },
}

/// One field of a form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSchema {
    pub name: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub kind: InputKind,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub rules: Vec<Rule>,
}

impl FieldSchema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: None,
            kind: InputKind::default(),
            required: false,
            rules: Vec::new(),
        }
    }

    pub fn kind(mut self, kind: InputKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Label for messages, defaulting to the field name with a capital.
    pub fn display_label(&self) -> String {
        match &self.label {
            Some(label) => label.clone(),
            None => {
                let mut chars = self.name.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect(),
                    None => String::new(),
                }
            }
        }
    }
}

/// A field with its patterns compiled.
#[derive(Debug, Clone)]
struct CompiledField {
    schema: FieldSchema,
    patterns: Vec<Option<Regex>>,
}

/// A validated, compiled form schema.
#[derive(Debug, Clone)]
pub struct FormSchema {
    fields: Vec<CompiledField>,
}

impl FormSchema {
    /// Compile a list of fields.
    ///
    /// # Errors
    ///
    /// Returns an error if a pattern rule does not compile or a field name
    /// appears twice.
    pub fn new(fields: Vec<FieldSchema>) -> Result<Self, Error> {
        let mut compiled: Vec<CompiledField> = Vec::with_capacity(fields.len());

        for schema in fields {
            if compiled.iter().any(|f| f.schema.name == schema.name) {
                return Err(InvalidInputError::Rule {
                    field: schema.name.clone(),
                    reason: "duplicate field name".to_string(),
                }
                .into());
            }

            let patterns = schema
                .rules
                .iter()
                .map(|rule| match rule {
                    Rule::Pattern { regex, .. } => Regex::new(regex).map(Some).map_err(|e| {
                        InvalidInputError::Rule {
                            field: schema.name.clone(),
                            reason: e.to_string(),
                        }
                    }),
                    _ => Ok(None),
                })
                .collect::<Result<Vec<_>, _>>()?;

            compiled.push(CompiledField { schema, patterns });
        }

        Ok(Self { fields: compiled })
    }

    /// Parse and compile a JSON array of fields.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        let fields: Vec<FieldSchema> =
            serde_json::from_str(json).map_err(|e| InvalidInputError::Other {
                message: format!("invalid form schema: {e}"),
            })?;
        Self::new(fields)
    }

    /// A rule-less schema shaped after an existing record.
    ///
    /// Numbers and booleans keep their kind, and populated or bare
    /// references become reference fields. Arrays and server-managed fields
    /// are left out.
    pub fn infer(record: &Record) -> Self {
        let fields = record
            .fields()
            .filter(|(name, _)| !SERVER_FIELDS.contains(name))
            .filter_map(|(name, value)| {
                let kind = match value {
                    Value::Array(_) => return None,
                    Value::Number(_) => InputKind::Number,
                    Value::Bool(_) => InputKind::Boolean,
                    Value::Object(_) if EntityRef::from_value(value).is_some() => {
                        InputKind::Reference
                    }
                    Value::Object(_) => return None,
                    _ => InputKind::Text,
                };
                Some(CompiledField {
                    schema: FieldSchema::new(name).kind(kind),
                    patterns: Vec::new(),
                })
            })
            .collect();
        Self { fields }
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = &FieldSchema> {
        self.fields.iter().map(|f| &f.schema)
    }

    pub fn field(&self, name: &str) -> Option<&FieldSchema> {
        self.compiled(name).map(|f| &f.schema)
    }

    /// Check one value against the rules of field `name`.
    ///
    /// Unknown fields have no rules and always pass.
    pub fn check(&self, name: &str, value: &str) -> Result<(), String> {
        let Some(field) = self.compiled(name) else {
            return Ok(());
        };
        let label = field.schema.display_label();
        let trimmed = value.trim();

        for (rule, pattern) in field.schema.rules.iter().zip(&field.patterns) {
            match rule {
                Rule::NonEmpty => {
                    if trimmed.is_empty() {
                        return Err(format!("{label} is required"));
                    }
                }
                _ if trimmed.is_empty() => {}
                Rule::Pattern { message, .. } => {
                    if pattern.as_ref().is_some_and(|re| !re.is_match(trimmed)) {
                        return Err(message
                            .clone()
                            .unwrap_or_else(|| format!("{label} has an invalid format")));
                    }
                }
                Rule::Numeric => {
                    if trimmed.parse::<f64>().map_or(true, |n| !n.is_finite()) {
                        return Err(format!("{label} must be a number"));
                    }
                }
                Rule::OneOf { values } => {
                    if !values.iter().any(|v| v == trimmed) {
                        return Err(format!("{label} must be one of: {}", values.join(", ")));
                    }
                }
            }
        }

        if field.schema.kind == InputKind::Boolean
            && !trimmed.is_empty()
            && parse_bool(trimmed).is_none()
        {
            return Err(format!("{label} must be true or false"));
        }

        Ok(())
    }

    fn compiled(&self, name: &str) -> Option<&CompiledField> {
        self.fields.iter().find(|f| f.schema.name == name)
    }
}

/// `true`/`false` in any case.
pub(crate) fn parse_bool(s: &str) -> Option<bool> {
    if s.eq_ignore_ascii_case("true") {
        Some(true)
    } else if s.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}
