//! Parsed field declarations and their JSON Schema rendering.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// The shape a declared field takes in generated output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Free-form string.
    Str,
    /// Whole number.
    Int,
    /// Floating-point number.
    Float,
    /// Boolean.
    Bool,
    /// String constrained to one of the listed values, in declaration order.
    Enum(Vec<String>),
}

impl FieldKind {
    /// JSON Schema `type` keyword for this kind.
    #[must_use]
    pub const fn schema_type(&self) -> &'static str {
        match self {
            Self::Str | Self::Enum(_) => "string",
            Self::Int => "integer",
            Self::Float => "number",
            Self::Bool => "boolean",
        }
    }
}

/// A parsed field declaration.
///
/// Produced only by [`parse`](crate::parse); the field name is guaranteed to
/// match `[A-Za-z0-9_]+` and an enum kind is guaranteed to carry at least one
/// value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDeclaration {
    /// Name of the single field the generated object must carry.
    pub name: String,
    /// Declared shape of that field.
    pub kind: FieldKind,
}

impl FieldDeclaration {
    /// Renders the declaration as a JSON Schema describing a single-field
    /// object with the field marked required.
    ///
    /// The rendering is deterministic: the same declaration always yields
    /// byte-identical schema JSON.
    #[must_use]
    pub fn schema(&self) -> Value {
        let field_schema = match &self.kind {
            FieldKind::Enum(values) => json!({
                "type": self.kind.schema_type(),
                "enum": values,
            }),
            kind => json!({ "type": kind.schema_type() }),
        };

        let mut properties = Map::new();
        properties.insert(self.name.clone(), field_schema);

        json!({
            "type": "object",
            "properties": properties,
            "required": [self.name],
        })
    }

    /// The path used to pull the declared field back out of a generated
    /// object. Always the field name itself.
    #[must_use]
    pub fn extract_path(&self) -> &str {
        &self.name
    }
}
