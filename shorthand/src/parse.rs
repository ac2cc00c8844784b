//! Parser for one-line field declarations.

use crate::decl::{FieldDeclaration, FieldKind};
use crate::error::ShorthandError;

/// Parses a field declaration.
///
/// Input is trimmed first. The three recognized forms, tried in this order:
///
/// 1. `name: [v1, v2, ...]` — enum; values are comma-split and individually
///    trimmed, empty tokens are dropped, and zero remaining values is an
///    error.
/// 2. `name: str` / `name: int` / `name: float` / `name: bool` — typed
///    scalar.
/// 3. `name` — bare identifier, an implicit string.
///
/// Anything else is rejected whole.
pub fn parse(input: &str) -> Result<FieldDeclaration, ShorthandError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(ShorthandError::Empty);
    }

    let Some((name, rest)) = input.split_once(':') else {
        let name = field_name(input)?;
        return Ok(FieldDeclaration {
            name,
            kind: FieldKind::Str,
        });
    };

    let name = field_name(name.trim())?;
    let rest = rest.trim();

    if let Some(inner) = rest.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
        let values: Vec<String> = inner
            .split(',')
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(ToOwned::to_owned)
            .collect();
        if values.is_empty() {
            return Err(ShorthandError::EmptyEnum(name));
        }
        return Ok(FieldDeclaration {
            name,
            kind: FieldKind::Enum(values),
        });
    }

    let kind = match rest {
        "str" => FieldKind::Str,
        "int" => FieldKind::Int,
        "float" => FieldKind::Float,
        "bool" => FieldKind::Bool,
        other => return Err(ShorthandError::UnknownType(other.to_string())),
    };

    Ok(FieldDeclaration { name, kind })
}

fn field_name(raw: &str) -> Result<String, ShorthandError> {
    if raw.is_empty() || !raw.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(ShorthandError::InvalidFieldName(raw.to_string()));
    }
    Ok(raw.to_string())
}
