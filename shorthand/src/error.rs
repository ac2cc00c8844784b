use thiserror::Error;

/// Errors produced while parsing a field declaration.
///
/// A declaration is rejected as a whole: none of these variants carry a
/// partially-parsed result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShorthandError {
    /// The declaration was empty or whitespace-only.
    #[error("field declaration is empty")]
    Empty,

    /// The field name contains characters outside `[A-Za-z0-9_]`.
    #[error("invalid field name `{0}`: expected letters, digits, or underscores")]
    InvalidFieldName(String),

    /// The declared type is not one of `str`, `int`, `float`, `bool`.
    #[error("unknown field type `{0}`: expected str, int, float, bool, or a [value, ...] list")]
    UnknownType(String),

    /// An enum declaration listed no usable values.
    #[error("enum field `{0}` declares no values")]
    EmptyEnum(String),
}
