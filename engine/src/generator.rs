//! The seam between the dispatch engine and the LLM collaborator.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::GenerateError;

/// Output produced by one generation call.
#[derive(Debug, Clone, PartialEq)]
pub enum Generated {
    /// Free-form text, produced when no schema was requested.
    Text(String),
    /// A JSON object conforming to the requested schema.
    Structured(Value),
}

/// A collaborator that turns one prompt into text or schema-shaped JSON.
///
/// The engine only consumes the result of this call: retry classification
/// via [`GenerateError::is_transient`] and field extraction happen on this
/// side of the seam, while transport, model choice, and credentials live
/// behind it. Implementations must be safe to call concurrently; the
/// dispatcher keeps up to its configured limit of calls in flight at once.
#[async_trait]
pub trait StructuredGenerator: Send + Sync {
    /// Generates output for `prompt`, shaped by `schema` when present.
    async fn generate(
        &self,
        prompt: &str,
        schema: Option<&Value>,
    ) -> Result<Generated, GenerateError>;
}

#[async_trait]
impl<G: StructuredGenerator + ?Sized> StructuredGenerator for std::sync::Arc<G> {
    async fn generate(
        &self,
        prompt: &str,
        schema: Option<&Value>,
    ) -> Result<Generated, GenerateError> {
        (**self).generate(prompt, schema).await
    }
}
