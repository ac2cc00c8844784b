//! Shared data types for batch dispatch requests and results.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A fully-resolved, immutable unit of work for one prompt.
///
/// Built once by the preparation phase ([`prepare`](crate::prepare::prepare)
/// or [`BatchDispatchRequest::into_units`]) and consumed exactly once by the
/// dispatcher. When `extract_path` is present, `schema` is present too; the
/// preparation phase enforces this before any generator call is made.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptUnit {
    /// Prompt text, trimmed and non-empty.
    pub text: String,
    /// Schema the generated output must conform to, when structured output
    /// was requested.
    pub schema: Option<Value>,
    /// Field path used to pull a single value out of the generated object.
    pub extract_path: Option<String>,
}

/// Outcome classification for a single prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    /// The prompt produced a usable value.
    Success,
    /// The prompt failed; `error` carries the reason.
    Error,
}

/// The result slot for one prompt in a dispatched batch.
///
/// Exactly one of `value`/`error` is meaningful, gated by `status`. Use the
/// [`success`](Self::success) and [`error`](Self::error) constructors rather
/// than building the struct by hand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemResult {
    /// Whether the prompt succeeded or failed.
    pub status: ItemStatus,
    /// The produced value: raw text, a structured object, or an extracted
    /// field. Absent on error.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    /// Human-readable failure description. Absent on success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ItemResult {
    /// A successful result carrying `value`.
    #[must_use]
    pub fn success(value: impl Into<Value>) -> Self {
        Self {
            status: ItemStatus::Success,
            value: Some(value.into()),
            error: None,
        }
    }

    /// A failed result carrying a non-empty message.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: ItemStatus::Error,
            value: None,
            error: Some(message.into()),
        }
    }

    /// Returns `true` when the result carries a value.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self.status, ItemStatus::Success)
    }
}

/// One prompt in a transport-level dispatch request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptRequest {
    /// Free-text prompt.
    pub text: String,
    /// Optional schema the generated output must conform to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<Value>,
    /// Optional field path to extract from the generated object. Requires
    /// `schema`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extract_path: Option<String>,
}

/// Transport-level batch request: an ordered list of prompts, each with its
/// own optional output shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchDispatchRequest {
    /// Prompts in submission order.
    pub prompts: Vec<PromptRequest>,
}

/// Transport-level batch response.
///
/// `responses` has the same length as the request's `prompts` and is
/// index-aligned with it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchDispatchResponse {
    /// One result per submitted prompt, in submission order.
    pub responses: Vec<ItemResult>,
}
