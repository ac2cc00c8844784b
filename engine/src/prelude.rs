//! Common imports for fanout-engine usage.
//!
//! ```
//! use fanout_engine::prelude::*;
//! ```
//!
//! Re-exports the types a typical caller needs: the dispatcher and its
//! configuration, the generator seam, preparation entry points, and the
//! request/result data types.

pub use crate::dispatcher::{BatchOutput, Dispatcher, DispatcherConfig, ExecutionStrategy};
pub use crate::error::{ConfigError, GenerateError};
pub use crate::extract::{extract_field, ExtractError};
pub use crate::generator::{Generated, StructuredGenerator};
pub use crate::metrics::{BatchMetrics, ChunkMetrics};
pub use crate::prepare::{prepare, prepare_with_shorthand};
pub use crate::retry::{with_retry, RetryPolicy};
pub use crate::types::{
    BatchDispatchRequest, BatchDispatchResponse, ItemResult, ItemStatus, PromptRequest, PromptUnit,
};

// Re-export the shorthand compiler so callers can work with declarations
// directly without a separate import.
pub use fanout_shorthand::{parse as parse_shorthand, FieldDeclaration, FieldKind, ShorthandError};
