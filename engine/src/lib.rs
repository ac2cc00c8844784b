#![deny(missing_docs)]
//! # fanout-engine
//!
//! Ordered, bounded-concurrency batch dispatch for structured LLM
//! generation.
//!
//! A caller submits N free-text prompts plus an optional output shape (a
//! JSON Schema and extraction path, or a shorthand declaration compiled by
//! [`fanout_shorthand`]) and receives N results in the same order — raw
//! text, a schema-shaped object, or a single extracted value — with each
//! item's failure isolated in its own result slot. The actual LLM call is a
//! collaborator injected behind [`StructuredGenerator`](generator::StructuredGenerator);
//! this crate owns scheduling, retry, extraction, and instrumentation.
//!
//! ## Example
//!
//! ```no_run
//! use fanout_engine::prelude::*;
//! use serde_json::Value;
//!
//! struct Upstream;
//!
//! #[async_trait::async_trait]
//! impl StructuredGenerator for Upstream {
//!     async fn generate(
//!         &self,
//!         prompt: &str,
//!         _schema: Option<&Value>,
//!     ) -> Result<Generated, GenerateError> {
//!         Ok(Generated::Text(format!("echo: {prompt}")))
//!     }
//! }
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let dispatcher = Dispatcher::new(Upstream);
//! let units = prepare(&["Summarize the quarter"], None, None)?;
//! let output = dispatcher.dispatch(units).await?;
//! assert_eq!(output.results.len(), 1);
//! # Ok(())
//! # }
//! ```

/// The batch dispatcher and its configuration.
pub mod dispatcher;
/// Error types for preparation and generation.
pub mod error;
/// Field-path extraction from generated objects.
pub mod extract;
/// The generator collaborator seam.
pub mod generator;
/// Batch timing instrumentation.
pub mod metrics;
/// Sequential request preparation.
pub mod prepare;
/// Commonly used types and traits.
pub mod prelude;
/// Bounded retry with exponential backoff.
pub mod retry;
/// Shared request and result data types.
pub mod types;
