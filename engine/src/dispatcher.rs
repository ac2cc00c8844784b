//! Concurrent batch dispatch with ordered results and per-item error
//! isolation.
//!
//! Execution is the only concurrent phase. Units are scheduled either in
//! fan-out/fan-in chunks or through an order-preserving sliding window, in
//! both cases with at most the configured limit of generator calls in
//! flight. Post-processing walks completions in original index order, so a
//! result's position never depends on when its call happened to finish.

use std::time::Duration;

use futures::future::join_all;
use futures::{pin_mut, StreamExt};
use serde_json::Value;
use tokio::time::{timeout_at, Instant};
use uuid::Uuid;

use crate::error::{ConfigError, GenerateError};
use crate::extract::extract_field;
use crate::generator::{Generated, StructuredGenerator};
use crate::metrics::{BatchMetrics, BatchTimer};
use crate::retry::{with_retry, RetryPolicy};
use crate::types::{BatchDispatchRequest, BatchDispatchResponse, ItemResult, PromptUnit};

/// How the execution phase schedules in-flight calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionStrategy {
    /// Fan out at most `concurrency_limit` calls, wait for the whole chunk
    /// to resolve, then start the next chunk. Burst load on the upstream is
    /// bounded and progress is chunk-aligned.
    #[default]
    Chunked,
    /// Keep a sliding window of at most `concurrency_limit` calls across
    /// the whole batch; each completion immediately admits the next unit.
    /// Higher throughput, same ordering and in-flight bound.
    Pipelined,
}

/// Configuration consumed by [`Dispatcher`].
///
/// Everything is passed in here; the dispatcher reads no ambient state.
#[derive(Debug, Clone)]
pub struct DispatcherConfig {
    /// Maximum number of generator calls in flight at once (default: 10).
    pub concurrency_limit: usize,
    /// Retry behavior applied to every generator call.
    pub retry: RetryPolicy,
    /// Scheduling strategy for the execution phase.
    pub strategy: ExecutionStrategy,
    /// Wall-clock budget for the whole batch. When it expires, every unit
    /// not yet resolved is finalized as an error; there are never partial
    /// slots (default: none).
    pub batch_deadline: Option<Duration>,
    /// Validate structured output against the unit's schema before
    /// extraction. Off by default: the upstream generator owns schema
    /// conformance, and a violation it lets through is reported as a
    /// per-item error only when this is set.
    pub validate_output: bool,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            concurrency_limit: 10,
            retry: RetryPolicy::default(),
            strategy: ExecutionStrategy::default(),
            batch_deadline: None,
            validate_output: false,
        }
    }
}

impl DispatcherConfig {
    /// Sets the in-flight call limit.
    #[must_use]
    pub const fn with_concurrency_limit(mut self, limit: usize) -> Self {
        self.concurrency_limit = limit;
        self
    }

    /// Sets the per-call retry policy.
    #[must_use]
    pub const fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Sets the execution strategy.
    #[must_use]
    pub const fn with_strategy(mut self, strategy: ExecutionStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Sets the whole-batch deadline.
    #[must_use]
    pub const fn with_batch_deadline(mut self, deadline: Duration) -> Self {
        self.batch_deadline = Some(deadline);
        self
    }

    /// Enables schema validation of structured output before extraction.
    #[must_use]
    pub const fn with_validate_output(mut self, validate: bool) -> Self {
        self.validate_output = validate;
        self
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.concurrency_limit == 0 {
            return Err(ConfigError::ZeroConcurrency);
        }
        if self.retry.max_retries == 0 {
            return Err(ConfigError::ZeroAttempts);
        }
        Ok(())
    }
}

/// Ordered results and timing for one dispatched batch.
#[derive(Debug, Clone)]
pub struct BatchOutput {
    /// One result per input unit, index-aligned with the submitted batch.
    pub results: Vec<ItemResult>,
    /// Timing observed while the batch ran.
    pub metrics: BatchMetrics,
}

/// Batch dispatcher holding its generation collaborator and configuration.
///
/// Both are injected at construction, so a test double slots in without any
/// environment mutation. The dispatcher itself is stateless between
/// batches; one instance can serve any number of `dispatch` calls.
#[derive(Clone)]
pub struct Dispatcher<G> {
    generator: G,
    config: DispatcherConfig,
}

impl<G: StructuredGenerator> Dispatcher<G> {
    /// Creates a dispatcher with the default configuration.
    pub fn new(generator: G) -> Self {
        Self::with_config(generator, DispatcherConfig::default())
    }

    /// Creates a dispatcher with an explicit configuration.
    pub const fn with_config(generator: G, config: DispatcherConfig) -> Self {
        Self { generator, config }
    }

    /// The configuration this dispatcher was built with.
    #[must_use]
    pub const fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    /// Dispatches a prepared batch and returns one result per unit, in the
    /// units' original order.
    ///
    /// Per-item failures (terminal call errors, exhausted retries,
    /// extraction failures) are contained in their own result slot and never
    /// disturb sibling results. Only configuration errors abort the batch,
    /// and they do so before any generator call is made.
    #[tracing::instrument(skip(self, units), fields(unit_count = units.len()))]
    pub async fn dispatch(&self, units: Vec<PromptUnit>) -> Result<BatchOutput, ConfigError> {
        self.config.validate()?;

        let batch_id = Uuid::new_v4();
        let mut timer = BatchTimer::start();
        tracing::info!(
            event = "batch_started",
            batch_id = %batch_id,
            units = units.len(),
            limit = self.config.concurrency_limit,
            strategy = ?self.config.strategy,
            "batch started"
        );

        let results = match self.config.strategy {
            ExecutionStrategy::Chunked => self.run_chunked(&units, &mut timer).await,
            ExecutionStrategy::Pipelined => self.run_pipelined(&units, &mut timer).await,
        };

        let metrics = timer.finish();
        tracing::info!(
            event = "batch_completed",
            batch_id = %batch_id,
            total_ms = metrics.total_duration.as_millis() as u64,
            first_result_ms = metrics.first_result_latency.map(|d| d.as_millis() as u64),
            "batch completed"
        );

        Ok(BatchOutput { results, metrics })
    }

    /// Serves one transport-level request end to end: resolves the wire
    /// prompts into units, dispatches them, and shapes the ordered results
    /// back into the response envelope.
    ///
    /// The response always has exactly one slot per submitted prompt;
    /// configuration errors surface as the `Err` of this call, never as
    /// per-item results.
    pub async fn handle(
        &self,
        request: BatchDispatchRequest,
    ) -> Result<BatchDispatchResponse, ConfigError> {
        let units = request.into_units()?;
        let output = self.dispatch(units).await?;
        Ok(BatchDispatchResponse {
            responses: output.results,
        })
    }

    async fn run_chunked(&self, units: &[PromptUnit], timer: &mut BatchTimer) -> Vec<ItemResult> {
        let started = timer.started_at();
        let deadline = self.config.batch_deadline.map(|d| started + d);
        let mut results = Vec::with_capacity(units.len());

        for (chunk_index, chunk) in units.chunks(self.config.concurrency_limit).enumerate() {
            if deadline.is_some_and(|d| Instant::now() >= d) {
                abandon_chunk(chunk_index, chunk.len(), Duration::ZERO, timer, &mut results);
                continue;
            }

            let chunk_started = Instant::now();
            let calls = chunk.iter().map(|unit| async move {
                let outcome = self.execute_unit(unit).await;
                (outcome, started.elapsed())
            });

            let outcomes = if let Some(d) = deadline {
                match timeout_at(d, join_all(calls)).await {
                    Ok(outcomes) => outcomes,
                    Err(_) => {
                        abandon_chunk(
                            chunk_index,
                            chunk.len(),
                            chunk_started.elapsed(),
                            timer,
                            &mut results,
                        );
                        continue;
                    }
                }
            } else {
                join_all(calls).await
            };

            let mut success_count = 0;
            let mut error_count = 0;
            for (unit, (outcome, completed_at)) in chunk.iter().zip(outcomes) {
                let item = self.finalize(unit, outcome);
                if item.is_success() {
                    success_count += 1;
                } else {
                    error_count += 1;
                }
                timer.record_result(completed_at);
                results.push(item);
            }

            let chunk_duration = chunk_started.elapsed();
            timer.record_chunk(chunk_index, chunk_duration, success_count, error_count);
            tracing::debug!(
                event = "chunk_completed",
                chunk_index,
                duration_ms = chunk_duration.as_millis() as u64,
                success_count,
                error_count,
                "chunk completed"
            );
        }

        results
    }

    async fn run_pipelined(&self, units: &[PromptUnit], timer: &mut BatchTimer) -> Vec<ItemResult> {
        let started = timer.started_at();
        let deadline = self.config.batch_deadline.map(|d| started + d);
        let window_started = Instant::now();
        let mut results = Vec::with_capacity(units.len());
        let mut success_count = 0;
        let mut error_count = 0;

        let stream = futures::stream::iter(units.iter().map(|unit| async move {
            let outcome = self.execute_unit(unit).await;
            (unit, outcome, started.elapsed())
        }))
        .buffered(self.config.concurrency_limit);
        pin_mut!(stream);

        loop {
            let next = if let Some(d) = deadline {
                match timeout_at(d, stream.next()).await {
                    Ok(next) => next,
                    Err(_) => break,
                }
            } else {
                stream.next().await
            };
            let Some((unit, outcome, completed_at)) = next else {
                break;
            };

            let item = self.finalize(unit, outcome);
            if item.is_success() {
                success_count += 1;
            } else {
                error_count += 1;
            }
            timer.record_result(completed_at);
            results.push(item);
        }

        // Deadline expiry: finalize every unresolved unit, never leave a
        // partial slot.
        while results.len() < units.len() {
            results.push(deadline_result());
            timer.record_result(started.elapsed());
            error_count += 1;
        }

        if !units.is_empty() {
            timer.record_chunk(0, window_started.elapsed(), success_count, error_count);
        }
        results
    }

    async fn execute_unit(&self, unit: &PromptUnit) -> Result<Generated, GenerateError> {
        with_retry(
            |_attempt| self.generator.generate(&unit.text, unit.schema.as_ref()),
            &self.config.retry,
        )
        .await
    }

    /// Post-processing for one completed call: classify the outcome and
    /// apply extraction. Runs sequentially, in original index order.
    fn finalize(&self, unit: &PromptUnit, outcome: Result<Generated, GenerateError>) -> ItemResult {
        let generated = match outcome {
            Ok(generated) => generated,
            Err(err) => return ItemResult::error(err.to_string()),
        };

        match generated {
            Generated::Text(text) => {
                if unit.extract_path.is_some() {
                    ItemResult::error(
                        "generator returned plain text where structured output was requested",
                    )
                } else {
                    ItemResult::success(Value::String(text))
                }
            }
            Generated::Structured(value) => {
                if self.config.validate_output {
                    if let Some(schema) = &unit.schema {
                        if let Err(message) = validate_against(schema, &value) {
                            return ItemResult::error(message);
                        }
                    }
                }
                match &unit.extract_path {
                    Some(path) => match extract_field(&value, path) {
                        Ok(extracted) => ItemResult::success(extracted),
                        Err(err) => ItemResult::error(err.to_string()),
                    },
                    None => ItemResult::success(value),
                }
            }
        }
    }
}

fn deadline_result() -> ItemResult {
    ItemResult::error("batch deadline exceeded before this prompt completed")
}

/// Finalizes every unit of an unstarted or timed-out chunk as a deadline
/// error.
fn abandon_chunk(
    chunk_index: usize,
    unit_count: usize,
    chunk_duration: Duration,
    timer: &mut BatchTimer,
    results: &mut Vec<ItemResult>,
) {
    let completed_at = timer.started_at().elapsed();
    for _ in 0..unit_count {
        timer.record_result(completed_at);
        results.push(deadline_result());
    }
    timer.record_chunk(chunk_index, chunk_duration, 0, unit_count);
    tracing::warn!(
        event = "chunk_abandoned",
        chunk_index,
        unit_count,
        "batch deadline exceeded"
    );
}

fn validate_against(schema: &Value, instance: &Value) -> Result<(), String> {
    match jsonschema::Validator::new(schema) {
        Ok(validator) => {
            let errors: Vec<String> = validator
                .iter_errors(instance)
                .map(|error| format!("at path '{}': {}", error.instance_path, error))
                .collect();
            if errors.is_empty() {
                Ok(())
            } else {
                Err(format!(
                    "generated output failed schema validation: {}",
                    errors.join("; ")
                ))
            }
        }
        Err(e) => Err(format!("schema does not compile: {e}")),
    }
}
