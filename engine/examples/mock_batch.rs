//! Example: dispatch a scripted batch and print ordered results.
//!
//! Wires a canned generator into the dispatcher, asks for a structured
//! sentiment field via shorthand, and prints one result per prompt along
//! with the recorded batch timing.
//!
//! Run: `cargo run -p fanout-engine --example mock_batch`

use async_trait::async_trait;
use fanout_engine::prelude::*;
use serde_json::{json, Value};

/// Deterministic stand-in for the real LLM collaborator.
struct CannedGenerator;

#[async_trait]
impl StructuredGenerator for CannedGenerator {
    async fn generate(
        &self,
        prompt: &str,
        schema: Option<&Value>,
    ) -> Result<Generated, GenerateError> {
        if schema.is_none() {
            return Ok(Generated::Text(format!("echo: {prompt}")));
        }
        let sentiment = if prompt.contains("love") {
            "positive"
        } else if prompt.contains("refund") {
            "negative"
        } else {
            "mixed"
        };
        Ok(Generated::Structured(json!({ "sentiment": sentiment })))
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let reviews = [
        "I love the new keyboard, best purchase this year",
        "Asking for a refund, the stand arrived cracked",
        "Decent screen, mediocre speakers",
    ];

    let dispatcher = Dispatcher::with_config(
        CannedGenerator,
        DispatcherConfig::default().with_concurrency_limit(2),
    );

    let units = prepare_with_shorthand(&reviews, "sentiment: [positive, negative, mixed]")?;
    let output = dispatcher.dispatch(units).await?;

    for (review, result) in reviews.iter().zip(&output.results) {
        match (&result.value, &result.error) {
            (Some(value), _) => println!("{value} <- {review}"),
            (None, Some(error)) => println!("error: {error} <- {review}"),
            (None, None) => {}
        }
    }

    println!(
        "batch took {:?}, first result after {:?}, {} chunk(s)",
        output.metrics.total_duration,
        output.metrics.first_result_latency,
        output.metrics.chunks.len(),
    );

    Ok(())
}
