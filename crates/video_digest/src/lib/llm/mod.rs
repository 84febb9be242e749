pub mod generator;
pub mod ollama;
pub mod openai;

use std::time::Duration;

use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{policies::ExponentialBackoff, RetryTransientMiddleware};

const MAX_RETRIES: u32 = 3;

/// HTTP client that retries transient failures with exponential backoff
pub(crate) fn retrying_client(timeout: Duration) -> ClientWithMiddleware {
    let client = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Failed to build HTTP client with timeout, using defaults");
            reqwest::Client::new()
        });
    let retry_policy = ExponentialBackoff::builder().build_with_max_retries(MAX_RETRIES);

    ClientBuilder::new(client)
        .with(RetryTransientMiddleware::new_with_policy(retry_policy))
        .build()
}
