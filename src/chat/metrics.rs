//! Request metrics for chat completions
//!
//! Recorded through the `metrics` facade; nothing is exported unless the
//! embedding application installs a recorder.
//!
//! # Metrics
//!
//! - `chat_requests_total`: Counter of chat requests sent
//! - `chat_request_duration_seconds`: Histogram of request duration, by outcome
//! - `chat_failures_total`: Counter of failed requests, by failure kind
//! - `chat_tokens_consumed`: Histogram of total tokens per successful request
//! - `chat_requests_in_flight`: Gauge of requests awaiting a response
//!
//! # Examples
//!
//! ```
//! use scoremate::chat::metrics::RequestMetrics;
//!
//! let metrics = RequestMetrics::start("groq");
//! metrics.record_success(Some(1500));
//! ```

use metrics::{decrement_gauge, histogram, increment_counter, increment_gauge};
use std::cell::Cell;
use std::time::Instant;

/// Failure kind recorded for a request dropped before it finished
pub const CANCELLED_KIND: &str = "cancelled";

/// Metrics for a single chat request
///
/// Created when the request is sent and finished with exactly one of
/// [`record_success`](Self::record_success) or
/// [`record_failure`](Self::record_failure); later calls are ignored.
/// Dropping it unfinished, as happens when the request future is cancelled,
/// records a failure of kind [`CANCELLED_KIND`].
#[derive(Debug)]
pub struct RequestMetrics {
    provider: String,
    start: Instant,
    recorded: Cell<bool>,
}

impl RequestMetrics {
    /// Start tracking a request to `provider`
    pub fn start(provider: &str) -> Self {
        increment_counter!("chat_requests_total", "provider" => provider.to_string());
        increment_gauge!("chat_requests_in_flight", 1.0, "provider" => provider.to_string());

        Self {
            provider: provider.to_string(),
            start: Instant::now(),
            recorded: Cell::new(false),
        }
    }

    /// Record a successful reply
    ///
    /// # Arguments
    ///
    /// * `total_tokens` - Token count reported by the service, if any
    pub fn record_success(&self, total_tokens: Option<usize>) {
        if self.recorded.replace(true) {
            return;
        }

        histogram!(
            "chat_request_duration_seconds",
            self.start.elapsed().as_secs_f64(),
            "provider" => self.provider.clone(),
            "outcome" => "success"
        );

        if let Some(tokens) = total_tokens {
            histogram!(
                "chat_tokens_consumed",
                tokens as f64,
                "provider" => self.provider.clone()
            );
        }

        decrement_gauge!("chat_requests_in_flight", 1.0, "provider" => self.provider.clone());
    }

    /// Record a failed request
    ///
    /// # Arguments
    ///
    /// * `kind` - Failure label, see [`crate::error::ServiceError::kind`]
    pub fn record_failure(&self, kind: &str) {
        if self.recorded.replace(true) {
            return;
        }

        histogram!(
            "chat_request_duration_seconds",
            self.start.elapsed().as_secs_f64(),
            "provider" => self.provider.clone(),
            "outcome" => "failure"
        );

        increment_counter!(
            "chat_failures_total",
            "provider" => self.provider.clone(),
            "kind" => kind.to_string()
        );

        decrement_gauge!("chat_requests_in_flight", 1.0, "provider" => self.provider.clone());
    }

    /// Record a request abandoned before the service answered
    pub fn record_cancelled(&self) {
        self.record_failure(CANCELLED_KIND);
    }

    /// Whether an outcome has been recorded
    pub fn is_recorded(&self) -> bool {
        self.recorded.get()
    }
}

impl Drop for RequestMetrics {
    fn drop(&mut self) {
        if !self.is_recorded() {
            self.record_cancelled();
        }
    }
}
