//! HTTP client module
//!
//! Provides the request execution core shared by every resource call.
//!
//! # Features
//!
//! - **Typed Errors**: Every outcome is classified into [`crate::Error`]
//! - **Automatic Retries**: 408/409/429/5xx and transport failures are retried
//! - **Backoff**: Exponential from 1s, or the server's `Retry-After` hint
//! - **Per-call Overrides**: API key, base URL, timeout, retries

pub mod classify;
mod client;
mod retry;

pub use classify::{extract_code, extract_message, extract_retry_after, kind_from_status};
pub use client::{Client, RequestOptions};
pub use retry::{decide, RetryDecision, RetryPolicy, Sleeper, TokioSleeper};
