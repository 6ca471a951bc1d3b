use reqwest::Client;
use std::time::Duration;

/// Default timeout for language-model calls.
pub const PROVIDER_TIMEOUT_SECS: u64 = 120;

pub fn build_provider_client() -> Client {
    build_provider_client_with_timeout(PROVIDER_TIMEOUT_SECS)
}

/// Shared builder for every outbound HTTP client (LLM providers and backends).
pub fn build_provider_client_with_timeout(timeout_secs: u64) -> Client {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .pool_max_idle_per_host(10)
        .pool_idle_timeout(Duration::from_secs(90))
        .build()
        .unwrap_or_else(|_| Client::new())
}
