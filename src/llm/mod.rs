// ── Infrastructure ───────────────────────────────────────────────────────────
pub mod http_client;
pub mod scrub;
pub mod traits;
pub mod types;

// ── Agents + factory ─────────────────────────────────────────────────────────
pub mod agent;
pub mod factory;

// ── Provider implementations ────────────────────────────────────────────────
pub mod compatible;
pub mod gemini;

// ── Infrastructure re-exports ───────────────────────────────────────────────
pub use http_client::{build_provider_client, build_provider_client_with_timeout};
pub use scrub::{api_error, sanitize_api_error, scrub_secret_patterns};
pub use traits::Provider;
pub use types::{MessageRole, ProviderMessage};

// ── Provider + factory re-exports ───────────────────────────────────────────
pub use agent::LlmAgent;
pub use compatible::OpenAiCompatibleProvider;
pub use factory::create_provider;
pub use gemini::GeminiProvider;
