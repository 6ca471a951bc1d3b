use thiserror::Error;

// ─── Top-level error hierarchy ───────────────────────────────────────────────

/// Structured error hierarchy for the AskHR router.
///
/// Each subsystem defines its own error variant. The gateway matches on these
/// to pick an HTTP status; internal code continues to use `anyhow::Result`
/// for ad-hoc context chains.
#[derive(Debug, Error)]
pub enum AskHrError {
    // ── Config ───────────────────────────────────────────────────────────
    #[error("config: {0}")]
    Config(#[from] ConfigError),

    // ── LLM / Provider ──────────────────────────────────────────────────
    #[error("llm: {0}")]
    Llm(#[from] LlmError),

    // ── Session ─────────────────────────────────────────────────────────
    #[error("session: {0}")]
    Session(#[from] SessionError),

    // ── Backends (RAG / Workday) ────────────────────────────────────────
    #[error("backend: {0}")]
    Backend(#[from] BackendError),

    // ── Generic fallthrough (wraps anyhow for interop) ──────────────────
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl AskHrError {
    /// True when the error means the caller referenced a session that does not exist.
    pub fn is_session_not_found(&self) -> bool {
        match self {
            Self::Session(SessionError::NotFound(_)) => true,
            Self::Other(err) => matches!(
                err.downcast_ref::<SessionError>(),
                Some(SessionError::NotFound(_))
            ),
            _ => false,
        }
    }
}

// ─── Config errors ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load config: {0}")]
    Load(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

// ─── LLM / Provider errors ──────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("provider {provider} request failed: {message}")]
    Request { provider: String, message: String },

    #[error("provider {provider} returned an empty response")]
    EmptyResponse { provider: String },

    #[error("provider {provider} needs llm.base_url")]
    MissingBaseUrl { provider: String },

    #[error(
        "provider {provider} is missing an API key (set ASKHR_API_KEY, GEMINI_API_KEY or llm.api_key)"
    )]
    MissingApiKey { provider: String },
}

// ─── Session errors ─────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session not found: {0}")]
    NotFound(String),

    #[error("store: {0}")]
    Store(String),
}

// ─── Backend errors ─────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("{service} returned status {status}")]
    Status { service: &'static str, status: u16 },

    #[error("{service} request failed: {message}")]
    Transport {
        service: &'static str,
        message: String,
    },
}

// ─── Convenience re-exports ─────────────────────────────────────────────────

/// Shorthand result type for the crate.
pub type Result<T> = std::result::Result<T, AskHrError>;
