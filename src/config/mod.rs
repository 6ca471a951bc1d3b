pub mod schema;

pub use schema::{
    BackendsConfig, Config, GatewayConfig, LlmConfig, LlmProviderKind, ObservabilityConfig,
    SessionBackend, SessionConfig,
};
