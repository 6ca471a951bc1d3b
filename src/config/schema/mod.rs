mod backends;
mod core;
mod gateway;
mod llm;
mod observability;
mod session;

pub use backends::BackendsConfig;
pub use core::Config;
pub use gateway::GatewayConfig;
pub use llm::{LlmConfig, LlmProviderKind};
pub use observability::ObservabilityConfig;
pub use session::{SessionBackend, SessionConfig};
