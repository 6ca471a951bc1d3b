use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendsConfig {
    /// Base URL of the retrieval service (`POST /api/v1/rag/retrieve`)
    #[serde(default = "default_rag_service_url")]
    pub rag_service_url: String,
    /// Base URL of the Workday tools service (`POST /chat`)
    #[serde(default = "default_workday_tools_url")]
    pub workday_tools_url: String,
    #[serde(default = "default_rag_timeout_secs")]
    pub rag_timeout_secs: u64,
    #[serde(default = "default_workday_timeout_secs")]
    pub workday_timeout_secs: u64,
}

fn default_rag_service_url() -> String {
    "http://localhost:8001".into()
}

fn default_workday_tools_url() -> String {
    "http://localhost:5001".into()
}

fn default_rag_timeout_secs() -> u64 {
    30
}

fn default_workday_timeout_secs() -> u64 {
    300
}

impl Default for BackendsConfig {
    fn default() -> Self {
        Self {
            rag_service_url: default_rag_service_url(),
            workday_tools_url: default_workday_tools_url(),
            rag_timeout_secs: default_rag_timeout_secs(),
            workday_timeout_secs: default_workday_timeout_secs(),
        }
    }
}
