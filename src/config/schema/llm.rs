use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum LlmProviderKind {
    #[default]
    Gemini,
    OpenaiCompatible,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default)]
    pub provider: LlmProviderKind,
    #[serde(default)]
    pub api_key: Option<String>,
    /// Override the provider endpoint (Gemini: API root, compatible: `/v1` root).
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default = "default_router_model")]
    pub router_model: String,
    #[serde(default = "default_answer_model")]
    pub answer_model: String,
    #[serde(default = "default_router_temperature")]
    pub router_temperature: f64,
    #[serde(default = "default_answer_temperature")]
    pub answer_temperature: f64,
    /// Number of trailing history turns included in the routing prompt.
    #[serde(default = "default_history_window")]
    pub history_window: usize,
}

fn default_router_model() -> String {
    "gemini-2.5-pro".into()
}

fn default_answer_model() -> String {
    "gemini-2.5-pro".into()
}

fn default_router_temperature() -> f64 {
    0.0
}

fn default_answer_temperature() -> f64 {
    0.2
}

fn default_history_window() -> usize {
    6
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: LlmProviderKind::default(),
            api_key: None,
            base_url: None,
            router_model: default_router_model(),
            answer_model: default_answer_model(),
            router_temperature: default_router_temperature(),
            answer_temperature: default_answer_temperature(),
            history_window: default_history_window(),
        }
    }
}
