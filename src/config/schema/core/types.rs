use super::super::{
    BackendsConfig, GatewayConfig, LlmConfig, ObservabilityConfig, SessionBackend, SessionConfig,
};
use crate::error::ConfigError;
use directories::UserDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to config.toml - computed from home or `--config`, not serialized
    #[serde(skip)]
    pub config_path: PathBuf,

    #[serde(default)]
    pub gateway: GatewayConfig,

    #[serde(default)]
    pub llm: LlmConfig,

    #[serde(default)]
    pub backends: BackendsConfig,

    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl Default for Config {
    fn default() -> Self {
        let home =
            UserDirs::new().map_or_else(|| PathBuf::from("."), |u| u.home_dir().to_path_buf());
        let askhr_dir = home.join(".askhr");

        Self {
            config_path: askhr_dir.join("config.toml"),
            gateway: GatewayConfig::default(),
            llm: LlmConfig::default(),
            backends: BackendsConfig::default(),
            session: SessionConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

impl Config {
    /// Database file used by the sqlite session backend.
    pub fn sqlite_session_path(&self) -> PathBuf {
        self.session.sqlite_path.clone().unwrap_or_else(|| {
            self.config_path
                .parent()
                .map_or_else(|| PathBuf::from("sessions.db"), |dir| dir.join("sessions.db"))
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, temp) in [
            ("llm.router_temperature", self.llm.router_temperature),
            ("llm.answer_temperature", self.llm.answer_temperature),
        ] {
            if !(0.0..=2.0).contains(&temp) {
                return Err(ConfigError::Validation(format!(
                    "{name} must be within 0.0..=2.0 (got {temp})"
                )));
            }
        }

        if self.llm.history_window == 0 {
            return Err(ConfigError::Validation(
                "llm.history_window must be at least 1".into(),
            ));
        }

        for (name, url) in [
            ("backends.rag_service_url", &self.backends.rag_service_url),
            ("backends.workday_tools_url", &self.backends.workday_tools_url),
        ] {
            if url.trim().is_empty() {
                return Err(ConfigError::Validation(format!("{name} must not be empty")));
            }
        }

        if self.backends.rag_timeout_secs == 0 || self.backends.workday_timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "backend timeouts must be greater than zero".into(),
            ));
        }

        if self.session.backend == SessionBackend::Sqlite
            && self
                .session
                .sqlite_path
                .as_ref()
                .is_some_and(|p| p.as_os_str().is_empty())
        {
            return Err(ConfigError::Validation(
                "session.sqlite_path must not be empty".into(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        Config::default().validate().unwrap();
    }

    #[test]
    fn default_config_lives_under_askhr_dir() {
        let config = Config::default();
        assert!(config.config_path.ends_with(".askhr/config.toml"));
    }

    #[test]
    fn out_of_range_temperature_is_rejected() {
        let mut config = Config::default();
        config.llm.answer_temperature = 3.5;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("llm.answer_temperature"));
    }

    #[test]
    fn zero_history_window_is_rejected() {
        let mut config = Config::default();
        config.llm.history_window = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn blank_backend_url_is_rejected() {
        let mut config = Config::default();
        config.backends.workday_tools_url = "  ".into();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("workday_tools_url"));
    }

    #[test]
    fn sqlite_path_defaults_next_to_config_file() {
        let mut config = Config::default();
        config.config_path = PathBuf::from("/etc/askhr/config.toml");
        assert_eq!(
            config.sqlite_session_path(),
            PathBuf::from("/etc/askhr/sessions.db")
        );

        config.session.sqlite_path = Some(PathBuf::from("/var/lib/askhr.db"));
        assert_eq!(
            config.sqlite_session_path(),
            PathBuf::from("/var/lib/askhr.db")
        );
    }

    #[test]
    fn config_toml_round_trip() {
        let mut original = Config::default();
        original.gateway.port = 9001;
        original.llm.router_model = "gemini-2.5-flash".into();
        original.backends.rag_service_url = "http://rag.internal".into();
        original.session.backend = SessionBackend::Sqlite;

        let toml_str = toml::to_string_pretty(&original).unwrap();
        let decoded: Config = toml::from_str(&toml_str).unwrap();

        assert_eq!(decoded.gateway.port, 9001);
        assert_eq!(decoded.llm.router_model, "gemini-2.5-flash");
        assert_eq!(decoded.backends.rag_service_url, "http://rag.internal");
        assert_eq!(decoded.session.backend, SessionBackend::Sqlite);
    }

    #[test]
    fn empty_toml_yields_defaults() {
        let decoded: Config = toml::from_str("").unwrap();
        assert_eq!(decoded.gateway.port, 8000);
        assert_eq!(decoded.backends.workday_timeout_secs, 300);
    }
}
