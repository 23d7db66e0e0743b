use crate::error::ConfigError;
use serde::Deserialize;
use std::fs;
use std::time::Duration;

/// Endpoints and topics of the simulation engine.
///
/// Every field has a default matching a locally running engine, so a TOML file only
/// needs to list what differs.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub base_url: String,
    pub upload_path: String,
    pub simulation_path: String,
    pub ws_url: String,
    pub updates_ws_url: String,
    pub status_topic: String,
    pub update_topic: String,
    pub command_destination: String,
    pub request_timeout_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            upload_path: "/setGraph".to_string(),
            simulation_path: "/simulation".to_string(),
            ws_url: "ws://localhost:8080/ws/websocket".to_string(),
            updates_ws_url: "ws://localhost:8080/simulation-updates".to_string(),
            status_topic: "/topic/status".to_string(),
            update_topic: "/topic/main".to_string(),
            command_destination: "/app/action".to_string(),
            request_timeout_secs: 30,
        }
    }
}

impl SessionConfig {
    pub fn from_toml_str(toml: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_string(),
            message: e.to_string(),
        })?;
        Self::from_toml_str(&content)
    }

    pub fn upload_url(&self) -> String {
        join_url(&self.base_url, &self.upload_path)
    }

    pub fn simulation_url(&self) -> String {
        join_url(&self.base_url, &self.simulation_path)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = SessionConfig::from_toml_str(
            r#"
            base_url = "http://engine:9000/"
            status_topic = "/topic/state"
            "#,
        )
        .unwrap();
        assert_eq!(config.upload_url(), "http://engine:9000/setGraph");
        assert_eq!(config.status_topic, "/topic/state");
        assert_eq!(config.update_topic, "/topic/main");
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn rejects_wrong_types() {
        let err = SessionConfig::from_toml_str("request_timeout_secs = \"soon\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = SessionConfig::from_file("does/not/exist.toml").unwrap_err();
        assert!(err.to_string().contains("does/not/exist.toml"));
    }
}
