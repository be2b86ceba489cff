use serde::Deserialize;
use config::{Config, ConfigError, Environment, File};

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub server: ServerConfig,
    pub store: StoreConfig,
    pub auth: AuthConfig,
    #[serde(default)]
    pub assistant: AssistantConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StoreConfig {
    /// SQLite URL, or `memory` for a process-local store.
    pub url: String,
    pub max_connections: u32,
    #[serde(default)]
    pub seed_on_start: bool,
}

impl StoreConfig {
    pub fn is_memory(&self) -> bool {
        self.url == "memory"
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub session_duration_hours: i64,
    #[serde(default)]
    pub demo_login_enabled: bool,
    #[serde(default)]
    pub secure_cookies: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session_duration_hours: 24,
            demo_login_enabled: true,
            secure_cookies: false,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct AssistantConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "gemini-3-flash-preview".to_string(),
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            timeout_secs: 30,
        }
    }
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let config = Config::builder()
            // Start with default values
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("store.url", "sqlite://uniclubs.db?mode=rwc")?
            .set_default("store.max_connections", 5)?
            .set_default("store.seed_on_start", true)?
            .set_default("auth.session_duration_hours", 24)?
            .set_default("auth.demo_login_enabled", true)?
            .set_default("auth.secure_cookies", false)?
            .set_default("assistant.model", "gemini-3-flash-preview")?
            .set_default("assistant.base_url", "https://generativelanguage.googleapis.com/v1beta")?
            .set_default("assistant.timeout_secs", 30)?

            // Add config file if it exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))

            // Add environment variables (with UNICLUBS__ prefix, double underscore separates levels)
            .add_source(Environment::with_prefix("UNICLUBS").separator("__"))

            .build()?;

        config.try_deserialize()
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
            },
            store: StoreConfig {
                url: "sqlite://uniclubs.db?mode=rwc".to_string(),
                max_connections: 5,
                seed_on_start: true,
            },
            auth: AuthConfig::default(),
            assistant: AssistantConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_usable_without_files() {
        let settings = Settings::default();
        assert!(!settings.store.is_memory());
        assert!(settings.auth.demo_login_enabled);
        assert!(settings.assistant.api_key.is_none());
    }
}
