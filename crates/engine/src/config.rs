//! Engine configuration loaded from environment variables.

use std::path::PathBuf;

const DEFAULT_DATABASE_PATH: &str = "cookflow.db";
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub database_path: PathBuf,
    pub server_host: String,
    pub server_port: u16,
    /// `*` or a comma-separated origin list. `None` disables CORS.
    pub cors_allowed_origins: Option<String>,
    pub seed_demo_data: bool,
}

impl EngineConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Unparseable values fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let server_port = non_empty("SERVER_PORT")
            .or_else(|| non_empty("PORT"))
            .and_then(|port| match port.parse() {
                Ok(port) => Some(port),
                Err(_) => {
                    tracing::warn!(port = %port, "Invalid server port, using default");
                    None
                }
            })
            .unwrap_or(DEFAULT_PORT);

        Self {
            database_path: non_empty("DATABASE_PATH")
                .unwrap_or_else(|| DEFAULT_DATABASE_PATH.into())
                .into(),
            server_host: non_empty("SERVER_HOST").unwrap_or_else(|| DEFAULT_HOST.into()),
            server_port,
            cors_allowed_origins: non_empty("CORS_ALLOWED_ORIGINS"),
            seed_demo_data: non_empty("SEED_DEMO_DATA")
                .is_some_and(|value| matches!(value.to_ascii_lowercase().as_str(), "1" | "true" | "yes")),
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> EngineConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        EngineConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let config = config(&[]);
        assert_eq!(config.database_path, PathBuf::from("cookflow.db"));
        assert_eq!(config.bind_address(), "0.0.0.0:3000");
        assert_eq!(config.cors_allowed_origins, None);
        assert!(!config.seed_demo_data);
    }

    #[test]
    fn port_falls_back_to_port_variable() {
        assert_eq!(config(&[("PORT", "8080")]).server_port, 8080);
        assert_eq!(
            config(&[("SERVER_PORT", "9000"), ("PORT", "8080")]).server_port,
            9000
        );
        assert_eq!(config(&[("SERVER_PORT", "nope")]).server_port, 3000);
    }

    #[test]
    fn seed_flag_and_blank_values() {
        assert!(config(&[("SEED_DEMO_DATA", "TRUE")]).seed_demo_data);
        assert!(config(&[("SEED_DEMO_DATA", "1")]).seed_demo_data);
        assert!(!config(&[("SEED_DEMO_DATA", "0")]).seed_demo_data);
        assert_eq!(config(&[("CORS_ALLOWED_ORIGINS", "  ")]).cors_allowed_origins, None);
    }
}
