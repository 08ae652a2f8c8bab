use once_cell::sync::Lazy;
use std::env;
use std::path::PathBuf;

/// Default CORS origins: the dev frontend and the backend itself
const DEFAULT_ALLOWED_ORIGINS: &str = "http://localhost:3000,http://127.0.0.1:8000";

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    // Service info
    pub name: String,
    pub version: String,
    pub debug: bool,

    // Server
    pub host: String,
    pub port: u16,
    /// Parsed from `PDM_ALLOWED_ORIGINS` (comma-separated).
    pub allowed_origins: Vec<String>,

    // Repository
    pub repo_path: PathBuf,
    pub locks_file: PathBuf,

    // Static files
    pub static_files_dir: PathBuf,

    // Logging
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            // Service info
            name: env::var("PDM_APP_NAME").unwrap_or_else(|_| "PDM Backend API".to_string()),
            version: env!("CARGO_PKG_VERSION").to_string(),
            debug: env::var("PDM_DEBUG")
                .map(|v| v.to_lowercase() == "true")
                .unwrap_or(true),

            // Server
            host: env::var("PDM_API_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PDM_API_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8000),
            allowed_origins: parse_origins(
                &env::var("PDM_ALLOWED_ORIGINS")
                    .unwrap_or_else(|_| DEFAULT_ALLOWED_ORIGINS.to_string()),
            ),

            // Repository
            repo_path: PathBuf::from(
                env::var("PDM_REPO_PATH").unwrap_or_else(|_| "./repo".to_string()),
            ),
            locks_file: PathBuf::from(
                env::var("PDM_LOCKS_FILE").unwrap_or_else(|_| "./locks.json".to_string()),
            ),

            // Static files
            static_files_dir: PathBuf::from(
                env::var("PDM_STATIC_DIR").unwrap_or_else(|_| "./static".to_string()),
            ),

            // Logging
            log_level: env::var("PDM_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        }
    }

    /// Address string the server binds to
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

pub static CONFIG: Lazy<Config> = Lazy::new(Config::from_env);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_origins_trims_and_skips_empty() {
        let origins = parse_origins(" http://a.test , ,http://b.test,");
        assert_eq!(origins, vec!["http://a.test", "http://b.test"]);
    }

    #[test]
    fn test_parse_origins_empty() {
        assert!(parse_origins("").is_empty());
    }

    #[test]
    fn test_default_origins() {
        let origins = parse_origins(DEFAULT_ALLOWED_ORIGINS);
        assert_eq!(origins.len(), 2);
        assert!(origins.contains(&"http://localhost:3000".to_string()));
    }

    #[test]
    fn test_version_from_cargo() {
        let config = Config::from_env();
        assert!(!config.version.is_empty());
        assert!(config.version.contains('.'));
    }

    #[test]
    fn test_bind_addr_format() {
        let mut config = Config::from_env();
        config.host = "0.0.0.0".to_string();
        config.port = 9000;
        assert_eq!(config.bind_addr(), "0.0.0.0:9000");
    }
}
