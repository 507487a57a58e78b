//! Application configuration management
//!
//! This module handles loading and validating configuration from environment variables.
//! All configuration is loaded at startup and validated before the application runs.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::LazyLock;
use std::time::Duration;

use crate::constants::{
    DEFAULT_COMPILE_TIMEOUT_MS, DEFAULT_CXX_CANDIDATES, DEFAULT_CXX_STD,
    DEFAULT_DATABASE_MAX_CONNECTIONS, DEFAULT_GENERATOR_TIMEOUT_MS, DEFAULT_JWT_EXPIRY_HOURS,
    DEFAULT_MAX_TESTS_PER_REQUEST, DEFAULT_MAX_UPLOAD_BYTES, DEFAULT_PYTHON_CANDIDATES,
    DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT, DEFAULT_SOLUTION_TIMEOUT_MS, DEFAULT_UPLOADS_PATH,
};

/// Global application configuration (lazily initialized)
pub static CONFIG: LazyLock<Config> = LazyLock::new(|| {
    Config::from_env().expect("Failed to load configuration from environment")
});

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub storage: StorageConfig,
    pub execution: ExecutionConfig,
    pub toolchain: ToolchainConfig,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub rust_log: String,
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

/// JWT authentication configuration
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub expiry_hours: i64,
}

/// File storage configuration
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Root directory for uploaded generator/checker/solution sources
    pub uploads_path: PathBuf,
    pub max_upload_bytes: usize,
}

/// Limits applied to every external process the pipeline starts
#[derive(Debug, Clone)]
pub struct ExecutionConfig {
    pub compile_timeout: Duration,
    pub generator_timeout: Duration,
    pub solution_timeout: Duration,
    pub max_tests_per_request: i32,
}

/// Candidate binaries probed once at startup
#[derive(Debug, Clone)]
pub struct ToolchainConfig {
    pub cxx_candidates: Vec<String>,
    pub python_candidates: Vec<String>,
    pub cxx_std: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Ok(Self {
            server: ServerConfig::from_env()?,
            database: DatabaseConfig::from_env()?,
            jwt: JwtConfig::from_env()?,
            storage: StorageConfig::from_env()?,
            execution: ExecutionConfig::from_env()?,
            toolchain: ToolchainConfig::from_env(),
        })
    }
}

impl ServerConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            host: env::var("SERVER_HOST").unwrap_or_else(|_| DEFAULT_SERVER_HOST.to_string()),
            port: parse_var("SERVER_PORT", DEFAULT_SERVER_PORT)?,
            rust_log: env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

impl DatabaseConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            url: env::var("DATABASE_URL")
                .map_err(|_| ConfigError::Missing("DATABASE_URL".to_string()))?,
            max_connections: parse_var("DATABASE_MAX_CONNECTIONS", DEFAULT_DATABASE_MAX_CONNECTIONS)?,
        })
    }
}

impl JwtConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            secret: env::var("JWT_SECRET")
                .map_err(|_| ConfigError::Missing("JWT_SECRET".to_string()))?,
            expiry_hours: parse_var("JWT_EXPIRY_HOURS", DEFAULT_JWT_EXPIRY_HOURS)?,
        })
    }
}

impl StorageConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            uploads_path: PathBuf::from(
                env::var("UPLOADS_PATH").unwrap_or_else(|_| DEFAULT_UPLOADS_PATH.to_string()),
            ),
            max_upload_bytes: parse_var("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
        })
    }
}

impl ExecutionConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            compile_timeout: Duration::from_millis(parse_var(
                "COMPILE_TIMEOUT_MS",
                DEFAULT_COMPILE_TIMEOUT_MS,
            )?),
            generator_timeout: Duration::from_millis(parse_var(
                "GENERATOR_TIMEOUT_MS",
                DEFAULT_GENERATOR_TIMEOUT_MS,
            )?),
            solution_timeout: Duration::from_millis(parse_var(
                "SOLUTION_TIMEOUT_MS",
                DEFAULT_SOLUTION_TIMEOUT_MS,
            )?),
            max_tests_per_request: parse_var("MAX_TESTS_PER_REQUEST", DEFAULT_MAX_TESTS_PER_REQUEST)?,
        })
    }
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            compile_timeout: Duration::from_millis(DEFAULT_COMPILE_TIMEOUT_MS),
            generator_timeout: Duration::from_millis(DEFAULT_GENERATOR_TIMEOUT_MS),
            solution_timeout: Duration::from_millis(DEFAULT_SOLUTION_TIMEOUT_MS),
            max_tests_per_request: DEFAULT_MAX_TESTS_PER_REQUEST,
        }
    }
}

impl ToolchainConfig {
    fn from_env() -> Self {
        Self {
            cxx_candidates: split_list(
                &env::var("CXX_CANDIDATES").unwrap_or_else(|_| DEFAULT_CXX_CANDIDATES.to_string()),
            ),
            python_candidates: split_list(
                &env::var("PYTHON_CANDIDATES")
                    .unwrap_or_else(|_| DEFAULT_PYTHON_CANDIDATES.to_string()),
            ),
            cxx_std: env::var("CXX_STD").unwrap_or_else(|_| DEFAULT_CXX_STD.to_string()),
        }
    }
}

impl Default for ToolchainConfig {
    fn default() -> Self {
        Self {
            cxx_candidates: split_list(DEFAULT_CXX_CANDIDATES),
            python_candidates: split_list(DEFAULT_PYTHON_CANDIDATES),
            cxx_std: DEFAULT_CXX_STD.to_string(),
        }
    }
}

/// Read an optional variable, falling back to `default` when unset
fn parse_var<T: FromStr + ToString>(name: &str, default: T) -> Result<T, ConfigError> {
    env::var(name)
        .unwrap_or_else(|_| default.to_string())
        .parse()
        .map_err(|_| ConfigError::InvalidValue(name.to_string()))
}

/// Split a comma-separated list, dropping empty entries
fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(String),

    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let server = ServerConfig {
            host: DEFAULT_SERVER_HOST.to_string(),
            port: DEFAULT_SERVER_PORT,
            rust_log: "info".to_string(),
        };
        assert_eq!(server.host, "0.0.0.0");
        assert_eq!(server.port, 3001);

        let execution = ExecutionConfig::default();
        assert_eq!(execution.compile_timeout, Duration::from_secs(30));
        assert_eq!(execution.generator_timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_python_candidates_prefer_python3() {
        let toolchain = ToolchainConfig::default();
        assert_eq!(toolchain.python_candidates, vec!["python3", "python"]);
        assert_eq!(toolchain.cxx_candidates, vec!["g++"]);
        assert_eq!(toolchain.cxx_std, "c++17");
    }

    #[test]
    fn test_split_list_ignores_blanks() {
        assert_eq!(split_list(" clang++ , ,g++,"), vec!["clang++", "g++"]);
        assert!(split_list("").is_empty());
    }
}
