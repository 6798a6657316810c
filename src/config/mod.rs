use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::correction::client::DEFAULT_TIMEOUT;

/// Service configuration, loaded from a TOML file with environment-variable
/// overrides on top. `load` never fails; anything unreadable falls back to
/// the defaults below.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub generator_endpoint: String,
    pub model: String,
    pub request_timeout_secs: u64,
    #[serde(skip)]
    pub config_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            generator_endpoint: "http://localhost:11434/api/generate".to_string(),
            model: "llama3.2:1b".to_string(),
            request_timeout_secs: DEFAULT_TIMEOUT.as_secs(),
            config_path: PathBuf::from(&home).join(".config/grammar-fixer/config.toml"),
        }
    }
}

impl Config {
    pub fn load() -> Self {
        let mut config = Self::load_from(Config::default().config_path);
        config.apply_env_overrides();
        config
    }

    /// Read the file at `config_path`, writing the defaults there first if
    /// it does not exist yet.
    pub fn load_from(config_path: PathBuf) -> Self {
        let mut config = Config {
            config_path,
            ..Config::default()
        };

        if !config.config_path.exists() {
            let _ = config.save();
            return config;
        }

        config.read_file();
        config
    }

    fn read_file(&mut self) {
        let contents = match fs::read_to_string(&self.config_path) {
            Ok(contents) => contents,
            Err(error) => {
                warn!("Could not read {}: {error}", self.config_path.display());
                return;
            }
        };

        let parsed = match contents.parse::<toml_edit::DocumentMut>() {
            Ok(parsed) => parsed,
            Err(error) => {
                warn!("Ignoring malformed config {}: {error}", self.config_path.display());
                return;
            }
        };

        if let Some(host) = parsed.get("host").and_then(|v| v.as_str()) {
            self.host = host.to_string();
        }
        if let Some(port) = parsed.get("port").and_then(|v| v.as_integer()) {
            self.port = port as u16;
        }
        if let Some(endpoint) = parsed.get("generator_endpoint").and_then(|v| v.as_str()) {
            self.generator_endpoint = endpoint.to_string();
        }
        if let Some(model) = parsed.get("model").and_then(|v| v.as_str()) {
            self.model = model.to_string();
        }
        if let Some(secs) = parsed.get("request_timeout_secs").and_then(|v| v.as_integer()) {
            self.request_timeout_secs = secs as u64;
        }
    }

    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        let mut doc = toml_edit::DocumentMut::new();
        doc["host"] = toml_edit::value(self.host.clone());
        doc["port"] = toml_edit::value(self.port as i64);
        doc["generator_endpoint"] = toml_edit::value(self.generator_endpoint.clone());
        doc["model"] = toml_edit::value(self.model.clone());
        doc["request_timeout_secs"] = toml_edit::value(self.request_timeout_secs as i64);

        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(&self.config_path, doc.to_string())?;
        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(host) = std::env::var("GRAMMAR_FIXER_HOST") {
            self.host = host;
        }
        if let Ok(port) = std::env::var("GRAMMAR_FIXER_PORT") {
            match port.parse() {
                Ok(port) => self.port = port,
                Err(_) => warn!("Ignoring non-numeric GRAMMAR_FIXER_PORT: {port}"),
            }
        }
        if let Ok(endpoint) = std::env::var("GRAMMAR_FIXER_GENERATOR_ENDPOINT") {
            self.generator_endpoint = endpoint;
        }
        if let Ok(model) = std::env::var("GRAMMAR_FIXER_MODEL") {
            self.model = model;
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
