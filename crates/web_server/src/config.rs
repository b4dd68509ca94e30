use anyhow::{Context, Result};

/// Default address the callback receiver binds to
pub const DEFAULT_CALLBACK_HOST: &str = "0.0.0.0";

/// Default port the callback receiver listens on
pub const DEFAULT_CALLBACK_PORT: u16 = 8080;

/// Bind address of the callback receiver
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve `CALLBACK_HOST` and `CALLBACK_PORT` through `lookup`, falling back to defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("CALLBACK_HOST")
            .map(|host| host.trim().to_string())
            .filter(|host| !host.is_empty())
            .unwrap_or_else(|| DEFAULT_CALLBACK_HOST.to_string());

        let port = match lookup("CALLBACK_PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .with_context(|| format!("CALLBACK_PORT must be a port number, got {:?}", raw))?,
            None => DEFAULT_CALLBACK_PORT,
        };

        Ok(Self { host, port })
    }

    /// Apply command line overrides on top of the environment
    pub fn with_overrides(mut self, host: Option<String>, port: Option<u16>) -> Self {
        if let Some(host) = host {
            self.host = host;
        }
        if let Some(port) = port {
            self.port = port;
        }
        self
    }
}
