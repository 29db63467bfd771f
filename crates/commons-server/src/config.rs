use std::net::SocketAddr;

use anyhow::{Context, Result};

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 5000;
const DEFAULT_DEMO_PASSWORD: &str = "password123";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub demo_password: String,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let host = lookup("COMMONS_HOST").unwrap_or_else(|| DEFAULT_HOST.into());
        let port = match lookup("COMMONS_PORT") {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("COMMONS_PORT is not a valid port: {}", raw))?,
            None => DEFAULT_PORT,
        };
        let demo_password =
            lookup("COMMONS_DEMO_PASSWORD").unwrap_or_else(|| DEFAULT_DEMO_PASSWORD.into());

        Ok(Self {
            host,
            port,
            demo_password,
        })
    }

    pub fn addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid listen address {}:{}", self.host, self.port))
    }
}
