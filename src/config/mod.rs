mod odoo;

pub use odoo::*;

use anyhow::Result;
use serde::Deserialize;

pub const ENV_URL: &str = "ODOO_URL";
pub const ENV_DATABASE: &str = "ODOO_DATABASE";
pub const ENV_USERNAME: &str = "ODOO_USERNAME";
pub const ENV_PASSWORD: &str = "ODOO_PASSWORD";
pub const ENV_GATEWAY_MODE: &str = "ODOO_GATEWAY_MODE";
pub const ENV_RELAY_URL: &str = "ODOO_RELAY_URL";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub odoo: OdooConfig,
    #[serde(default)]
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub relay: RelayConfig,
    #[serde(default)]
    pub form: FormConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::load_from_bytes(content.as_bytes())
    }

    pub fn load_from_bytes(bytes: &[u8]) -> Result<Self> {
        let config: Config = serde_yaml::from_slice(bytes)?;
        config.validate()?;
        Ok(config)
    }

    /// Overlays environment-style settings on top of the file values.
    ///
    /// Takes a lookup function so callers decide where values come from; only
    /// the binary hands in the real process environment.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_URL) {
            self.odoo.url = url;
        }
        if let Some(database) = lookup(ENV_DATABASE) {
            self.odoo.database = database;
        }
        if let Some(username) = lookup(ENV_USERNAME) {
            self.odoo.username = username;
        }
        if let Some(password) = lookup(ENV_PASSWORD) {
            self.odoo.password = password;
        }
        if let Some(mode) = lookup(ENV_GATEWAY_MODE) {
            self.gateway.mode = mode.parse::<Topology>().map_err(anyhow::Error::msg)?;
        }
        if let Some(relay_url) = lookup(ENV_RELAY_URL) {
            self.gateway.relay_url = relay_url;
        }
        self.validate()
    }

    /// Base URL the submission service sends requests to.
    pub fn gateway_url(&self) -> &str {
        match self.gateway.mode {
            Topology::Direct => &self.odoo.url,
            Topology::Relay => &self.gateway.relay_url,
        }
    }

    pub fn validate(&self) -> Result<()> {
        check_base_url("odoo.url", &self.odoo.url)?;

        if self.gateway.mode == Topology::Relay {
            check_base_url("gateway.relay_url", &self.gateway.relay_url)?;
        }

        if self.odoo.database.trim().is_empty() {
            anyhow::bail!("odoo.database must not be empty");
        }

        if self.odoo.username.trim().is_empty() {
            anyhow::bail!("odoo.username must not be empty");
        }

        if self.form.success_display_seconds == 0 {
            anyhow::bail!("form.success_display_seconds must be greater than zero");
        }

        Ok(())
    }
}

fn check_base_url(field: &str, value: &str) -> Result<()> {
    let url = reqwest::Url::parse(value)
        .map_err(|e| anyhow::anyhow!("{} is not a valid URL ({}): {}", field, value, e))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        anyhow::bail!("{} must use http or https, got {}", field, url.scheme());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn empty_document_uses_defaults() {
        let config = Config::load_from_bytes(b"{}").unwrap();
        assert_eq!(config.odoo.url, "http://localhost:8069");
        assert_eq!(config.odoo.database, "dbbrazen");
        assert_eq!(config.odoo.username, "admin");
        assert_eq!(config.odoo.password, "admin");
        assert_eq!(config.gateway.mode, Topology::Direct);
        assert_eq!(config.form.success_display_seconds, 3);
        assert_eq!(config.relay.listen_addr(), "0.0.0.0:8070");
    }

    #[test]
    fn relay_mode_uses_relay_url() {
        let yaml = b"gateway:\n  mode: relay\n  relay_url: http://relay.local:9000\n";
        let config = Config::load_from_bytes(yaml).unwrap();
        assert_eq!(config.gateway.mode, Topology::Relay);
        assert_eq!(config.gateway_url(), "http://relay.local:9000");
    }

    #[test]
    fn rejects_relative_url() {
        let yaml = b"odoo:\n  url: /web\n";
        assert!(Config::load_from_bytes(yaml).is_err());
    }

    #[test]
    fn rejects_zero_display_time() {
        let yaml = b"form:\n  success_display_seconds: 0\n";
        assert!(Config::load_from_bytes(yaml).is_err());
    }

    #[test]
    fn env_overrides_replace_file_values() {
        let env: HashMap<&str, &str> = HashMap::from([
            (ENV_URL, "https://erp.example.com"),
            (ENV_DATABASE, "prod"),
            (ENV_GATEWAY_MODE, "Relay"),
        ]);

        let mut config = Config::default();
        config
            .apply_env_overrides(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.odoo.url, "https://erp.example.com");
        assert_eq!(config.odoo.database, "prod");
        assert_eq!(config.odoo.username, "admin");
        assert_eq!(config.gateway.mode, Topology::Relay);
    }

    #[test]
    fn unknown_gateway_mode_is_an_error() {
        let mut config = Config::default();
        let result = config.apply_env_overrides(|key| {
            (key == ENV_GATEWAY_MODE).then(|| "carrier-pigeon".to_string())
        });
        assert!(result.is_err());
    }
}
