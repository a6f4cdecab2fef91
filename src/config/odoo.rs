use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct OdooConfig {
    #[serde(default = "default_url")]
    pub url: String,
    #[serde(default = "default_database")]
    pub database: String,
    #[serde(default = "default_username")]
    pub username: String,
    #[serde(default = "default_password")]
    pub password: String,
}

fn default_url() -> String {
    "http://localhost:8069".to_string()
}

fn default_database() -> String {
    "dbbrazen".to_string()
}

fn default_username() -> String {
    "admin".to_string()
}

fn default_password() -> String {
    "admin".to_string()
}

impl Default for OdooConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            database: default_database(),
            username: default_username(),
            password: default_password(),
        }
    }
}

/// Which remote the submission service talks to. A deployment picks exactly one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Topology {
    #[default]
    Direct,
    Relay,
}

impl Topology {
    pub fn as_str(&self) -> &'static str {
        match self {
            Topology::Direct => "direct",
            Topology::Relay => "relay",
        }
    }
}

impl std::str::FromStr for Topology {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "direct" => Ok(Topology::Direct),
            "relay" => Ok(Topology::Relay),
            other => Err(format!("unknown gateway mode: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    #[serde(default)]
    pub mode: Topology,
    #[serde(default = "default_relay_url")]
    pub relay_url: String,
}

fn default_relay_url() -> String {
    "http://localhost:8070".to_string()
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            mode: Topology::default(),
            relay_url: default_relay_url(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RelayConfig {
    #[serde(default = "default_hostname")]
    pub hostname: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_hostname() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8070
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            hostname: default_hostname(),
            port: default_port(),
        }
    }
}

impl RelayConfig {
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.hostname, self.port)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct FormConfig {
    #[serde(default = "default_success_display_seconds")]
    pub success_display_seconds: u64,
}

fn default_success_display_seconds() -> u64 {
    3
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            success_display_seconds: default_success_display_seconds(),
        }
    }
}

impl FormConfig {
    pub fn success_display(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.success_display_seconds)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_min_level")]
    pub min_level: String,
}

fn default_min_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            min_level: default_min_level(),
        }
    }
}
