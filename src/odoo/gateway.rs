use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use crate::error::{ContactError, Result};

/// A remote contact store reachable over HTTP with JSON payloads.
///
/// Both Odoo itself and the relay server sit behind this seam; the caller
/// decides paths and bodies.
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Opens a handle whose requests share one cookie jar. Odoo ties the
    /// `session_id` cookie set by authenticate to every later `call_kw`, so an
    /// authenticate-then-call operation must run on a single session.
    fn session(&self) -> Result<Self>
    where
        Self: Sized;

    /// Where requests are sent, for status reporting.
    fn endpoint(&self) -> &str;

    async fn post_json(&self, path: &str, body: &Value) -> Result<Value>;
}

#[derive(Clone)]
pub struct HttpGateway {
    base_url: String,
    client: Client,
}

fn session_client() -> Result<Client> {
    Ok(Client::builder().cookie_store(true).build()?)
}

impl HttpGateway {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Ok(Self {
            base_url: base_url.into(),
            client: session_client()?,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}

#[async_trait]
impl Gateway for HttpGateway {
    fn session(&self) -> Result<Self> {
        Ok(Self {
            base_url: self.base_url.clone(),
            client: session_client()?,
        })
    }

    fn endpoint(&self) -> &str {
        &self.base_url
    }

    async fn post_json(&self, path: &str, body: &Value) -> Result<Value> {
        let url = self.url(path);
        debug!("Gateway request: POST {}", url);

        let resp = self.client.post(&url).json(body).send().await?;
        let status = resp.status();
        let text = resp.text().await?;

        debug!("Gateway response: {} - {}", status, text);

        if !status.is_success() {
            // An error envelope is still a backend answer the caller can classify.
            if let Ok(value) = serde_json::from_str::<Value>(&text) {
                if value.get("error").is_some_and(Value::is_object) {
                    return Ok(value);
                }
            }
            return Err(ContactError::Transport(format!(
                "request to {} failed: {} - {}",
                path, status, text
            )));
        }

        let value: Value = serde_json::from_str(&text)?;
        if !value.is_object() {
            return Err(ContactError::Transport(format!(
                "expected a JSON object from {}, got {}",
                path, text
            )));
        }
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_base_and_path_without_double_slash() {
        let gateway = HttpGateway::new("http://localhost:8069/").unwrap();
        assert_eq!(
            gateway.url("/web/session/authenticate"),
            "http://localhost:8069/web/session/authenticate"
        );
    }

    #[test]
    fn session_keeps_the_base_url() {
        let gateway = HttpGateway::new("http://localhost:8069").unwrap();
        let session = gateway.session().unwrap();
        assert_eq!(session.endpoint(), "http://localhost:8069");
    }
}
