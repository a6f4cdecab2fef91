use serde_json::{Value, json};
use tracing::{debug, info, warn};

use super::gateway::Gateway;
use super::types::*;
use crate::config::{OdooConfig, Topology};
use crate::error::{ContactError, Result};

pub const AUTHENTICATE_PATH: &str = "/web/session/authenticate";
pub const CREATE_PATH: &str = "/web/dataset/call_kw/res.partner/create";
pub const SEARCH_READ_PATH: &str = "/web/dataset/call_kw/res.partner/search_read";

pub const RELAY_AUTHENTICATE_PATH: &str = "/api/authenticate";
pub const RELAY_CREATE_PATH: &str = "/api/create-contact";
pub const RELAY_CONTACTS_PATH: &str = "/api/contacts";

pub const AUTH_FAILED_MESSAGE: &str = "Failed to authenticate with Odoo";
pub const CREATE_FAILED_MESSAGE: &str = "Failed to create contact";

/// Stateless wrapper translating typed calls into Odoo requests.
///
/// Every call authenticates from scratch; no session cookie is kept.
pub struct ContactService<G> {
    gateway: G,
    odoo: OdooConfig,
    topology: Topology,
}

impl<G: Gateway> ContactService<G> {
    pub fn new(gateway: G, odoo: OdooConfig, topology: Topology) -> Self {
        Self {
            gateway,
            odoo,
            topology,
        }
    }

    pub fn topology(&self) -> Topology {
        self.topology
    }

    pub fn odoo(&self) -> &OdooConfig {
        &self.odoo
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    async fn call(&self, session: &G, path: &str, body: Value) -> Result<RpcResponse> {
        let value = session.post_json(path, &body).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Opens a session and returns who it belongs to, or `None` when the
    /// backend refused the credentials.
    pub async fn authenticate_session(&self) -> Result<Option<Session>> {
        self.login(&self.gateway.session()?).await
    }

    async fn login(&self, session: &G) -> Result<Option<Session>> {
        let response = match self.topology {
            Topology::Direct => {
                let body = RpcRequest::call(AuthenticateParams {
                    db: &self.odoo.database,
                    login: &self.odoo.username,
                    password: &self.odoo.password,
                });
                debug!("Authenticating against database {}", self.odoo.database);
                self.call(session, AUTHENTICATE_PATH, serde_json::to_value(&body)?).await?
            }
            Topology::Relay => self.call(session, RELAY_AUTHENTICATE_PATH, json!({})).await?,
        };

        match Session::from_result(response.result.as_ref()) {
            Some(session) => {
                info!("Authenticated as {} (uid {})", session.name, session.uid);
                Ok(Some(session))
            }
            None => {
                let reason = response
                    .error
                    .as_ref()
                    .map(|e| e.message.as_str())
                    .filter(|m| !m.is_empty())
                    .unwrap_or("Unknown error");
                warn!("Authentication refused: {}", reason);
                Ok(None)
            }
        }
    }

    pub async fn authenticate(&self) -> Result<bool> {
        Ok(self.authenticate_session().await?.is_some())
    }

    pub async fn create_contact(&self, draft: &ContactDraft) -> Result<RemoteContactId> {
        let session = self.gateway.session()?;
        if self.login(&session).await?.is_none() {
            return Err(ContactError::Authentication(AUTH_FAILED_MESSAGE.to_string()));
        }

        debug!("Creating contact {:?}", draft.name);

        let fields = json!({ "name": draft.name, "phone": draft.phone });
        let response = match self.topology {
            Topology::Direct => {
                let body = RpcRequest::call(CallKwParams {
                    model: PARTNER_MODEL,
                    method: "create",
                    args: [fields],
                    kwargs: json!({}),
                });
                self.call(&session, CREATE_PATH, serde_json::to_value(&body)?).await?
            }
            Topology::Relay => self.call(&session, RELAY_CREATE_PATH, fields).await?,
        };

        if let Some(id) = response.result.as_ref().and_then(Value::as_i64).filter(|id| *id > 0) {
            info!("Contact created with id {}", id);
            return Ok(id);
        }

        match response.result {
            None | Some(Value::Null) | Some(Value::Bool(false)) | Some(Value::Number(_)) => {
                let message = response
                    .error
                    .as_ref()
                    .and_then(RpcError::debug_message)
                    .unwrap_or(CREATE_FAILED_MESSAGE)
                    .to_string();
                warn!("Contact creation failed: {}", message);
                Err(ContactError::CreationFailed(message))
            }
            Some(other) => Err(ContactError::Transport(format!(
                "unexpected create result: {}",
                other
            ))),
        }
    }

    /// Lists up to ten partners. Any failure yields an empty list, so an empty
    /// result does not distinguish "no contacts" from "request failed".
    pub async fn fetch_contacts(&self) -> Vec<Contact> {
        match self.try_fetch_contacts().await {
            Ok(contacts) => {
                info!("Fetched {} contacts", contacts.len());
                contacts
            }
            Err(e) => {
                warn!("Fetching contacts failed, returning none: {}", e);
                Vec::new()
            }
        }
    }

    async fn try_fetch_contacts(&self) -> Result<Vec<Contact>> {
        let session = self.gateway.session()?;
        if self.login(&session).await?.is_none() {
            return Err(ContactError::Authentication(AUTH_FAILED_MESSAGE.to_string()));
        }

        let response = match self.topology {
            Topology::Direct => {
                let body = RpcRequest::call(CallKwParams {
                    model: PARTNER_MODEL,
                    method: "search_read",
                    args: json!([[]]),
                    kwargs: SearchReadKwargs::default(),
                });
                self.call(&session, SEARCH_READ_PATH, serde_json::to_value(&body)?).await?
            }
            Topology::Relay => self.call(&session, RELAY_CONTACTS_PATH, json!({})).await?,
        };

        match response.result {
            Some(Value::Array(items)) => Ok(serde_json::from_value(Value::Array(items))?),
            _ => {
                let message = response
                    .error
                    .map(|e| e.message)
                    .unwrap_or_else(|| "no result".to_string());
                Err(ContactError::Transport(message))
            }
        }
    }
}
