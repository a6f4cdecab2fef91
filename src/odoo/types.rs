use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

pub const PARTNER_MODEL: &str = "res.partner";
pub const CONTACT_FIELDS: [&str; 4] = ["id", "name", "email", "phone"];
pub const CONTACT_LIST_LIMIT: u32 = 10;

/// Identifier Odoo assigns to a newly created partner.
pub type RemoteContactId = i64;

/// Field values of the contact form. Both fields are always present, possibly empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactDraft {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
}

impl ContactDraft {
    pub fn new(name: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            phone: phone.into(),
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.name.trim().is_empty() && !self.phone.trim().is_empty()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RpcRequest<P: Serialize> {
    pub jsonrpc: &'static str,
    pub method: &'static str,
    pub params: P,
}

impl<P: Serialize> RpcRequest<P> {
    pub fn call(params: P) -> Self {
        Self {
            jsonrpc: "2.0",
            method: "call",
            params,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AuthenticateParams<'a> {
    pub db: &'a str,
    pub login: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct CallKwParams<A: Serialize, K: Serialize> {
    pub model: &'static str,
    pub method: &'static str,
    pub args: A,
    pub kwargs: K,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchReadKwargs {
    pub fields: [&'static str; 4],
    pub limit: u32,
}

impl Default for SearchReadKwargs {
    fn default() -> Self {
        Self {
            fields: CONTACT_FIELDS,
            limit: CONTACT_LIST_LIMIT,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RpcResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jsonrpc: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
}

impl RpcResponse {
    pub fn success(result: Value) -> Self {
        Self {
            jsonrpc: Some("2.0".to_string()),
            result: Some(result),
            ..Default::default()
        }
    }

    pub fn failure(error: RpcError) -> Self {
        Self {
            jsonrpc: Some("2.0".to_string()),
            error: Some(error),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RpcError {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub data: RpcErrorData,
}

impl RpcError {
    pub fn new(code: i64, name: impl Into<String>, message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            code,
            message: message.clone(),
            data: RpcErrorData {
                name: name.into(),
                debug: message,
            },
        }
    }

    pub fn debug_message(&self) -> Option<&str> {
        Some(self.data.debug.as_str()).filter(|s| !s.trim().is_empty())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RpcErrorData {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub debug: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub uid: i64,
    #[serde(default, deserialize_with = "odoo_string")]
    pub name: String,
}

impl Session {
    /// Odoo answers a failed login with `uid: false` or no result at all.
    pub fn from_result(result: Option<&Value>) -> Option<Self> {
        let result = result?;
        let uid = result.get("uid").and_then(Value::as_i64)?;
        if uid <= 0 {
            return None;
        }
        let name = result
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        Some(Self { uid, name })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: i64,
    #[serde(default, deserialize_with = "odoo_string")]
    pub name: String,
    #[serde(default, deserialize_with = "odoo_optional_string")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "odoo_optional_string")]
    pub phone: Option<String>,
}

// Odoo writes `false` for unset char fields.
fn odoo_optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) if !s.is_empty() => Ok(Some(s)),
        Value::String(_) | Value::Null | Value::Bool(false) => Ok(None),
        other => Err(serde::de::Error::custom(format!(
            "expected string or false, got {}",
            other
        ))),
    }
}

fn odoo_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    odoo_optional_string(deserializer).map(Option::unwrap_or_default)
}
