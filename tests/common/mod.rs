#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use salvo::conn::TcpListener;
use salvo::prelude::*;
use serde_json::{Value, json};

use odoo_contact_form::config::{OdooConfig, Topology};
use odoo_contact_form::error::{ContactError, Result};
use odoo_contact_form::odoo::{ContactService, Gateway};

enum Reply {
    Json(Value),
    Transport(String),
}

#[derive(Default)]
struct Script {
    replies: HashMap<String, VecDeque<Reply>>,
    calls: Vec<(String, Value)>,
}

/// Backend stand-in answering each path from a queue and recording every request.
#[derive(Clone, Default)]
pub struct ScriptedGateway {
    script: Arc<Mutex<Script>>,
}

impl ScriptedGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(&self, path: &str, body: Value) {
        self.push(path, Reply::Json(body));
    }

    pub fn fail(&self, path: &str, message: &str) {
        self.push(path, Reply::Transport(message.to_string()));
    }

    fn push(&self, path: &str, reply: Reply) {
        let mut script = self.script.lock().unwrap();
        script.replies.entry(path.to_string()).or_default().push_back(reply);
    }

    pub fn calls(&self) -> Vec<(String, Value)> {
        self.script.lock().unwrap().calls.clone()
    }
}

#[async_trait]
impl Gateway for ScriptedGateway {
    fn session(&self) -> Result<Self> {
        Ok(self.clone())
    }

    fn endpoint(&self) -> &str {
        "http://odoo.test"
    }

    async fn post_json(&self, path: &str, body: &Value) -> Result<Value> {
        let mut script = self.script.lock().unwrap();
        script.calls.push((path.to_string(), body.clone()));

        match script.replies.get_mut(path).and_then(VecDeque::pop_front) {
            Some(Reply::Json(value)) => Ok(value),
            Some(Reply::Transport(message)) => Err(ContactError::Transport(message)),
            None => Err(ContactError::Transport(format!("no scripted reply for {}", path))),
        }
    }
}

/// Serves `router` on a free local port and returns its base URL.
pub async fn spawn_server(router: Router) -> String {
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();
    let addr = format!("127.0.0.1:{}", port);

    let acceptor = TcpListener::new(addr.clone()).bind().await;
    tokio::spawn(async move {
        Server::new(acceptor).serve(router).await;
    });

    format!("http://{}", addr)
}

pub fn odoo_config() -> OdooConfig {
    OdooConfig {
        url: "http://odoo.test".to_string(),
        database: "testdb".to_string(),
        username: "tester".to_string(),
        password: "hunter2".to_string(),
    }
}

pub fn direct_service(gateway: &ScriptedGateway) -> ContactService<ScriptedGateway> {
    ContactService::new(gateway.clone(), odoo_config(), Topology::Direct)
}

pub fn relay_service(gateway: &ScriptedGateway) -> ContactService<ScriptedGateway> {
    ContactService::new(gateway.clone(), odoo_config(), Topology::Relay)
}

pub fn auth_ok() -> Value {
    json!({"jsonrpc": "2.0", "result": {"uid": 2, "name": "Mitchell Admin"}})
}

pub fn auth_refused() -> Value {
    json!({
        "jsonrpc": "2.0",
        "error": {
            "code": 200,
            "message": "Odoo Server Error",
            "data": {"name": "odoo.exceptions.AccessDenied", "debug": "Access Denied"}
        }
    })
}
