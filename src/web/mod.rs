pub mod health;
pub mod relay;

use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use salvo::cors::{AllowOrigin, Cors};
use salvo::http::Method;
use salvo::prelude::*;
use salvo::Service;

use crate::config::Topology;
use crate::odoo::{
    ContactService, Gateway, RELAY_AUTHENTICATE_PATH, RELAY_CONTACTS_PATH, RELAY_CREATE_PATH,
};
use health::StatusHandler;
use relay::{AuthenticateHandler, ContactsHandler, CreateContactHandler};

/// What the relay reports about itself on `/status`.
#[derive(Debug, Clone)]
pub struct WebState {
    pub started_at: Instant,
    pub started_at_utc: DateTime<Utc>,
    pub service_name: String,
    pub version: String,
    pub upstream_url: String,
    pub database: String,
    pub topology: Topology,
}

impl WebState {
    pub fn for_service<G: Gateway>(service: &ContactService<G>) -> Self {
        Self {
            started_at: Instant::now(),
            started_at_utc: Utc::now(),
            service_name: crate::NAME.to_string(),
            version: crate::VERSION.to_string(),
            upstream_url: service.gateway().endpoint().to_string(),
            database: service.odoo().database.clone(),
            topology: service.topology(),
        }
    }
}

pub fn create_router(state: Arc<WebState>) -> Router {
    Router::new()
        .push(Router::with_path("/health").get(health::health_check))
        .push(Router::with_path("/status").get(StatusHandler { state }))
}

/// Routes re-exposing the three contact operations as simplified endpoints.
pub fn create_relay_router<G: Gateway + 'static>(service: Arc<ContactService<G>>) -> Router {
    let state = WebState::for_service(&service);
    Router::new()
        .push(Router::with_path(RELAY_AUTHENTICATE_PATH)
            .post(AuthenticateHandler { service: service.clone() }))
        .push(Router::with_path(RELAY_CREATE_PATH)
            .post(CreateContactHandler { service: service.clone() }))
        .push(Router::with_path(RELAY_CONTACTS_PATH)
            .get(ContactsHandler { service: service.clone() })
            .post(ContactsHandler { service }))
        .push(create_router(Arc::new(state)))
}

/// Relay router wrapped with CORS so browser front-ends on other origins can call it.
pub fn create_relay_service<G: Gateway + 'static>(service: Arc<ContactService<G>>) -> Service {
    let cors = Cors::new()
        .allow_origin(AllowOrigin::any())
        .allow_methods(vec![Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers("content-type")
        .into_handler();

    Service::new(create_relay_router(service)).hoop(cors)
}
