mod gateway;
mod service;
mod types;

pub use gateway::*;
pub use service::*;
pub use types::*;

use crate::config::Config;
use crate::error::Result;

/// Builds the submission service for whichever topology the config selects.
pub fn service_from_config(config: &Config) -> Result<ContactService<HttpGateway>> {
    let gateway = HttpGateway::new(config.gateway_url())?;
    Ok(ContactService::new(gateway, config.odoo.clone(), config.gateway.mode))
}

/// The relay always talks to Odoo directly, whatever the client topology is.
pub fn upstream_service_from_config(config: &Config) -> Result<ContactService<HttpGateway>> {
    let gateway = HttpGateway::new(config.odoo.url.clone())?;
    Ok(ContactService::new(gateway, config.odoo.clone(), crate::config::Topology::Direct))
}
