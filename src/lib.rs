pub mod config;
pub mod error;
pub mod form;
pub mod odoo;
pub mod web;

pub const NAME: &str = "odoo-contact-form";
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
