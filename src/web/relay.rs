use std::sync::Arc;

use salvo::prelude::*;
use serde_json::json;
use tracing::{info, warn};

use crate::error::ContactError;
use crate::odoo::{ContactDraft, ContactService, Gateway, RpcError, RpcResponse};

pub const REQUIRED_FIELDS_MESSAGE: &str = "name and phone are required";

const ACCESS_DENIED_CODE: i64 = 100;

fn render_error(res: &mut Response, status: StatusCode, message: &str) {
    res.status_code(status);
    res.render(Json(json!({ "error": message })));
}

fn render_rpc_error(res: &mut Response, status: StatusCode, error: RpcError) {
    res.status_code(status);
    res.render(Json(RpcResponse::failure(error)));
}

/// Maps a service failure onto the response the relay client expects.
fn render_contact_error(res: &mut Response, e: &ContactError) {
    match e {
        ContactError::Transport(_) => {
            render_error(res, StatusCode::BAD_GATEWAY, &e.to_string());
        }
        ContactError::Authentication(_) => render_rpc_error(
            res,
            StatusCode::UNAUTHORIZED,
            RpcError::new(ACCESS_DENIED_CODE, e.kind(), e.to_string()),
        ),
        ContactError::Validation(_) => render_rpc_error(
            res,
            StatusCode::BAD_REQUEST,
            RpcError::new(400, e.kind(), e.to_string()),
        ),
        ContactError::CreationFailed(_) => render_rpc_error(
            res,
            StatusCode::OK,
            RpcError::new(200, e.kind(), e.to_string()),
        ),
        ContactError::Config(_) => {
            render_error(res, StatusCode::INTERNAL_SERVER_ERROR, &e.to_string());
        }
    }
}

pub struct AuthenticateHandler<G> {
    pub service: Arc<ContactService<G>>,
}

#[async_trait::async_trait]
impl<G: Gateway + 'static> Handler for AuthenticateHandler<G> {
    async fn handle(&self, _req: &mut Request, _depot: &mut Depot, res: &mut Response, _ctrl: &mut FlowCtrl) {
        match self.service.authenticate_session().await {
            Ok(Some(session)) => {
                res.render(Json(RpcResponse::success(json!({
                    "uid": session.uid,
                    "name": session.name,
                }))));
            }
            Ok(None) => render_rpc_error(
                res,
                StatusCode::OK,
                RpcError::new(ACCESS_DENIED_CODE, "AccessDenied", "Access Denied"),
            ),
            Err(e) => {
                warn!("Relay authenticate failed: {}", e);
                render_contact_error(res, &e);
            }
        }
    }
}

pub struct CreateContactHandler<G> {
    pub service: Arc<ContactService<G>>,
}

#[async_trait::async_trait]
impl<G: Gateway + 'static> Handler for CreateContactHandler<G> {
    async fn handle(&self, req: &mut Request, _depot: &mut Depot, res: &mut Response, _ctrl: &mut FlowCtrl) {
        let draft = match req.parse_json::<ContactDraft>().await {
            Ok(d) => d,
            Err(e) => {
                info!("Rejected create-contact body: {}", e);
                render_error(res, StatusCode::BAD_REQUEST, "invalid JSON body");
                return;
            }
        };

        if !draft.is_complete() {
            render_contact_error(
                res,
                &ContactError::Validation(REQUIRED_FIELDS_MESSAGE.to_string()),
            );
            return;
        }

        match self.service.create_contact(&draft).await {
            Ok(id) => {
                info!("Relay created contact {}", id);
                res.render(Json(RpcResponse::success(json!(id))));
            }
            Err(e) => {
                warn!("Relay create-contact failed: {}", e);
                render_contact_error(res, &e);
            }
        }
    }
}

pub struct ContactsHandler<G> {
    pub service: Arc<ContactService<G>>,
}

#[async_trait::async_trait]
impl<G: Gateway + 'static> Handler for ContactsHandler<G> {
    async fn handle(&self, _req: &mut Request, _depot: &mut Depot, res: &mut Response, _ctrl: &mut FlowCtrl) {
        let contacts = self.service.fetch_contacts().await;
        match serde_json::to_value(&contacts) {
            Ok(list) => res.render(Json(RpcResponse::success(list))),
            Err(e) => render_error(res, StatusCode::INTERNAL_SERVER_ERROR, &e.to_string()),
        }
    }
}
