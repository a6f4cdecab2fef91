use std::sync::Arc;

use salvo::prelude::*;
use serde_json::json;

use crate::web::WebState;

#[handler]
pub async fn health_check(res: &mut Response) {
    res.render("OK");
}

pub struct StatusHandler {
    pub state: Arc<WebState>,
}

#[async_trait::async_trait]
impl Handler for StatusHandler {
    async fn handle(&self, _req: &mut Request, _depot: &mut Depot, res: &mut Response, _ctrl: &mut FlowCtrl) {
        let state = &self.state;

        let status = json!({
            "status": "running",
            "service": state.service_name,
            "version": state.version,
            "started_at": state.started_at_utc.to_rfc3339(),
            "uptime_seconds": state.started_at.elapsed().as_secs(),
            "upstream": {
                "url": state.upstream_url,
                "database": state.database,
                "mode": state.topology.as_str(),
            },
        });

        res.render(Json(status));
    }
}
