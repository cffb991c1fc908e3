//! Tool (MCP) service catalog and per-agent integration toggles.

use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::error::{StoreError, StoreResult};
use crate::AppState;
use agent_store_types::{ApiResponse, ToolIntegrationRequest};

#[derive(Debug, Deserialize)]
struct ToolsQuery {
    #[serde(alias = "agentId")]
    agent_id: Option<String>,
}

fn agent_exists(state: &AppState, agent_id: &str) -> StoreResult<bool> {
    Ok(state.db.get_prebuilt_agent(agent_id)?.is_some() || state.db.get_agent(agent_id)?.is_some())
}

async fn list_tools(
    state: web::Data<AppState>,
    query: web::Query<ToolsQuery>,
) -> StoreResult<HttpResponse> {
    let agent_id = query.agent_id.as_deref().filter(|id| !id.trim().is_empty());
    let services = state.db.list_mcp_services(agent_id)?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(services)))
}

async fn set_integration(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<ToolIntegrationRequest>,
) -> StoreResult<HttpResponse> {
    let service_id = path.into_inner();
    let req = body.into_inner();

    if !agent_exists(&state, &req.agent_id)? {
        return Err(StoreError::not_found(format!("Agent {} not found", req.agent_id)));
    }
    if !state.db.set_service_integration(&req.agent_id, &service_id, req.enabled)? {
        return Err(StoreError::not_found(format!("Tool {} not found", service_id)));
    }
    log::info!(
        "Tool {} {} for agent {}",
        service_id,
        if req.enabled { "enabled" } else { "disabled" },
        req.agent_id
    );

    let services = state.db.list_mcp_services(Some(&req.agent_id))?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(services)))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/tools")
            .route("", web::get().to(list_tools))
            .route("/{id}/integrations", web::post().to(set_integration)),
    );
}
