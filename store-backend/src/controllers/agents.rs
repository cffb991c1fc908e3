//! Personal agents: create, list, inspect, deploy (mint) and deploy-to-store.

use actix_web::{web, HttpResponse};

use crate::address::{normalize_optional_wallet, normalize_wallet};
use crate::error::{StoreError, StoreResult};
use crate::marketplace::deploy;
use crate::models::{AgentListQuery, InteractionType, NewAgent};
use crate::AppState;
use agent_store_types::{
    AgentDetail, AgentPage, ApiResponse, CreateAgentRequest, DeployAgentRequest,
    DeployToStoreRequest, Pagination, UpdateStatusRequest,
};

async fn list_agents(
    state: web::Data<AppState>,
    query: web::Query<AgentListQuery>,
) -> StoreResult<HttpResponse> {
    let mut query = query.into_inner();
    query.creator_wallet = normalize_optional_wallet(query.creator_wallet.as_deref())?;

    let (agents, total) = state.db.list_agents(&query)?;
    let limit = query.limit();
    let pagination = Pagination {
        page: query.page(),
        limit,
        total,
        total_pages: (total + limit as i64 - 1) / limit as i64,
    };

    Ok(HttpResponse::Ok().json(ApiResponse::ok(AgentPage { agents, pagination })))
}

async fn create_agent(
    state: web::Data<AppState>,
    body: web::Json<CreateAgentRequest>,
) -> StoreResult<HttpResponse> {
    let mut req = body.into_inner();
    if req.name.trim().is_empty() {
        return Err(StoreError::bad_request("Agent name is required"));
    }
    req.name = req.name.trim().to_string();
    req.creator_wallet_address = normalize_wallet(&req.creator_wallet_address)?;

    let agent = state.db.create_agent(&NewAgent::from(req))?;
    log::info!("Created agent {} for {}", agent.id, agent.creator_wallet_address);
    Ok(HttpResponse::Created().json(ApiResponse::ok(agent)))
}

async fn get_agent(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> StoreResult<HttpResponse> {
    let id = path.into_inner();
    let agent = state
        .db
        .get_agent(&id)?
        .ok_or_else(|| StoreError::not_found(format!("Agent {} not found", id)))?;
    let stats = state.db.get_agent_stats(&id)?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(AgentDetail { agent, stats })))
}

#[derive(Debug, serde::Deserialize)]
struct InteractionsQuery {
    #[serde(rename = "type")]
    interaction_type: Option<String>,
    limit: Option<u32>,
}

/// Recent interactions for a catalog or personal agent id, newest first
async fn list_interactions(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<InteractionsQuery>,
) -> StoreResult<HttpResponse> {
    let interaction_type = match query.interaction_type.as_deref() {
        None | Some("") | Some("all") => None,
        Some(raw) => Some(InteractionType::from_str(raw).ok_or_else(|| {
            StoreError::bad_request(format!("Unknown interaction type: {}", raw))
        })?),
    };
    let limit = query.limit.unwrap_or(50).clamp(1, 200);

    let interactions = state.db.list_interactions(&path, interaction_type, limit)?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(interactions)))
}

async fn deploy_agent(
    state: web::Data<AppState>,
    body: web::Json<DeployAgentRequest>,
) -> StoreResult<HttpResponse> {
    let mut req = body.into_inner();
    req.creator_wallet_address = normalize_wallet(&req.creator_wallet_address)?;

    let response = deploy::deploy_agent(&state.db, state.minter.as_ref(), req).await?;
    Ok(HttpResponse::Created().json(ApiResponse::ok(response)))
}

async fn update_status(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<UpdateStatusRequest>,
) -> StoreResult<HttpResponse> {
    let id = path.into_inner();
    deploy::update_agent_status(&state.db, &id, &body)?;

    let agent = state
        .db
        .get_agent(&id)?
        .ok_or_else(|| StoreError::not_found(format!("Agent {} not found", id)))?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(agent)))
}

async fn deploy_to_store(
    state: web::Data<AppState>,
    body: web::Json<DeployToStoreRequest>,
) -> StoreResult<HttpResponse> {
    let mut req = body.into_inner();
    req.wallet_address = normalize_wallet(&req.wallet_address)?;

    let entry = deploy::deploy_to_store(&state.db, &req)?;
    Ok(HttpResponse::Created().json(ApiResponse::ok(entry)))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/api/agents")
            .route(web::get().to(list_agents))
            .route(web::post().to(create_agent)),
    );
    // Fixed paths before the `{id}` patterns
    cfg.service(web::resource("/api/agent/deploy").route(web::post().to(deploy_agent)));
    cfg.service(web::resource("/api/agent/deploy-to-store").route(web::post().to(deploy_to_store)));
    cfg.service(web::resource("/api/agent/{id}").route(web::get().to(get_agent)));
    cfg.service(web::resource("/api/agent/{id}/status").route(web::post().to(update_status)));
    cfg.service(
        web::resource("/api/agent/{id}/interactions").route(web::get().to(list_interactions)),
    );
}
