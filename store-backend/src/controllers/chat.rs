use actix_web::{web, HttpResponse};

use crate::error::{StoreError, StoreResult};
use crate::AppState;
use agent_store_types::{ApiResponse, ChatMessage, ChatRequest, ChatResponse};

const MAX_MESSAGES: usize = 50;

/// System prompt for chatting with a specific agent, catalog or personal
fn agent_persona(state: &AppState, agent_id: &str) -> StoreResult<String> {
    if let Some(agent) = state.db.get_prebuilt_agent(agent_id)? {
        return Ok(format!(
            "You are {}, a {} agent on a crypto agent marketplace. {} Your features: {}.",
            agent.name,
            agent.category,
            agent.description,
            agent.features.join(", ")
        ));
    }
    if let Some(agent) = state.db.get_agent(agent_id)? {
        return Ok(format!(
            "You are {}, a {} agent operating on {}. {}",
            agent.name, agent.agent_type, agent.chain, agent.description
        ));
    }
    Err(StoreError::not_found(format!("Agent {} not found", agent_id)))
}

async fn chat(
    state: web::Data<AppState>,
    body: web::Json<ChatRequest>,
) -> StoreResult<HttpResponse> {
    let req = body.into_inner();
    if req.messages.is_empty() {
        return Err(StoreError::bad_request("At least one message is required"));
    }
    if req.messages.len() > MAX_MESSAGES {
        return Err(StoreError::bad_request(format!(
            "At most {} messages are allowed",
            MAX_MESSAGES
        )));
    }

    let mut messages = Vec::with_capacity(req.messages.len() + 1);
    if let Some(agent_id) = req.agent_id.as_deref().filter(|id| !id.trim().is_empty()) {
        messages.push(ChatMessage {
            role: "system".to_string(),
            content: agent_persona(&state, agent_id)?,
        });
    }
    messages.extend(req.messages);

    let message = state.chat.complete(&messages).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(ChatResponse { message })))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/api/chat").route(web::post().to(chat)));
}
