use actix_web::{web, HttpResponse, Responder};

use crate::AppState;
use agent_store_types::ApiResponse;

/// Version from Cargo.toml, available at compile time
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/api/health").route(web::get().to(health_check)));
    cfg.service(web::resource("/api/version").route(web::get().to(get_version)));
}

async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let database_ok = match state.db.count_prebuilt_agents() {
        Ok(_) => true,
        Err(e) => {
            log::error!("Health check database probe failed: {}", e);
            false
        }
    };

    HttpResponse::Ok().json(ApiResponse::ok(serde_json::json!({
        "status": if database_ok { "ok" } else { "degraded" },
        "version": VERSION,
        "database": database_ok,
        "chain_data_configured": state.config.moralis_api_key.is_some(),
        "chat_configured": state.config.openai_api_key.is_some(),
        "minter_configured": state.config.mint_service_url.is_some(),
    })))
}

async fn get_version() -> impl Responder {
    HttpResponse::Ok().json(ApiResponse::ok(serde_json::json!({
        "version": VERSION
    })))
}
