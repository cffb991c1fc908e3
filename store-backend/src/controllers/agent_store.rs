use actix_web::{web, HttpResponse};

use crate::address::normalize_optional_wallet;
use crate::error::StoreResult;
use crate::marketplace::catalog;
use crate::models::CatalogFilter;
use crate::AppState;
use agent_store_types::ApiResponse;

/// Unified store listing: catalog entries plus visible personal NFT agents.
async fn list_store(
    state: web::Data<AppState>,
    query: web::Query<CatalogFilter>,
) -> StoreResult<HttpResponse> {
    let filter = query.into_inner();
    let wallet = normalize_optional_wallet(filter.wallet.as_deref())?;

    let listings = catalog::list_store(&state.db, &filter, wallet.as_deref())?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(listings)))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/api/agent-store").route(web::get().to(list_store)));
}
