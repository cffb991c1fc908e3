//! Catalog entries: browse, create, mint, record interactions and invoke capabilities.

use actix_web::{web, HttpResponse};

use crate::address::{normalize_optional_wallet, normalize_wallet};
use crate::error::StoreResult;
use crate::marketplace::gate::{self, LiveDataSources};
use crate::marketplace::{catalog, mint};
use crate::models::{CatalogFilter, InteractionType};
use crate::AppState;
use agent_store_types::{
    ApiResponse, CapabilityRequest, CreatePrebuiltAgentRequest, PrebuiltAgentAction,
};

#[derive(Debug, serde::Deserialize)]
struct ViewerQuery {
    #[serde(alias = "walletAddress", alias = "wallet_address")]
    wallet: Option<String>,
}

async fn list_prebuilt(
    state: web::Data<AppState>,
    query: web::Query<CatalogFilter>,
) -> StoreResult<HttpResponse> {
    let filter = query.into_inner();
    let wallet = normalize_optional_wallet(filter.wallet.as_deref())?;

    let listings = catalog::list_prebuilt(&state.db, &filter, wallet.as_deref())?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(listings)))
}

async fn create_prebuilt(
    state: web::Data<AppState>,
    body: web::Json<CreatePrebuiltAgentRequest>,
) -> StoreResult<HttpResponse> {
    let agent = catalog::create_prebuilt(&state.db, body.into_inner())?;
    Ok(HttpResponse::Created().json(ApiResponse::ok(agent)))
}

async fn get_prebuilt(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<ViewerQuery>,
) -> StoreResult<HttpResponse> {
    let wallet = normalize_optional_wallet(query.wallet.as_deref())?;
    let listing = catalog::get_prebuilt(&state.db, &path, wallet.as_deref())?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(listing)))
}

/// `POST /api/prebuilt-agents/{id}` with `{"action": "mint" | "interact", ...}`
async fn prebuilt_action(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<PrebuiltAgentAction>,
) -> StoreResult<HttpResponse> {
    let id = path.into_inner();

    match body.into_inner() {
        PrebuiltAgentAction::Mint { wallet_address }
        | PrebuiltAgentAction::Interact {
            wallet_address,
            interaction_type: InteractionType::Mint,
            ..
        } => {
            let wallet = normalize_wallet(&wallet_address)?;
            let listing = mint::mint_prebuilt(&state.db, &id, &wallet)?;
            Ok(HttpResponse::Ok().json(ApiResponse::ok(listing)))
        }
        PrebuiltAgentAction::Interact {
            wallet_address,
            interaction_type,
            data,
        } => {
            let wallet = normalize_wallet(&wallet_address)?;
            let event = mint::record_interaction(&state.db, &id, &wallet, interaction_type, &data)?;
            Ok(HttpResponse::Ok().json(ApiResponse::ok(event)))
        }
    }
}

async fn invoke_capability(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<CapabilityRequest>,
) -> StoreResult<HttpResponse> {
    let id = path.into_inner();
    let req = body.into_inner();
    let wallet = normalize_optional_wallet(req.wallet_address.as_deref())?;

    let sources = LiveDataSources {
        chain_data: state.chain_data.as_ref(),
        chat: state.chat.as_ref(),
    };
    let response = gate::invoke_capability(
        &state.db,
        &sources,
        &id,
        &req.capability,
        &req.params,
        wallet.as_deref(),
    )
    .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(response)))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/prebuilt-agents")
            .route("", web::get().to(list_prebuilt))
            .route("", web::post().to(create_prebuilt))
            .route("/{id}", web::get().to(get_prebuilt))
            .route("/{id}", web::post().to(prebuilt_action))
            .route("/{id}/data", web::post().to(invoke_capability)),
    );
}
