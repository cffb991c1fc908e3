use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::address::{classify_wallet, normalize_wallet, WalletKind};
use crate::error::{StoreError, StoreResult};
use crate::AppState;
use agent_store_types::ApiResponse;

#[derive(Debug, Deserialize)]
struct ChainQuery {
    chain: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TokenQuery {
    #[serde(alias = "token_address", alias = "tokenAddress")]
    address: Option<String>,
    chain: Option<String>,
}

/// Explicit chain, or the chain family the address belongs to
fn resolve_chain(chain: Option<&str>, address: &str) -> String {
    match chain.map(str::trim).filter(|c| !c.is_empty()) {
        Some(c) => c.to_lowercase(),
        None => match classify_wallet(address) {
            Some(WalletKind::Evm) => "ethereum".to_string(),
            _ => "solana".to_string(),
        },
    }
}

async fn wallet_analytics(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<ChainQuery>,
) -> StoreResult<HttpResponse> {
    let address = normalize_wallet(&path)?;
    let chain = resolve_chain(query.chain.as_deref(), &address);

    let analytics = state.chain_data.wallet_analytics(&address, &chain).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(analytics)))
}

async fn token_info(
    state: web::Data<AppState>,
    query: web::Query<TokenQuery>,
) -> StoreResult<HttpResponse> {
    let address = query
        .address
        .as_deref()
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .ok_or_else(|| StoreError::bad_request("A token address is required"))?;
    // Token mints and contracts share the wallet address formats
    let address = normalize_wallet(address)?;
    let chain = resolve_chain(query.chain.as_deref(), &address);

    let info = state.chain_data.token_info(&address, &chain).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(info)))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/api/wallet/{address}/analytics").route(web::get().to(wallet_analytics)),
    );
    cfg.service(web::resource("/api/token-info").route(web::get().to(token_info)));
}
