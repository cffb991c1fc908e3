//! Catalog reads: normalizes catalog and personal agents into one listing shape
//! with per-viewer ownership flags.

use chrono::Utc;
use serde_json::Value;

use super::templates::{default_capabilities, deploy_features};
use super::deploy::catalog_id;
use crate::db::Database;
use crate::error::{is_constraint_violation, StoreError, StoreResult};
use crate::models::{Agent, AgentStatus, CatalogFilter, InteractionType, PrebuiltAgent, StoreListing};
use agent_store_types::{CreatePrebuiltAgentRequest, ListingSource};

/// Whether `wallet` owns a catalog entry: the minting wallet, or the creator of a
/// deployed entry.
pub fn owns_prebuilt(agent: &PrebuiltAgent, wallet: Option<&str>) -> bool {
    let Some(wallet) = wallet else {
        return false;
    };
    let is_owner = agent.owner_wallet.as_deref() == Some(wallet);
    let is_creator =
        agent.original_agent_id.is_some() && agent.creator_wallet.as_deref() == Some(wallet);
    is_owner || is_creator
}

pub fn prebuilt_listing(agent: PrebuiltAgent, wallet: Option<&str>) -> StoreListing {
    let owned = owns_prebuilt(&agent, wallet);
    StoreListing {
        id: agent.id,
        name: agent.name,
        description: agent.description,
        category: agent.category,
        chain_compatibility: agent.chain_compatibility,
        features: agent.features,
        capabilities: agent.capabilities,
        price: agent.price,
        creator_wallet: agent.creator_wallet,
        owner_wallet: agent.owner_wallet,
        mint_date: agent.mint_date,
        nft_mint_address: None,
        original_agent_id: agent.original_agent_id,
        image_url: agent.image_url,
        source: ListingSource::Prebuilt,
        is_owned: owned,
        is_minted: owned,
        created_at: agent.created_at,
    }
}

fn string_list(value: &Value) -> Option<Vec<String>> {
    value.as_array().map(|items| {
        items
            .iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect()
    })
}

pub fn personal_listing(agent: Agent, wallet: Option<&str>) -> StoreListing {
    let owned = wallet == Some(agent.creator_wallet_address.as_str());
    let features = string_list(&agent.metadata["features"]).unwrap_or_else(deploy_features);
    let image_url = agent.metadata["image_url"].as_str().map(str::to_string);
    StoreListing {
        id: agent.id,
        name: agent.name,
        description: agent.description,
        category: agent.agent_type,
        chain_compatibility: vec![agent.chain],
        features,
        capabilities: default_capabilities(),
        price: 0.0,
        creator_wallet: Some(agent.creator_wallet_address.clone()),
        owner_wallet: Some(agent.creator_wallet_address),
        mint_date: None,
        nft_mint_address: agent.nft_mint_address,
        original_agent_id: None,
        image_url,
        source: ListingSource::Personal,
        is_owned: owned,
        is_minted: owned && agent.status == AgentStatus::Active,
        created_at: agent.created_at,
    }
}

fn matches_filter(filter: &CatalogFilter, listing: &StoreListing) -> bool {
    filter.matches_category(&listing.category)
        && filter.matches_chain(&listing.chain_compatibility)
        && filter.matches_search(&listing.name, &listing.description)
}

/// Catalog entries only.
pub fn list_prebuilt(db: &Database, filter: &CatalogFilter, wallet: Option<&str>) -> StoreResult<Vec<StoreListing>> {
    let listings = db
        .list_prebuilt_agents(filter.category.as_deref())?
        .into_iter()
        .map(|a| prebuilt_listing(a, wallet))
        .filter(|l| matches_filter(filter, l))
        .collect();
    Ok(listings)
}

/// The full store: catalog entries plus visible NFT personal agents, minus
/// personal agents that already have a deployed catalog counterpart.
pub fn list_store(db: &Database, filter: &CatalogFilter, wallet: Option<&str>) -> StoreResult<Vec<StoreListing>> {
    let mut listings = list_prebuilt(db, filter, wallet)?;

    let deployed = db.deployed_agent_ids()?;
    let personal = db
        .list_visible_nft_agents(wallet)?
        .into_iter()
        .filter(|a| !deployed.contains(&a.id))
        .map(|a| personal_listing(a, wallet))
        .filter(|l| matches_filter(filter, l));
    listings.extend(personal);

    Ok(listings)
}

/// Catalog entry for a viewer. A known viewer is recorded as a `view`.
pub fn get_prebuilt(db: &Database, id: &str, wallet: Option<&str>) -> StoreResult<StoreListing> {
    let agent = db
        .get_prebuilt_agent(id)?
        .ok_or_else(|| StoreError::not_found(format!("Agent {} not found", id)))?;

    if let Some(wallet) = wallet {
        // Stats are best effort
        if let Err(e) = db.record_interaction(id, wallet, InteractionType::View, &Value::Null) {
            log::warn!("Failed to record view of {}: {}", id, e);
        }
    }

    Ok(prebuilt_listing(agent, wallet))
}

/// Add a catalog entry directly (not via deploy-to-store).
pub fn create_prebuilt(db: &Database, req: CreatePrebuiltAgentRequest) -> StoreResult<PrebuiltAgent> {
    let name = req.name.trim();
    if name.is_empty() {
        return Err(StoreError::bad_request("Agent name is required"));
    }
    if matches!(req.price, Some(p) if p < 0.0 || !p.is_finite()) {
        return Err(StoreError::bad_request("Price must be a non-negative number"));
    }

    let now = Utc::now();
    let timestamp = now.to_rfc3339();
    let agent = PrebuiltAgent {
        id: catalog_id(name, now.timestamp_millis()),
        name: name.to_string(),
        description: req.description,
        category: req.category.unwrap_or_else(|| "general".to_string()),
        chain_compatibility: if req.chain_compatibility.is_empty() {
            vec!["solana".to_string()]
        } else {
            req.chain_compatibility
        },
        features: req.features,
        capabilities: req.capabilities.unwrap_or_else(default_capabilities),
        price: req.price.unwrap_or(0.0),
        is_minted: false,
        owner_wallet: None,
        mint_date: None,
        creator_wallet: None,
        original_agent_id: None,
        image_url: req.image_url,
        created_at: timestamp.clone(),
        updated_at: timestamp,
    };

    match db.insert_prebuilt_agent(&agent) {
        Ok(()) => {}
        Err(StoreError::Database(e)) if is_constraint_violation(&e) => {
            return Err(StoreError::Conflict(format!("Agent id {} is already taken", agent.id)));
        }
        Err(e) => return Err(e),
    }
    log::info!("[Catalog] Added prebuilt agent {}", agent.id);
    Ok(agent)
}
