//! Personal agent deployment: NFT mint of a new personal agent, and conversion of
//! a personal agent into a store catalog listing.

use chrono::Utc;
use once_cell::sync::Lazy;
use regex::Regex;

use super::templates::{default_capabilities, deploy_features};
use crate::config::defaults;
use crate::db::Database;
use crate::error::{is_constraint_violation, StoreError, StoreResult};
use crate::integrations::{MintRequest, NftMinter};
use crate::models::{AgentStatus, NewAgent, PrebuiltAgent};
use agent_store_types::{DeployAgentRequest, DeployAgentResponse, DeployToStoreRequest, UpdateStatusRequest};

static NON_SLUG_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9]+").expect("valid slug regex"));

pub fn slugify(name: &str) -> String {
    let lowered = name.to_lowercase();
    let slug = NON_SLUG_CHARS.replace_all(&lowered, "-");
    let slug = slug.trim_matches('-');
    if slug.is_empty() {
        "agent".to_string()
    } else {
        slug.to_string()
    }
}

/// Catalog id: slugified name plus a millisecond timestamp suffix.
/// Two identically named agents created in the same millisecond collide on the primary key.
pub fn catalog_id(name: &str, unix_millis: i64) -> String {
    format!("{}-{}", slugify(name), unix_millis)
}

const NFT_SYMBOL: &str = "AGENT";

/// Create a personal NFT agent and mint it.
///
/// The row is written first as `pending`. A mint address supplied by the caller
/// (minted by the browser wallet) activates it directly; otherwise the minting
/// service is called. A failed mint is recorded as `failed` on the row, which is kept.
pub async fn deploy_agent(
    db: &Database,
    minter: &dyn NftMinter,
    mut req: DeployAgentRequest,
) -> StoreResult<DeployAgentResponse> {
    req.name = req.name.trim().to_string();
    if req.name.is_empty() {
        return Err(StoreError::bad_request("Agent name is required"));
    }

    let new_agent = NewAgent::from(&req);
    let agent = db.create_agent(&new_agent)?;
    log::info!("[Deploy] Created agent {} for {}", agent.id, agent.creator_wallet_address);

    let mint_result = match req.nft_mint_address.as_deref().map(str::trim) {
        Some(address) if !address.is_empty() => Ok(address.to_string()),
        _ => {
            let request = MintRequest {
                name: agent.name.clone(),
                description: agent.description.clone(),
                symbol: NFT_SYMBOL.to_string(),
                owner: agent.creator_wallet_address.clone(),
                chain: agent.chain.clone(),
                metadata: agent.metadata.clone(),
            };
            minter.mint(&request).await
        }
    };

    match mint_result {
        Ok(mint_address) => {
            db.update_agent_status(&agent.id, AgentStatus::Active, Some(&mint_address))?;
            log::info!("[Deploy] Agent {} minted at {}", agent.id, mint_address);
            let agent = db
                .get_agent(&agent.id)?
                .ok_or_else(|| StoreError::not_found(format!("Agent {} not found", agent.id)))?;
            Ok(DeployAgentResponse {
                agent,
                mint_address: Some(mint_address),
            })
        }
        Err(mint_err) => {
            // Compensating write: keep the row, mark it failed
            if let Err(e) = db.update_agent_status(&agent.id, AgentStatus::Failed, None) {
                log::error!("[Deploy] Failed to mark agent {} as failed: {}", agent.id, e);
            }
            log::warn!("[Deploy] Mint failed for agent {}: {}", agent.id, mint_err);
            Err(mint_err)
        }
    }
}

/// Record the outcome of a mint performed outside this service.
pub fn update_agent_status(
    db: &Database,
    agent_id: &str,
    req: &UpdateStatusRequest,
) -> StoreResult<()> {
    if req.status == AgentStatus::Pending {
        return Err(StoreError::bad_request("Status can only be set to active or failed"));
    }
    let mint_address = req
        .nft_mint_address
        .as_deref()
        .map(str::trim)
        .filter(|a| !a.is_empty());

    if db.update_agent_status(agent_id, req.status, mint_address)? {
        Ok(())
    } else {
        Err(StoreError::not_found(format!("Agent {} not found", agent_id)))
    }
}

/// Convert a personal agent into a store listing.
///
/// `req.wallet_address` must already be normalized. The source agent is flipped
/// public afterwards; if that write fails the listing stays and only a warning is logged.
pub fn deploy_to_store(db: &Database, req: &DeployToStoreRequest) -> StoreResult<PrebuiltAgent> {
    let agent = db
        .get_agent(&req.agent_id)?
        .ok_or_else(|| StoreError::not_found(format!("Agent {} not found", req.agent_id)))?;

    if agent.creator_wallet_address != req.wallet_address {
        return Err(StoreError::forbidden("Only the creator can deploy this agent to the store"));
    }

    if let Some(existing) = db.find_prebuilt_by_original_agent(&agent.id)? {
        return Err(StoreError::Conflict(format!(
            "Agent already exists in the store as {}",
            existing.id
        )));
    }

    let price = match req.price {
        Some(p) if p < 0.0 || !p.is_finite() => {
            return Err(StoreError::bad_request("Price must be a non-negative number"))
        }
        Some(p) => p,
        None => defaults::DEPLOY_PRICE,
    };

    let now = Utc::now();
    let timestamp = now.to_rfc3339();
    let entry = PrebuiltAgent {
        id: catalog_id(&agent.name, now.timestamp_millis()),
        name: agent.name.clone(),
        description: agent.description.clone(),
        category: "custom".to_string(),
        chain_compatibility: vec![agent.chain.clone()],
        features: deploy_features(),
        capabilities: default_capabilities(),
        price,
        is_minted: false,
        owner_wallet: None,
        mint_date: None,
        creator_wallet: Some(req.wallet_address.clone()),
        original_agent_id: Some(agent.id.clone()),
        image_url: agent.metadata["image_url"].as_str().map(str::to_string),
        created_at: timestamp.clone(),
        updated_at: timestamp,
    };

    match db.insert_prebuilt_agent(&entry) {
        Ok(()) => {}
        // A concurrent deploy of the same agent won the race
        Err(StoreError::Database(e)) if is_constraint_violation(&e) => {
            return Err(StoreError::Conflict(
                "Agent already exists in the store".to_string(),
            ));
        }
        Err(e) => return Err(e),
    }
    log::info!("[Deploy] Agent {} listed in store as {}", agent.id, entry.id);

    match db.set_agent_public(&agent.id, true) {
        Ok(true) => {}
        Ok(false) => log::warn!("[Deploy] Source agent {} vanished before it could be made public", agent.id),
        Err(e) => log::warn!("[Deploy] Listed {} but failed to make source agent public: {}", entry.id, e),
    }

    Ok(entry)
}
