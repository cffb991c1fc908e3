//! Capability gating and live-data dispatch for catalog agents.

use serde_json::{json, Value};
use std::str::FromStr;
use strum::EnumString;

use super::catalog::owns_prebuilt;
use crate::address::normalize_wallet;
use crate::db::Database;
use crate::error::{StoreError, StoreResult};
use crate::integrations::{ChainDataProvider, ChatClient};
use crate::models::{Capability, InteractionType, PrebuiltAgent};
use agent_store_types::{CapabilityResponse, ChatMessage};

/// Decide access to a capability from its metadata and the caller's ownership.
pub fn check_access(capability: &Capability, owned: bool) -> StoreResult<()> {
    if capability.requires_minting && !owned {
        Err(StoreError::forbidden(format!(
            "Capability '{}' requires minting this agent",
            capability.name
        )))
    } else {
        Ok(())
    }
}

/// Look a capability up by id or display name, ignoring case
pub fn find_capability<'a>(agent: &'a PrebuiltAgent, name: &str) -> Option<&'a Capability> {
    let name = name.trim();
    agent
        .capabilities
        .iter()
        .find(|c| c.id.eq_ignore_ascii_case(name) || c.name.eq_ignore_ascii_case(name))
}

/// Live-data handler a capability id resolves to
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum LiveData {
    #[strum(serialize = "wallet_analysis", serialize = "portfolio_tracking", serialize = "wallet_analytics")]
    WalletAnalytics,
    #[strum(serialize = "token_analysis", serialize = "token_info", serialize = "price_alerts")]
    TokenInfo,
    #[strum(
        serialize = "ai_chat",
        serialize = "market_insights",
        serialize = "trading_signals",
        serialize = "sentiment_analysis"
    )]
    Completion,
}

fn param_str<'a>(params: &'a Value, keys: &[&str]) -> Option<&'a str> {
    keys.iter()
        .find_map(|k| params.get(*k).and_then(Value::as_str))
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

fn persona(agent: &PrebuiltAgent, capability: &Capability) -> String {
    format!(
        "You are {}, a {} agent on a crypto agent marketplace. {} \
         You are answering through your '{}' capability: {} Keep answers concise and never give financial guarantees.",
        agent.name, agent.category, agent.description, capability.name, capability.description
    )
}

/// The collaborators live-data handlers call out to
pub struct LiveDataSources<'a> {
    pub chain_data: &'a dyn ChainDataProvider,
    pub chat: &'a dyn ChatClient,
}

async fn fetch_live_data(
    sources: &LiveDataSources<'_>,
    agent: &PrebuiltAgent,
    capability: &Capability,
    params: &Value,
    wallet: Option<&str>,
) -> StoreResult<Value> {
    let handler = LiveData::from_str(&capability.id).map_err(|_| {
        StoreError::bad_request(format!(
            "Capability '{}' has no live data handler",
            capability.id
        ))
    })?;

    let default_chain = agent
        .chain_compatibility
        .first()
        .map(String::as_str)
        .unwrap_or("solana");
    let chain = param_str(params, &["chain"]).unwrap_or(default_chain);

    match handler {
        LiveData::WalletAnalytics => {
            let address = param_str(params, &["address", "wallet"])
                .or(wallet)
                .ok_or_else(|| StoreError::bad_request("A wallet address is required"))?;
            let address = normalize_wallet(address)?;
            let analytics = sources.chain_data.wallet_analytics(&address, chain).await?;
            Ok(serde_json::to_value(analytics).unwrap_or(Value::Null))
        }
        LiveData::TokenInfo => {
            let token = param_str(params, &["token_address", "tokenAddress", "address"])
                .ok_or_else(|| StoreError::bad_request("A token address is required"))?;
            // Token mints and contracts share the wallet address formats
            let token = normalize_wallet(token)?;
            let info = sources.chain_data.token_info(&token, chain).await?;
            Ok(serde_json::to_value(info).unwrap_or(Value::Null))
        }
        LiveData::Completion => {
            let prompt = param_str(params, &["prompt", "message", "query"])
                .unwrap_or("Give a short overview of current conditions in your specialty.");
            let messages = [
                ChatMessage {
                    role: "system".to_string(),
                    content: persona(agent, capability),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: prompt.to_string(),
                },
            ];
            let reply = sources.chat.complete(&messages).await?;
            Ok(json!({ "reply": reply.content }))
        }
    }
}

/// Invoke a named capability of a catalog agent on behalf of an optional wallet.
///
/// Missing agent or capability is `NotFound`; a gated capability without
/// ownership is `Forbidden`. Successful calls by a known wallet are recorded.
pub async fn invoke_capability(
    db: &Database,
    sources: &LiveDataSources<'_>,
    agent_id: &str,
    capability_name: &str,
    params: &Value,
    wallet: Option<&str>,
) -> StoreResult<CapabilityResponse> {
    let agent = db
        .get_prebuilt_agent(agent_id)?
        .ok_or_else(|| StoreError::not_found(format!("Agent {} not found", agent_id)))?;

    let capability = find_capability(&agent, capability_name).ok_or_else(|| {
        StoreError::not_found(format!("Capability '{}' not found", capability_name))
    })?;

    check_access(capability, owns_prebuilt(&agent, wallet))?;

    let data = fetch_live_data(sources, &agent, capability, params, wallet).await?;
    log::info!("[Capability] {} served '{}'", agent_id, capability.id);

    if let Some(wallet) = wallet {
        let event = json!({ "capability": capability.id });
        if let Err(e) = db.record_interaction(agent_id, wallet, InteractionType::UseFeature, &event) {
            log::warn!("[Capability] Failed to record use of {} on {}: {}", capability.id, agent_id, e);
        }
    }

    Ok(CapabilityResponse {
        agent_id: agent_id.to_string(),
        capability: capability.id.clone(),
        data,
    })
}
