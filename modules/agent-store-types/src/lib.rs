//! Shared types for the agent store API and its clients.

use serde::{Deserialize, Serialize};
use serde_json::Value;

// =====================================================
// Domain Types
// =====================================================

/// Lifecycle status of a personal agent's NFT mint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentStatus {
    Pending,
    Active,
    Failed,
}

impl AgentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AgentStatus::Pending => "pending",
            AgentStatus::Active => "active",
            AgentStatus::Failed => "failed",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(AgentStatus::Pending),
            "active" => Some(AgentStatus::Active),
            "failed" => Some(AgentStatus::Failed),
            _ => None,
        }
    }
}

/// A user-created agent owned by a creator wallet
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agent {
    pub id: String,
    pub name: String,
    pub description: String,
    pub creator_wallet_address: String,
    pub chain: String,
    pub agent_type: String,
    pub is_public: bool,
    pub is_nft: bool,
    pub nft_mint_address: Option<String>,
    pub status: AgentStatus,
    pub metadata: Value,
    pub created_at: String,
    pub updated_at: String,
}

/// A named feature of a catalog agent, free or gated behind minting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Capability {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(rename = "requiresMinting")]
    pub requires_minting: bool,
}

/// A catalog (prebuilt) agent row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrebuiltAgent {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: String,
    pub chain_compatibility: Vec<String>,
    pub features: Vec<String>,
    pub capabilities: Vec<Capability>,
    pub price: f64,
    pub is_minted: bool,
    pub owner_wallet: Option<String>,
    pub mint_date: Option<String>,
    pub creator_wallet: Option<String>,
    pub original_agent_id: Option<String>,
    pub image_url: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionType {
    View,
    Mint,
    UseFeature,
}

impl InteractionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InteractionType::View => "view",
            InteractionType::Mint => "mint",
            InteractionType::UseFeature => "use_feature",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "view" => Some(InteractionType::View),
            "mint" => Some(InteractionType::Mint),
            "use_feature" => Some(InteractionType::UseFeature),
            _ => None,
        }
    }
}

/// Append-only usage event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Interaction {
    pub id: i64,
    pub agent_id: String,
    pub wallet_address: String,
    pub interaction_type: InteractionType,
    pub data: Value,
    pub created_at: String,
}

/// Usage counters for an agent
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AgentStats {
    pub agent_id: String,
    pub views: i64,
    pub mints: i64,
    pub feature_uses: i64,
    pub last_interaction_at: Option<String>,
}

/// Where a store listing came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingSource {
    Prebuilt,
    Personal,
}

/// The single shape both catalog and personal agents are normalized into
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreListing {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: String,
    pub chain_compatibility: Vec<String>,
    pub features: Vec<String>,
    pub capabilities: Vec<Capability>,
    pub price: f64,
    pub creator_wallet: Option<String>,
    pub owner_wallet: Option<String>,
    pub mint_date: Option<String>,
    pub nft_mint_address: Option<String>,
    pub original_agent_id: Option<String>,
    pub image_url: Option<String>,
    pub source: ListingSource,
    pub is_owned: bool,
    pub is_minted: bool,
    pub created_at: String,
}

/// A tool service agents can integrate with
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct McpService {
    pub id: String,
    pub name: String,
    pub description: String,
    pub endpoint: String,
    pub category: String,
    pub enabled: bool,
    /// Set when listing for a specific agent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub integrated: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenBalance {
    pub token_address: String,
    pub symbol: Option<String>,
    pub name: Option<String>,
    pub decimals: Option<u32>,
    pub balance: String,
    pub usd_value: Option<f64>,
}

/// Wallet summary assembled from the blockchain-data provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletAnalytics {
    pub address: String,
    pub chain: String,
    pub native_balance: String,
    pub tokens: Vec<TokenBalance>,
    pub token_count: usize,
    pub nft_count: usize,
    pub total_usd_value: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenInfo {
    pub address: String,
    pub chain: String,
    pub name: Option<String>,
    pub symbol: Option<String>,
    pub decimals: Option<u32>,
    pub usd_price: Option<f64>,
    pub logo: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

// =====================================================
// Request Types
// =====================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateAgentRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub creator_wallet_address: String,
    pub chain: Option<String>,
    pub agent_type: Option<String>,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default)]
    pub is_nft: bool,
    pub metadata: Option<Value>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeployAgentRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub creator_wallet_address: String,
    pub chain: Option<String>,
    pub agent_type: Option<String>,
    #[serde(default)]
    pub is_public: bool,
    /// Mint address when the NFT was already minted by the browser wallet
    pub nft_mint_address: Option<String>,
    pub metadata: Option<Value>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: AgentStatus,
    pub nft_mint_address: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeployToStoreRequest {
    #[serde(alias = "agentId")]
    pub agent_id: String,
    #[serde(alias = "walletAddress")]
    pub wallet_address: String,
    pub price: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreatePrebuiltAgentRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub category: Option<String>,
    #[serde(default)]
    pub chain_compatibility: Vec<String>,
    #[serde(default)]
    pub features: Vec<String>,
    pub capabilities: Option<Vec<Capability>>,
    pub price: Option<f64>,
    pub image_url: Option<String>,
}

/// Body of `POST /api/prebuilt-agents/{id}`
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum PrebuiltAgentAction {
    Mint {
        #[serde(alias = "walletAddress")]
        wallet_address: String,
    },
    Interact {
        #[serde(alias = "walletAddress")]
        wallet_address: String,
        interaction_type: InteractionType,
        #[serde(default)]
        data: Value,
    },
}

/// Body of `POST /api/prebuilt-agents/{id}/data`
#[derive(Debug, Serialize, Deserialize)]
pub struct CapabilityRequest {
    pub capability: String,
    #[serde(default)]
    pub params: Value,
    #[serde(alias = "walletAddress")]
    pub wallet_address: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
    #[serde(alias = "agentId")]
    pub agent_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ToolIntegrationRequest {
    pub agent_id: String,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

fn default_true() -> bool {
    true
}

// =====================================================
// Response Types
// =====================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(msg.into()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: i64,
    pub total_pages: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AgentPage {
    pub agents: Vec<Agent>,
    pub pagination: Pagination,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AgentDetail {
    pub agent: Agent,
    pub stats: AgentStats,
}

/// Result of `POST /api/agent/deploy`
#[derive(Debug, Serialize, Deserialize)]
pub struct DeployAgentResponse {
    pub agent: Agent,
    pub mint_address: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CapabilityResponse {
    pub agent_id: String,
    pub capability: String,
    pub data: Value,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub message: ChatMessage,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_omits_empty_fields() {
        let ok = serde_json::to_value(ApiResponse::ok(3)).unwrap();
        assert_eq!(ok, serde_json::json!({ "success": true, "data": 3 }));

        let err = serde_json::to_value(ApiResponse::<()>::err("nope")).unwrap();
        assert_eq!(err, serde_json::json!({ "success": false, "error": "nope" }));
    }

    #[test]
    fn capability_uses_camel_case_gate_flag() {
        let cap: Capability = serde_json::from_value(serde_json::json!({
            "id": "wallet_analysis",
            "name": "Wallet Analysis",
            "description": "Deep wallet breakdown",
            "requiresMinting": true
        }))
        .unwrap();
        assert!(cap.requires_minting);
    }

    #[test]
    fn prebuilt_action_is_tagged_by_action() {
        let action: PrebuiltAgentAction = serde_json::from_value(serde_json::json!({
            "action": "interact",
            "walletAddress": "0xabc",
            "interaction_type": "use_feature"
        }))
        .unwrap();
        match action {
            PrebuiltAgentAction::Interact { wallet_address, interaction_type, data } => {
                assert_eq!(wallet_address, "0xabc");
                assert_eq!(interaction_type, InteractionType::UseFeature);
                assert!(data.is_null());
            }
            other => panic!("unexpected action: {:?}", other),
        }
    }

    #[test]
    fn status_parsing_is_case_insensitive() {
        assert_eq!(AgentStatus::from_str("ACTIVE"), Some(AgentStatus::Active));
        assert_eq!(AgentStatus::from_str("minted"), None);
    }
}
