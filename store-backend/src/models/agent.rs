use serde::Deserialize;
use serde_json::Value;
use std::str::FromStr;
use strum::{AsRefStr, EnumString};

use agent_store_types::{CreateAgentRequest, DeployAgentRequest};

pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 100;

/// Fields needed to insert a personal agent row
#[derive(Debug, Clone)]
pub struct NewAgent {
    pub name: String,
    pub description: String,
    pub creator_wallet_address: String,
    pub chain: String,
    pub agent_type: String,
    pub is_public: bool,
    pub is_nft: bool,
    pub metadata: Value,
}

impl From<CreateAgentRequest> for NewAgent {
    fn from(req: CreateAgentRequest) -> Self {
        Self {
            name: req.name,
            description: req.description,
            creator_wallet_address: req.creator_wallet_address,
            chain: req.chain.unwrap_or_else(|| "solana".to_string()),
            agent_type: req.agent_type.unwrap_or_else(|| "general".to_string()),
            is_public: req.is_public,
            is_nft: req.is_nft,
            metadata: req.metadata.unwrap_or_else(|| Value::Object(Default::default())),
        }
    }
}

impl From<&DeployAgentRequest> for NewAgent {
    /// Deployed agents are always NFT-backed
    fn from(req: &DeployAgentRequest) -> Self {
        Self {
            name: req.name.clone(),
            description: req.description.clone(),
            creator_wallet_address: req.creator_wallet_address.clone(),
            chain: req.chain.clone().unwrap_or_else(|| "solana".to_string()),
            agent_type: req.agent_type.clone().unwrap_or_else(|| "general".to_string()),
            is_public: req.is_public,
            is_nft: true,
            metadata: req
                .metadata
                .clone()
                .unwrap_or_else(|| Value::Object(Default::default())),
        }
    }
}

/// Columns `GET /api/agents` may sort by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, EnumString, AsRefStr)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum SortColumn {
    #[default]
    CreatedAt,
    UpdatedAt,
    Name,
}

/// Query string of `GET /api/agents`
#[derive(Debug, Default, Deserialize)]
pub struct AgentListQuery {
    pub creator_wallet: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub sort: Option<String>,
    pub order: Option<String>,
}

impl AgentListQuery {
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn limit(&self) -> u32 {
        self.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE)
    }

    pub fn offset(&self) -> u32 {
        (self.page() - 1).saturating_mul(self.limit())
    }

    /// Unknown columns fall back to `created_at`
    pub fn sort_column(&self) -> SortColumn {
        self.sort
            .as_deref()
            .and_then(|s| SortColumn::from_str(s).ok())
            .unwrap_or_default()
    }

    pub fn descending(&self) -> bool {
        !matches!(self.order.as_deref(), Some(o) if o.eq_ignore_ascii_case("asc"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_defaults_and_clamps() {
        let q = AgentListQuery::default();
        assert_eq!((q.page(), q.limit(), q.offset()), (1, 20, 0));

        let q = AgentListQuery {
            page: Some(0),
            limit: Some(500),
            ..Default::default()
        };
        assert_eq!((q.page(), q.limit()), (1, MAX_PAGE_SIZE));

        let q = AgentListQuery {
            page: Some(3),
            limit: Some(10),
            ..Default::default()
        };
        assert_eq!(q.offset(), 20);
    }

    #[test]
    fn sort_is_allow_listed() {
        let q = AgentListQuery {
            sort: Some("name".into()),
            order: Some("ASC".into()),
            ..Default::default()
        };
        assert_eq!(q.sort_column(), SortColumn::Name);
        assert!(!q.descending());

        let q = AgentListQuery {
            sort: Some("id; DROP TABLE agents".into()),
            ..Default::default()
        };
        assert_eq!(q.sort_column().as_ref(), "created_at");
        assert!(q.descending());
    }
}
