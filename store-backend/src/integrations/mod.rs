//! External collaborators: blockchain data, NFT minting and chat completions.
//!
//! Each sits behind a trait so handlers can be exercised with in-process doubles.

pub mod minter;
pub mod moralis;
pub mod openai;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

use agent_store_types::{ChatMessage, TokenInfo, WalletAnalytics};
use crate::error::StoreResult;

pub use minter::HttpMinter;
pub use moralis::MoralisClient;
pub use openai::OpenAIChatClient;

/// Timeout applied to every outbound collaborator request
pub const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

pub(crate) fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(HTTP_TIMEOUT)
        .build()
        .unwrap_or_else(|e| {
            log::warn!("Failed to build HTTP client with timeout, using defaults: {}", e);
            reqwest::Client::new()
        })
}

#[async_trait]
pub trait ChainDataProvider: Send + Sync {
    async fn wallet_analytics(&self, address: &str, chain: &str) -> StoreResult<WalletAnalytics>;

    async fn token_info(&self, token_address: &str, chain: &str) -> StoreResult<TokenInfo>;
}

/// What the minting service needs to create an agent NFT
#[derive(Debug, Clone, Serialize)]
pub struct MintRequest {
    pub name: String,
    pub description: String,
    pub symbol: String,
    pub owner: String,
    pub chain: String,
    pub metadata: Value,
}

#[async_trait]
pub trait NftMinter: Send + Sync {
    /// Mint and return the new mint address
    async fn mint(&self, request: &MintRequest) -> StoreResult<String>;
}

#[async_trait]
pub trait ChatClient: Send + Sync {
    async fn complete(&self, messages: &[ChatMessage]) -> StoreResult<ChatMessage>;
}
