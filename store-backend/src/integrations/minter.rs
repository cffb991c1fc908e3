//! HTTP client for the NFT minting service.

use async_trait::async_trait;
use serde::Deserialize;

use super::{http_client, MintRequest, NftMinter};
use crate::error::{StoreError, StoreResult};

#[derive(Debug, Deserialize)]
struct MintResponse {
    #[serde(alias = "mintAddress")]
    mint_address: Option<String>,
    error: Option<String>,
}

pub struct HttpMinter {
    endpoint: Option<String>,
    client: reqwest::Client,
}

impl HttpMinter {
    /// `None` leaves minting disabled; every mint then fails as unavailable.
    pub fn new(endpoint: Option<&str>) -> Self {
        Self {
            endpoint: endpoint.map(|e| e.trim_end_matches('/').to_string()),
            client: http_client(),
        }
    }
}

#[async_trait]
impl NftMinter for HttpMinter {
    async fn mint(&self, request: &MintRequest) -> StoreResult<String> {
        let endpoint = self
            .endpoint
            .as_deref()
            .ok_or_else(|| StoreError::Unavailable("NFT minting service is not configured".to_string()))?;

        log::info!("[Mint] Minting '{}' for {} on {}", request.name, request.owner, request.chain);

        let resp = self
            .client
            .post(format!("{}/mint", endpoint))
            .json(request)
            .send()
            .await
            .map_err(|e| StoreError::Upstream(format!("Minting service unavailable: {}", e)))?;

        let status = resp.status();
        let body: MintResponse = resp
            .json()
            .await
            .map_err(|e| StoreError::Upstream(format!("Invalid response from minting service: {}", e)))?;

        if !status.is_success() {
            return Err(StoreError::Upstream(format!(
                "Minting failed ({}): {}",
                status,
                body.error.unwrap_or_else(|| "Unknown error".to_string())
            )));
        }

        body.mint_address.ok_or_else(|| {
            StoreError::Upstream(
                body.error
                    .unwrap_or_else(|| "Minting service returned no mint address".to_string()),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn accepts_camel_case_mint_address() {
        let resp: MintResponse = serde_json::from_value(json!({ "mintAddress": "Mint1" })).unwrap();
        assert_eq!(resp.mint_address.as_deref(), Some("Mint1"));
    }

    #[tokio::test]
    async fn unconfigured_minter_is_unavailable() {
        let minter = HttpMinter::new(None);
        let request = MintRequest {
            name: "A".into(),
            description: String::new(),
            symbol: "AGENT".into(),
            owner: "owner".into(),
            chain: "solana".into(),
            metadata: json!({}),
        };
        assert!(matches!(minter.mint(&request).await, Err(StoreError::Unavailable(_))));
    }
}
