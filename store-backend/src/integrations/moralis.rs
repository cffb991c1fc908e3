//! Moralis REST client for wallet and token data.
//!
//! EVM chains use the deep-index API; Solana uses the Solana gateway.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use super::{http_client, ChainDataProvider};
use crate::config::Config;
use crate::error::{StoreError, StoreResult};
use agent_store_types::{TokenBalance, TokenInfo, WalletAnalytics};

/// Which Moralis API a chain name resolves to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChainTarget {
    Solana,
    /// Moralis chain identifier, e.g. `eth`, `base`
    Evm(&'static str),
}

pub fn chain_target(chain: &str) -> Option<ChainTarget> {
    match chain.to_lowercase().as_str() {
        "solana" | "sol" => Some(ChainTarget::Solana),
        "ethereum" | "eth" | "mainnet" => Some(ChainTarget::Evm("eth")),
        "base" => Some(ChainTarget::Evm("base")),
        "polygon" | "matic" => Some(ChainTarget::Evm("polygon")),
        "bsc" | "bnb" => Some(ChainTarget::Evm("bsc")),
        "arbitrum" => Some(ChainTarget::Evm("arbitrum")),
        "optimism" => Some(ChainTarget::Evm("optimism")),
        "avalanche" => Some(ChainTarget::Evm("avalanche")),
        _ => None,
    }
}

/// Moralis reports decimals as either a number or a numeric string
fn loose_u32(v: &Option<Value>) -> Option<u32> {
    match v {
        Some(Value::Number(n)) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Some(Value::String(s)) => s.parse().ok(),
        _ => None,
    }
}

fn loose_f64(v: &Option<Value>) -> Option<f64> {
    match v {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.parse().ok(),
        _ => None,
    }
}

#[derive(Debug, Deserialize)]
struct NativeBalance {
    balance: String,
}

#[derive(Debug, Deserialize)]
struct EvmTokenPage {
    #[serde(default)]
    result: Vec<EvmToken>,
}

#[derive(Debug, Deserialize)]
struct EvmToken {
    token_address: String,
    symbol: Option<String>,
    name: Option<String>,
    decimals: Option<Value>,
    balance: String,
    usd_value: Option<Value>,
    #[serde(default)]
    possible_spam: bool,
}

#[derive(Debug, Deserialize)]
struct EvmNftPage {
    #[serde(default)]
    result: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct EvmTokenMetadata {
    name: Option<String>,
    symbol: Option<String>,
    decimals: Option<Value>,
    logo: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenPrice {
    usd_price: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SolanaPortfolio {
    native_balance: SolanaNativeBalance,
    #[serde(default)]
    tokens: Vec<SolanaToken>,
    #[serde(default)]
    nfts: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct SolanaNativeBalance {
    solana: String,
}

#[derive(Debug, Deserialize)]
struct SolanaToken {
    mint: String,
    symbol: Option<String>,
    name: Option<String>,
    decimals: Option<Value>,
    amount: String,
}

#[derive(Debug, Deserialize)]
struct SolanaTokenMetadata {
    name: Option<String>,
    symbol: Option<String>,
    decimals: Option<Value>,
    logo: Option<String>,
}

pub struct MoralisClient {
    api_key: Option<String>,
    base_url: String,
    solana_base_url: String,
    client: reqwest::Client,
}

impl MoralisClient {
    pub fn new(api_key: Option<String>, base_url: &str, solana_base_url: &str) -> Self {
        Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            solana_base_url: solana_base_url.trim_end_matches('/').to_string(),
            client: http_client(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.moralis_api_key.clone(),
            &config.moralis_base_url,
            &config.moralis_solana_base_url,
        )
    }

    fn api_key(&self) -> StoreResult<&str> {
        self.api_key
            .as_deref()
            .ok_or_else(|| StoreError::Unavailable("Blockchain data provider is not configured".to_string()))
    }

    async fn get<T: DeserializeOwned>(&self, url: &str, query: &[(&str, &str)]) -> StoreResult<T> {
        let api_key = self.api_key()?;
        let resp = self
            .client
            .get(url)
            .header("X-API-Key", api_key)
            .header("accept", "application/json")
            .query(query)
            .send()
            .await
            .map_err(|e| StoreError::Upstream(format!("Moralis request failed: {}", e)))?;

        let status = resp.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(StoreError::not_found("Not found on chain data provider"));
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(StoreError::Upstream(format!(
                "Moralis API error ({}): {}",
                status, body
            )));
        }

        resp.json::<T>()
            .await
            .map_err(|e| StoreError::Upstream(format!("Failed to parse Moralis response: {}", e)))
    }

    async fn evm_wallet(&self, address: &str, chain: &'static str) -> StoreResult<WalletAnalytics> {
        let native: NativeBalance = self
            .get(&format!("{}/{}/balance", self.base_url, address), &[("chain", chain)])
            .await?;
        let tokens: EvmTokenPage = self
            .get(
                &format!("{}/wallets/{}/tokens", self.base_url, address),
                &[("chain", chain), ("exclude_spam", "true")],
            )
            .await?;
        let nfts: EvmNftPage = self
            .get(
                &format!("{}/{}/nft", self.base_url, address),
                &[("chain", chain), ("limit", "100")],
            )
            .await?;

        let tokens: Vec<TokenBalance> = tokens
            .result
            .into_iter()
            .filter(|t| !t.possible_spam)
            .map(|t| TokenBalance {
                decimals: loose_u32(&t.decimals),
                usd_value: loose_f64(&t.usd_value),
                token_address: t.token_address,
                symbol: t.symbol,
                name: t.name,
                balance: t.balance,
            })
            .collect();

        let priced: Vec<f64> = tokens.iter().filter_map(|t| t.usd_value).collect();
        let total_usd_value = if priced.is_empty() {
            None
        } else {
            Some(priced.iter().sum())
        };

        Ok(WalletAnalytics {
            address: address.to_string(),
            chain: chain.to_string(),
            native_balance: native.balance,
            token_count: tokens.len(),
            tokens,
            nft_count: nfts.result.len(),
            total_usd_value,
        })
    }

    async fn solana_wallet(&self, address: &str) -> StoreResult<WalletAnalytics> {
        let portfolio: SolanaPortfolio = self
            .get(
                &format!("{}/account/mainnet/{}/portfolio", self.solana_base_url, address),
                &[],
            )
            .await?;

        let tokens: Vec<TokenBalance> = portfolio
            .tokens
            .into_iter()
            .map(|t| TokenBalance {
                decimals: loose_u32(&t.decimals),
                token_address: t.mint,
                symbol: t.symbol,
                name: t.name,
                balance: t.amount,
                usd_value: None,
            })
            .collect();

        Ok(WalletAnalytics {
            address: address.to_string(),
            chain: "solana".to_string(),
            native_balance: portfolio.native_balance.solana,
            token_count: tokens.len(),
            tokens,
            nft_count: portfolio.nfts.len(),
            total_usd_value: None,
        })
    }
}

#[async_trait]
impl ChainDataProvider for MoralisClient {
    async fn wallet_analytics(&self, address: &str, chain: &str) -> StoreResult<WalletAnalytics> {
        match chain_target(chain) {
            Some(ChainTarget::Solana) => self.solana_wallet(address).await,
            Some(ChainTarget::Evm(id)) => self.evm_wallet(address, id).await,
            None => Err(StoreError::bad_request(format!("Unsupported chain: {}", chain))),
        }
    }

    async fn token_info(&self, token_address: &str, chain: &str) -> StoreResult<TokenInfo> {
        match chain_target(chain) {
            Some(ChainTarget::Solana) => {
                let meta: SolanaTokenMetadata = self
                    .get(
                        &format!("{}/token/mainnet/{}/metadata", self.solana_base_url, token_address),
                        &[],
                    )
                    .await?;
                // Unpriced tokens are common; missing price is not an error
                let price: Option<TokenPrice> = self
                    .get(
                        &format!("{}/token/mainnet/{}/price", self.solana_base_url, token_address),
                        &[],
                    )
                    .await
                    .map_err(|e| log::warn!("[Moralis] No price for {}: {}", token_address, e))
                    .ok();

                Ok(TokenInfo {
                    address: token_address.to_string(),
                    chain: "solana".to_string(),
                    name: meta.name,
                    symbol: meta.symbol,
                    decimals: loose_u32(&meta.decimals),
                    usd_price: price.and_then(|p| loose_f64(&p.usd_price)),
                    logo: meta.logo,
                })
            }
            Some(ChainTarget::Evm(id)) => {
                let metas: Vec<EvmTokenMetadata> = self
                    .get(
                        &format!("{}/erc20/metadata", self.base_url),
                        &[("chain", id), ("addresses[]", token_address)],
                    )
                    .await?;
                let meta = metas
                    .into_iter()
                    .next()
                    .ok_or_else(|| StoreError::not_found(format!("Token {} not found", token_address)))?;
                let price: Option<TokenPrice> = self
                    .get(
                        &format!("{}/erc20/{}/price", self.base_url, token_address),
                        &[("chain", id)],
                    )
                    .await
                    .map_err(|e| log::warn!("[Moralis] No price for {}: {}", token_address, e))
                    .ok();

                Ok(TokenInfo {
                    address: token_address.to_string(),
                    chain: id.to_string(),
                    name: meta.name,
                    symbol: meta.symbol,
                    decimals: loose_u32(&meta.decimals),
                    usd_price: price.and_then(|p| loose_f64(&p.usd_price)),
                    logo: meta.logo,
                })
            }
            None => Err(StoreError::bad_request(format!("Unsupported chain: {}", chain))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_chain_aliases() {
        assert_eq!(chain_target("Solana"), Some(ChainTarget::Solana));
        assert_eq!(chain_target("ethereum"), Some(ChainTarget::Evm("eth")));
        assert_eq!(chain_target("mainnet"), Some(ChainTarget::Evm("eth")));
        assert_eq!(chain_target("base"), Some(ChainTarget::Evm("base")));
        assert_eq!(chain_target("dogechain"), None);
    }

    #[test]
    fn loose_numbers_accept_strings() {
        assert_eq!(loose_u32(&Some(Value::from(18))), Some(18));
        assert_eq!(loose_u32(&Some(Value::from("6"))), Some(6));
        assert_eq!(loose_u32(&None), None);
        assert_eq!(loose_f64(&Some(Value::from("1.5"))), Some(1.5));
    }

    #[test]
    fn out_of_range_decimals_are_dropped() {
        assert_eq!(loose_u32(&Some(Value::from(u64::from(u32::MAX) + 1))), None);
        assert_eq!(loose_u32(&Some(Value::from(-1))), None);
        assert_eq!(loose_u32(&Some(Value::from(u32::MAX))), Some(u32::MAX));
    }

    #[test]
    fn parses_solana_portfolio() {
        let raw = serde_json::json!({
            "nativeBalance": { "lamports": "1500000000", "solana": "1.5" },
            "tokens": [
                { "mint": "So1", "symbol": "BONK", "name": "Bonk", "decimals": 5, "amount": "1000" }
            ],
            "nfts": [ {}, {} ]
        });
        let portfolio: SolanaPortfolio = serde_json::from_value(raw).unwrap();
        assert_eq!(portfolio.native_balance.solana, "1.5");
        assert_eq!(portfolio.tokens.len(), 1);
        assert_eq!(portfolio.nfts.len(), 2);
    }

    #[tokio::test]
    async fn missing_api_key_is_unavailable() {
        let client = MoralisClient::new(None, "http://localhost", "http://localhost");
        match client.wallet_analytics("0xabc", "eth").await {
            Err(StoreError::Unavailable(_)) => {}
            other => panic!("expected Unavailable, got {:?}", other.map(|a| a.address)),
        }
    }
}
