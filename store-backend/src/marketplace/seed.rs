//! Built-in catalog entries and tool services for a fresh database.

use chrono::Utc;

use super::templates::default_capabilities;
use crate::db::Database;
use crate::error::StoreResult;
use crate::models::{Capability, McpService, PrebuiltAgent};

fn gated(id: &str, name: &str, description: &str) -> Capability {
    Capability {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        requires_minting: true,
    }
}

fn free(id: &str, name: &str, description: &str) -> Capability {
    Capability {
        requires_minting: false,
        ..gated(id, name, description)
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn builtin_agents(now: &str) -> Vec<PrebuiltAgent> {
    let entry = |id: &str,
                 name: &str,
                 description: &str,
                 category: &str,
                 chains: &[&str],
                 features: &[&str],
                 capabilities: Vec<Capability>,
                 price: f64| PrebuiltAgent {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        category: category.to_string(),
        chain_compatibility: strings(chains),
        features: strings(features),
        capabilities,
        price,
        is_minted: false,
        owner_wallet: None,
        mint_date: None,
        creator_wallet: None,
        original_agent_id: None,
        image_url: None,
        created_at: now.to_string(),
        updated_at: now.to_string(),
    };

    vec![
        entry(
            "portfolio-guardian",
            "Portfolio Guardian",
            "Watches a wallet's holdings and flags concentration and drawdown risk.",
            "portfolio",
            &["solana", "ethereum", "base"],
            &["Portfolio tracking", "Risk alerts", "AI chat"],
            vec![
                free("ai_chat", "AI Chat", "Ask about portfolio construction"),
                free("portfolio_tracking", "Portfolio Tracking", "Live balances and token holdings"),
                gated("market_insights", "Risk Insights", "AI commentary on portfolio risk"),
            ],
            0.5,
        ),
        entry(
            "token-scout",
            "Token Scout",
            "Looks up token metadata and prices and summarizes what it finds.",
            "research",
            &["solana", "ethereum", "polygon"],
            &["Token analysis", "Price alerts", "AI chat"],
            vec![
                free("token_analysis", "Token Analysis", "Metadata and USD price for a token"),
                gated("price_alerts", "Price Alerts", "Price snapshots for watched tokens"),
                free("ai_chat", "AI Chat", "Discuss a token's fundamentals"),
            ],
            0.25,
        ),
        entry(
            "signal-trader",
            "Signal Trader",
            "Generates trading ideas from market structure and sentiment.",
            "trading",
            &["solana"],
            &["Trading signals", "Sentiment analysis", "Wallet analysis"],
            vec![
                free("wallet_analysis", "Wallet Analysis", "Balances, token holdings and NFT count"),
                gated("trading_signals", "Trading Signals", "Entry and exit ideas for holders"),
                gated("sentiment_analysis", "Sentiment Analysis", "Market mood summaries"),
            ],
            1.0,
        ),
        entry(
            "defi-navigator",
            "DeFi Navigator",
            "Explains yields, pools and protocol risk across EVM chains.",
            "defi",
            &["ethereum", "base", "arbitrum"],
            &["AI chat", "Wallet analysis", "Market insights"],
            default_capabilities(),
            0.3,
        ),
    ]
}

fn builtin_services() -> Vec<McpService> {
    let service = |id: &str, name: &str, description: &str, endpoint: &str, category: &str| McpService {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        endpoint: endpoint.to_string(),
        category: category.to_string(),
        enabled: true,
        integrated: None,
    };

    vec![
        service(
            "moralis-data",
            "Moralis Data",
            "Wallet balances, token prices and NFT holdings",
            "https://deep-index.moralis.io/api/v2.2",
            "blockchain",
        ),
        service(
            "jupiter-swap",
            "Jupiter Swap",
            "Solana token swap quotes",
            "https://quote-api.jup.ag/v6",
            "trading",
        ),
        service(
            "dexscreener",
            "DexScreener",
            "DEX pair prices and liquidity",
            "https://api.dexscreener.com/latest",
            "market-data",
        ),
        service(
            "web-search",
            "Web Search",
            "General web search for research tasks",
            "https://api.search.brave.com/res/v1",
            "research",
        ),
    ]
}

/// Insert the built-in catalog and tool services into empty tables.
/// Tables that already hold rows are left untouched.
pub fn seed_defaults(db: &Database) -> StoreResult<()> {
    if db.count_prebuilt_agents()? == 0 {
        let now = Utc::now().to_rfc3339();
        let agents = builtin_agents(&now);
        for agent in &agents {
            db.insert_prebuilt_agent(agent)?;
        }
        log::info!("[Seed] Inserted {} built-in catalog agents", agents.len());
    } else {
        log::info!("[Seed] Catalog already populated, skipping");
    }

    if db.count_mcp_services()? == 0 {
        let services = builtin_services();
        for service in &services {
            db.upsert_mcp_service(service)?;
        }
        log::info!("[Seed] Inserted {} tool services", services.len());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::marketplace::gate::LiveData;
    use std::str::FromStr;

    #[test]
    fn seeding_runs_once() {
        let db = Database::new(":memory:").unwrap();
        seed_defaults(&db).unwrap();
        let agents = db.count_prebuilt_agents().unwrap();
        let services = db.count_mcp_services().unwrap();
        assert!(agents > 0 && services > 0);

        seed_defaults(&db).unwrap();
        assert_eq!(db.count_prebuilt_agents().unwrap(), agents);
        assert_eq!(db.count_mcp_services().unwrap(), services);
    }

    #[test]
    fn every_builtin_capability_has_a_handler() {
        for agent in builtin_agents("now") {
            for cap in &agent.capabilities {
                assert!(LiveData::from_str(&cap.id).is_ok(), "{} has no handler", cap.id);
            }
        }
    }
}
