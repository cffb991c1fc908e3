//! Fixed feature and capability templates applied to new catalog entries.

use agent_store_types::Capability;

/// Feature list given to every agent deployed from a personal agent
pub const DEPLOY_FEATURES: [&str; 4] = [
    "AI chat",
    "Wallet analysis",
    "Market insights",
    "Custom strategies",
];

fn capability(id: &str, name: &str, description: &str, requires_minting: bool) -> Capability {
    Capability {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        requires_minting,
    }
}

/// Capabilities of a catalog entry that does not declare its own
pub fn default_capabilities() -> Vec<Capability> {
    vec![
        capability("ai_chat", "AI Chat", "Converse with the agent about its specialty", false),
        capability(
            "wallet_analysis",
            "Wallet Analysis",
            "Balances, token holdings and NFT count for a wallet",
            false,
        ),
        capability(
            "market_insights",
            "Market Insights",
            "AI-generated market commentary tuned to the agent",
            true,
        ),
        capability(
            "trading_signals",
            "Trading Signals",
            "Custom strategy suggestions for holders",
            true,
        ),
    ]
}

pub fn deploy_features() -> Vec<String> {
    DEPLOY_FEATURES.iter().map(|f| f.to_string()).collect()
}
