use serde::Deserialize;

/// Query string shared by `GET /api/prebuilt-agents` and `GET /api/agent-store`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogFilter {
    pub category: Option<String>,
    pub chain: Option<String>,
    pub search: Option<String>,
    #[serde(alias = "walletAddress", alias = "wallet_address")]
    pub wallet: Option<String>,
}

impl CatalogFilter {
    pub fn matches_category(&self, category: &str) -> bool {
        match self.category.as_deref() {
            None | Some("") | Some("all") => true,
            Some(c) => c.eq_ignore_ascii_case(category),
        }
    }

    pub fn matches_chain(&self, chains: &[String]) -> bool {
        match self.chain.as_deref() {
            None | Some("") | Some("all") => true,
            Some(c) => chains.iter().any(|chain| chain.eq_ignore_ascii_case(c)),
        }
    }

    pub fn matches_search(&self, name: &str, description: &str) -> bool {
        match self.search.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(term) => {
                let term = term.to_lowercase();
                name.to_lowercase().contains(&term) || description.to_lowercase().contains(&term)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_filter_matches_everything() {
        let f = CatalogFilter::default();
        assert!(f.matches_category("defi"));
        assert!(f.matches_chain(&[]));
        assert!(f.matches_search("x", "y"));
    }

    #[test]
    fn filters_are_case_insensitive() {
        let f = CatalogFilter {
            category: Some("DeFi".into()),
            chain: Some("SOLANA".into()),
            search: Some("Whale".into()),
            wallet: None,
        };
        assert!(f.matches_category("defi"));
        assert!(!f.matches_category("nft"));
        assert!(f.matches_chain(&["ethereum".into(), "solana".into()]));
        assert!(!f.matches_chain(&["base".into()]));
        assert!(f.matches_search("Whale Watcher", ""));
        assert!(f.matches_search("Tracker", "follows whale wallets"));
        assert!(!f.matches_search("Tracker", "nothing"));
    }
}
