use std::env;

/// Environment variable names - single source of truth
pub mod env_vars {
    pub const PORT: &str = "PORT";
    pub const DATABASE_URL: &str = "DATABASE_URL";
    // Blockchain data provider
    pub const MORALIS_API_KEY: &str = "MORALIS_API_KEY";
    pub const MORALIS_BASE_URL: &str = "MORALIS_BASE_URL";
    pub const MORALIS_SOLANA_BASE_URL: &str = "MORALIS_SOLANA_BASE_URL";
    // Chat completions
    pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";
    pub const OPENAI_ENDPOINT: &str = "OPENAI_ENDPOINT";
    pub const OPENAI_MODEL: &str = "OPENAI_MODEL";
    // NFT minting service
    pub const MINT_SERVICE_URL: &str = "MINT_SERVICE_URL";
    // Static frontend
    pub const FRONTEND_DIST: &str = "FRONTEND_DIST";
    pub const DISABLE_FRONTEND: &str = "DISABLE_FRONTEND";
    pub const SEED_CATALOG: &str = "SEED_CATALOG";
}

/// Default values
pub mod defaults {
    pub const PORT: u16 = 8080;
    pub const DATABASE_URL: &str = "./.db/agent_store.db";
    pub const MORALIS_BASE_URL: &str = "https://deep-index.moralis.io/api/v2.2";
    pub const MORALIS_SOLANA_BASE_URL: &str = "https://solana-gateway.moralis.io";
    pub const OPENAI_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
    pub const OPENAI_MODEL: &str = "gpt-4o-mini";
    pub const FRONTEND_DIST: &str = "./frontend/dist";
    /// Listing price (SOL) for agents deployed to the store without an explicit price
    pub const DEPLOY_PRICE: f64 = 0.1;
}

fn env_flag(name: &str, default: bool) -> bool {
    env::var(name)
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(default)
}

fn env_non_empty(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

#[derive(Clone, Debug)]
pub struct Config {
    pub port: u16,
    pub database_url: String,
    pub moralis_api_key: Option<String>,
    pub moralis_base_url: String,
    pub moralis_solana_base_url: String,
    pub openai_api_key: Option<String>,
    pub openai_endpoint: String,
    pub openai_model: String,
    pub mint_service_url: Option<String>,
    /// Empty when static serving is disabled
    pub frontend_dist: String,
    pub seed_catalog: bool,
}

impl Config {
    pub fn from_env() -> Self {
        let port = match env::var(env_vars::PORT) {
            Ok(raw) => raw.parse().unwrap_or_else(|_| {
                log::warn!("Invalid {} value '{}', using {}", env_vars::PORT, raw, defaults::PORT);
                defaults::PORT
            }),
            Err(_) => defaults::PORT,
        };

        let frontend_dist = if env_flag(env_vars::DISABLE_FRONTEND, false) {
            String::new()
        } else {
            env::var(env_vars::FRONTEND_DIST).unwrap_or_else(|_| defaults::FRONTEND_DIST.to_string())
        };

        Self {
            port,
            database_url: env::var(env_vars::DATABASE_URL)
                .unwrap_or_else(|_| defaults::DATABASE_URL.to_string()),
            moralis_api_key: env_non_empty(env_vars::MORALIS_API_KEY),
            moralis_base_url: env::var(env_vars::MORALIS_BASE_URL)
                .unwrap_or_else(|_| defaults::MORALIS_BASE_URL.to_string()),
            moralis_solana_base_url: env::var(env_vars::MORALIS_SOLANA_BASE_URL)
                .unwrap_or_else(|_| defaults::MORALIS_SOLANA_BASE_URL.to_string()),
            openai_api_key: env_non_empty(env_vars::OPENAI_API_KEY),
            openai_endpoint: env::var(env_vars::OPENAI_ENDPOINT)
                .unwrap_or_else(|_| defaults::OPENAI_ENDPOINT.to_string()),
            openai_model: env::var(env_vars::OPENAI_MODEL)
                .unwrap_or_else(|_| defaults::OPENAI_MODEL.to_string()),
            mint_service_url: env_non_empty(env_vars::MINT_SERVICE_URL),
            frontend_dist,
            seed_catalog: env_flag(env_vars::SEED_CATALOG, true),
        }
    }

    /// Config for tests: in-memory database, no collaborators, no static files
    #[cfg(test)]
    pub fn for_tests() -> Self {
        Self {
            port: 0,
            database_url: ":memory:".to_string(),
            moralis_api_key: None,
            moralis_base_url: defaults::MORALIS_BASE_URL.to_string(),
            moralis_solana_base_url: defaults::MORALIS_SOLANA_BASE_URL.to_string(),
            openai_api_key: None,
            openai_endpoint: defaults::OPENAI_ENDPOINT.to_string(),
            openai_model: defaults::OPENAI_MODEL.to_string(),
            mint_service_url: None,
            frontend_dist: String::new(),
            seed_catalog: false,
        }
    }
}
