use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use std::path::Path;

use crate::error::StoreResult;

pub mod tables;

pub type DbConn = PooledConnection<SqliteConnectionManager>;

pub struct Database {
    pool: Pool<SqliteConnectionManager>,
}

impl Database {
    pub fn new(database_url: &str) -> StoreResult<Self> {
        let pool = if database_url == ":memory:" {
            // Every in-memory connection is a separate database: keep exactly one, forever.
            Pool::builder()
                .max_size(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .build(SqliteConnectionManager::memory())?
        } else {
            // Create parent directory if it doesn't exist
            if let Some(parent) = Path::new(database_url).parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent).ok();
                }
            }
            let manager = SqliteConnectionManager::file(database_url).with_init(|conn| {
                conn.execute_batch(
                    "PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON; PRAGMA busy_timeout=5000;",
                )
            });
            Pool::builder().max_size(8).build(manager)?
        };

        let db = Self { pool };
        db.init()?;
        Ok(db)
    }

    /// Check out a pooled connection. Never hold one across another `Database` call.
    pub(crate) fn conn(&self) -> StoreResult<DbConn> {
        Ok(self.pool.get()?)
    }

    fn init(&self) -> StoreResult<()> {
        let conn = self.conn()?;

        // Personal agents created by wallets
        conn.execute(
            "CREATE TABLE IF NOT EXISTS agents (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                creator_wallet_address TEXT NOT NULL,
                chain TEXT NOT NULL DEFAULT 'solana',
                agent_type TEXT NOT NULL DEFAULT 'general',
                is_public INTEGER NOT NULL DEFAULT 0,
                is_nft INTEGER NOT NULL DEFAULT 0,
                nft_mint_address TEXT,
                status TEXT NOT NULL DEFAULT 'pending',
                metadata_json TEXT NOT NULL DEFAULT '{}',
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )",
            [],
        )?;
        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_agents_creator ON agents(creator_wallet_address, created_at DESC)",
            [],
        )?;

        // Catalog (prebuilt) agents
        conn.execute(
            "CREATE TABLE IF NOT EXISTS prebuilt_agents (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                category TEXT NOT NULL DEFAULT 'general',
                chain_compatibility_json TEXT NOT NULL DEFAULT '[]',
                features_json TEXT NOT NULL DEFAULT '[]',
                capabilities_json TEXT NOT NULL DEFAULT '[]',
                price REAL NOT NULL DEFAULT 0,
                is_minted INTEGER NOT NULL DEFAULT 0,
                owner_wallet TEXT,
                mint_date TEXT,
                creator_wallet TEXT,
                original_agent_id TEXT,
                image_url TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )",
            [],
        )?;
        // A personal agent appears in the catalog at most once
        conn.execute(
            "CREATE UNIQUE INDEX IF NOT EXISTS idx_prebuilt_original_agent
             ON prebuilt_agents(original_agent_id) WHERE original_agent_id IS NOT NULL",
            [],
        )?;

        // Append-only interaction log
        conn.execute(
            "CREATE TABLE IF NOT EXISTS agent_interactions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                agent_id TEXT NOT NULL,
                wallet_address TEXT NOT NULL,
                interaction_type TEXT NOT NULL,
                data_json TEXT NOT NULL DEFAULT 'null',
                created_at TEXT NOT NULL
            )",
            [],
        )?;
        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_agent_interactions_agent ON agent_interactions(agent_id, created_at DESC)",
            [],
        )?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS agent_stats (
                agent_id TEXT PRIMARY KEY,
                views INTEGER NOT NULL DEFAULT 0,
                mints INTEGER NOT NULL DEFAULT 0,
                feature_uses INTEGER NOT NULL DEFAULT 0,
                last_interaction_at TEXT
            )",
            [],
        )?;

        // Tool services and per-agent integrations
        conn.execute(
            "CREATE TABLE IF NOT EXISTS mcp_services (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                endpoint TEXT NOT NULL DEFAULT '',
                category TEXT NOT NULL DEFAULT 'general',
                enabled INTEGER NOT NULL DEFAULT 1,
                created_at TEXT NOT NULL
            )",
            [],
        )?;
        conn.execute(
            "CREATE TABLE IF NOT EXISTS mcp_service_integrations (
                agent_id TEXT NOT NULL,
                service_id TEXT NOT NULL,
                enabled INTEGER NOT NULL DEFAULT 1,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                PRIMARY KEY (agent_id, service_id),
                FOREIGN KEY (service_id) REFERENCES mcp_services(id)
            )",
            [],
        )?;

        Ok(())
    }
}

/// Parse a JSON text column, falling back to the type's default on bad data
pub(crate) fn json_column<T: serde::de::DeserializeOwned + Default>(raw: &str) -> T {
    serde_json::from_str(raw).unwrap_or_default()
}
