//! Store catalog (prebuilt agents) database operations

use chrono::Utc;
use rusqlite::{params, OptionalExtension, Row};
use std::collections::HashSet;

use super::super::{json_column, Database};
use crate::error::StoreResult;
use crate::models::PrebuiltAgent;

const PREBUILT_COLUMNS: &str = "id, name, description, category, chain_compatibility_json, \
     features_json, capabilities_json, price, is_minted, owner_wallet, mint_date, creator_wallet, \
     original_agent_id, image_url, created_at, updated_at";

fn map_prebuilt_row(row: &Row) -> rusqlite::Result<PrebuiltAgent> {
    let chains: String = row.get(4)?;
    let features: String = row.get(5)?;
    let capabilities: String = row.get(6)?;
    Ok(PrebuiltAgent {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        category: row.get(3)?,
        chain_compatibility: json_column(&chains),
        features: json_column(&features),
        capabilities: json_column(&capabilities),
        price: row.get(7)?,
        is_minted: row.get::<_, i32>(8)? != 0,
        owner_wallet: row.get(9)?,
        mint_date: row.get(10)?,
        creator_wallet: row.get(11)?,
        original_agent_id: row.get(12)?,
        image_url: row.get(13)?,
        created_at: row.get(14)?,
        updated_at: row.get(15)?,
    })
}

impl Database {
    /// Insert a catalog entry. Fails with a constraint violation when the id or the
    /// `original_agent_id` back-reference already exists.
    pub fn insert_prebuilt_agent(&self, agent: &PrebuiltAgent) -> StoreResult<()> {
        let conn = self.conn()?;
        let chains_json =
            serde_json::to_string(&agent.chain_compatibility).unwrap_or_else(|_| "[]".to_string());
        let features_json = serde_json::to_string(&agent.features).unwrap_or_else(|_| "[]".to_string());
        let capabilities_json =
            serde_json::to_string(&agent.capabilities).unwrap_or_else(|_| "[]".to_string());

        conn.execute(
            &format!(
                "INSERT INTO prebuilt_agents ({})
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)",
                PREBUILT_COLUMNS
            ),
            params![
                agent.id,
                agent.name,
                agent.description,
                agent.category,
                chains_json,
                features_json,
                capabilities_json,
                agent.price,
                agent.is_minted as i32,
                agent.owner_wallet,
                agent.mint_date,
                agent.creator_wallet,
                agent.original_agent_id,
                agent.image_url,
                agent.created_at,
                agent.updated_at,
            ],
        )?;
        Ok(())
    }

    pub fn get_prebuilt_agent(&self, id: &str) -> StoreResult<Option<PrebuiltAgent>> {
        let conn = self.conn()?;
        let agent = conn
            .query_row(
                &format!("SELECT {} FROM prebuilt_agents WHERE id = ?1", PREBUILT_COLUMNS),
                [id],
                map_prebuilt_row,
            )
            .optional()?;
        Ok(agent)
    }

    /// All catalog entries, newest first. Category filtering happens in SQL;
    /// list-valued columns are filtered by the caller.
    pub fn list_prebuilt_agents(&self, category: Option<&str>) -> StoreResult<Vec<PrebuiltAgent>> {
        let conn = self.conn()?;
        let category = category.filter(|c| !c.is_empty() && *c != "all");
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM prebuilt_agents
             WHERE (?1 IS NULL OR lower(category) = lower(?1))
             ORDER BY created_at DESC, rowid DESC",
            PREBUILT_COLUMNS
        ))?;
        let agents = stmt
            .query_map([category], map_prebuilt_row)?
            .filter_map(|r| r.ok())
            .collect();
        Ok(agents)
    }

    /// The catalog entry produced by deploying a personal agent, if any.
    pub fn find_prebuilt_by_original_agent(
        &self,
        original_agent_id: &str,
    ) -> StoreResult<Option<PrebuiltAgent>> {
        let conn = self.conn()?;
        let agent = conn
            .query_row(
                &format!(
                    "SELECT {} FROM prebuilt_agents WHERE original_agent_id = ?1",
                    PREBUILT_COLUMNS
                ),
                [original_agent_id],
                map_prebuilt_row,
            )
            .optional()?;
        Ok(agent)
    }

    /// Ids of personal agents that already have a catalog entry.
    pub fn deployed_agent_ids(&self) -> StoreResult<HashSet<String>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT original_agent_id FROM prebuilt_agents WHERE original_agent_id IS NOT NULL",
        )?;
        let ids = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .filter_map(|r| r.ok())
            .collect();
        Ok(ids)
    }

    /// One-way mint transition. Only an unminted entry, or one already owned by
    /// `wallet`, is updated; the first mint date is kept.
    /// Returns false when nothing was updated (missing or owned by someone else).
    pub fn mint_prebuilt_agent(&self, id: &str, wallet: &str) -> StoreResult<bool> {
        let conn = self.conn()?;
        let now = Utc::now().to_rfc3339();
        let rows = conn.execute(
            "UPDATE prebuilt_agents
             SET is_minted = 1, owner_wallet = ?2, mint_date = COALESCE(mint_date, ?3), updated_at = ?3
             WHERE id = ?1 AND (is_minted = 0 OR owner_wallet = ?2)",
            params![id, wallet, now],
        )?;
        Ok(rows > 0)
    }

    pub fn count_prebuilt_agents(&self) -> StoreResult<i64> {
        let conn = self.conn()?;
        let count = conn.query_row("SELECT COUNT(*) FROM prebuilt_agents", [], |row| row.get(0))?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::is_constraint_violation;
    use crate::error::StoreError;
    use crate::models::Capability;

    fn entry(id: &str, category: &str, original: Option<&str>) -> PrebuiltAgent {
        let now = Utc::now().to_rfc3339();
        PrebuiltAgent {
            id: id.to_string(),
            name: format!("Agent {}", id),
            description: "test entry".to_string(),
            category: category.to_string(),
            chain_compatibility: vec!["solana".to_string()],
            features: vec!["AI chat".to_string()],
            capabilities: vec![Capability {
                id: "ai_chat".to_string(),
                name: "AI Chat".to_string(),
                description: "Talk to the agent".to_string(),
                requires_minting: false,
            }],
            price: 0.5,
            is_minted: false,
            owner_wallet: None,
            mint_date: None,
            creator_wallet: None,
            original_agent_id: original.map(|s| s.to_string()),
            image_url: None,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    #[test]
    fn insert_and_read_back_json_columns() {
        let db = Database::new(":memory:").unwrap();
        db.insert_prebuilt_agent(&entry("a", "defi", None)).unwrap();

        let fetched = db.get_prebuilt_agent("a").unwrap().unwrap();
        assert_eq!(fetched.chain_compatibility, vec!["solana"]);
        assert_eq!(fetched.capabilities.len(), 1);
        assert_eq!(fetched.capabilities[0].id, "ai_chat");
        assert_eq!(db.count_prebuilt_agents().unwrap(), 1);
    }

    #[test]
    fn category_filter_is_case_insensitive() {
        let db = Database::new(":memory:").unwrap();
        db.insert_prebuilt_agent(&entry("a", "defi", None)).unwrap();
        db.insert_prebuilt_agent(&entry("b", "nft", None)).unwrap();

        assert_eq!(db.list_prebuilt_agents(None).unwrap().len(), 2);
        assert_eq!(db.list_prebuilt_agents(Some("all")).unwrap().len(), 2);
        let defi = db.list_prebuilt_agents(Some("DeFi")).unwrap();
        assert_eq!(defi.len(), 1);
        assert_eq!(defi[0].id, "a");
    }

    #[test]
    fn original_agent_id_is_unique() {
        let db = Database::new(":memory:").unwrap();
        db.insert_prebuilt_agent(&entry("a", "custom", Some("agent-1"))).unwrap();

        match db.insert_prebuilt_agent(&entry("b", "custom", Some("agent-1"))) {
            Err(StoreError::Database(e)) => assert!(is_constraint_violation(&e)),
            other => panic!("expected constraint violation, got {:?}", other),
        }

        assert!(db.find_prebuilt_by_original_agent("agent-1").unwrap().is_some());
        assert!(db.deployed_agent_ids().unwrap().contains("agent-1"));
    }

    #[test]
    fn mint_is_one_way_and_owner_stable() {
        let db = Database::new(":memory:").unwrap();
        db.insert_prebuilt_agent(&entry("a", "defi", None)).unwrap();

        assert!(db.mint_prebuilt_agent("a", "walletA").unwrap());
        let first = db.get_prebuilt_agent("a").unwrap().unwrap();
        assert!(first.is_minted);
        assert_eq!(first.owner_wallet.as_deref(), Some("walletA"));

        // Same owner: accepted, mint date unchanged
        assert!(db.mint_prebuilt_agent("a", "walletA").unwrap());
        let second = db.get_prebuilt_agent("a").unwrap().unwrap();
        assert_eq!(second.mint_date, first.mint_date);

        // Different wallet: refused, owner unchanged
        assert!(!db.mint_prebuilt_agent("a", "walletB").unwrap());
        let third = db.get_prebuilt_agent("a").unwrap().unwrap();
        assert_eq!(third.owner_wallet.as_deref(), Some("walletA"));

        assert!(!db.mint_prebuilt_agent("missing", "walletA").unwrap());
    }
}
