//! Personal agent database operations

use chrono::Utc;
use rusqlite::{params, OptionalExtension, Row};
use uuid::Uuid;

use super::super::Database;
use crate::error::StoreResult;
use crate::models::{Agent, AgentListQuery, AgentStatus, NewAgent};

const AGENT_COLUMNS: &str = "id, name, description, creator_wallet_address, chain, agent_type, \
     is_public, is_nft, nft_mint_address, status, metadata_json, created_at, updated_at";

fn map_agent_row(row: &Row) -> rusqlite::Result<Agent> {
    let status: String = row.get(9)?;
    let metadata: String = row.get(10)?;
    Ok(Agent {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        creator_wallet_address: row.get(3)?,
        chain: row.get(4)?,
        agent_type: row.get(5)?,
        is_public: row.get::<_, i32>(6)? != 0,
        is_nft: row.get::<_, i32>(7)? != 0,
        nft_mint_address: row.get(8)?,
        status: AgentStatus::from_str(&status).unwrap_or(AgentStatus::Pending),
        metadata: serde_json::from_str(&metadata).unwrap_or_default(),
        created_at: row.get(11)?,
        updated_at: row.get(12)?,
    })
}

impl Database {
    /// Insert a personal agent. New rows always start as `pending`.
    pub fn create_agent(&self, new: &NewAgent) -> StoreResult<Agent> {
        let conn = self.conn()?;
        let id = Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();
        let metadata_json = serde_json::to_string(&new.metadata).unwrap_or_else(|_| "{}".to_string());

        conn.execute(
            "INSERT INTO agents (id, name, description, creator_wallet_address, chain, agent_type,
                                 is_public, is_nft, status, metadata_json, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?11)",
            params![
                id,
                new.name,
                new.description,
                new.creator_wallet_address,
                new.chain,
                new.agent_type,
                new.is_public as i32,
                new.is_nft as i32,
                AgentStatus::Pending.as_str(),
                metadata_json,
                now,
            ],
        )?;

        Ok(Agent {
            id,
            name: new.name.clone(),
            description: new.description.clone(),
            creator_wallet_address: new.creator_wallet_address.clone(),
            chain: new.chain.clone(),
            agent_type: new.agent_type.clone(),
            is_public: new.is_public,
            is_nft: new.is_nft,
            nft_mint_address: None,
            status: AgentStatus::Pending,
            metadata: new.metadata.clone(),
            created_at: now.clone(),
            updated_at: now,
        })
    }

    pub fn get_agent(&self, id: &str) -> StoreResult<Option<Agent>> {
        let conn = self.conn()?;
        let agent = conn
            .query_row(
                &format!("SELECT {} FROM agents WHERE id = ?1", AGENT_COLUMNS),
                [id],
                map_agent_row,
            )
            .optional()?;
        Ok(agent)
    }

    /// Page through agents, optionally restricted to one creator wallet.
    /// Returns the page and the total row count for the filter.
    pub fn list_agents(&self, query: &AgentListQuery) -> StoreResult<(Vec<Agent>, i64)> {
        let conn = self.conn()?;
        let creator = query.creator_wallet.as_deref();
        let direction = if query.descending() { "DESC" } else { "ASC" };

        let total: i64 = conn.query_row(
            "SELECT COUNT(*) FROM agents WHERE (?1 IS NULL OR creator_wallet_address = ?1)",
            [creator],
            |row| row.get(0),
        )?;

        // Column and direction come from allow-lists, never from raw input
        let sql = format!(
            "SELECT {} FROM agents
             WHERE (?1 IS NULL OR creator_wallet_address = ?1)
             ORDER BY {} {}, rowid {}
             LIMIT ?2 OFFSET ?3",
            AGENT_COLUMNS,
            query.sort_column().as_ref(),
            direction,
            direction,
        );
        let mut stmt = conn.prepare(&sql)?;
        let agents = stmt
            .query_map(params![creator, query.limit(), query.offset()], map_agent_row)?
            .filter_map(|r| r.ok())
            .collect();

        Ok((agents, total))
    }

    /// NFT agents a viewer may see: every public one plus the viewer's own private ones.
    pub fn list_visible_nft_agents(&self, wallet: Option<&str>) -> StoreResult<Vec<Agent>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM agents
             WHERE is_nft = 1 AND (is_public = 1 OR (?1 IS NOT NULL AND creator_wallet_address = ?1))
             ORDER BY created_at DESC",
            AGENT_COLUMNS
        ))?;
        let agents = stmt
            .query_map([wallet], map_agent_row)?
            .filter_map(|r| r.ok())
            .collect();
        Ok(agents)
    }

    /// Set the mint status, keeping any existing mint address when none is given.
    pub fn update_agent_status(
        &self,
        id: &str,
        status: AgentStatus,
        nft_mint_address: Option<&str>,
    ) -> StoreResult<bool> {
        let conn = self.conn()?;
        let now = Utc::now().to_rfc3339();
        let rows = conn.execute(
            "UPDATE agents
             SET status = ?2, nft_mint_address = COALESCE(?3, nft_mint_address), updated_at = ?4
             WHERE id = ?1",
            params![id, status.as_str(), nft_mint_address, now],
        )?;
        Ok(rows > 0)
    }

    pub fn set_agent_public(&self, id: &str, is_public: bool) -> StoreResult<bool> {
        let conn = self.conn()?;
        let now = Utc::now().to_rfc3339();
        let rows = conn.execute(
            "UPDATE agents SET is_public = ?2, updated_at = ?3 WHERE id = ?1",
            params![id, is_public as i32, now],
        )?;
        Ok(rows > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn new_agent(name: &str, wallet: &str) -> NewAgent {
        NewAgent {
            name: name.to_string(),
            description: format!("{} description", name),
            creator_wallet_address: wallet.to_string(),
            chain: "solana".to_string(),
            agent_type: "trading".to_string(),
            is_public: false,
            is_nft: true,
            metadata: json!({ "avatar": "robot" }),
        }
    }

    #[test]
    fn create_and_fetch_round_trips_fields() {
        let db = Database::new(":memory:").unwrap();
        let created = db.create_agent(&new_agent("Scout", "walletA")).unwrap();

        let fetched = db.get_agent(&created.id).unwrap().expect("agent exists");
        assert_eq!(fetched.name, "Scout");
        assert_eq!(fetched.status, AgentStatus::Pending);
        assert!(fetched.is_nft);
        assert!(!fetched.is_public);
        assert_eq!(fetched.metadata, json!({ "avatar": "robot" }));

        assert!(db.get_agent("missing").unwrap().is_none());
    }

    #[test]
    fn status_update_keeps_existing_mint_address() {
        let db = Database::new(":memory:").unwrap();
        let agent = db.create_agent(&new_agent("Minted", "walletA")).unwrap();

        assert!(db.update_agent_status(&agent.id, AgentStatus::Active, Some("Mint111")).unwrap());
        assert!(db.update_agent_status(&agent.id, AgentStatus::Active, None).unwrap());

        let fetched = db.get_agent(&agent.id).unwrap().unwrap();
        assert_eq!(fetched.status, AgentStatus::Active);
        assert_eq!(fetched.nft_mint_address.as_deref(), Some("Mint111"));

        assert!(!db.update_agent_status("nope", AgentStatus::Failed, None).unwrap());
    }

    #[test]
    fn visible_nft_agents_include_own_private_ones() {
        let db = Database::new(":memory:").unwrap();
        let mine = db.create_agent(&new_agent("Mine", "walletA")).unwrap();
        let theirs_private = db.create_agent(&new_agent("TheirsPrivate", "walletB")).unwrap();
        let theirs_public = db.create_agent(&new_agent("TheirsPublic", "walletB")).unwrap();
        db.set_agent_public(&theirs_public.id, true).unwrap();

        let anonymous: Vec<String> = db
            .list_visible_nft_agents(None)
            .unwrap()
            .into_iter()
            .map(|a| a.id)
            .collect();
        assert_eq!(anonymous, vec![theirs_public.id.clone()]);

        let for_a: Vec<String> = db
            .list_visible_nft_agents(Some("walletA"))
            .unwrap()
            .into_iter()
            .map(|a| a.id)
            .collect();
        assert!(for_a.contains(&mine.id));
        assert!(for_a.contains(&theirs_public.id));
        assert!(!for_a.contains(&theirs_private.id));
    }
}
