//! Interaction log and per-agent stats

use chrono::Utc;
use rusqlite::{params, OptionalExtension};
use serde_json::Value;

use super::super::Database;
use crate::error::StoreResult;
use crate::models::{AgentStats, Interaction, InteractionType};

impl Database {
    /// Append an interaction and bump the matching `agent_stats` counter in one transaction.
    pub fn record_interaction(
        &self,
        agent_id: &str,
        wallet_address: &str,
        interaction_type: InteractionType,
        data: &Value,
    ) -> StoreResult<Interaction> {
        let mut conn = self.conn()?;
        let now = Utc::now().to_rfc3339();
        let data_json = serde_json::to_string(data).unwrap_or_else(|_| "null".to_string());

        let (views, mints, feature_uses) = match interaction_type {
            InteractionType::View => (1, 0, 0),
            InteractionType::Mint => (0, 1, 0),
            InteractionType::UseFeature => (0, 0, 1),
        };

        let tx = conn.transaction()?;
        tx.execute(
            "INSERT INTO agent_interactions (agent_id, wallet_address, interaction_type, data_json, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![agent_id, wallet_address, interaction_type.as_str(), data_json, now],
        )?;
        let id = tx.last_insert_rowid();
        tx.execute(
            "INSERT INTO agent_stats (agent_id, views, mints, feature_uses, last_interaction_at)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(agent_id) DO UPDATE SET
                views = views + excluded.views,
                mints = mints + excluded.mints,
                feature_uses = feature_uses + excluded.feature_uses,
                last_interaction_at = excluded.last_interaction_at",
            params![agent_id, views, mints, feature_uses, now],
        )?;
        tx.commit()?;

        Ok(Interaction {
            id,
            agent_id: agent_id.to_string(),
            wallet_address: wallet_address.to_string(),
            interaction_type,
            data: data.clone(),
            created_at: now,
        })
    }

    /// Most recent interactions for an agent, optionally of one type.
    pub fn list_interactions(
        &self,
        agent_id: &str,
        interaction_type: Option<InteractionType>,
        limit: u32,
    ) -> StoreResult<Vec<Interaction>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, agent_id, wallet_address, interaction_type, data_json, created_at
             FROM agent_interactions
             WHERE agent_id = ?1 AND (?2 IS NULL OR interaction_type = ?2)
             ORDER BY id DESC
             LIMIT ?3",
        )?;
        let interactions = stmt
            .query_map(
                params![agent_id, interaction_type.map(|t| t.as_str()), limit],
                |row| {
                    let kind: String = row.get(3)?;
                    let data: String = row.get(4)?;
                    Ok(Interaction {
                        id: row.get(0)?,
                        agent_id: row.get(1)?,
                        wallet_address: row.get(2)?,
                        interaction_type: InteractionType::from_str(&kind)
                            .unwrap_or(InteractionType::View),
                        data: serde_json::from_str(&data).unwrap_or_default(),
                        created_at: row.get(5)?,
                    })
                },
            )?
            .filter_map(|r| r.ok())
            .collect();
        Ok(interactions)
    }

    /// Stats for an agent; all zeros when it has never been touched.
    pub fn get_agent_stats(&self, agent_id: &str) -> StoreResult<AgentStats> {
        let conn = self.conn()?;
        let stats = conn
            .query_row(
                "SELECT agent_id, views, mints, feature_uses, last_interaction_at
                 FROM agent_stats WHERE agent_id = ?1",
                [agent_id],
                |row| {
                    Ok(AgentStats {
                        agent_id: row.get(0)?,
                        views: row.get(1)?,
                        mints: row.get(2)?,
                        feature_uses: row.get(3)?,
                        last_interaction_at: row.get(4)?,
                    })
                },
            )
            .optional()?;

        Ok(stats.unwrap_or_else(|| AgentStats {
            agent_id: agent_id.to_string(),
            ..Default::default()
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn interactions_bump_stats() {
        let db = Database::new(":memory:").unwrap();
        assert_eq!(db.get_agent_stats("a").unwrap().views, 0);

        db.record_interaction("a", "w1", InteractionType::View, &Value::Null).unwrap();
        db.record_interaction("a", "w2", InteractionType::View, &Value::Null).unwrap();
        db.record_interaction("a", "w1", InteractionType::UseFeature, &json!({ "capability": "x" }))
            .unwrap();

        let stats = db.get_agent_stats("a").unwrap();
        assert_eq!((stats.views, stats.mints, stats.feature_uses), (2, 0, 1));
        assert!(stats.last_interaction_at.is_some());
    }

    #[test]
    fn list_filters_by_type_newest_first() {
        let db = Database::new(":memory:").unwrap();
        db.record_interaction("a", "w1", InteractionType::Mint, &json!({ "n": 1 })).unwrap();
        db.record_interaction("a", "w1", InteractionType::View, &Value::Null).unwrap();
        db.record_interaction("a", "w1", InteractionType::Mint, &json!({ "n": 2 })).unwrap();
        db.record_interaction("b", "w1", InteractionType::Mint, &Value::Null).unwrap();

        let mints = db.list_interactions("a", Some(InteractionType::Mint), 10).unwrap();
        assert_eq!(mints.len(), 2);
        assert_eq!(mints[0].data["n"], 2);

        let all = db.list_interactions("a", None, 2).unwrap();
        assert_eq!(all.len(), 2);
    }
}
