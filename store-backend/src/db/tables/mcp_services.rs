//! Tool service catalog and per-agent integrations

use chrono::Utc;
use rusqlite::{params, OptionalExtension};

use super::super::Database;
use crate::error::StoreResult;
use crate::models::McpService;

impl Database {
    pub fn upsert_mcp_service(&self, service: &McpService) -> StoreResult<()> {
        let conn = self.conn()?;
        let now = Utc::now().to_rfc3339();
        conn.execute(
            "INSERT INTO mcp_services (id, name, description, endpoint, category, enabled, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                description = excluded.description,
                endpoint = excluded.endpoint,
                category = excluded.category,
                enabled = excluded.enabled",
            params![
                service.id,
                service.name,
                service.description,
                service.endpoint,
                service.category,
                service.enabled as i32,
                now,
            ],
        )?;
        Ok(())
    }

    /// Enabled services. With an agent id, each entry carries whether that agent integrated it.
    pub fn list_mcp_services(&self, agent_id: Option<&str>) -> StoreResult<Vec<McpService>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT s.id, s.name, s.description, s.endpoint, s.category, s.enabled,
                    COALESCE(i.enabled, 0)
             FROM mcp_services s
             LEFT JOIN mcp_service_integrations i
               ON i.service_id = s.id AND i.agent_id = ?1
             WHERE s.enabled = 1
             ORDER BY s.category, s.name",
        )?;
        let services = stmt
            .query_map([agent_id], |row| {
                let integrated = row.get::<_, i32>(6)? != 0;
                Ok(McpService {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    description: row.get(2)?,
                    endpoint: row.get(3)?,
                    category: row.get(4)?,
                    enabled: row.get::<_, i32>(5)? != 0,
                    integrated: agent_id.map(|_| integrated),
                })
            })?
            .filter_map(|r| r.ok())
            .collect();
        Ok(services)
    }

    /// Enable or disable a service for an agent. Returns false when the service does not exist.
    pub fn set_service_integration(
        &self,
        agent_id: &str,
        service_id: &str,
        enabled: bool,
    ) -> StoreResult<bool> {
        let conn = self.conn()?;
        let exists: Option<i64> = conn
            .query_row("SELECT 1 FROM mcp_services WHERE id = ?1", [service_id], |row| row.get(0))
            .optional()?;
        if exists.is_none() {
            return Ok(false);
        }

        let now = Utc::now().to_rfc3339();
        conn.execute(
            "INSERT INTO mcp_service_integrations (agent_id, service_id, enabled, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?4)
             ON CONFLICT(agent_id, service_id) DO UPDATE SET
                enabled = excluded.enabled,
                updated_at = excluded.updated_at",
            params![agent_id, service_id, enabled as i32, now],
        )?;
        Ok(true)
    }

    pub fn count_mcp_services(&self) -> StoreResult<i64> {
        let conn = self.conn()?;
        let count = conn.query_row("SELECT COUNT(*) FROM mcp_services", [], |row| row.get(0))?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(id: &str, enabled: bool) -> McpService {
        McpService {
            id: id.to_string(),
            name: id.to_uppercase(),
            description: String::new(),
            endpoint: format!("https://tools.example/{}", id),
            category: "data".to_string(),
            enabled,
            integrated: None,
        }
    }

    #[test]
    fn lists_enabled_services_with_integration_flag() {
        let db = Database::new(":memory:").unwrap();
        db.upsert_mcp_service(&service("prices", true)).unwrap();
        db.upsert_mcp_service(&service("news", true)).unwrap();
        db.upsert_mcp_service(&service("legacy", false)).unwrap();
        assert_eq!(db.count_mcp_services().unwrap(), 3);

        let plain = db.list_mcp_services(None).unwrap();
        assert_eq!(plain.len(), 2);
        assert!(plain.iter().all(|s| s.integrated.is_none()));

        assert!(db.set_service_integration("agent-1", "prices", true).unwrap());
        assert!(!db.set_service_integration("agent-1", "missing", true).unwrap());

        let for_agent = db.list_mcp_services(Some("agent-1")).unwrap();
        let prices = for_agent.iter().find(|s| s.id == "prices").unwrap();
        let news = for_agent.iter().find(|s| s.id == "news").unwrap();
        assert_eq!(prices.integrated, Some(true));
        assert_eq!(news.integrated, Some(false));

        // Toggling off keeps the row but clears the flag
        db.set_service_integration("agent-1", "prices", false).unwrap();
        let for_agent = db.list_mcp_services(Some("agent-1")).unwrap();
        assert_eq!(
            for_agent.iter().find(|s| s.id == "prices").unwrap().integrated,
            Some(false)
        );
    }
}
