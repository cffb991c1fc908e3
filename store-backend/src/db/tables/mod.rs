//! Database model modules - extends Database with domain-specific methods
//!
//! Each module adds `impl Database` blocks with methods for a specific table group.

mod agents;           // agents (personal, wallet-owned agents)
mod prebuilt_agents;  // prebuilt_agents (store catalog)
mod interactions;     // agent_interactions, agent_stats
mod mcp_services;     // mcp_services, mcp_service_integrations
