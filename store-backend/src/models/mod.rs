pub mod agent;
pub mod catalog;

pub use agent::{AgentListQuery, NewAgent};
pub use catalog::CatalogFilter;

pub use agent_store_types::{
    Agent, AgentStats, AgentStatus, Capability, Interaction, InteractionType, McpService,
    PrebuiltAgent, StoreListing,
};
