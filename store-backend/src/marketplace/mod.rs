//! Marketplace logic: catalog reads, capability gating, minting and deployment.
//!
//! Handlers in `controllers` stay thin and call into these functions.

pub mod catalog;
pub mod deploy;
pub mod gate;
pub mod mint;
pub mod seed;
pub mod templates;
