//! Catalog minting and the interaction log.

use serde_json::{json, Value};

use super::catalog::prebuilt_listing;
use crate::db::Database;
use crate::error::{StoreError, StoreResult};
use crate::models::{Interaction, InteractionType, StoreListing};

/// Mint a catalog entry for `wallet`.
///
/// Minting is one-way. A repeat mint by the current owner succeeds and is
/// recorded again; a mint by any other wallet after the first is a `Conflict`.
pub fn mint_prebuilt(db: &Database, agent_id: &str, wallet: &str) -> StoreResult<StoreListing> {
    if !db.mint_prebuilt_agent(agent_id, wallet)? {
        return match db.get_prebuilt_agent(agent_id)? {
            None => Err(StoreError::not_found(format!("Agent {} not found", agent_id))),
            Some(_) => Err(StoreError::Conflict(format!(
                "Agent {} was already minted by another wallet",
                agent_id
            ))),
        };
    }

    let agent = db
        .get_prebuilt_agent(agent_id)?
        .ok_or_else(|| StoreError::not_found(format!("Agent {} not found", agent_id)))?;

    db.record_interaction(
        agent_id,
        wallet,
        InteractionType::Mint,
        &json!({ "price": agent.price }),
    )?;
    log::info!("[Mint] {} minted by {}", agent_id, wallet);

    Ok(prebuilt_listing(agent, Some(wallet)))
}

/// Record a non-mint interaction against an existing catalog entry.
pub fn record_interaction(
    db: &Database,
    agent_id: &str,
    wallet: &str,
    interaction_type: InteractionType,
    data: &Value,
) -> StoreResult<Interaction> {
    if interaction_type == InteractionType::Mint {
        return Err(StoreError::bad_request("Use the mint action to mint an agent"));
    }
    if db.get_prebuilt_agent(agent_id)?.is_none() {
        return Err(StoreError::not_found(format!("Agent {} not found", agent_id)));
    }
    db.record_interaction(agent_id, wallet, interaction_type, data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::marketplace::catalog::create_prebuilt;
    use agent_store_types::CreatePrebuiltAgentRequest;

    const OWNER: &str = "7xKXtg2CW87d97TXJSDpbD5jBkheTqA83TZRuJosgAsU";
    const OTHER: &str = "9WzDXwBbmkg8ZTbNMqUxvQRAyrZzDsGYdLVL9zYtAWWM";

    fn seeded() -> (Database, String) {
        let db = Database::new(":memory:").unwrap();
        let agent = create_prebuilt(
            &db,
            CreatePrebuiltAgentRequest {
                name: "Mintable".into(),
                description: String::new(),
                category: None,
                chain_compatibility: vec![],
                features: vec![],
                capabilities: None,
                price: Some(2.5),
                image_url: None,
            },
        )
        .unwrap();
        (db, agent.id)
    }

    #[test]
    fn mint_is_idempotent_for_owner_and_refused_for_others() {
        let (db, id) = seeded();

        let listing = mint_prebuilt(&db, &id, OWNER).unwrap();
        assert!(listing.is_owned && listing.is_minted);
        let first_date = listing.mint_date.clone();
        assert!(first_date.is_some());

        let again = mint_prebuilt(&db, &id, OWNER).unwrap();
        assert_eq!(again.mint_date, first_date);

        assert!(matches!(mint_prebuilt(&db, &id, OTHER), Err(StoreError::Conflict(_))));

        let agent = db.get_prebuilt_agent(&id).unwrap().unwrap();
        assert_eq!(agent.owner_wallet.as_deref(), Some(OWNER));

        let mints = db.list_interactions(&id, Some(InteractionType::Mint), 10).unwrap();
        assert_eq!(mints.len(), 2);
        assert_eq!(mints[0].data["price"], 2.5);
        assert_eq!(db.get_agent_stats(&id).unwrap().mints, 2);
    }

    #[test]
    fn minting_unknown_agent_is_not_found() {
        let (db, _) = seeded();
        assert!(matches!(mint_prebuilt(&db, "ghost", OWNER), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn interactions_require_existing_agent() {
        let (db, id) = seeded();
        let event = record_interaction(&db, &id, OTHER, InteractionType::UseFeature, &json!({"x": 1})).unwrap();
        assert_eq!(event.interaction_type, InteractionType::UseFeature);

        assert!(matches!(
            record_interaction(&db, "ghost", OTHER, InteractionType::View, &Value::Null),
            Err(StoreError::NotFound(_))
        ));
        assert!(matches!(
            record_interaction(&db, &id, OTHER, InteractionType::Mint, &Value::Null),
            Err(StoreError::BadRequest(_))
        ));
    }
}
