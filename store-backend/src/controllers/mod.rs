pub mod agent_store;
pub mod agents;
pub mod chat;
pub mod health;
pub mod prebuilt_agents;
pub mod tools;
pub mod wallet;

use actix_web::{error, web};

use crate::error::StoreError;

/// Register every API route plus extractor error handlers that answer with
/// the standard envelope instead of actix's plain-text bodies.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        error::Error::from(StoreError::bad_request(format!("Invalid request body: {}", err)))
    }))
    .app_data(web::QueryConfig::default().error_handler(|err, _req| {
        error::Error::from(StoreError::bad_request(format!("Invalid query string: {}", err)))
    }));

    health::config(cfg);
    agents::config(cfg);
    agent_store::config(cfg);
    prebuilt_agents::config(cfg);
    wallet::config(cfg);
    chat::config(cfg);
    tools::config(cfg);
}
