use actix_cors::Cors;
use actix_files::{Files, NamedFile};
use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use std::path::PathBuf;
use std::sync::Arc;

mod address;
mod config;
mod controllers;
mod db;
mod error;
mod integrations;
mod marketplace;
mod models;


use config::Config;
use db::Database;
use integrations::{
    ChainDataProvider, ChatClient, HttpMinter, MoralisClient, NftMinter, OpenAIChatClient,
};

pub struct AppState {
    pub db: Arc<Database>,
    pub config: Config,
    pub chain_data: Arc<dyn ChainDataProvider>,
    pub minter: Arc<dyn NftMinter>,
    pub chat: Arc<dyn ChatClient>,
}

/// SPA fallback handler - serves index.html for client-side routing
async fn spa_fallback(state: web::Data<AppState>) -> actix_web::Result<NamedFile> {
    let index = PathBuf::from(&state.config.frontend_dist).join("index.html");
    Ok(NamedFile::open(index)?)
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init();

    let mut config = Config::from_env();
    let port = config.port;

    log::info!("Initializing database at {}", config.database_url);
    let db = Database::new(&config.database_url).map_err(|e| {
        log::error!("Failed to initialize database: {}", e);
        std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
    })?;
    let db = Arc::new(db);

    if config.seed_catalog {
        if let Err(e) = marketplace::seed::seed_defaults(&db) {
            log::error!("[Seed] Failed to seed defaults: {}", e);
        }
    }

    let chain_data: Arc<dyn ChainDataProvider> = Arc::new(MoralisClient::from_config(&config));
    let minter: Arc<dyn NftMinter> = Arc::new(HttpMinter::new(config.mint_service_url.as_deref()));
    let chat: Arc<dyn ChatClient> = Arc::new(OpenAIChatClient::from_config(&config));

    if config.moralis_api_key.is_none() {
        log::warn!("MORALIS_API_KEY not set - wallet analytics and token info are unavailable");
    }
    if config.openai_api_key.is_none() {
        log::warn!("OPENAI_API_KEY not set - chat and AI capabilities are unavailable");
    }
    if config.mint_service_url.is_none() {
        log::warn!("MINT_SERVICE_URL not set - server-side NFT minting is unavailable");
    }

    if !config.frontend_dist.is_empty() && !std::path::Path::new(&config.frontend_dist).exists() {
        log::warn!(
            "Frontend dist not found at {} - static file serving disabled",
            config.frontend_dist
        );
        config.frontend_dist = String::new();
    }

    log::info!("Starting agent store server on port {}", port);
    if !config.frontend_dist.is_empty() {
        log::info!("Serving frontend from: {}", config.frontend_dist);
    }

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        let frontend_dist = config.frontend_dist.clone();
        let mut app = App::new()
            .app_data(web::Data::new(AppState {
                db: Arc::clone(&db),
                config: config.clone(),
                chain_data: Arc::clone(&chain_data),
                minter: Arc::clone(&minter),
                chat: Arc::clone(&chat),
            }))
            .wrap(Logger::default())
            .wrap(cors)
            .configure(controllers::configure);

        // Serve static files only if frontend dist exists
        if !frontend_dist.is_empty() {
            app = app.service(
                Files::new("/", frontend_dist)
                    .index_file("index.html")
                    .default_handler(web::to(spa_fallback)),
            );
        }

        app
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}
