use actix_web::{middleware as actix_middleware, web, App, HttpServer};
use anyhow::Context;
use mongodb::Client;

use booking_server::{
    app,
    auth_token::AuthTokenService,
    config::{AppConfig, StoreBackend},
    db::{MongoDbContext, RecordStore},
};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if it exists (for development)
    // Try loading from current directory first, then from server/ directory
    if dotenvy::dotenv().is_err() {
        dotenvy::from_filename("server/.env").ok();
    }

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    log::info!("Starting booking server...");

    // Load configuration
    let config_path = std::env::var("CONFIG_PATH")
        .unwrap_or_else(|_| "server/config/server.toml".to_string());

    let config = AppConfig::load(&config_path)
        .with_context(|| format!("failed to load configuration from '{config_path}'"))?;
    config.validate().context("invalid configuration")?;

    let auth_tokens = AuthTokenService::new(
        config.token_secret()?.as_bytes().to_vec(),
        config.token_ttl(),
    )
    .context("failed to initialise session tokens")?;

    log::info!("Session tokens expire after {:?}", auth_tokens.ttl());

    let store = match config.database.backend {
        StoreBackend::Memory => {
            log::warn!("Using in-memory record store; data is lost on restart");
            RecordStore::in_memory()
        }
        StoreBackend::Mongodb => {
            let mongodb_uri = config.mongodb_uri()?;

            log::info!("Connecting to MongoDB database '{}'...", config.database.name);
            let client = Client::with_uri_str(&mongodb_uri)
                .await
                .context("failed to create MongoDB client")?;

            let db_context = MongoDbContext::new(client, &config.database.name);

            // The driver connects lazily; a failed ping is reported but not fatal
            match db_context.ping().await {
                Ok(()) => log::info!("Pinged MongoDB deployment successfully"),
                Err(err) => log::warn!("MongoDB ping failed: {}", err),
            }

            if let Err(err) = db_context.init_indexes().await {
                log::warn!("Failed to initialize database indexes: {}", err);
            }

            RecordStore::mongo(&db_context)
        }
    };

    let store = web::Data::new(store);
    let auth_tokens = web::Data::new(auth_tokens);

    let server_host = config.server.host.clone();
    let server_port = config.server.port;

    log::info!("Starting HTTP server at {}:{}...", server_host, server_port);

    HttpServer::new(move || {
        App::new()
            // Shared state
            .app_data(store.clone())
            .app_data(auth_tokens.clone())
            // Middleware
            .wrap(actix_middleware::Logger::default())
            .wrap(actix_middleware::Compress::default())
            .configure(app::configure)
    })
    .bind((server_host, server_port))?
    .run()
    .await?;

    Ok(())
}
