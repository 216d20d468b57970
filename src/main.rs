//! GuildLink Backend
//!
//! A REST backend that links platform users to external chat-service
//! accounts, mirrors linkage into guild membership, and serves cached
//! guild metadata.

mod api;
mod auth;
mod cache;
mod config;
mod db;
mod discord;
mod errors;
mod linker;
mod models;

use std::sync::{Arc, RwLock};

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cache::GuildCache;
use config::Config;
use db::Repository;
use discord::{ChatService, DiscordClient};
use linker::Linker;
use models::LinkConfig;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
    pub chat: Arc<dyn ChatService>,
    pub guilds: Arc<GuildCache>,
    pub linker: Arc<Linker>,
    pub config: Arc<Config>,
    link_config: Arc<RwLock<Arc<LinkConfig>>>,
    config_update: Arc<tokio::sync::Mutex<()>>,
}

impl AppState {
    pub fn new(
        repo: Arc<Repository>,
        chat: Arc<dyn ChatService>,
        link_config: LinkConfig,
        config: Arc<Config>,
    ) -> Self {
        Self {
            linker: Arc::new(Linker::new(repo.clone(), chat.clone())),
            guilds: Arc::new(GuildCache::new()),
            link_config: Arc::new(RwLock::new(Arc::new(link_config))),
            config_update: Arc::new(tokio::sync::Mutex::new(())),
            repo,
            chat,
            config,
        }
    }

    /// Snapshot of the runtime configuration at request start.
    ///
    /// Readers always see a complete old or new value, never a partial
    /// update; a request keeps working with the snapshot it took.
    pub fn link_snapshot(&self) -> Arc<LinkConfig> {
        self.link_config
            .read()
            .expect("link config lock poisoned")
            .clone()
    }

    /// Persist and publish a new runtime configuration.
    ///
    /// Persist and swap are serialized so the in-memory snapshot can never
    /// diverge from the stored document when updates race each other.
    pub async fn replace_link_config(
        &self,
        new_config: LinkConfig,
    ) -> Result<(), crate::errors::AppError> {
        let _guard = self.config_update.lock().await;
        self.repo.set_link_config(&new_config).await?;
        *self
            .link_config
            .write()
            .expect("link config lock poisoned") = Arc::new(new_config);
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env();

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting GuildLink Backend");
    tracing::info!("Database path: {:?}", config.db_path);
    tracing::info!("Bind address: {}", config.bind_addr);

    // Warn if PSK is not configured
    if config.api_psk.is_none() {
        tracing::warn!("No API PSK configured (GUILDLINK_API_PSK). Authentication is disabled!");
    }
    if config.discord.bot_token.is_empty() {
        tracing::warn!("No Discord bot token configured (GUILDLINK_DISCORD_BOT_TOKEN)");
    }

    // Initialize database
    let pool = db::init_database(&config.db_path).await?;
    let repo = Arc::new(Repository::new(pool));

    // Outbound chat-service client
    let chat: Arc<dyn ChatService> = Arc::new(DiscordClient::new(config.discord.clone()));

    // Bootstrap the runtime configuration singleton
    let link_config = match repo.get_link_config().await? {
        Some(stored) => stored,
        None => {
            tracing::info!("No runtime configuration found, seeding an empty one");
            let empty = LinkConfig::default();
            repo.set_link_config(&empty).await?;
            empty
        }
    };

    // Create application state
    let state = AppState::new(repo, chat, link_config, Arc::new(config.clone()));

    // Build router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Clone PSK for the auth layer
    let psk = state.config.api_psk.clone();

    // API routes
    let api_routes = Router::new()
        // Runtime configuration (admin only)
        .route("/config", get(api::get_config))
        .route("/config", post(api::update_config))
        // Guild metadata
        .route("/guilds", get(api::list_guilds))
        // Caller identity and settings
        .route("/user", get(api::current_user))
        .route("/settings", get(api::get_settings))
        // Account linkage
        .route(
            "/discord/{code}",
            post(api::link_account).delete(api::unlink_account),
        )
        // Apply gateway auth + identity middleware
        .layer(middleware::from_fn(move |req, next| {
            auth::identity_layer(psk.clone(), req, next)
        }));

    // Health check (no auth required)
    let health_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
