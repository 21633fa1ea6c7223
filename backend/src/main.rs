//! # Code Camp Backend Service
//!
//! HTTP service for the talks of a code camp. It provides:
//!
//! - REST API for listing, reading, creating, updating and deleting talks
//! - Health and API information endpoints
//! - PostgreSQL or in-memory storage behind one repository trait
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                        BACKEND SERVICE                           │
//! │                                                                  │
//! │  ┌───────────────────────────────────────────────────────────┐  │
//! │  │  REST API (Actix)                                          │  │
//! │  │  /api/camps/{moniker}/talks[/{id}]   /health   /           │  │
//! │  └───────────────────────────────────────────────────────────┘  │
//! │              │                 │                  │              │
//! │  ┌───────────┴───┐   ┌─────────┴──────┐   ┌──────┴──────────┐   │
//! │  │    Mapper     │   │  LinkBuilder   │   │ CampRepository  │   │
//! │  │ model <-> row │   │ Location paths │   │  + ChangeSet    │   │
//! │  └───────────────┘   └────────────────┘   └─────────────────┘   │
//! │                                                    │             │
//! │                                   ┌────────────────┴──────┐      │
//! │                                   │                       │      │
//! │                            ┌──────┴──────┐         ┌──────┴────┐ │
//! │                            │  PostgreSQL │         │  Memory   │ │
//! │                            └─────────────┘         └───────────┘ │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! 1. Copy `.env.example` to `.env` and configure
//! 2. Either point `DATABASE_URL` at PostgreSQL, or set `STORAGE_MODE=memory`
//! 3. Start the server: `cargo run`
//!
//! Migrations run at startup.
//!
//! ## Environment Variables
//!
//! See `.env.example` and [`config`] for all configuration.

use std::sync::Arc;
use actix_cors::Cors;
use actix_web::{web, App, HttpServer, middleware};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use tracing_subscriber::util::SubscriberInitExt;

mod api;
mod config;
mod db;
mod mapper;
mod models;

use config::{AppConfig, StorageMode};
use db::{CampRepository, Database, InMemoryCampRepository, PgCampRepository};

/// Application state shared across all handlers.
///
/// Handlers only read from it; every request stages its own writes in a
/// [`db::ChangeSet`].
pub struct AppState {
    /// Storage for camps, speakers and talks
    pub repository: Arc<dyn CampRepository>,

    /// Application configuration
    pub config: AppConfig,
}

/// Main entry point for the backend service.
///
/// This function:
/// 1. Loads configuration from environment
/// 2. Initializes logging
/// 3. Builds the configured repository
/// 4. Launches the HTTP server
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // =========================================
    // STEP 1: Load Configuration
    // =========================================
    dotenvy::dotenv().ok(); // It's okay if .env doesn't exist

    let config = AppConfig::from_env()
        .expect("Failed to load configuration");

    // =========================================
    // STEP 2: Initialize Logging
    // =========================================
    // try_init also forwards `log` records, so the actix Logger shows up
    let filter = EnvFilter::try_new(&config.log_level)
        .unwrap_or_else(|_| EnvFilter::new("info"));

    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .finish()
        .try_init()
        .expect("Failed to set tracing subscriber");

    info!("🚀 Starting Code Camp Backend Service");
    info!("📋 Configuration loaded");
    info!("   Storage: {}", config.storage_mode);

    // =========================================
    // STEP 3: Initialize Storage
    // =========================================
    let repository: Arc<dyn CampRepository> = match config.storage_mode {
        StorageMode::Postgres => {
            let database_url = config
                .database_url
                .as_deref()
                .expect("DATABASE_URL is required for postgres storage");

            let db = Database::connect(database_url, config.database_pool_size)
                .await
                .expect("Failed to connect to database");

            info!("🗄️  Database connected");

            // Run migrations to ensure schema is up to date
            db.run_migrations(config.seed_sample_data)
                .await
                .expect("Failed to run migrations");

            info!("📦 Database migrations complete");

            Arc::new(PgCampRepository::new(db))
        }
        StorageMode::Memory => {
            info!("🧠 Using in-memory storage, data is lost on restart");

            if config.seed_sample_data {
                Arc::new(InMemoryCampRepository::with_sample_data())
            } else {
                Arc::new(InMemoryCampRepository::new())
            }
        }
    };

    // =========================================
    // STEP 4: Create Application State
    // =========================================
    let app_state = Arc::new(AppState {
        repository,
        config: config.clone(),
    });

    // =========================================
    // STEP 5: Start HTTP Server
    // =========================================
    let bind_address = config.bind_address();
    let cors_origin = config.cors_allowed_origin.clone();

    info!("🌐 Starting HTTP server on {}", bind_address);

    HttpServer::new(move || {
        let cors = match &cors_origin {
            Some(origin) => Cors::default()
                .allowed_origin(origin)
                .allow_any_method()
                .allow_any_header(),
            None => Cors::permissive(),
        };

        App::new()
            // Attach shared application state
            .app_data(web::Data::new(app_state.clone()))

            // Add logging middleware
            .wrap(middleware::Logger::default())

            // `/talks/` and `/talks` are the same resource
            .wrap(middleware::NormalizePath::trim())

            .wrap(cors)

            // Configure API routes
            .configure(api::configure_routes)
    })
    .bind(bind_address)?
    .run()
    .await
}
