//! # API Route Configuration
//!
//! This module sets up all the HTTP routes for the API.

use actix_web::web;

use super::error::json_error_handler;
use super::{handlers, talks};

/// Name of the single-talk route, used to build `Location` headers.
pub const GET_TALK_ROUTE: &str = "get_talk";

/// Configure all API routes.
///
/// This function is called from main.rs to set up
/// all the endpoint routes.
///
/// ## Route Structure
///
/// ```text
/// /                                   GET - API information
/// ├── /health                         GET - Health check
/// └── /api/camps/{moniker}/talks
///     ├── /                           GET - List talks, POST - Create talk
///     └── /{id}                       GET, PUT, DELETE - One talk
/// ```
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg
        // Malformed JSON bodies get the same envelope as other errors
        .app_data(web::JsonConfig::default().error_handler(json_error_handler))

        // Root endpoint - API information
        .route("/", web::get().to(handlers::api_info))

        // Health check endpoint
        .route("/health", web::get().to(handlers::health_check))

        // Talk endpoints
        .service(
            web::scope("/api/camps/{moniker}/talks")
                .service(
                    web::resource("")
                        .route(web::get().to(talks::list_talks))
                        .route(web::post().to(talks::create_talk)),
                )
                .service(
                    web::resource(r"/{id:\d+}")
                        .name(GET_TALK_ROUTE)
                        .route(web::get().to(talks::get_talk))
                        .route(web::put().to(talks::update_talk))
                        .route(web::delete().to(talks::delete_talk)),
                ),
        );
}
