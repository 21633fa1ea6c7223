//! # REST API Module
//!
//! This module defines all HTTP endpoints for the Code Camp API.
//!
//! ## Endpoint Overview
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/api/camps/{moniker}/talks` | List talks |
//! | GET | `/api/camps/{moniker}/talks/{id}` | Get a talk |
//! | POST | `/api/camps/{moniker}/talks` | Create a talk |
//! | PUT | `/api/camps/{moniker}/talks/{id}` | Update a talk |
//! | DELETE | `/api/camps/{moniker}/talks/{id}` | Delete a talk |
//! | GET | `/health` | Health check |
//!
//! ## Request/Response Format
//!
//! Talks are sent and returned as bare JSON objects. Errors use the
//! service envelope:
//!
//! ```json
//! {
//!     "success": false,
//!     "error": {
//!         "code": "NOT_FOUND",
//!         "message": "Talk does not exist."
//!     }
//! }
//! ```

pub mod error;
pub mod handlers;
pub mod links;
pub mod routes;
pub mod talks;

pub use routes::configure_routes;
