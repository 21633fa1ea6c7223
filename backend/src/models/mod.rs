//! # API Models
//!
//! This module defines the structures exchanged over HTTP.
//! These are separate from database records to allow API-specific
//! formatting and partial updates.
//!
//! ## Organization
//!
//! - `talk.rs` - Talk and speaker representations
//! - `responses.rs` - Response envelope and health payload
//!
//! ## Serialization
//!
//! All models use Serde for JSON serialization/deserialization.
//! Field names are converted to camelCase for JavaScript clients.

pub mod responses;
pub mod talk;

pub use responses::*;
pub use talk::*;
