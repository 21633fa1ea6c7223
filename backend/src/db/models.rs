//! # Database Models
//!
//! This module defines the domain records stored by the repositories.
//! Each struct corresponds to a table row, with the talk carrying its
//! camp and speaker as loaded navigation values.
//!
//! ## Table Overview
//!
//! | Table | Description |
//! |-------|-------------|
//! | `camps` | Code camp events, keyed by moniker |
//! | `speakers` | People giving talks |
//! | `talks` | Presentations scheduled at a camp |
//!
//! ## Relationship Diagram
//!
//! ```text
//! ┌─────────────┐       ┌──────────────────┐       ┌──────────────┐
//! │    camps    │──────<│      talks       │>──────│   speakers   │
//! │             │       │                  │       │              │
//! │ camp_id(PK) │       │ camp_id (FK)     │       │speaker_id(PK)│
//! │ moniker(UQ) │       │ speaker_id (FK)  │       │ first_name   │
//! │ name        │       │ title            │       │ last_name    │
//! └─────────────┘       └──────────────────┘       └──────────────┘
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A code camp event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Camp {
    /// Surrogate primary key.
    pub camp_id: i32,

    /// Display name, e.g. "Atlanta Code Camp".
    pub name: String,

    /// Short unique key used in URLs, e.g. `ATL2018`.
    pub moniker: String,

    /// First day of the event.
    pub event_date: NaiveDate,

    /// Length of the event in days.
    pub length: i32,
}

/// A person who presents talks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Speaker {
    pub speaker_id: i32,
    pub first_name: String,
    pub last_name: String,
    pub middle_name: Option<String>,
    pub company: Option<String>,
    pub company_url: Option<String>,
    pub blog_url: Option<String>,
    pub twitter: Option<String>,
    pub github: Option<String>,
}

/// A presentation scheduled at a camp.
///
/// `talk_id` is `0` until the talk has been committed. The `camp` and
/// `speaker` values are only populated when the repository loaded them;
/// a committed talk always has both in storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Talk {
    pub talk_id: i32,
    pub title: String,
    pub abstract_text: String,

    /// Difficulty level, conventionally 100 to 400.
    pub level: i32,

    pub camp: Option<Camp>,
    pub speaker: Option<Speaker>,
}

impl Talk {
    /// Whether this talk has been assigned a storage id.
    pub fn is_persisted(&self) -> bool {
        self.talk_id > 0
    }
}
