//! # Database Queries
//!
//! This module contains all the SQL for the camps, speakers and talks
//! tables. Reads take the pool and check out their own connection; writes
//! take an open transaction so a whole change set commits or rolls back
//! together.
//!
//! ## Query Organization
//!
//! - `camp_*` / `speaker_*` - lookups by key
//! - `talk_*` - talk reads and the three write statements
//!
//! ## Error Handling
//!
//! All queries return `Result<T, DatabaseError>`. Missing rows are
//! `Ok(None)` (or an empty `Vec`), never an error.

use deadpool_postgres::Pool;
use tokio_postgres::{Row, Transaction};
use tracing::debug;

use super::models::*;
use super::DatabaseError;

/// Columns selected for every talk read, joined with its camp and speaker.
const TALK_SELECT: &str = r#"
    SELECT
        t.talk_id, t.title, t.abstract_text, t.level,
        c.camp_id, c.name, c.moniker, c.event_date, c.length,
        s.speaker_id, s.first_name, s.last_name, s.middle_name,
        s.company, s.company_url, s.blog_url, s.twitter, s.github
    FROM talks t
    JOIN camps c ON c.camp_id = t.camp_id
    JOIN speakers s ON s.speaker_id = t.speaker_id
"#;

// ============================================
// HELPER FUNCTIONS
// ============================================

async fn client(pool: &Pool) -> Result<deadpool_postgres::Client, DatabaseError> {
    pool.get()
        .await
        .map_err(|e| DatabaseError::ConnectionError(e.to_string()))
}

fn row_to_camp(row: &Row) -> Result<Camp, DatabaseError> {
    Ok(Camp {
        camp_id: row.try_get("camp_id")?,
        name: row.try_get("name")?,
        moniker: row.try_get("moniker")?,
        event_date: row.try_get("event_date")?,
        length: row.try_get("length")?,
    })
}

fn row_to_speaker(row: &Row) -> Result<Speaker, DatabaseError> {
    Ok(Speaker {
        speaker_id: row.try_get("speaker_id")?,
        first_name: row.try_get("first_name")?,
        last_name: row.try_get("last_name")?,
        middle_name: row.try_get("middle_name")?,
        company: row.try_get("company")?,
        company_url: row.try_get("company_url")?,
        blog_url: row.try_get("blog_url")?,
        twitter: row.try_get("twitter")?,
        github: row.try_get("github")?,
    })
}

/// Build a talk from a `TALK_SELECT` row.
fn row_to_talk(row: &Row, include_speaker: bool) -> Result<Talk, DatabaseError> {
    let speaker = if include_speaker {
        Some(row_to_speaker(row)?)
    } else {
        None
    };

    Ok(Talk {
        talk_id: row.try_get("talk_id")?,
        title: row.try_get("title")?,
        abstract_text: row.try_get("abstract_text")?,
        level: row.try_get("level")?,
        camp: Some(row_to_camp(row)?),
        speaker,
    })
}

// ============================================
// CAMP AND SPEAKER QUERIES
// ============================================

/// Get a camp by moniker (case-insensitive).
pub async fn camp_by_moniker(pool: &Pool, moniker: &str) -> Result<Option<Camp>, DatabaseError> {
    debug!("Fetching camp: {}", moniker);

    let client = client(pool).await?;
    let row = client
        .query_opt(
            r#"
            SELECT camp_id, name, moniker, event_date, length
            FROM camps
            WHERE LOWER(moniker) = LOWER($1)
            "#,
            &[&moniker],
        )
        .await?;

    row.as_ref().map(row_to_camp).transpose()
}

/// Get a speaker by id.
pub async fn speaker_by_id(pool: &Pool, speaker_id: i32) -> Result<Option<Speaker>, DatabaseError> {
    debug!("Fetching speaker: {}", speaker_id);

    let client = client(pool).await?;
    let row = client
        .query_opt(
            r#"
            SELECT speaker_id, first_name, last_name, middle_name,
                   company, company_url, blog_url, twitter, github
            FROM speakers
            WHERE speaker_id = $1
            "#,
            &[&speaker_id],
        )
        .await?;

    row.as_ref().map(row_to_speaker).transpose()
}

// ============================================
// TALK QUERIES
// ============================================

/// All talks of a camp, oldest first.
pub async fn talks_by_moniker(
    pool: &Pool,
    moniker: &str,
    include_speakers: bool,
) -> Result<Vec<Talk>, DatabaseError> {
    debug!("Fetching talks for camp: {}", moniker);

    let client = client(pool).await?;
    let sql = format!(
        "{} WHERE LOWER(c.moniker) = LOWER($1) ORDER BY t.talk_id",
        TALK_SELECT
    );
    let rows = client.query(sql.as_str(), &[&moniker]).await?;

    rows.iter()
        .map(|row| row_to_talk(row, include_speakers))
        .collect()
}

/// One talk, scoped to its camp.
pub async fn talk_by_moniker(
    pool: &Pool,
    moniker: &str,
    talk_id: i32,
    include_speakers: bool,
) -> Result<Option<Talk>, DatabaseError> {
    debug!("Fetching talk {} for camp: {}", talk_id, moniker);

    let client = client(pool).await?;
    let sql = format!(
        "{} WHERE LOWER(c.moniker) = LOWER($1) AND t.talk_id = $2",
        TALK_SELECT
    );
    let row = client.query_opt(sql.as_str(), &[&moniker, &talk_id]).await?;

    row.as_ref()
        .map(|row| row_to_talk(row, include_speakers))
        .transpose()
}

/// Insert a talk and return its generated id.
pub async fn insert_talk(tx: &Transaction<'_>, talk: &Talk) -> Result<i32, DatabaseError> {
    let camp_id = talk
        .camp
        .as_ref()
        .map(|camp| camp.camp_id)
        .ok_or_else(|| DatabaseError::InvalidChange("talk has no camp".to_string()))?;
    let speaker_id = talk
        .speaker
        .as_ref()
        .map(|speaker| speaker.speaker_id)
        .ok_or_else(|| DatabaseError::InvalidChange("talk has no speaker".to_string()))?;

    let row = tx
        .query_one(
            r#"
            INSERT INTO talks (camp_id, speaker_id, title, abstract_text, level)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING talk_id
            "#,
            &[&camp_id, &speaker_id, &talk.title, &talk.abstract_text, &talk.level],
        )
        .await?;

    Ok(row.try_get("talk_id")?)
}

/// Overwrite a talk's fields. A talk without a loaded speaker keeps its
/// stored speaker.
pub async fn update_talk(tx: &Transaction<'_>, talk: &Talk) -> Result<u64, DatabaseError> {
    let speaker_id: Option<i32> = talk.speaker.as_ref().map(|speaker| speaker.speaker_id);

    let rows = tx
        .execute(
            r#"
            UPDATE talks
            SET title = $2,
                abstract_text = $3,
                level = $4,
                speaker_id = COALESCE($5, speaker_id)
            WHERE talk_id = $1
            "#,
            &[&talk.talk_id, &talk.title, &talk.abstract_text, &talk.level, &speaker_id],
        )
        .await?;

    Ok(rows)
}

/// Remove a talk by id.
pub async fn delete_talk(tx: &Transaction<'_>, talk_id: i32) -> Result<u64, DatabaseError> {
    let rows = tx
        .execute("DELETE FROM talks WHERE talk_id = $1", &[&talk_id])
        .await?;

    Ok(rows)
}
