//! PostgreSQL-backed [`CampRepository`].

use async_trait::async_trait;
use tracing::{debug, info};

use super::changes::{Change, ChangeSet};
use super::models::{Camp, Speaker, Talk};
use super::{queries, CampRepository, Database, DatabaseError};

/// Repository over the `camps`, `speakers` and `talks` tables.
#[derive(Clone)]
pub struct PgCampRepository {
    db: Database,
}

impl PgCampRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CampRepository for PgCampRepository {
    async fn get_camp(&self, moniker: &str) -> Result<Option<Camp>, DatabaseError> {
        queries::camp_by_moniker(self.db.pool(), moniker).await
    }

    async fn get_talks_by_moniker(
        &self,
        moniker: &str,
        include_speakers: bool,
    ) -> Result<Vec<Talk>, DatabaseError> {
        queries::talks_by_moniker(self.db.pool(), moniker, include_speakers).await
    }

    async fn get_talk_by_moniker(
        &self,
        moniker: &str,
        talk_id: i32,
        include_speakers: bool,
    ) -> Result<Option<Talk>, DatabaseError> {
        queries::talk_by_moniker(self.db.pool(), moniker, talk_id, include_speakers).await
    }

    async fn get_speaker(&self, speaker_id: i32) -> Result<Option<Speaker>, DatabaseError> {
        queries::speaker_by_id(self.db.pool(), speaker_id).await
    }

    async fn save_changes(&self, changes: &mut ChangeSet) -> Result<bool, DatabaseError> {
        if changes.is_empty() {
            return Ok(false);
        }

        let mut client = self
            .db
            .pool()
            .get()
            .await
            .map_err(|e| DatabaseError::ConnectionError(e.to_string()))?;
        let tx = client.transaction().await?;

        let mut affected: u64 = 0;
        let mut generated: Vec<i32> = Vec::new();

        for change in changes.iter() {
            match change {
                Change::Add(talk) if talk.is_persisted() => {
                    return Err(DatabaseError::InvalidChange(format!(
                        "talk {} is already stored",
                        talk.talk_id
                    )));
                }
                Change::Add(talk) => {
                    generated.push(queries::insert_talk(&tx, talk).await?);
                    affected += 1;
                }
                Change::Update(talk) => affected += queries::update_talk(&tx, talk).await?,
                Change::Delete(talk) => affected += queries::delete_talk(&tx, talk.talk_id).await?,
            }
        }

        tx.commit().await?;

        // Ids are written back only after a successful commit
        let mut ids = generated.into_iter();
        for change in changes.iter_mut() {
            if let Change::Add(talk) = change {
                if let Some(id) = ids.next() {
                    talk.talk_id = id;
                }
            }
        }

        if affected > 0 {
            info!("Committed {} change(s), {} row(s) affected", changes.len(), affected);
        } else {
            debug!("Commit of {} change(s) affected no rows", changes.len());
        }

        Ok(affected > 0)
    }

    async fn is_healthy(&self) -> bool {
        match self.db.pool().get().await {
            Ok(client) => client.query_one("SELECT 1", &[]).await.is_ok(),
            Err(_) => false,
        }
    }
}
