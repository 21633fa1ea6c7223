//! # In-Memory Repository
//!
//! A [`CampRepository`] that keeps camps, speakers and talks in process
//! memory behind a `tokio::sync::RwLock`. Used for local runs with
//! `STORAGE_MODE=memory` and by the endpoint tests.
//!
//! Talks are stored by foreign key, like the SQL tables, and joined back to
//! their camp and speaker on read. A change set is applied under a single
//! write lock, and is validated before anything is written so a bad change
//! leaves the store untouched.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::RwLock;
use tracing::debug;

use super::changes::{Change, ChangeSet};
use super::models::{Camp, Speaker, Talk};
use super::{CampRepository, DatabaseError};

/// A talk row as stored: foreign keys instead of loaded values.
#[derive(Debug, Clone)]
struct TalkRow {
    camp_id: i32,
    speaker_id: i32,
    title: String,
    abstract_text: String,
    level: i32,
}

#[derive(Debug, Default)]
struct Store {
    camps: BTreeMap<i32, Camp>,
    speakers: BTreeMap<i32, Speaker>,
    talks: BTreeMap<i32, TalkRow>,
    last_talk_id: i32,
}

impl Store {
    fn camp_by_moniker(&self, moniker: &str) -> Option<&Camp> {
        self.camps
            .values()
            .find(|camp| camp.moniker.eq_ignore_ascii_case(moniker))
    }

    fn to_talk(&self, talk_id: i32, row: &TalkRow, include_speaker: bool) -> Talk {
        let speaker = if include_speaker {
            self.speakers.get(&row.speaker_id).cloned()
        } else {
            None
        };

        Talk {
            talk_id,
            title: row.title.clone(),
            abstract_text: row.abstract_text.clone(),
            level: row.level,
            camp: self.camps.get(&row.camp_id).cloned(),
            speaker,
        }
    }

    /// Foreign keys of a talk about to be inserted.
    fn insert_keys(&self, talk: &Talk) -> Result<(i32, i32), DatabaseError> {
        if talk.is_persisted() {
            return Err(DatabaseError::InvalidChange(format!(
                "talk {} is already stored",
                talk.talk_id
            )));
        }
        let camp_id = talk
            .camp
            .as_ref()
            .map(|camp| camp.camp_id)
            .filter(|id| self.camps.contains_key(id))
            .ok_or_else(|| DatabaseError::InvalidChange("talk has no stored camp".to_string()))?;
        let speaker_id = talk
            .speaker
            .as_ref()
            .map(|speaker| speaker.speaker_id)
            .filter(|id| self.speakers.contains_key(id))
            .ok_or_else(|| DatabaseError::InvalidChange("talk has no stored speaker".to_string()))?;

        Ok((camp_id, speaker_id))
    }

    /// Reject the whole change set before any of it is applied.
    fn validate(&self, changes: &ChangeSet) -> Result<(), DatabaseError> {
        for change in changes.iter() {
            match change {
                Change::Add(talk) => {
                    self.insert_keys(talk)?;
                }
                Change::Update(talk) => {
                    if let Some(speaker) = &talk.speaker {
                        if !self.speakers.contains_key(&speaker.speaker_id) {
                            return Err(DatabaseError::InvalidChange(format!(
                                "speaker {} does not exist",
                                speaker.speaker_id
                            )));
                        }
                    }
                }
                Change::Delete(_) => {}
            }
        }
        Ok(())
    }
}

/// Process-local repository. Cloning shares the same store.
#[derive(Clone, Default)]
pub struct InMemoryCampRepository {
    store: Arc<RwLock<Store>>,
}

impl InMemoryCampRepository {
    /// An empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// A repository holding the Atlanta Code Camp sample data:
    /// camp `ATL2018`, two speakers and one talk by each.
    pub fn with_sample_data() -> Self {
        let mut store = Store::default();

        let atlanta = Camp {
            camp_id: 1,
            name: "Atlanta Code Camp".to_string(),
            moniker: "ATL2018".to_string(),
            event_date: NaiveDate::from_ymd_opt(2018, 10, 18).unwrap_or_default(),
            length: 1,
        };
        store.camps.insert(atlanta.camp_id, atlanta);

        for (speaker_id, first_name, blog_url, handle) in [
            (1, "Shawn", "http://wildermuth.com", "shawnwildermuth"),
            (2, "Resa", "http://shawnandresa.com", "resawildermuth"),
        ] {
            store.speakers.insert(
                speaker_id,
                Speaker {
                    speaker_id,
                    first_name: first_name.to_string(),
                    last_name: "Wildermuth".to_string(),
                    middle_name: None,
                    company: Some("Wilder Minds LLC".to_string()),
                    company_url: Some("http://wilderminds.com".to_string()),
                    blog_url: Some(blog_url.to_string()),
                    twitter: Some(handle.to_string()),
                    github: Some(handle.to_string()),
                },
            );
        }

        store.talks.insert(
            1,
            TalkRow {
                camp_id: 1,
                speaker_id: 1,
                title: "Entity Framework From Scratch".to_string(),
                abstract_text: "Entity Framework from scratch in an hour. Probably cover it all"
                    .to_string(),
                level: 100,
            },
        );
        store.talks.insert(
            2,
            TalkRow {
                camp_id: 1,
                speaker_id: 2,
                title: "Writing Sample Data Made Easy".to_string(),
                abstract_text: "Thinking of good sample data examples is tiring.".to_string(),
                level: 200,
            },
        );
        store.last_talk_id = 2;

        Self {
            store: Arc::new(RwLock::new(store)),
        }
    }

    /// Add or replace a camp.
    pub async fn insert_camp(&self, camp: Camp) {
        self.store.write().await.camps.insert(camp.camp_id, camp);
    }

    /// Add or replace a speaker.
    pub async fn insert_speaker(&self, speaker: Speaker) {
        self.store.write().await.speakers.insert(speaker.speaker_id, speaker);
    }

    /// Number of stored talks across all camps.
    pub async fn talk_count(&self) -> usize {
        self.store.read().await.talks.len()
    }
}

#[async_trait]
impl CampRepository for InMemoryCampRepository {
    async fn get_camp(&self, moniker: &str) -> Result<Option<Camp>, DatabaseError> {
        Ok(self.store.read().await.camp_by_moniker(moniker).cloned())
    }

    async fn get_talks_by_moniker(
        &self,
        moniker: &str,
        include_speakers: bool,
    ) -> Result<Vec<Talk>, DatabaseError> {
        let store = self.store.read().await;
        let Some(camp_id) = store.camp_by_moniker(moniker).map(|camp| camp.camp_id) else {
            return Ok(Vec::new());
        };

        Ok(store
            .talks
            .iter()
            .filter(|(_, row)| row.camp_id == camp_id)
            .map(|(id, row)| store.to_talk(*id, row, include_speakers))
            .collect())
    }

    async fn get_talk_by_moniker(
        &self,
        moniker: &str,
        talk_id: i32,
        include_speakers: bool,
    ) -> Result<Option<Talk>, DatabaseError> {
        let store = self.store.read().await;
        let Some(camp_id) = store.camp_by_moniker(moniker).map(|camp| camp.camp_id) else {
            return Ok(None);
        };

        Ok(store
            .talks
            .get(&talk_id)
            .filter(|row| row.camp_id == camp_id)
            .map(|row| store.to_talk(talk_id, row, include_speakers)))
    }

    async fn get_speaker(&self, speaker_id: i32) -> Result<Option<Speaker>, DatabaseError> {
        Ok(self.store.read().await.speakers.get(&speaker_id).cloned())
    }

    async fn save_changes(&self, changes: &mut ChangeSet) -> Result<bool, DatabaseError> {
        let mut store = self.store.write().await;
        store.validate(changes)?;

        let mut affected = 0usize;
        for change in changes.iter_mut() {
            match change {
                Change::Add(talk) => {
                    let (camp_id, speaker_id) = store.insert_keys(talk)?;
                    store.last_talk_id += 1;
                    let talk_id = store.last_talk_id;
                    store.talks.insert(
                        talk_id,
                        TalkRow {
                            camp_id,
                            speaker_id,
                            title: talk.title.clone(),
                            abstract_text: talk.abstract_text.clone(),
                            level: talk.level,
                        },
                    );
                    talk.talk_id = talk_id;
                    affected += 1;
                }
                Change::Update(talk) => {
                    if let Some(row) = store.talks.get_mut(&talk.talk_id) {
                        row.title = talk.title.clone();
                        row.abstract_text = talk.abstract_text.clone();
                        row.level = talk.level;
                        if let Some(speaker) = &talk.speaker {
                            row.speaker_id = speaker.speaker_id;
                        }
                        affected += 1;
                    }
                }
                Change::Delete(talk) => {
                    if store.talks.remove(&talk.talk_id).is_some() {
                        affected += 1;
                    }
                }
            }
        }

        debug!("In-memory commit: {} change(s), {} affected", changes.len(), affected);
        Ok(affected > 0)
    }

    async fn is_healthy(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn sample() -> (InMemoryCampRepository, Camp, Speaker) {
        let repository = InMemoryCampRepository::with_sample_data();
        let camp = repository.get_camp("ATL2018").await.unwrap().unwrap();
        let speaker = repository.get_speaker(1).await.unwrap().unwrap();
        (repository, camp, speaker)
    }

    fn new_talk(camp: &Camp, speaker: &Speaker) -> Talk {
        Talk {
            talk_id: 0,
            title: "Async Rust in Practice".to_string(),
            abstract_text: "Futures, executors and the things in between.".to_string(),
            level: 300,
            camp: Some(camp.clone()),
            speaker: Some(speaker.clone()),
        }
    }

    #[actix_rt::test]
    async fn test_camp_lookup_ignores_case() {
        let (repository, _, _) = sample().await;
        assert!(repository.get_camp("atl2018").await.unwrap().is_some());
        assert!(repository.get_camp("NYC2019").await.unwrap().is_none());
    }

    #[actix_rt::test]
    async fn test_talks_for_unknown_camp_are_empty() {
        let (repository, _, _) = sample().await;
        let talks = repository.get_talks_by_moniker("NYC2019", true).await.unwrap();
        assert!(talks.is_empty());
    }

    #[actix_rt::test]
    async fn test_include_speakers_controls_expansion() {
        let (repository, _, _) = sample().await;

        let with = repository.get_talk_by_moniker("ATL2018", 1, true).await.unwrap().unwrap();
        assert_eq!(with.speaker.map(|s| s.first_name), Some("Shawn".to_string()));
        assert_eq!(with.camp.map(|c| c.moniker), Some("ATL2018".to_string()));

        let without = repository.get_talk_by_moniker("ATL2018", 1, false).await.unwrap().unwrap();
        assert!(without.speaker.is_none());
    }

    #[actix_rt::test]
    async fn test_talk_is_scoped_to_its_camp() {
        let (repository, _, _) = sample().await;
        repository
            .insert_camp(Camp {
                camp_id: 2,
                name: "Nashville Code Camp".to_string(),
                moniker: "NASH2019".to_string(),
                event_date: NaiveDate::from_ymd_opt(2019, 4, 6).unwrap(),
                length: 2,
            })
            .await;

        assert!(repository.get_talk_by_moniker("NASH2019", 1, true).await.unwrap().is_none());
    }

    #[actix_rt::test]
    async fn test_add_assigns_increasing_ids() {
        let (repository, camp, speaker) = sample().await;

        let mut changes = ChangeSet::new();
        changes.add(new_talk(&camp, &speaker));
        changes.add(new_talk(&camp, &speaker));
        assert!(repository.save_changes(&mut changes).await.unwrap());

        let ids: Vec<i32> = changes.into_added().iter().map(|t| t.talk_id).collect();
        assert_eq!(ids, vec![3, 4]);
        assert_eq!(repository.talk_count().await, 4);
    }

    #[actix_rt::test]
    async fn test_invalid_add_leaves_store_untouched() {
        let (repository, camp, speaker) = sample().await;

        let mut orphan = new_talk(&camp, &speaker);
        orphan.speaker = None;

        let mut changes = ChangeSet::new();
        changes.add(new_talk(&camp, &speaker));
        changes.add(orphan);

        let result = repository.save_changes(&mut changes).await;
        assert!(matches!(result, Err(DatabaseError::InvalidChange(_))));
        assert_eq!(repository.talk_count().await, 2);
    }

    #[actix_rt::test]
    async fn test_add_of_stored_talk_is_rejected() {
        let (repository, _, _) = sample().await;
        let stored = repository.get_talk_by_moniker("ATL2018", 1, true).await.unwrap().unwrap();

        let mut changes = ChangeSet::new();
        changes.add(stored);

        let result = repository.save_changes(&mut changes).await;
        assert!(matches!(result, Err(DatabaseError::InvalidChange(_))));
        assert_eq!(repository.talk_count().await, 2);
    }

    #[actix_rt::test]
    async fn test_update_and_delete_of_missing_talk_affect_nothing() {
        let (repository, camp, speaker) = sample().await;

        let mut ghost = new_talk(&camp, &speaker);
        ghost.talk_id = 99;

        let mut changes = ChangeSet::new();
        changes.update(ghost.clone());
        changes.delete(ghost);
        assert!(!repository.save_changes(&mut changes).await.unwrap());

        let mut empty = ChangeSet::new();
        assert!(!repository.save_changes(&mut empty).await.unwrap());
    }

    #[actix_rt::test]
    async fn test_update_keeps_speaker_when_not_loaded() {
        let (repository, _, _) = sample().await;

        let mut talk = repository.get_talk_by_moniker("ATL2018", 2, false).await.unwrap().unwrap();
        talk.level = 400;

        let mut changes = ChangeSet::new();
        changes.update(talk);
        assert!(repository.save_changes(&mut changes).await.unwrap());

        let stored = repository.get_talk_by_moniker("ATL2018", 2, true).await.unwrap().unwrap();
        assert_eq!(stored.level, 400);
        assert_eq!(stored.speaker.map(|s| s.speaker_id), Some(2));
    }
}
