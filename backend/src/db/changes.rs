//! # Change Sets
//!
//! Writes are staged in a [`ChangeSet`] and committed together with
//! [`CampRepository::save_changes`](super::CampRepository::save_changes).
//! A change set is an ordinary per-request value, so nothing staged by one
//! request is visible to another until it is committed.
//!
//! ```rust,ignore
//! let mut changes = ChangeSet::new();
//! changes.add(talk);
//! if repository.save_changes(&mut changes).await? {
//!     let created = changes.into_added();
//! }
//! ```

use super::models::Talk;

/// A single staged write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    /// Insert a new talk. Its `talk_id` is filled in on commit.
    Add(Talk),
    /// Overwrite the stored talk with the same id.
    Update(Talk),
    /// Remove the stored talk with the same id.
    Delete(Talk),
}

/// Ordered list of staged writes.
#[derive(Debug, Default)]
pub struct ChangeSet {
    changes: Vec<Change>,
}

impl ChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage a talk for insertion.
    pub fn add(&mut self, talk: Talk) {
        self.changes.push(Change::Add(talk));
    }

    /// Stage new field values for an existing talk.
    pub fn update(&mut self, talk: Talk) {
        self.changes.push(Change::Update(talk));
    }

    /// Stage removal of an existing talk.
    pub fn delete(&mut self, talk: Talk) {
        self.changes.push(Change::Delete(talk));
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Change> {
        self.changes.iter()
    }

    /// Mutable access for repositories writing generated ids back.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Change> {
        self.changes.iter_mut()
    }

    /// Consume the set, keeping only the inserted talks in staging order.
    pub fn into_added(self) -> Vec<Talk> {
        self.changes
            .into_iter()
            .filter_map(|change| match change {
                Change::Add(talk) => Some(talk),
                _ => None,
            })
            .collect()
    }
}
