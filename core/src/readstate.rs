//! Read/unread tracking for operator notifications.
//!
//! Each channel keeps a persisted set of ids the operator has seen. Unread
//! counts are always recomputed from the current item list, so ids that no
//! longer appear upstream stop counting without any cleanup pass.

use std::collections::HashSet;
use std::sync::Arc;

use crate::profile::{keys, ProfileStore};
use crate::Result;

/// Notification channel with its own persisted read set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Announcements,
    Feedback,
}

impl Channel {
    pub fn storage_key(self) -> &'static str {
        match self {
            Channel::Announcements => keys::READ_ANNOUNCEMENTS,
            Channel::Feedback => keys::READ_FEEDBACKS,
        }
    }
}

pub struct ReadStateStore {
    profile: Arc<ProfileStore>,
}

impl ReadStateStore {
    pub fn new(profile: Arc<ProfileStore>) -> Self {
        Self { profile }
    }

    /// Ids the operator has already seen. A missing or corrupt set is empty.
    pub fn read_ids(&self, channel: Channel) -> HashSet<String> {
        let ids: Vec<String> = self.profile.get_or_default(channel.storage_key());
        ids.into_iter().collect()
    }

    /// Marks one id as read. Marking an already-read id changes nothing.
    pub fn mark_read(&self, channel: Channel, id: &str) -> Result<()> {
        let mut ids = self.read_ids(channel);
        if !ids.insert(id.to_string()) {
            return Ok(());
        }
        self.persist(channel, ids)
    }

    /// Merges all given ids into the read set.
    pub fn mark_all_read<I>(&self, channel: Channel, ids: I) -> Result<()>
    where
        I: IntoIterator<Item = String>,
    {
        let mut set = self.read_ids(channel);
        let before = set.len();
        set.extend(ids);
        if set.len() == before {
            return Ok(());
        }
        self.persist(channel, set)
    }

    /// Number of ids in `ids` not yet marked read.
    pub fn unread_count<'a, I>(&self, channel: Channel, ids: I) -> usize
    where
        I: IntoIterator<Item = &'a str>,
    {
        let read = self.read_ids(channel);
        ids.into_iter().filter(|id| !read.contains(*id)).count()
    }

    fn persist(&self, channel: Channel, ids: HashSet<String>) -> Result<()> {
        let mut ids: Vec<String> = ids.into_iter().collect();
        ids.sort();
        self.profile.put(channel.storage_key(), &ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> (tempfile::TempDir, ReadStateStore) {
        let dir = tempfile::tempdir().expect("tempdir");
        let profile = Arc::new(ProfileStore::new(dir.path()).expect("profile store"));
        (dir, ReadStateStore::new(profile))
    }

    #[test]
    fn mark_read_is_idempotent() {
        let (_dir, store) = store();

        store.mark_read(Channel::Announcements, "a1").expect("mark");
        store.mark_read(Channel::Announcements, "a1").expect("mark again");

        let ids = store.read_ids(Channel::Announcements);
        assert_eq!(ids.len(), 1);
        assert!(ids.contains("a1"));
    }

    #[test]
    fn channels_do_not_share_read_sets() {
        let (_dir, store) = store();

        store.mark_read(Channel::Announcements, "x").expect("mark");
        assert!(store.read_ids(Channel::Feedback).is_empty());
    }

    #[test]
    fn mark_all_read_unions_with_existing_set() {
        let (_dir, store) = store();

        store.mark_read(Channel::Feedback, "f1").expect("mark");
        store
            .mark_all_read(Channel::Feedback, vec!["f2".to_string(), "f3".to_string()])
            .expect("mark all");

        let ids = store.read_ids(Channel::Feedback);
        assert_eq!(ids.len(), 3);
    }

    #[test]
    fn unread_count_follows_the_current_item_list() {
        let (_dir, store) = store();

        store.mark_read(Channel::Announcements, "a1").expect("mark");
        store.mark_read(Channel::Announcements, "gone").expect("mark");

        // "gone" is read but absent upstream, so it does not affect the count
        let items = ["a1", "a2", "a3"];
        assert_eq!(
            store.unread_count(Channel::Announcements, items.iter().copied()),
            2
        );
    }
}
