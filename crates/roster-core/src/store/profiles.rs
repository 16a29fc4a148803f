//! In-memory `profiles` table.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use chrono::{DateTime, Utc};

use crate::domain::{Credits, ProfileFields, ProfileRecord, UserId};

/// `UserId -> ProfileRecord`, at most one record per user.
#[derive(Debug, Default)]
pub struct ProfileStore {
    records: HashMap<UserId, ProfileRecord>,
}

impl ProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, user: &UserId) -> Option<&ProfileRecord> {
        self.records.get(user)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Get the record for `user`, creating an empty one if needed.
    ///
    /// The flag is `true` when the record was created by this call.
    pub fn ensure(&mut self, user: &UserId, now: DateTime<Utc>) -> (&mut ProfileRecord, bool) {
        match self.records.entry(user.clone()) {
            Entry::Occupied(e) => (e.into_mut(), false),
            Entry::Vacant(e) => (e.insert(ProfileRecord::new(user.clone(), now)), true),
        }
    }

    /// Create-or-overwrite the descriptive fields. Returns `true` on create.
    pub fn upsert(&mut self, user: &UserId, fields: ProfileFields, now: DateTime<Utc>) -> bool {
        let (record, created) = self.ensure(user, now);
        record.apply_fields(fields, now);
        created
    }

    /// Would crediting `amount` to `user` succeed? A missing record counts as
    /// zero.
    pub fn can_credit(&self, user: &UserId, amount: Credits) -> bool {
        self.records
            .get(user)
            .map_or(Credits::ZERO, |r| r.count)
            .checked_add(amount)
            .is_some()
    }

    /// Credit `user`, creating the record if needed. `None` on overflow, in
    /// which case nothing changed.
    pub fn credit(&mut self, user: &UserId, amount: Credits, now: DateTime<Utc>) -> Option<Credits> {
        if !self.can_credit(user, amount) {
            return None;
        }
        let (record, _) = self.ensure(user, now);
        record.credit(amount, now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
    }

    fn fields(nickname: &str) -> ProfileFields {
        ProfileFields {
            nickname: nickname.to_string(),
            avatar: format!("https://example.com/{nickname}.jpg"),
            website: "https://example.com".to_string(),
            locale: "en_US".to_string(),
            metadata: "{}".to_string(),
        }
    }

    #[test]
    fn upsert_creates_then_overwrites() {
        let mut store = ProfileStore::new();
        let alice = UserId::new("alice");

        assert!(store.upsert(&alice, fields("Alice"), t0()));
        assert!(!store.upsert(&alice, fields("Ally"), t0()));

        assert_eq!(store.len(), 1);
        assert_eq!(store.get(&alice).unwrap().fields.nickname, "Ally");
    }

    #[test]
    fn ensure_is_lazy_and_idempotent() {
        let mut store = ProfileStore::new();
        let bob = UserId::new("bob");

        let (_, created) = store.ensure(&bob, t0());
        assert!(created);
        let (record, created) = store.ensure(&bob, t0());
        assert!(!created);
        assert_eq!(record.count, Credits::ZERO);
    }

    #[test]
    fn credit_creates_missing_record() {
        let mut store = ProfileStore::new();
        let bob = UserId::new("bob");

        assert_eq!(store.credit(&bob, Credits::new(100), t0()), Some(Credits::new(100)));
        assert_eq!(store.get(&bob).unwrap().count, Credits::new(100));
    }

    #[test]
    fn credit_overflow_is_refused() {
        let mut store = ProfileStore::new();
        let bob = UserId::new("bob");
        store.credit(&bob, Credits::new(u64::MAX), t0()).unwrap();

        assert!(!store.can_credit(&bob, Credits::new(1)));
        assert_eq!(store.credit(&bob, Credits::new(1), t0()), None);
        assert_eq!(store.get(&bob).unwrap().count, Credits::new(u64::MAX));
    }

    #[test]
    fn refused_credit_does_not_create_record() {
        let mut store = ProfileStore::new();
        let ghost = UserId::new("ghost");
        assert!(store.can_credit(&ghost, Credits::new(u64::MAX)));
        assert!(store.get(&ghost).is_none());
    }
}
