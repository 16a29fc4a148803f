//! Profile record and the credit accumulator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::UserId;

/// Exact, non-negative, add-only accumulator.
///
/// There is no subtraction on purpose: the only way a count changes is
/// [`Credits::checked_add`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Credits(u64);

impl Credits {
    pub const ZERO: Credits = Credits(0);

    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub const fn value(self) -> u64 {
        self.0
    }

    /// `None` on overflow.
    pub fn checked_add(self, other: Credits) -> Option<Credits> {
        self.0.checked_add(other.0).map(Credits)
    }
}

impl fmt::Display for Credits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// The five descriptive fields a user controls.
///
/// Values are stored as given; nothing here is validated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileFields {
    #[serde(default)]
    pub nickname: String,
    #[serde(default)]
    pub avatar: String,
    #[serde(default)]
    pub website: String,
    #[serde(default)]
    pub locale: String,
    /// Caller-defined blob (usually JSON). Never interpreted.
    #[serde(default)]
    pub metadata: String,
}

/// One row of the `profiles` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileRecord {
    pub user: UserId,
    #[serde(flatten)]
    pub fields: ProfileFields,
    pub count: Credits,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProfileRecord {
    /// Empty profile with a zero count.
    pub fn new(user: UserId, now: DateTime<Utc>) -> Self {
        Self {
            user,
            fields: ProfileFields::default(),
            count: Credits::ZERO,
            created_at: now,
            updated_at: now,
        }
    }

    /// Overwrite the descriptive fields. `count` is left alone.
    pub fn apply_fields(&mut self, fields: ProfileFields, now: DateTime<Utc>) {
        self.fields = fields;
        self.updated_at = now;
    }

    /// Add `amount` to the count. Returns the new count, or `None` (and leaves
    /// the record untouched) on overflow.
    pub fn credit(&mut self, amount: Credits, now: DateTime<Utc>) -> Option<Credits> {
        let next = self.count.checked_add(amount)?;
        self.count = next;
        self.updated_at = now;
        Some(next)
    }
}
