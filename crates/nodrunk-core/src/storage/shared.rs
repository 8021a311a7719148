//! Canonical encoding of ranges and ratings in the shared store.
//!
//! Two keys are owned here:
//!
//! - `"timeRanges"`: JSON array of `{name, startMinuteOfDay, endMinuteOfDay, repeatDays}`
//! - `"contacts"`: JSON array of `{identifier, rating}`
//!
//! Reads fail open. A missing key, an unreadable store or a corrupt blob
//! all load as an empty list, which the gate treats as "allow". Edits
//! read strictly instead: a read that fails aborts the edit and leaves the
//! stored value untouched.
//!
//! Range arrays written by older settings screens as
//! `{startHour, startMinute, endHour, endMinute}` are still read and are
//! rewritten in the canonical shape on the next save. The earlier
//! timestamp-based `{start, end}` layout is not migrated.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::kv::KeyValueStore;
use crate::error::Result;
use crate::gate::rating::{upsert, ContactDirectory, ContactEntry, ContactRating, Rating, RatingStore};
use crate::window::TimeRange;

pub const TIME_RANGES_KEY: &str = "timeRanges";
pub const CONTACTS_KEY: &str = "contacts";

/// Whether the host has finished setting up the shared store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreStatus {
    /// Ranges have been written at least once.
    Ready,
    /// The store opened but no ranges were ever saved.
    Unconfigured,
    /// The store could not be read.
    Unavailable,
}

impl StoreStatus {
    /// The host should point the user at the setup screen.
    pub fn needs_setup(self) -> bool {
        !matches!(self, StoreStatus::Ready)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StoredRange {
    Canonical(TimeRange),
    HourMinute(HourMinuteRange),
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct HourMinuteRange {
    #[serde(default)]
    name: String,
    start_hour: u16,
    start_minute: u16,
    end_hour: u16,
    end_minute: u16,
    #[serde(default)]
    repeat_days: BTreeSet<u8>,
}

impl From<StoredRange> for TimeRange {
    fn from(stored: StoredRange) -> Self {
        match stored {
            StoredRange::Canonical(range) => range,
            StoredRange::HourMinute(old) => TimeRange {
                name: old.name,
                start_minute_of_day: old.start_hour.saturating_mul(60).saturating_add(old.start_minute),
                end_minute_of_day: old.end_hour.saturating_mul(60).saturating_add(old.end_minute),
                repeat_days: old.repeat_days,
            },
        }
    }
}

/// Typed view over the shared key-value store.
#[derive(Debug)]
pub struct SharedStore<S> {
    store: S,
}

impl<S: KeyValueStore> SharedStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn inner(&self) -> &S {
        &self.store
    }

    pub fn status(&self) -> StoreStatus {
        match self.store.contains(TIME_RANGES_KEY) {
            Ok(true) => StoreStatus::Ready,
            Ok(false) => StoreStatus::Unconfigured,
            Err(e) => {
                tracing::warn!(error = %e, "shared store unavailable");
                StoreStatus::Unavailable
            }
        }
    }

    /// Ranges in stored order. Fails open to an empty list.
    ///
    /// Ranges that fail validation are dropped individually.
    pub fn load_ranges(&self) -> Vec<TimeRange> {
        match self.try_load_ranges() {
            Ok(ranges) => ranges
                .into_iter()
                .filter(|range| match range.validate() {
                    Ok(()) => true,
                    Err(e) => {
                        tracing::warn!(range = %range, error = %e, "dropping invalid stored range");
                        false
                    }
                })
                .collect(),
            Err(e) => {
                tracing::warn!(key = TIME_RANGES_KEY, error = %e, "treating stored ranges as empty");
                Vec::new()
            }
        }
    }

    /// Strict read: surfaces store and decode errors.
    pub fn try_load_ranges(&self) -> Result<Vec<TimeRange>> {
        let Some(bytes) = self.store.get(TIME_RANGES_KEY)? else {
            return Ok(Vec::new());
        };
        let stored: Vec<StoredRange> = serde_json::from_slice(&bytes)?;
        Ok(stored.into_iter().map(TimeRange::from).collect())
    }

    pub fn save_ranges(&self, ranges: &[TimeRange]) -> Result<()> {
        let bytes = serde_json::to_vec(ranges)?;
        self.store.set(TIME_RANGES_KEY, &bytes)?;
        tracing::info!(count = ranges.len(), "saved time ranges");
        Ok(())
    }

    /// Ratings in stored order. Fails open to an empty list.
    pub fn load_ratings(&self) -> Vec<ContactRating> {
        self.try_load_ratings().unwrap_or_else(|e| {
            tracing::warn!(key = CONTACTS_KEY, error = %e, "treating stored ratings as empty");
            Vec::new()
        })
    }

    pub fn try_load_ratings(&self) -> Result<Vec<ContactRating>> {
        let Some(bytes) = self.store.get(CONTACTS_KEY)? else {
            return Ok(Vec::new());
        };
        Ok(serde_json::from_slice(&bytes)?)
    }

    pub fn save_ratings(&self, ratings: &[ContactRating]) -> Result<()> {
        let bytes = serde_json::to_vec(ratings)?;
        self.store.set(CONTACTS_KEY, &bytes)?;
        tracing::info!(count = ratings.len(), "saved contact ratings");
        Ok(())
    }

    /// Read-modify-write of a single rating.
    pub fn upsert_rating(&self, entry: ContactRating) -> Result<()> {
        let mut ratings = self.try_load_ratings()?;
        upsert(&mut ratings, entry);
        self.save_ratings(&ratings)
    }
}

impl<S: KeyValueStore> RatingStore for SharedStore<S> {
    fn rating(&self, identifier: &str) -> Rating {
        self.load_ratings()
            .into_iter()
            .find(|c| c.identifier == identifier)
            .map(|c| c.rating)
            .unwrap_or_default()
    }

    fn set_rating(&mut self, identifier: &str, rating: Rating) -> Result<()> {
        self.upsert_rating(ContactRating::new(identifier, rating))
    }

    fn ratings(&self) -> Vec<ContactRating> {
        self.load_ratings()
    }
}

/// Writes go straight to the store, so a shared reference is enough.
impl<S: KeyValueStore> RatingStore for &SharedStore<S> {
    fn rating(&self, identifier: &str) -> Rating {
        (**self).rating(identifier)
    }

    fn set_rating(&mut self, identifier: &str, rating: Rating) -> Result<()> {
        self.upsert_rating(ContactRating::new(identifier, rating))
    }

    fn ratings(&self) -> Vec<ContactRating> {
        self.load_ratings()
    }
}

/// Without an address book the store can only name contacts by identifier.
impl<S: KeyValueStore> ContactDirectory for SharedStore<S> {
    fn contacts(&self) -> Vec<ContactEntry> {
        self.load_ratings()
            .into_iter()
            .map(|c| ContactEntry {
                display_name: c.identifier.clone(),
                identifier: c.identifier,
                has_photo: false,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CoreError, StoreError};
    use crate::storage::kv::FlakyStore;
    use crate::storage::{MemoryStore, UnavailableStore};

    #[test]
    fn status_tracks_setup() {
        let shared = SharedStore::new(MemoryStore::new());
        assert_eq!(shared.status(), StoreStatus::Unconfigured);
        shared.save_ranges(&[]).unwrap();
        assert_eq!(shared.status(), StoreStatus::Ready);
    }

    #[test]
    fn ranges_roundtrip_canonical() {
        let shared = SharedStore::new(MemoryStore::new());
        let ranges = vec![
            TimeRange::from_minutes(1320, 300).with_name("late"),
            TimeRange::from_minutes(540, 1020).with_repeat_days([2, 3, 4, 5, 6]),
        ];
        shared.save_ranges(&ranges).unwrap();
        assert_eq!(shared.load_ranges(), ranges);
    }

    #[test]
    fn corrupt_ranges_fail_open() {
        let store = MemoryStore::new().with_raw(TIME_RANGES_KEY, "{not json");
        let shared = SharedStore::new(store);
        assert!(shared.try_load_ranges().is_err());
        assert!(shared.load_ranges().is_empty());
    }

    #[test]
    fn hour_minute_layout_is_read() {
        let legacy = r#"[{"startHour":22,"startMinute":30,"endHour":5,"endMinute":0}]"#;
        let shared = SharedStore::new(MemoryStore::new().with_raw(TIME_RANGES_KEY, legacy));
        let ranges = shared.load_ranges();
        assert_eq!(ranges, vec![TimeRange::from_minutes(22 * 60 + 30, 300)]);
    }

    #[test]
    fn invalid_stored_range_is_dropped() {
        let raw = r#"[
            {"startMinuteOfDay": 2000, "endMinuteOfDay": 10},
            {"startMinuteOfDay": 60, "endMinuteOfDay": 120}
        ]"#;
        let shared = SharedStore::new(MemoryStore::new().with_raw(TIME_RANGES_KEY, raw));
        assert_eq!(shared.load_ranges(), vec![TimeRange::from_minutes(60, 120)]);
    }

    #[test]
    fn rating_store_over_shared_keys() {
        let mut shared = SharedStore::new(MemoryStore::new());
        shared.set_rating("+1555", Rating::Caution).unwrap();
        shared.set_rating("+1555", Rating::HighRisk).unwrap();
        assert_eq!(shared.rating("+1555"), Rating::HighRisk);
        assert_eq!(shared.ratings().len(), 1);

        let raw = shared.inner().get(CONTACTS_KEY).unwrap().unwrap();
        let json: serde_json::Value = serde_json::from_slice(&raw).unwrap();
        assert_eq!(json, serde_json::json!([{"identifier": "+1555", "rating": 2}]));
    }

    #[test]
    fn corrupt_contacts_fail_open() {
        let shared = SharedStore::new(MemoryStore::new().with_raw(CONTACTS_KEY, "[{\"identifier\":1}]"));
        assert!(shared.ratings().is_empty());
        assert_eq!(shared.rating("anyone"), Rating::None);
    }

    #[test]
    fn failed_read_does_not_wipe_ratings() {
        let shared = SharedStore::new(FlakyStore::new(MemoryStore::new()));
        shared.upsert_rating(ContactRating::new("a", Rating::HighRisk)).unwrap();
        shared.upsert_rating(ContactRating::new("b", Rating::Caution)).unwrap();

        shared.inner().fail_next_reads(1);
        let err = shared
            .upsert_rating(ContactRating::new("c", Rating::Caution))
            .unwrap_err();
        assert!(matches!(err, CoreError::Store(StoreError::Locked)));

        let ids: Vec<_> = shared.ratings().into_iter().map(|c| c.identifier).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn bad_record_blocks_rating_edit() {
        let raw = r#"[{"identifier":"a","rating":2},{"identifier":"b","rating":3}]"#;
        let mut shared = SharedStore::new(MemoryStore::new().with_raw(CONTACTS_KEY, raw));

        assert!(shared.set_rating("c", Rating::Caution).is_err());
        let stored = shared.inner().get(CONTACTS_KEY).unwrap().unwrap();
        assert_eq!(stored, raw.as_bytes());
    }

    #[test]
    fn unavailable_store_fails_open() {
        let mut shared = SharedStore::new(UnavailableStore::new("no data dir"));
        assert_eq!(shared.status(), StoreStatus::Unavailable);
        assert!(shared.status().needs_setup());
        assert!(shared.load_ranges().is_empty());
        assert_eq!(shared.rating("anyone"), Rating::None);
        assert!(shared.set_rating("anyone", Rating::HighRisk).is_err());
    }
}
