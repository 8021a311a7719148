//! Editing the stored range list.

use super::range::TimeRange;
use crate::error::{Result, ValidationError};
use crate::storage::{KeyValueStore, SharedStore};

/// The ordered range list in the shared store. Every edit is a
/// read-modify-write of the whole `"timeRanges"` array, and a read that
/// fails aborts the edit.
pub struct RangeBook<'a, S> {
    store: &'a SharedStore<S>,
}

impl<'a, S: KeyValueStore> RangeBook<'a, S> {
    pub fn new(store: &'a SharedStore<S>) -> Self {
        Self { store }
    }

    /// Ranges at their stored positions, including any that no longer
    /// validate, so indices line up with what edits act on.
    pub fn list(&self) -> Result<Vec<TimeRange>> {
        self.store.try_load_ranges()
    }

    pub fn get(&self, index: usize) -> Result<TimeRange> {
        let ranges = self.list()?;
        let len = ranges.len();
        ranges
            .into_iter()
            .nth(index)
            .ok_or_else(|| out_of_bounds(index, len).into())
    }

    /// Validate and append. Returns the new index.
    pub fn add(&self, range: TimeRange) -> Result<usize> {
        range.validate()?;
        let mut ranges = self.list()?;
        ranges.push(range);
        self.store.save_ranges(&ranges)?;
        Ok(ranges.len() - 1)
    }

    pub fn update(&self, index: usize, range: TimeRange) -> Result<()> {
        range.validate()?;
        let mut ranges = self.list()?;
        let len = ranges.len();
        let slot = ranges.get_mut(index).ok_or_else(|| out_of_bounds(index, len))?;
        *slot = range;
        self.store.save_ranges(&ranges)
    }

    pub fn remove(&self, index: usize) -> Result<TimeRange> {
        let mut ranges = self.list()?;
        if index >= ranges.len() {
            return Err(out_of_bounds(index, ranges.len()).into());
        }
        let removed = ranges.remove(index);
        self.store.save_ranges(&ranges)?;
        Ok(removed)
    }
}

fn out_of_bounds(index: usize, len: usize) -> ValidationError {
    ValidationError::OutOfBounds {
        collection: "time ranges".to_string(),
        index,
        len,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CoreError, StoreError};
    use crate::storage::kv::FlakyStore;
    use crate::storage::{MemoryStore, TIME_RANGES_KEY};

    #[test]
    fn add_update_remove_keep_order() {
        let shared = SharedStore::new(MemoryStore::new());
        let book = RangeBook::new(&shared);

        assert_eq!(book.add(TimeRange::from_minutes(1320, 300)).unwrap(), 0);
        assert_eq!(book.add(TimeRange::from_minutes(60, 120)).unwrap(), 1);
        book.update(0, TimeRange::from_minutes(1380, 360)).unwrap();

        assert_eq!(
            book.list().unwrap(),
            vec![
                TimeRange::from_minutes(1380, 360),
                TimeRange::from_minutes(60, 120)
            ]
        );

        let removed = book.remove(0).unwrap();
        assert_eq!(removed.start_minute_of_day, 1380);
        assert_eq!(book.list().unwrap(), vec![TimeRange::from_minutes(60, 120)]);
    }

    #[test]
    fn add_rejects_invalid_range() {
        let shared = SharedStore::new(MemoryStore::new());
        let book = RangeBook::new(&shared);
        let err = book.add(TimeRange::from_minutes(1440, 0)).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::MinuteOutOfRange { value: 1440, .. })
        ));
        assert!(book.list().unwrap().is_empty());
    }

    #[test]
    fn remove_out_of_bounds() {
        let shared = SharedStore::new(MemoryStore::new());
        let book = RangeBook::new(&shared);
        let err = book.remove(3).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::OutOfBounds { index: 3, len: 0, .. })
        ));
    }

    #[test]
    fn failed_read_aborts_add() {
        let shared = SharedStore::new(FlakyStore::new(MemoryStore::new()));
        let book = RangeBook::new(&shared);
        book.add(TimeRange::from_minutes(1320, 300)).unwrap();
        book.add(TimeRange::from_minutes(60, 120)).unwrap();

        shared.inner().fail_next_reads(1);
        let err = book.add(TimeRange::from_minutes(600, 700)).unwrap_err();
        assert!(matches!(err, CoreError::Store(StoreError::Locked)));

        assert_eq!(
            book.list().unwrap(),
            vec![
                TimeRange::from_minutes(1320, 300),
                TimeRange::from_minutes(60, 120)
            ]
        );
    }

    #[test]
    fn failed_read_aborts_update_and_remove() {
        let shared = SharedStore::new(FlakyStore::new(MemoryStore::new()));
        let book = RangeBook::new(&shared);
        book.add(TimeRange::from_minutes(1320, 300)).unwrap();

        shared.inner().fail_next_reads(1);
        assert!(book.update(0, TimeRange::from_minutes(60, 120)).is_err());
        shared.inner().fail_next_reads(1);
        assert!(book.remove(0).is_err());

        assert_eq!(book.list().unwrap(), vec![TimeRange::from_minutes(1320, 300)]);
    }

    #[test]
    fn corrupt_blob_is_not_overwritten() {
        let shared = SharedStore::new(MemoryStore::new().with_raw(TIME_RANGES_KEY, "{not json"));
        let book = RangeBook::new(&shared);
        assert!(book.list().is_err());
        assert!(matches!(
            book.add(TimeRange::from_minutes(60, 120)).unwrap_err(),
            CoreError::Json(_)
        ));
        let raw = shared.inner().get(TIME_RANGES_KEY).unwrap().unwrap();
        assert_eq!(raw, b"{not json");
    }

    #[test]
    fn indices_follow_stored_positions() {
        let raw = r#"[
            {"startMinuteOfDay": 2000, "endMinuteOfDay": 10},
            {"startMinuteOfDay": 60, "endMinuteOfDay": 120}
        ]"#;
        let shared = SharedStore::new(MemoryStore::new().with_raw(TIME_RANGES_KEY, raw));
        let book = RangeBook::new(&shared);

        assert_eq!(book.get(1).unwrap(), TimeRange::from_minutes(60, 120));
        let removed = book.remove(0).unwrap();
        assert_eq!(removed.start_minute_of_day, 2000);
        assert_eq!(book.list().unwrap(), vec![TimeRange::from_minutes(60, 120)]);
    }
}
