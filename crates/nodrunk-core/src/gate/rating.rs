//! Per-contact risk ratings.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Result, ValidationError};

/// How risky it is to message a contact during an active window.
///
/// Stored as the integer 0, 1 or 2. `None` covers both "never rated" and
/// "explicitly cleared"; the two cannot be told apart.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum Rating {
    #[default]
    None,
    Caution,
    HighRisk,
}

impl Rating {
    pub fn as_u8(self) -> u8 {
        match self {
            Rating::None => 0,
            Rating::Caution => 1,
            Rating::HighRisk => 2,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Rating::None => "none",
            Rating::Caution => "caution",
            Rating::HighRisk => "high risk",
        }
    }
}

impl TryFrom<i64> for Rating {
    type Error = ValidationError;

    fn try_from(value: i64) -> std::result::Result<Self, Self::Error> {
        match value {
            0 => Ok(Rating::None),
            1 => Ok(Rating::Caution),
            2 => Ok(Rating::HighRisk),
            other => Err(ValidationError::InvalidRating(other)),
        }
    }
}

impl From<Rating> for i64 {
    fn from(rating: Rating) -> Self {
        rating.as_u8() as i64
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A stored rating, keyed by an opaque contact identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactRating {
    pub identifier: String,
    pub rating: Rating,
}

impl ContactRating {
    pub fn new(identifier: impl Into<String>, rating: Rating) -> Self {
        Self {
            identifier: identifier.into(),
            rating,
        }
    }
}

/// Replace the entry for the same identifier in place, or append.
pub fn upsert(list: &mut Vec<ContactRating>, entry: ContactRating) {
    match list.iter_mut().find(|c| c.identifier == entry.identifier) {
        Some(existing) => existing.rating = entry.rating,
        None => list.push(entry),
    }
}

/// Storage of ratings consulted by the risk gate.
pub trait RatingStore {
    /// Unset identifiers read as [`Rating::None`].
    fn rating(&self, identifier: &str) -> Rating;

    /// Upsert; setting [`Rating::None`] is how a rating is cleared.
    fn set_rating(&mut self, identifier: &str, rating: Rating) -> Result<()>;

    fn ratings(&self) -> Vec<ContactRating>;
}

/// Ratings held in memory, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct MemoryRatingStore {
    entries: Vec<ContactRating>,
}

impl MemoryRatingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_ratings(ratings: impl IntoIterator<Item = ContactRating>) -> Self {
        let mut store = Self::new();
        for entry in ratings {
            upsert(&mut store.entries, entry);
        }
        store
    }
}

impl RatingStore for MemoryRatingStore {
    fn rating(&self, identifier: &str) -> Rating {
        self.entries
            .iter()
            .find(|c| c.identifier == identifier)
            .map(|c| c.rating)
            .unwrap_or_default()
    }

    fn set_rating(&mut self, identifier: &str, rating: Rating) -> Result<()> {
        upsert(&mut self.entries, ContactRating::new(identifier, rating));
        Ok(())
    }

    fn ratings(&self) -> Vec<ContactRating> {
        self.entries.clone()
    }
}

/// A contact as offered to the rating screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactEntry {
    pub display_name: String,
    pub identifier: String,
    #[serde(default)]
    pub has_photo: bool,
}

/// Address-book collaborator. The core only ever uses `identifier`.
pub trait ContactDirectory {
    fn contacts(&self) -> Vec<ContactEntry>;
}

impl ContactDirectory for Vec<ContactEntry> {
    fn contacts(&self) -> Vec<ContactEntry> {
        self.clone()
    }
}

/// Pair every directory entry with its current rating, for display.
pub fn rated_contacts<D, R>(directory: &D, ratings: &R) -> Vec<(ContactEntry, Rating)>
where
    D: ContactDirectory + ?Sized,
    R: RatingStore + ?Sized,
{
    directory
        .contacts()
        .into_iter()
        .map(|entry| {
            let rating = ratings.rating(&entry.identifier);
            (entry, rating)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_integer_encoding() {
        assert_eq!(serde_json::to_string(&Rating::HighRisk).unwrap(), "2");
        assert_eq!(serde_json::from_str::<Rating>("1").unwrap(), Rating::Caution);
        assert!(serde_json::from_str::<Rating>("3").is_err());
        assert!(serde_json::from_str::<Rating>("-1").is_err());
    }

    #[test]
    fn unset_reads_as_none() {
        let store = MemoryRatingStore::new();
        assert_eq!(store.rating("+15551234567"), Rating::None);
    }

    #[test]
    fn last_write_wins_and_keeps_position() {
        let mut store = MemoryRatingStore::new();
        store.set_rating("a", Rating::Caution).unwrap();
        store.set_rating("b", Rating::HighRisk).unwrap();
        store.set_rating("a", Rating::None).unwrap();

        let all = store.ratings();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0], ContactRating::new("a", Rating::None));
        assert_eq!(store.rating("b"), Rating::HighRisk);
    }

    #[test]
    fn rated_contacts_fills_unrated_with_none() {
        let directory = vec![
            ContactEntry {
                display_name: "Alex".into(),
                identifier: "+1555".into(),
                has_photo: false,
            },
            ContactEntry {
                display_name: "Sam".into(),
                identifier: "+1666".into(),
                has_photo: true,
            },
        ];
        let store = MemoryRatingStore::from_ratings([ContactRating::new("+1666", Rating::HighRisk)]);

        let rows = rated_contacts(&directory, &store);
        assert_eq!(rows[0].1, Rating::None);
        assert_eq!(rows[1].1, Rating::HighRisk);
    }
}
