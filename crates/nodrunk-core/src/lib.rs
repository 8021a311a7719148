//! # nodrunk Core Library
//!
//! This library provides the decision logic behind nodrunk: a guard that
//! warns before a message goes out to a contact the user has flagged as
//! risky, during time windows the user has marked as "active".
//! Host surfaces (the messages extension, the settings screen, the CLI)
//! are thin layers that call into this crate and render its verdicts.
//!
//! ## Architecture
//!
//! - **Window**: minute-of-day ranges with optional day-of-week repetition
//!   and the membership test that decides whether "now" is active
//! - **Gate**: per-contact ratings combined with the window verdict into a
//!   send-time [`Action`], plus the tick-driven cooldown state machine
//! - **Game**: scoring for the reaction, sequence and balance mini-games
//! - **Storage**: the shared key-value store (SQLite or in-memory) and
//!   TOML configuration
//!
//! ## Key Components
//!
//! - [`TimeWindowPolicy`]: active-window evaluator
//! - [`RiskGate`]: contact rating + window verdict -> action
//! - [`Cooldown`]: hard-warning countdown, advanced by `tick()`
//! - [`SharedStore`]: canonical JSON encoding of ranges and ratings

pub mod clock;
pub mod error;
pub mod events;
pub mod game;
pub mod gate;
pub mod storage;
pub mod window;

pub use clock::{Calendar, Clock, FixedClock, FixedOffsetCalendar, LocalCalendar, LocalTime, SystemClock};
pub use error::{ConfigError, CoreError, StoreError, ValidationError};
pub use events::Event;
pub use game::{composite, GameReport, GameSession, Tier};
pub use gate::{Action, ContactRating, Cooldown, CooldownState, Rating, RatingStore, RiskGate, SendFlow};
pub use storage::{Config, Database, KeyValueStore, MemoryStore, SharedStore, StoreStatus, UnavailableStore};
pub use window::{RangeBook, TimeOfDay, TimeRange, TimeWindowPolicy};
