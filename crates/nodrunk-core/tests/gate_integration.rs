//! Integration tests for the send-time gate.
//!
//! Drives the full path from stored ratings and ranges through
//! `RiskGate::evaluate` into the warning flow and its cooldown.

use chrono::{DateTime, TimeZone, Utc};
use nodrunk_core::gate::{FlowStage, MemoryRatingStore, SendDecision};
use nodrunk_core::storage::CONTACTS_KEY;
use nodrunk_core::{
    Action, Cooldown, CooldownState, Event, FixedOffsetCalendar, MemoryStore, Rating, RatingStore,
    RiskGate, SendFlow, SharedStore, TimeRange, TimeWindowPolicy, UnavailableStore,
};

fn at(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 14, hour, minute, 0).unwrap()
}

fn late_night() -> Vec<TimeRange> {
    vec![TimeRange::from_minutes(22 * 60, 5 * 60).with_name("late night")]
}

fn utc_policy() -> TimeWindowPolicy<FixedOffsetCalendar> {
    TimeWindowPolicy::new(FixedOffsetCalendar::utc())
}

#[test]
fn test_rating_zero_always_allows() {
    let mut ratings = MemoryRatingStore::new();
    ratings.set_rating("cleared", Rating::None).unwrap();
    let gate = RiskGate::new(ratings, late_night(), utc_policy());

    for hour in 0..24 {
        for minute in [0, 29, 59] {
            assert_eq!(gate.evaluate("cleared", at(hour, minute)), Action::Allow);
            assert_eq!(gate.evaluate("never-rated", at(hour, minute)), Action::Allow);
        }
    }
}

#[test]
fn test_inactive_window_allows_every_rating() {
    let ratings = MemoryRatingStore::from_ratings([
        nodrunk_core::ContactRating::new("c", Rating::Caution),
        nodrunk_core::ContactRating::new("h", Rating::HighRisk),
    ]);
    let gate = RiskGate::new(ratings, late_night(), utc_policy());
    for hour in 6..22 {
        assert_eq!(gate.evaluate("c", at(hour, 0)), Action::Allow);
        assert_eq!(gate.evaluate("h", at(hour, 0)), Action::Allow);
    }

    let no_ranges = RiskGate::new(MemoryRatingStore::new(), Vec::new(), utc_policy());
    assert_eq!(no_ranges.evaluate("h", at(23, 0)), Action::Allow);
}

#[test]
fn test_high_risk_cooldown_end_to_end() {
    let mut shared = SharedStore::new(MemoryStore::new());
    shared.save_ranges(&late_night()).unwrap();
    shared.set_rating("+15551234567", Rating::HighRisk).unwrap();

    let ranges = shared.load_ranges();
    let gate = RiskGate::new(&shared, ranges, utc_policy());
    let action = gate.evaluate("+15551234567", at(23, 30));
    assert_eq!(action, Action::HardWarn { cooldown_secs: 10 });

    let mut cooldown = Cooldown::new(10);
    cooldown.show();
    for tick in 1..=10 {
        assert!(!cooldown.can_proceed(), "expired early at tick {tick}");
        cooldown.tick();
    }
    assert_eq!(cooldown.state(), CooldownState::Expired);
}

#[test]
fn test_cancel_at_tick_three_never_expires() {
    let mut flow = SendFlow::new(Action::HardWarn { cooldown_secs: 10 });
    assert_eq!(flow.start(), Some(Event::WarningShown { cooldown_secs: 10 }));
    for _ in 0..3 {
        flow.tick();
    }
    assert_eq!(flow.cancel(), Some(Event::WarningCancelled { remaining: 7 }));

    for _ in 0..100 {
        assert_eq!(flow.tick(), None);
    }
    let cooldown = flow.cooldown().unwrap();
    assert_eq!(cooldown.state(), CooldownState::Cancelled);
    assert_eq!(flow.confirm(), SendDecision::Aborted);
    assert_eq!(flow.stage(), FlowStage::Aborted);
}

#[test]
fn test_soft_warn_carries_caution_text() {
    let shared = SharedStore::new(MemoryStore::new());
    shared
        .upsert_rating(nodrunk_core::ContactRating::new("friend", Rating::Caution))
        .unwrap();
    let gate = RiskGate::new(&shared, late_night(), utc_policy());

    match gate.evaluate("friend", at(1, 0)) {
        Action::SoftWarn { message } => assert!(message.contains("cautionary hours")),
        other => panic!("expected soft warning, got {other:?}"),
    }

    let mut flow = SendFlow::new(gate.evaluate("friend", at(1, 0)));
    flow.start();
    flow.cancel();
    assert_eq!(flow.confirm(), SendDecision::Aborted);
}

#[test]
fn test_corrupt_contacts_allow_everyone() {
    let store = MemoryStore::new().with_raw(CONTACTS_KEY, "not json at all");
    let shared = SharedStore::new(store);
    let gate = RiskGate::new(&shared, late_night(), utc_policy());
    assert_eq!(gate.evaluate("+15551234567", at(23, 0)), Action::Allow);
}

#[test]
fn test_range_edit_takes_effect_on_next_evaluation() {
    let shared = SharedStore::new(MemoryStore::new());
    shared
        .upsert_rating(nodrunk_core::ContactRating::new("ex", Rating::HighRisk))
        .unwrap();

    let mut gate = RiskGate::new(&shared, shared.load_ranges(), utc_policy());
    assert_eq!(gate.evaluate("ex", at(23, 0)), Action::Allow);

    shared.save_ranges(&late_night()).unwrap();
    gate.set_ranges(shared.load_ranges());
    assert_eq!(
        gate.evaluate("ex", at(23, 0)),
        Action::HardWarn { cooldown_secs: 10 }
    );
}

#[test]
fn test_unavailable_store_allows_everything() {
    let shared = SharedStore::new(UnavailableStore::new("store could not be opened"));
    let gate = RiskGate::new(&shared, shared.load_ranges(), utc_policy());
    assert_eq!(gate.evaluate("anyone", at(23, 30)), Action::Allow);

    // Even with a window supplied by the caller, no rating can be read.
    let gate = RiskGate::new(&shared, late_night(), utc_policy());
    assert_eq!(gate.evaluate("anyone", at(23, 30)), Action::Allow);
}
