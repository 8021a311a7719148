//! Helpers shared by the command handlers.

use chrono::{DateTime, Utc};
use clap::Args;
use nodrunk_core::{
    Calendar, Clock, Config, Database, Event, FixedOffsetCalendar, KeyValueStore, LocalCalendar,
    RiskGate, SharedStore, StoreError, StoreStatus, SystemClock, TimeWindowPolicy,
    UnavailableStore,
};

pub type CliResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

/// The shared store as the commands see it: SQLite, or a stand-in that
/// fails every access when SQLite could not be opened.
pub type Store = SharedStore<Box<dyn KeyValueStore>>;

pub const SETUP_HINT: &str =
    "No time ranges have been set up yet. Add one with `nodrunk range add --start 22:00 --end 05:00`.";

pub const UNAVAILABLE_HINT: &str =
    "The shared store could not be opened, so no warnings will be shown. Check NODRUNK_DATA_DIR.";

/// Options that pin down "now" and the local timezone.
#[derive(Args, Debug, Clone, Default)]
pub struct TimeArgs {
    /// Evaluate at this instant instead of now (RFC 3339)
    #[arg(long)]
    pub at: Option<String>,
    /// Local UTC offset (+HH:MM / -HH:MM); defaults to the system timezone
    #[arg(long)]
    pub utc_offset: Option<String>,
}

impl TimeArgs {
    pub fn instant(&self) -> CliResult<DateTime<Utc>> {
        match &self.at {
            Some(raw) => Ok(DateTime::parse_from_rfc3339(raw)
                .map_err(|e| format!("invalid --at '{raw}': {e}"))?
                .with_timezone(&Utc)),
            None => Ok(SystemClock.now()),
        }
    }

    pub fn calendar(&self) -> CliResult<Box<dyn Calendar>> {
        match &self.utc_offset {
            Some(raw) => Ok(Box::new(FixedOffsetCalendar::parse(raw)?)),
            None => Ok(Box::new(LocalCalendar)),
        }
    }

    pub fn policy(&self, config: &Config) -> CliResult<TimeWindowPolicy<Box<dyn Calendar>>> {
        Ok(TimeWindowPolicy::from_config(self.calendar()?, &config.window))
    }
}

/// Open the SQLite store. An open failure is logged and every later read
/// fails open, so evaluation still answers "allow".
pub fn open_store() -> Store {
    let backend: Box<dyn KeyValueStore> = match Database::open() {
        Ok(db) => Box::new(db),
        Err(e) => {
            tracing::warn!(error = %e, "shared store unavailable, evaluating without it");
            let reason = match e {
                StoreError::Unavailable(reason) => reason,
                other => other.to_string(),
            };
            Box::new(UnavailableStore::new(reason))
        }
    };
    SharedStore::new(backend)
}

pub fn build_gate<'a>(
    store: &'a Store,
    config: &Config,
    time: &TimeArgs,
) -> CliResult<RiskGate<&'a Store, Box<dyn Calendar>>> {
    let gate = RiskGate::new(store, store.load_ranges(), time.policy(config)?)
        .with_config(config.gate.clone());
    Ok(gate)
}

pub fn setup_hint(status: StoreStatus) -> Option<&'static str> {
    match status {
        StoreStatus::Ready => None,
        StoreStatus::Unconfigured => Some(SETUP_HINT),
        StoreStatus::Unavailable => Some(UNAVAILABLE_HINT),
    }
}

pub fn warn_if_unconfigured(store: &Store) {
    if let Some(hint) = setup_hint(store.status()) {
        eprintln!("{hint}");
    }
}

/// One JSON object per line on stdout.
pub fn print_event(event: &Event) -> CliResult {
    println!("{}", serde_json::to_string(event)?);
    Ok(())
}
