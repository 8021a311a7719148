use clap::Args;
use nodrunk_core::{Config, StoreStatus, TimeRange};
use serde::Serialize;

use super::common::{open_store, setup_hint, CliResult, TimeArgs};

#[derive(Args)]
pub struct StatusArgs {
    #[command(flatten)]
    pub time: TimeArgs,
}

#[derive(Serialize)]
struct StatusReport {
    store: StoreStatus,
    ranges: usize,
    contacts: usize,
    active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    matched_range: Option<TimeRange>,
    #[serde(skip_serializing_if = "Option::is_none")]
    hint: Option<&'static str>,
}

pub fn run(args: StatusArgs) -> CliResult {
    let config = Config::load_or_default();
    let store = open_store();
    let status = store.status();

    let ranges = store.load_ranges();
    let policy = args.time.policy(&config)?;
    let matched_range = policy.first_match(args.time.instant()?, &ranges).cloned();

    let report = StatusReport {
        store: status,
        ranges: ranges.len(),
        contacts: store.load_ratings().len(),
        active: matched_range.is_some(),
        matched_range,
        hint: setup_hint(status),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
