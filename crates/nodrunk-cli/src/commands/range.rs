use clap::Subcommand;
use nodrunk_core::{RangeBook, TimeOfDay, TimeRange};

use super::common::{open_store, CliResult};

#[derive(Subcommand)]
pub enum RangeAction {
    /// List configured ranges
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Add a range
    Add {
        /// Start time (HH:MM)
        #[arg(long)]
        start: TimeOfDay,
        /// End time (HH:MM); at or before start means the range runs past midnight
        #[arg(long)]
        end: TimeOfDay,
        /// Display name
        #[arg(long, default_value = "")]
        name: String,
        /// Repeat days, 1 = Sunday .. 7 = Saturday (e.g. "2,3,4,5,6")
        #[arg(long, value_delimiter = ',')]
        days: Vec<u8>,
    },
    /// Change fields of an existing range
    Edit {
        /// Range index as shown by `range list`
        index: usize,
        #[arg(long)]
        start: Option<TimeOfDay>,
        #[arg(long)]
        end: Option<TimeOfDay>,
        #[arg(long)]
        name: Option<String>,
        /// Replace the repeat days; `--days` with no value clears them
        #[arg(long, value_delimiter = ',', num_args = 0..)]
        days: Option<Vec<u8>>,
    },
    /// Remove a range
    Remove {
        /// Range index as shown by `range list`
        index: usize,
    },
}

fn print_range(index: usize, range: &TimeRange) {
    println!("[{index}] {range} ({})", range.repeat_days_description());
}

pub fn run(action: RangeAction) -> CliResult {
    let store = open_store();
    let book = RangeBook::new(&store);

    match action {
        RangeAction::List { json } => {
            let ranges = book.list()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&ranges)?);
            } else if ranges.is_empty() {
                println!("No time ranges configured.");
            } else {
                for (i, range) in ranges.iter().enumerate() {
                    print_range(i, range);
                }
            }
        }
        RangeAction::Add {
            start,
            end,
            name,
            days,
        } => {
            let range = TimeRange::new(start, end)
                .with_name(name)
                .with_repeat_days(days);
            let index = book.add(range.clone())?;
            print_range(index, &range);
        }
        RangeAction::Edit {
            index,
            start,
            end,
            name,
            days,
        } => {
            let mut range = book.get(index)?;
            if let Some(start) = start {
                range.start_minute_of_day = start.minute_of_day();
            }
            if let Some(end) = end {
                range.end_minute_of_day = end.minute_of_day();
            }
            if let Some(name) = name {
                range.name = name;
            }
            if let Some(days) = days {
                range.repeat_days = days.into_iter().collect();
            }
            book.update(index, range.clone())?;
            print_range(index, &range);
        }
        RangeAction::Remove { index } => {
            let removed = book.remove(index)?;
            println!("removed {removed}");
        }
    }
    Ok(())
}
