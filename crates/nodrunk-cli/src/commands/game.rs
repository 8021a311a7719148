use clap::{Subcommand, ValueEnum};
use nodrunk_core::game::{balance_score, reaction_score, sequence_score};
use nodrunk_core::GameSession;

use super::common::{print_event, CliResult};

#[derive(Clone, Copy, ValueEnum)]
pub enum TestKind {
    /// Seconds from stimulus to tap
    Reaction,
    /// Seconds to tap 1-4 in order
    Sequence,
    /// Largest damped tilt magnitude
    Balance,
}

#[derive(Subcommand)]
pub enum GameAction {
    /// Score a single measurement
    Score {
        #[arg(value_enum)]
        kind: TestKind,
        value: f64,
    },
    /// Combine the three test scores
    Composite {
        reaction: u8,
        sequence: u8,
        balance: u8,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run(action: GameAction) -> CliResult {
    match action {
        GameAction::Score { kind, value } => {
            let score = match kind {
                TestKind::Reaction => reaction_score(value),
                TestKind::Sequence => sequence_score(value),
                TestKind::Balance => balance_score(value),
            };
            println!("{score}");
        }
        GameAction::Composite {
            reaction,
            sequence,
            balance,
            json,
        } => {
            let mut session = GameSession::new();
            let mut finished = None;
            for score in [reaction, sequence, balance] {
                finished = session.record(score);
            }
            let report = session
                .report()
                .ok_or("mini-game session did not complete")?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                if let Some(event) = finished {
                    print_event(&event)?;
                }
                println!("{}: {}", report.composite, report.message());
            }
        }
    }
    Ok(())
}
