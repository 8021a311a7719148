//! Interactive send flow.
//!
//! Prompts go to stderr and events go to stdout as JSON lines. Nothing is
//! actually delivered; the final `MessageSent` event marks the point where
//! a messaging host would hand the message over.

use std::io::{self, BufRead, Write};
use std::time::Duration;

use clap::Args;
use nodrunk_core::gate::{FlowStage, SendDecision};
use nodrunk_core::{Action, Config, Event, SendFlow};

use super::common::{build_gate, open_store, print_event, warn_if_unconfigured, CliResult, TimeArgs};

#[derive(Args)]
pub struct SendArgs {
    /// Recipient identifier
    pub contact: String,
    #[command(flatten)]
    pub time: TimeArgs,
    /// Answer "yes" to the confirmation prompt. A hard warning still
    /// counts down first.
    #[arg(long, short)]
    pub yes: bool,
}

pub fn run(args: SendArgs) -> CliResult {
    let config = Config::load_or_default();
    let store = open_store();
    warn_if_unconfigured(&store);

    let gate = build_gate(&store, &config, &args.time)?;
    let action = gate.evaluate(&args.contact, args.time.instant()?);
    tracing::info!(contact = %args.contact, action = action.name(), "starting send flow");

    let mut flow = SendFlow::new(action);
    if let Some(event) = flow.start() {
        print_event(&event)?;
    }

    if flow.stage() == FlowStage::CoolingDown {
        count_down(&mut flow)?;
    }

    if flow.stage() == FlowStage::AwaitingConfirmation {
        if let Action::SoftWarn { message } = flow.action() {
            eprintln!("{message}");
        }
        if args.yes || ask("Send anyway?")? {
            if flow.confirm() == SendDecision::Send {
                print_event(&Event::MessageSent)?;
            }
        } else if let Some(event) = flow.cancel() {
            print_event(&event)?;
        }
    }
    Ok(())
}

/// Tick once a second until the cooldown expires or Ctrl-C cancels it.
fn count_down(flow: &mut SendFlow) -> CliResult {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async {
        let mut interval = tokio::time::interval(Duration::from_secs(1));
        // The first tick completes immediately.
        interval.tick().await;
        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(ctrl_c);

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    if let Some(event) = flow.tick() {
                        print_event(&event)?;
                    }
                    if flow.stage() != FlowStage::CoolingDown {
                        break;
                    }
                }
                _ = &mut ctrl_c => {
                    if let Some(event) = flow.cancel() {
                        print_event(&event)?;
                    }
                    break;
                }
            }
        }
        Ok::<(), Box<dyn std::error::Error>>(())
    })
}

fn ask(prompt: &str) -> CliResult<bool> {
    eprint!("{prompt} [y/N] ");
    io::stderr().flush()?;
    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line)? == 0 {
        return Ok(false);
    }
    Ok(matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}
