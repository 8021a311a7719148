use clap::Args;
use nodrunk_core::{Action, Config};

use super::common::{build_gate, open_store, warn_if_unconfigured, CliResult, TimeArgs};

#[derive(Args)]
pub struct CheckArgs {
    /// Recipient identifier
    pub contact: String,
    #[command(flatten)]
    pub time: TimeArgs,
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: CheckArgs) -> CliResult {
    let config = Config::load_or_default();
    let store = open_store();
    warn_if_unconfigured(&store);

    let gate = build_gate(&store, &config, &args.time)?;
    let action = gate.evaluate(&args.contact, args.time.instant()?);

    if args.json {
        println!("{}", serde_json::to_string(&action)?);
        return Ok(());
    }
    match action {
        Action::Allow => println!("allow"),
        Action::SoftWarn { message } => println!("soft warning: {message}"),
        Action::HardWarn { cooldown_secs } => {
            println!("hard warning: send unlocks after {cooldown_secs}s")
        }
    }
    Ok(())
}
