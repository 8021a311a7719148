use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "nodrunk", version, about = "Warn before texting risky contacts at risky hours")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Active time range management
    Range {
        #[command(subcommand)]
        action: commands::range::RangeAction,
    },
    /// Contact rating management
    Contact {
        #[command(subcommand)]
        action: commands::contact::ContactAction,
    },
    /// Show what would happen if a message went out now
    Check(commands::check::CheckArgs),
    /// Walk through the warning flow for an outgoing message
    Send(commands::send::SendArgs),
    /// Sobriety mini-game scoring
    Game {
        #[command(subcommand)]
        action: commands::game::GameAction,
    },
    /// Store setup state and the current window verdict
    Status(commands::status::StatusArgs),
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Print shell completions
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "nodrunk=warn,nodrunk_core=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Range { action } => commands::range::run(action),
        Commands::Contact { action } => commands::contact::run(action),
        Commands::Check(args) => commands::check::run(args),
        Commands::Send(args) => commands::send::run(args),
        Commands::Game { action } => commands::game::run(action),
        Commands::Status(args) => commands::status::run(args),
        Commands::Config { action } => commands::config::run(action),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "nodrunk", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
