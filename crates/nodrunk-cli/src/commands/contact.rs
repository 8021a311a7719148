use clap::Subcommand;
use nodrunk_core::gate::rated_contacts;
use nodrunk_core::{ContactRating, Rating, RatingStore};

use super::common::{open_store, CliResult};

#[derive(Subcommand)]
pub enum ContactAction {
    /// Set a contact's rating (0 = none, 1 = caution, 2 = high risk)
    Rate {
        /// Contact identifier (phone number, email or handle)
        identifier: String,
        rating: i64,
    },
    /// Show a contact's rating
    Get {
        identifier: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List rated contacts
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run(action: ContactAction) -> CliResult {
    let mut store = open_store();

    match action {
        ContactAction::Rate { identifier, rating } => {
            let rating = Rating::try_from(rating)?;
            store.set_rating(&identifier, rating)?;
            println!("{identifier}: {rating}");
        }
        ContactAction::Get { identifier, json } => {
            let rating = store.rating(&identifier);
            if json {
                let entry = ContactRating::new(identifier, rating);
                println!("{}", serde_json::to_string_pretty(&entry)?);
            } else {
                println!("{identifier}: {rating}");
            }
        }
        ContactAction::List { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(&store.ratings())?);
                return Ok(());
            }
            let rows = rated_contacts(&store, &store);
            if rows.is_empty() {
                println!("No rated contacts.");
            }
            for (entry, rating) in rows {
                println!("{}\t{} ({})", entry.identifier, rating, rating.as_u8());
            }
        }
    }
    Ok(())
}
