mod config;
pub mod database;
pub mod kv;
pub mod shared;

pub use config::Config;
pub use database::Database;
pub use kv::{KeyValueStore, MemoryStore, UnavailableStore};
pub use shared::{SharedStore, StoreStatus, CONTACTS_KEY, TIME_RANGES_KEY};

use std::path::PathBuf;

use crate::error::StoreError;

/// Returns the data directory shared by every nodrunk surface.
///
/// `NODRUNK_DATA_DIR` overrides the location outright. Otherwise this is
/// `~/.config/nodrunk[-dev]/`, with NODRUNK_ENV=dev selecting the
/// development directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, StoreError> {
    let dir = match std::env::var_os("NODRUNK_DATA_DIR") {
        Some(explicit) => PathBuf::from(explicit),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env = std::env::var("NODRUNK_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("nodrunk-dev")
            } else {
                base_dir.join("nodrunk")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| StoreError::Unavailable(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
