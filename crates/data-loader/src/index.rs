//! FixtureStore loading.
//!
//! Builds the store from a data directory:
//! - Parse games.json and user.json in parallel
//! - Insert every record into the store
//! - Check that owned games point at known ids (warn only, lookups degrade
//!   to placeholders)

use crate::error::Result;
use crate::parser;
use crate::types::*;
use std::path::Path;
use tracing::{info, warn};

/// Fixture file holding the game catalogue
pub const GAMES_FILE: &str = "games.json";

/// Fixture file holding user libraries
pub const USERS_FILE: &str = "user.json";

impl FixtureStore {
    /// Load the fixture store from a directory
    ///
    /// This is the main entry point for loading data.
    ///
    /// Steps:
    /// 1. Parse both files (games, users) in parallel
    /// 2. Insert the records
    /// 3. Report dangling library references
    pub fn load_from_dir(data_dir: &Path) -> Result<Self> {
        info!("Loading fixtures from {:?}", data_dir);

        let games_path = data_dir.join(GAMES_FILE);
        let users_path = data_dir.join(USERS_FILE);

        // Rayon's `join` runs both parsers in parallel
        let (games, users) = rayon::join(
            || parser::parse_games(&games_path),
            || parser::parse_users(&users_path),
        );
        let games = games?;
        let users = users?;

        let mut store = FixtureStore::new();
        for (id, game) in games {
            store.insert_game(id, game);
        }
        for (username, user) in users {
            store.insert_user(username, user);
        }

        store.report_dangling_references();

        let (users, games) = store.counts();
        info!("Loaded {} users and {} games", users, games);
        Ok(store)
    }

    /// Log owned game ids that have no catalogue entry
    ///
    /// Returns how many were found.
    pub fn report_dangling_references(&self) -> usize {
        let mut dangling = 0;
        for (username, user) in &self.users {
            for game_id in &user.games {
                if !self.games.contains_key(game_id) {
                    warn!(
                        "User {} owns unknown game {}; it will render as a placeholder",
                        username, game_id
                    );
                    dangling += 1;
                }
            }
        }
        dangling
    }
}
