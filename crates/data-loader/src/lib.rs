//! # Data Loader Crate
//!
//! This crate holds the storefront's static data: the game catalogue and the
//! user libraries, loaded once from JSON fixtures and read-only afterwards.
//!
//! ## Main Components
//!
//! - **types**: Core domain types (GameRecord, UserRecord, PreferenceDocument, FixtureStore)
//! - **parser**: Parse and validate the fixture files
//! - **index**: Build the FixtureStore from a data directory
//! - **lookup**: Resolve game ids into records, with placeholders for unknown ids
//! - **error**: Error types for data loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::FixtureStore;
//! use std::path::Path;
//!
//! let store = FixtureStore::load_from_dir(Path::new("data"))?;
//!
//! let user = store.get_user("alice").unwrap();
//! let library = store.resolve_games(&user.games);
//!
//! println!("{} owns {} games", user.username, library.len());
//! ```

// Public modules
pub mod error;
pub mod types;
pub mod parser;
pub mod index;
pub mod lookup;

// Re-export commonly used types for convenience
pub use error::{DataLoadError, Result};
pub use index::{GAMES_FILE, USERS_FILE};
pub use lookup::PLACEHOLDER_PRICE;
pub use types::{
    // Type aliases
    GameId,
    Username,
    // Core types
    FixtureStore,
    GameFixture,
    GameRecord,
    PreferenceDocument,
    TagPreferences,
    UserFixture,
    UserRecord,
};
