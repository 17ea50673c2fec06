//! Core domain types for the storefront.
//!
//! This module defines the records that flow between the fixture store, the
//! questionnaire, the recommendation client and the HTTP layer.
//! - Type aliases for domain clarity (GameId, Username)
//! - Fixture shapes as stored on disk, and the records handed to callers
//! - The preference document produced by the questionnaire
//! - FixtureStore, the in-memory read-only store

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// =============================================================================
// Type Aliases
// =============================================================================

/// Store identifier of a game (Steam app id, kept as an opaque string)
pub type GameId = String;

/// Identity of a user, also the value of the session cookie
pub type Username = String;

// =============================================================================
// Game-related Types
// =============================================================================

/// A game as stored in `games.json`, keyed by its id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GameFixture {
    pub name: String,
    pub price: String,
    #[serde(rename = "originalPrice")]
    pub original_price: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount: Option<String>,
}

/// A game as handed to callers: the fixture merged with its id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    pub id: GameId,
    pub name: String,
    pub price: String,
    #[serde(rename = "originalPrice")]
    pub original_price: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount: Option<String>,
}

impl GameRecord {
    /// Merge a stored fixture with the id it was stored under
    pub fn from_fixture(id: impl Into<GameId>, fixture: &GameFixture) -> Self {
        Self {
            id: id.into(),
            name: fixture.name.clone(),
            price: fixture.price.clone(),
            original_price: fixture.original_price.clone(),
            discount: fixture.discount.clone(),
        }
    }
}

// =============================================================================
// User-related Types
// =============================================================================

/// A user as stored in `user.json`, keyed by username.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UserFixture {
    pub num_games_owned: u32,
    /// Owned game ids, in library order
    pub games: Vec<GameId>,
}

/// A user record as returned by the user lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub username: Username,
    pub num_games_owned: u32,
    pub games: Vec<GameId>,
}

impl UserRecord {
    pub fn from_fixture(username: impl Into<Username>, fixture: &UserFixture) -> Self {
        Self {
            username: username.into(),
            num_games_owned: fixture.num_games_owned,
            games: fixture.games.clone(),
        }
    }

    /// A user with an empty library (first visit, not yet in the fixtures)
    pub fn empty(username: impl Into<Username>) -> Self {
        Self {
            username: username.into(),
            num_games_owned: 0,
            games: Vec::new(),
        }
    }
}

// =============================================================================
// Preference Types
// =============================================================================

/// The four tag answers, one per named category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagPreferences {
    pub core_preferences: String,
    pub gameplay_style: String,
    pub aesthetic_preferences: String,
    pub special_features: String,
}

/// Preferences collected by a completed questionnaire run.
///
/// Built exactly once when the last question is answered and never mutated
/// afterwards. `all_selected_tags` is the tag answers followed by the image
/// answers, eight entries in step order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreferenceDocument {
    pub username: Username,
    /// RFC 3339 UTC timestamp of completion
    pub timestamp: String,
    pub tag_preferences: TagPreferences,
    pub image_preferences: Vec<String>,
    pub all_selected_tags: Vec<String>,
}

// =============================================================================
// FixtureStore - The Read-Only In-Memory Store
// =============================================================================

/// Static records loaded at process start, standing in for a database.
///
/// Lookups return references; the store is shared behind `Arc` and never
/// mutated once loading has finished.
#[derive(Debug, Default)]
pub struct FixtureStore {
    pub(crate) games: HashMap<GameId, GameFixture>,
    pub(crate) users: HashMap<Username, UserFixture>,
}

impl FixtureStore {
    /// Creates a new, empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a stored game by id
    pub fn get_game(&self, id: &str) -> Option<&GameFixture> {
        self.games.get(id)
    }

    /// Get a user by username, as a full record
    pub fn get_user(&self, username: &str) -> Option<UserRecord> {
        self.users
            .get(username)
            .map(|fixture| UserRecord::from_fixture(username, fixture))
    }

    /// All stored game ids, sorted
    pub fn game_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.games.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// Insert a game into the store
    pub fn insert_game(&mut self, id: impl Into<GameId>, game: GameFixture) {
        self.games.insert(id.into(), game);
    }

    /// Insert a user into the store
    pub fn insert_user(&mut self, username: impl Into<Username>, user: UserFixture) {
        self.users.insert(username.into(), user);
    }

    /// (users, games) counts for logging
    pub fn counts(&self) -> (usize, usize) {
        (self.users.len(), self.games.len())
    }
}
