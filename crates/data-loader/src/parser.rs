//! Parser for the JSON fixture files.
//!
//! - games.json: `{ "<game id>": { "name", "price", "originalPrice", "discount"? } }`
//! - user.json: `{ "<username>": { "num_games_owned", "games": ["<game id>", ...] } }`
//!
//! Both files are deserialized into closed record shapes (unknown fields are
//! rejected) and then checked field by field, so a malformed fixture fails
//! at startup instead of on the first request that touches it.

use crate::error::{DataLoadError, Result};
use crate::types::*;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::warn;

/// Read a fixture file and deserialize it as a JSON object of records
fn read_fixture<T: DeserializeOwned>(path: &Path) -> Result<Vec<(String, T)>> {
    let file = path
        .file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let content = fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => DataLoadError::FileNotFound {
            path: path.display().to_string(),
        },
        _ => DataLoadError::IoError(e),
    })?;

    parse_fixture(&file, &content)
}

/// Deserialize fixture text; `file` is only used for error context
pub(crate) fn parse_fixture<T: DeserializeOwned>(
    file: &str,
    content: &str,
) -> Result<Vec<(String, T)>> {
    let records: HashMap<String, T> =
        serde_json::from_str(content).map_err(|e| DataLoadError::ParseError {
            file: file.to_string(),
            reason: e.to_string(),
        })?;

    let mut records: Vec<(String, T)> = records.into_iter().collect();
    records.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(records)
}

fn require_non_empty(key: &str, field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(DataLoadError::InvalidValue {
            key: key.to_string(),
            field: field.to_string(),
            value: value.to_string(),
        });
    }
    Ok(())
}

fn require_price(key: &str, field: &str, value: &str) -> Result<()> {
    require_non_empty(key, field, value)?;
    if !value.starts_with('$') {
        return Err(DataLoadError::InvalidValue {
            key: key.to_string(),
            field: field.to_string(),
            value: value.to_string(),
        });
    }
    Ok(())
}

/// Check a single game fixture
pub fn validate_game(id: &str, game: &GameFixture) -> Result<()> {
    require_non_empty(id, "id", id)?;
    require_non_empty(id, "name", &game.name)?;
    require_price(id, "price", &game.price)?;
    require_price(id, "originalPrice", &game.original_price)?;
    if let Some(discount) = &game.discount {
        require_non_empty(id, "discount", discount)?;
    }
    Ok(())
}

/// Check a single user fixture
///
/// A `num_games_owned` that disagrees with the library length is only
/// logged: the fixture number is what the storefront displays.
pub fn validate_user(username: &str, user: &UserFixture) -> Result<()> {
    require_non_empty(username, "username", username)?;
    for game_id in &user.games {
        require_non_empty(username, "games", game_id)?;
    }
    if user.num_games_owned as usize != user.games.len() {
        warn!(
            "User {} claims {} games but lists {}",
            username,
            user.num_games_owned,
            user.games.len()
        );
    }
    Ok(())
}

/// Parse and validate games.json
pub fn parse_games(path: &Path) -> Result<Vec<(GameId, GameFixture)>> {
    let games: Vec<(GameId, GameFixture)> = read_fixture(path)?;
    for (id, game) in &games {
        validate_game(id, game)?;
    }
    Ok(games)
}

/// Parse and validate user.json
pub fn parse_users(path: &Path) -> Result<Vec<(Username, UserFixture)>> {
    let users: Vec<(Username, UserFixture)> = read_fixture(path)?;
    for (username, user) in &users {
        validate_user(username, user)?;
    }
    Ok(users)
}
