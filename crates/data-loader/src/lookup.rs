//! Lookup service: resolve game ids into display records.
//!
//! ## Algorithm
//! Map each requested id through the store, in order. Known ids return the
//! stored record merged with the id; unknown ids synthesize a placeholder
//! priced at zero. The output is always 1:1 and order-preserving with the
//! input, duplicates included.

use crate::types::{FixtureStore, GameRecord};

/// Price used for games missing from the catalogue
pub const PLACEHOLDER_PRICE: &str = "$0.00";

impl GameRecord {
    /// Placeholder for an id the catalogue doesn't know
    pub fn placeholder(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            name: format!("Game {}", id),
            id,
            price: PLACEHOLDER_PRICE.to_string(),
            original_price: PLACEHOLDER_PRICE.to_string(),
            discount: None,
        }
    }
}

impl FixtureStore {
    /// Resolve one id to a record, falling back to a placeholder
    pub fn resolve_game(&self, id: &str) -> GameRecord {
        match self.get_game(id) {
            Some(game) => GameRecord::from_fixture(id, game),
            None => GameRecord::placeholder(id),
        }
    }

    /// Resolve a sequence of ids, 1:1 and in order
    pub fn resolve_games<S: AsRef<str>>(&self, ids: &[S]) -> Vec<GameRecord> {
        ids.iter().map(|id| self.resolve_game(id.as_ref())).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::GameFixture;

    fn store_with_stardew() -> FixtureStore {
        let mut store = FixtureStore::new();
        store.insert_game(
            "413150",
            GameFixture {
                name: "Stardew Valley".to_string(),
                price: "$14.99".to_string(),
                original_price: "$14.99".to_string(),
                discount: None,
            },
        );
        store
    }

    #[test]
    fn test_resolve_known_and_unknown() {
        let store = store_with_stardew();

        let games = store.resolve_games(&["413150", "unknown123"]);

        assert_eq!(games.len(), 2);
        assert_eq!(games[0].id, "413150");
        assert_eq!(games[0].name, "Stardew Valley");
        assert_eq!(games[0].price, "$14.99");

        assert_eq!(games[1], GameRecord {
            id: "unknown123".to_string(),
            name: "Game unknown123".to_string(),
            price: "$0.00".to_string(),
            original_price: "$0.00".to_string(),
            discount: None,
        });
    }

    #[test]
    fn test_resolve_preserves_order_and_duplicates() {
        let store = store_with_stardew();
        let ids = vec!["b", "413150", "a", "413150", ""];

        let games = store.resolve_games(&ids);

        let out: Vec<&str> = games.iter().map(|g| g.id.as_str()).collect();
        assert_eq!(out, ids);
        assert_eq!(games[4].name, "Game ");
    }

    #[test]
    fn test_resolve_empty() {
        let store = FixtureStore::new();
        let ids: Vec<String> = Vec::new();
        assert!(store.resolve_games(&ids).is_empty());
    }

    #[test]
    fn test_placeholder_serializes_without_discount() {
        let json = serde_json::to_value(GameRecord::placeholder("7")).unwrap();
        assert_eq!(json["originalPrice"], "$0.00");
        assert!(json.get("discount").is_none());
    }
}
