//! Integration tests for loading fixtures from disk.

use data_loader::{DataLoadError, FixtureStore, GAMES_FILE, USERS_FILE};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write_fixtures(dir: &Path, games: &str, users: &str) {
    fs::write(dir.join(GAMES_FILE), games).unwrap();
    fs::write(dir.join(USERS_FILE), users).unwrap();
}

#[test]
fn test_load_and_resolve_library() {
    let dir = TempDir::new().unwrap();
    write_fixtures(
        dir.path(),
        r#"{
            "413150": { "name": "Stardew Valley", "price": "$14.99", "originalPrice": "$14.99" },
            "1245620": { "name": "ELDEN RING", "price": "$47.99", "originalPrice": "$59.99", "discount": "-20%" }
        }"#,
        r#"{ "alice": { "num_games_owned": 3, "games": ["1245620", "413150", "31337"] } }"#,
    );

    let store = FixtureStore::load_from_dir(dir.path()).unwrap();
    assert_eq!(store.counts(), (1, 2));

    let user = store.get_user("alice").unwrap();
    let library = store.resolve_games(&user.games);

    let names: Vec<&str> = library.iter().map(|g| g.name.as_str()).collect();
    assert_eq!(names, vec!["ELDEN RING", "Stardew Valley", "Game 31337"]);
    assert_eq!(library[0].discount.as_deref(), Some("-20%"));
    assert_eq!(library[2].price, "$0.00");
}

#[test]
fn test_missing_file_reported() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join(GAMES_FILE), "{}").unwrap();

    let err = FixtureStore::load_from_dir(dir.path()).unwrap_err();
    match err {
        DataLoadError::FileNotFound { path } => assert!(path.ends_with(USERS_FILE)),
        other => panic!("expected FileNotFound, got {:?}", other),
    }
}

#[test]
fn test_malformed_user_rejected() {
    let dir = TempDir::new().unwrap();
    write_fixtures(
        dir.path(),
        "{}",
        r#"{ "alice": { "num_games_owned": "three", "games": [] } }"#,
    );

    let err = FixtureStore::load_from_dir(dir.path()).unwrap_err();
    assert!(matches!(err, DataLoadError::ParseError { .. }));
}
