//! # Home View Orchestrator
//!
//! Assembles everything the library page shows, as a chain of stages where
//! each stage only runs if the previous one succeeded:
//! 1. Resolve the identity from the session
//! 2. Fetch the user record
//! 3. Resolve the owned games
//! 4. Ask the recommendation service for ids (warm or cold start)
//! 5. Resolve the recommended games
//!
//! Stages run strictly in sequence. The first failure ends the chain and
//! is the only thing reported; games resolved by earlier stages are
//! dropped with it.

use std::sync::Arc;
use std::time::Instant;

use data_loader::{FixtureStore, GameId, GameRecord, PreferenceDocument, UserRecord};
use rec_client::Recommender;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{AppError, Result};
use crate::session::Session;

/// How the user arrived at the home view
#[derive(Debug, Clone)]
pub enum EntryPath {
    /// Returning user: recommend from their history
    Returning,
    /// Just finished the questionnaire: recommend from these preferences
    FirstVisit(PreferenceDocument),
}

/// Everything the home view renders
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HomeView {
    pub username: String,
    pub num_games_owned: u32,
    pub owned_games: Vec<GameRecord>,
    pub recommended_games: Vec<GameRecord>,
}

/// Coordinates the fixture store and the recommendation service
#[derive(Clone)]
pub struct HomeOrchestrator {
    store: Arc<FixtureStore>,
    recommender: Arc<dyn Recommender>,
}

impl HomeOrchestrator {
    pub fn new(store: Arc<FixtureStore>, recommender: Arc<dyn Recommender>) -> Self {
        Self { store, recommender }
    }

    /// Main entry point: build the home view for a session
    pub async fn assemble(&self, session: &Session, entry: EntryPath) -> Result<HomeView> {
        let start_time = Instant::now();

        let username = self.identify(session)?;
        let user = self.fetch_user(username, &entry)?;

        let owned_games = self.store.resolve_games(&user.games);
        debug!("Resolved {} owned games for {}", owned_games.len(), username);

        let ids = self.request_recommendations(username, &entry).await?;

        let recommended_games = self.store.resolve_games(&ids);
        info!(
            "Home view for {} ready: {} owned, {} recommended in {:.2?}",
            username,
            owned_games.len(),
            recommended_games.len(),
            start_time.elapsed()
        );

        Ok(HomeView {
            username: user.username,
            num_games_owned: user.num_games_owned,
            owned_games,
            recommended_games,
        })
    }

    fn identify<'a>(&self, session: &'a Session) -> Result<&'a str> {
        session.require_user()
    }

    /// Look the user up; a first visit may not be in the fixtures yet and
    /// gets an empty library instead.
    fn fetch_user(&self, username: &str, entry: &EntryPath) -> Result<UserRecord> {
        match (self.store.get_user(username), entry) {
            (Some(user), _) => Ok(user),
            (None, EntryPath::FirstVisit(_)) => {
                debug!("{} not in fixtures, starting with an empty library", username);
                Ok(UserRecord::empty(username))
            }
            (None, EntryPath::Returning) => Err(AppError::UserNotFound(username.to_string())),
        }
    }

    async fn request_recommendations(
        &self,
        username: &str,
        entry: &EntryPath,
    ) -> Result<Vec<GameId>> {
        let ids = match entry {
            EntryPath::Returning => self.recommender.recommend(username).await?,
            EntryPath::FirstVisit(preferences) => {
                if preferences.username != username {
                    warn!(
                        "Preferences for {} submitted by session {}",
                        preferences.username, username
                    );
                }
                self.recommender.recommend_cold_start(preferences).await?
            }
        };
        Ok(ids)
    }
}
