use std::sync::Arc;

use data_loader::FixtureStore;
use questionnaire::ImageResolver;
use rec_client::Recommender;

use crate::orchestrator::HomeOrchestrator;
use crate::session::{CookieIdentity, IdentityResolver};

/// Shared application context passed to all handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<FixtureStore>,
    pub home: HomeOrchestrator,
    pub identity: Arc<dyn IdentityResolver>,
    pub images: ImageResolver,
}

impl AppState {
    /// State with cookie-based identity
    pub fn new(
        store: Arc<FixtureStore>,
        recommender: Arc<dyn Recommender>,
        images: ImageResolver,
    ) -> Self {
        Self::with_identity(store, recommender, images, Arc::new(CookieIdentity))
    }

    pub fn with_identity(
        store: Arc<FixtureStore>,
        recommender: Arc<dyn Recommender>,
        images: ImageResolver,
        identity: Arc<dyn IdentityResolver>,
    ) -> Self {
        Self {
            home: HomeOrchestrator::new(store.clone(), recommender),
            store,
            identity,
            images,
        }
    }
}
