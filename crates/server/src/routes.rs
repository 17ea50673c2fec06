use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use data_loader::{GameId, GameRecord, PreferenceDocument, TagPreferences, UserRecord};
use questionnaire::{TAG_QUESTIONS, TagQuestion, partition_image_pool};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{debug, info};

use crate::error::{AppError, Result};
use crate::orchestrator::{EntryPath, HomeView};
use crate::session::{Session, sign_in_cookie, sign_out_cookie, validate_username};
use crate::state::AppState;

fn invalid_body(rejection: JsonRejection) -> AppError {
    AppError::InvalidInput(format!("Invalid request body: {}", rejection.body_text()))
}

pub async fn health_handler() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

// ============================================================================
// Games & users
// ============================================================================

#[derive(Serialize)]
pub struct GamesResponse {
    pub games: Vec<GameRecord>,
}

/// Turn a `gameIds` entry into a lookup key; non-strings use their JSON text
fn id_key(value: &Value) -> GameId {
    match value {
        Value::String(id) => id.clone(),
        other => other.to_string(),
    }
}

pub async fn games_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<Value>, JsonRejection>,
) -> Result<Json<GamesResponse>> {
    let Json(payload) = payload.map_err(invalid_body)?;

    let ids: Vec<GameId> = payload
        .get("gameIds")
        .and_then(Value::as_array)
        .ok_or_else(|| AppError::InvalidInput("Invalid gameIds format".to_string()))?
        .iter()
        .map(id_key)
        .collect();

    debug!("Resolving {} game ids", ids.len());
    Ok(Json(GamesResponse {
        games: state.store.resolve_games(&ids),
    }))
}

pub async fn user_handler(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<UserRecord>> {
    if username.trim().is_empty() {
        return Err(AppError::InvalidInput("Username is required".to_string()));
    }

    // Exact key lookup; padded names are different users
    state
        .store
        .get_user(&username)
        .map(Json)
        .ok_or(AppError::UserNotFound(username))
}

pub async fn missing_username_handler() -> AppError {
    AppError::InvalidInput("Username is required".to_string())
}

// ============================================================================
// Preferences
// ============================================================================

#[derive(Debug, Serialize)]
pub struct SavedPreferences {
    pub user_id: String,
    pub tag_preferences: TagPreferences,
    pub image_preferences: Vec<String>,
    pub all_selected_tags: Vec<String>,
    pub timestamp: String,
}

#[derive(Debug, Serialize)]
pub struct PreferencesResponse {
    pub success: bool,
    pub message: &'static str,
    pub data: SavedPreferences,
}

/// Accepts a finished questionnaire and echoes it back normalized.
/// Nothing is persisted.
pub async fn preferences_handler(
    payload: std::result::Result<Json<PreferenceDocument>, JsonRejection>,
) -> Result<Json<PreferencesResponse>> {
    let Json(document) = payload.map_err(invalid_body)?;
    info!(
        "Preferences received for {}: {:?}",
        document.username, document.all_selected_tags
    );

    Ok(Json(PreferencesResponse {
        success: true,
        message: "Preferences saved successfully",
        data: SavedPreferences {
            user_id: document.username,
            tag_preferences: document.tag_preferences,
            image_preferences: document.image_preferences,
            all_selected_tags: document.all_selected_tags,
            timestamp: document.timestamp,
        },
    }))
}

// ============================================================================
// Session
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct SignInRequest {
    pub username: String,
}

#[derive(Debug, Serialize)]
pub struct SignInResponse {
    pub username: String,
    pub message: String,
}

fn sign_in_response(username: &str, message: String) -> Result<Response> {
    let cookie = sign_in_cookie(username)?;
    Ok((
        [cookie],
        Json(SignInResponse {
            username: username.to_string(),
            message,
        }),
    )
        .into_response())
}

pub async fn sign_in_handler(
    payload: std::result::Result<Json<SignInRequest>, JsonRejection>,
) -> Result<Response> {
    let Json(request) = payload.map_err(invalid_body)?;
    let username = validate_username(&request.username)?;
    info!("{} signed in", username);
    sign_in_response(username, format!("Welcome back {username}!"))
}

pub async fn sign_up_handler(
    payload: std::result::Result<Json<SignInRequest>, JsonRejection>,
) -> Result<Response> {
    let Json(request) = payload.map_err(invalid_body)?;
    let username = validate_username(&request.username)?;
    info!("{} signed up", username);
    sign_in_response(
        username,
        format!("Welcome {username}! Account created successfully."),
    )
}

pub async fn sign_out_handler(session: Session) -> impl IntoResponse {
    if let Some(username) = session.username() {
        info!("{} signed out", username);
    }
    (StatusCode::NO_CONTENT, [sign_out_cookie()])
}

// ============================================================================
// Home view
// ============================================================================

pub async fn home_handler(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<HomeView>> {
    let view = state.home.assemble(&session, EntryPath::Returning).await?;
    Ok(Json(view))
}

pub async fn cold_start_handler(
    State(state): State<AppState>,
    session: Session,
    payload: std::result::Result<Json<PreferenceDocument>, JsonRejection>,
) -> Result<Json<HomeView>> {
    // Identity is checked before the body so a signed-out caller gets 401
    session.require_user()?;
    let Json(preferences) = payload.map_err(invalid_body)?;

    let view = state
        .home
        .assemble(&session, EntryPath::FirstVisit(preferences))
        .await?;
    Ok(Json(view))
}

// ============================================================================
// Questionnaire
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct QuestionnaireParams {
    pub seed: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct ImageOption {
    pub tag: &'static str,
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct ImageQuestionView {
    pub id: u8,
    pub title: &'static str,
    pub images: Vec<ImageOption>,
}

#[derive(Debug, Serialize)]
pub struct QuestionnaireView {
    pub seed: u64,
    pub tag_questions: &'static [TagQuestion],
    pub image_questions: Vec<ImageQuestionView>,
}

pub async fn questionnaire_handler(
    State(state): State<AppState>,
    params: std::result::Result<Query<QuestionnaireParams>, QueryRejection>,
) -> Result<Json<QuestionnaireView>> {
    let Query(params) = params.map_err(|e| AppError::InvalidInput(e.body_text()))?;
    let seed = params.seed.unwrap_or_else(rand::random);

    let image_questions = partition_image_pool(seed)
        .into_iter()
        .map(|question| ImageQuestionView {
            id: question.id,
            title: question.title,
            images: question
                .images
                .into_iter()
                .map(|tag| ImageOption {
                    tag,
                    url: state.images.url_for(tag),
                })
                .collect(),
        })
        .collect();

    Ok(Json(QuestionnaireView {
        seed,
        tag_questions: &TAG_QUESTIONS,
        image_questions,
    }))
}
