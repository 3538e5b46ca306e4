use std::sync::Arc;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;

use crate::db::{GymFields, TemplateSentBy};
use crate::error::{AppError, AppErrorWithDetails};
use crate::routes::auth::AuthUser;
use crate::services::settings::{SettingsForm, SettingsFormValues};
use crate::services::settings_form::{FormState, LoadedSettings, SaveOutcome, SettingsFormController};
use crate::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(get_settings).put(update_settings))
        .route("/reset", post(reset_settings))
}

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct SettingsResponse {
    pub gym_id: String,
    /// `None` until the first save creates the settings row.
    pub settings_id: Option<String>,
    pub is_new: bool,
    /// Set when this request created the settings row.
    pub created: bool,
    pub gym: GymFields,
    pub settings: SettingsFormValues,
    /// What `settings.sale_methods` is stored as.
    pub template_sent_by: TemplateSentBy,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl SettingsResponse {
    fn from_loaded(loaded: LoadedSettings, created: bool, message: Option<String>) -> Self {
        let template_sent_by = loaded.form.settings.to_fields().template_sent_by;
        Self {
            gym_id: loaded.gym_id,
            settings_id: loaded.settings.id().map(str::to_string),
            is_new: loaded.settings.is_absent(),
            created,
            gym: loaded.form.gym,
            settings: loaded.form.settings,
            template_sent_by,
            message,
        }
    }
}

impl From<SaveOutcome> for SettingsResponse {
    fn from(outcome: SaveOutcome) -> Self {
        Self::from_loaded(outcome.loaded, outcome.created, Some(outcome.message))
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// Build a controller for the caller and load their gym's settings.
async fn load_for(
    state: &Arc<AppState>,
    user_id: &str,
) -> Result<(SettingsFormController, LoadedSettings), AppErrorWithDetails> {
    let controller =
        SettingsFormController::new(state.store.clone(), &state.config.i18n.default_lang);

    match controller.load(user_id).await {
        FormState::Ready(loaded) => Ok((controller, loaded)),
        FormState::Error(err) => Err(err.into()),
        other => Err(AppError::Internal(anyhow::anyhow!(
            "settings load ended in unexpected state {:?}",
            other
        ))
        .into()),
    }
}

/// Current settings of the caller's gym, defaults filled in
async fn get_settings(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
) -> Result<Json<SettingsResponse>, AppErrorWithDetails> {
    let (_, loaded) = load_for(&state, &user.id).await?;
    Ok(Json(SettingsResponse::from_loaded(loaded, false, None)))
}

/// Save gym contact fields and settings
async fn update_settings(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Json(form): Json<SettingsForm>,
) -> Result<Json<SettingsResponse>, AppErrorWithDetails> {
    let (controller, _) = load_for(&state, &user.id).await?;
    let outcome = controller.save(form).await?;
    Ok(Json(outcome.into()))
}

/// Restore default settings
async fn reset_settings(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
) -> Result<Json<SettingsResponse>, AppErrorWithDetails> {
    let (controller, _) = load_for(&state, &user.id).await?;
    let outcome = controller.reset().await?;
    Ok(Json(outcome.into()))
}
