//! State machine behind the gym settings page.
//!
//! `Idle -> Loading -> Ready | Error`. Loading resolves the user's gym, the
//! gym record and its settings row (in that order) and populates the form.
//! Saves run from `Ready` and never leave it: a failed save reports an error
//! and keeps the submitted values so they can be resubmitted.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::RwLock;

use crate::db::{Gym, GymFields, SettingsLookup};
use crate::error::AppError;
use crate::i18n;
use crate::services::settings::{FieldError, SettingsForm, SettingsFormValues, SettingsService};
use crate::services::store::SettingsStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SettingsErrorKind {
    /// The user has no gym. Only fixable outside this page.
    Lookup,
    /// Reading the gym or its settings failed. Retry.
    Fetch,
    /// Writing failed. Resubmit.
    Persist,
    /// The submitted form was rejected before anything was written.
    Validation,
    /// A save was attempted before the settings were loaded.
    NotReady,
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct SettingsError {
    pub kind: SettingsErrorKind,
    /// Translated, safe to show to the user.
    pub message: String,
    pub fields: Vec<FieldError>,
}

impl SettingsError {
    pub fn is_retryable(&self) -> bool {
        self.kind != SettingsErrorKind::Lookup
    }
}

impl From<SettingsError> for crate::error::AppErrorWithDetails {
    fn from(err: SettingsError) -> Self {
        let details = serde_json::json!({
            "kind": err.kind,
            "retryable": err.is_retryable(),
            "fields": err.fields,
        });
        let app_error = match err.kind {
            SettingsErrorKind::Lookup => AppError::NotFound(err.message),
            SettingsErrorKind::Fetch => AppError::ServiceUnavailable(err.message),
            SettingsErrorKind::Persist => AppError::SaveFailed(err.message),
            SettingsErrorKind::Validation => AppError::Validation(err.message),
            SettingsErrorKind::NotReady => AppError::Conflict(err.message),
        };
        app_error.with_details(details)
    }
}

/// Everything known once loading succeeded.
#[derive(Debug, Clone)]
pub struct LoadedSettings {
    pub gym_id: String,
    /// Gym as last read from or written to the store.
    pub gym: Gym,
    /// Settings row as last read from or written to the store.
    pub settings: SettingsLookup,
    /// Values currently on the form. After a failed save these are the
    /// submitted values, not the stored ones.
    pub form: SettingsForm,
}

#[derive(Debug, Clone)]
pub enum FormState {
    Idle,
    Loading,
    Ready(LoadedSettings),
    Error(SettingsError),
}

#[derive(Debug, Clone)]
pub struct SaveOutcome {
    pub loaded: LoadedSettings,
    /// `true` when this save created the gym's first settings row.
    pub created: bool,
    /// Translated confirmation.
    pub message: String,
}

pub struct SettingsFormController {
    store: Arc<dyn SettingsStore>,
    lang: String,
    state: RwLock<FormState>,
    user_id: RwLock<Option<String>>,
    in_flight: AtomicBool,
}

/// Clears the in-flight flag however the load ends, including cancellation.
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl SettingsFormController {
    pub fn new(store: Arc<dyn SettingsStore>, lang: &str) -> Self {
        Self {
            store,
            lang: lang.to_string(),
            state: RwLock::new(FormState::Idle),
            user_id: RwLock::new(None),
            in_flight: AtomicBool::new(false),
        }
    }

    pub async fn state(&self) -> FormState {
        self.state.read().await.clone()
    }

    /// Load settings for `user_id`. If a load is already running the call is
    /// skipped, has no effect and returns the current state.
    pub async fn load(&self, user_id: &str) -> FormState {
        self.run_load(user_id).await
    }

    /// Repeat the last load. Does nothing before the first `load`.
    pub async fn retry(&self) -> FormState {
        let user_id = self.user_id.read().await.clone();
        match user_id {
            Some(user_id) => {
                tracing::debug!("Retrying settings load for user {}", user_id);
                self.run_load(&user_id).await
            }
            None => self.state().await,
        }
    }

    /// Validate and persist the form. Only valid in `Ready`; the controller
    /// stays `Ready` whatever the outcome.
    pub async fn save(&self, form: SettingsForm) -> Result<SaveOutcome, SettingsError> {
        let loaded = self.ready().await?;
        let form = SettingsService::normalize(form);

        let fields = SettingsService::validate(&form, &self.lang);
        if !fields.is_empty() {
            tracing::debug!(
                "Rejected settings for gym {}: {} invalid field(s)",
                loaded.gym_id,
                fields.len()
            );
            self.keep_draft(loaded, form).await;
            return Err(SettingsError {
                kind: SettingsErrorKind::Validation,
                message: self.message("settings.error.validation"),
                fields,
            });
        }

        self.persist(loaded, form, "settings.saved").await
    }

    /// Save the default settings, keeping the gym's contact fields.
    pub async fn reset(&self) -> Result<SaveOutcome, SettingsError> {
        let loaded = self.ready().await?;
        let form = SettingsService::defaults_for(GymFields::from(&loaded.gym));
        self.persist(loaded, form, "settings.reset").await
    }

    async fn ready(&self) -> Result<LoadedSettings, SettingsError> {
        match self.state().await {
            FormState::Ready(loaded) => Ok(loaded),
            _ => Err(self.error(SettingsErrorKind::NotReady, "settings.error.not_ready")),
        }
    }

    async fn run_load(&self, user_id: &str) -> FormState {
        if self.in_flight.swap(true, Ordering::AcqRel) {
            tracing::debug!("Settings load already in flight, skipping");
            return self.state().await;
        }
        let _guard = InFlight(&self.in_flight);

        *self.user_id.write().await = Some(user_id.to_string());
        *self.state.write().await = FormState::Loading;

        let next = match self.fetch_all(user_id).await {
            Ok(loaded) => FormState::Ready(loaded),
            Err(err) => FormState::Error(err),
        };

        *self.state.write().await = next.clone();
        next
    }

    async fn fetch_all(&self, user_id: &str) -> Result<LoadedSettings, SettingsError> {
        let gym_id = self
            .store
            .fetch_tenant_id(user_id)
            .await
            .map_err(|e| match e {
                AppError::NotFound(_) => {
                    tracing::warn!("User {} has no gym", user_id);
                    self.error(SettingsErrorKind::Lookup, "settings.error.no_tenant")
                }
                other => self.fetch_error(other),
            })?;

        let gym = self
            .store
            .fetch_gym(&gym_id)
            .await
            .map_err(|e| self.fetch_error(e))?;

        let settings = self
            .store
            .fetch_settings(&gym_id)
            .await
            .map_err(|e| self.fetch_error(e))?;

        if settings.is_absent() {
            tracing::debug!("Gym {} has no settings yet, using defaults", gym_id);
        }

        let form = SettingsForm {
            gym: GymFields::from(&gym),
            settings: SettingsFormValues::from_record(settings.record()),
        };

        Ok(LoadedSettings {
            gym_id,
            gym,
            settings,
            form,
        })
    }

    async fn persist(
        &self,
        loaded: LoadedSettings,
        form: SettingsForm,
        confirmation_key: &str,
    ) -> Result<SaveOutcome, SettingsError> {
        let gym_id = loaded.gym_id.clone();

        let gym_result = self.store.persist_gym(&gym_id, &form.gym).await;
        let gym = match gym_result {
            Ok(gym) => gym,
            Err(e) => return Err(self.persist_failed(loaded, form, e).await),
        };

        let fields = form.settings.to_fields();
        let settings_result = self
            .store
            .persist_settings(&gym_id, &loaded.settings, &fields)
            .await;
        let record = match settings_result {
            Ok(record) => record,
            Err(e) => {
                let loaded = LoadedSettings { gym, ..loaded };
                return Err(self.persist_failed(loaded, form, e).await);
            }
        };

        let created = loaded.settings.is_absent();
        let settings = SettingsLookup::Found {
            id: record.id.clone(),
            record,
        };
        let refreshed = LoadedSettings {
            gym_id,
            form: SettingsForm {
                gym: GymFields::from(&gym),
                settings: SettingsFormValues::from_record(settings.record()),
            },
            gym,
            settings,
        };

        *self.state.write().await = FormState::Ready(refreshed.clone());

        tracing::info!(
            "Saved settings for gym {} ({})",
            refreshed.gym_id,
            if created { "created" } else { "updated" }
        );

        Ok(SaveOutcome {
            loaded: refreshed,
            created,
            message: self.message(confirmation_key),
        })
    }

    async fn persist_failed(
        &self,
        loaded: LoadedSettings,
        form: SettingsForm,
        err: AppError,
    ) -> SettingsError {
        tracing::error!("Failed to save settings for gym {}: {}", loaded.gym_id, err);
        self.keep_draft(loaded, form).await;
        self.error(SettingsErrorKind::Persist, "settings.error.persist_failed")
    }

    async fn keep_draft(&self, loaded: LoadedSettings, form: SettingsForm) {
        *self.state.write().await = FormState::Ready(LoadedSettings { form, ..loaded });
    }

    fn fetch_error(&self, err: AppError) -> SettingsError {
        tracing::error!("Failed to load settings: {}", err);
        self.error(SettingsErrorKind::Fetch, "settings.error.fetch_failed")
    }

    fn error(&self, kind: SettingsErrorKind, key: &str) -> SettingsError {
        SettingsError {
            kind,
            message: self.message(key),
            fields: Vec::new(),
        }
    }

    fn message(&self, key: &str) -> String {
        i18n::tr(Some(self.lang.as_str()), key, None)
    }
}
