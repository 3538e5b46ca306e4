use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::db::models::*;
use crate::error::{AppError, AppResult};

// ============================================================================
// Gym Settings Repository
// ============================================================================

pub struct GymSettingsRepository;

impl GymSettingsRepository {
    pub async fn find_by_gym_id(pool: &SqlitePool, gym_id: &str) -> AppResult<SettingsLookup> {
        let row = sqlx::query_as::<_, GymSettings>(
            r#"
            SELECT
                id, gym_id,
                max_trials_per_client, days_to_active_confirmation,
                followup_days_after_trial, followup_days_inactive,
                enable_auto_followup, enable_trial_questionnaire,
                trainer_assignment_logic, template_sent_by,
                created_at, updated_at
            FROM gym_settings
            WHERE gym_id = ?
            "#,
        )
        .bind(gym_id)
        .fetch_optional(pool)
        .await
        .map_err(AppError::Database)?;

        Ok(SettingsLookup::from(row))
    }

    pub async fn insert(
        pool: &SqlitePool,
        gym_id: &str,
        fields: &GymSettingsFields,
    ) -> AppResult<GymSettings> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now().naive_utc();

        sqlx::query_as::<_, GymSettings>(
            r#"
            INSERT INTO gym_settings (
                id, gym_id,
                max_trials_per_client, days_to_active_confirmation,
                followup_days_after_trial, followup_days_inactive,
                enable_auto_followup, enable_trial_questionnaire,
                trainer_assignment_logic, template_sent_by,
                created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING
                id, gym_id,
                max_trials_per_client, days_to_active_confirmation,
                followup_days_after_trial, followup_days_inactive,
                enable_auto_followup, enable_trial_questionnaire,
                trainer_assignment_logic, template_sent_by,
                created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(gym_id)
        .bind(fields.max_trials_per_client)
        .bind(fields.days_to_active_confirmation)
        .bind(fields.followup_days_after_trial)
        .bind(fields.followup_days_inactive)
        .bind(fields.enable_auto_followup)
        .bind(fields.enable_trial_questionnaire)
        .bind(&fields.trainer_assignment_logic)
        .bind(fields.template_sent_by.as_str())
        .bind(now)
        .bind(now)
        .fetch_one(pool)
        .await
        .map_err(AppError::Database)
    }

    /// Update the row `id`. The `gym_id` guard keeps a stale or foreign id
    /// from touching another tenant's row.
    pub async fn update(
        pool: &SqlitePool,
        id: &str,
        gym_id: &str,
        fields: &GymSettingsFields,
    ) -> AppResult<GymSettings> {
        let now = Utc::now().naive_utc();

        sqlx::query_as::<_, GymSettings>(
            r#"
            UPDATE gym_settings
            SET max_trials_per_client = ?,
                days_to_active_confirmation = ?,
                followup_days_after_trial = ?,
                followup_days_inactive = ?,
                enable_auto_followup = ?,
                enable_trial_questionnaire = ?,
                trainer_assignment_logic = ?,
                template_sent_by = ?,
                updated_at = ?
            WHERE id = ? AND gym_id = ?
            RETURNING
                id, gym_id,
                max_trials_per_client, days_to_active_confirmation,
                followup_days_after_trial, followup_days_inactive,
                enable_auto_followup, enable_trial_questionnaire,
                trainer_assignment_logic, template_sent_by,
                created_at, updated_at
            "#,
        )
        .bind(fields.max_trials_per_client)
        .bind(fields.days_to_active_confirmation)
        .bind(fields.followup_days_after_trial)
        .bind(fields.followup_days_inactive)
        .bind(fields.enable_auto_followup)
        .bind(fields.enable_trial_questionnaire)
        .bind(&fields.trainer_assignment_logic)
        .bind(fields.template_sent_by.as_str())
        .bind(now)
        .bind(id)
        .bind(gym_id)
        .fetch_optional(pool)
        .await
        .map_err(AppError::Database)?
        .ok_or_else(|| AppError::NotFound(format!("Settings {} not found for gym {}", id, gym_id)))
    }

    /// Insert when nothing was found on load, update the known row otherwise.
    pub async fn persist(
        pool: &SqlitePool,
        gym_id: &str,
        existing: &SettingsLookup,
        fields: &GymSettingsFields,
    ) -> AppResult<GymSettings> {
        match existing {
            SettingsLookup::Found { id, .. } => {
                tracing::debug!("Updating settings {} for gym {}", id, gym_id);
                Self::update(pool, id, gym_id, fields).await
            }
            SettingsLookup::Absent => {
                tracing::debug!("Creating first settings row for gym {}", gym_id);
                Self::insert(pool, gym_id, fields).await
            }
        }
    }
}
