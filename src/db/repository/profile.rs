use sqlx::SqlitePool;

use crate::db::models::*;
use crate::error::{AppError, AppResult};

// ============================================================================
// Profile Repository (user -> gym link)
// ============================================================================

pub struct ProfileRepository;

impl ProfileRepository {
    pub async fn find_by_user_id(pool: &SqlitePool, user_id: &str) -> AppResult<Option<Profile>> {
        sqlx::query_as::<_, Profile>(
            r#"
            SELECT id, user_id, gym_id, full_name, role, created_at, updated_at
            FROM profiles
            WHERE user_id = ?
            "#,
        )
        .bind(user_id)
        .fetch_optional(pool)
        .await
        .map_err(AppError::Database)
    }

    /// Gym the user belongs to. `None` when there is no profile row or the
    /// profile is not attached to a gym yet.
    pub async fn find_gym_id(pool: &SqlitePool, user_id: &str) -> AppResult<Option<String>> {
        Ok(Self::find_by_user_id(pool, user_id)
            .await?
            .and_then(|profile| profile.gym_id))
    }
}
