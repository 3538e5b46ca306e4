use chrono::Utc;
use sqlx::SqlitePool;

use crate::db::models::*;
use crate::error::{AppError, AppResult};

// ============================================================================
// Gym Repository
// ============================================================================

pub struct GymRepository;

impl GymRepository {
    pub async fn find_by_id(pool: &SqlitePool, id: &str) -> AppResult<Option<Gym>> {
        sqlx::query_as::<_, Gym>(
            r#"
            SELECT id, name, email, phone, address, created_at, updated_at
            FROM gyms
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(AppError::Database)
    }

    /// Overwrite the contact fields of a gym.
    pub async fn update(pool: &SqlitePool, id: &str, fields: &GymFields) -> AppResult<Gym> {
        let now = Utc::now().naive_utc();

        sqlx::query_as::<_, Gym>(
            r#"
            UPDATE gyms
            SET name = ?,
                email = ?,
                phone = ?,
                address = ?,
                updated_at = ?
            WHERE id = ?
            RETURNING id, name, email, phone, address, created_at, updated_at
            "#,
        )
        .bind(&fields.name)
        .bind(&fields.email)
        .bind(&fields.phone)
        .bind(&fields.address)
        .bind(now)
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(AppError::Database)?
        .ok_or_else(|| AppError::NotFound(format!("Gym {} not found", id)))
    }
}
