//! Fixtures shared by the unit tests: an in-memory database with the real
//! migrations applied, plus helpers that seed rows the service never writes
//! itself (gyms, profiles).

use std::time::Duration;

use chrono::Utc;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::db::models::Gym;

pub async fn memory_pool() -> SqlitePool {
    // One connection that never gets recycled, otherwise the in-memory
    // database disappears with it.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None::<Duration>)
        .max_lifetime(None::<Duration>)
        .connect("sqlite::memory:")
        .await
        .expect("open in-memory sqlite");

    crate::services::init::run_migrations(&pool)
        .await
        .expect("run migrations");

    pool
}

pub async fn create_gym(pool: &SqlitePool, name: &str) -> Gym {
    let now = Utc::now().naive_utc();
    sqlx::query_as::<_, Gym>(
        r#"
        INSERT INTO gyms (id, name, email, phone, address, created_at, updated_at)
        VALUES (?, ?, NULL, NULL, NULL, ?, ?)
        RETURNING id, name, email, phone, address, created_at, updated_at
        "#,
    )
    .bind(Uuid::new_v4().to_string())
    .bind(name)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await
    .expect("insert gym")
}

pub async fn create_profile(pool: &SqlitePool, user_id: &str, gym_id: Option<&str>) {
    let now = Utc::now().naive_utc();
    sqlx::query(
        r#"
        INSERT INTO profiles (id, user_id, gym_id, full_name, role, created_at, updated_at)
        VALUES (?, ?, ?, NULL, 'admin', ?, ?)
        "#,
    )
    .bind(Uuid::new_v4().to_string())
    .bind(user_id)
    .bind(gym_id)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await
    .expect("insert profile");
}

/// Settings row with every value column left NULL except `template_sent_by`,
/// the shape a row has when it was written by an older client.
pub async fn insert_raw_settings(pool: &SqlitePool, gym_id: &str, template_sent_by: Option<&str>) {
    let now = Utc::now().naive_utc();
    sqlx::query(
        r#"
        INSERT INTO gym_settings (id, gym_id, template_sent_by, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(Uuid::new_v4().to_string())
    .bind(gym_id)
    .bind(template_sent_by)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await
    .expect("insert raw settings");
}

pub async fn count_settings_rows(pool: &SqlitePool, gym_id: &str) -> i64 {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM gym_settings WHERE gym_id = ?")
        .bind(gym_id)
        .fetch_one(pool)
        .await
        .expect("count settings rows")
}
