use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    /// Id issued by the hosted auth backend (JWT `sub`).
    pub user_id: String,
    /// `None` until the user is attached to a gym.
    pub gym_id: Option<String>,
    pub full_name: Option<String>,
    pub role: String,

    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}
