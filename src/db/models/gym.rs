use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A tenant. Every settings row and business row hangs off one of these.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Gym {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,

    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Editable contact fields of a gym.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct GymFields {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

impl From<&Gym> for GymFields {
    fn from(gym: &Gym) -> Self {
        Self {
            name: gym.name.clone(),
            email: gym.email.clone(),
            phone: gym.phone.clone(),
            address: gym.address.clone(),
        }
    }
}
