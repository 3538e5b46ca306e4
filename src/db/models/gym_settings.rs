use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Stored row of `gym_settings`. Every value column is nullable: a column
/// that was never written reads back as `None` and the form layer falls
/// back to its documented default.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct GymSettings {
    pub id: String,
    pub gym_id: String,
    pub max_trials_per_client: Option<i64>,
    pub days_to_active_confirmation: Option<i64>,
    pub followup_days_after_trial: Option<i64>,
    pub followup_days_inactive: Option<i64>,
    pub enable_auto_followup: Option<bool>,
    pub enable_trial_questionnaire: Option<bool>,
    pub trainer_assignment_logic: Option<String>,
    /// Raw column value. Unknown text is tolerated and reconciled to `both`.
    pub template_sent_by: Option<String>,

    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Who sends workout templates to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateSentBy {
    Trainer,
    System,
    Both,
}

impl TemplateSentBy {
    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateSentBy::Trainer => "trainer",
            TemplateSentBy::System => "system",
            TemplateSentBy::Both => "both",
        }
    }

    /// Parse the stored column value. Returns `None` for anything outside
    /// the enum domain.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "trainer" => Some(TemplateSentBy::Trainer),
            "system" => Some(TemplateSentBy::System),
            "both" => Some(TemplateSentBy::Both),
            _ => None,
        }
    }
}

impl fmt::Display for TemplateSentBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fully resolved values written to `gym_settings` on save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GymSettingsFields {
    pub max_trials_per_client: i64,
    pub days_to_active_confirmation: i64,
    pub followup_days_after_trial: i64,
    pub followup_days_inactive: i64,
    pub enable_auto_followup: bool,
    pub enable_trial_questionnaire: bool,
    pub trainer_assignment_logic: String,
    pub template_sent_by: TemplateSentBy,
}

/// Outcome of reading a gym's settings row.
///
/// `Absent` is an expected state (nothing saved yet) and drives an insert on
/// the next persist; `Found` drives an update of that exact row.
#[derive(Debug, Clone)]
pub enum SettingsLookup {
    Found { id: String, record: GymSettings },
    Absent,
}

impl SettingsLookup {
    pub fn id(&self) -> Option<&str> {
        match self {
            SettingsLookup::Found { id, .. } => Some(id.as_str()),
            SettingsLookup::Absent => None,
        }
    }

    pub fn record(&self) -> Option<&GymSettings> {
        match self {
            SettingsLookup::Found { record, .. } => Some(record),
            SettingsLookup::Absent => None,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, SettingsLookup::Absent)
    }
}

impl From<Option<GymSettings>> for SettingsLookup {
    fn from(row: Option<GymSettings>) -> Self {
        match row {
            Some(record) => SettingsLookup::Found {
                id: record.id.clone(),
                record,
            },
            None => SettingsLookup::Absent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_sent_by_parses_only_known_values() {
        assert_eq!(TemplateSentBy::parse("trainer"), Some(TemplateSentBy::Trainer));
        assert_eq!(TemplateSentBy::parse("system"), Some(TemplateSentBy::System));
        assert_eq!(TemplateSentBy::parse("both"), Some(TemplateSentBy::Both));
        assert_eq!(TemplateSentBy::parse("Trainer"), None);
        assert_eq!(TemplateSentBy::parse(""), None);
    }

    #[test]
    fn lookup_from_missing_row_is_absent() {
        let lookup = SettingsLookup::from(None);
        assert!(lookup.is_absent());
        assert!(lookup.id().is_none());
        assert!(lookup.record().is_none());
    }
}
