use serde::{Deserialize, Serialize};

use crate::db::{GymFields, GymSettings, GymSettingsFields};
use crate::i18n;
use crate::services::reconcile::{self, SaleMethods};

pub const DEFAULT_MAX_TRIALS_PER_CLIENT: i64 = 1;
pub const DEFAULT_DAYS_TO_ACTIVE_CONFIRMATION: i64 = 30;
pub const DEFAULT_FOLLOWUP_DAYS_AFTER_TRIAL: i64 = 2;
pub const DEFAULT_FOLLOWUP_DAYS_INACTIVE: i64 = 7;
pub const DEFAULT_ENABLE_AUTO_FOLLOWUP: bool = true;
pub const DEFAULT_ENABLE_TRIAL_QUESTIONNAIRE: bool = true;
pub const DEFAULT_TRAINER_ASSIGNMENT_LOGIC: &str = "manual";

const MAX_TRIALS_RANGE: (i64, i64) = (0, 100);
const DAY_OFFSET_RANGE: (i64, i64) = (0, 365);

/// Settings half of the form, with the stored enum already expanded into
/// `sale_methods`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsFormValues {
    pub max_trials_per_client: i64,
    pub days_to_active_confirmation: i64,
    pub followup_days_after_trial: i64,
    pub followup_days_inactive: i64,
    pub enable_auto_followup: bool,
    pub enable_trial_questionnaire: bool,
    pub trainer_assignment_logic: String,
    pub sale_methods: SaleMethods,
}

impl Default for SettingsFormValues {
    fn default() -> Self {
        Self::from_record(None)
    }
}

impl SettingsFormValues {
    /// Populate the form from a stored row. Columns that are `NULL` (or a
    /// missing row) take the documented defaults; an explicit `false` is kept.
    pub fn from_record(record: Option<&GymSettings>) -> Self {
        Self {
            max_trials_per_client: record
                .and_then(|r| r.max_trials_per_client)
                .unwrap_or(DEFAULT_MAX_TRIALS_PER_CLIENT),
            days_to_active_confirmation: record
                .and_then(|r| r.days_to_active_confirmation)
                .unwrap_or(DEFAULT_DAYS_TO_ACTIVE_CONFIRMATION),
            followup_days_after_trial: record
                .and_then(|r| r.followup_days_after_trial)
                .unwrap_or(DEFAULT_FOLLOWUP_DAYS_AFTER_TRIAL),
            followup_days_inactive: record
                .and_then(|r| r.followup_days_inactive)
                .unwrap_or(DEFAULT_FOLLOWUP_DAYS_INACTIVE),
            enable_auto_followup: record
                .and_then(|r| r.enable_auto_followup)
                .unwrap_or(DEFAULT_ENABLE_AUTO_FOLLOWUP),
            enable_trial_questionnaire: record
                .and_then(|r| r.enable_trial_questionnaire)
                .unwrap_or(DEFAULT_ENABLE_TRIAL_QUESTIONNAIRE),
            trainer_assignment_logic: record
                .and_then(|r| r.trainer_assignment_logic.clone())
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_TRAINER_ASSIGNMENT_LOGIC.to_string()),
            sale_methods: reconcile::to_sale_methods(
                record.and_then(|r| r.template_sent_by.as_deref()),
            ),
        }
    }

    /// Values to write, with `sale_methods` collapsed into `template_sent_by`.
    pub fn to_fields(&self) -> GymSettingsFields {
        GymSettingsFields {
            max_trials_per_client: self.max_trials_per_client,
            days_to_active_confirmation: self.days_to_active_confirmation,
            followup_days_after_trial: self.followup_days_after_trial,
            followup_days_inactive: self.followup_days_inactive,
            enable_auto_followup: self.enable_auto_followup,
            enable_trial_questionnaire: self.enable_trial_questionnaire,
            trainer_assignment_logic: self.trainer_assignment_logic.trim().to_string(),
            template_sent_by: reconcile::to_template_sent_by(&self.sale_methods),
        }
    }
}

/// Everything the settings page edits: gym contact fields plus settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsForm {
    pub gym: GymFields,
    pub settings: SettingsFormValues,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

pub struct SettingsService;

impl SettingsService {
    /// Trim text fields and turn blank optional fields into `None`.
    pub fn normalize(mut form: SettingsForm) -> SettingsForm {
        fn blank_to_none(value: Option<String>) -> Option<String> {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        }

        form.gym.name = form.gym.name.trim().to_string();
        form.gym.email = blank_to_none(form.gym.email);
        form.gym.phone = blank_to_none(form.gym.phone);
        form.gym.address = blank_to_none(form.gym.address);
        form.settings.trainer_assignment_logic =
            form.settings.trainer_assignment_logic.trim().to_string();
        form
    }

    /// Validate a normalized form. An empty result means the form can be saved.
    pub fn validate(form: &SettingsForm, lang: &str) -> Vec<FieldError> {
        let mut errors = Vec::new();
        let lang = Some(lang);

        if form.gym.name.is_empty() {
            errors.push(FieldError {
                field: "gym.name".to_string(),
                message: i18n::tr(lang, "validation.gym_name_required", None),
            });
        }

        if let Some(email) = &form.gym.email {
            let valid = email
                .split_once('@')
                .map(|(local, domain)| !local.is_empty() && !domain.is_empty())
                .unwrap_or(false);
            if !valid {
                errors.push(FieldError {
                    field: "gym.email".to_string(),
                    message: i18n::tr(lang, "validation.gym_email_invalid", None),
                });
            }
        }

        let settings = &form.settings;
        let ranged = [
            (
                "max_trials_per_client",
                settings.max_trials_per_client,
                MAX_TRIALS_RANGE,
            ),
            (
                "days_to_active_confirmation",
                settings.days_to_active_confirmation,
                DAY_OFFSET_RANGE,
            ),
            (
                "followup_days_after_trial",
                settings.followup_days_after_trial,
                DAY_OFFSET_RANGE,
            ),
            (
                "followup_days_inactive",
                settings.followup_days_inactive,
                DAY_OFFSET_RANGE,
            ),
        ];
        for (field, value, (min, max)) in ranged {
            if value < min || value > max {
                let (min, max) = (min.to_string(), max.to_string());
                let params: [(&str, &str); 3] =
                    [("field", field), ("min", min.as_str()), ("max", max.as_str())];
                errors.push(FieldError {
                    field: format!("settings.{}", field),
                    message: i18n::tr(lang, "validation.out_of_range", Some(&params[..])),
                });
            }
        }

        // Free text; only a blank selector is rejected.
        if settings.trainer_assignment_logic.trim().is_empty() {
            errors.push(FieldError {
                field: "settings.trainer_assignment_logic".to_string(),
                message: i18n::tr(lang, "validation.assignment_logic_required", None),
            });
        }

        errors
    }

    /// Form a gym gets when its settings are reset: contact fields untouched,
    /// every setting back to its default.
    pub fn defaults_for(gym: GymFields) -> SettingsForm {
        SettingsForm {
            gym,
            settings: SettingsFormValues::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::TemplateSentBy;
    use crate::services::reconcile::SaleMethod;
    use chrono::Utc;
    use std::collections::BTreeSet;

    fn record() -> GymSettings {
        let now = Utc::now().naive_utc();
        GymSettings {
            id: "s1".to_string(),
            gym_id: "g1".to_string(),
            max_trials_per_client: None,
            days_to_active_confirmation: None,
            followup_days_after_trial: None,
            followup_days_inactive: None,
            enable_auto_followup: None,
            enable_trial_questionnaire: None,
            trainer_assignment_logic: None,
            template_sent_by: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn valid_form() -> SettingsForm {
        SettingsForm {
            gym: GymFields {
                name: "Iron Temple".to_string(),
                email: Some("front@irontemple.test".to_string()),
                phone: None,
                address: None,
            },
            settings: SettingsFormValues::default(),
        }
    }

    #[test]
    fn missing_row_uses_documented_defaults() {
        let values = SettingsFormValues::from_record(None);
        assert_eq!(values.max_trials_per_client, 1);
        assert_eq!(values.days_to_active_confirmation, 30);
        assert!(values.enable_auto_followup);
        assert_eq!(values.trainer_assignment_logic, "manual");
        assert_eq!(values.sale_methods, BTreeSet::from([SaleMethod::Both]));
    }

    #[test]
    fn null_columns_fall_back_but_explicit_false_is_kept() {
        let mut row = record();
        row.enable_auto_followup = Some(false);
        row.max_trials_per_client = Some(3);

        let values = SettingsFormValues::from_record(Some(&row));
        assert!(!values.enable_auto_followup);
        assert!(values.enable_trial_questionnaire);
        assert_eq!(values.max_trials_per_client, 3);
        assert_eq!(values.days_to_active_confirmation, 30);
    }

    #[test]
    fn stored_enum_is_expanded_and_collapsed_back() {
        let mut row = record();
        row.template_sent_by = Some("trainer".to_string());

        let mut values = SettingsFormValues::from_record(Some(&row));
        assert_eq!(values.sale_methods, BTreeSet::from([SaleMethod::Package]));

        values.sale_methods.insert(SaleMethod::Custom);
        assert_eq!(values.to_fields().template_sent_by, TemplateSentBy::Both);
    }

    #[test]
    fn normalize_trims_and_drops_blank_optionals() {
        let mut form = valid_form();
        form.gym.name = "  Iron Temple ".to_string();
        form.gym.phone = Some("   ".to_string());
        form.settings.trainer_assignment_logic = " round_robin ".to_string();

        let form = SettingsService::normalize(form);
        assert_eq!(form.gym.name, "Iron Temple");
        assert_eq!(form.gym.phone, None);
        assert_eq!(form.settings.trainer_assignment_logic, "round_robin");
    }

    #[test]
    fn valid_form_has_no_errors() {
        assert!(SettingsService::validate(&valid_form(), "en").is_empty());
    }

    #[test]
    fn reports_every_invalid_field() {
        let mut form = valid_form();
        form.gym.name = String::new();
        form.gym.email = Some("not-an-email".to_string());
        form.settings.max_trials_per_client = -1;
        form.settings.followup_days_inactive = 400;
        form.settings.trainer_assignment_logic = "   ".to_string();

        let errors = SettingsService::validate(&form, "en");
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(
            fields,
            vec![
                "gym.name",
                "gym.email",
                "settings.max_trials_per_client",
                "settings.followup_days_inactive",
                "settings.trainer_assignment_logic",
            ]
        );
        assert_eq!(
            errors[2].message,
            "max_trials_per_client must be between 0 and 100"
        );
    }

    #[test]
    fn accepts_assignment_logic_outside_the_known_values() {
        let mut form = valid_form();
        form.settings.trainer_assignment_logic = "by_specialty".to_string();
        assert!(SettingsService::validate(&form, "en").is_empty());
    }

    #[test]
    fn stored_assignment_logic_is_loaded_verbatim() {
        let mut row = record();
        row.trainer_assignment_logic = Some("by_specialty".to_string());
        let values = SettingsFormValues::from_record(Some(&row));
        assert_eq!(values.trainer_assignment_logic, "by_specialty");
        assert_eq!(values.to_fields().trainer_assignment_logic, "by_specialty");
    }

    #[test]
    fn defaults_keep_gym_contact_fields() {
        let form = SettingsService::defaults_for(valid_form().gym);
        assert_eq!(form.gym.name, "Iron Temple");
        assert_eq!(form.settings, SettingsFormValues::default());
    }
}
