/*
Simple i18n helper for user-facing messages.

This module provides:
- A tiny embedded translations store for EN/RU (compile-time embedded JSON).
- A simple `tr` function to lookup translations by key + optional params.

Usage:
    use crate::i18n;
    let msg = i18n::tr(Some("ru"), "settings.saved", None);
    let msg_with = i18n::tr(None, "validation.out_of_range", Some(&[("field", "max_trials_per_client"), ("min", "0"), ("max", "100")]));

Notes:
- Placeholders in translation strings use single-brace format: `{name}`.
- Default language is `en`. If a key is missing for the requested language,
  the default language is used.
*/

use std::collections::HashMap;
use std::sync::OnceLock;

pub const DEFAULT_LANG: &str = "en";

static TRANSLATIONS: OnceLock<HashMap<String, HashMap<String, String>>> = OnceLock::new();

const EN_JSON: &str = r#"
{
  "settings.saved": "Settings saved",
  "settings.reset": "Settings restored to defaults",
  "settings.error.no_tenant": "Your account is not linked to a gym. Ask your gym administrator to add you.",
  "settings.error.fetch_failed": "Could not load the gym settings. Please try again.",
  "settings.error.persist_failed": "Could not save the settings. Your changes were kept, please try again.",
  "settings.error.validation": "Some settings are invalid",
  "settings.error.not_ready": "Settings are not loaded yet",
  "validation.gym_name_required": "Gym name is required",
  "validation.gym_email_invalid": "Gym email is not a valid address",
  "validation.out_of_range": "{field} must be between {min} and {max}",
  "validation.assignment_logic_required": "Trainer assignment logic is required"
}
"#;

const RU_JSON: &str = r#"
{
  "settings.saved": "Настройки сохранены",
  "settings.reset": "Настройки сброшены к значениям по умолчанию",
  "settings.error.no_tenant": "Ваш аккаунт не привязан к залу. Обратитесь к администратору зала.",
  "settings.error.fetch_failed": "Не удалось загрузить настройки зала. Попробуйте ещё раз.",
  "settings.error.persist_failed": "Не удалось сохранить настройки. Ваши изменения не потеряны, попробуйте ещё раз.",
  "settings.error.validation": "Некоторые настройки заполнены неверно",
  "settings.error.not_ready": "Настройки ещё не загружены",
  "validation.gym_name_required": "Укажите название зала",
  "validation.gym_email_invalid": "Неверный адрес электронной почты зала",
  "validation.out_of_range": "{field} должно быть от {min} до {max}",
  "validation.assignment_logic_required": "Укажите способ назначения тренера"
}
"#;

/// Initialize translations map (lazy).
fn build_translations() -> HashMap<String, HashMap<String, String>> {
    let mut out: HashMap<String, HashMap<String, String>> = HashMap::new();

    // Parse RU
    let ru_map: HashMap<String, String> = serde_json::from_str(RU_JSON).unwrap_or_else(|e| {
        panic!("failed to parse RU_JSON in i18n module: {}", e);
    });
    out.insert("ru".to_string(), ru_map);

    // Parse EN
    let en_map: HashMap<String, String> = serde_json::from_str(EN_JSON).unwrap_or_else(|e| {
        panic!("failed to parse EN_JSON in i18n module: {}", e);
    });
    out.insert("en".to_string(), en_map);

    out
}

/// Returns the global translations map (lang -> (key -> message)).
fn translations() -> &'static HashMap<String, HashMap<String, String>> {
    TRANSLATIONS.get_or_init(build_translations)
}

/// Normalize a language tag into a short, lowercase code (e.g. "en-US" -> "en").
///
/// This is useful when accepting language values from external sources (browser
/// `navigator.language`, query params, etc.) and wanting to convert them to
/// the canonical short form used by our translations keys.
pub fn normalize_language(lang: &str) -> String {
    lang.split('-').next().unwrap_or(lang).to_lowercase()
}

/// Returns true if the given language code is supported by the backend i18n
/// translations (e.g. "ru", "en").
pub fn is_supported_language(lang: &str) -> bool {
    translations().contains_key(lang)
}

/// Translate a key using an explicit language (or default if None).
///
/// - `lang`: optional language code (`"ru"`, `"en"`, ...). If None, DEFAULT_LANG is used.
/// - `key`: translation key (flat string, e.g. "settings.saved").
/// - `params`: optional slice of (name, value) for placeholder replacement. Replacements use single-brace placeholders `{name}`.
///
/// Returns the translated and parameter-substituted string. If no translation is found,
/// returns a sensible fallback (default language value or the key itself).
pub fn tr(lang: Option<&str>, key: &str, params: Option<&[(&str, &str)]>) -> String {
    let map = translations();

    let desired = lang.unwrap_or(DEFAULT_LANG);

    // Try requested language
    let val = map
        .get(desired)
        .and_then(|m| m.get(key))
        .cloned()
        // Fallback to default language
        .or_else(|| map.get(DEFAULT_LANG).and_then(|m| m.get(key)).cloned())
        // If still missing, return the key itself (useful in logs)
        .unwrap_or_else(|| key.to_string());

    if let Some(params) = params {
        let mut s = val;
        for (k, v) in params {
            s = s.replace(&format!("{{{}}}", k), v);
        }
        s
    } else {
        val
    }
}
