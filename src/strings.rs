// src/strings.rs
//! Locale-keyed UI string tables

use anyhow::{Context, Result};
use std::collections::HashMap;
use tracing::warn;

const EN_STRINGS: &str = include_str!("../strings/en.yaml");
const DEFAULT_LOCALE: &str = "en";

/// Placeholder in `weak-password-error` replaced by the configured minimum.
pub const MIN_PASSWORD_LENGTH_PLACEHOLDER: &str = "{MIN_PASSWORD_LENGTH}";

type Sections = HashMap<String, HashMap<String, String>>;

#[derive(Debug, Clone)]
pub struct StringTable {
    locale: String,
    sections: Sections,
}

impl StringTable {
    /// Load the table for `locale`, falling back to English when the locale
    /// has no bundled strings.
    pub fn for_locale(locale: &str) -> Result<Self> {
        let (resolved, source) = match bundled(locale) {
            Some(source) => (locale, source),
            None => {
                warn!("No strings bundled for locale '{}', using '{}'", locale, DEFAULT_LOCALE);
                (DEFAULT_LOCALE, EN_STRINGS)
            }
        };

        Self::from_yaml(resolved, source)
    }

    pub fn from_yaml(locale: &str, source: &str) -> Result<Self> {
        let sections: Sections = serde_yaml::from_str(source)
            .with_context(|| format!("Failed to parse strings for locale '{}'", locale))?;

        Ok(Self {
            locale: locale.to_string(),
            sections,
        })
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// Look up `section.key`. A missing entry yields the key itself so the UI
    /// still shows something traceable.
    pub fn get<'a>(&'a self, section: &str, key: &'a str) -> &'a str {
        match self.sections.get(section).and_then(|s| s.get(key)) {
            Some(value) => value,
            None => {
                warn!("Missing string '{}.{}' for locale '{}'", section, key, self.locale);
                key
            }
        }
    }

    /// Field error text: the common prefix followed by the field label.
    pub fn field_error(&self, field_label: &str) -> String {
        format!("{}{}", self.get("common", "error-message"), field_label)
    }

    pub fn weak_password(&self, min_length: usize) -> String {
        self.get("create-business-account", "weak-password-error")
            .replace(MIN_PASSWORD_LENGTH_PLACEHOLDER, &min_length.to_string())
    }
}

fn bundled(locale: &str) -> Option<&'static str> {
    match locale.to_lowercase().as_str() {
        "en" | "en-us" | "en-gb" | "en-sg" => Some(EN_STRINGS),
        _ => None,
    }
}
