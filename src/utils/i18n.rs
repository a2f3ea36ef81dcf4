//! Localized landing page strings.
//!
//! Bundles live in `locales/<code>/translation.json`. Lookups use dotted keys
//! (`contact.success`, `faq.items.0.question`) and fall back to Russian, then
//! to the key itself, so a missing translation never breaks rendering.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum I18nError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("Invalid translation bundle for {locale}: {source}")]
    Parse {
        locale: Locale,
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Locale {
    En,
    Ru,
    Uk,
    Es,
}

impl Locale {
    pub const ALL: [Locale; 4] = [Locale::En, Locale::Ru, Locale::Uk, Locale::Es];
    pub const DEFAULT: Locale = Locale::Ru;

    pub fn code(self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Ru => "ru",
            Locale::Uk => "uk",
            Locale::Es => "es",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|locale| locale.code().eq_ignore_ascii_case(code))
    }

    /// Resolves `/:lang` style paths; anything unrecognised maps to the default.
    pub fn from_route(path: &str) -> Self {
        path.trim_start_matches('/')
            .split('/')
            .next()
            .and_then(Self::from_code)
            .unwrap_or(Self::DEFAULT)
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

fn embedded_source(locale: Locale) -> &'static str {
    match locale {
        Locale::En => include_str!("../../locales/en/translation.json"),
        Locale::Ru => include_str!("../../locales/ru/translation.json"),
        Locale::Uk => include_str!("../../locales/uk/translation.json"),
        Locale::Es => include_str!("../../locales/es/translation.json"),
    }
}

#[derive(Debug, Clone)]
pub struct Translations {
    bundles: HashMap<Locale, Value>,
}

impl Translations {
    pub fn embedded() -> Result<Self, I18nError> {
        let mut bundles = HashMap::new();
        for locale in Locale::ALL {
            let bundle = serde_json::from_str(embedded_source(locale))
                .map_err(|source| I18nError::Parse { locale, source })?;
            bundles.insert(locale, bundle);
        }
        Ok(Self { bundles })
    }

    /// Loads `<dir>/<code>/translation.json` for every locale present on disk.
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self, I18nError> {
        let mut bundles = HashMap::new();
        for locale in Locale::ALL {
            let path = dir.as_ref().join(locale.code()).join("translation.json");
            if !path.exists() {
                tracing::warn!("No translation bundle for {} at {}", locale, path.display());
                continue;
            }
            let raw = std::fs::read_to_string(&path).map_err(|source| I18nError::Io {
                path: path.display().to_string(),
                source,
            })?;
            let bundle = serde_json::from_str(&raw)
                .map_err(|source| I18nError::Parse { locale, source })?;
            bundles.insert(locale, bundle);
        }
        Ok(Self { bundles })
    }

    pub fn value(&self, locale: Locale, key: &str) -> Option<&Value> {
        self.lookup(locale, key)
            .or_else(|| self.lookup(Locale::DEFAULT, key))
    }

    pub fn t(&self, locale: Locale, key: &str) -> String {
        match self.value(locale, key) {
            Some(Value::String(text)) => text.clone(),
            _ => key.to_string(),
        }
    }

    pub fn t_list(&self, locale: Locale, key: &str) -> Vec<String> {
        match self.value(locale, key) {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|item| item.as_str().map(str::to_string))
                .collect(),
            _ => Vec::new(),
        }
    }

    fn lookup(&self, locale: Locale, key: &str) -> Option<&Value> {
        let mut current = self.bundles.get(&locale)?;
        for segment in key.split('.') {
            current = match current {
                Value::Object(map) => map.get(segment)?,
                Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }
        Some(current)
    }
}
