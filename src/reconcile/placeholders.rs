/*!
 * Canonical placeholder markup and content-based detection.
 *
 * Detection works on visible text, so placeholders written by any earlier
 * run are recognized whatever their exact markup.
 */

use std::collections::HashSet;

use crate::app_config::Config;
use crate::table::links::text_content;

use super::plan::Language;

// @const: Phrases always recognized as "unavailable", in either language
const UNAVAILABLE_ALIASES: &[&str] = &[
    "not available",
    "unavailable",
    "non disponible",
    "indisponible",
    "pas disponible",
];

/// The two placeholder states a cell can be forced into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderKind {
    Unavailable,
    NotApplicable,
}

/// Canonical markup for one language
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguagePlaceholders {
    pub unavailable: String,
    pub not_applicable: String,
}

/// Canonical markup for both languages plus the phrases used to recognize it
#[derive(Debug, Clone)]
pub struct Placeholders {
    primary: LanguagePlaceholders,
    secondary: LanguagePlaceholders,
    unavailable_phrases: HashSet<String>,
}

impl Placeholders {
    /// Build placeholders wrapped in `<element class="class">`.
    ///
    /// Texts are `(unavailable, not applicable)` for each language.
    pub fn new(element: &str, class: &str, primary: (&str, &str), secondary: (&str, &str)) -> Self {
        let wrap = |text: &str| format!("<{0} class=\"{1}\">{2}</{0}>", element, class, text);

        let mut unavailable_phrases: HashSet<String> =
            UNAVAILABLE_ALIASES.iter().map(|p| p.to_string()).collect();
        unavailable_phrases.insert(normalize_phrase(primary.0));
        unavailable_phrases.insert(normalize_phrase(secondary.0));

        Self {
            primary: LanguagePlaceholders {
                unavailable: wrap(primary.0),
                not_applicable: wrap(primary.1),
            },
            secondary: LanguagePlaceholders {
                unavailable: wrap(secondary.0),
                not_applicable: wrap(secondary.1),
            },
            unavailable_phrases,
        }
    }

    /// Placeholders described by the configuration
    pub fn from_config(config: &Config) -> Self {
        let primary = &config.languages.primary;
        let secondary = &config.languages.secondary;
        Self::new(
            &config.reconcile.placeholder_element,
            &config.reconcile.placeholder_class,
            (&primary.unavailable_text, &primary.not_applicable_text),
            (&secondary.unavailable_text, &secondary.not_applicable_text),
        )
    }

    /// Canonical markup for `kind` in `language`
    pub fn markup(&self, language: Language, kind: PlaceholderKind) -> &str {
        let set = match language {
            Language::Primary => &self.primary,
            Language::Secondary => &self.secondary,
        };
        match kind {
            PlaceholderKind::Unavailable => &set.unavailable,
            PlaceholderKind::NotApplicable => &set.not_applicable,
        }
    }

    /// Whether a cell's content reads as "unavailable"
    pub fn is_unavailable(&self, inner: &str) -> bool {
        self.unavailable_phrases.contains(&normalize_phrase(inner))
    }
}

impl Default for Placeholders {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Visible text, lowercased, without trailing periods
fn normalize_phrase(markup: &str) -> String {
    text_content(markup)
        .to_lowercase()
        .trim_end_matches('.')
        .trim()
        .to_string()
}
