//! Category model shared by products and custom stickers.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Category labels offered for regular products.
pub const PRODUCT_LABELS: &[&str] = &["table-tennis-balls", "badminton-shuttles"];

/// Category labels offered for custom stickers.
pub const STICKER_LABELS: &[&str] = &["patterns", "food", "animals", "sports", "cartoon"];

/// A closed tagged category: either a named label from a known set, or the
/// free-form `custom` variant.
///
/// The same shape applies to products and stickers; the known label sets
/// differ per entity and live in [`PRODUCT_LABELS`] and [`STICKER_LABELS`]
/// as data. Nothing matches on label strings.
///
/// Wire form: `{"kind":"named","label":"patterns"}` or `{"kind":"custom"}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Category {
    /// A label from the entity's known set (kebab-case slug).
    Named {
        /// The category slug, e.g. `table-tennis-balls`.
        label: String,
    },
    /// User-defined category outside the known sets.
    Custom,
}

impl Category {
    /// Create a named category.
    #[must_use]
    pub fn named(label: impl Into<String>) -> Self {
        Self::Named {
            label: label.into(),
        }
    }

    /// Parse a form select value against an allowed label set.
    ///
    /// `"custom"` always maps to [`Category::Custom`]; any other value must
    /// appear in `allowed`.
    #[must_use]
    pub fn from_slug(value: &str, allowed: &[&str]) -> Option<Self> {
        if value == "custom" {
            Some(Self::Custom)
        } else if allowed.contains(&value) {
            Some(Self::named(value))
        } else {
            None
        }
    }

    /// The slug used in form selects, `"custom"` for the custom variant.
    #[must_use]
    pub fn slug(&self) -> &str {
        match self {
            Self::Named { label } => label,
            Self::Custom => "custom",
        }
    }

    /// Human-readable label derived mechanically from the slug.
    #[must_use]
    pub fn display_label(&self) -> String {
        match self {
            Self::Named { label } => label
                .split('-')
                .map(capitalize)
                .collect::<Vec<_>>()
                .join(" "),
            Self::Custom => "Custom".to_owned(),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_label())
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_as_tagged_variant() {
        let named = Category::named("patterns");
        assert_eq!(
            serde_json::to_value(&named).unwrap(),
            serde_json::json!({"kind": "named", "label": "patterns"})
        );
        assert_eq!(
            serde_json::to_value(Category::Custom).unwrap(),
            serde_json::json!({"kind": "custom"})
        );
    }

    #[test]
    fn from_slug_enforces_the_allowed_set() {
        assert_eq!(
            Category::from_slug("patterns", STICKER_LABELS),
            Some(Category::named("patterns"))
        );
        assert_eq!(
            Category::from_slug("custom", STICKER_LABELS),
            Some(Category::Custom)
        );
        assert_eq!(Category::from_slug("patterns", PRODUCT_LABELS), None);
        assert_eq!(Category::from_slug("", STICKER_LABELS), None);
    }

    #[test]
    fn display_labels_derive_from_slugs() {
        assert_eq!(
            Category::named("table-tennis-balls").display_label(),
            "Table Tennis Balls"
        );
        assert_eq!(
            Category::named("badminton-shuttles").display_label(),
            "Badminton Shuttles"
        );
        assert_eq!(Category::named("food").display_label(), "Food");
        assert_eq!(Category::Custom.display_label(), "Custom");
    }
}
