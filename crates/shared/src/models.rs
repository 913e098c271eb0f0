//! Data models for the book finder.
//!
//! These are the domain types handed between the search client, the result
//! accumulator, category discovery and whatever host renders them.

use serde::{Deserialize, Serialize};

/// A book returned by the search API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookItem {
    pub id: String,                    // External API volume identifier
    pub title: String,
    pub authors: Vec<String>,          // Ordered as the API lists them
    pub description: Option<String>,
    pub thumbnail_url: Option<String>,
    pub language: String,              // ISO 639-1 code, e.g. "es"
}

impl BookItem {
    /// First listed author, if any
    pub fn primary_author(&self) -> Option<&str> {
        self.authors.first().map(String::as_str)
    }

    /// Authors joined for display, or `fallback` when none are known
    pub fn authors_display<'a>(&'a self, fallback: &'a str) -> std::borrow::Cow<'a, str> {
        if self.authors.is_empty() {
            std::borrow::Cow::Borrowed(fallback)
        } else {
            std::borrow::Cow::Owned(self.authors.join(", "))
        }
    }
}

/// A selectable category
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CategoryOption {
    pub id: String,
    pub label: String,
}

impl CategoryOption {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

/// A category label with the number of sampled books carrying it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub label: String,
    pub count: u32,
}

/// Built-in categories shown before discovery finishes (or when it fails)
pub fn default_categories() -> Vec<CategoryOption> {
    vec![
        CategoryOption::new("fiction", "Ficción"),
        CategoryOption::new("science", "Ciencia"),
        CategoryOption::new("history", "Historia"),
        CategoryOption::new("technology", "Tecnología"),
    ]
}

/// Search language offered by the selector
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageOption {
    pub code: String,
    pub name: String,
}

pub fn default_languages() -> Vec<LanguageOption> {
    [("es", "Español"), ("en", "English"), ("fr", "Français"), ("de", "Deutsch")]
        .into_iter()
        .map(|(code, name)| LanguageOption {
            code: code.to_string(),
            name: name.to_string(),
        })
        .collect()
}
