//! Retail search links for result cards.

use reqwest::Url;
use shared::config::RetailConfig;
use shared::{BookItem, FinderError, FinderResult};

/// Builds affiliate search links from a title and primary author
#[derive(Debug, Clone)]
pub struct RetailLinkBuilder {
    base: Url,
    affiliate_tag: String,
}

impl RetailLinkBuilder {
    pub fn new(base_url: &str, affiliate_tag: impl Into<String>) -> FinderResult<Self> {
        let base = Url::parse(base_url).map_err(|e| {
            FinderError::configuration(format!("invalid retail.base_url {:?}: {}", base_url, e))
        })?;
        Ok(Self {
            base,
            affiliate_tag: affiliate_tag.into(),
        })
    }

    pub fn from_config(config: &RetailConfig, affiliate_tag: impl Into<String>) -> FinderResult<Self> {
        Self::new(&config.base_url, affiliate_tag)
    }

    /// Search URL for `title` by `author` (empty when unknown)
    pub fn link(&self, title: &str, author: &str) -> Url {
        let keywords = format!("{} {}", title, author);
        let mut url = self.base.clone();
        url.query_pairs_mut()
            .clear()
            .append_pair("k", keywords.trim_end())
            .append_pair("tag", &self.affiliate_tag);
        url
    }

    pub fn link_for(&self, book: &BookItem) -> Url {
        self.link(&book.title, book.primary_author().unwrap_or_default())
    }
}
