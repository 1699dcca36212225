//! Configuration for a cached resource table.
//!
//! A [`Config`] can be built in code with the `with_*` builder methods or
//! deserialized from JSON; missing fields fall back to the defaults.
//!
//! ```rust
//! use bubbletea_pagecache::config::Config;
//!
//! let config = Config::from_json(r#"{ "per_page": 20, "title": "Tokens" }"#).unwrap();
//! assert_eq!(config.per_page, 20);
//! assert_eq!(config.item_name_plural, "items");
//! ```

use crate::error::{Error, Result};
use crate::paginator;
use serde::{Deserialize, Serialize};

/// Page size shared by the server listing endpoints and the UI.
pub const ITEMS_PER_PAGE: usize = 10;

/// Settings for one cached table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Rows per page, on the server and in the UI alike.
    pub per_page: usize,
    /// Title shown above the table.
    pub title: String,
    /// Pagination control style.
    pub paginator_type: paginator::Type,
    /// Singular noun for the status line ("channel").
    pub item_name_singular: String,
    /// Plural noun for the status line ("channels").
    pub item_name_plural: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            per_page: ITEMS_PER_PAGE,
            title: "List".to_string(),
            paginator_type: paginator::Type::Arabic,
            item_name_singular: "item".to_string(),
            item_name_plural: "items".to_string(),
        }
    }
}

impl Config {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a JSON document and validates it.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Config =
            serde_json::from_str(json).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Sets the page size (builder pattern).
    pub fn with_per_page(mut self, per_page: usize) -> Self {
        self.per_page = per_page;
        self
    }

    /// Sets the title (builder pattern).
    pub fn with_title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }

    /// Sets the pagination style (builder pattern).
    pub fn with_paginator_type(mut self, paginator_type: paginator::Type) -> Self {
        self.paginator_type = paginator_type;
        self
    }

    /// Sets the nouns used in the status line (builder pattern).
    pub fn with_item_names(mut self, singular: &str, plural: &str) -> Self {
        self.item_name_singular = singular.to_string();
        self.item_name_plural = plural.to_string();
        self
    }

    /// Rejects settings the cache cannot work with.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when `per_page` is zero.
    pub fn validate(&self) -> Result<()> {
        if self.per_page == 0 {
            return Err(Error::Config("per_page must be at least 1".to_string()));
        }
        Ok(())
    }
}
