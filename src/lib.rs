#![warn(missing_docs)]
#![doc(html_root_url = "https://docs.rs/bubbletea-pagecache/")]

//! # bubbletea-pagecache
//!
//! Incrementally loaded, paginated list tables for gateway admin dashboards,
//! built as [bubbletea-rs](https://github.com/joshka/bubbletea-rs) components.
//!
//! ## Overview
//!
//! A dashboard table (channels, tokens, users, …) lists a remote collection
//! that the server hands out in fixed-size pages. The [`pagecache::Model`]
//! component keeps every page fetched so far in a growth buffer, paginates it
//! locally, and only asks the server for the next page when the user steps
//! past the loaded frontier. Row actions (enable, disable, delete, latency
//! test, balance refresh) patch the buffer in place; deleted rows are
//! tombstoned so page arithmetic stays valid.
//!
//! Like every bubbletea-rs component it follows the Elm Architecture:
//! `update()` consumes messages and returns commands, `view()` renders.
//!
//! ## Components
//!
//! - [`pagecache`]: the cache component, its remote [`pagecache::ListSource`]
//!   interface and the wire envelopes
//! - [`paginator`]: the 1-based pagination control
//! - [`key`]: key bindings and help text
//! - [`channel`], [`token`]: the dashboard's two main row types
//!
//! ## Quick start
//!
//! ```rust
//! use bubbletea_pagecache::prelude::*;
//! use bubbletea_pagecache::paginator::open_ended_pages;
//!
//! let config = Config::new().with_per_page(10).with_title("Channels");
//! assert!(config.validate().is_ok());
//!
//! // 20 rows loaded: pages 1 and 2, plus the page that fetches more
//! assert_eq!(open_ended_pages(20, config.per_page), 3);
//! ```
//!
//! ## Logging
//!
//! The crate logs through the [`log`](https://docs.rs/log) facade and never
//! installs a logger itself.

pub mod channel;
pub mod config;
pub mod error;
pub mod key;
pub mod pagecache;
pub mod paginator;
pub mod token;

pub use error::{Error, Result};

/// Commonly used types, for glob import.
pub mod prelude {
    pub use crate::channel::{Channel, ChannelField};
    pub use crate::config::{Config, ITEMS_PER_PAGE};
    pub use crate::error::{Error, Result};
    pub use crate::key::{Binding, Help as KeyHelp, KeyMap, KeyPress};
    pub use crate::pagecache::{
        Action, BulkAction, CacheKeyMap, CacheStyles, Envelope, GrowthBuffer, Item, ListSource,
        Mode, Model as PageCache, Notice, Patch, SortDirection, SortState, Status,
    };
    pub use crate::paginator::Model as Paginator;
    pub use crate::token::{Token, TokenField};
}
