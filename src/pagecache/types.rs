//! Core types and traits for the page cache.
//!
//! This module defines what the cache needs to know about a row ([`Item`]),
//! the row actions it can dispatch ([`Action`]), the authoritative write-backs
//! the server returns for them ([`Patch`]) and the small state enums exposed
//! to the rendering layer.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Display};
use std::hash::Hash;

/// A row that can live in the page cache.
///
/// The cache only interprets the id, the status, the tombstone flag and the
/// sort keys. Everything else is opaque payload, except for the two
/// read-modify write-backs (`record_test`, `record_balance`) which item types
/// without those fields simply ignore.
///
/// # Examples
///
/// ```
/// use bubbletea_pagecache::pagecache::{Item, Status};
/// use std::fmt;
///
/// #[derive(Clone)]
/// struct User { id: u32, name: String, status: Status, deleted: bool }
///
/// #[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// enum UserField { Id, Name }
///
/// impl fmt::Display for User {
///     fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
///         write!(f, "{} {}", self.id, self.name)
///     }
/// }
///
/// impl Item for User {
///     type Id = u32;
///     type Field = UserField;
///
///     fn id(&self) -> u32 { self.id }
///     fn status(&self) -> Status { self.status }
///     fn set_status(&mut self, status: Status) { self.status = status; }
///     fn is_deleted(&self) -> bool { self.deleted }
///     fn mark_deleted(&mut self) { self.deleted = true; }
///     fn sort_key(&self, field: UserField) -> String {
///         match field {
///             UserField::Id => self.id.to_string(),
///             UserField::Name => self.name.clone(),
///         }
///     }
/// }
/// ```
pub trait Item: Display + Clone + Send + Sync + 'static {
    /// Stable unique identifier.
    type Id: Clone + Eq + Hash + Debug + Display + Send + Sync + 'static;

    /// Enumeration of the fields this item can be sorted by.
    type Field: Copy + Eq + Debug + Send + Sync + 'static;

    /// Returns the item's identifier.
    fn id(&self) -> Self::Id;

    /// Returns the current status.
    fn status(&self) -> Status;

    /// Overwrites the status.
    fn set_status(&mut self, status: Status);

    /// Whether the row has been deleted. Deleted rows stay in the buffer and
    /// are only hidden when rendering.
    fn is_deleted(&self) -> bool;

    /// Sets the tombstone flag.
    fn mark_deleted(&mut self);

    /// String form of `field`. Rows are compared lexicographically on this
    /// value, numbers included, so `"9"` sorts after `"10"`.
    fn sort_key(&self, field: Self::Field) -> String;

    /// Stores a measured response time and the moment it was measured.
    fn record_test(&mut self, _response_time_ms: i64, _tested_at: i64) {}

    /// Stores a refreshed balance and the moment it was fetched.
    fn record_balance(&mut self, _balance: f64, _updated_at: i64) {}

    /// Last measured latency in milliseconds, for items that are tested.
    /// `Some(0)` means never tested.
    fn response_time_ms(&self) -> Option<i64> {
        None
    }
}

/// Row status as stored by the server (integer codes on the wire).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum Status {
    /// Code 1.
    #[default]
    Enabled,
    /// Code 2.
    Disabled,
    /// Code 3, tokens only.
    Expired,
    /// Code 4, tokens only.
    Exhausted,
    /// Any other code.
    Unknown(i64),
}

impl From<i64> for Status {
    fn from(code: i64) -> Self {
        match code {
            1 => Status::Enabled,
            2 => Status::Disabled,
            3 => Status::Expired,
            4 => Status::Exhausted,
            other => Status::Unknown(other),
        }
    }
}

impl From<Status> for i64 {
    fn from(status: Status) -> Self {
        match status {
            Status::Enabled => 1,
            Status::Disabled => 2,
            Status::Expired => 3,
            Status::Exhausted => 4,
            Status::Unknown(code) => code,
        }
    }
}

impl Status {
    /// Human readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Status::Enabled => "activated",
            Status::Disabled => "disabled",
            Status::Expired => "expired",
            Status::Exhausted => "exhausted",
            Status::Unknown(_) => "unknown status",
        }
    }

    /// The wire code rendered as a string, which is what status sorting
    /// compares.
    pub fn sort_key(&self) -> String {
        i64::from(*self).to_string()
    }
}

/// A single-row action the user can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Set the status to enabled.
    Enable,
    /// Set the status to disabled.
    Disable,
    /// Delete the row (tombstoned locally).
    Delete,
    /// Measure the row's response time.
    Test,
    /// Re-read the row's remote balance.
    RefreshBalance,
}

/// Actions that run against the whole remote collection and never touch the
/// local buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BulkAction {
    /// Start testing every enabled row.
    TestAll,
    /// Refresh every enabled row's balance.
    RefreshAllBalances,
}

impl BulkAction {
    /// Notice shown when the server reports success without a message.
    pub fn default_notice(&self) -> &'static str {
        match self {
            BulkAction::TestAll => {
                "Started testing all enabled channels, refresh to see the results."
            }
            BulkAction::RefreshAllBalances => "All enabled channel balances have been updated.",
        }
    }
}

/// The authoritative fields a successful row action writes back.
#[derive(Debug, Clone, PartialEq)]
pub enum Patch {
    /// New status.
    Status(Status),
    /// The row was deleted.
    Deleted,
    /// Measured latency in milliseconds and the unix time of the test.
    Tested {
        /// Response time in milliseconds.
        response_time_ms: i64,
        /// Unix seconds.
        tested_at: i64,
    },
    /// New balance and the unix time it was read.
    Balance {
        /// Balance in USD.
        balance: f64,
        /// Unix seconds.
        updated_at: i64,
    },
}

impl Patch {
    /// Builds a `Tested` patch from a latency reported in seconds, stamped
    /// with the current time.
    pub fn tested(seconds: f64) -> Self {
        Patch::Tested {
            response_time_ms: (seconds * 1000.0).round() as i64,
            tested_at: Utc::now().timestamp(),
        }
    }

    /// Builds a `Balance` patch stamped with the current time.
    pub fn balance(balance: f64) -> Self {
        Patch::Balance {
            balance,
            updated_at: Utc::now().timestamp(),
        }
    }

    /// Writes the patch into `item`.
    pub fn apply_to<I: Item>(&self, item: &mut I) {
        match *self {
            Patch::Status(status) => item.set_status(status),
            Patch::Deleted => item.mark_deleted(),
            Patch::Tested {
                response_time_ms,
                tested_at,
            } => item.record_test(response_time_ms, tested_at),
            Patch::Balance {
                balance,
                updated_at,
            } => item.record_balance(balance, updated_at),
        }
    }
}

/// Where the buffer's contents come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Server pages appended on demand.
    #[default]
    Paged,
    /// One full search result set.
    Searching,
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    /// Smallest string key first.
    Ascending,
    /// Exact reverse of the ascending order.
    Descending,
}

impl SortDirection {
    /// The other direction.
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

/// The field and direction of the most recent sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortState<F> {
    /// Field the buffer was sorted by.
    pub field: F,
    /// Direction applied.
    pub direction: SortDirection,
}

/// A message for the user about the outcome of an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// An action succeeded.
    Success(String),
    /// Informational result (test latency, bulk action started).
    Info(String),
    /// A remote or network failure.
    Error(String),
}

impl Notice {
    /// The notice text.
    pub fn message(&self) -> &str {
        match self {
            Notice::Success(m) | Notice::Info(m) | Notice::Error(m) => m,
        }
    }

    /// Whether this notice reports a failure.
    pub fn is_error(&self) -> bool {
        matches!(self, Notice::Error(_))
    }
}

/// A visible row together with its offset inside the current page slice.
///
/// The offset counts tombstoned rows too, which is what keeps
/// `(page - 1) * per_page + offset` pointing at the same buffer slot after
/// deletions.
#[derive(Debug)]
pub struct Row<'a, I> {
    /// Position inside the unfiltered page slice.
    pub offset: usize,
    /// The row itself.
    pub item: &'a I,
}

impl<I> Clone for Row<'_, I> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<I> Copy for Row<'_, I> {}
