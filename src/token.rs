//! API tokens issued to gateway users.

use crate::pagecache::{Item, Status};
use chrono::{TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One API token.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Token {
    /// Server-assigned id.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Current status. Expired and exhausted are set by the server.
    pub status: Status,
    /// Remaining quota in quota units.
    pub remain_quota: i64,
    /// Whether the quota is unlimited.
    pub unlimited_quota: bool,
    /// Unix seconds.
    pub created_time: i64,
    /// Unix seconds of the last use.
    pub accessed_time: i64,
    /// Unix seconds, -1 for never.
    pub expired_time: i64,
    /// Local tombstone; never sent by the server.
    #[serde(skip)]
    pub deleted: bool,
}

/// Columns a token table can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenField {
    /// Token id.
    Id,
    /// Display name.
    Name,
    /// Status code.
    Status,
    /// Remaining quota.
    RemainQuota,
    /// Creation time.
    CreatedTime,
    /// Expiry time.
    ExpiredTime,
}

impl Token {
    /// Creates an enabled token that never expires.
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            expired_time: -1,
            ..Self::default()
        }
    }

    /// Expiry as `YYYY-MM-DD HH:MM:SS` UTC, or `"never"`.
    pub fn expiry_label(&self) -> String {
        if self.expired_time == -1 {
            return "never".to_string();
        }
        match Utc.timestamp_opt(self.expired_time, 0).single() {
            Some(at) => at.format("%Y-%m-%d %H:%M:%S").to_string(),
            None => "invalid".to_string(),
        }
    }
}

impl Item for Token {
    type Id = i64;
    type Field = TokenField;

    fn id(&self) -> i64 {
        self.id
    }

    fn status(&self) -> Status {
        self.status
    }

    fn set_status(&mut self, status: Status) {
        self.status = status;
    }

    fn is_deleted(&self) -> bool {
        self.deleted
    }

    fn mark_deleted(&mut self) {
        self.deleted = true;
    }

    fn sort_key(&self, field: TokenField) -> String {
        match field {
            TokenField::Id => self.id.to_string(),
            TokenField::Name => self.name.clone(),
            TokenField::Status => self.status.sort_key(),
            TokenField::RemainQuota => self.remain_quota.to_string(),
            TokenField::CreatedTime => self.created_time.to_string(),
            TokenField::ExpiredTime => self.expired_time.to_string(),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let quota = if self.unlimited_quota {
            "unlimited".to_string()
        } else {
            self.remain_quota.to_string()
        };
        write!(
            f,
            "#{} {}  quota {}  expires {}",
            self.id,
            self.name,
            quota,
            self.expiry_label()
        )
    }
}
