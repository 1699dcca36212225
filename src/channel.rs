//! Upstream channels as listed by the gateway's admin API.
//!
//! A channel is one configured upstream provider account. The table shows
//! its name, type, status, last measured latency and remaining balance.

use crate::pagecache::{style, Item, Status};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One upstream channel.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Channel {
    /// Server-assigned id.
    pub id: i64,
    /// Provider type code.
    #[serde(rename = "type")]
    pub channel_type: i64,
    /// Current status.
    pub status: Status,
    /// Display name.
    pub name: String,
    /// Routing weight.
    pub weight: i64,
    /// Unix seconds.
    pub created_time: i64,
    /// Unix seconds of the last latency test, 0 when never tested.
    pub test_time: i64,
    /// Last measured latency in milliseconds, 0 when never tested.
    pub response_time: i64,
    /// Custom upstream base URL.
    pub base_url: String,
    /// Remaining balance in USD.
    pub balance: f64,
    /// Unix seconds of the last balance refresh.
    pub balance_updated_time: i64,
    /// Local tombstone; never sent by the server.
    #[serde(skip)]
    pub deleted: bool,
}

/// Columns a channel table can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelField {
    /// Channel id.
    Id,
    /// Display name.
    Name,
    /// Provider type code.
    Type,
    /// Status code.
    Status,
    /// Last measured latency.
    ResponseTime,
    /// Remaining balance.
    Balance,
}

impl Channel {
    /// Creates an enabled channel with the given id and name.
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            ..Self::default()
        }
    }

    /// Latency label: `"not tested"` or seconds with two decimals.
    pub fn latency_label(&self) -> String {
        style::latency_label(self.response_time)
    }
}

impl Item for Channel {
    type Id = i64;
    type Field = ChannelField;

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

    fn sort_key(&self, field: ChannelField) -> String {
        match field {
            ChannelField::Id => self.id.to_string(),
            ChannelField::Name => self.name.clone(),
            ChannelField::Type => self.channel_type.to_string(),
            ChannelField::Status => self.status.sort_key(),
            ChannelField::ResponseTime => self.response_time.to_string(),
            ChannelField::Balance => self.balance.to_string(),
        }
    }

    fn record_test(&mut self, response_time_ms: i64, tested_at: i64) {
        self.response_time = response_time_ms;
        self.test_time = tested_at;
    }

    fn record_balance(&mut self, balance: f64, updated_at: i64) {
        self.balance = balance;
        self.balance_updated_time = updated_at;
    }

    fn response_time_ms(&self) -> Option<i64> {
        Some(self.response_time)
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} {}  ${:.2}", self.id, self.name, self.balance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pagecache::Patch;

    #[test]
    fn test_deserialize_wire_names() {
        let channel: Channel = serde_json::from_str(
            r#"{"id":7,"type":14,"status":2,"name":"claude","response_time":1530,"balance":3.25}"#,
        )
        .unwrap();
        assert_eq!(channel.id, 7);
        assert_eq!(channel.channel_type, 14);
        assert_eq!(channel.status, Status::Disabled);
        assert_eq!(channel.latency_label(), "1.53s");
        assert!(!channel.deleted);
    }

    #[test]
    fn test_latency_label_untested() {
        assert_eq!(Channel::new(1, "a").latency_label(), "not tested");
    }

    #[test]
    fn test_patches_write_back_fields() {
        let mut channel = Channel::new(1, "a");
        Patch::Tested {
            response_time_ms: 250,
            tested_at: 1_700_000_000,
        }
        .apply_to(&mut channel);
        assert_eq!(channel.response_time, 250);
        assert_eq!(channel.test_time, 1_700_000_000);

        Patch::Balance {
            balance: 9.5,
            updated_at: 1_700_000_100,
        }
        .apply_to(&mut channel);
        assert_eq!(channel.balance, 9.5);
        assert_eq!(channel.balance_updated_time, 1_700_000_100);

        Patch::Status(Status::Disabled).apply_to(&mut channel);
        assert_eq!(channel.status, Status::Disabled);

        Patch::Deleted.apply_to(&mut channel);
        assert!(channel.is_deleted());
    }

    #[test]
    fn test_sort_keys_are_strings() {
        let mut channel = Channel::new(12, "gpt");
        channel.response_time = 900;
        assert_eq!(channel.sort_key(ChannelField::Id), "12");
        assert_eq!(channel.sort_key(ChannelField::ResponseTime), "900");
        assert_eq!(channel.sort_key(ChannelField::Status), "1");
    }

    #[test]
    fn test_display() {
        let mut channel = Channel::new(3, "azure");
        channel.balance = 1.5;
        assert_eq!(channel.to_string(), "#3 azure  $1.50");
    }
}
