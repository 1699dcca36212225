//! The remote side of the cache.
//!
//! [`ListSource`] is the narrow interface the cache consumes. It is
//! transport-agnostic; implementations usually wrap an HTTP client talking to
//! the dashboard's REST endpoints. The wire shapes those endpoints use are
//! modelled here too so implementations can decode them with serde:
//!
//! - [`Envelope`] for `{ "success", "message", "data" }` listings and
//!   mutations,
//! - [`TestReply`] for `{ "success", "message", "time" }` latency tests,
//! - [`BalanceReply`] for `{ "success", "message", "balance" }` balance reads.

use super::types::{Action, BulkAction, Item, Patch};
use crate::error::{Error, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// Remote list service backing one cached table.
#[async_trait]
pub trait ListSource<I: Item>: Send + Sync {
    /// Rows of zero-based server page `page`.
    async fn fetch_page(&self, page: usize) -> Result<Vec<I>>;

    /// Every row matching `keyword`.
    async fn search(&self, keyword: &str) -> Result<Vec<I>>;

    /// Runs `action` on the row `id` and returns the fields to write back.
    async fn mutate(&self, id: &I::Id, action: Action) -> Result<Patch>;

    /// Runs an action over the whole remote collection and returns the
    /// server's message.
    async fn bulk(&self, action: BulkAction) -> Result<String> {
        Err(Error::Unsupported(format!("{:?}", action)))
    }
}

/// The `{ success, message, data }` wrapper every listing endpoint returns.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    /// Whether the server accepted the request.
    pub success: bool,
    /// Error text when `success` is false, usually empty otherwise.
    #[serde(default)]
    pub message: String,
    /// Payload.
    pub data: Option<T>,
}

impl<T: DeserializeOwned> Envelope<T> {
    /// Decodes an envelope from a response body.
    ///
    /// # Errors
    ///
    /// Malformed bodies become [`Error::Network`].
    pub fn from_json(body: &str) -> Result<Self> {
        Ok(serde_json::from_str(body)?)
    }
}

impl<T> Envelope<T> {
    /// The payload, if the server reported success.
    ///
    /// # Errors
    ///
    /// [`Error::Remote`] with the server's message when `success` is false.
    pub fn into_data(self) -> Result<Option<T>> {
        if self.success {
            Ok(self.data)
        } else {
            Err(Error::Remote(self.message))
        }
    }

    /// Like [`Envelope::into_data`], with a missing payload read as the empty
    /// value (`null` listings become empty pages).
    ///
    /// # Errors
    ///
    /// [`Error::Remote`] when `success` is false.
    pub fn into_result(self) -> Result<T>
    where
        T: Default,
    {
        self.into_data().map(Option::unwrap_or_default)
    }
}

/// Reply of the single-row latency test endpoint. `time` is in seconds.
#[derive(Debug, Clone, Deserialize)]
pub struct TestReply {
    /// Whether the test passed.
    pub success: bool,
    /// Failure reason.
    #[serde(default)]
    pub message: String,
    /// Measured latency in seconds.
    #[serde(default)]
    pub time: f64,
}

impl TestReply {
    /// Converts the reply into the write-back for the tested row.
    ///
    /// # Errors
    ///
    /// [`Error::Remote`] when the test failed.
    pub fn into_patch(self) -> Result<Patch> {
        if self.success {
            Ok(Patch::tested(self.time))
        } else {
            Err(Error::Remote(self.message))
        }
    }
}

/// Reply of the single-row balance endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct BalanceReply {
    /// Whether the balance could be read.
    pub success: bool,
    /// Failure reason.
    #[serde(default)]
    pub message: String,
    /// Balance in USD.
    #[serde(default)]
    pub balance: f64,
}

impl BalanceReply {
    /// Converts the reply into the write-back for the refreshed row.
    ///
    /// # Errors
    ///
    /// [`Error::Remote`] when the balance could not be read.
    pub fn into_patch(self) -> Result<Patch> {
        if self.success {
            Ok(Patch::balance(self.balance))
        } else {
            Err(Error::Remote(self.message))
        }
    }
}
