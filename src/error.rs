//! Error taxonomy for catalog calls and store operations.
//!
//! Both are recoverable per item: the pipeline logs them at the work-unit boundary and moves on.

/// Failure of a single catalog call (`list`, `similar` or `detail`).
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Transport failure, including timeouts.
    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Service answered with a non-success status (rate-limit rejections land here).
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    /// Payload did not have the expected shape.
    #[error("malformed response from {url}: {reason}")]
    Malformed { url: String, reason: String },
}

impl FetchError {
    pub fn malformed(url: impl Into<String>, reason: impl Into<String>) -> Self {
        FetchError::Malformed {
            url: url.into(),
            reason: reason.into(),
        }
    }
}

/// Failure of a store operation.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Primary key already present on a plain insert.
    #[error("{table} already has a row for {id}")]
    Duplicate { table: &'static str, id: String },

    /// Row holds a value this crate never writes.
    #[error("corrupt row for {id}: {reason}")]
    Corrupt { id: String, reason: String },

    #[error("encode snapshot: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("sqlite: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

impl StoreError {
    pub fn is_duplicate(&self) -> bool {
        matches!(self, StoreError::Duplicate { .. })
    }
}

/// Store failure of one work unit, tagged with the item it was processing.
#[derive(Debug, thiserror::Error)]
#[error("{item}: {source}")]
pub struct ItemError {
    pub item: String,
    #[source]
    pub source: StoreError,
}

impl ItemError {
    pub fn new(item: impl Into<String>, source: StoreError) -> Self {
        Self {
            item: item.into(),
            source,
        }
    }
}

/// Store result alias.
pub type StoreResult<T> = std::result::Result<T, StoreError>;
