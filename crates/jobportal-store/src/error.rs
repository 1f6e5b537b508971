//! Store error types.

use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur while talking to the document store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("MongoDB error: {0}")]
    Mongo(#[from] mongodb::error::Error),

    #[error("BSON encode error: {0}")]
    BsonEncode(#[from] bson::ser::Error),

    #[error("BSON decode error: {0}")]
    BsonDecode(#[from] bson::de::Error),
}
