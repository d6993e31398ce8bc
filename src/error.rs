//! Error types
//!
//! None of these ever escape a frame or timer callback: the driver logs them
//! and falls back (empty layout, in-memory high score).

use thiserror::Error;

/// Failures while turning the résumé source into text elements
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("refusing to load unlisted asset path: {0}")]
    DisallowedAsset(String),

    #[error("failed to fetch layout source: {0}")]
    Fetch(String),

    #[error("malformed layout source: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failures of the key-value persistence slot
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("storage is unavailable")]
    Unavailable,

    #[error("failed to write {key}: {reason}")]
    Write { key: String, reason: String },
}
