// SPDX-License-Identifier: MIT OR Apache-2.0
//! Error types for the loop engine.

use thiserror::Error;

/// Errors raised while building, refreshing or driving a loop
#[derive(Debug, Error)]
pub enum LoopError {
    /// No items were supplied
    #[error("cannot build a loop with no items")]
    EmptyTrack,

    /// An item measured zero (or non-finite) effective width
    #[error("item {index} has an unusable width of {width}px")]
    ZeroWidthItem {
        /// Index of the offending item
        index: usize,
        /// Effective width after scaling
        width: f64,
    },

    /// Speed resolved to a non-positive or non-finite pixel rate
    #[error("pixels per second must be positive and finite, got {0}")]
    NonPositiveSpeed(f64),

    /// A computed segment duration was negative or non-finite
    #[error("{segment} segment of item {index} has invalid duration {duration}s")]
    InvalidSegment {
        /// Index of the item owning the segment
        index: usize,
        /// Which segment of the item failed
        segment: &'static str,
        /// The rejected duration
        duration: f64,
    },

    /// A single item's geometry could not be read
    #[error("failed to measure item {index}: {source}")]
    Measurement {
        /// Index of the item that failed to measure
        index: usize,
        /// Error reported by the measurement provider
        #[source]
        source: MeasureError,
    },

    /// The engine was torn down
    #[error("loop engine has been torn down")]
    TornDown,

    /// Configuration text could not be parsed
    #[error("failed to parse loop config: {0}")]
    ConfigParse(#[from] ron::error::SpannedError),

    /// Configuration could not be serialized
    #[error("failed to serialize loop config: {0}")]
    ConfigWrite(#[from] ron::Error),
}

impl LoopError {
    /// Whether this error only affects a single refresh pass
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Measurement { .. } | Self::ZeroWidthItem { .. })
    }
}

/// Error reported by a host measurement provider
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct MeasureError(pub String);

impl MeasureError {
    /// Create a measurement error from any message
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Result alias for loop operations
pub type Result<T> = std::result::Result<T, LoopError>;
