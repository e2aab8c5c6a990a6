// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for room model extraction.

use thiserror::Error;

/// Result type for roomscan operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that abort the extraction of a room model.
///
/// Per-object failures (one unreadable wall mesh, one odd furniture item) are
/// not represented here; the parser records those as warnings and keeps going.
#[derive(Error, Debug)]
pub enum Error {
    /// The scene asset is missing or could not be decoded.
    #[error("invalid input asset: {0}")]
    InvalidInputAsset(String),

    /// The scene asset has no child objects at all.
    #[error("scene asset contains no geometry")]
    MissingGeometryData,

    /// Room bounds are implausible, or repair could not make the model usable.
    #[error("insufficient room data: {0}")]
    InsufficientRoomData(String),

    /// A mesh lacks the vertex data needed to derive its geometry.
    #[error("corrupted mesh data: {0}")]
    CorruptedMeshData(String),

    /// The input file is not in a supported format.
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// The input file exceeds the configured size limit.
    #[error("input too large: {size_bytes} bytes (maximum is {max_bytes} bytes)")]
    OversizeInput { size_bytes: u64, max_bytes: u64 },

    /// Processing did not finish within the configured time budget.
    #[error("processing timed out after {timeout_secs} s")]
    ProcessingTimeout { timeout_secs: u64 },
}

impl Error {
    /// Shorthand for [`Error::InsufficientRoomData`]
    pub fn insufficient(msg: impl Into<String>) -> Self {
        Error::InsufficientRoomData(msg.into())
    }

    /// Shorthand for [`Error::CorruptedMeshData`]
    pub fn corrupted(msg: impl Into<String>) -> Self {
        Error::CorruptedMeshData(msg.into())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::InvalidInputAsset(format!("JSON error: {}", err))
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::InvalidInputAsset(format!("I/O error: {}", err))
    }
}
