// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Scan processing pipeline shared by the CLI and embedding hosts
//!
//! Wraps [`roomscan_extraction::RoomModelParser`] with the concerns of a
//! host application:
//! - input validation (format and size) before any parsing
//! - a wall-clock timeout per parse
//! - processing metadata (elapsed time, memory estimate)
//! - parallel batch processing on the rayon pool

pub mod config;
pub mod metadata;
pub mod pipeline;

pub use config::ProcessingConfig;
pub use metadata::{estimate_memory, ProcessingMetadata};
pub use pipeline::{
    parse_with_timeout, process_asset, process_batch, process_bytes, process_file, process_files,
    validate_input, ProcessingResult, SUPPORTED_EXTENSION,
};
