// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Processing statistics attached to every result

use roomscan_core::RoomModel;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const BASE_MODEL_BYTES: usize = 1000;
const BYTES_PER_WALL: usize = 200;
const BYTES_PER_FURNITURE: usize = 500;
const BYTES_PER_SURFACE: usize = 300;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessingMetadata {
    pub elapsed_ms: u64,
    pub estimated_memory_bytes: usize,
}

impl ProcessingMetadata {
    pub fn new(room: &RoomModel, elapsed: Duration) -> Self {
        Self {
            elapsed_ms: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
            estimated_memory_bytes: estimate_memory(room),
        }
    }
}

/// Rough in-memory footprint of a room model
pub fn estimate_memory(room: &RoomModel) -> usize {
    BASE_MODEL_BYTES
        + BYTES_PER_WALL * room.walls().len()
        + BYTES_PER_FURNITURE * room.furniture().len()
        + BYTES_PER_SURFACE * room.surface_count()
}
