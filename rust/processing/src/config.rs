// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Processing configuration loaded from environment variables.

use roomscan_extraction::ExtractionConfig;
use std::time::Duration;

const BYTES_PER_MB: u64 = 1024 * 1024;

/// Processing configuration.
#[derive(Debug, Clone)]
pub struct ProcessingConfig {
    /// Maximum scene file size in MB.
    pub max_file_size_mb: u64,
    /// Wall-clock limit for a single parse in seconds.
    pub processing_timeout_secs: u64,
    /// Number of worker threads for batch processing.
    pub worker_threads: usize,
    /// Extraction parameters handed to the parser.
    pub extraction: ExtractionConfig,
}

impl ProcessingConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            max_file_size_mb: std::env::var("MAX_FILE_SIZE_MB")
                .unwrap_or_else(|_| "100".into())
                .parse()
                .unwrap_or(100),
            processing_timeout_secs: std::env::var("PROCESSING_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".into())
                .parse()
                .unwrap_or(30),
            worker_threads: std::env::var("WORKER_THREADS")
                .unwrap_or_else(|_| num_cpus::get().to_string())
                .parse()
                .unwrap_or_else(|_| num_cpus::get()),
            extraction: ExtractionConfig::default(),
        }
    }

    pub fn max_file_size_bytes(&self) -> u64 {
        self.max_file_size_mb.saturating_mul(BYTES_PER_MB)
    }

    pub fn processing_timeout(&self) -> Duration {
        Duration::from_secs(self.processing_timeout_secs)
    }
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self::from_env()
    }
}
