// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Scan processing: boundary validation, timed parsing and batching

use crate::config::ProcessingConfig;
use crate::metadata::ProcessingMetadata;
use rayon::prelude::*;
use roomscan_core::{Error, Result, RoomModel, SceneAsset};
use roomscan_extraction::{ParseWarning, QualityAssessor, RoomModelParser, ScanQuality};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::{Duration, Instant};

/// Accepted scene file extension
pub const SUPPORTED_EXTENSION: &str = "json";

/// Result of processing one scan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingResult {
    pub room: RoomModel,
    pub quality: ScanQuality,
    pub repaired: bool,
    pub warnings: Vec<ParseWarning>,
    pub metadata: ProcessingMetadata,
}

/// Reject inputs with the wrong extension or above the size limit
pub fn validate_input(path: &Path, size_bytes: u64, config: &ProcessingConfig) -> Result<()> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_lowercase);

    match extension.as_deref() {
        Some(SUPPORTED_EXTENSION) => {}
        Some(other) => return Err(Error::UnsupportedFormat(format!(".{other}"))),
        None => return Err(Error::UnsupportedFormat("missing file extension".to_string())),
    }

    check_size(size_bytes, config)
}

fn check_size(size_bytes: u64, config: &ProcessingConfig) -> Result<()> {
    let max_bytes = config.max_file_size_bytes();
    if size_bytes > max_bytes {
        return Err(Error::OversizeInput {
            size_bytes,
            max_bytes,
        });
    }
    Ok(())
}

/// Parse on a worker thread, giving up after `timeout`.
///
/// On expiry the worker is abandoned; its result is discarded when it
/// eventually finishes.
pub fn parse_with_timeout<Q>(
    parser: RoomModelParser<Q>,
    asset: SceneAsset,
    timeout: Duration,
) -> Result<ProcessingResult>
where
    Q: QualityAssessor + Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    let start = Instant::now();

    std::thread::Builder::new()
        .name("roomscan-parse".into())
        .spawn(move || {
            let outcome = parser.parse(&asset);
            // Receiver is gone after a timeout
            let _ = tx.send(outcome);
        })?;

    let parsed = match rx.recv_timeout(timeout) {
        Ok(outcome) => outcome?,
        Err(mpsc::RecvTimeoutError::Timeout) => {
            tracing::warn!(timeout_ms = timeout.as_millis() as u64, "Parse timed out");
            return Err(Error::ProcessingTimeout {
                timeout_secs: timeout.as_secs(),
            });
        }
        Err(mpsc::RecvTimeoutError::Disconnected) => {
            return Err(Error::InvalidInputAsset(
                "parser worker terminated without a result".to_string(),
            ));
        }
    };

    let metadata = ProcessingMetadata::new(&parsed.model, start.elapsed());
    Ok(ProcessingResult {
        room: parsed.model,
        quality: parsed.quality,
        repaired: parsed.repaired,
        warnings: parsed.warnings,
        metadata,
    })
}

/// Process a decoded scene asset
pub fn process_asset(asset: SceneAsset, config: &ProcessingConfig) -> Result<ProcessingResult> {
    let parser = RoomModelParser::new().with_config(config.extraction.clone());
    let result = parse_with_timeout(parser, asset, config.processing_timeout())?;

    tracing::info!(
        room = %result.room.name(),
        elapsed_ms = result.metadata.elapsed_ms,
        warnings = result.warnings.len(),
        repaired = result.repaired,
        "Scan processed"
    );
    Ok(result)
}

/// Process raw scene JSON
pub fn process_bytes(bytes: &[u8], config: &ProcessingConfig) -> Result<ProcessingResult> {
    check_size(bytes.len() as u64, config)?;
    let asset = SceneAsset::from_slice(bytes)?;
    process_asset(asset, config)
}

/// Validate, read and process a scene file
pub fn process_file(path: &Path, config: &ProcessingConfig) -> Result<ProcessingResult> {
    let size_bytes = std::fs::metadata(path)?.len();
    validate_input(path, size_bytes, config)?;

    tracing::debug!(path = %path.display(), size_bytes, "Reading scene file");
    let bytes = std::fs::read(path)?;
    process_bytes(&bytes, config)
}

/// Process independent scene files in parallel on the rayon pool.
///
/// Results are returned in input order.
pub fn process_files(
    paths: &[PathBuf],
    config: &ProcessingConfig,
) -> Vec<(PathBuf, Result<ProcessingResult>)> {
    tracing::info!(count = paths.len(), "Processing scan batch");
    paths
        .par_iter()
        .map(|path| (path.clone(), process_file(path, config)))
        .collect()
}

/// Process independent decoded assets in parallel on the rayon pool
pub fn process_batch(assets: Vec<SceneAsset>, config: &ProcessingConfig) -> Vec<Result<ProcessingResult>> {
    assets
        .into_par_iter()
        .map(|asset| process_asset(asset, config))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use roomscan_extraction::ExtractionConfig;

    fn config(max_file_size_mb: u64) -> ProcessingConfig {
        ProcessingConfig {
            max_file_size_mb,
            processing_timeout_secs: 30,
            worker_threads: 2,
            extraction: ExtractionConfig::default(),
        }
    }

    #[test]
    fn extension_must_be_json() {
        let cfg = config(1);
        assert!(validate_input(Path::new("scan.json"), 10, &cfg).is_ok());
        assert!(validate_input(Path::new("SCAN.JSON"), 10, &cfg).is_ok());
        assert!(matches!(
            validate_input(Path::new("scan.usdz"), 10, &cfg),
            Err(Error::UnsupportedFormat(ext)) if ext == ".usdz"
        ));
        assert!(matches!(
            validate_input(Path::new("scan"), 10, &cfg),
            Err(Error::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn size_limit_is_inclusive() {
        let cfg = config(1);
        let max = cfg.max_file_size_bytes();
        assert!(validate_input(Path::new("scan.json"), max, &cfg).is_ok());
        assert!(matches!(
            validate_input(Path::new("scan.json"), max + 1, &cfg),
            Err(Error::OversizeInput { size_bytes, max_bytes }) if size_bytes == max + 1 && max_bytes == max
        ));
    }

    #[test]
    fn malformed_bytes_are_invalid_input() {
        assert!(matches!(
            process_bytes(b"{ nope", &config(1)),
            Err(Error::InvalidInputAsset(_))
        ));
    }

    #[test]
    fn empty_asset_propagates_parse_error() {
        assert!(matches!(
            process_bytes(br#"{ "name": "empty", "children": [] }"#, &config(1)),
            Err(Error::MissingGeometryData)
        ));
    }
}
