// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! CLI tool: Extract a room model from captured scene JSON
//!
//! Usage:
//!   scan-to-room <scene.json>... [options]

use anyhow::{bail, Context};
use roomscan_geometry::{CoordinateSystemInfo, TransformState};
use roomscan_processing::{process_files, ProcessingConfig, ProcessingResult};
use serde::Serialize;
use std::env;
use std::fs;
use std::path::PathBuf;

#[derive(Serialize)]
struct TransformReport {
    origin: [f64; 3],
    scale: f64,
    rotation: [[f64; 3]; 3],
}

impl TransformReport {
    fn new(state: &TransformState) -> Self {
        let origin = state.origin();
        let r = state.rotation();
        Self {
            origin: [origin.x, origin.y, origin.z],
            scale: state.scale(),
            rotation: [
                [r[(0, 0)], r[(0, 1)], r[(0, 2)]],
                [r[(1, 0)], r[(1, 1)], r[(1, 2)]],
                [r[(2, 0)], r[(2, 1)], r[(2, 2)]],
            ],
        }
    }
}

#[derive(Serialize)]
struct Analysis {
    coordinate_system: CoordinateSystemInfo,
    transform: TransformReport,
}

#[derive(Serialize)]
struct Report<'a> {
    source: String,
    #[serde(flatten)]
    result: &'a ProcessingResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    analysis: Option<Analysis>,
}

struct Options {
    inputs: Vec<PathBuf>,
    output: Option<PathBuf>,
    analyze: bool,
    compact: bool,
}

fn parse_args(args: &[String]) -> anyhow::Result<Option<Options>> {
    let mut options = Options {
        inputs: Vec::new(),
        output: None,
        analyze: false,
        compact: false,
    };

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => return Ok(None),
            "--analyze" => options.analyze = true,
            "--compact" => options.compact = true,
            "--output" | "-o" => {
                i += 1;
                let path = args.get(i).context("--output requires a path")?;
                options.output = Some(PathBuf::from(path));
            }
            flag if flag.starts_with('-') => bail!("unknown option: {flag}"),
            input => options.inputs.push(PathBuf::from(input)),
        }
        i += 1;
    }

    if options.inputs.is_empty() {
        return Ok(None);
    }
    Ok(Some(options))
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "info,roomscan=debug".into()))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let Some(options) = parse_args(&args)? else {
        print_usage();
        return Ok(());
    };

    let config = ProcessingConfig::from_env();
    tracing::info!(
        inputs = options.inputs.len(),
        max_file_size_mb = config.max_file_size_mb,
        processing_timeout_secs = config.processing_timeout_secs,
        worker_threads = config.worker_threads,
        "Starting scan-to-room"
    );

    rayon::ThreadPoolBuilder::new()
        .num_threads(config.worker_threads)
        .build_global()
        .context("failed to initialize worker pool")?;

    let results = process_files(&options.inputs, &config);

    let mut reports = Vec::with_capacity(results.len());
    let mut failures = 0;
    for (path, outcome) in &results {
        match outcome {
            Ok(result) => {
                for warning in &result.warnings {
                    tracing::warn!(path = %path.display(), "{warning}");
                }
                let analysis = options.analyze.then(|| {
                    let (state, info) = TransformState::auto_configure_from_analysis(&result.room);
                    Analysis {
                        coordinate_system: info,
                        transform: TransformReport::new(&state),
                    }
                });
                reports.push(Report {
                    source: path.display().to_string(),
                    result,
                    analysis,
                });
            }
            Err(err) => {
                failures += 1;
                tracing::error!(path = %path.display(), error = %err, "Failed to process scan");
            }
        }
    }

    let json = match (reports.len(), options.compact) {
        (1, false) => serde_json::to_string_pretty(&reports[0])?,
        (1, true) => serde_json::to_string(&reports[0])?,
        (_, false) => serde_json::to_string_pretty(&reports)?,
        (_, true) => serde_json::to_string(&reports)?,
    };

    match &options.output {
        Some(path) => {
            fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
            tracing::info!(path = %path.display(), "Wrote room model");
        }
        None => println!("{json}"),
    }

    if failures > 0 {
        bail!("{failures} of {} scans failed", results.len());
    }
    Ok(())
}

fn print_usage() {
    println!(
        r#"Scan to Room Model
==================

Extracts a semantic room model (walls, furniture, placement surfaces,
openings) from captured scene JSON.

USAGE:
  scan-to-room <scene.json>... [OPTIONS]

ARGUMENTS:
  <scene.json>         One or more scene files; several are processed in parallel

OPTIONS:
  --analyze            Include coordinate-system analysis and the derived transform
  --output, -o <path>  Write JSON to a file instead of stdout
  --compact            Emit compact JSON
  -h, --help           Show this help message

ENVIRONMENT:
  MAX_FILE_SIZE_MB         Maximum scene size (default: 100)
  PROCESSING_TIMEOUT_SECS  Per-scan time limit (default: 30)
  WORKER_THREADS           Parallel workers (default: CPU count)
  RUST_LOG                 Log filter (default: info,roomscan=debug)"#
    );
}
