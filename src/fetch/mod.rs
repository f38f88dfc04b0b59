// Copyright (c) 2024-2025 Jesse Morgan / Morgan Forge
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Fetch collaborator invoked by download workers.
//!
//! Workers never talk to the network directly; they hand URLs to a
//! [`Fetcher`], which is synchronous from the caller's view and reports
//! failure as a [`FetchError`] instead of panicking across the worker
//! boundary. [`HttpFetcher`] is the production implementation; tests swap
//! in recording stubs.

use std::fmt;
use std::fs::File;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

/// Timeout for establishing a connection (in seconds).
const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Overall timeout for a single download request (in seconds).
const REQUEST_TIMEOUT_SECS: u64 = 3600;

/// Filename used when none can be derived from the URL path.
const FALLBACK_FILENAME: &str = "download.bin";

/// Error types specific to fetch operations.
#[derive(Debug, Clone)]
pub enum FetchError {
    /// The payload was not a parseable URL.
    InvalidUrl(String),
    /// Network or HTTP transport error.
    Request(String),
    /// The server answered with a non-success status.
    HttpStatus { url: String, status: u16 },
    /// Writing the downloaded body to disk failed.
    Io(String),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidUrl(msg) => write!(f, "invalid URL: {}", msg),
            Self::Request(msg) => write!(f, "request failed: {}", msg),
            Self::HttpStatus { url, status } => {
                write!(f, "server returned HTTP {} for {}", status, url)
            }
            Self::Io(msg) => write!(f, "failed to write download: {}", msg),
        }
    }
}

impl std::error::Error for FetchError {}

/// External download operation, injected into the worker pool.
///
/// Implementations must be synchronous (the call occupies the worker's own
/// thread) and must surface every failure as an `Err` - a fetch must never
/// panic into the worker loop.
pub trait Fetcher: Send + Sync {
    /// Fetch `url` to completion.
    fn fetch(&self, url: &str) -> Result<(), FetchError>;
}

/// Fetcher that downloads over HTTP(S) and saves the body to a file.
///
/// The target filename is the last non-empty segment of the URL path
/// (`https://host/a/b.tar.gz` -> `b.tar.gz`), falling back to
/// `download.bin` when the path has none.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    /// HTTP client with configured timeouts.
    client: reqwest::blocking::Client,
    /// Directory downloads are saved into.
    output_dir: PathBuf,
}

impl HttpFetcher {
    /// Create a fetcher that saves downloads into `output_dir`.
    pub fn new(output_dir: impl Into<PathBuf>) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            client,
            output_dir: output_dir.into(),
        })
    }

    /// The directory this fetcher saves into.
    pub fn output_dir(&self) -> &std::path::Path {
        &self.output_dir
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<(), FetchError> {
        let parsed = reqwest::Url::parse(url)
            .map_err(|e| FetchError::InvalidUrl(format!("{}: {}", url, e)))?;
        let target = self.output_dir.join(filename_for(&parsed));

        let mut response = self
            .client
            .get(parsed)
            .send()
            .map_err(|e| FetchError::Request(e.to_string()))?;

        if !response.status().is_success() {
            return Err(FetchError::HttpStatus {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        let mut file = File::create(&target)
            .map_err(|e| FetchError::Io(format!("{}: {}", target.display(), e)))?;
        response
            .copy_to(&mut file)
            .map_err(|e| FetchError::Request(e.to_string()))?;

        tracing::debug!(url = %url, target = %target.display(), "saved download");
        Ok(())
    }
}

/// Derive the local filename for a URL.
fn filename_for(url: &reqwest::Url) -> String {
    url.path_segments()
        .and_then(|segments| segments.rev().find(|segment| !segment.is_empty()))
        .map(str::to_string)
        .unwrap_or_else(|| FALLBACK_FILENAME.to_string())
}
