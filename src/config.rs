// Copyright (c) 2024-2025 Jesse Morgan / Morgan Forge
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Startup configuration: built-in defaults, optional config file, CLI
//! overrides - in that precedence order.
//!
//! The file lives at `~/.webgrab/config.json` and is entirely optional;
//! a missing file means defaults. An unreadable file is reported and
//! ignored rather than aborting startup.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::dispatch::DEFAULT_WORKERS;

/// Startup configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Number of parallel download workers.
    pub workers: usize,
    /// Directory downloads are saved into.
    pub output_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            output_dir: PathBuf::from("."),
        }
    }
}

impl Config {
    /// Path of the optional config file.
    pub fn config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".webgrab").join("config.json"))
    }

    /// Load the config file if present, defaults otherwise.
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load configuration from a specific file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }

    /// Apply CLI flag overrides. Flags beat the file, the file beats
    /// defaults.
    pub fn apply_cli(&mut self, workers: Option<usize>, output_dir: Option<PathBuf>) {
        if let Some(workers) = workers {
            self.workers = workers;
        }
        if let Some(output_dir) = output_dir {
            self.output_dir = output_dir;
        }
    }
}
