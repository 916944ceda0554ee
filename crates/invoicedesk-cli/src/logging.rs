// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow};
use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

use crate::config::APP_NAME;

const LOG_ENV: &str = "INVOICEDESK_LOG";
const LOG_FILE: &str = "invoicedesk.log";

pub fn default_log_path() -> Result<PathBuf> {
    let data_root = dirs::data_dir()
        .ok_or_else(|| anyhow!("cannot resolve data directory for {LOG_FILE}"))?;
    Ok(data_root.join(APP_NAME).join(LOG_FILE))
}

/// `INVOICEDESK_LOG` wins over the configured level.
fn build_filter(configured: &str) -> Result<EnvFilter> {
    match std::env::var(LOG_ENV) {
        Ok(directives) if !directives.trim().is_empty() => EnvFilter::try_new(&directives)
            .with_context(|| format!("{LOG_ENV}={directives:?} is not a valid log filter")),
        _ => EnvFilter::try_new(configured)
            .with_context(|| format!("log.level {configured:?} is not a valid log filter")),
    }
}

/// Send events to the log file; the terminal belongs to the TUI.
pub fn init(configured: &str) -> Result<PathBuf> {
    let path = default_log_path()?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("create log directory {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("open log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(build_filter(configured)?)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .map_err(|error| anyhow!("install log subscriber: {error}"))?;
    Ok(path)
}
