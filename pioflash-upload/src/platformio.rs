// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! PlatformIO process backend.

use std::io::Write;
use std::path::PathBuf;
use std::process::Command;
use std::time::Duration;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::debug;

use pioflash_common::fallback::{UploadAttemptResult, UploadBackend};

/// Spinner refresh interval while an upload runs.
const TICK_INTERVAL: Duration = Duration::from_millis(120);

/// Runs `platformio run --target upload` for one environment at a time.
pub struct PlatformIo {
    exe: PathBuf,
    port: Option<String>,
    progress: bool,
}

impl PlatformIo {
    /// Create a backend for the resolved executable.
    pub fn new(exe: PathBuf, port: Option<String>) -> Self {
        Self {
            exe,
            port,
            progress: true,
        }
    }

    /// Enable or disable the spinner shown while PlatformIO runs.
    pub fn with_progress(mut self, progress: bool) -> Self {
        self.progress = progress;
        self
    }

    fn spinner(&self, env: &str) -> Result<ProgressBar> {
        if !self.progress {
            return Ok(ProgressBar::hidden());
        }

        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed}] {msg}")?,
        );
        pb.set_message(format!("platformio upload ({})", env));
        pb.enable_steady_tick(TICK_INTERVAL);
        Ok(pb)
    }
}

/// Build the PlatformIO argument list for one environment.
pub fn upload_args(env: &str, port: Option<&str>) -> Vec<String> {
    let mut args = vec![
        "run".to_string(),
        "--target".to_string(),
        "upload".to_string(),
        "--environment".to_string(),
        env.to_string(),
    ];
    if let Some(port) = port.filter(|port| !port.is_empty()) {
        args.push("--upload-port".to_string());
        args.push(port.to_string());
    }
    args
}

impl UploadBackend for PlatformIo {
    type Error = anyhow::Error;

    fn upload(&mut self, env: &str) -> Result<UploadAttemptResult> {
        let args = upload_args(env, self.port.as_deref());

        let mut stdout = std::io::stdout();
        writeln!(stdout, "-> Trying upload with environment '{}'", env)?;
        stdout.flush()?;
        debug!("Running {} {}", self.exe.display(), args.join(" "));

        let pb = self.spinner(env)?;
        let output = Command::new(&self.exe).args(&args).output();
        pb.finish_and_clear();

        let output = output.with_context(|| {
            format!(
                "Failed to run {} for environment '{}'",
                self.exe.display(),
                env
            )
        })?;

        // Pass the tool's output through on its original channel
        stdout.write_all(&output.stdout)?;
        stdout.flush()?;
        let mut stderr = std::io::stderr();
        stderr.write_all(&output.stderr)?;
        stderr.flush()?;

        Ok(UploadAttemptResult {
            status: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
