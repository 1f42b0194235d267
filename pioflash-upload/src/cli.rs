// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Command-line interface definitions.

use std::io::Write;

use clap::Parser;
use log::{debug, info};

use pioflash_common::fallback::{run_fallback, FallbackEvent, FallbackOutcome};
use pioflash_common::resolver::ExecutableResolver;
use pioflash_common::{normalize_envs, DEFAULT_PIO_CMD, PIO_CMD_ENV};

use crate::platformio::PlatformIo;

/// Command-line arguments.
#[derive(Parser)]
#[command(name = "pioflash-upload", version)]
#[command(about = "Try PlatformIO uploads across environments until the target accepts the firmware")]
pub struct Cli {
    /// Environment name to try (ordered, first match wins)
    #[arg(short, long = "env", value_name = "NAME", required = true)]
    pub envs: Vec<String>,

    /// Serial port to forward to PlatformIO (e.g., /dev/ttyUSB0)
    #[arg(long)]
    pub port: Option<String>,

    /// PlatformIO executable to invoke
    #[arg(long, value_name = "PATH", env = PIO_CMD_ENV, default_value = DEFAULT_PIO_CMD)]
    pub platformio: String,

    /// Disable the spinner shown while PlatformIO runs
    #[arg(long)]
    pub no_progress: bool,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Execute the upload fallback and return the process exit status.
pub fn run(cli: Cli) -> i32 {
    let envs = normalize_envs(&cli.envs);
    debug!("Environments to try: {:?}", envs);

    let exe = match ExecutableResolver::from_env().resolve(Some(cli.platformio.as_str())) {
        Ok(exe) => exe,
        Err(e) => {
            eprintln!("{}", e);
            return 1;
        }
    };

    let mut backend = PlatformIo::new(exe, cli.port).with_progress(!cli.no_progress);

    let outcome = run_fallback(&envs, &mut backend, |event| match event {
        FallbackEvent::Attempting { env, index, total } => {
            debug!("Attempt {}/{}: {}", index + 1, total, env);
        }
        FallbackEvent::Mismatch { env } => {
            // A closed stdout surfaces on the next attempt's banner
            let mut stdout = std::io::stdout();
            let _ = writeln!(
                stdout,
                "Environment '{}' failed due to chip mismatch, trying next option...",
                env
            );
            let _ = stdout.flush();
        }
        FallbackEvent::Fatal { env, status } => {
            debug!("{} failed with status {:?}, not trying further", env, status);
        }
    });

    match outcome {
        Ok(FallbackOutcome::NoEnvironments) => {
            eprintln!("No environments provided.");
            1
        }
        Ok(outcome) => {
            info!("Finished: {:?}", outcome);
            outcome.exit_code()
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            1
        }
    }
}
