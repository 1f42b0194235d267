// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Try PlatformIO uploads across environments until the target accepts the firmware.
//!
//! Usage:
//!   pioflash-upload -e esp32dev -e d1_mini
//!   pioflash-upload -e esp32dev -e d1_mini --port /dev/ttyUSB0
//!   pioflash-upload -e esp32dev --platformio ~/.platformio/penv/bin/pio

mod cli;
mod platformio;

use std::io::Write;

use clap::Parser;

fn main() {
    let args = cli::Cli::parse();

    // RUST_LOG takes precedence over -v
    let default_filter = match args.verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let code = cli::run(args);
    let _ = std::io::stdout().flush();
    std::process::exit(code);
}
