// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Common types and logic for pioflash.
//!
//! Everything in this crate is independent of how PlatformIO is actually
//! spawned, so the fallback loop can be driven by a scripted backend in tests:
//! - [`envs`]: environment list normalization
//! - [`mismatch`]: chip-mismatch classification of tool output
//! - [`fallback`]: the upload fallback controller
//! - [`resolver`]: PlatformIO executable discovery

pub mod envs;
pub mod fallback;
pub mod mismatch;
pub mod resolver;

// Re-export commonly used types
pub use envs::normalize_envs;
pub use fallback::{
    decide, run_fallback, AttemptDecision, FallbackEvent, FallbackOutcome, UploadAttemptResult,
    UploadBackend,
};
pub use mismatch::{
    classify_failure, combined_output, looks_like_chip_mismatch, FailureKind,
    CHIP_MISMATCH_MARKERS,
};
pub use resolver::{ExecutableResolver, ResolveError};

/// Executable hint used when neither `--platformio` nor the environment supplies one.
pub const DEFAULT_PIO_CMD: &str = "platformio";

/// Environment variable holding the default executable hint.
pub const PIO_CMD_ENV: &str = "PLATFORMIO_CMD";
