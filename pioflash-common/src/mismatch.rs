// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Classification of failed uploads.
//!
//! esptool reports a wrong environment/chip pairing with a handful of fixed
//! messages. Only those failures are eligible for falling back to the next
//! environment; anything else is treated as a real upload failure.

use crate::fallback::UploadAttemptResult;

/// Output fragments that indicate the wrong chip/environment combination.
pub const CHIP_MISMATCH_MARKERS: [&str; 3] = [
    "Wrong --chip argument",
    "This chip is ESP32",
    "This chip is ESP8266",
];

/// Kind of a failed upload attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailureKind {
    /// The environment does not match the attached chip; try the next one.
    Mismatch,
    /// Any other failure; stop trying.
    Fatal,
}

/// Join the non-empty output channels with a newline.
pub fn combined_output(stdout: &str, stderr: &str) -> String {
    [stdout, stderr]
        .iter()
        .filter(|part| !part.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join("\n")
}

/// Check whether the output contains one of the chip-mismatch markers.
///
/// Plain case-sensitive substring search. Empty output never matches.
pub fn looks_like_chip_mismatch(output: &str) -> bool {
    CHIP_MISMATCH_MARKERS
        .iter()
        .any(|marker| output.contains(marker))
}

/// Classify a failed attempt from its captured output.
///
/// An attempt that failed without printing anything is fatal.
pub fn classify_failure(result: &UploadAttemptResult) -> FailureKind {
    let combined = combined_output(&result.stdout, &result.stderr);
    if !combined.is_empty() && looks_like_chip_mismatch(&combined) {
        FailureKind::Mismatch
    } else {
        FailureKind::Fatal
    }
}
