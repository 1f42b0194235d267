// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Upload fallback controller - pure logic without process dependencies.
//!
//! This module drives the environment fallback loop. It never spawns anything
//! itself: each attempt is delegated to an [`UploadBackend`], which lets the
//! decision logic be tested against scripted results.

use log::{debug, trace};

use crate::mismatch::{classify_failure, FailureKind};

/// Result of one upload invocation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UploadAttemptResult {
    /// Exit status, absent when the process was terminated by a signal.
    pub status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl UploadAttemptResult {
    /// Check if the invocation exited with status 0.
    pub fn success(&self) -> bool {
        self.status == Some(0)
    }
}

/// Something that can attempt an upload for a single environment.
pub trait UploadBackend {
    type Error;

    /// Run one upload attempt to completion.
    fn upload(&mut self, env: &str) -> Result<UploadAttemptResult, Self::Error>;
}

/// What to do after an attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AttemptDecision {
    Success,
    TryNext,
    Stop,
}

/// Progress notifications emitted while the loop runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FallbackEvent<'a> {
    Attempting {
        env: &'a str,
        index: usize,
        total: usize,
    },
    Mismatch {
        env: &'a str,
    },
    Fatal {
        env: &'a str,
        status: Option<i32>,
    },
}

/// Final outcome of the fallback loop.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FallbackOutcome {
    /// An environment accepted the upload.
    Uploaded { env: String },
    /// Every environment failed with a chip mismatch.
    Exhausted { env: String, status: Option<i32> },
    /// An environment failed for a reason other than a chip mismatch.
    Fatal { env: String, status: Option<i32> },
    /// Nothing to try.
    NoEnvironments,
}

impl FallbackOutcome {
    /// Process exit status for this outcome.
    pub fn exit_code(&self) -> i32 {
        match self {
            FallbackOutcome::Uploaded { .. } => 0,
            FallbackOutcome::Exhausted { status, .. } | FallbackOutcome::Fatal { status, .. } => {
                status.unwrap_or(1)
            }
            FallbackOutcome::NoEnvironments => 1,
        }
    }
}

/// Decide how to continue after an attempt.
pub fn decide(result: &UploadAttemptResult) -> AttemptDecision {
    if result.success() {
        return AttemptDecision::Success;
    }

    match classify_failure(result) {
        FailureKind::Mismatch => AttemptDecision::TryNext,
        FailureKind::Fatal => AttemptDecision::Stop,
    }
}

/// Try each environment in order until one uploads or a fatal failure occurs.
///
/// `envs` is expected to be normalized already. Backend errors abort the loop
/// and are returned as-is.
pub fn run_fallback<B, F>(
    envs: &[String],
    backend: &mut B,
    mut on_event: F,
) -> Result<FallbackOutcome, B::Error>
where
    B: UploadBackend,
    F: FnMut(FallbackEvent<'_>),
{
    let total = envs.len();
    let mut last: Option<(&str, Option<i32>)> = None;

    for (index, env) in envs.iter().map(String::as_str).enumerate() {
        on_event(FallbackEvent::Attempting { env, index, total });

        let result = backend.upload(env)?;
        trace!(
            "{}: status {:?}, {} bytes stdout, {} bytes stderr",
            env,
            result.status,
            result.stdout.len(),
            result.stderr.len()
        );

        match decide(&result) {
            AttemptDecision::Success => {
                return Ok(FallbackOutcome::Uploaded { env: env.to_string() });
            }
            AttemptDecision::TryNext => {
                debug!("{}: chip mismatch", env);
                on_event(FallbackEvent::Mismatch { env });
                last = Some((env, result.status));
            }
            AttemptDecision::Stop => {
                on_event(FallbackEvent::Fatal {
                    env,
                    status: result.status,
                });
                return Ok(FallbackOutcome::Fatal {
                    env: env.to_string(),
                    status: result.status,
                });
            }
        }
    }

    Ok(match last {
        Some((env, status)) => FallbackOutcome::Exhausted {
            env: env.to_string(),
            status,
        },
        None => FallbackOutcome::NoEnvironments,
    })
}
