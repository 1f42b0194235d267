// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Environment list normalization.

use std::collections::HashSet;

/// Deduplicate the requested environments, keeping the first occurrence of each.
///
/// Empty names are dropped. The relative order of the remaining entries is the
/// order in which uploads are attempted.
pub fn normalize_envs<I, S>(envs: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    let mut ordered = Vec::new();
    for env in envs {
        let env = env.as_ref();
        if !env.is_empty() && seen.insert(env.to_string()) {
            ordered.push(env.to_string());
        }
    }
    ordered
}
