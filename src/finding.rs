// File: finding.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2023-2025
// - Volker Schwaberow <volker@schwaberow.de>

use crate::outcome::{FetchOutcome, ProbeMethod};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Finding {
    Mismatch(Mismatch),
    Failure(Failure),
}

impl Finding {
    pub fn label(&self) -> &'static str {
        match self {
            Finding::Mismatch(m) => m.label,
            Finding::Failure(f) => f.label,
        }
    }

    pub fn method(&self) -> ProbeMethod {
        match self {
            Finding::Mismatch(m) => m.method,
            Finding::Failure(f) => f.method,
        }
    }

    pub fn is_mismatch(&self) -> bool {
        matches!(self, Finding::Mismatch(_))
    }
}

/// A variant whose response differs from the baseline of the same method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Mismatch {
    pub base_url: String,
    pub label: &'static str,
    pub method: ProbeMethod,
    pub variant_url: String,
    pub variant: FetchOutcome,
    pub baseline: FetchOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Failure {
    pub url: String,
    pub label: &'static str,
    pub method: ProbeMethod,
    pub error: String,
}
