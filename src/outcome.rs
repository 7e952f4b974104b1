// File: outcome.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2023-2025
// - Volker Schwaberow <volker@schwaberow.de>

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ProbeMethod {
    Get,
    Post,
}

impl ProbeMethod {
    pub const ALL: [ProbeMethod; 2] = [ProbeMethod::Get, ProbeMethod::Post];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProbeMethod::Get => "GET",
            ProbeMethod::Post => "POST",
        }
    }
}

impl From<ProbeMethod> for reqwest::Method {
    fn from(method: ProbeMethod) -> Self {
        match method {
            ProbeMethod::Get => reqwest::Method::GET,
            ProbeMethod::Post => reqwest::Method::POST,
        }
    }
}

impl fmt::Display for ProbeMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a completed fetch looked like on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FetchOutcome {
    size: usize,
    status: u16,
    final_url: String,
}

impl FetchOutcome {
    pub fn new(size: usize, status: u16, final_url: String) -> Self {
        FetchOutcome {
            size,
            status,
            final_url,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn final_url(&self) -> &str {
        &self.final_url
    }
}
