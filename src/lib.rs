// File: lib.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2023-2025
// - Volker Schwaberow <volker@schwaberow.de>

#![allow(clippy::uninlined_format_args)]
#![allow(clippy::bool_assert_comparison)]
#![allow(clippy::new_without_default)]

pub mod cli;
pub mod config;
pub mod errors;
pub mod finding;
pub mod getstate;
pub mod http;
pub mod input;
pub mod outcome;
pub mod output;
pub mod probe;
pub mod scanner;
pub mod variants;


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_imports() {
        let config = config::ConfigParameter::default();
        let state = std::sync::Arc::new(getstate::GetState::new());
        let _ = http::Http::new(state, config).unwrap();
        let _ = variants::generate_variants("http://example.com/");
        let _ = outcome::FetchOutcome::new(0, 200, String::new());
    }
}
