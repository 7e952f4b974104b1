// File: input.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2023-2025
// - Volker Schwaberow <volker@schwaberow.de>

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// Resolves the operator's input: `-` reads stdin, an existing path is read
/// as a URL list, anything else is a single URL.
pub fn load_targets(input: &str) -> Result<Vec<String>> {
    if input == "-" {
        let stdin = io::stdin();
        return read_targets(stdin.lock()).context("failed to read targets from stdin");
    }

    let path = Path::new(input);
    if path.exists() {
        let file =
            File::open(path).with_context(|| format!("failed to open input file {}", input))?;
        return read_targets(BufReader::new(file))
            .with_context(|| format!("failed to read input file {}", input));
    }

    Ok(vec![input.to_string()])
}

/// One URL per line, trimmed; blank lines are skipped.
pub fn read_targets<R: BufRead>(reader: R) -> io::Result<Vec<String>> {
    let mut targets = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let trimmed = line.trim();
        if !trimmed.is_empty() {
            targets.push(trimmed.to_string());
        }
    }
    Ok(targets)
}
