// File: output.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2023-2025
// - Volker Schwaberow <volker@schwaberow.de>

use crate::finding::{Failure, Finding, Mismatch};
use crate::getstate::GetState;
use crate::http::normalize_final_url;
use chrono::{DateTime, Utc};
use colored::*;
use std::io::{self, Write};

pub trait FindingSink {
    fn emit(&mut self, finding: &Finding) -> io::Result<()>;
}

pub struct TextSink<W: Write> {
    out: W,
}

impl<W: Write> TextSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> FindingSink for TextSink<W> {
    fn emit(&mut self, finding: &Finding) -> io::Result<()> {
        self.out.write_all(render_text(finding).as_bytes())?;
        self.out.flush()
    }
}

/// One JSON object per line.
pub struct JsonSink<W: Write> {
    out: W,
}

impl<W: Write> JsonSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> FindingSink for JsonSink<W> {
    fn emit(&mut self, finding: &Finding) -> io::Result<()> {
        serde_json::to_writer(&mut self.out, finding)?;
        writeln!(self.out)?;
        self.out.flush()
    }
}

pub fn render_text(finding: &Finding) -> String {
    match finding {
        Finding::Mismatch(m) => render_mismatch(m),
        Finding::Failure(f) => render_failure(f),
    }
}

fn render_mismatch(m: &Mismatch) -> String {
    let mut output = format!(
        "{} Mismatch at [{}] [{}]:\n",
        "🔍",
        m.label.yellow().bold(),
        m.method.to_string().cyan()
    );
    output.push_str(&format!(
        "    ➤ Original: {} (Size: {}, Status: {})\n",
        m.base_url,
        m.baseline.size(),
        m.baseline.status()
    ));
    if normalize_final_url(&m.base_url) != m.baseline.final_url() {
        output.push_str(&format!(
            "    ➤ Original Redirect: {} → {}\n",
            m.base_url,
            m.baseline.final_url()
        ));
    }
    output.push_str(&format!(
        "    ➤ Variant : {} (Size: {}, Status: {})\n",
        m.variant.final_url(),
        m.variant.size().to_string().green(),
        m.variant.status().to_string().green()
    ));
    if normalize_final_url(&m.variant_url) != m.variant.final_url() {
        output.push_str(&format!(
            "    ➤ Variant Redirect: {} → {}\n",
            m.variant_url,
            m.variant.final_url()
        ));
    }
    output.push('\n');
    output
}

fn render_failure(f: &Failure) -> String {
    format!(
        "{} Error fetching {} ({}) [{}]: {}\n",
        "❌",
        f.label,
        f.url,
        f.method,
        f.error.red()
    )
}

fn format_timestamp(ms: u64) -> String {
    DateTime::<Utc>::from_timestamp_millis(ms as i64)
        .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| "-".to_string())
}

pub fn render_summary(state: &GetState) -> String {
    let mut output = format!(
        "{} targets, {} requests ({} retries). Started at {} / Ended at {}. {} ms.\n",
        state.completed_targets(),
        state.requests_sent(),
        state.retries(),
        format_timestamp(state.start_time()),
        format_timestamp(state.end_time()),
        state.elapsed_ms()
    );
    output.push_str(&format!(
        "Mismatches: {}. Errors: {}.",
        state.mismatches(),
        state.failures()
    ));
    if state.suppressed() > 0 {
        output.push_str(&format!(
            " Skipped {} requests without a host.",
            state.suppressed()
        ));
    }
    output
}
