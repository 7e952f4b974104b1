// File: main.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2023-2025
// - Volker Schwaberow <volker@schwaberow.de>

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use colored::*;
use indicatif::{ProgressBar, ProgressState, ProgressStyle};
use log::{warn, LevelFilter};
use simple_logger::SimpleLogger;
use slasher::cli::{Cli, OutputFormat, BANNER};
use slasher::getstate::GetState;
use slasher::http::Http;
use slasher::input::load_targets;
use slasher::output::{render_summary, FindingSink, JsonSink, TextSink};
use slasher::scanner::Scanner;
use std::fmt::Write;
use std::io;
use std::str::FromStr;
use std::sync::Arc;

fn now_ms() -> u64 {
    chrono::Utc::now().timestamp_millis().max(0) as u64
}

fn init_logger(level: &str) {
    let (filter, valid) = match LevelFilter::from_str(level) {
        Ok(filter) => (filter, true),
        Err(_) => (LevelFilter::Warn, false),
    };
    if let Err(e) = SimpleLogger::new().with_level(filter).init() {
        eprintln!("Failed to initialize logger: {}", e);
    }
    if !valid {
        warn!("Unknown log level '{}', using warn", level);
    }
}

fn print_banner() {
    eprintln!("{}", BANNER.bright_cyan());
    eprintln!(
        "{} v{} - path traversal scanner\n",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    );
}

fn progress_bar() -> ProgressBar {
    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::with_template(
            "[{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} ({eta}) {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .with_key("eta", |state: &ProgressState, w: &mut dyn Write| {
            let _ = write!(w, "{:.1}s", state.eta().as_secs_f64());
        })
        .progress_chars("█▉▊▋▌▍▎▏  "),
    );
    pb
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger(&cli.log_level);

    if cli.no_color {
        colored::control::set_override(false);
    }

    let Some(input) = cli.target() else {
        print_banner();
        Cli::command().print_help()?;
        return Ok(());
    };

    if !cli.quiet {
        print_banner();
    }

    let targets = load_targets(input)?;

    let state = Arc::new(GetState::new());
    state.set_start_time(now_ms());
    let http = Http::new(Arc::clone(&state), cli.to_config())
        .context("failed to set up the HTTP client")?;

    let progress = if cli.quiet {
        ProgressBar::hidden()
    } else {
        progress_bar()
    };
    let scanner = Scanner::new(http).with_progress(progress.clone());
    let mut stream = scanner.scan(targets);

    let mut sink: Box<dyn FindingSink> = match cli.format {
        OutputFormat::Text => Box::new(TextSink::new(io::stdout())),
        OutputFormat::Json => Box::new(JsonSink::new(io::stdout())),
    };
    while let Some(finding) = stream.next().await {
        progress
            .suspend(|| sink.emit(&finding))
            .context("failed to write finding")?;
    }
    stream.finish().await;
    state.set_end_time(now_ms());

    if !cli.suppress_stats {
        eprintln!("\n{}", render_summary(&state));
    }

    Ok(())
}
