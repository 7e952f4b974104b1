// File: scanner.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2023-2025
// - Volker Schwaberow <volker@schwaberow.de>

use crate::finding::Finding;
use crate::getstate::GetState;
use crate::http::Http;
use crate::probe::probe_url;
use futures::stream::{FuturesUnordered, StreamExt};
use indicatif::ProgressBar;
use log::{debug, warn};
use std::sync::Arc;
use tokio::sync::{mpsc, Semaphore};
use tokio::task::JoinHandle;

/// Runs one probe task per base URL, at most `workers` at a time.
#[derive(Clone)]
pub struct Scanner {
    http: Http,
    workers: usize,
    capacity: usize,
    progress: ProgressBar,
}

/// Findings of a running scan. The channel closes once every probe task
/// has dropped its sender.
#[derive(Debug)]
pub struct ScanStream {
    results: mpsc::Receiver<Finding>,
    driver: JoinHandle<()>,
}

impl Scanner {
    pub fn new(http: Http) -> Self {
        let config = *http.config();
        Scanner {
            http,
            workers: config.workers(),
            capacity: config.channel_capacity(),
            progress: ProgressBar::hidden(),
        }
    }

    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    pub fn state(&self) -> &Arc<GetState> {
        self.http.state()
    }

    /// Starts probing `targets` in the background. Must be called from
    /// within a tokio runtime.
    pub fn scan<I>(&self, targets: I) -> ScanStream
    where
        I: IntoIterator<Item = String>,
        I::IntoIter: Send + 'static,
    {
        let (tx, results) = mpsc::channel(self.capacity);
        let targets = targets.into_iter();
        let http = self.http.clone();
        let progress = self.progress.clone();
        let workers = self.workers;

        let driver = tokio::spawn(async move {
            let peak = drive(targets, http, progress.clone(), workers, tx).await;
            debug!("scan done, at most {} probe tasks pending at once", peak);
            progress.finish_and_clear();
        });

        ScanStream { results, driver }
    }
}

/// Spawns a probe task per target once a worker slot frees up, reaping
/// finished tasks while waiting so their handles do not pile up. Returns
/// the largest number of handles held at once.
async fn drive<I>(
    targets: I,
    http: Http,
    progress: ProgressBar,
    workers: usize,
    tx: mpsc::Sender<Finding>,
) -> usize
where
    I: Iterator<Item = String>,
{
    let semaphore = Arc::new(Semaphore::new(workers));
    let mut tasks = FuturesUnordered::new();
    let mut peak = 0;

    for target in targets {
        let permit = loop {
            tokio::select! {
                biased;
                Some(joined) = tasks.next(), if !tasks.is_empty() => report_join(joined),
                permit = Arc::clone(&semaphore).acquire_owned() => break permit,
            }
        };
        let Ok(permit) = permit else {
            break;
        };
        http.state().add_targets(1);
        progress.inc_length(1);

        let http = http.clone();
        let tx = tx.clone();
        let progress = progress.clone();
        tasks.push(tokio::spawn(async move {
            let _permit = permit;
            debug!("probing {}", target);
            probe_url(&http, &target, &tx).await;
            http.state().add_completed_target();
            progress.inc(1);
        }));
        peak = peak.max(tasks.len());
    }
    drop(tx);

    while let Some(joined) = tasks.next().await {
        report_join(joined);
    }
    peak
}

fn report_join(joined: Result<(), tokio::task::JoinError>) {
    if let Err(e) = joined {
        warn!("probe task failed: {}", e);
    }
}

impl ScanStream {
    /// Next finding, or `None` once every probe task is done.
    pub async fn next(&mut self) -> Option<Finding> {
        self.results.recv().await
    }

    /// Waits for the scheduler itself to wind down.
    pub async fn finish(self) {
        drop(self.results);
        if let Err(e) = self.driver.await {
            warn!("scan scheduler failed: {}", e);
        }
    }

    pub async fn collect(mut self) -> Vec<Finding> {
        let mut findings = Vec::new();
        while let Some(finding) = self.next().await {
            findings.push(finding);
        }
        self.finish().await;
        findings
    }
}
