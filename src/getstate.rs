/*
Copyright 2022 Volker Schwaberow <volker@schwaberow.de>
Permission is hereby granted, free of charge, to any person obtaining a
copy of this software and associated documentation files (the
"Software"), to deal in the Software without restriction, including without
limitation the rights to use, copy, modify, merge, publish, distribute,
sublicense, and/or sell copies of the Software, and to permit persons to whom the
Software is furnished to do so, subject to the following conditions:
The above copyright notice and this permission notice shall be
included in all copies or substantial portions of the Software.
THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS
OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT
SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR
OTHER LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE,
ARISING FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER
DEALINGS IN THE SOFTWARE.
Author(s): Volker Schwaberow
*/

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters shared by every probe task of a scan.
#[derive(Debug, Default)]
pub struct GetState {
    total_targets: AtomicU64,
    completed_targets: AtomicU64,
    requests_sent: AtomicU64,
    retries: AtomicU64,
    mismatches: AtomicU64,
    failures: AtomicU64,
    suppressed: AtomicU64,
    start_time: AtomicU64,
    end_time: AtomicU64,
}

impl GetState {
    pub fn new() -> GetState {
        GetState::default()
    }

    pub fn add_targets(&self, count: u64) {
        self.total_targets.fetch_add(count, Ordering::Relaxed);
    }

    pub fn total_targets(&self) -> u64 {
        self.total_targets.load(Ordering::Relaxed)
    }

    pub fn add_completed_target(&self) {
        self.completed_targets.fetch_add(1, Ordering::Relaxed);
    }

    pub fn completed_targets(&self) -> u64 {
        self.completed_targets.load(Ordering::Relaxed)
    }

    pub fn add_request(&self) {
        self.requests_sent.fetch_add(1, Ordering::Relaxed);
    }

    pub fn requests_sent(&self) -> u64 {
        self.requests_sent.load(Ordering::Relaxed)
    }

    pub fn add_retry(&self) {
        self.retries.fetch_add(1, Ordering::Relaxed);
    }

    pub fn retries(&self) -> u64 {
        self.retries.load(Ordering::Relaxed)
    }

    pub fn add_mismatch(&self) {
        self.mismatches.fetch_add(1, Ordering::Relaxed);
    }

    pub fn mismatches(&self) -> u64 {
        self.mismatches.load(Ordering::Relaxed)
    }

    pub fn add_failure(&self) {
        self.failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn failures(&self) -> u64 {
        self.failures.load(Ordering::Relaxed)
    }

    /// Fetches dropped because the URL had no host.
    pub fn add_suppressed(&self) {
        self.suppressed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn suppressed(&self) -> u64 {
        self.suppressed.load(Ordering::Relaxed)
    }

    pub fn set_start_time(&self, start_time: u64) {
        self.start_time.store(start_time, Ordering::Relaxed);
    }

    pub fn start_time(&self) -> u64 {
        self.start_time.load(Ordering::Relaxed)
    }

    pub fn set_end_time(&self, end_time: u64) {
        self.end_time.store(end_time, Ordering::Relaxed);
    }

    pub fn end_time(&self) -> u64 {
        self.end_time.load(Ordering::Relaxed)
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.end_time().saturating_sub(self.start_time())
    }
}
