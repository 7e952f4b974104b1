// File: config.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2023-2025
// - Volker Schwaberow <volker@schwaberow.de>

use std::num::NonZeroU32;
use std::time::Duration;

#[derive(Debug, Clone, Copy)]
pub struct ConfigParameter {
    follow_redirects: bool,
    max_redirects: usize,
    timeout: Duration,
    header_timeout: Duration,
    connect_timeout: Duration,
    max_attempts: u32,
    retry_backoff: Duration,
    workers: usize,
    channel_capacity: usize,
    pool_max_idle_per_host: usize,
    pool_idle_timeout: Duration,
    rate_limit: Option<NonZeroU32>,
}

impl Default for ConfigParameter {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigParameter {
    pub fn new() -> Self {
        Self {
            follow_redirects: false,
            max_redirects: 10,
            timeout: Duration::from_secs(30),
            header_timeout: Duration::from_secs(20),
            connect_timeout: Duration::from_secs(10),
            max_attempts: 3,
            retry_backoff: Duration::from_secs(1),
            workers: 10,
            channel_capacity: 100,
            pool_max_idle_per_host: 10,
            pool_idle_timeout: Duration::from_secs(90),
            rate_limit: None,
        }
    }

    pub fn set_follow_redirects(&mut self, follow_redirects: bool) {
        self.follow_redirects = follow_redirects;
    }

    pub fn follow_redirects(&self) -> bool {
        self.follow_redirects
    }

    pub fn set_max_redirects(&mut self, max_redirects: usize) {
        self.max_redirects = max_redirects;
    }

    pub fn max_redirects(&self) -> usize {
        self.max_redirects
    }

    pub fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = timeout;
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn set_header_timeout(&mut self, header_timeout: Duration) {
        self.header_timeout = header_timeout;
    }

    pub fn header_timeout(&self) -> Duration {
        self.header_timeout
    }

    pub fn set_connect_timeout(&mut self, connect_timeout: Duration) {
        self.connect_timeout = connect_timeout;
    }

    pub fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }

    /// Attempts per fetch, retries included. Never below one.
    pub fn set_max_attempts(&mut self, max_attempts: u32) {
        self.max_attempts = max_attempts.max(1);
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Unit of the linear backoff: retry `n` waits `n * retry_backoff`.
    pub fn set_retry_backoff(&mut self, retry_backoff: Duration) {
        self.retry_backoff = retry_backoff;
    }

    pub fn retry_backoff(&self) -> Duration {
        self.retry_backoff
    }

    pub fn set_workers(&mut self, workers: usize) {
        self.workers = workers.max(1);
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn set_channel_capacity(&mut self, channel_capacity: usize) {
        self.channel_capacity = channel_capacity.max(1);
    }

    pub fn channel_capacity(&self) -> usize {
        self.channel_capacity
    }

    pub fn set_pool_max_idle_per_host(&mut self, pool_max_idle_per_host: usize) {
        self.pool_max_idle_per_host = pool_max_idle_per_host;
    }

    pub fn pool_max_idle_per_host(&self) -> usize {
        self.pool_max_idle_per_host
    }

    pub fn set_pool_idle_timeout(&mut self, pool_idle_timeout: Duration) {
        self.pool_idle_timeout = pool_idle_timeout;
    }

    pub fn pool_idle_timeout(&self) -> Duration {
        self.pool_idle_timeout
    }

    pub fn set_rate_limit(&mut self, rate_limit: Option<NonZeroU32>) {
        self.rate_limit = rate_limit;
    }

    pub fn rate_limit(&self) -> Option<NonZeroU32> {
        self.rate_limit
    }
}
