/*
 * config.rs
 * Copyright (C) 2026 Chris Burdess
 *
 * This file is part of Wirefetch.
 *
 * Wirefetch is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * Wirefetch is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with Wirefetch.  If not, see <http://www.gnu.org/licenses/>.
 */

//! Client configuration. Nothing here is read from files or the environment; callers
//! build a `ClientConfig` and hand it to `HttpClient::new`.
//!
//! TLS certificate verification is on by default. Older releases of this client never
//! verified certificates; that behaviour is still available through
//! [`ClientConfig::danger_accept_invalid_certs`] but must be asked for explicitly.

use std::time::Duration;

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default number of 301/302 hops that will be followed.
pub const DEFAULT_MAX_REDIRECTS: u32 = 5;

/// Default ceiling for status line + header block.
pub const DEFAULT_MAX_HEAD_BYTES: usize = 64 * 1024;

/// How the timeout is spent across the connect, write and read steps of one attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeadlinePolicy {
    /// Every network step gets the full timeout. Worst case is timeout × steps.
    #[default]
    PerOperation,
    /// One budget for the whole attempt; each step gets whatever is left.
    Shared,
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub timeout: Duration,
    /// Highest hop index at which a 301/302 is still followed (hops count from 0), so up to
    /// `max_redirects + 1` redirects are chased before one is returned as the response.
    pub max_redirects: u32,
    pub verify_tls: bool,
    pub deadline_policy: DeadlinePolicy,
    pub max_head_bytes: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            max_redirects: DEFAULT_MAX_REDIRECTS,
            verify_tls: true,
            deadline_policy: DeadlinePolicy::default(),
            max_head_bytes: DEFAULT_MAX_HEAD_BYTES,
        }
    }
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout_secs(self, secs: u64) -> Self {
        self.timeout(Duration::from_secs(secs))
    }

    pub fn max_redirects(mut self, max: u32) -> Self {
        self.max_redirects = max;
        self
    }

    pub fn deadline_policy(mut self, policy: DeadlinePolicy) -> Self {
        self.deadline_policy = policy;
        self
    }

    pub fn max_head_bytes(mut self, max: usize) -> Self {
        self.max_head_bytes = max;
        self
    }

    /// Skip server certificate validation for https. SNI is still sent.
    pub fn danger_accept_invalid_certs(mut self) -> Self {
        self.verify_tls = false;
        self
    }
}
