/*
 * deadline.rs
 * Copyright (C) 2026 Chris Burdess
 *
 * This file is part of Wirefetch, a minimal HTTP/1.1 client.
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

//! Deadline governor: bounds each connect, write and read step by the request timeout.
//!
//! With `DeadlinePolicy::PerOperation` every step gets the full timeout again, so an attempt
//! that connects, writes and reads N times may take up to (2 + N) × timeout. With
//! `DeadlinePolicy::Shared` the steps draw from one budget started when the attempt began.

use std::future::Future;
use std::io;
use std::time::Duration;

use tokio::time::{timeout, Instant};

use crate::config::DeadlinePolicy;
use crate::error::{Error, Result};

/// Kind of network step, used to pick the error on failure or expiry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Connect,
    Write,
    Read,
}

impl Step {
    fn failed(self, e: io::Error) -> Error {
        match self {
            Step::Connect => Error::Connect(e),
            Step::Write => Error::Write(e),
            Step::Read => Error::Read(e),
        }
    }

    fn expired(self) -> Error {
        match self {
            Step::Connect => Error::ConnectTimeout,
            Step::Write => Error::WriteTimeout,
            Step::Read => Error::ReadTimeout,
        }
    }
}

/// Time budget for one request attempt. A redirect hop starts a new one.
#[derive(Debug, Clone)]
pub struct Deadline {
    policy: DeadlinePolicy,
    timeout: Duration,
    started: Instant,
}

impl Deadline {
    pub fn start(policy: DeadlinePolicy, timeout: Duration) -> Self {
        Self {
            policy,
            timeout,
            started: Instant::now(),
        }
    }

    /// Time allowed for the next step.
    pub fn budget(&self) -> Duration {
        match self.policy {
            DeadlinePolicy::PerOperation => self.timeout,
            DeadlinePolicy::Shared => self.timeout.saturating_sub(self.started.elapsed()),
        }
    }

    /// Run one network step under the budget. Expiry drops the future, cancelling the
    /// operation; a transport error is reported as the step's error kind.
    pub async fn run<T, F>(&self, step: Step, op: F) -> Result<T>
    where
        F: Future<Output = io::Result<T>>,
    {
        match timeout(self.budget(), op).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(step.failed(e)),
            Err(_) => Err(step.expired()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use tokio::time::sleep;

    async fn slow(ms: u64) -> io::Result<u64> {
        sleep(Duration::from_millis(ms)).await;
        Ok(ms)
    }

    #[tokio::test(start_paused = true)]
    async fn step_that_never_finishes_times_out() {
        let d = Deadline::start(DeadlinePolicy::PerOperation, Duration::from_secs(2));
        let e = d
            .run(Step::Connect, std::future::pending::<io::Result<()>>())
            .await
            .unwrap_err();
        assert_eq!(e.kind(), ErrorKind::ConnectTimeout);
        let e = d
            .run(Step::Read, std::future::pending::<io::Result<()>>())
            .await
            .unwrap_err();
        assert_eq!(e.kind(), ErrorKind::ReadTimeout);
    }

    #[tokio::test(start_paused = true)]
    async fn transport_error_keeps_step_kind() {
        let d = Deadline::start(DeadlinePolicy::PerOperation, Duration::from_secs(2));
        let e = d
            .run(Step::Write, async {
                Err::<(), _>(io::Error::from(io::ErrorKind::BrokenPipe))
            })
            .await
            .unwrap_err();
        assert_eq!(e.kind(), ErrorKind::WriteError);
    }

    #[tokio::test(start_paused = true)]
    async fn per_operation_budget_is_not_decremented() {
        let d = Deadline::start(DeadlinePolicy::PerOperation, Duration::from_millis(1000));
        assert_eq!(d.run(Step::Connect, slow(700)).await.unwrap(), 700);
        assert_eq!(d.budget(), Duration::from_millis(1000));
        assert_eq!(d.run(Step::Read, slow(700)).await.unwrap(), 700);
        assert_eq!(d.run(Step::Read, slow(700)).await.unwrap(), 700);
    }

    #[tokio::test(start_paused = true)]
    async fn shared_budget_is_spent_across_steps() {
        let d = Deadline::start(DeadlinePolicy::Shared, Duration::from_millis(1000));
        assert_eq!(d.run(Step::Connect, slow(700)).await.unwrap(), 700);
        assert!(d.budget() <= Duration::from_millis(300));
        let e = d.run(Step::Read, slow(700)).await.unwrap_err();
        assert_eq!(e.kind(), ErrorKind::ReadTimeout);
        assert_eq!(d.budget(), Duration::ZERO);
    }
}
