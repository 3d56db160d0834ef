// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use iotsign_core::{Error, Result};
use log::{debug, error};
use std::future::Future;
use std::time::Duration;
use tokio::time::{self, MissedTickBehavior};

/// ErrorSink receives the error of every failed iteration.
pub trait ErrorSink: Send + Sync {
    /// Report a failed iteration.
    fn report(&self, err: &Error);
}

impl<F> ErrorSink for F
where
    F: Fn(&Error) + Send + Sync,
{
    fn report(&self, err: &Error) {
        self(err)
    }
}

/// ErrorSink that logs every failure with `error!`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogErrorSink;

impl ErrorSink for LogErrorSink {
    fn report(&self, err: &Error) {
        error!("publish iteration failed: {err:?}");
    }
}

/// Scheduler runs a task on a fixed interval until shutdown.
///
/// A failed iteration never stops the schedule: the error goes to the sink
/// and the next tick runs as planned.
#[derive(Debug, Clone)]
pub struct Scheduler<S = LogErrorSink> {
    interval: Duration,
    sink: S,
}

impl Scheduler<LogErrorSink> {
    /// Create a scheduler that logs failures.
    pub fn new(interval: Duration) -> Result<Self> {
        if interval.is_zero() {
            return Err(Error::config_invalid("schedule interval must be positive"));
        }

        Ok(Self {
            interval,
            sink: LogErrorSink,
        })
    }
}

impl<S: ErrorSink> Scheduler<S> {
    /// Replace the error sink.
    pub fn with_sink<T: ErrorSink>(self, sink: T) -> Scheduler<T> {
        Scheduler {
            interval: self.interval,
            sink,
        }
    }

    /// Time between two iterations.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Run `task` once per tick until `shutdown` resolves.
    ///
    /// The first iteration starts immediately. A tick that is missed because
    /// an iteration ran long is delayed rather than replayed. Shutdown is only
    /// observed between iterations, so an in-flight publish always completes.
    ///
    /// Returns the number of iterations that ran.
    pub async fn run<F, Fut, T>(&self, mut task: F, shutdown: impl Future<Output = ()>) -> u64
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut interval = time::interval(self.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        let mut iterations = 0;
        loop {
            tokio::select! {
                biased;

                _ = &mut shutdown => break,
                _ = interval.tick() => {}
            }

            iterations += 1;
            match task().await {
                Ok(_) => debug!("iteration {iterations} finished"),
                Err(err) => self.sink.report(&err),
            }
        }

        debug!("scheduler stopped after {iterations} iterations");
        iterations
    }
}
