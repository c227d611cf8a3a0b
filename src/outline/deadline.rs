//! Per-document time budget.

use std::time::{Duration, Instant};

use crate::error::{Error, Result};

/// A clock started when a document enters the pipeline.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    started: Instant,
    budget: Option<Duration>,
}

impl Deadline {
    /// Start the clock with an optional budget.
    pub fn start(budget: Option<Duration>) -> Self {
        Self {
            started: Instant::now(),
            budget,
        }
    }

    /// A deadline that never expires.
    pub fn unbounded() -> Self {
        Self::start(None)
    }

    /// Time spent so far.
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Fail with [`Error::DeadlineExceeded`] once the budget is spent.
    pub fn check(&self, stage: &'static str) -> Result<()> {
        match self.budget {
            Some(budget) if self.started.elapsed() > budget => {
                Err(Error::DeadlineExceeded(budget, stage))
            }
            _ => Ok(()),
        }
    }
}
