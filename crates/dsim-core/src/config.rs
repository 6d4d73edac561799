//! Runtime configuration shared by every process of a run.
//!
//! Typically built by the launcher (or loaded from a file by the application
//! crate) and handed unchanged to every process.

use crate::{DsimError, DsimResult, IntRect2D, StepClock, Tick};

/// Top-level runtime configuration.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RuntimeConfig {
    /// Domain width in grid cells.  The domain is `[0, width) × [0, height)`.
    pub width: i32,

    /// Domain height in grid cells.
    pub height: i32,

    /// Number of cooperating processes (ranks `0..num_processors`).
    pub num_processors: u32,

    /// Area of interest: how many cells past its own bounds a partition looks
    /// when computing neighbors.  Must be at least 1.
    pub aoi: i32,

    /// Total steps to simulate.
    pub total_steps: u64,

    /// Fail a still-pending remote call after this many steps.  `None`
    /// leaves failure detection to the transport's unreachable notices.
    pub promise_timeout_ticks: Option<u64>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            width:                 100,
            height:                100,
            num_processors:        1,
            aoi:                   1,
            total_steps:           100,
            promise_timeout_ticks: None,
        }
    }
}

impl RuntimeConfig {
    /// Check the configuration for values no run can use.
    pub fn validate(&self) -> DsimResult<()> {
        if self.width <= 0 || self.height <= 0 {
            return Err(DsimError::Config(format!(
                "domain must be non-empty, got {}x{}",
                self.width, self.height
            )));
        }
        if self.num_processors == 0 {
            return Err(DsimError::Config("at least one processor is required".into()));
        }
        if self.aoi < 1 {
            return Err(DsimError::Config(format!(
                "area of interest must be at least one cell, got {}",
                self.aoi
            )));
        }
        if self.promise_timeout_ticks == Some(0) {
            return Err(DsimError::Config("promise timeout must be at least one tick".into()));
        }
        Ok(())
    }

    /// The whole simulation domain.
    #[inline]
    pub fn domain(&self) -> IntRect2D {
        IntRect2D::from_size(self.width, self.height)
    }

    /// The tick at which the run ends (exclusive upper bound).
    #[inline]
    pub fn end_tick(&self) -> Tick {
        Tick(self.total_steps)
    }

    /// Construct a `StepClock` for this run.
    pub fn make_clock(&self) -> StepClock {
        StepClock::new()
    }
}
