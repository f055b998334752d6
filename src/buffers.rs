//! Caller owned memory values are written into.

mod indicator;
mod target;

use std::cmp::min;

pub use self::{indicator::Indicator, target::TargetBuffer};

/// Clamps a usize between `0` and `i16::MAX`.
pub fn clamp_small_int(n: usize) -> i16 {
    min(n, i16::MAX as usize) as i16
}
