//! Frame timing.

use std::time::{Duration, Instant};

/// A monotonic clock started when the frame loop spins up, queried once per
/// frame to drive time-varying uniform values. Holds nothing beyond the
/// origin instant.
#[derive(Debug, Clone, Copy)]
pub struct FrameClock {
    origin: Instant,
}

impl FrameClock {
    pub fn start() -> Self {
        FrameClock {
            origin: Instant::now(),
        }
    }

    #[inline]
    pub fn elapsed(&self) -> Duration {
        self.origin.elapsed()
    }

    /// Seconds since start, the unit time-varying uniforms are written in.
    pub fn elapsed_secs(&self) -> f32 {
        let elapsed = self.elapsed();
        elapsed.as_secs() as f32 + elapsed.subsec_nanos() as f32 * 1e-9
    }
}
