// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Motion-to-step detection.
//!
//! A single fixed-threshold debounce filter over the magnitude of the
//! acceleration-including-gravity vector: a sample counts as one step when
//! its magnitude exceeds [`STEP_THRESHOLD`] and more than
//! [`DEBOUNCE_INTERVAL_MS`] have passed since the last accepted step.

use serde::Deserialize;

/// Minimum magnitude (m/s²) of a footfall spike; gravity alone is ~9.8.
pub const STEP_THRESHOLD: f64 = 12.5;

/// Minimum time between two accepted steps (caps cadence near 170/min).
pub const DEBOUNCE_INTERVAL_MS: u64 = 350;

/// One acceleration-including-gravity sample. Missing axes count as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct MotionSample {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub z: Option<f64>,
}

impl MotionSample {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            z: Some(z),
        }
    }

    /// Euclidean norm of the sample.
    pub fn magnitude(&self) -> f64 {
        let x = self.x.unwrap_or(0.0);
        let y = self.y.unwrap_or(0.0);
        let z = self.z.unwrap_or(0.0);
        (x * x + y * y + z * z).sqrt()
    }
}

/// Stateful step filter. Never decrements; emits at most one step per sample.
///
/// Before the first step the debounce window is open, so the first sample
/// above the threshold always counts regardless of its timestamp.
#[derive(Debug, Default)]
pub struct StepDetector {
    last_step_ms: Option<u64>,
}

impl StepDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process a sample delivered at `now_ms`. Returns `true` if it is a step.
    pub fn process_sample(&mut self, sample: &MotionSample, now_ms: u64) -> bool {
        if sample.magnitude() <= STEP_THRESHOLD {
            return false;
        }
        if let Some(last) = self.last_step_ms {
            if now_ms < last {
                // The sample clock restarted (client reload, clock switch);
                // the old anchor no longer means anything.
                tracing::debug!(last, now_ms, "Sample clock went backwards");
            } else if now_ms - last <= DEBOUNCE_INTERVAL_MS {
                return false;
            }
        }
        self.last_step_ms = Some(now_ms);
        true
    }

    /// Forget the last step so the next spike counts.
    pub fn reset(&mut self) {
        self.last_step_ms = None;
    }

    /// Process timestamped samples in order and return the number of steps.
    pub fn process_batch<'a, I>(&mut self, samples: I) -> u32
    where
        I: IntoIterator<Item = (&'a MotionSample, u64)>,
    {
        samples
            .into_iter()
            .filter(|(sample, now_ms)| self.process_sample(sample, *now_ms))
            .count() as u32
    }

    /// Timestamp of the last accepted step.
    pub fn last_step_ms(&self) -> Option<u64> {
        self.last_step_ms
    }
}
