//! Frame timing.
//!
//! Produces the delta time handed to `GameState::update`, either measured
//! against the wall clock or fixed for headless runs.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Frame timing manager.
#[derive(Debug)]
pub struct FrameClock {
    /// Time budget per frame
    frame_budget: Duration,
    /// Time of last frame start
    last_frame: Instant,
    /// Maximum delta time to prevent spiral of death
    max_dt: f32,
    /// Measure real time instead of reporting the frame budget
    realtime: bool,
    /// Recent frame times for averaging
    frame_times: VecDeque<f32>,
    /// Maximum samples for averaging
    max_samples: usize,
}

impl FrameClock {
    /// Create a new frame clock.
    ///
    /// # Arguments
    /// * `target_fps` - Target frames per second
    /// * `realtime` - Measure and pace against the wall clock
    #[must_use]
    pub fn new(target_fps: u32, realtime: bool) -> Self {
        let target_fps = target_fps.max(1);
        Self {
            frame_budget: Duration::from_secs_f64(1.0 / f64::from(target_fps)),
            last_frame: Instant::now(),
            max_dt: 0.25, // Max 250ms delta
            realtime,
            frame_times: VecDeque::with_capacity(120),
            max_samples: 120,
        }
    }

    /// Delta time since the last frame.
    ///
    /// Headless clocks always report exactly one frame budget.
    pub fn delta_time(&mut self) -> f32 {
        let dt = if self.realtime {
            let now = Instant::now();
            let dt = (now - self.last_frame).as_secs_f32();
            self.last_frame = now;
            dt.min(self.max_dt)
        } else {
            self.frame_budget.as_secs_f32()
        };

        self.frame_times.push_back(dt);
        if self.frame_times.len() > self.max_samples {
            self.frame_times.pop_front();
        }
        dt
    }

    /// Sleep for the remainder of the frame budget (realtime only).
    pub fn sleep_remainder(&self) {
        if !self.realtime {
            return;
        }

        let elapsed = self.last_frame.elapsed();
        if elapsed < self.frame_budget {
            std::thread::sleep(self.frame_budget - elapsed);
        }
    }

    /// Get the current FPS (averaged over recent frames).
    #[must_use]
    pub fn current_fps(&self) -> f32 {
        if self.frame_times.is_empty() {
            return 0.0;
        }

        let avg_frame_time: f32 =
            self.frame_times.iter().sum::<f32>() / self.frame_times.len() as f32;

        if avg_frame_time > 0.0 {
            1.0 / avg_frame_time
        } else {
            0.0
        }
    }

    /// Reset timing (call after pause or loading).
    pub fn reset(&mut self) {
        self.last_frame = Instant::now();
        self.frame_times.clear();
    }
}
