//! Frame timing for simulation loops.
//!
//! The physics itself advances one fixed step per call, so the simulator
//! only needs a frame counter; hosts that drive frames from a display loop
//! can also read wall-clock elapsed time and a periodically refreshed FPS
//! figure for overlays.
//!
//! ```ignore
//! use pointfield::time::Time;
//!
//! let mut time = Time::new();
//! // In your render loop:
//! time.tick();
//! println!("frame {} at {:.1} fps", time.frame(), time.fps());
//! ```

use std::time::{Duration, Instant};

/// Frame counting and wall-clock timing.
#[derive(Debug)]
pub struct Time {
    start: Instant,
    frame_count: u64,
    fps: f32,
    fps_frame_count: u64,
    fps_update_time: Instant,
    fps_update_interval: Duration,
    paused: bool,
    pause_elapsed: Duration,
    pause_start: Option<Instant>,
}

impl Time {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start: now,
            frame_count: 0,
            fps: 0.0,
            fps_frame_count: 0,
            fps_update_time: now,
            fps_update_interval: Duration::from_millis(500),
            paused: false,
            pause_elapsed: Duration::ZERO,
            pause_start: None,
        }
    }

    /// Record one frame. Call once per simulation step; does nothing while
    /// paused.
    pub fn tick(&mut self) {
        if self.paused {
            return;
        }
        self.frame_count += 1;

        let now = Instant::now();
        let fps_elapsed = now.duration_since(self.fps_update_time);
        if fps_elapsed >= self.fps_update_interval {
            let frames_since = self.frame_count - self.fps_frame_count;
            self.fps = frames_since as f32 / fps_elapsed.as_secs_f32();
            self.fps_frame_count = self.frame_count;
            self.fps_update_time = now;
        }
    }

    /// Frames ticked since start.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    /// Wall-clock seconds since start, excluding time spent paused.
    pub fn elapsed(&self) -> f32 {
        let paused_extra = self
            .pause_start
            .map(|since| since.elapsed())
            .unwrap_or(Duration::ZERO);
        (self.start.elapsed() - self.pause_elapsed - paused_extra).as_secs_f32()
    }

    /// Frames per second, refreshed twice a second.
    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Stop the frame counter and the elapsed clock.
    pub fn pause(&mut self) {
        if !self.paused {
            self.paused = true;
            self.pause_start = Some(Instant::now());
        }
    }

    /// Resume after [`pause`](Self::pause).
    pub fn resume(&mut self) {
        if self.paused {
            if let Some(since) = self.pause_start.take() {
                self.pause_elapsed += since.elapsed();
            }
            self.fps_update_time = Instant::now();
            self.paused = false;
        }
    }

    /// Reset to a freshly constructed state.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}
