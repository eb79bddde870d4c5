//! Fixed timestep scheduling
//!
//! The host calls into the engine once per display frame. [`FrameLoop`] turns
//! those irregular calls into whole simulation steps: elapsed time is clamped,
//! accumulated, and drained in steps of the current tick interval.
//! Starting the loop hands out a [`LoopHandle`]; only that handle stops it.

use crate::consts::MAX_FRAME_DELTA_MS;

/// Token for a running tick loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LoopHandle(u64);

/// Token for a running countdown timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

/// Monotonic source of scheduling tokens
#[derive(Debug, Clone, Default)]
pub struct HandleSource {
    next: u64,
}

impl HandleSource {
    fn bump(&mut self) -> u64 {
        self.next += 1;
        self.next
    }

    pub fn next_loop(&mut self) -> LoopHandle {
        LoopHandle(self.bump())
    }

    pub fn next_timer(&mut self) -> TimerHandle {
        TimerHandle(self.bump())
    }
}

#[derive(Debug, Clone, Default)]
pub struct FrameLoop {
    active: Option<LoopHandle>,
    handles: HandleSource,
    /// Undrained simulation time (ms)
    accumulator_ms: f64,
    /// Host timestamp of the previous frame (ms)
    last_frame_ms: Option<f64>,
}

impl FrameLoop {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start the loop. Returns `None` when it is already running.
    pub fn start(&mut self) -> Option<LoopHandle> {
        if self.active.is_some() {
            return None;
        }
        let handle = self.handles.next_loop();
        self.active = Some(handle);
        self.accumulator_ms = 0.0;
        self.last_frame_ms = None;
        Some(handle)
    }

    /// Stop the loop if `handle` is the one running it
    pub fn cancel(&mut self, handle: LoopHandle) -> bool {
        if self.active == Some(handle) {
            self.active = None;
            self.accumulator_ms = 0.0;
            true
        } else {
            false
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn last_frame_ms(&self) -> Option<f64> {
        self.last_frame_ms
    }

    pub fn accumulator_ms(&self) -> f64 {
        self.accumulator_ms
    }

    /// Record a frame at `now_ms` and return the clamped elapsed time.
    ///
    /// The first frame after a start only sets the baseline. Time is added to
    /// the accumulator only while the loop is active.
    pub fn begin_frame(&mut self, now_ms: f64) -> f64 {
        let delta = match self.last_frame_ms {
            Some(last) => (now_ms - last).clamp(0.0, MAX_FRAME_DELTA_MS),
            None => 0.0,
        };
        self.last_frame_ms = Some(now_ms);
        if self.active.is_some() {
            self.accumulator_ms += delta;
        }
        delta
    }

    /// Take one step of `step_ms` from the accumulator if enough is stored
    pub fn consume_step(&mut self, step_ms: f64) -> bool {
        if self.active.is_none() || step_ms <= 0.0 || self.accumulator_ms < step_ms {
            return false;
        }
        self.accumulator_ms -= step_ms;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_returns_single_handle() {
        let mut frame_loop = FrameLoop::new();
        let handle = frame_loop.start().unwrap();
        assert!(frame_loop.is_active());
        assert!(frame_loop.start().is_none());

        assert!(!frame_loop.cancel(LoopHandle(handle.0 + 100)));
        assert!(frame_loop.cancel(handle));
        assert!(!frame_loop.is_active());
        assert!(!frame_loop.cancel(handle));
    }

    #[test]
    fn test_restart_issues_fresh_handle() {
        let mut frame_loop = FrameLoop::new();
        let first = frame_loop.start().unwrap();
        frame_loop.cancel(first);
        let second = frame_loop.start().unwrap();
        assert_ne!(first, second);
        assert!(!frame_loop.cancel(first));
        assert!(frame_loop.is_active());
    }

    #[test]
    fn test_first_frame_sets_baseline() {
        let mut frame_loop = FrameLoop::new();
        frame_loop.start();
        assert_eq!(frame_loop.begin_frame(1000.0), 0.0);
        assert_eq!(frame_loop.begin_frame(1016.0), 16.0);
        assert_eq!(frame_loop.accumulator_ms(), 16.0);
    }

    #[test]
    fn test_delta_clamped() {
        let mut frame_loop = FrameLoop::new();
        frame_loop.start();
        frame_loop.begin_frame(0.0);
        assert_eq!(frame_loop.begin_frame(10_000.0), MAX_FRAME_DELTA_MS);
        assert_eq!(frame_loop.accumulator_ms(), MAX_FRAME_DELTA_MS);
        // Clock going backwards contributes nothing
        assert_eq!(frame_loop.begin_frame(9_000.0), 0.0);
    }

    #[test]
    fn test_drain_fixed_steps() {
        let mut frame_loop = FrameLoop::new();
        frame_loop.start();
        frame_loop.begin_frame(0.0);
        frame_loop.begin_frame(400.0);

        let mut steps = 0;
        while frame_loop.consume_step(150.0) {
            steps += 1;
        }
        assert_eq!(steps, 2);
        assert_eq!(frame_loop.accumulator_ms(), 100.0);
    }

    #[test]
    fn test_inactive_loop_accrues_nothing() {
        let mut frame_loop = FrameLoop::new();
        frame_loop.begin_frame(0.0);
        assert_eq!(frame_loop.begin_frame(200.0), 200.0);
        assert_eq!(frame_loop.accumulator_ms(), 0.0);
        assert!(!frame_loop.consume_step(100.0));
    }

    #[test]
    fn test_start_resets_accumulator_and_baseline() {
        let mut frame_loop = FrameLoop::new();
        let handle = frame_loop.start().unwrap();
        frame_loop.begin_frame(0.0);
        frame_loop.begin_frame(120.0);
        frame_loop.cancel(handle);

        frame_loop.start();
        assert_eq!(frame_loop.accumulator_ms(), 0.0);
        assert_eq!(frame_loop.begin_frame(5_000.0), 0.0);
    }
}
