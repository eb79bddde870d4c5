//! Optional diagnostics collector
//!
//! Installed into the engine with `Engine::with_diagnostics`. Keeps a rolling
//! window of engine events and tick durations. When no collector is installed
//! the engine only emits `log` records.

use std::collections::VecDeque;
use std::time::Duration;

/// Maximum events kept in the rolling log
pub const MAX_EVENTS: usize = 100;
/// Maximum tick duration samples kept
pub const MAX_STEP_SAMPLES: usize = 60;

/// A recorded engine event
#[derive(Debug, Clone, PartialEq)]
pub struct DiagnosticEvent {
    /// Host frame time when the event happened (ms)
    pub at_ms: f64,
    pub message: String,
}

/// Summary over the retained tick durations
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StepTiming {
    pub avg: Duration,
    pub min: Duration,
    pub max: Duration,
    pub samples: usize,
}

#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    events: VecDeque<DiagnosticEvent>,
    step_times: VecDeque<Duration>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self {
            events: VecDeque::with_capacity(MAX_EVENTS),
            step_times: VecDeque::with_capacity(MAX_STEP_SAMPLES),
        }
    }

    pub fn record_event(&mut self, at_ms: f64, message: String) {
        self.events.push_back(DiagnosticEvent { at_ms, message });
        while self.events.len() > MAX_EVENTS {
            self.events.pop_front();
        }
    }

    pub fn record_step(&mut self, duration: Duration) {
        self.step_times.push_back(duration);
        while self.step_times.len() > MAX_STEP_SAMPLES {
            self.step_times.pop_front();
        }
    }

    /// Events oldest first
    pub fn events(&self) -> impl Iterator<Item = &DiagnosticEvent> {
        self.events.iter()
    }

    /// Most recent `n` events, oldest first
    pub fn recent_events(&self, n: usize) -> Vec<&DiagnosticEvent> {
        let skip = self.events.len().saturating_sub(n);
        self.events.iter().skip(skip).collect()
    }

    /// Whether any retained event contains `needle`
    pub fn saw(&self, needle: &str) -> bool {
        self.events.iter().any(|e| e.message.contains(needle))
    }

    pub fn clear_events(&mut self) {
        self.events.clear();
    }

    pub fn step_timing(&self) -> StepTiming {
        let samples = self.step_times.len();
        if samples == 0 {
            return StepTiming::default();
        }
        let total: Duration = self.step_times.iter().sum();
        StepTiming {
            avg: total / samples as u32,
            min: self.step_times.iter().copied().min().unwrap_or_default(),
            max: self.step_times.iter().copied().max().unwrap_or_default(),
            samples,
        }
    }
}
