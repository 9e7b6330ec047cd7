//! Repaint throttling for pointer interaction.
//!
//! Moves only mark work as pending. A single timer, armed while work is
//! pending, fires at a fixed interval and hands back one [`FrameWork`]. The
//! caller supplies the clock so the schedule can be driven deterministically.

use picturebook_timeline::ClipId;
use std::time::{Duration, Instant};

/// Deferred work released by one timer fire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameWork {
    /// Clip whose waveform must be regenerated before the repaint.
    pub waveform_clip: Option<ClipId>,
}

/// Coalesces pointer moves into at most one repaint per interval.
#[derive(Debug, Clone)]
pub struct UpdateThrottle {
    interval: Duration,
    pending: bool,
    pending_waveform: Option<ClipId>,
    deadline: Option<Instant>,
}

impl UpdateThrottle {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            pending: false,
            pending_waveform: None,
            deadline: None,
        }
    }

    pub fn from_millis(ms: u64) -> Self {
        Self::new(Duration::from_millis(ms))
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Record pending work and arm the timer if it is not already running.
    pub fn schedule(&mut self, now: Instant, waveform_clip: Option<ClipId>) {
        self.pending = true;
        if waveform_clip.is_some() {
            self.pending_waveform = waveform_clip;
        }
        if self.deadline.is_none() {
            self.deadline = Some(now + self.interval);
        }
    }

    /// Fire the timer if its deadline has passed.
    pub fn poll(&mut self, now: Instant) -> Option<FrameWork> {
        match self.deadline {
            Some(deadline) if now >= deadline => self.fire(),
            _ => None,
        }
    }

    /// Force any pending fire immediately.
    pub fn flush(&mut self) -> Option<FrameWork> {
        self.fire()
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// When the armed timer will fire.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.deadline
    }

    fn fire(&mut self) -> Option<FrameWork> {
        self.deadline = None;
        if !std::mem::take(&mut self.pending) {
            return None;
        }
        Some(FrameWork {
            waveform_clip: self.pending_waveform.take(),
        })
    }
}

impl Default for UpdateThrottle {
    fn default() -> Self {
        Self::from_millis(picturebook_core::limits::REPAINT_INTERVAL_MS)
    }
}
