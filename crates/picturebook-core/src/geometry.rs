//! Time ↔ pixel mapping and lane layout.
//!
//! Every component that reasons in pixels (edge grabbing, snapping, culling)
//! goes through [`Viewport`] rather than carrying its own time thresholds, so
//! the perceived feel of the editor stays constant across zoom levels.

use serde::{Deserialize, Serialize};

/// Pointer position in logical pixels, relative to the canvas origin.
pub type Point = glam::DVec2;

/// Horizontal view onto the timeline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Pixels per second.
    pub zoom: f64,
    /// Timeline time shown at pixel 0 (seconds).
    pub scroll_offset: f64,
}

impl Viewport {
    /// Create a viewport.
    pub fn new(zoom: f64, scroll_offset: f64) -> Self {
        Self {
            zoom,
            scroll_offset,
        }
    }

    /// Convert timeline time (seconds) to an x coordinate.
    #[inline]
    pub fn time_to_x(&self, time: f64) -> f64 {
        (time - self.scroll_offset) * self.zoom
    }

    /// Convert an x coordinate to timeline time (seconds).
    #[inline]
    pub fn x_to_time(&self, x: f64) -> f64 {
        if self.zoom <= 0.0 {
            return self.scroll_offset;
        }
        x / self.zoom + self.scroll_offset
    }

    /// Convert a pixel distance to a time distance.
    ///
    /// Returns 0 for a degenerate zoom so that thresholds disable themselves.
    #[inline]
    pub fn px_to_time(&self, px: f64) -> f64 {
        if self.zoom <= 0.0 {
            return 0.0;
        }
        px / self.zoom
    }

    /// Convert a time distance to a pixel distance.
    #[inline]
    pub fn time_to_px(&self, duration: f64) -> f64 {
        duration * self.zoom
    }

    /// Time window `[x_to_time(0), x_to_time(width)]` visible in a surface of `width` pixels.
    pub fn visible_range(&self, width: f64) -> (f64, f64) {
        (self.x_to_time(0.0), self.x_to_time(width))
    }

    /// Change zoom while keeping the time under `anchor_x` at the same pixel.
    pub fn zoom_around(&mut self, anchor_x: f64, new_zoom: f64) {
        if new_zoom <= 0.0 {
            return;
        }
        let anchor_time = self.x_to_time(anchor_x);
        self.zoom = new_zoom;
        self.scroll_offset = anchor_time - anchor_x / new_zoom;
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(100.0, 0.0)
    }
}

/// Vertical arrangement of the ruler band and track lanes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackLayout {
    /// Height of the ruler/header band at the top.
    pub header_height: f64,
    /// Height of one lane.
    pub track_height: f64,
    /// Gap between lanes.
    pub track_padding: f64,
}

impl TrackLayout {
    /// Top y coordinate of a track lane.
    #[inline]
    pub fn track_y(&self, track: u32) -> f64 {
        self.header_height + track as f64 * (self.track_height + self.track_padding)
    }

    /// True when `y` falls in the ruler band.
    #[inline]
    pub fn is_header(&self, y: f64) -> bool {
        y < self.header_height
    }

    /// Resolve a y coordinate to the lane whose band contains it.
    ///
    /// The padding between lanes belongs to no track.
    pub fn track_at_y(&self, y: f64) -> Option<u32> {
        if y < self.header_height {
            return None;
        }
        let pitch = self.track_height + self.track_padding;
        if pitch <= 0.0 {
            return None;
        }
        let rel = y - self.header_height;
        let track = (rel / pitch).floor();
        if rel - track * pitch > self.track_height {
            return None;
        }
        Some(track as u32)
    }
}

impl Default for TrackLayout {
    fn default() -> Self {
        Self {
            header_height: 25.0,
            track_height: 50.0,
            track_padding: 5.0,
        }
    }
}
