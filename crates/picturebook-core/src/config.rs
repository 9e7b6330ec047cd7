//! Editor configuration.
//!
//! All pixel thresholds, tolerances and cadence settings live here so the
//! interaction engine never hardcodes a time threshold.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

use crate::error::{PictureBookError, Result};
use crate::geometry::TrackLayout;
use crate::limits;

/// Tunables for the timeline interaction engine and canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Pixel distance from an edge that starts a resize.
    pub edge_threshold_px: f64,
    /// Pixel distance within which boundaries snap to anchors.
    pub snap_threshold_px: f64,
    pub snap_enabled: bool,
    /// Minimum clip duration (seconds).
    pub min_duration: f64,
    /// Tolerance for "starts at or after" in ripple moves.
    pub ripple_epsilon: f64,
    /// Tolerance for "touching" edges in linked resize.
    pub link_epsilon: f64,
    /// Below this start displacement a drag is not reported as a move.
    pub moved_epsilon: f64,
    /// Total pointer travel (px) still treated as a click.
    pub click_slop_px: f64,
    /// Repaint cadence while dragging (milliseconds).
    pub repaint_interval_ms: u64,
    pub default_zoom: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
    /// Zoom multiplier per wheel step.
    pub wheel_zoom_base: f64,
    /// Left margin kept when auto-scrolling to the playhead.
    pub autoscroll_margin_px: f64,
    /// Reported duration of a timeline with no clips (seconds).
    pub empty_timeline_duration: f64,
    pub layout: TrackLayout,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            edge_threshold_px: limits::EDGE_THRESHOLD_PX,
            snap_threshold_px: limits::SNAP_THRESHOLD_PX,
            snap_enabled: true,
            min_duration: limits::MIN_DURATION,
            ripple_epsilon: limits::RIPPLE_EPSILON,
            link_epsilon: limits::LINK_EPSILON,
            moved_epsilon: 0.001,
            click_slop_px: 0.0,
            repaint_interval_ms: limits::REPAINT_INTERVAL_MS,
            default_zoom: 100.0,
            min_zoom: 20.0,
            max_zoom: 500.0,
            wheel_zoom_base: 1.1,
            autoscroll_margin_px: 20.0,
            empty_timeline_duration: 60.0,
            layout: TrackLayout::default(),
        }
    }
}

impl EditorConfig {
    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(data: &[u8]) -> Result<Self> {
        let config: Self = serde_json::from_slice(data)
            .map_err(|e| PictureBookError::Serialization(format!("Invalid config JSON: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(PictureBookError::NotFound(format!(
                "config file {}",
                path.display()
            )));
        }
        let data = std::fs::read(path)?;
        let config = Self::from_json(&data)?;
        info!(path = %path.display(), "Loaded editor config");
        Ok(config)
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<Vec<u8>> {
        serde_json::to_vec_pretty(self)
            .map_err(|e| PictureBookError::Serialization(format!("Failed to serialize config: {}", e)))
    }

    /// Reject values the interaction engine cannot work with.
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("edge_threshold_px", self.edge_threshold_px),
            ("snap_threshold_px", self.snap_threshold_px),
            ("min_duration", self.min_duration),
            ("default_zoom", self.default_zoom),
            ("min_zoom", self.min_zoom),
            ("max_zoom", self.max_zoom),
            ("wheel_zoom_base", self.wheel_zoom_base),
            ("layout.track_height", self.layout.track_height),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(PictureBookError::Config(format!(
                    "{} must be a positive number, got {}",
                    name, value
                )));
            }
        }
        let non_negative = [
            ("ripple_epsilon", self.ripple_epsilon),
            ("link_epsilon", self.link_epsilon),
            ("moved_epsilon", self.moved_epsilon),
            ("click_slop_px", self.click_slop_px),
            ("autoscroll_margin_px", self.autoscroll_margin_px),
            ("layout.header_height", self.layout.header_height),
            ("layout.track_padding", self.layout.track_padding),
        ];
        for (name, value) in non_negative {
            if value.is_nan() || value < 0.0 {
                return Err(PictureBookError::Config(format!(
                    "{} must not be negative, got {}",
                    name, value
                )));
            }
        }
        if self.min_zoom > self.max_zoom {
            return Err(PictureBookError::Config(format!(
                "min_zoom {} exceeds max_zoom {}",
                self.min_zoom, self.max_zoom
            )));
        }
        if self.repaint_interval_ms == 0 {
            return Err(PictureBookError::Config(
                "repaint_interval_ms must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Clamp a zoom level to the configured range.
    pub fn clamp_zoom(&self, zoom: f64) -> f64 {
        zoom.clamp(self.min_zoom, self.max_zoom)
    }
}
