//! Snap resolver for drags and trims.

use picturebook_core::Viewport;

use crate::clip::ClipId;
use crate::timeline::Timeline;

/// A time a moving boundary can be pulled toward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapPoint {
    pub time: f64,
    pub kind: SnapKind,
}

/// Kind of snap anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapKind {
    Origin,
    Playhead,
    ClipStart,
    ClipEnd,
}

/// Outcome of snapping a moved clip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnappedMove {
    /// Start after snapping (not yet clamped).
    pub start: f64,
    /// The anchor that captured the clip, if any.
    pub anchor: Option<SnapPoint>,
}

/// Computes snap targets with a zoom-relative threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapResolver {
    pub enabled: bool,
    /// Snap distance in pixels (divided by zoom).
    pub snap_distance_px: f64,
}

impl SnapResolver {
    pub fn new(snap_distance_px: f64) -> Self {
        Self {
            enabled: true,
            snap_distance_px,
        }
    }

    /// Threshold in seconds at the given viewport.
    pub fn threshold(&self, viewport: &Viewport) -> f64 {
        viewport.px_to_time(self.snap_distance_px)
    }

    /// Collect anchors: time 0, the playhead, and both edges of every clip not in `exclude`.
    pub fn collect_anchors(timeline: &Timeline, exclude: &[ClipId]) -> Vec<SnapPoint> {
        let mut points = Vec::with_capacity(2 + timeline.len() * 2);

        points.push(SnapPoint {
            time: 0.0,
            kind: SnapKind::Origin,
        });
        points.push(SnapPoint {
            time: timeline.playhead,
            kind: SnapKind::Playhead,
        });

        for clip in timeline.clips() {
            if exclude.contains(&clip.id) {
                continue;
            }
            points.push(SnapPoint {
                time: clip.start,
                kind: SnapKind::ClipStart,
            });
            points.push(SnapPoint {
                time: clip.end(),
                kind: SnapKind::ClipEnd,
            });
        }

        points
    }

    /// Nearest anchor within `threshold` seconds of `time`. Earlier anchors win ties.
    pub fn find_snap(&self, time: f64, anchors: &[SnapPoint], threshold: f64) -> Option<SnapPoint> {
        if !self.enabled || threshold <= 0.0 {
            return None;
        }

        let mut best: Option<(SnapPoint, f64)> = None;
        for sp in anchors {
            let dist = (sp.time - time).abs();
            if dist <= threshold && best.map_or(true, |(_, d)| dist < d) {
                best = Some((*sp, dist));
            }
        }
        best.map(|(sp, _)| sp)
    }

    /// Snap a moving clip: try its start, and only if that misses, its end.
    pub fn snap_move(
        &self,
        start: f64,
        duration: f64,
        anchors: &[SnapPoint],
        threshold: f64,
    ) -> SnappedMove {
        if let Some(sp) = self.find_snap(start, anchors, threshold) {
            return SnappedMove {
                start: sp.time,
                anchor: Some(sp),
            };
        }
        if let Some(sp) = self.find_snap(start + duration, anchors, threshold) {
            return SnappedMove {
                start: sp.time - duration,
                anchor: Some(sp),
            };
        }
        SnappedMove {
            start,
            anchor: None,
        }
    }
}

impl Default for SnapResolver {
    fn default() -> Self {
        Self::new(picturebook_core::limits::SNAP_THRESHOLD_PX)
    }
}
