//! Trim rules for clip edges, including linked boundaries.

use crate::clip::{Clip, ClipId};
use crate::edge::Edge;
use crate::timeline::Timeline;

/// Bounds a trimmed boundary must respect beyond the clip's own invariants.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrimLimits {
    pub min_duration: f64,
    /// Earliest allowed boundary time.
    pub floor: f64,
    /// Latest allowed boundary time.
    pub ceiling: f64,
}

impl TrimLimits {
    pub fn new(min_duration: f64) -> Self {
        Self {
            min_duration,
            floor: 0.0,
            ceiling: f64::INFINITY,
        }
    }

    /// Keep a linked neighbour at least `min_duration` long and inside its source.
    ///
    /// `neighbour` is the original state of the clip sharing the boundary.
    pub fn with_neighbour(mut self, edge: Edge, neighbour: &Clip) -> Self {
        match edge {
            Edge::Left => {
                self.floor = self.floor.max(neighbour.start + self.min_duration);
                if neighbour.kind.is_source_bounded() {
                    if let Some(window) = neighbour.kind.source() {
                        let room = window.source_length - window.offset;
                        self.ceiling = self.ceiling.min(neighbour.start + room);
                    }
                }
            }
            Edge::Right => {
                self.ceiling = self.ceiling.min(neighbour.end() - self.min_duration);
                if let Some(offset) = neighbour.offset() {
                    self.floor = self.floor.max(neighbour.start - offset);
                }
            }
        }
        self
    }
}

/// Move one edge of `clip` to `boundary`, starting from its `original` state.
///
/// The boundary is clamped so that `start >= 0`, `duration >= min_duration`,
/// offset-aware clips keep `offset >= 0`, and audio stays inside its source.
/// Returns the boundary actually applied.
pub fn apply_trim(
    clip: &mut Clip,
    original: &Clip,
    edge: Edge,
    boundary: f64,
    limits: &TrimLimits,
) -> f64 {
    match edge {
        Edge::Left => {
            let mut lower = limits.floor.max(0.0);
            if let Some(offset) = original.offset() {
                lower = lower.max(original.start - offset);
            }
            let upper = limits.ceiling.min(original.end() - limits.min_duration);
            let b = boundary.max(lower).min(upper);
            let delta = b - original.start;

            clip.start = b;
            clip.duration = original.duration - delta;
            if let (Some(orig), Some(window)) = (original.kind.source(), clip.kind.source_mut()) {
                window.offset = (orig.offset + delta).max(0.0);
            }
            b
        }
        Edge::Right => {
            let mut upper = limits.ceiling;
            if original.kind.is_source_bounded() {
                if let Some(window) = original.kind.source() {
                    upper = upper.min(original.start + window.source_length - window.offset);
                }
            }
            let lower = limits.floor.max(original.start + limits.min_duration);
            let b = boundary.min(upper).max(lower);

            clip.start = original.start;
            clip.duration = b - original.start;
            b
        }
    }
}

/// Find the clip sharing the boundary being trimmed.
///
/// For a left edge this is a clip whose right edge touches `primary.start`; for a
/// right edge, one whose left edge touches `primary.end()`. The nearest match
/// within `epsilon` wins.
pub fn find_linked(timeline: &Timeline, primary: &Clip, edge: Edge, epsilon: f64) -> Option<ClipId> {
    let mut best: Option<(ClipId, f64)> = None;
    for clip in timeline.clips() {
        if clip.id == primary.id || clip.track != primary.track {
            continue;
        }
        let dist = match edge {
            Edge::Left => (clip.end() - primary.start).abs(),
            Edge::Right => (clip.start - primary.end()).abs(),
        };
        if dist <= epsilon && best.map_or(true, |(_, d)| dist < d) {
            best = Some((clip.id, dist));
        }
    }
    best.map(|(id, _)| id)
}

/// Move the linked clip's shared edge to `boundary`, keeping its far edge fixed.
///
/// `edge` is the primary clip's edge. When the linked clip's left edge moves,
/// its source window slides by the same amount so its content stays put.
pub fn follow_boundary(linked: &mut Clip, original: &Clip, edge: Edge, boundary: f64) {
    match edge {
        Edge::Left => {
            linked.start = original.start;
            linked.duration = boundary - original.start;
        }
        Edge::Right => {
            let delta = boundary - original.start;
            linked.start = boundary;
            linked.duration = original.end() - boundary;
            if let (Some(orig), Some(window)) = (original.kind.source(), linked.kind.source_mut()) {
                window.offset = (orig.offset + delta).max(0.0);
            }
        }
    }
}
