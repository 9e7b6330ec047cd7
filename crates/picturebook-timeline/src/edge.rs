//! Resize affordance: nearest grabbable clip boundary under the cursor.

use std::cmp::Ordering;

use crate::clip::ClipId;
use crate::timeline::Timeline;

/// Distances closer than this are treated as equal.
const DISTANCE_TIE: f64 = 1e-9;

/// Which boundary of a clip is being grabbed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Edge {
    Left,
    Right,
}

/// A boundary within the grab threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeHit {
    pub clip_id: ClipId,
    pub edge: Edge,
    /// Boundary time (seconds).
    pub time: f64,
    /// Distance from the cursor (seconds).
    pub distance: f64,
    inside: bool,
    draw_index: usize,
}

impl EdgeHit {
    /// Whether the cursor lies inside the clip that owns this edge.
    pub fn is_inside(&self) -> bool {
        self.inside
    }

    /// Ranking: nearer first, then inside-bias, then topmost, then left edge.
    fn rank(&self, other: &Self) -> Ordering {
        let by_distance = if (self.distance - other.distance).abs() <= DISTANCE_TIE {
            Ordering::Equal
        } else {
            self.distance.total_cmp(&other.distance)
        };
        by_distance
            .then_with(|| other.inside.cmp(&self.inside))
            .then_with(|| other.draw_index.cmp(&self.draw_index))
            .then_with(|| match (self.edge, other.edge) {
                (Edge::Left, Edge::Right) => Ordering::Less,
                (Edge::Right, Edge::Left) => Ordering::Greater,
                _ => Ordering::Equal,
            })
    }
}

/// Find the best edge within `threshold` seconds of `time`.
///
/// `track = None` considers clips on every track.
pub fn find_edge(
    timeline: &Timeline,
    time: f64,
    track: Option<u32>,
    threshold: f64,
) -> Option<EdgeHit> {
    if threshold <= 0.0 {
        return None;
    }
    let mut best: Option<EdgeHit> = None;
    for (draw_index, clip) in timeline.clips().iter().enumerate() {
        if track.map_or(false, |t| clip.track != t) {
            continue;
        }
        let inside = clip.contains(time);
        for (edge, at) in [(Edge::Left, clip.start), (Edge::Right, clip.end())] {
            let distance = (time - at).abs();
            if distance > threshold {
                continue;
            }
            let hit = EdgeHit {
                clip_id: clip.id,
                edge,
                time: at,
                distance,
                inside,
                draw_index,
            };
            if best.map_or(true, |b| hit.rank(&b) == Ordering::Less) {
                best = Some(hit);
            }
        }
    }
    best
}
