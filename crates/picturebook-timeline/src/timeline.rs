//! The clip arena.
//!
//! Clips live in one vector in draw order (earliest added first, drawn at the
//! bottom). Tracks are a derived view: per-track order is by `start` and is
//! recomputed on demand after mutation rather than stored.

use picturebook_core::Viewport;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::clip::{Clip, ClipId};

/// Ranges closer than this do not count as overlapping.
const OVERLAP_TOLERANCE: f64 = 1e-9;

/// All clips plus the view state the interaction rules read.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Timeline {
    clips: Vec<Clip>,
    /// Current playhead time (seconds).
    pub playhead: f64,
    pub viewport: Viewport,
}

impl Timeline {
    /// Create an empty timeline.
    pub fn new(viewport: Viewport) -> Self {
        Self {
            clips: Vec::new(),
            playhead: 0.0,
            viewport,
        }
    }

    /// Clips in draw order.
    pub fn clips(&self) -> &[Clip] {
        &self.clips
    }

    pub fn len(&self) -> usize {
        self.clips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }

    /// Add a clip on top of the draw order.
    pub fn add_clip(&mut self, clip: Clip) -> ClipId {
        let id = clip.id;
        self.clips.push(clip);
        id
    }

    /// Replace every clip. The given order becomes the draw order.
    pub fn set_clips(&mut self, clips: Vec<Clip>) {
        self.clips = clips;
    }

    /// Remove a clip by id.
    pub fn remove_clip(&mut self, id: ClipId) -> Option<Clip> {
        let index = self.draw_index(id)?;
        Some(self.clips.remove(index))
    }

    pub fn get(&self, id: ClipId) -> Option<&Clip> {
        self.clips.iter().find(|clip| clip.id == id)
    }

    pub fn get_mut(&mut self, id: ClipId) -> Option<&mut Clip> {
        self.clips.iter_mut().find(|clip| clip.id == id)
    }

    /// Position of a clip in draw order (higher is drawn later, on top).
    pub fn draw_index(&self, id: ClipId) -> Option<usize> {
        self.clips.iter().position(|clip| clip.id == id)
    }

    /// Clips of one track, ordered by start.
    pub fn track_clips(&self, track: u32) -> Vec<&Clip> {
        let mut clips: Vec<&Clip> = self.clips.iter().filter(|c| c.track == track).collect();
        clips.sort_by(|a, b| a.start.total_cmp(&b.start));
        clips
    }

    /// Track → clips ordered by start.
    pub fn tracks(&self) -> BTreeMap<u32, Vec<&Clip>> {
        let mut tracks: BTreeMap<u32, Vec<&Clip>> = BTreeMap::new();
        for clip in &self.clips {
            tracks.entry(clip.track).or_default().push(clip);
        }
        for clips in tracks.values_mut() {
            clips.sort_by(|a, b| a.start.total_cmp(&b.start));
        }
        tracks
    }

    /// Latest clip end, or `empty_default` when there are no clips.
    pub fn total_duration(&self, empty_default: f64) -> f64 {
        self.clips
            .iter()
            .map(Clip::end)
            .reduce(f64::max)
            .unwrap_or(empty_default)
    }

    /// Move the playhead, floored at 0.
    pub fn set_playhead(&mut self, time: f64) {
        self.playhead = time.max(0.0);
    }

    /// Same-track clip pairs whose ranges intersect.
    pub fn overlaps(&self) -> Vec<(ClipId, ClipId)> {
        let mut pairs = Vec::new();
        for clips in self.tracks().values() {
            for (i, a) in clips.iter().enumerate() {
                for b in &clips[i + 1..] {
                    if b.start >= a.end() - OVERLAP_TOLERANCE {
                        break;
                    }
                    pairs.push((a.id, b.id));
                }
            }
        }
        pairs
    }

    /// Pack every track's clips from 0 with a uniform gap, keeping per-track order.
    pub fn relayout_with_gap(&mut self, gap: f64) {
        let gap = gap.max(0.0);
        let order: Vec<Vec<ClipId>> = self
            .tracks()
            .into_values()
            .map(|clips| clips.iter().map(|c| c.id).collect())
            .collect();
        for ids in order {
            let mut cursor = 0.0;
            for id in ids {
                if let Some(clip) = self.get_mut(id) {
                    clip.start = cursor;
                    cursor = clip.end() + gap;
                }
            }
        }
    }
}
