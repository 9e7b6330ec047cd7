//! Waveform envelopes and the per-clip path cache.
//!
//! Envelopes cover a whole source. A clip shows the `[offset, offset + duration)`
//! window of its envelope, reduced to at most one sample per pixel of width.

use picturebook_timeline::{Clip, ClipId, ClipKind};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tiny_skia::{Path, PathBuilder};

/// Top inset of the waveform inside a lane.
const WAVE_TOP: f32 = 4.0;
/// Lane height not used by the waveform.
const WAVE_INSET: f32 = 6.0;
/// Peak amplitude as a fraction of the half-height.
const WAVE_GAIN: f32 = 0.9;

// ── Envelopes ───────────────────────────────────────────────────

/// Normalised peak amplitudes (0..1) of a whole audio source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaveformEnvelope {
    /// Peaks per second of source time.
    pub peaks_per_second: f64,
    pub peaks: Vec<f32>,
}

impl WaveformEnvelope {
    /// Create an envelope. Peaks are clamped to `0..=1`.
    pub fn new(peaks_per_second: f64, peaks: Vec<f32>) -> Self {
        Self {
            peaks_per_second,
            peaks: peaks.into_iter().map(|p| p.clamp(0.0, 1.0)).collect(),
        }
    }

    /// Reduce mono samples to absolute peaks at `peaks_per_second`.
    pub fn from_samples(samples: &[f32], sample_rate: u32, peaks_per_second: f64) -> Self {
        if samples.is_empty() || sample_rate == 0 || peaks_per_second <= 0.0 {
            return Self::new(peaks_per_second.max(0.0), Vec::new());
        }
        let block = ((sample_rate as f64 / peaks_per_second).round() as usize).max(1);
        let peaks = samples
            .chunks(block)
            .map(|chunk| chunk.iter().map(|s| s.abs()).fold(0.0f32, f32::max))
            .collect();
        Self::new(sample_rate as f64 / block as f64, peaks)
    }

    /// Peaks covering `[offset, offset + duration)` of the source.
    pub fn window(&self, offset: f64, duration: f64) -> &[f32] {
        if self.peaks_per_second <= 0.0 || duration <= 0.0 {
            return &[];
        }
        let len = self.peaks.len();
        let first = ((offset.max(0.0) * self.peaks_per_second).floor() as usize).min(len);
        let last = (((offset + duration) * self.peaks_per_second).ceil().max(0.0) as usize).min(len);
        &self.peaks[first..last.max(first)]
    }
}

/// Read access to decoded envelopes, keyed by clip.
pub trait WaveformSource {
    fn envelope(&self, clip: ClipId) -> Option<&WaveformEnvelope>;
}

/// Envelopes that have already crossed onto the control thread.
#[derive(Debug, Clone, Default)]
pub struct WaveformLibrary {
    envelopes: HashMap<ClipId, WaveformEnvelope>,
}

impl WaveformLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store an envelope, returning the one it replaced.
    pub fn insert(&mut self, clip: ClipId, envelope: WaveformEnvelope) -> Option<WaveformEnvelope> {
        self.envelopes.insert(clip, envelope)
    }

    pub fn remove(&mut self, clip: ClipId) -> Option<WaveformEnvelope> {
        self.envelopes.remove(&clip)
    }

    pub fn len(&self) -> usize {
        self.envelopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.envelopes.is_empty()
    }
}

impl WaveformSource for WaveformLibrary {
    fn envelope(&self, clip: ClipId) -> Option<&WaveformEnvelope> {
        self.envelopes.get(&clip)
    }
}

// ── Path cache ──────────────────────────────────────────────────

/// Everything a cached waveform path depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WaveformKey {
    pub clip_id: ClipId,
    /// Render width in whole pixels.
    pub width: u32,
    /// Render height in whole pixels.
    pub height: u32,
    offset_bits: u64,
    duration_bits: u64,
}

impl WaveformKey {
    /// Key for an audio clip drawn at `width` × `height`. `None` for other clip kinds.
    pub fn for_clip(clip: &Clip, width: f32, height: f32) -> Option<Self> {
        let ClipKind::Audio(window) = clip.kind else {
            return None;
        };
        Some(Self {
            clip_id: clip.id,
            width: width.max(0.0).floor() as u32,
            height: height.max(0.0).round() as u32,
            offset_bits: window.offset.to_bits(),
            duration_bits: clip.duration.to_bits(),
        })
    }

    pub fn offset(&self) -> f64 {
        f64::from_bits(self.offset_bits)
    }

    pub fn duration(&self) -> f64 {
        f64::from_bits(self.duration_bits)
    }
}

/// A built waveform outline in clip-local pixels (origin at the clip's top-left).
#[derive(Debug, Clone)]
pub struct WaveformPath {
    pub key: WaveformKey,
    pub path: Path,
    /// Amplitude samples used to build the outline.
    pub samples: usize,
    /// Baseline y in clip-local pixels.
    pub center_y: f32,
}

/// One cached path per audio clip, replaced whenever its key changes.
#[derive(Debug, Default)]
pub struct WaveformCache {
    entries: HashMap<ClipId, WaveformPath>,
    builds: u64,
}

impl WaveformCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached path for `clip`, rebuilding it if the key no longer matches.
    ///
    /// Returns `None` for non-audio clips, clips without an envelope, or
    /// windows too narrow to outline.
    pub fn get_or_build(
        &mut self,
        clip: &Clip,
        width: f32,
        height: f32,
        source: &dyn WaveformSource,
    ) -> Option<&WaveformPath> {
        let key = WaveformKey::for_clip(clip, width, height)?;
        let fresh = self.entries.get(&clip.id).is_some_and(|e| e.key == key);
        if !fresh {
            self.entries.remove(&clip.id);
            let envelope = source.envelope(clip.id)?;
            let window = envelope.window(key.offset(), key.duration());
            let (path, samples, center_y) = build_path(window, key.width, key.height)?;
            self.builds += 1;
            self.entries.insert(
                clip.id,
                WaveformPath {
                    key,
                    path,
                    samples,
                    center_y,
                },
            );
        }
        self.entries.get(&clip.id)
    }

    /// Cached entry without rebuilding.
    pub fn entry(&self, clip: ClipId) -> Option<&WaveformPath> {
        self.entries.get(&clip)
    }

    /// Whether the entry for `key.clip_id` was built for exactly `key`.
    pub fn is_current(&self, key: &WaveformKey) -> bool {
        self.entries.get(&key.clip_id).is_some_and(|e| e.key == *key)
    }

    /// Drop a clip's entry (new envelope data, clip removed).
    pub fn invalidate(&mut self, clip: ClipId) -> bool {
        self.entries.remove(&clip).is_some()
    }

    /// Drop entries for clips that no longer exist.
    pub fn retain_clips(&mut self, mut live: impl FnMut(ClipId) -> bool) {
        self.entries.retain(|id, _| live(*id));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total paths built over the cache's lifetime.
    pub fn builds(&self) -> u64 {
        self.builds
    }
}

/// Outline the window as a closed band: top edge left to right, bottom edge back.
///
/// Uses `min(window.len(), width)` samples. Returns the path, the sample count
/// and the baseline y.
fn build_path(window: &[f32], width: u32, height: u32) -> Option<(Path, usize, f32)> {
    let samples = window.len().min(width as usize);
    if samples < 2 {
        return None;
    }
    let width = width as f32;
    let wave_height = (height as f32 - WAVE_INSET).max(0.0);
    let center_y = WAVE_TOP + wave_height / 2.0;
    let scale = wave_height / 2.0 * WAVE_GAIN;
    let step = width / (samples - 1) as f32;

    let amplitude = |i: usize| window[i * window.len() / samples] * scale;

    let mut pb = PathBuilder::new();
    pb.move_to(0.0, center_y - amplitude(0));
    for i in 1..samples {
        pb.line_to(i as f32 * step, center_y - amplitude(i));
    }
    for i in (0..samples).rev() {
        pb.line_to(i as f32 * step, center_y + amplitude(i));
    }
    pb.close();

    Some((pb.finish()?, samples, center_y))
}
