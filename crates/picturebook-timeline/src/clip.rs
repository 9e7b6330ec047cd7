//! Clip types for the timeline.

use picturebook_core::Color;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Stable clip identity. Survives every mutation the editor performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ClipId(Uuid);

impl ClipId {
    /// Generate a fresh random id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Build a deterministic id (fixtures, replays).
    pub const fn from_u128(value: u128) -> Self {
        Self(Uuid::from_u128(value))
    }
}

impl Default for ClipId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ClipId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Window into the source media of an offset-aware clip.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SourceWindow {
    /// Position in the source media where the clip begins (seconds).
    pub offset: f64,
    /// Total length of the source media (seconds).
    pub source_length: f64,
}

/// What a clip shows, plus the per-type trimming data.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ClipKind {
    Audio(SourceWindow),
    Subtitle(SourceWindow),
    Image,
}

impl ClipKind {
    /// Right-edge trims are capped by the source length.
    pub fn is_source_bounded(&self) -> bool {
        matches!(self, Self::Audio(_))
    }

    pub fn source(&self) -> Option<&SourceWindow> {
        match self {
            Self::Audio(window) | Self::Subtitle(window) => Some(window),
            Self::Image => None,
        }
    }

    pub fn source_mut(&mut self) -> Option<&mut SourceWindow> {
        match self {
            Self::Audio(window) | Self::Subtitle(window) => Some(window),
            Self::Image => None,
        }
    }
}

/// A time-bounded unit on a track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clip {
    pub id: ClipId,
    /// Display label (speaker line, subtitle text, image name).
    pub label: String,
    /// Lane index, 0 at the top.
    pub track: u32,
    /// Timeline position (seconds).
    pub start: f64,
    /// Length on the timeline (seconds).
    pub duration: f64,
    pub kind: ClipKind,
    pub color: Color,
}

impl Clip {
    /// Create an audio clip playing `[offset, offset + duration)` of its source.
    pub fn audio(
        label: impl Into<String>,
        track: u32,
        start: f64,
        duration: f64,
        offset: f64,
        source_length: f64,
    ) -> Self {
        Self::with_kind(
            label,
            track,
            start,
            duration,
            ClipKind::Audio(SourceWindow {
                offset,
                source_length,
            }),
        )
    }

    /// Create a subtitle clip.
    pub fn subtitle(
        label: impl Into<String>,
        track: u32,
        start: f64,
        duration: f64,
        offset: f64,
        source_length: f64,
    ) -> Self {
        Self::with_kind(
            label,
            track,
            start,
            duration,
            ClipKind::Subtitle(SourceWindow {
                offset,
                source_length,
            }),
        )
    }

    /// Create an image clip.
    pub fn image(label: impl Into<String>, track: u32, start: f64, duration: f64) -> Self {
        Self::with_kind(label, track, start, duration, ClipKind::Image)
    }

    fn with_kind(
        label: impl Into<String>,
        track: u32,
        start: f64,
        duration: f64,
        kind: ClipKind,
    ) -> Self {
        let label = label.into();
        let color = Color::for_label(&label);
        Self {
            id: ClipId::new(),
            label,
            track,
            start,
            duration,
            kind,
            color,
        }
    }

    /// Replace the generated id.
    pub fn with_id(mut self, id: ClipId) -> Self {
        self.id = id;
        self
    }

    /// Timeline end position.
    #[inline]
    pub fn end(&self) -> f64 {
        self.start + self.duration
    }

    /// Whether `time` lies in `[start, end)`.
    #[inline]
    pub fn contains(&self, time: f64) -> bool {
        time >= self.start && time < self.end()
    }

    /// Source offset for offset-aware clips.
    pub fn offset(&self) -> Option<f64> {
        self.kind.source().map(|w| w.offset)
    }

    /// End position in the source media (offset + duration).
    pub fn source_end(&self) -> Option<f64> {
        self.offset().map(|offset| offset + self.duration)
    }

    /// The fields the editor mutates.
    pub fn fields(&self) -> ClipFields {
        ClipFields {
            track: self.track,
            start: self.start,
            duration: self.duration,
            offset: self.offset(),
        }
    }

    /// Overwrite the editable fields. An offset is ignored on clips without a source window.
    pub fn apply_fields(&mut self, fields: &ClipFields) {
        self.track = fields.track;
        self.start = fields.start;
        self.duration = fields.duration;
        if let (Some(offset), Some(window)) = (fields.offset, self.kind.source_mut()) {
            window.offset = offset;
        }
    }
}

/// Editable geometry of a clip, as recorded in undo commands.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClipFields {
    pub track: u32,
    pub start: f64,
    pub duration: f64,
    pub offset: Option<f64>,
}
