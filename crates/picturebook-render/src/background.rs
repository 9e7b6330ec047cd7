//! Rasterising the static part of the timeline.

use picturebook_core::{Color, TrackLayout};
use picturebook_timeline::{ClipId, Timeline};
use tiny_skia::{FillRule, PathBuilder, Pixmap, Rect, Stroke, Transform};
use tracing::trace;

use crate::solid;
use crate::surface::BackgroundSurface;
use crate::waveform::{WaveformCache, WaveformSource};

/// Colors used by the background and overlays.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub background: Color,
    pub header: Color,
    pub grid: Color,
    pub playhead: Color,
    pub selection: Color,
    pub overlap: Color,
    pub snap: Color,
    pub wave_center: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: Color::from_hex(0x1E1E1E),
            header: Color::from_hex(0x2D2D2D),
            grid: Color::from_hex(0x333333),
            playhead: Color::from_hex(0xFF4444),
            selection: Color::WHITE,
            overlap: Color::from_hex(0xFF4444).with_alpha(90),
            snap: Color::WHITE.with_alpha(100),
            wave_center: Color::WHITE.with_alpha(30),
        }
    }
}

/// Everything the background depends on.
#[derive(Debug, Clone, Copy)]
pub struct Scene<'a> {
    pub timeline: &'a Timeline,
    pub layout: &'a TrackLayout,
    pub selection: Option<ClipId>,
    /// Same-track clip pairs to highlight.
    pub overlaps: &'a [(ClipId, ClipId)],
}

/// Counters from one background pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrawStats {
    pub clips_drawn: usize,
    pub clips_culled: usize,
    pub waveforms_drawn: usize,
    pub overlaps_drawn: usize,
}

/// Draw fill, ruler band, second grid, visible clips with their waveforms,
/// overlap highlights and the selection outline.
///
/// Clips entirely outside the visible time window are skipped.
pub fn draw_background(
    surface: &mut BackgroundSurface,
    scene: &Scene<'_>,
    palette: &Palette,
    waveforms: &mut WaveformCache,
    source: &dyn WaveformSource,
) -> DrawStats {
    let (width, height) = surface.logical_size();
    let ts = surface.transform();
    let viewport = scene.timeline.viewport;
    let layout = scene.layout;
    let header = layout.header_height as f32;
    let pixmap = surface.pixmap_mut();
    let mut stats = DrawStats::default();

    pixmap.fill(skia_color(palette.background));

    // Ruler band and grid
    fill_rect(pixmap, 0.0, 0.0, width, header, palette.header, ts);
    fill_rect(pixmap, 0.0, header, width, 1.0, palette.grid, ts);

    let (t0, t1) = viewport.visible_range(width as f64);
    let first = t0.max(0.0).floor() as i64;
    let last = t1.floor() as i64;
    for second in first..=last {
        let x = viewport.time_to_x(second as f64) as f32;
        fill_rect(pixmap, x, header, 1.0, height - header, palette.grid, ts);
    }

    // Clips
    for clip in scene.timeline.clips() {
        if clip.end() < t0 || clip.start > t1 {
            stats.clips_culled += 1;
            continue;
        }
        let x = viewport.time_to_x(clip.start) as f32;
        let w = viewport.time_to_px(clip.duration) as f32;
        let y = layout.track_y(clip.track) as f32;
        let h = layout.track_height as f32;
        let Some(rect) = Rect::from_xywh(x, y, w, h) else {
            continue;
        };
        if w < 1.0 {
            continue;
        }

        let base = if scene.selection == Some(clip.id) {
            clip.color.lighter(130)
        } else {
            clip.color
        };
        pixmap.fill_rect(rect, &solid(base.darker(180)), ts, None);
        pixmap.stroke_path(
            &PathBuilder::from_rect(rect),
            &solid(base),
            &Stroke {
                width: 1.0,
                ..Stroke::default()
            },
            ts,
            None,
        );

        if let Some(wave) = waveforms.get_or_build(clip, w, h, source) {
            pixmap.fill_path(
                &wave.path,
                &solid(base.lighter(120).with_alpha(200)),
                FillRule::Winding,
                ts.pre_translate(x, y),
                None,
            );
            fill_rect(pixmap, x, y + wave.center_y, w, 1.0, palette.wave_center, ts);
            stats.waveforms_drawn += 1;
        }
        stats.clips_drawn += 1;
    }

    // Overlap highlights
    for (a, b) in scene.overlaps {
        let (Some(a), Some(b)) = (scene.timeline.get(*a), scene.timeline.get(*b)) else {
            continue;
        };
        let start = a.start.max(b.start);
        let end = a.end().min(b.end());
        if end <= start || end < t0 || start > t1 {
            continue;
        }
        fill_rect(
            pixmap,
            viewport.time_to_x(start) as f32,
            layout.track_y(a.track) as f32,
            viewport.time_to_px(end - start) as f32,
            layout.track_height as f32,
            palette.overlap,
            ts,
        );
        stats.overlaps_drawn += 1;
    }

    // Selection outline
    if let Some(clip) = scene.selection.and_then(|id| scene.timeline.get(id)) {
        let rect = Rect::from_xywh(
            viewport.time_to_x(clip.start) as f32 - 1.0,
            layout.track_y(clip.track) as f32 - 1.0,
            viewport.time_to_px(clip.duration) as f32 + 2.0,
            layout.track_height as f32 + 2.0,
        );
        if let Some(rect) = rect {
            pixmap.stroke_path(
                &PathBuilder::from_rect(rect),
                &solid(palette.selection),
                &Stroke {
                    width: 2.0,
                    ..Stroke::default()
                },
                ts,
                None,
            );
        }
    }

    trace!(
        drawn = stats.clips_drawn,
        culled = stats.clips_culled,
        waveforms = stats.waveforms_drawn,
        "Background drawn"
    );
    stats
}

pub(crate) fn skia_color(color: Color) -> tiny_skia::Color {
    let [r, g, b, a] = color.to_rgba8();
    tiny_skia::Color::from_rgba8(r, g, b, a)
}

pub(crate) fn fill_rect(
    pixmap: &mut Pixmap,
    x: f32,
    y: f32,
    w: f32,
    h: f32,
    color: Color,
    ts: Transform,
) {
    if let Some(rect) = Rect::from_xywh(x, y, w, h) {
        pixmap.fill_rect(rect, &solid(color), ts, None);
    }
}
