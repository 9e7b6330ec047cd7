//! Dynamic overlays drawn over the cached background on every repaint.

use picturebook_core::Viewport;
use tiny_skia::{FillRule, PathBuilder, Pixmap, Stroke, StrokeDash, Transform};

use crate::background::{fill_rect, Palette};
use crate::solid;

/// Half-width of the playhead handle.
const HANDLE_HALF_WIDTH: f32 = 6.0;
const HANDLE_HEIGHT: f32 = 10.0;

/// Per-frame state that never goes into the cached surface.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Overlays {
    /// Playhead time (seconds).
    pub playhead: f64,
    /// Anchor time of the active snap, if any.
    pub snap: Option<f64>,
}

/// Draw the playhead line with its handle and the dashed snap indicator.
pub fn draw_overlays(
    pixmap: &mut Pixmap,
    viewport: &Viewport,
    overlays: &Overlays,
    palette: &Palette,
    logical_size: (f32, f32),
    dpr: f32,
) {
    let (width, height) = logical_size;
    let ts = Transform::from_scale(dpr, dpr);

    if let Some(time) = overlays.snap {
        let x = viewport.time_to_x(time) as f32;
        if (0.0..=width).contains(&x) {
            let mut pb = PathBuilder::new();
            pb.move_to(x, 0.0);
            pb.line_to(x, height);
            if let Some(path) = pb.finish() {
                let stroke = Stroke {
                    width: 1.0,
                    dash: StrokeDash::new(vec![4.0, 4.0], 0.0),
                    ..Stroke::default()
                };
                pixmap.stroke_path(&path, &solid(palette.snap), &stroke, ts, None);
            }
        }
    }

    let x = viewport.time_to_x(overlays.playhead) as f32;
    fill_rect(pixmap, x - 1.0, 0.0, 2.0, height, palette.playhead, ts);

    let mut pb = PathBuilder::new();
    pb.move_to(x - HANDLE_HALF_WIDTH, 0.0);
    pb.line_to(x + HANDLE_HALF_WIDTH, 0.0);
    pb.line_to(x, HANDLE_HEIGHT);
    pb.close();
    if let Some(handle) = pb.finish() {
        pixmap.fill_path(&handle, &solid(palette.playhead), FillRule::Winding, ts, None);
    }
}
