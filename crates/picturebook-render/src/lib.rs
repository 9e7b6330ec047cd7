//! PictureBook Render - Cached timeline surface
//!
//! The background (grid, clips, waveforms, overlap highlights, selection
//! outline) is rasterised once into a [`BackgroundSurface`] and reused until
//! something invalidates it. The playhead and snap indicator are drawn fresh
//! over a copy on every repaint.

pub mod background;
pub mod cache;
pub mod error;
pub mod inbox;
pub mod overlay;
pub mod surface;
pub mod waveform;

pub use background::{draw_background, DrawStats, Palette, Scene};
pub use cache::RenderCache;
pub use error::{RenderError, RenderResult};
pub use inbox::{DecodedWaveform, WaveformInbox, WaveformSender};
pub use overlay::{draw_overlays, Overlays};
pub use surface::{encode_png, BackgroundSurface};
pub use waveform::{
    WaveformCache, WaveformEnvelope, WaveformKey, WaveformLibrary, WaveformPath, WaveformSource,
};

use picturebook_core::Color;

/// Solid paint for a core color.
pub(crate) fn solid(color: Color) -> tiny_skia::Paint<'static> {
    let [r, g, b, a] = color.to_rgba8();
    let mut paint = tiny_skia::Paint::default();
    paint.set_color_rgba8(r, g, b, a);
    paint.anti_alias = true;
    paint
}
