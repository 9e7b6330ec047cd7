//! The cached background pixel buffer.

use tiny_skia::{Pixmap, Transform};

use crate::error::{RenderError, RenderResult};

/// A pixel buffer of `logical size × device pixel ratio`, tagged with both.
#[derive(Debug, Clone)]
pub struct BackgroundSurface {
    pixmap: Pixmap,
    width: f32,
    height: f32,
    dpr: f32,
}

impl BackgroundSurface {
    /// Allocate a surface for a `width` × `height` logical area.
    pub fn new(width: f32, height: f32, dpr: f32) -> RenderResult<Self> {
        let (pw, ph) = Self::device_size(width, height, dpr);
        let pixmap = Pixmap::new(pw, ph)
            .ok_or(RenderError::SurfaceAllocation { width: pw, height: ph })?;
        Ok(Self {
            pixmap,
            width,
            height,
            dpr,
        })
    }

    /// Device pixel size for a logical size.
    pub fn device_size(width: f32, height: f32, dpr: f32) -> (u32, u32) {
        let scale = |v: f32| (v * dpr).ceil().max(0.0) as u32;
        (scale(width), scale(height))
    }

    /// Whether the surface was built for this logical size and ratio.
    pub fn matches(&self, width: f32, height: f32, dpr: f32) -> bool {
        self.width == width && self.height == height && self.dpr == dpr
    }

    pub fn logical_size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    pub fn device_pixel_ratio(&self) -> f32 {
        self.dpr
    }

    /// Logical-to-device transform for drawing.
    pub fn transform(&self) -> Transform {
        Transform::from_scale(self.dpr, self.dpr)
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    pub fn pixmap_mut(&mut self) -> &mut Pixmap {
        &mut self.pixmap
    }

    /// Premultiplied RGBA bytes.
    pub fn data(&self) -> &[u8] {
        self.pixmap.data()
    }
}

/// Encode a composed frame as PNG bytes.
pub fn encode_png(pixmap: &Pixmap) -> RenderResult<Vec<u8>> {
    pixmap
        .encode_png()
        .map_err(|e| RenderError::Encode(e.to_string()))
}
