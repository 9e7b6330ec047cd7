//! Render cache: a lazily rebuilt background plus the waveform path cache.
//!
//! The cache is owned by the view it backs. Invalidation is a single `dirty`
//! flag; rebuilding only happens when a frame is actually composed.

use picturebook_core::{TrackLayout, Viewport};
use picturebook_timeline::{Clip, ClipId};
use tiny_skia::{Pixmap, PixmapPaint, Transform};
use tracing::debug;

use crate::background::{draw_background, DrawStats, Palette, Scene};
use crate::error::{RenderError, RenderResult};
use crate::overlay::{draw_overlays, Overlays};
use crate::surface::BackgroundSurface;
use crate::waveform::{WaveformCache, WaveformSource};

/// Cached background surface and waveform paths for one timeline view.
#[derive(Debug)]
pub struct RenderCache {
    background: Option<BackgroundSurface>,
    dirty: bool,
    waveforms: WaveformCache,
    palette: Palette,
    rebuilds: u64,
    last_stats: DrawStats,
}

impl RenderCache {
    pub fn new(palette: Palette) -> Self {
        Self {
            background: None,
            dirty: true,
            waveforms: WaveformCache::new(),
            palette,
            rebuilds: 0,
            last_stats: DrawStats::default(),
        }
    }

    /// Mark the background stale (geometry, scroll, zoom, size or selection changed).
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Whether the next repaint at this size would rebuild the background.
    pub fn needs_rebuild(&self, width: f32, height: f32, dpr: f32) -> bool {
        self.dirty
            || self
                .background
                .as_ref()
                .map_or(true, |bg| !bg.matches(width, height, dpr))
    }

    /// Rebuild the background if it is dirty, missing, or sized for another surface.
    ///
    /// Returns whether a rebuild happened. On failure `dirty` stays set so the
    /// next repaint retries.
    pub fn ensure_background(
        &mut self,
        scene: &Scene<'_>,
        logical_size: (f32, f32),
        dpr: f32,
        source: &dyn WaveformSource,
    ) -> RenderResult<bool> {
        let (width, height) = logical_size;
        if !self.needs_rebuild(width, height, dpr) {
            return Ok(false);
        }

        let mut surface = match self.background.take() {
            Some(bg) if bg.matches(width, height, dpr) => bg,
            _ => BackgroundSurface::new(width, height, dpr)?,
        };
        let stats = draw_background(&mut surface, scene, &self.palette, &mut self.waveforms, source);
        self.background = Some(surface);
        self.dirty = false;
        self.rebuilds += 1;
        self.last_stats = stats;
        debug!(
            width,
            height,
            dpr,
            drawn = stats.clips_drawn,
            culled = stats.clips_culled,
            "Background rebuilt"
        );
        Ok(true)
    }

    /// Produce a full frame: the cached background with fresh overlays on top.
    pub fn compose(
        &mut self,
        scene: &Scene<'_>,
        overlays: &Overlays,
        logical_size: (f32, f32),
        dpr: f32,
        source: &dyn WaveformSource,
    ) -> RenderResult<Pixmap> {
        self.ensure_background(scene, logical_size, dpr, source)?;
        let (pw, ph) = BackgroundSurface::device_size(logical_size.0, logical_size.1, dpr);
        let mut frame = Pixmap::new(pw, ph).ok_or(RenderError::SurfaceAllocation {
            width: pw,
            height: ph,
        })?;
        if let Some(bg) = &self.background {
            frame.draw_pixmap(
                0,
                0,
                bg.pixmap().as_ref(),
                &PixmapPaint::default(),
                Transform::identity(),
                None,
            );
        }
        draw_overlays(
            &mut frame,
            &scene.timeline.viewport,
            overlays,
            &self.palette,
            logical_size,
            dpr,
        );
        Ok(frame)
    }

    pub fn background(&self) -> Option<&BackgroundSurface> {
        self.background.as_ref()
    }

    pub fn waveforms(&self) -> &WaveformCache {
        &self.waveforms
    }

    /// Drop a clip's waveform path (its envelope changed or it was removed).
    pub fn forget_waveform(&mut self, clip: ClipId) -> bool {
        self.waveforms.invalidate(clip)
    }

    /// Keep only the waveform paths of clips that still exist.
    pub fn retain_waveforms(&mut self, live: impl FnMut(ClipId) -> bool) {
        self.waveforms.retain_clips(live);
    }

    /// Build a clip's waveform path at its current on-screen size ahead of the
    /// next background rebuild. Returns whether a path is available.
    pub fn refresh_waveform(
        &mut self,
        clip: &Clip,
        viewport: &Viewport,
        layout: &TrackLayout,
        source: &dyn WaveformSource,
    ) -> bool {
        let width = viewport.time_to_px(clip.duration) as f32;
        let height = layout.track_height as f32;
        self.waveforms.get_or_build(clip, width, height, source).is_some()
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Number of background rebuilds so far.
    pub fn rebuild_count(&self) -> u64 {
        self.rebuilds
    }

    /// Counters from the most recent rebuild.
    pub fn last_stats(&self) -> DrawStats {
        self.last_stats
    }
}

impl Default for RenderCache {
    fn default() -> Self {
        Self::new(Palette::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::waveform::{WaveformEnvelope, WaveformKey, WaveformLibrary};
    use picturebook_timeline::Timeline;

    fn fixture() -> (Timeline, TrackLayout, WaveformLibrary, ClipId, ClipId) {
        let mut tl = Timeline::new(Viewport::new(100.0, 0.0));
        let a = tl.add_clip(Clip::audio("A", 0, 0.0, 2.0, 0.0, 10.0));
        let b = tl.add_clip(Clip::audio("B", 1, 1.0, 2.0, 1.0, 10.0));
        let mut lib = WaveformLibrary::new();
        lib.insert(a, WaveformEnvelope::new(100.0, vec![0.5; 1000]));
        lib.insert(b, WaveformEnvelope::new(100.0, vec![0.7; 1000]));
        (tl, TrackLayout::default(), lib, a, b)
    }

    fn scene<'a>(tl: &'a Timeline, layout: &'a TrackLayout) -> Scene<'a> {
        Scene {
            timeline: tl,
            layout,
            selection: None,
            overlaps: &[],
        }
    }

    #[test]
    fn test_rebuilds_only_when_needed() {
        let (tl, layout, lib, ..) = fixture();
        let mut cache = RenderCache::default();
        assert!(cache.needs_rebuild(400.0, 150.0, 1.0));

        assert!(cache.ensure_background(&scene(&tl, &layout), (400.0, 150.0), 1.0, &lib).unwrap());
        assert!(!cache.ensure_background(&scene(&tl, &layout), (400.0, 150.0), 1.0, &lib).unwrap());

        cache.mark_dirty();
        assert!(cache.ensure_background(&scene(&tl, &layout), (400.0, 150.0), 1.0, &lib).unwrap());
        assert_eq!(cache.rebuild_count(), 2);
    }

    #[test]
    fn test_size_or_ratio_change_rebuilds() {
        let (tl, layout, lib, ..) = fixture();
        let mut cache = RenderCache::default();
        cache.ensure_background(&scene(&tl, &layout), (400.0, 150.0), 1.0, &lib).unwrap();
        assert!(cache.ensure_background(&scene(&tl, &layout), (400.0, 150.0), 2.0, &lib).unwrap());
        assert_eq!(cache.background().unwrap().device_pixel_ratio(), 2.0);
        assert!(cache.ensure_background(&scene(&tl, &layout), (500.0, 150.0), 2.0, &lib).unwrap());
        assert_eq!(cache.background().unwrap().pixmap().width(), 1000);
    }

    #[test]
    fn test_rebuild_twice_is_pixel_identical() {
        let (tl, layout, lib, ..) = fixture();
        let mut cache = RenderCache::default();
        cache.ensure_background(&scene(&tl, &layout), (400.0, 150.0), 1.5, &lib).unwrap();
        let first = cache.background().unwrap().data().to_vec();
        cache.mark_dirty();
        cache.ensure_background(&scene(&tl, &layout), (400.0, 150.0), 1.5, &lib).unwrap();
        assert_eq!(first, cache.background().unwrap().data());
    }

    #[test]
    fn test_scroll_keeps_waveform_paths() {
        let (mut tl, layout, lib, a, b) = fixture();
        let mut cache = RenderCache::default();
        cache.ensure_background(&scene(&tl, &layout), (400.0, 150.0), 1.0, &lib).unwrap();
        let builds = cache.waveforms().builds();
        assert_eq!(builds, 2);

        tl.viewport.scroll_offset = 0.5;
        cache.mark_dirty();
        cache.ensure_background(&scene(&tl, &layout), (400.0, 150.0), 1.0, &lib).unwrap();
        assert_eq!(cache.waveforms().builds(), builds);
        assert_eq!(cache.rebuild_count(), 2);

        let key_a = WaveformKey::for_clip(tl.get(a).unwrap(), 200.0, 50.0).unwrap();
        let key_b = WaveformKey::for_clip(tl.get(b).unwrap(), 200.0, 50.0).unwrap();
        assert!(cache.waveforms().is_current(&key_a));
        assert!(cache.waveforms().is_current(&key_b));
    }

    #[test]
    fn test_failed_rebuild_stays_dirty() {
        let (tl, layout, lib, ..) = fixture();
        let mut cache = RenderCache::default();
        assert!(cache.ensure_background(&scene(&tl, &layout), (0.0, 150.0), 1.0, &lib).is_err());
        assert!(cache.is_dirty());
        assert!(cache.background().is_none());
    }

    #[test]
    fn test_overlays_not_in_background() {
        let (tl, layout, lib, ..) = fixture();
        let mut cache = RenderCache::default();
        let overlays = Overlays {
            playhead: 3.5,
            snap: Some(1.0),
        };
        let frame = cache
            .compose(&scene(&tl, &layout), &overlays, (400.0, 150.0), 1.0, &lib)
            .unwrap();
        let background = cache.background().unwrap();
        assert_ne!(frame.data(), background.data());

        // A different playhead reuses the same background.
        let moved = Overlays {
            playhead: 0.5,
            snap: None,
        };
        cache
            .compose(&scene(&tl, &layout), &moved, (400.0, 150.0), 1.0, &lib)
            .unwrap();
        assert_eq!(cache.rebuild_count(), 1);
    }

    #[test]
    fn test_refresh_waveform_prebuilds_trimmed_clip() {
        let (mut tl, layout, lib, a, _) = fixture();
        let mut cache = RenderCache::default();
        cache.ensure_background(&scene(&tl, &layout), (400.0, 150.0), 1.0, &lib).unwrap();
        assert_eq!(cache.waveforms().builds(), 2);

        tl.get_mut(a).unwrap().duration = 1.5;
        let clip = tl.get(a).unwrap().clone();
        assert!(cache.refresh_waveform(&clip, &tl.viewport, &layout, &lib));
        assert_eq!(cache.waveforms().builds(), 3);

        // The rebuild finds the refreshed path already current.
        cache.mark_dirty();
        cache.ensure_background(&scene(&tl, &layout), (400.0, 150.0), 1.0, &lib).unwrap();
        assert_eq!(cache.waveforms().builds(), 3);
    }

    #[test]
    fn test_retain_drops_removed_clips() {
        let (tl, layout, lib, a, _) = fixture();
        let mut cache = RenderCache::default();
        cache.ensure_background(&scene(&tl, &layout), (400.0, 150.0), 1.0, &lib).unwrap();
        cache.retain_waveforms(|id| id == a);
        assert_eq!(cache.waveforms().len(), 1);
        assert!(cache.waveforms().entry(a).is_some());
    }
}
