//! The timeline canvas: pointer, wheel and timer glue around the interaction
//! engine and the render cache.
//!
//! The host feeds raw input in logical pixels together with the current
//! instant, polls [`TimelineCanvas::tick`] at its timer cadence, and paints
//! whenever a repaint was requested. Everything the outside world needs to
//! react to comes back as [`CanvasEvent`]s.

use std::time::Instant;

use picturebook_core::{EditorConfig, Point};
use picturebook_render::{
    Overlays, RenderCache, RenderResult, Scene, WaveformInbox, WaveformLibrary, WaveformSender,
};
use picturebook_timeline::{
    topmost_at, Clip, ClipId, Cursor, InteractionController, InteractionState, Modifiers,
    PressAction, Timeline, UndoCommand,
};
use tiny_skia::Pixmap;
use tracing::{debug, warn};

use crate::throttle::{FrameWork, UpdateThrottle};

/// Wheel delta of one notch.
const WHEEL_STEP: f64 = 120.0;

// ── Input / output types ───────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
}

/// Pointer shape the host should show.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CursorShape {
    #[default]
    Default,
    Resize,
}

/// Notifications for the owner of the canvas.
#[derive(Debug, Clone, PartialEq)]
pub enum CanvasEvent {
    ClipSelected(Option<ClipId>),
    /// A resize moved the clip's geometry.
    ClipEditing(ClipId),
    /// A resize finished.
    ClipEdited(ClipId),
    ClipMoved { clip_id: ClipId, start: f64 },
    /// Double click on a clip.
    ClipActivated(ClipId),
    ContextMenuRequested { clip_id: ClipId, x: f64, y: f64 },
    PlayheadMoved(f64),
    UndoRecorded(UndoCommand),
    OverlapDetected(Vec<(ClipId, ClipId)>),
}

// ── Canvas ─────────────────────────────────────────────────────

/// One interactive timeline view.
pub struct TimelineCanvas {
    config: EditorConfig,
    timeline: Timeline,
    controller: InteractionController,
    cache: RenderCache,
    throttle: UpdateThrottle,
    waveforms: WaveformLibrary,
    inbox: WaveformInbox,
    size: (f32, f32),
    dpr: f32,
    scrubbing: bool,
    repaint_requests: u32,
    overlaps: Vec<(ClipId, ClipId)>,
    events: Vec<CanvasEvent>,
}

impl TimelineCanvas {
    pub fn new(config: EditorConfig, mut timeline: Timeline) -> Self {
        timeline.viewport.zoom = config.clamp_zoom(timeline.viewport.zoom);
        let throttle = UpdateThrottle::from_millis(config.repaint_interval_ms);
        let overlaps = timeline.overlaps();
        Self {
            controller: InteractionController::new(config.clone()),
            config,
            timeline,
            cache: RenderCache::default(),
            throttle,
            waveforms: WaveformLibrary::new(),
            inbox: WaveformInbox::new(),
            size: (0.0, 0.0),
            dpr: 1.0,
            scrubbing: false,
            repaint_requests: 0,
            overlaps,
            events: Vec::new(),
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    /// Mutable access for the timeline's owner. Assumes the geometry changes.
    pub fn timeline_mut(&mut self) -> &mut Timeline {
        self.cache.mark_dirty();
        self.request_repaint();
        &mut self.timeline
    }

    pub fn controller(&self) -> &InteractionController {
        &self.controller
    }

    pub fn cache(&self) -> &RenderCache {
        &self.cache
    }

    pub fn selection(&self) -> Option<ClipId> {
        self.controller.selection()
    }

    /// Replace every clip. Any gesture in progress is abandoned.
    pub fn set_clips(&mut self, clips: Vec<Clip>) {
        self.controller.cancel(&mut self.timeline);
        self.throttle.flush();
        self.timeline.set_clips(clips);
        let timeline = &self.timeline;
        self.cache.retain_waveforms(|id| timeline.get(id).is_some());
        if let Some(selected) = self.controller.selection() {
            if self.timeline.get(selected).is_none() && self.controller.select(None) {
                self.events.push(CanvasEvent::ClipSelected(None));
            }
        }
        self.overlaps = self.timeline.overlaps();
        self.cache.mark_dirty();
        self.request_repaint();
    }

    /// Select a clip programmatically.
    pub fn select(&mut self, clip: Option<ClipId>) {
        if self.controller.select(clip) {
            self.cache.mark_dirty();
            self.request_repaint();
        }
    }

    pub fn set_snap_enabled(&mut self, enabled: bool) {
        self.controller.set_snap_enabled(enabled);
    }

    // ── Waveform data ──

    pub fn waveform_sender(&self) -> WaveformSender {
        self.inbox.sender()
    }

    pub fn waveforms(&self) -> &WaveformLibrary {
        &self.waveforms
    }

    /// Move decoded envelopes from the inbox into the library.
    ///
    /// Returns how many arrived.
    pub fn drain_decoded(&mut self) -> usize {
        let decoded = self.inbox.drain();
        for item in &decoded {
            self.cache.forget_waveform(item.clip_id);
        }
        let count = decoded.len();
        for item in decoded {
            self.waveforms.insert(item.clip_id, item.envelope);
        }
        if count > 0 {
            debug!(count, "Decoded waveforms received");
            self.cache.mark_dirty();
            self.request_repaint();
        }
        count
    }

    // ── Surface ──

    /// Set the logical surface size and device pixel ratio.
    pub fn resize(&mut self, width: f32, height: f32, dpr: f32) {
        if self.size == (width, height) && self.dpr == dpr {
            return;
        }
        self.size = (width, height);
        self.dpr = dpr;
        self.cache.mark_dirty();
        self.request_repaint();
    }

    pub fn size(&self) -> (f32, f32) {
        self.size
    }

    /// Compose the next frame: cached background plus fresh overlays.
    pub fn paint(&mut self) -> RenderResult<Pixmap> {
        let (width, height) = self.size;
        if self.cache.needs_rebuild(width, height, self.dpr) {
            self.overlaps = self.timeline.overlaps();
        }
        let scene = Scene {
            timeline: &self.timeline,
            layout: &self.config.layout,
            selection: self.controller.selection(),
            overlaps: &self.overlaps,
        };
        let overlays = Overlays {
            playhead: self.timeline.playhead,
            snap: self.controller.active_snap().map(|snap| snap.time),
        };
        self.cache
            .compose(&scene, &overlays, self.size, self.dpr, &self.waveforms)
            .map_err(|e| {
                warn!(error = %e, width, height, dpr = self.dpr, "Repaint failed");
                e
            })
    }

    /// Consume the repaint requests made since the last call.
    pub fn take_repaint_requests(&mut self) -> u32 {
        std::mem::take(&mut self.repaint_requests)
    }

    pub fn take_events(&mut self) -> Vec<CanvasEvent> {
        std::mem::take(&mut self.events)
    }

    fn request_repaint(&mut self) {
        self.repaint_requests += 1;
    }

    // ── Pointer ──

    pub fn cursor(&self, pos: Point) -> Cursor {
        Cursor::resolve(pos, &self.timeline.viewport, &self.config.layout)
    }

    /// Pointer shape for the current hover position.
    pub fn cursor_at(&self, pos: Point) -> CursorShape {
        if matches!(self.controller.state(), InteractionState::Resizing { .. }) {
            return CursorShape::Resize;
        }
        match self.controller.hover_edge(&self.timeline, &self.cursor(pos)) {
            Some(_) => CursorShape::Resize,
            None => CursorShape::Default,
        }
    }

    pub fn pointer_pressed(&mut self, pos: Point, button: PointerButton, modifiers: Modifiers) {
        let cursor = self.cursor(pos);
        if button == PointerButton::Secondary {
            self.context_menu(cursor);
            return;
        }
        if self.config.layout.is_header(pos.y) {
            self.scrubbing = true;
            self.scrub_to(cursor.time);
            return;
        }

        let outcome = self.controller.press(&self.timeline, cursor, modifiers);
        if outcome.selection_changed {
            self.events.push(CanvasEvent::ClipSelected(self.controller.selection()));
            self.cache.mark_dirty();
            self.request_repaint();
        }
        if matches!(outcome.action, PressAction::Miss) {
            self.scrubbing = true;
            self.scrub_to(cursor.time);
        }
    }

    pub fn pointer_moved(&mut self, pos: Point, now: Instant) {
        let cursor = self.cursor(pos);
        if self.scrubbing {
            self.scrub_to(cursor.time);
            return;
        }
        if self.controller.state().is_idle() {
            return;
        }
        let outcome = self.controller.move_to(&mut self.timeline, cursor);
        if let Some(clip_id) = outcome.editing {
            self.events.push(CanvasEvent::ClipEditing(clip_id));
        }
        self.throttle.schedule(now, outcome.editing);
    }

    pub fn pointer_released(&mut self, pos: Point) {
        if self.scrubbing {
            self.scrubbing = false;
            return;
        }
        if self.controller.state().is_idle() {
            return;
        }

        // The last frame of the gesture lands before the state goes idle.
        let flushed = self.throttle.flush();
        let frame_pending = flushed.is_some();
        if let Some(work) = flushed {
            self.perform_frame_work(work);
        }
        let cursor = self.cursor(pos);
        let outcome = self.controller.release(&self.timeline, cursor);

        if outcome.selection_changed {
            self.events.push(CanvasEvent::ClipSelected(self.controller.selection()));
        }
        if let Some((clip_id, start)) = outcome.moved {
            self.events.push(CanvasEvent::ClipMoved { clip_id, start });
        }
        if let Some(clip_id) = outcome.edited {
            self.events.push(CanvasEvent::ClipEdited(clip_id));
        }
        if let Some(command) = outcome.undo {
            self.events.push(CanvasEvent::UndoRecorded(command));
            self.overlaps = self.timeline.overlaps();
            if !self.overlaps.is_empty() {
                warn!(pairs = self.overlaps.len(), "Clips overlap after edit");
                self.events.push(CanvasEvent::OverlapDetected(self.overlaps.clone()));
            }
        }
        // Clears the snap indicator even when nothing changed.
        if !frame_pending {
            self.cache.mark_dirty();
            self.request_repaint();
        }
    }

    pub fn double_clicked(&mut self, pos: Point) {
        let cursor = self.cursor(pos);
        if let Some(clip_id) = cursor
            .track
            .and_then(|track| topmost_at(&self.timeline, cursor.time, Some(track)))
        {
            self.events.push(CanvasEvent::ClipActivated(clip_id));
        }
    }

    /// Abort the active gesture, restoring the clips it touched.
    pub fn cancel(&mut self) -> bool {
        self.throttle.flush();
        self.scrubbing = false;
        if !self.controller.cancel(&mut self.timeline) {
            return false;
        }
        self.cache.mark_dirty();
        self.request_repaint();
        true
    }

    fn context_menu(&mut self, cursor: Cursor) {
        if !self.controller.state().is_idle() {
            return;
        }
        let Some(clip_id) = cursor
            .track
            .and_then(|track| topmost_at(&self.timeline, cursor.time, Some(track)))
        else {
            return;
        };
        if self.controller.select(Some(clip_id)) {
            self.events.push(CanvasEvent::ClipSelected(Some(clip_id)));
            self.cache.mark_dirty();
            self.request_repaint();
        }
        self.events.push(CanvasEvent::ContextMenuRequested {
            clip_id,
            x: cursor.pos.x,
            y: cursor.pos.y,
        });
    }

    fn scrub_to(&mut self, time: f64) {
        self.timeline.set_playhead(time);
        self.events.push(CanvasEvent::PlayheadMoved(self.timeline.playhead));
        self.request_repaint();
    }

    // ── Timer ──

    /// When the host should next call [`tick`](Self::tick).
    pub fn next_deadline(&self) -> Option<Instant> {
        self.throttle.next_deadline()
    }

    /// Run the repaint timer. Returns whether it fired.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.throttle.poll(now) {
            Some(work) => {
                self.perform_frame_work(work);
                true
            }
            None => false,
        }
    }

    fn perform_frame_work(&mut self, work: FrameWork) {
        if let Some(clip) = work.waveform_clip.and_then(|id| self.timeline.get(id)) {
            self.cache.refresh_waveform(
                clip,
                &self.timeline.viewport,
                &self.config.layout,
                &self.waveforms,
            );
        }
        self.cache.mark_dirty();
        self.request_repaint();
    }

    // ── Viewport ──

    /// Ctrl+wheel zooms around the pointer; a plain wheel scrolls.
    pub fn wheel(&mut self, pos: Point, delta: f64, modifiers: Modifiers) {
        let before = self.timeline.viewport;
        let viewport = &mut self.timeline.viewport;
        if modifiers.ctrl {
            let steps = delta / WHEEL_STEP;
            let zoom = self
                .config
                .clamp_zoom(viewport.zoom * self.config.wheel_zoom_base.powf(steps));
            viewport.zoom_around(pos.x, zoom);
            viewport.scroll_offset = viewport.scroll_offset.max(0.0);
        } else {
            viewport.scroll_offset = (viewport.scroll_offset - delta / viewport.zoom).max(0.0);
        }
        if self.timeline.viewport != before {
            self.cache.mark_dirty();
            self.request_repaint();
        }
    }

    pub fn set_scroll(&mut self, offset: f64) {
        let offset = offset.max(0.0);
        if self.timeline.viewport.scroll_offset != offset {
            self.timeline.viewport.scroll_offset = offset;
            self.cache.mark_dirty();
            self.request_repaint();
        }
    }

    pub fn set_zoom(&mut self, zoom: f64) {
        let zoom = self.config.clamp_zoom(zoom);
        if self.timeline.viewport.zoom != zoom {
            self.timeline.viewport.zoom = zoom;
            self.cache.mark_dirty();
            self.request_repaint();
        }
    }

    /// Move the playhead from an external clock, optionally scrolling it into view.
    pub fn set_playhead(&mut self, time: f64, auto_scroll: bool) {
        self.timeline.set_playhead(time);
        if auto_scroll {
            let viewport = self.timeline.viewport;
            let x = viewport.time_to_x(self.timeline.playhead);
            if x < 0.0 || x > self.size.0 as f64 {
                let margin = viewport.px_to_time(self.config.autoscroll_margin_px);
                let offset = self.timeline.playhead - margin;
                self.set_scroll(offset);
            }
        }
        self.request_repaint();
    }
}
