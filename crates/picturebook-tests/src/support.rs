//! Shared fixtures for driving a canvas with pixel input.

use picturebook_core::{EditorConfig, Point, Viewport};
use picturebook_timeline::{Clip, Modifiers, Timeline};
use picturebook_ui::{PointerButton, TimelineCanvas};
use std::time::{Duration, Instant};

pub const WIDTH: f32 = 1200.0;
pub const HEIGHT: f32 = 200.0;

pub fn canvas_with(config: EditorConfig, zoom: f64, clips: Vec<Clip>) -> TimelineCanvas {
    let mut timeline = Timeline::new(Viewport::new(zoom, 0.0));
    timeline.set_clips(clips);
    let mut canvas = TimelineCanvas::new(config, timeline);
    canvas.resize(WIDTH, HEIGHT, 1.0);
    canvas.take_repaint_requests();
    canvas
}

pub fn canvas(zoom: f64, clips: Vec<Clip>) -> TimelineCanvas {
    canvas_with(EditorConfig::default(), zoom, clips)
}

/// Pixel position of `time` on the centre line of `track`.
pub fn at(canvas: &TimelineCanvas, time: f64, track: u32) -> Point {
    let layout = canvas.config().layout;
    Point::new(
        canvas.timeline().viewport.time_to_x(time),
        layout.track_y(track) + layout.track_height / 2.0,
    )
}

/// Press at `from`, move straight to `to`, let the timer fire, release.
pub fn drag(canvas: &mut TimelineCanvas, from: Point, to: Point, modifiers: Modifiers) {
    let t0 = Instant::now();
    canvas.pointer_pressed(from, PointerButton::Primary, modifiers);
    canvas.pointer_moved(to, t0);
    canvas.tick(t0 + Duration::from_millis(16));
    canvas.pointer_released(to);
}

pub fn click(canvas: &mut TimelineCanvas, pos: Point) {
    canvas.pointer_pressed(pos, PointerButton::Primary, Modifiers::NONE);
    canvas.pointer_released(pos);
}
