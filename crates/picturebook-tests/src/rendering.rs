//! Integration tests for the render cache behind a canvas.
//!
//! Exercises picturebook-ui repainting through picturebook-render with
//! waveform envelopes delivered across threads.

use picturebook_render::{WaveformEnvelope, WaveformKey};
use picturebook_timeline::{Clip, ClipId};
use picturebook_ui::TimelineCanvas;
use std::thread;

use crate::support::{canvas, HEIGHT, WIDTH};

fn with_waveforms(clips: Vec<Clip>) -> TimelineCanvas {
    let ids: Vec<ClipId> = clips.iter().map(|c| c.id).collect();
    let mut canvas = canvas(100.0, clips);
    let sender = canvas.waveform_sender();
    thread::spawn(move || {
        for id in ids {
            sender.send(id, WaveformEnvelope::new(100.0, vec![0.6; 1200]));
        }
    })
    .join()
    .unwrap();
    canvas.drain_decoded();
    canvas
}

fn key(canvas: &TimelineCanvas, id: ClipId) -> WaveformKey {
    let clip = canvas.timeline().get(id).unwrap();
    let width = canvas.timeline().viewport.time_to_px(clip.duration) as f32;
    let height = canvas.config().layout.track_height as f32;
    WaveformKey::for_clip(clip, width, height).unwrap()
}

#[test]
fn offset_change_rebuilds_only_that_waveform() {
    let a = Clip::audio("a", 0, 0.0, 2.0, 0.0, 12.0);
    let b = Clip::audio("b", 1, 0.0, 2.0, 0.0, 12.0);
    let (a_id, b_id) = (a.id, b.id);
    let mut canvas = with_waveforms(vec![a, b]);
    canvas.paint().unwrap();
    assert_eq!(canvas.cache().waveforms().builds(), 2);
    let b_key = key(&canvas, b_id);

    let clip = canvas.timeline_mut().get_mut(a_id).unwrap();
    if let Some(source) = clip.kind.source_mut() {
        source.offset = 1.5;
    }
    assert!(!canvas.cache().waveforms().is_current(&key(&canvas, a_id)));
    assert!(canvas.cache().waveforms().is_current(&b_key));

    canvas.paint().unwrap();
    assert_eq!(canvas.cache().waveforms().builds(), 3);
    assert!(canvas.cache().waveforms().is_current(&key(&canvas, a_id)));
    assert!(canvas.cache().waveforms().is_current(&b_key));
}

#[test]
fn scroll_rebuilds_background_but_keeps_waveforms() {
    let a = Clip::audio("a", 0, 0.0, 3.0, 0.0, 12.0);
    let mut canvas = with_waveforms(vec![a]);
    canvas.paint().unwrap();
    let builds = canvas.cache().waveforms().builds();
    let rebuilds = canvas.cache().rebuild_count();

    canvas.set_scroll(1.0);
    assert!(canvas.cache().is_dirty());
    canvas.paint().unwrap();

    assert_eq!(canvas.cache().rebuild_count(), rebuilds + 1);
    assert_eq!(canvas.cache().waveforms().builds(), builds);
}

#[test]
fn repeated_rebuild_is_pixel_identical() {
    let mut canvas = with_waveforms(vec![
        Clip::audio("a", 0, 0.5, 3.0, 0.0, 12.0),
        Clip::subtitle("b", 1, 1.0, 2.0, 1.0, 12.0),
        Clip::image("c", 2, 2.0, 4.0),
    ]);
    canvas.resize(WIDTH, HEIGHT, 2.0);
    let first = canvas.paint().unwrap();

    // Dirty without changing anything.
    canvas.timeline_mut();
    let second = canvas.paint().unwrap();

    assert_eq!(canvas.cache().rebuild_count(), 2);
    assert_eq!(first.data(), second.data());
    assert_eq!(first.width(), (WIDTH * 2.0) as u32);
}

#[test]
fn playhead_and_snap_are_overlays() {
    let mut canvas = canvas(100.0, vec![Clip::image("a", 0, 1.0, 2.0)]);
    let before = canvas.paint().unwrap();
    let background = canvas.cache().background().unwrap().data().to_vec();

    canvas.set_playhead(4.0, false);
    let after = canvas.paint().unwrap();

    assert_eq!(canvas.cache().rebuild_count(), 1);
    assert_ne!(before.data(), after.data());
    assert_eq!(canvas.cache().background().unwrap().data(), &background[..]);
}

#[test]
fn offscreen_clips_are_culled() {
    let mut clips = vec![Clip::image("visible", 0, 0.0, 2.0)];
    clips.extend((0..50).map(|i| Clip::image(format!("far {}", i), 1, 100.0 + i as f64, 1.0)));
    let mut canvas = canvas(100.0, clips);
    canvas.paint().unwrap();

    let stats = canvas.cache().last_stats();
    assert_eq!(stats.clips_drawn, 1);
    assert_eq!(stats.clips_culled, 50);
}

#[test]
fn selection_change_rebuilds_background() {
    let clip = Clip::image("a", 0, 1.0, 2.0);
    let id = clip.id;
    let mut canvas = canvas(100.0, vec![clip]);
    let plain = canvas.paint().unwrap();

    canvas.select(Some(id));
    assert!(canvas.cache().is_dirty());
    let selected = canvas.paint().unwrap();
    assert_ne!(plain.data(), selected.data());

    // Re-selecting the same clip is not a change.
    canvas.select(Some(id));
    assert!(!canvas.cache().is_dirty());
}
