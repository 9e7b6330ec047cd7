//! PictureBook replay tool
//!
//! Builds a small demo timeline, replays a ripple drag and a linked trim
//! through the canvas exactly as pointer input would drive it, logs the
//! resulting undo commands and writes the final frame to a PNG.

use anyhow::{Context, Result};
use glam::dvec2;
use picturebook_core::{EditorConfig, Point, Viewport};
use picturebook_render::{encode_png, WaveformEnvelope};
use picturebook_timeline::{Clip, Modifiers, Timeline, UndoCommand, UndoSink};
use picturebook_ui::{CanvasEvent, PointerButton, TimelineCanvas};
use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

const SAMPLE_RATE: u32 = 8_000;
const PEAKS_PER_SECOND: f64 = 200.0;

fn main() -> Result<()> {
    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut args = std::env::args().skip(1);
    let config = match args.next().filter(|arg| arg != "-") {
        Some(path) => EditorConfig::load(&path).with_context(|| format!("loading {}", path))?,
        None => EditorConfig::default(),
    };
    let output = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("timeline.png"));

    info!("PictureBook replay starting...");

    let (timeline, audio) = demo_timeline(config.default_zoom);
    let mut canvas = TimelineCanvas::new(config, timeline);
    canvas.resize(1000.0, 220.0, 2.0);

    decode_waveforms(&canvas, &audio)?;
    let arrived = canvas.drain_decoded();
    info!(arrived, "Waveforms ready");

    let mut history: Vec<UndoCommand> = Vec::new();
    let mut clock = Instant::now();

    // Ripple drag: Shift-grab the middle page and push it and the page after it by a second.
    let lane = lane_center(&canvas, 2);
    let from = x_at(&canvas, 4.0);
    let to = x_at(&canvas, 5.0);
    replay_gesture(&mut canvas, &mut clock, Modifiers::SHIFT, dvec2(from, lane), dvec2(to, lane));
    collect(&mut canvas, &mut history);

    // Linked trim: Ctrl-grab the shared boundary between the two narration clips.
    let lane = lane_center(&canvas, 0);
    let from = x_at(&canvas, 4.0) - 2.0;
    let to = x_at(&canvas, 4.5);
    replay_gesture(&mut canvas, &mut clock, Modifiers::CTRL, dvec2(from, lane), dvec2(to, lane));
    collect(&mut canvas, &mut history);

    for (i, command) in history.iter().enumerate() {
        info!(step = i + 1, edit = %command.description(), clips = command.len(), "History");
        for change in &command.changes {
            info!(
                clip = %change.clip_id,
                start_before = change.before.start,
                start_after = change.after.start,
                duration_before = change.before.duration,
                duration_after = change.after.duration,
                "Clip changed"
            );
        }
    }

    let frame = canvas.paint().context("composing final frame")?;
    let png = encode_png(&frame)?;
    std::fs::write(&output, png).with_context(|| format!("writing {}", output.display()))?;
    info!(
        path = %output.display(),
        width = frame.width(),
        height = frame.height(),
        rebuilds = canvas.cache().rebuild_count(),
        "Frame written"
    );

    Ok(())
}

/// Narration on track 0, subtitles on track 1, stills on track 2.
fn demo_timeline(zoom: f64) -> (Timeline, Vec<Clip>) {
    let mut timeline = Timeline::new(Viewport::new(zoom, 0.0));
    let narration = vec![
        Clip::audio("Speaker 1: intro", 0, 0.0, 4.0, 0.0, 12.0),
        Clip::audio("Speaker 2: reply", 0, 4.0, 3.0, 4.0, 12.0),
    ];
    for clip in &narration {
        timeline.add_clip(clip.clone());
    }
    timeline.add_clip(Clip::subtitle("Hello there", 1, 0.5, 2.0, 0.5, 12.0));
    timeline.add_clip(Clip::subtitle("Nice to meet you", 1, 4.2, 2.3, 4.2, 12.0));
    timeline.add_clip(Clip::image("Page 1", 2, 0.0, 3.0));
    timeline.add_clip(Clip::image("Page 2", 2, 3.0, 3.0));
    timeline.add_clip(Clip::image("Page 3", 2, 6.0, 3.0));
    timeline.set_playhead(2.0);
    (timeline, narration)
}

/// Synthesize each narration clip's audio on a worker thread and hand the
/// envelopes back through the canvas inbox.
fn decode_waveforms(canvas: &TimelineCanvas, clips: &[Clip]) -> Result<()> {
    let handles: Vec<_> = clips
        .iter()
        .enumerate()
        .map(|(i, clip)| {
            let sender = canvas.waveform_sender();
            let clip_id = clip.id;
            let seconds = clip.kind.source().map_or(clip.duration, |s| s.source_length);
            let pitch = 110.0 * (i + 1) as f32;
            thread::spawn(move || {
                let count = (seconds * SAMPLE_RATE as f64) as usize;
                let samples: Vec<f32> = (0..count)
                    .map(|n| {
                        let t = n as f32 / SAMPLE_RATE as f32;
                        let syllable = (t * 3.0 * std::f32::consts::PI).sin().abs();
                        syllable * (t * pitch * std::f32::consts::TAU).sin()
                    })
                    .collect();
                let envelope =
                    WaveformEnvelope::from_samples(&samples, SAMPLE_RATE, PEAKS_PER_SECOND);
                sender.send(clip_id, envelope)
            })
        })
        .collect();

    for handle in handles {
        let delivered = handle
            .join()
            .map_err(|_| anyhow::anyhow!("waveform worker panicked"))?;
        if !delivered {
            warn!("Waveform inbox closed before delivery");
        }
    }
    Ok(())
}

/// Press, move in small steps at pointer rate while the repaint timer runs,
/// then release.
fn replay_gesture(
    canvas: &mut TimelineCanvas,
    clock: &mut Instant,
    modifiers: Modifiers,
    from: Point,
    to: Point,
) {
    const STEPS: u32 = 12;
    canvas.pointer_pressed(from, PointerButton::Primary, modifiers);
    let mut frames = 0;
    for step in 1..=STEPS {
        *clock += Duration::from_millis(4);
        let pos = from.lerp(to, step as f64 / STEPS as f64);
        canvas.pointer_moved(pos, *clock);
        if canvas.tick(*clock) {
            if let Err(e) = canvas.paint() {
                warn!(error = %e, "Frame dropped");
            }
            frames += 1;
        }
    }
    canvas.pointer_released(to);
    info!(frames, moves = STEPS, "Gesture replayed");
}

/// Route canvas events: undo commands go to the history, the rest is logged.
fn collect(canvas: &mut TimelineCanvas, history: &mut dyn UndoSink) {
    for event in canvas.take_events() {
        match event {
            CanvasEvent::UndoRecorded(command) => history.record(command),
            CanvasEvent::OverlapDetected(pairs) => warn!(pairs = pairs.len(), "Overlap detected"),
            CanvasEvent::ClipEditing(_) => {}
            other => info!(event = ?other, "Canvas event"),
        }
    }
}

fn lane_center(canvas: &TimelineCanvas, track: u32) -> f64 {
    let layout = canvas.config().layout;
    layout.track_y(track) + layout.track_height / 2.0
}

fn x_at(canvas: &TimelineCanvas, time: f64) -> f64 {
    canvas.timeline().viewport.time_to_x(time)
}
