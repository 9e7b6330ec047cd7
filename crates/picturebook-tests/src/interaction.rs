//! Integration tests for pointer-driven editing.
//!
//! Exercises picturebook-ui driving picturebook-timeline: hit-testing,
//! snapping, ripple moves, trims and undo capture.

use picturebook_core::{limits, Viewport};
use picturebook_timeline::{Clip, EditKind, Modifiers, SnapKind, SnapResolver, UndoCommand};
use picturebook_ui::{CanvasEvent, PointerButton};
use std::time::Instant;

use crate::support::{at, canvas, click, drag};

fn undo_commands(events: &[CanvasEvent]) -> Vec<&UndoCommand> {
    events
        .iter()
        .filter_map(|e| match e {
            CanvasEvent::UndoRecorded(cmd) => Some(cmd),
            _ => None,
        })
        .collect()
}

// ── Hit-testing ────────────────────────────────────────────────

#[test]
fn topmost_clip_wins_without_selection() {
    let a = Clip::image("a", 0, 0.0, 4.0);
    let b = Clip::image("b", 0, 1.0, 4.0);
    let c = Clip::image("c", 0, 2.0, 4.0);
    let other = Clip::image("other", 1, 0.0, 4.0);
    let (c_id, other_id) = (c.id, other.id);
    let mut canvas = canvas(100.0, vec![a, b, c, other]);

    // A selection outside the hit stack does not change the winner.
    canvas.select(Some(other_id));
    let pos = at(&canvas, 3.0, 0);
    click(&mut canvas, pos);
    assert_eq!(canvas.selection(), Some(c_id));
}

#[test]
fn selected_clip_sticks_then_click_cycles() {
    let a = Clip::image("a", 0, 0.0, 4.0);
    let b = Clip::image("b", 0, 1.0, 4.0);
    let c = Clip::image("c", 0, 2.0, 4.0);
    let (a_id, b_id) = (a.id, b.id);
    let mut canvas = canvas(100.0, vec![a, b, c]);
    canvas.select(Some(b_id));

    let pos = at(&canvas, 3.0, 0);
    canvas.pointer_pressed(pos, PointerButton::Primary, Modifiers::NONE);
    assert_eq!(canvas.selection(), Some(b_id));
    canvas.pointer_released(pos);

    // A pure click on a sticky selection steps one clip down the stack.
    assert_eq!(canvas.selection(), Some(a_id));
    assert_eq!(canvas.take_events(), vec![CanvasEvent::ClipSelected(Some(a_id))]);
}

#[test]
fn sticky_drag_moves_the_selected_clip() {
    let a = Clip::image("a", 0, 0.0, 4.0);
    let b = Clip::image("b", 0, 1.0, 4.0);
    let a_id = a.id;
    let mut canvas = canvas(100.0, vec![a, b]);
    canvas.set_snap_enabled(false);
    canvas.select(Some(a_id));

    let from = at(&canvas, 2.0, 0);
    let to = at(&canvas, 2.5, 0);
    drag(&mut canvas, from, to, Modifiers::NONE);

    assert!((canvas.timeline().get(a_id).unwrap().start - 0.5).abs() < 1e-9);
    assert_eq!(canvas.selection(), Some(a_id));
}

// ── Snapping ───────────────────────────────────────────────────

#[test]
fn snap_threshold_halves_when_zoom_doubles() {
    let resolver = SnapResolver::new(limits::SNAP_THRESHOLD_PX);
    let near = resolver.threshold(&Viewport::new(100.0, 0.0));
    let far = resolver.threshold(&Viewport::new(200.0, 0.0));
    assert!((near - 0.1).abs() < 1e-12);
    assert!((far - near / 2.0).abs() < 1e-12);
}

#[test]
fn drag_snaps_start_to_playhead() {
    let clip = Clip::image("a", 0, 1.0, 1.0);
    let id = clip.id;
    let mut canvas = canvas(200.0, vec![clip]);
    canvas.set_playhead(5.0, false);

    // Threshold is 10px / 200 = 0.05s; the candidate start is 5.02.
    let from = at(&canvas, 1.5, 0);
    let to = at(&canvas, 5.52, 0);
    canvas.pointer_pressed(from, PointerButton::Primary, Modifiers::NONE);
    canvas.pointer_moved(to, Instant::now());

    let snap = canvas.controller().active_snap().unwrap();
    assert_eq!(snap.kind, SnapKind::Playhead);
    assert_eq!(snap.time, 5.0);
    canvas.pointer_released(to);

    assert_eq!(canvas.timeline().get(id).unwrap().start, 5.0);
    assert!(canvas.controller().active_snap().is_none());
}

#[test]
fn snapping_disabled_keeps_raw_position() {
    let clip = Clip::image("a", 0, 1.0, 1.0);
    let id = clip.id;
    let mut canvas = canvas(200.0, vec![clip]);
    canvas.set_playhead(5.0, false);
    canvas.set_snap_enabled(false);

    let from = at(&canvas, 1.5, 0);
    let to = at(&canvas, 5.52, 0);
    drag(&mut canvas, from, to, Modifiers::NONE);
    assert!((canvas.timeline().get(id).unwrap().start - 5.02).abs() < 1e-9);
}

// ── Ripple ─────────────────────────────────────────────────────

#[test]
fn ctrl_ripple_moves_later_clips_on_all_tracks() {
    let first = Clip::image("first", 0, 2.0, 1.0);
    let grabbed = Clip::image("grabbed", 0, 4.0, 1.0);
    let later = Clip::image("later", 1, 6.0, 1.0);
    let ids = [first.id, grabbed.id, later.id];
    let mut canvas = canvas(100.0, vec![first, grabbed, later]);

    let from = at(&canvas, 4.5, 0);
    let to = at(&canvas, 5.5, 0);
    drag(&mut canvas, from, to, Modifiers::CTRL);

    let starts: Vec<f64> = ids
        .iter()
        .map(|id| canvas.timeline().get(*id).unwrap().start)
        .collect();
    for (actual, expected) in starts.iter().zip([2.0, 5.0, 7.0]) {
        assert!((actual - expected).abs() < 1e-9, "{:?}", starts);
    }

    let events = canvas.take_events();
    let commands = undo_commands(&events);
    assert_eq!(commands.len(), 1);
    assert_eq!(commands[0].kind, EditKind::RippleMove);
    assert_eq!(commands[0].description(), "Ripple move 2 clips");
    assert!(commands[0].change_for(ids[0]).is_none());
}

#[test]
fn shift_ripple_stays_on_grabbed_track() {
    let grabbed = Clip::image("grabbed", 0, 4.0, 1.0);
    let same_track = Clip::image("same", 0, 6.0, 1.0);
    let other_track = Clip::image("other", 1, 6.0, 1.0);
    let ids = [grabbed.id, same_track.id, other_track.id];
    let mut canvas = canvas(100.0, vec![grabbed, same_track, other_track]);

    let from = at(&canvas, 4.5, 0);
    let to = at(&canvas, 5.5, 0);
    drag(&mut canvas, from, to, Modifiers::SHIFT);

    let tl = canvas.timeline();
    assert!((tl.get(ids[0]).unwrap().start - 5.0).abs() < 1e-9);
    assert!((tl.get(ids[1]).unwrap().start - 7.0).abs() < 1e-9);
    assert_eq!(tl.get(ids[2]).unwrap().start, 6.0);
}

// ── Trims ──────────────────────────────────────────────────────

#[test]
fn audio_right_trim_capped_by_source() {
    let clip = Clip::audio("vo", 0, 0.0, 3.0, 2.0, 10.0);
    let id = clip.id;
    let mut canvas = canvas(100.0, vec![clip]);

    // Grab 2px inside the right edge and pull far enough to ask for 9s.
    let from = at(&canvas, 2.98, 0);
    let to = at(&canvas, 8.98, 0);
    drag(&mut canvas, from, to, Modifiers::NONE);

    let clip = canvas.timeline().get(id).unwrap();
    assert!((clip.duration - 8.0).abs() < 1e-9);
    assert_eq!(clip.offset(), Some(2.0));

    let events = canvas.take_events();
    assert!(events.contains(&CanvasEvent::ClipEdited(id)));
    assert_eq!(undo_commands(&events)[0].description(), "Trim clip");
}

#[test]
fn linked_trim_keeps_neighbour_end() {
    let a = Clip::image("a", 0, 0.0, 5.0);
    let b = Clip::image("b", 0, 5.0, 4.0);
    let (a_id, b_id) = (a.id, b.id);
    let mut canvas = canvas(100.0, vec![a, b]);

    let from = at(&canvas, 4.98, 0);
    let to = at(&canvas, 5.98, 0);
    drag(&mut canvas, from, to, Modifiers::CTRL);

    let tl = canvas.timeline();
    let (a, b) = (tl.get(a_id).unwrap(), tl.get(b_id).unwrap());
    assert!((a.end() - 6.0).abs() < 1e-9);
    assert!((b.start - 6.0).abs() < 1e-9);
    assert!((b.duration - 3.0).abs() < 1e-9);
    assert!((b.end() - 9.0).abs() < 1e-9);

    let events = canvas.take_events();
    let commands = undo_commands(&events);
    assert_eq!(commands.len(), 1);
    assert_eq!(commands[0].kind, EditKind::LinkedTrim);
    assert_eq!(commands[0].len(), 2);
}

#[test]
fn linked_trim_keeps_audio_neighbour_inside_source() {
    // B starts at the very beginning of its source, so it cannot grow leftwards.
    let a = Clip::image("a", 0, 0.0, 5.0);
    let b = Clip::audio("b", 0, 5.0, 4.0, 0.0, 4.0);
    let (a_id, b_id) = (a.id, b.id);
    let mut canvas = canvas(100.0, vec![a, b]);

    let from = at(&canvas, 4.98, 0);
    let to = at(&canvas, 2.98, 0);
    drag(&mut canvas, from, to, Modifiers::CTRL);

    let tl = canvas.timeline();
    let b = tl.get(b_id).unwrap();
    assert_eq!(tl.get(a_id).unwrap().end(), 5.0);
    assert_eq!(b.start, 5.0);
    assert_eq!(b.source_end(), Some(4.0));
    assert!(undo_commands(&canvas.take_events()).is_empty());

    // Pushing right slides B's source window with its start.
    let to = at(&canvas, 5.98, 0);
    drag(&mut canvas, from, to, Modifiers::CTRL);
    let b = canvas.timeline().get(b_id).unwrap();
    assert!((b.start - 6.0).abs() < 1e-9);
    assert!((b.offset().unwrap() - 1.0).abs() < 1e-9);
    assert!((b.source_end().unwrap() - 4.0).abs() < 1e-9);
}

#[test]
fn trim_without_link_modifier_leaves_neighbour() {
    let a = Clip::image("a", 0, 0.0, 5.0);
    let b = Clip::image("b", 0, 5.0, 4.0);
    let (a_id, b_id) = (a.id, b.id);
    let mut canvas = canvas(100.0, vec![a, b]);

    let from = at(&canvas, 4.98, 0);
    let to = at(&canvas, 3.98, 0);
    drag(&mut canvas, from, to, Modifiers::NONE);

    let tl = canvas.timeline();
    assert!((tl.get(a_id).unwrap().duration - 4.0).abs() < 1e-9);
    assert_eq!(tl.get(b_id).unwrap().start, 5.0);
}

// ── Undo ───────────────────────────────────────────────────────

#[test]
fn click_emits_no_undo_and_drag_emits_one() {
    let clip = Clip::image("a", 0, 1.0, 2.0);
    let id = clip.id;
    let mut canvas = canvas(100.0, vec![clip]);

    let pos = at(&canvas, 2.0, 0);
    click(&mut canvas, pos);
    assert!(undo_commands(&canvas.take_events()).is_empty());

    let to = at(&canvas, 2.3, 0);
    drag(&mut canvas, pos, to, Modifiers::NONE);
    let events = canvas.take_events();
    let commands = undo_commands(&events);
    assert_eq!(commands.len(), 1);
    let change = commands[0].change_for(id).unwrap();
    assert!((change.after.start - change.before.start - 0.3).abs() < 1e-9);

    // The owner's undo stack writes the fields back.
    let command = commands[0].clone();
    command.revert(canvas.timeline_mut());
    assert_eq!(canvas.timeline().get(id).unwrap().start, 1.0);
    command.reapply(canvas.timeline_mut());
    assert!((canvas.timeline().get(id).unwrap().start - 1.3).abs() < 1e-9);
}

#[test]
fn cancel_restores_and_records_nothing() {
    let clip = Clip::image("a", 0, 1.0, 2.0);
    let id = clip.id;
    let mut canvas = canvas(100.0, vec![clip]);

    let from = at(&canvas, 2.0, 0);
    canvas.pointer_pressed(from, PointerButton::Primary, Modifiers::NONE);
    canvas.pointer_moved(at(&canvas, 4.0, 0), Instant::now());
    assert!(canvas.cancel());
    assert_eq!(canvas.timeline().get(id).unwrap().start, 1.0);

    canvas.pointer_released(from);
    assert!(undo_commands(&canvas.take_events()).is_empty());
}
