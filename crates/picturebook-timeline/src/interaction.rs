//! Drag/resize controller.
//!
//! A press either grabs an edge (resize) or a clip body (drag). Moves mutate the
//! timeline immediately; repaint pacing is the caller's business. A release
//! diffs the press-time snapshot against live state and yields at most one
//! [`UndoCommand`].

use picturebook_core::{EditorConfig, Point, TrackLayout, Viewport};
use smallvec::SmallVec;
use tracing::{debug, info};

use crate::clip::ClipId;
use crate::edge::{find_edge, Edge, EdgeHit};
use crate::hit_test::{cycle_selection, hit_stack, resolve_press_target, HitStack, Selection};
use crate::snapping::{SnapPoint, SnapResolver};
use crate::timeline::Timeline;
use crate::trim::{apply_trim, find_linked, follow_boundary, TrimLimits};
use crate::undo::{EditKind, Snapshot, UndoCommand};

// ── Input types ─────────────────────────────────────────────────

/// Keyboard modifiers held at press time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub ctrl: bool,
    pub shift: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        ctrl: false,
        shift: false,
    };
    pub const CTRL: Self = Self {
        ctrl: true,
        shift: false,
    };
    pub const SHIFT: Self = Self {
        ctrl: false,
        shift: true,
    };
}

/// Pointer position resolved against the view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cursor {
    /// Canvas position in logical pixels.
    pub pos: Point,
    /// Timeline time under the pointer (seconds).
    pub time: f64,
    /// Lane under the pointer, `None` over the ruler or between lanes.
    pub track: Option<u32>,
}

impl Cursor {
    pub fn new(pos: Point, time: f64, track: Option<u32>) -> Self {
        Self { pos, time, track }
    }

    /// Map a canvas position to time and lane.
    pub fn resolve(pos: Point, viewport: &Viewport, layout: &TrackLayout) -> Self {
        Self {
            pos,
            time: viewport.x_to_time(pos.x),
            track: layout.track_at_y(pos.y),
        }
    }
}

/// Which clips follow a drag. Fixed for the whole gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragScope {
    /// Only the grabbed clip.
    Single,
    /// Ripple: the grabbed clip and every later clip on its track.
    SameTrack,
    /// Ripple: the grabbed clip and every later clip on any track.
    AllTracks,
}

impl DragScope {
    /// Ctrl takes precedence over Shift.
    pub fn from_modifiers(modifiers: Modifiers) -> Self {
        if modifiers.ctrl {
            Self::AllTracks
        } else if modifiers.shift {
            Self::SameTrack
        } else {
            Self::Single
        }
    }
}

// ── State ───────────────────────────────────────────────────────

/// Interaction state. Each arm owns exactly what its gesture needs.
#[derive(Debug, Clone, Default)]
pub enum InteractionState {
    #[default]
    Idle,
    Dragging {
        clip_id: ClipId,
        anchor_time: f64,
        original: Snapshot,
        scope: DragScope,
        /// Hit stack at press, kept only when the press landed on the current selection.
        cycle_stack: Option<HitStack>,
        last_pos: Point,
        travel_px: f64,
    },
    Resizing {
        clip_id: ClipId,
        edge: Edge,
        anchor_time: f64,
        original: Snapshot,
        linked_clip_id: Option<ClipId>,
    },
}

impl InteractionState {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Clip the active gesture is acting on.
    pub fn active_clip(&self) -> Option<ClipId> {
        match self {
            Self::Idle => None,
            Self::Dragging { clip_id, .. } | Self::Resizing { clip_id, .. } => Some(*clip_id),
        }
    }
}

// ── Outcomes ────────────────────────────────────────────────────

/// What a press started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressAction {
    Resize { clip_id: ClipId, edge: Edge },
    Drag { clip_id: ClipId, scope: DragScope },
    /// Nothing under the cursor; the selection was cleared.
    Miss,
    /// A gesture is already active.
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PressOutcome {
    pub action: PressAction,
    pub selection_changed: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveOutcome {
    /// Some clip geometry changed.
    pub changed: bool,
    /// Clip being resized, if the gesture is a resize.
    pub editing: Option<ClipId>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReleaseOutcome {
    /// A gesture was active and has ended.
    pub ended: bool,
    pub undo: Option<UndoCommand>,
    pub selection_changed: bool,
    /// Dragged clip and its final start, when it moved more than the moved epsilon.
    pub moved: Option<(ClipId, f64)>,
    /// Resized clip.
    pub edited: Option<ClipId>,
    /// No pointer travel beyond the click slop.
    pub was_click: bool,
}

// ── Controller ──────────────────────────────────────────────────

/// Turns press/move/release into clip mutations.
#[derive(Debug, Clone)]
pub struct InteractionController {
    config: EditorConfig,
    snap: SnapResolver,
    state: InteractionState,
    selection: Selection,
    active_snap: Option<SnapPoint>,
}

impl InteractionController {
    pub fn new(config: EditorConfig) -> Self {
        let snap = SnapResolver {
            enabled: config.snap_enabled,
            snap_distance_px: config.snap_threshold_px,
        };
        Self {
            config,
            snap,
            state: InteractionState::Idle,
            selection: Selection::default(),
            active_snap: None,
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub fn selection(&self) -> Option<ClipId> {
        self.selection.get()
    }

    /// Select a clip directly. Returns true if the selection changed.
    pub fn select(&mut self, clip: Option<ClipId>) -> bool {
        self.selection.set(clip)
    }

    /// Anchor the active gesture is currently snapped to.
    pub fn active_snap(&self) -> Option<SnapPoint> {
        self.active_snap
    }

    pub fn set_snap_enabled(&mut self, enabled: bool) {
        self.snap.enabled = enabled;
    }

    /// Edge that a press at `cursor` would grab.
    pub fn hover_edge(&self, timeline: &Timeline, cursor: &Cursor) -> Option<EdgeHit> {
        let track = cursor.track?;
        let threshold = timeline.viewport.px_to_time(self.config.edge_threshold_px);
        find_edge(timeline, cursor.time, Some(track), threshold)
    }

    /// Start a gesture.
    pub fn press(&mut self, timeline: &Timeline, cursor: Cursor, modifiers: Modifiers) -> PressOutcome {
        if !self.state.is_idle() {
            return PressOutcome {
                action: PressAction::Ignored,
                selection_changed: false,
            };
        }
        self.active_snap = None;

        if let Some(hit) = self.hover_edge(timeline, &cursor) {
            return self.begin_resize(timeline, hit, cursor, modifiers);
        }

        let Some(track) = cursor.track else {
            return self.miss();
        };
        let stack = hit_stack(timeline, cursor.time, Some(track));
        let Some(target) = resolve_press_target(&stack, self.selection.get()) else {
            return self.miss();
        };
        let Some(grabbed) = timeline.get(target.clip_id) else {
            return self.miss();
        };

        let scope = DragScope::from_modifiers(modifiers);
        let mut members: SmallVec<[ClipId; 4]> = SmallVec::new();
        members.push(grabbed.id);
        if scope != DragScope::Single {
            let threshold = grabbed.start - self.config.ripple_epsilon;
            members.extend(
                timeline
                    .clips()
                    .iter()
                    .filter(|c| c.id != grabbed.id && c.start >= threshold)
                    .filter(|c| scope == DragScope::AllTracks || c.track == grabbed.track)
                    .map(|c| c.id),
            );
        }
        let original = Snapshot::capture(timeline, &members);
        let selection_changed = self.selection.set(Some(grabbed.id));
        let cycle_stack = (target.sticky && stack.len() > 1).then_some(stack);

        debug!(
            clip = %grabbed.id,
            ?scope,
            members = original.len(),
            sticky = target.sticky,
            "Drag started"
        );
        self.state = InteractionState::Dragging {
            clip_id: grabbed.id,
            anchor_time: cursor.time,
            original,
            scope,
            cycle_stack,
            last_pos: cursor.pos,
            travel_px: 0.0,
        };
        PressOutcome {
            action: PressAction::Drag {
                clip_id: target.clip_id,
                scope,
            },
            selection_changed,
        }
    }

    fn begin_resize(
        &mut self,
        timeline: &Timeline,
        hit: EdgeHit,
        cursor: Cursor,
        modifiers: Modifiers,
    ) -> PressOutcome {
        let linked_clip_id = if modifiers.ctrl {
            timeline
                .get(hit.clip_id)
                .and_then(|primary| find_linked(timeline, primary, hit.edge, self.config.link_epsilon))
        } else {
            None
        };

        let mut members: SmallVec<[ClipId; 4]> = SmallVec::new();
        members.push(hit.clip_id);
        members.extend(linked_clip_id);
        let original = Snapshot::capture(timeline, &members);
        let selection_changed = self.selection.set(Some(hit.clip_id));

        debug!(
            clip = %hit.clip_id,
            edge = ?hit.edge,
            linked = linked_clip_id.is_some(),
            "Resize started"
        );
        self.state = InteractionState::Resizing {
            clip_id: hit.clip_id,
            edge: hit.edge,
            anchor_time: cursor.time,
            original,
            linked_clip_id,
        };
        PressOutcome {
            action: PressAction::Resize {
                clip_id: hit.clip_id,
                edge: hit.edge,
            },
            selection_changed,
        }
    }

    fn miss(&mut self) -> PressOutcome {
        PressOutcome {
            action: PressAction::Miss,
            selection_changed: self.selection.clear(),
        }
    }

    /// Apply pointer motion to the active gesture.
    pub fn move_to(&mut self, timeline: &mut Timeline, cursor: Cursor) -> MoveOutcome {
        let threshold = self.snap.threshold(&timeline.viewport);
        match &mut self.state {
            InteractionState::Idle => MoveOutcome::default(),
            InteractionState::Dragging {
                clip_id,
                anchor_time,
                original,
                last_pos,
                travel_px,
                ..
            } => {
                *travel_px += (cursor.pos - *last_pos).length();
                *last_pos = cursor.pos;

                let Some(grabbed) = original.get(*clip_id) else {
                    return MoveOutcome::default();
                };
                let dt = cursor.time - *anchor_time;
                let anchors = SnapResolver::collect_anchors(timeline, &original.ids());
                let snapped = self
                    .snap
                    .snap_move(grabbed.start + dt, grabbed.duration, &anchors, threshold);
                let new_start = snapped.start.max(0.0);
                let actual_dt = new_start - grabbed.start;
                self.active_snap = snapped.anchor.filter(|_| new_start == snapped.start);

                let mut changed = false;
                for orig in original.clips() {
                    if let Some(clip) = timeline.get_mut(orig.id) {
                        let start = (orig.start + actual_dt).max(0.0);
                        changed |= clip.start != start;
                        clip.start = start;
                    }
                }
                MoveOutcome {
                    changed,
                    editing: None,
                }
            }
            InteractionState::Resizing {
                clip_id,
                edge,
                anchor_time,
                original,
                linked_clip_id,
            } => {
                let Some(primary) = original.get(*clip_id) else {
                    return MoveOutcome::default();
                };
                let from = match edge {
                    Edge::Left => primary.start,
                    Edge::Right => primary.end(),
                };
                let mut boundary = from + (cursor.time - *anchor_time);
                let anchors = SnapResolver::collect_anchors(timeline, &original.ids());
                let snapped = self.snap.find_snap(boundary, &anchors, threshold);
                if let Some(sp) = snapped {
                    boundary = sp.time;
                }

                let linked_original = linked_clip_id.and_then(|id| original.get(id));
                let mut limits = TrimLimits::new(self.config.min_duration);
                if let Some(neighbour) = linked_original {
                    limits = limits.with_neighbour(*edge, neighbour);
                }

                let Some(clip) = timeline.get_mut(*clip_id) else {
                    return MoveOutcome::default();
                };
                let before = clip.fields();
                let applied = apply_trim(clip, primary, *edge, boundary, &limits);
                let mut changed = clip.fields() != before;
                self.active_snap = snapped.filter(|sp| sp.time == applied);

                if let Some(neighbour) = linked_original {
                    if let Some(linked) = timeline.get_mut(neighbour.id) {
                        let before = linked.fields();
                        follow_boundary(linked, neighbour, *edge, applied);
                        changed |= linked.fields() != before;
                    }
                }
                MoveOutcome {
                    changed,
                    editing: Some(*clip_id),
                }
            }
        }
    }

    /// Finish the active gesture and return to idle.
    pub fn release(&mut self, timeline: &Timeline, cursor: Cursor) -> ReleaseOutcome {
        self.active_snap = None;
        let outcome = match std::mem::take(&mut self.state) {
            InteractionState::Idle => ReleaseOutcome::default(),
            InteractionState::Dragging {
                clip_id,
                original,
                scope,
                cycle_stack,
                last_pos,
                travel_px,
                ..
            } => {
                let travel_px = travel_px + (cursor.pos - last_pos).length();
                let was_click = travel_px <= self.config.click_slop_px;
                let kind = match scope {
                    DragScope::Single => EditKind::Move,
                    DragScope::SameTrack | DragScope::AllTracks => EditKind::RippleMove,
                };
                let undo = original.diff(timeline, kind);

                let moved = match (original.get(clip_id), timeline.get(clip_id)) {
                    (Some(before), Some(after))
                        if (after.start - before.start).abs() > self.config.moved_epsilon =>
                    {
                        Some((clip_id, after.start))
                    }
                    _ => None,
                };

                let mut selection_changed = false;
                if was_click {
                    if let Some(next) = cycle_stack.and_then(|stack| cycle_selection(&stack, clip_id)) {
                        selection_changed = self.selection.set(Some(next));
                        debug!(clip = %next, "Selection cycled");
                    }
                }

                ReleaseOutcome {
                    ended: true,
                    undo,
                    selection_changed,
                    moved,
                    edited: None,
                    was_click,
                }
            }
            InteractionState::Resizing {
                clip_id,
                original,
                linked_clip_id,
                ..
            } => {
                let kind = if linked_clip_id.is_some() {
                    EditKind::LinkedTrim
                } else {
                    EditKind::Trim
                };
                ReleaseOutcome {
                    ended: true,
                    undo: original.diff(timeline, kind),
                    selection_changed: false,
                    moved: None,
                    edited: Some(clip_id),
                    was_click: false,
                }
            }
        };

        if let Some(cmd) = &outcome.undo {
            info!(
                edit = %cmd.description(),
                clips = cmd.len(),
                "Undo command recorded"
            );
        }
        outcome
    }

    /// Abort the active gesture, restoring every touched clip. No undo command is produced.
    pub fn cancel(&mut self, timeline: &mut Timeline) -> bool {
        self.active_snap = None;
        match std::mem::take(&mut self.state) {
            InteractionState::Idle => false,
            InteractionState::Dragging { original, .. }
            | InteractionState::Resizing { original, .. } => {
                original.restore(timeline);
                debug!(clips = original.len(), "Interaction cancelled");
                true
            }
        }
    }
}

impl Default for InteractionController {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}
