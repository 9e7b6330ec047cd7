//! Undo capture: snapshot on press, diff on release.
//!
//! The editor never stores history itself. It hands each finished
//! [`UndoCommand`] to an [`UndoSink`] owned by the host application.

use smallvec::SmallVec;

use crate::clip::{Clip, ClipFields, ClipId};
use crate::timeline::Timeline;

// ── Snapshot ────────────────────────────────────────────────────

/// Immutable copy of every clip an interaction may touch, taken at press time.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    clips: SmallVec<[Clip; 4]>,
}

impl Snapshot {
    /// Copy the listed clips out of the timeline. Unknown ids are skipped.
    pub fn capture(timeline: &Timeline, ids: &[ClipId]) -> Self {
        Self {
            clips: ids
                .iter()
                .filter_map(|id| timeline.get(*id).cloned())
                .collect(),
        }
    }

    pub fn get(&self, id: ClipId) -> Option<&Clip> {
        self.clips.iter().find(|clip| clip.id == id)
    }

    pub fn contains(&self, id: ClipId) -> bool {
        self.get(id).is_some()
    }

    pub fn clips(&self) -> &[Clip] {
        &self.clips
    }

    pub fn ids(&self) -> SmallVec<[ClipId; 4]> {
        self.clips.iter().map(|clip| clip.id).collect()
    }

    pub fn len(&self) -> usize {
        self.clips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }

    /// Write every captured clip's fields back into the timeline.
    pub fn restore(&self, timeline: &mut Timeline) {
        for original in &self.clips {
            if let Some(clip) = timeline.get_mut(original.id) {
                clip.apply_fields(&original.fields());
            }
        }
    }

    /// Compare live state against the snapshot.
    ///
    /// Returns `None` when no captured clip changed.
    pub fn diff(&self, timeline: &Timeline, kind: EditKind) -> Option<UndoCommand> {
        let changes: SmallVec<[ClipChange; 4]> = self
            .clips
            .iter()
            .filter_map(|original| {
                let live = timeline.get(original.id)?;
                let before = original.fields();
                let after = live.fields();
                (before != after).then_some(ClipChange {
                    clip_id: original.id,
                    before,
                    after,
                })
            })
            .collect();

        if changes.is_empty() {
            None
        } else {
            Some(UndoCommand { kind, changes })
        }
    }
}

// ── Commands ────────────────────────────────────────────────────

/// What kind of gesture produced a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKind {
    Move,
    RippleMove,
    Trim,
    LinkedTrim,
}

/// One clip's fields before and after an edit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipChange {
    pub clip_id: ClipId,
    pub before: ClipFields,
    pub after: ClipFields,
}

/// The payload emitted once per press/release cycle with a net change.
#[derive(Debug, Clone, PartialEq)]
pub struct UndoCommand {
    pub kind: EditKind,
    pub changes: SmallVec<[ClipChange; 4]>,
}

impl UndoCommand {
    /// Restore the `before` fields.
    pub fn revert(&self, timeline: &mut Timeline) {
        for change in &self.changes {
            if let Some(clip) = timeline.get_mut(change.clip_id) {
                clip.apply_fields(&change.before);
            }
        }
    }

    /// Restore the `after` fields.
    pub fn reapply(&self, timeline: &mut Timeline) {
        for change in &self.changes {
            if let Some(clip) = timeline.get_mut(change.clip_id) {
                clip.apply_fields(&change.after);
            }
        }
    }

    /// Short label for an undo menu.
    pub fn description(&self) -> String {
        match self.kind {
            EditKind::Move => "Move clip".into(),
            EditKind::RippleMove => format!("Ripple move {} clips", self.changes.len()),
            EditKind::Trim => "Trim clip".into(),
            EditKind::LinkedTrim => "Linked trim".into(),
        }
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn change_for(&self, id: ClipId) -> Option<&ClipChange> {
        self.changes.iter().find(|c| c.clip_id == id)
    }
}

/// Receiver of finished edit commands (the host's undo stack).
pub trait UndoSink {
    fn record(&mut self, command: UndoCommand);
}

impl UndoSink for Vec<UndoCommand> {
    fn record(&mut self, command: UndoCommand) {
        self.push(command);
    }
}

// ── Tests ───────────────────────────────────────────────────────
