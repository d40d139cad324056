//! Undo/redo history of object-set snapshots.
//!
//! The history owns its snapshot timeline and cursor; `save`/`undo`/`redo`
//! are the only mutation surface. Callers may never touch the snapshot array
//! directly. Selection is not part of history; the state machine clears it
//! after every cursor move.

use crate::draw::AnnotationObject;

/// Append-only timeline of full object-set snapshots with a cursor.
///
/// Invariant: the cursor always points at the snapshot equal to the live
/// object set. The timeline starts with one empty snapshot so a fresh canvas
/// has no undo available.
#[derive(Debug, Clone, Default)]
pub struct History {
    snapshots: Vec<Vec<AnnotationObject>>,
    cursor: usize,
}

impl History {
    /// Creates a history seeded with a single empty snapshot.
    pub fn new() -> Self {
        Self {
            snapshots: vec![Vec::new()],
            cursor: 0,
        }
    }

    /// Appends a snapshot of `objects` after the cursor.
    ///
    /// Any snapshots beyond the cursor are discarded first: once a new edit
    /// is made after an undo, the redo branch is gone. The cursor then
    /// advances to the new end.
    pub fn save(&mut self, objects: &[AnnotationObject]) {
        self.snapshots.truncate(self.cursor + 1);
        self.snapshots.push(objects.to_vec());
        self.cursor = self.snapshots.len() - 1;
    }

    /// Moves the cursor one step back and returns that snapshot.
    ///
    /// Returns `None` (and changes nothing) when already at the first
    /// snapshot.
    pub fn undo(&mut self) -> Option<Vec<AnnotationObject>> {
        if !self.can_undo() {
            return None;
        }
        self.cursor -= 1;
        Some(self.snapshots[self.cursor].clone())
    }

    /// Moves the cursor one step forward and returns that snapshot.
    ///
    /// Returns `None` (and changes nothing) when already at the last
    /// snapshot.
    pub fn redo(&mut self) -> Option<Vec<AnnotationObject>> {
        if !self.can_redo() {
            return None;
        }
        self.cursor += 1;
        Some(self.snapshots[self.cursor].clone())
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.snapshots.len()
    }

    /// Discards the timeline and reseeds with a single empty snapshot.
    ///
    /// Used when a new background image is loaded and the annotation session
    /// starts over.
    pub fn reset(&mut self) {
        self.snapshots.clear();
        self.snapshots.push(Vec::new());
        self.cursor = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::{FactoryDefaults, IdAllocator, ToolKind, factory};
    use crate::util::Point;

    fn objects(n: usize) -> Vec<AnnotationObject> {
        let mut ids = IdAllocator::new();
        let defaults = FactoryDefaults::default();
        let mut out = Vec::new();
        for _ in 0..n {
            let obj = factory::create(
                ToolKind::Rectangle,
                Point::new(0.0, 0.0),
                &out,
                &mut ids,
                &defaults,
            );
            out.push(obj);
        }
        out
    }

    #[test]
    fn n_saves_then_n_undos_return_to_empty() {
        let mut history = History::new();
        for i in 1..=3 {
            history.save(&objects(i));
        }

        assert!(history.can_undo());
        assert_eq!(history.undo().unwrap().len(), 2);
        assert_eq!(history.undo().unwrap().len(), 1);
        assert_eq!(history.undo().unwrap().len(), 0);
        assert!(!history.can_undo());
        assert!(history.undo().is_none());
    }

    #[test]
    fn undo_on_empty_history_is_a_noop() {
        let mut history = History::new();
        assert!(!history.can_undo());
        assert!(history.undo().is_none());
        assert!(!history.can_redo());
    }

    #[test]
    fn redo_reapplies_undone_snapshot() {
        let mut history = History::new();
        history.save(&objects(1));
        history.save(&objects(2));

        assert_eq!(history.undo().unwrap().len(), 1);
        assert!(history.can_redo());
        assert_eq!(history.redo().unwrap().len(), 2);
        assert!(!history.can_redo());
    }

    #[test]
    fn save_after_undo_discards_redo_branch() {
        let mut history = History::new();
        history.save(&objects(1));
        history.save(&objects(2));
        history.undo();

        history.save(&objects(3));
        assert!(!history.can_redo());
        assert!(history.redo().is_none());
        // The discarded two-object snapshot is unreachable; undo goes to one.
        assert_eq!(history.undo().unwrap().len(), 1);
    }

    #[test]
    fn two_undos_after_three_saves_land_on_first_edit() {
        let mut history = History::new();
        history.save(&objects(1));
        history.save(&objects(2));
        history.save(&objects(3));

        history.undo();
        let snapshot = history.undo().unwrap();
        assert_eq!(snapshot.len(), 1);
    }

    #[test]
    fn reset_reseeds_empty_timeline() {
        let mut history = History::new();
        history.save(&objects(2));
        history.reset();
        assert!(!history.can_undo());
        assert!(!history.can_redo());
    }
}
