// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Undo/redo tracking over persistent values.
//!
//! A [`History`] is a linear timeline of versions with a cursor. Committing
//! a new version while the cursor sits in the middle of the timeline discards
//! everything after the cursor, exactly like an editor's undo stack.
//!
//! Because the values in this crate are persistent, keeping every version is
//! cheap: consecutive versions share almost all of their structure, so the
//! timeline costs O(diff) per commit rather than O(n).
//!
//! # Examples
//!
//! ```
//! # #[macro_use] extern crate verso;
//! # use verso::History;
//! # fn main() {
//! let mut history = History::new(vector![1, 2]);
//! history.commit(history.current().update(0, 100));
//! assert_eq!(&vector![100, 2], history.current());
//! history.undo();
//! assert_eq!(&vector![1, 2], history.current());
//! history.redo();
//! assert_eq!(&vector![100, 2], history.current());
//! # }
//! ```

/// A linear undo/redo timeline over values of type `A`.
///
/// There is always a current version; a history is created from its first
/// one. [`undo`][undo] and [`redo`][redo] only move the cursor, so they are
/// O(1) and reversible. [`commit`][commit] makes the new version current and
/// drops any versions that had been undone past.
///
/// [undo]: #method.undo
/// [redo]: #method.redo
/// [commit]: #method.commit
#[derive(Clone, Debug)]
pub struct History<A> {
    versions: Vec<A>,
    current: usize,
}

impl<A> History<A> {
    /// Construct a history whose timeline holds just `initial`.
    #[must_use]
    pub fn new(initial: A) -> Self {
        History {
            versions: vec![initial],
            current: 0,
        }
    }

    /// Get the current version.
    #[inline]
    #[must_use]
    pub fn current(&self) -> &A {
        &self.versions[self.current]
    }

    /// The number of versions on the timeline, including undone ones that
    /// are still redoable.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.versions.len()
    }

    /// Always false: a history holds at least its initial version.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// The position of the current version on the timeline, starting at 0.
    #[inline]
    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    /// Whether there is an older version to [`undo`][undo] to.
    ///
    /// [undo]: #method.undo
    #[inline]
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.current > 0
    }

    /// Whether there is a newer version to [`redo`][redo] to.
    ///
    /// [redo]: #method.redo
    #[inline]
    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.current + 1 < self.versions.len()
    }

    /// Append `version` after the current one and make it current.
    ///
    /// Any versions after the cursor are discarded: committing after an undo
    /// forfeits the redo tail, like typing after an undo in an editor.
    pub fn commit(&mut self, version: A) {
        self.versions.truncate(self.current + 1);
        self.versions.push(version);
        self.current += 1;
    }

    /// Step the cursor back one version and return the new current version,
    /// or `None` if already at the initial version.
    pub fn undo(&mut self) -> Option<&A> {
        if self.current == 0 {
            return None;
        }
        self.current -= 1;
        Some(self.current())
    }

    /// Step the cursor forward one version and return the new current
    /// version, or `None` if already at the newest version.
    pub fn redo(&mut self) -> Option<&A> {
        if self.current + 1 >= self.versions.len() {
            return None;
        }
        self.current += 1;
        Some(self.current())
    }
}

impl<A: Default> Default for History<A> {
    fn default() -> Self {
        Self::new(A::default())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::vector::Vector;

    #[test]
    fn commit_undo_redo() {
        let mut history = History::new(0);
        history.commit(1);
        history.commit(2);
        assert_eq!(3, history.len());
        assert_eq!(&2, history.current());
        assert_eq!(Some(&1), history.undo());
        assert_eq!(Some(&0), history.undo());
        assert_eq!(None, history.undo());
        assert!(!history.can_undo());
        assert!(history.can_redo());
        assert_eq!(Some(&1), history.redo());
        assert_eq!(Some(&2), history.redo());
        assert_eq!(None, history.redo());
    }

    #[test]
    fn commit_after_undo_discards_the_redo_tail() {
        let mut history = History::new(0);
        history.commit(1);
        history.commit(2);
        history.undo();
        history.undo();
        history.commit(10);
        assert_eq!(2, history.len());
        assert_eq!(&10, history.current());
        assert_eq!(None, history.redo());
        assert_eq!(Some(&0), history.undo());
    }

    #[test]
    fn cursor_bookkeeping() {
        let mut history = History::new('a');
        assert_eq!(0, history.current_index());
        assert!(!history.can_undo());
        assert!(!history.can_redo());
        history.commit('b');
        assert_eq!(1, history.current_index());
        history.undo();
        assert_eq!(0, history.current_index());
        assert!(history.can_redo());
    }

    #[test]
    fn tracks_persistent_vectors_cheaply() {
        let mut history = History::new(Vector::new());
        for i in 0..100 {
            let mut next = history.current().clone();
            next.push_back(i);
            history.commit(next);
        }
        assert_eq!(100, history.current().len());
        for _ in 0..40 {
            history.undo();
        }
        assert_eq!(60, history.current().len());
        // Every version along the way is still intact.
        for i in 0..60 {
            assert_eq!(Some(&i), history.current().get(i));
        }
        history.commit(history.current().update(0, 1000));
        assert_eq!(62, history.len());
        assert_eq!(Some(&1000), history.current().get(0));
    }
}
