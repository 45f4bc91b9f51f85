//! Row selection.

use std::collections::BTreeSet;

/// Checked record ids plus the select-all control's toggle.
///
/// `all` only changes through [`toggle_all`](Self::toggle_all). Checking
/// every visible row by hand does not turn it on, and unchecking one row
/// does not turn it off.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: BTreeSet<u64>,
    all: bool,
}

impl Selection {
    /// Creates an empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or removes one id.
    pub fn toggle(&mut self, id: u64) {
        if !self.ids.remove(&id) {
            self.ids.insert(id);
        }
    }

    /// Flips the select-all toggle.
    ///
    /// Turning it on replaces the selection with `visible`; turning it off
    /// clears the selection.
    pub fn toggle_all(&mut self, visible: impl IntoIterator<Item = u64>) {
        self.all = !self.all;
        self.ids = if self.all {
            visible.into_iter().collect()
        } else {
            BTreeSet::new()
        };
    }

    /// Removes every id.
    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Drops ids for which `keep` returns `false`.
    pub fn retain(&mut self, mut keep: impl FnMut(u64) -> bool) {
        self.ids.retain(|id| keep(*id));
    }

    /// Removes one id, returning whether it was selected.
    pub fn remove(&mut self, id: u64) -> bool {
        self.ids.remove(&id)
    }

    pub fn contains(&self, id: u64) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// State of the select-all toggle.
    pub fn all(&self) -> bool {
        self.all
    }

    /// Selected ids in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = u64> + '_ {
        self.ids.iter().copied()
    }
}
