//! Table state container.
//!
//! [`TableState`] holds the authoritative state of the member table and
//! changes only through [`TableState::apply`]. Everything shown on screen
//! (filtered rows, the current page, page count) is derived on demand.
//!
//! # Example
//!
//! ```
//! use roster_lib::{Action, Record, TableState};
//!
//! let mut table = TableState::new();
//! table.apply(Action::Loaded(vec![
//!     Record::new(1, "Ann", "a@x.com", "admin"),
//!     Record::new(2, "Bob", "b@x.com", "member"),
//! ]));
//! table.apply(Action::SetSearch("bob".into()));
//!
//! assert_eq!(table.filtered().len(), 1);
//! assert_eq!(table.total_pages(), 1);
//! ```

mod edit;
mod filter;
mod page;
mod selection;

pub use edit::EditState;
pub use filter::{filter, matches};
pub use page::{clamp_page, page_bounds, page_slice, total_pages, PAGE_SIZE};
pub use selection::Selection;

use std::collections::HashSet;
use std::ops::RangeInclusive;

use log::{debug, warn};

use crate::model::Record;

/// An event that changes table state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// The initial load completed.
    Loaded(Vec<Record>),
    /// The search box changed.
    SetSearch(String),
    FirstPage,
    PrevPage,
    NextPage,
    LastPage,
    /// Jump to a page number (1-indexed).
    GoToPage(usize),
    /// Check or uncheck one row.
    ToggleRow(u64),
    /// The header checkbox.
    ToggleSelectAll,
    /// Start editing a record's name.
    BeginEdit(u64),
    /// The edit input changed.
    EditInput(String),
    SaveEdit,
    CancelEdit,
    /// Delete one record.
    Delete(u64),
    /// Delete every selected record.
    DeleteSelected,
}

/// Whether applying an action changed anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Changed,
    Unchanged,
}

impl Outcome {
    pub fn is_changed(self) -> bool {
        self == Self::Changed
    }

    fn from_changed(changed: bool) -> Self {
        if changed { Self::Changed } else { Self::Unchanged }
    }
}

/// Authoritative state of the member table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableState {
    records: Vec<Record>,
    search: String,
    selection: Selection,
    current_page: usize,
    edit: EditState,
}

impl Default for TableState {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            search: String::new(),
            selection: Selection::new(),
            current_page: 1,
            edit: EditState::Idle,
        }
    }
}

impl TableState {
    /// Creates an empty table on page 1.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a table already holding `records`.
    pub fn with_records(records: Vec<Record>) -> Self {
        let mut state = Self::new();
        state.apply(Action::Loaded(records));
        state
    }

    // =========================================================================
    // Authoritative state
    // =========================================================================

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn edit(&self) -> &EditState {
        &self.edit
    }

    pub fn is_selected(&self, id: u64) -> bool {
        self.selection.contains(id)
    }

    /// State of the select-all toggle.
    pub fn select_all(&self) -> bool {
        self.selection.all()
    }

    pub fn editing_id(&self) -> Option<u64> {
        self.edit.editing_id()
    }

    pub fn edit_buffer(&self) -> Option<&str> {
        self.edit.buffer()
    }

    pub fn record(&self, id: u64) -> Option<&Record> {
        self.records.iter().find(|r| r.id == id)
    }

    // =========================================================================
    // Derived state
    // =========================================================================

    /// Records matching the search term, in load order.
    pub fn filtered(&self) -> Vec<&Record> {
        filter(&self.records, &self.search)
    }

    /// Page count for the filtered set. Zero when nothing matches.
    pub fn total_pages(&self) -> usize {
        total_pages(self.filtered().len())
    }

    /// Rows shown on the current page.
    pub fn page_slice(&self) -> Vec<&Record> {
        page_slice(&self.filtered(), self.current_page).to_vec()
    }

    /// Page button numbers, `1..=total_pages`.
    pub fn page_numbers(&self) -> RangeInclusive<usize> {
        1..=self.total_pages()
    }

    // =========================================================================
    // Transitions
    // =========================================================================

    /// Applies one action.
    pub fn apply(&mut self, action: Action) -> Outcome {
        debug!("Table action: {:?}", action);

        match action {
            Action::Loaded(records) => {
                self.load(records);
                Outcome::Changed
            }
            Action::SetSearch(term) => {
                let changed = term != self.search || self.current_page != 1;
                self.search = term;
                self.current_page = 1;
                Outcome::from_changed(changed)
            }
            Action::FirstPage => self.go_to(1),
            Action::PrevPage => self.go_to(self.current_page.saturating_sub(1)),
            Action::NextPage => self.go_to(self.current_page.saturating_add(1)),
            Action::LastPage => self.go_to(self.total_pages()),
            Action::GoToPage(page) => self.go_to(page),
            Action::ToggleRow(id) => {
                if self.record(id).is_none() {
                    debug!("Ignoring toggle for unknown id {}", id);
                    return Outcome::Unchanged;
                }
                self.selection.toggle(id);
                Outcome::Changed
            }
            Action::ToggleSelectAll => {
                let visible: Vec<u64> = self.filtered().iter().map(|r| r.id).collect();
                self.selection.toggle_all(visible);
                Outcome::Changed
            }
            Action::BeginEdit(id) => {
                let Some(name) = self.record(id).map(|r| r.name.clone()) else {
                    debug!("Ignoring edit for unknown id {}", id);
                    return Outcome::Unchanged;
                };
                self.edit.begin(id, name);
                Outcome::Changed
            }
            Action::EditInput(text) => Outcome::from_changed(self.edit.input(text)),
            Action::SaveEdit => self.save_edit(),
            Action::CancelEdit => Outcome::from_changed(self.edit.finish().is_some()),
            Action::Delete(id) => {
                let before = self.records.len();
                self.records.retain(|r| r.id != id);
                if self.records.len() == before {
                    debug!("Ignoring delete for unknown id {}", id);
                    return Outcome::Unchanged;
                }
                self.selection.remove(id);
                self.records_changed();
                Outcome::Changed
            }
            Action::DeleteSelected => {
                let before = self.records.len();
                let selection = &self.selection;
                self.records.retain(|r| !selection.contains(r.id));
                let removed = before - self.records.len();
                let had_selection = !self.selection.is_empty();
                self.selection.clear();
                if removed > 0 {
                    debug!("Deleted {} selected records", removed);
                    self.records_changed();
                }
                Outcome::from_changed(removed > 0 || had_selection)
            }
        }
    }

    fn load(&mut self, records: Vec<Record>) {
        let mut seen = HashSet::with_capacity(records.len());
        self.records = records
            .into_iter()
            .filter(|r| {
                let first = seen.insert(r.id);
                if !first {
                    warn!("Dropping duplicate record id {}", r.id);
                }
                first
            })
            .collect();
        self.records_changed();
    }

    fn save_edit(&mut self) -> Outcome {
        let Some((id, name)) = self.edit.finish() else {
            return Outcome::Unchanged;
        };

        match self.records.iter_mut().find(|r| r.id == id) {
            Some(record) => {
                *record = record.with_name(name);
                self.records_changed();
            }
            None => debug!("Edited record {} no longer exists", id),
        }
        Outcome::Changed
    }

    fn go_to(&mut self, page: usize) -> Outcome {
        let page = clamp_page(page, self.total_pages());
        let changed = page != self.current_page;
        self.current_page = page;
        Outcome::from_changed(changed)
    }

    /// Restores invariants after `records` changed and restarts paging.
    fn records_changed(&mut self) {
        let ids: HashSet<u64> = self.records.iter().map(|r| r.id).collect();
        self.selection.retain(|id| ids.contains(&id));
        if let Some(id) = self.edit.editing_id() {
            if !ids.contains(&id) {
                self.edit.finish();
            }
        }
        self.current_page = 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ann_and_bob() -> TableState {
        TableState::with_records(vec![
            Record::new(1, "Ann", "a@x.com", "admin"),
            Record::new(2, "Bob", "b@x.com", "member"),
        ])
    }

    fn numbered(count: u64) -> TableState {
        TableState::with_records(
            (1..=count)
                .map(|i| Record::new(i, format!("User {i}"), format!("u{i}@x.com"), "member"))
                .collect(),
        )
    }

    fn ids(records: &[&Record]) -> Vec<u64> {
        records.iter().map(|r| r.id).collect()
    }

    #[test]
    fn test_new_table_is_empty() {
        let table = TableState::new();

        assert!(table.filtered().is_empty());
        assert!(table.page_slice().is_empty());
        assert_eq!(table.total_pages(), 0);
        assert_eq!(table.page_numbers().count(), 0);
        assert_eq!(table.current_page(), 1);
    }

    #[test]
    fn test_search_scenario() {
        let mut table = ann_and_bob();
        table.apply(Action::SetSearch("bob".into()));

        assert_eq!(ids(&table.filtered()), vec![2]);
        assert_eq!(table.total_pages(), 1);
    }

    #[test]
    fn test_search_resets_page() {
        let mut table = numbered(25);
        table.apply(Action::GoToPage(3));
        assert_eq!(table.current_page(), 3);

        table.apply(Action::SetSearch("user".into()));
        assert_eq!(table.current_page(), 1);
    }

    #[test]
    fn test_third_page_of_twenty_five() {
        let mut table = numbered(25);
        table.apply(Action::GoToPage(3));

        assert_eq!(table.total_pages(), 3);
        assert_eq!(ids(&table.page_slice()), (21..=25).collect::<Vec<_>>());
    }

    #[test]
    fn test_navigation_is_clamped() {
        let mut table = numbered(25);

        assert_eq!(table.apply(Action::PrevPage), Outcome::Unchanged);
        assert_eq!(table.current_page(), 1);

        table.apply(Action::LastPage);
        assert_eq!(table.current_page(), 3);
        table.apply(Action::NextPage);
        assert_eq!(table.current_page(), 3);

        table.apply(Action::GoToPage(99));
        assert_eq!(table.current_page(), 3);
        table.apply(Action::GoToPage(0));
        assert_eq!(table.current_page(), 1);

        table.apply(Action::NextPage);
        assert_eq!(table.current_page(), 2);
        table.apply(Action::FirstPage);
        assert_eq!(table.current_page(), 1);
    }

    #[test]
    fn test_last_page_with_no_rows_stays_on_first() {
        let mut table = TableState::new();
        table.apply(Action::LastPage);
        assert_eq!(table.current_page(), 1);
    }

    #[test]
    fn test_select_all_uses_filtered_set() {
        let mut table = numbered(25);
        table.apply(Action::SetSearch("User 1".into()));
        table.apply(Action::ToggleSelectAll);

        let expected: Vec<u64> = table.filtered().iter().map(|r| r.id).collect();
        assert_eq!(table.selection().ids().collect::<Vec<_>>(), expected);
        assert!(table.select_all());
        // 1 and 10..=19: spans past the first page
        assert_eq!(table.selection().len(), 11);

        table.apply(Action::ToggleSelectAll);
        assert!(table.selection().is_empty());
        assert!(!table.select_all());
    }

    #[test]
    fn test_toggle_unknown_row_is_ignored() {
        let mut table = ann_and_bob();
        assert_eq!(table.apply(Action::ToggleRow(42)), Outcome::Unchanged);
        assert!(table.selection().is_empty());
    }

    #[test]
    fn test_save_edit_scenario() {
        let mut table = ann_and_bob();
        table.apply(Action::BeginEdit(2));
        assert_eq!(table.edit_buffer(), Some("Bob"));

        table.apply(Action::EditInput("Robert".into()));
        table.apply(Action::SaveEdit);

        assert_eq!(table.record(2), Some(&Record::new(2, "Robert", "b@x.com", "member")));
        assert_eq!(table.editing_id(), None);
        assert_eq!(table.edit_buffer(), None);
    }

    #[test]
    fn test_cancel_edit_leaves_record() {
        let mut table = ann_and_bob();
        let before = table.records().to_vec();

        table.apply(Action::BeginEdit(1));
        table.apply(Action::EditInput("Zed".into()));
        table.apply(Action::CancelEdit);

        assert_eq!(table.records(), before.as_slice());
        assert_eq!(table.editing_id(), None);
    }

    #[test]
    fn test_begin_edit_on_other_row_discards_buffer() {
        let mut table = ann_and_bob();
        table.apply(Action::BeginEdit(1));
        table.apply(Action::EditInput("Anna".into()));
        table.apply(Action::BeginEdit(2));
        table.apply(Action::SaveEdit);

        assert_eq!(table.record(1).unwrap().name, "Ann");
        assert_eq!(table.record(2).unwrap().name, "Bob");
    }

    #[test]
    fn test_edit_unknown_id_is_ignored() {
        let mut table = ann_and_bob();
        assert_eq!(table.apply(Action::BeginEdit(7)), Outcome::Unchanged);
        assert_eq!(table.editing_id(), None);
    }

    #[test]
    fn test_delete_selected_scenario() {
        let mut table = numbered(3);
        table.apply(Action::ToggleRow(1));
        table.apply(Action::ToggleRow(2));
        table.apply(Action::DeleteSelected);

        assert_eq!(ids(&table.filtered()), vec![3]);
        assert!(table.selection().is_empty());
    }

    #[test]
    fn test_delete_removes_from_selection() {
        let mut table = ann_and_bob();
        table.apply(Action::ToggleRow(1));
        table.apply(Action::ToggleRow(2));
        table.apply(Action::Delete(1));

        assert!(table.record(1).is_none());
        assert_eq!(table.selection().ids().collect::<Vec<_>>(), vec![2]);
    }

    #[test]
    fn test_delete_edited_record_drops_edit() {
        let mut table = ann_and_bob();
        table.apply(Action::BeginEdit(2));
        table.apply(Action::Delete(2));

        assert_eq!(table.editing_id(), None);
        assert_eq!(table.apply(Action::SaveEdit), Outcome::Unchanged);
        assert_eq!(ids(&table.filtered()), vec![1]);
    }

    #[test]
    fn test_delete_unknown_id_is_ignored() {
        let mut table = ann_and_bob();
        assert_eq!(table.apply(Action::Delete(9)), Outcome::Unchanged);
        assert_eq!(table.records().len(), 2);
    }

    #[test]
    fn test_record_changes_reset_page() {
        let mut table = numbered(25);
        table.apply(Action::GoToPage(2));
        table.apply(Action::Delete(25));
        assert_eq!(table.current_page(), 1);
    }

    #[test]
    fn test_load_prunes_selection() {
        let mut table = ann_and_bob();
        table.apply(Action::ToggleRow(2));
        table.apply(Action::Loaded(vec![Record::new(1, "Ann", "a@x.com", "admin")]));

        assert!(table.selection().is_empty());
    }

    #[test]
    fn test_loaded_action_keeps_first_duplicate() {
        let mut table = ann_and_bob();
        table.apply(Action::Loaded(vec![
            Record::new(7, "Gus", "g@x.com", "member"),
            Record::new(7, "Gus Again", "g2@x.com", "admin"),
            Record::new(8, "Hal", "h@x.com", "member"),
        ]));

        let ids: Vec<u64> = table.records().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![7, 8]);
        assert_eq!(table.record(7).unwrap().email, "g@x.com");
    }

    #[test]
    fn test_load_keeps_first_duplicate() {
        let table = TableState::with_records(vec![
            Record::new(1, "Ann", "a@x.com", "admin"),
            Record::new(1, "Other", "o@x.com", "admin"),
        ]);
        assert_eq!(table.records().len(), 1);
        assert_eq!(table.record(1).unwrap().name, "Ann");
    }

    #[test]
    fn test_select_all_flag_survives_row_toggle() {
        let mut table = ann_and_bob();
        table.apply(Action::ToggleSelectAll);
        table.apply(Action::ToggleRow(1));

        assert!(table.select_all());
        assert!(!table.is_selected(1));
        assert!(table.is_selected(2));
    }
}
