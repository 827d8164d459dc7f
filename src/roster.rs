//! In-memory projection of the `students` table shown by the front-end.
//!
//! The view is never authoritative. It is rebuilt wholesale from the
//! repository on every reload and only hands out copies of its rows, so a
//! workflow can never act on a record reference that outlived a reload.

use std::collections::HashSet;

use log::debug;

use crate::db::StudentRepository;
use crate::error::RosterError;
use crate::models::Student;

#[derive(Debug, Default)]
pub struct RosterView {
    rows: Vec<Student>,
    /// Single-row selection driving edit and delete.
    selected: Option<usize>,
    /// Ids marked by the last search. Display only, may hold many rows.
    highlighted: HashSet<i64>,
}

impl RosterView {
    /// Empty view with no rows loaded.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a view already populated from storage.
    pub fn load(repo: &StudentRepository) -> Result<Self, RosterError> {
        let mut view = Self::new();
        view.reload(repo)?;
        Ok(view)
    }

    /// Replace every row with a fresh `list_all` and drop both the selection
    /// and the search highlights. On failure the previous snapshot is kept.
    pub fn reload(&mut self, repo: &StudentRepository) -> Result<(), RosterError> {
        let rows = repo.list_all()?;
        debug!("roster reloaded with {} rows", rows.len());
        self.rows = rows;
        self.selected = None;
        self.highlighted.clear();
        Ok(())
    }

    /// Rows of the last loaded snapshot, in storage order.
    pub fn rows(&self) -> &[Student] {
        &self.rows
    }

    /// Number of rows in the snapshot.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the snapshot holds no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Select the row at `index`; an out-of-range index clears the selection.
    pub fn select_row(&mut self, index: usize) {
        self.selected = (index < self.rows.len()).then_some(index);
    }

    /// Drop the edit/delete selection.
    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Index of the selected row, if any.
    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    /// Copy of the selected row, if any.
    pub fn selected_student(&self) -> Option<Student> {
        self.selected
            .and_then(|index| self.rows.get(index))
            .cloned()
    }

    /// Focus the row carrying `id`. Returns false and leaves the selection
    /// untouched when the id is not in the current snapshot.
    pub fn select_id(&mut self, id: i64) -> bool {
        match self.rows.iter().position(|student| student.id == id) {
            Some(index) => {
                self.selected = Some(index);
                true
            }
            None => false,
        }
    }

    /// Move the selection by `offset`, clamped to the table. With nothing
    /// selected the cursor starts from the top.
    pub fn move_selection(&mut self, offset: isize) {
        if self.rows.is_empty() {
            self.selected = None;
            return;
        }
        let last = self.rows.len() - 1;
        let next = match self.selected {
            Some(current) => current.saturating_add_signed(offset).min(last),
            None if offset < 0 => 0,
            None => offset.saturating_sub(1).clamp(0, last as isize) as usize,
        };
        self.selected = Some(next);
    }

    /// Select the first row when there is one.
    pub fn select_first(&mut self) {
        if !self.rows.is_empty() {
            self.selected = Some(0);
        }
    }

    /// Select the last row when there is one.
    pub fn select_last(&mut self) {
        if !self.rows.is_empty() {
            self.selected = Some(self.rows.len() - 1);
        }
    }

    /// Mark every row whose name equals `name` exactly. Replaces any earlier
    /// highlight and returns the number of rows marked.
    pub fn highlight_matches(&mut self, name: &str) -> usize {
        self.highlighted = self
            .rows
            .iter()
            .filter(|student| student.name == name)
            .map(|student| student.id)
            .collect();
        self.highlighted.len()
    }

    /// Mark the rows whose ids appear in `ids`. Ids absent from the snapshot
    /// are ignored; the count of rows actually marked is returned.
    pub fn highlight_ids<I>(&mut self, ids: I) -> usize
    where
        I: IntoIterator<Item = i64>,
    {
        let wanted: HashSet<i64> = ids.into_iter().collect();
        self.highlighted = self
            .rows
            .iter()
            .map(|student| student.id)
            .filter(|id| wanted.contains(id))
            .collect();
        self.highlighted.len()
    }

    /// Remove every search highlight.
    pub fn clear_highlights(&mut self) {
        self.highlighted.clear();
    }

    /// Whether the row at `index` is marked by the last search.
    pub fn is_highlighted(&self, index: usize) -> bool {
        self.rows
            .get(index)
            .is_some_and(|student| self.highlighted.contains(&student.id))
    }

    /// Number of rows currently marked by a search.
    pub fn highlight_count(&self) -> usize {
        self.highlighted.len()
    }

    /// Whether a row with `id` is part of the current snapshot.
    pub fn contains_id(&self, id: i64) -> bool {
        self.rows.iter().any(|student| student.id == id)
    }
}
