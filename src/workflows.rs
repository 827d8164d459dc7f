//! One function or session type per user action. Each workflow validates its
//! input, performs a single repository call and, when that call mutates
//! storage, reloads the roster view before handing control back. The
//! repository and view are passed in explicitly by the caller.

use log::{info, warn};

use crate::db::StudentRepository;
use crate::error::RosterError;
use crate::models::{Course, Student, StudentInput};
use crate::roster::RosterView;

/// Validate and store a new student, then reload and focus the new row.
/// Returns the id storage assigned.
pub fn insert_student(
    repo: &StudentRepository,
    view: &mut RosterView,
    input: &StudentInput,
) -> Result<i64, RosterError> {
    let input = input.validated().inspect_err(|err| warn!("insert rejected: {err}"))?;
    input
        .course
        .parse::<Course>()
        .inspect_err(|err| warn!("insert rejected: {err}"))?;
    let id = repo.insert(&input)?;
    view.reload(repo)?;
    view.select_id(id);
    info!("student {id} registered");
    Ok(id)
}

/// An edit started from the current selection. The id is captured as an
/// integer when the session opens; the row index is not kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSession {
    id: i64,
    initial: StudentInput,
    course_options: Vec<String>,
}

impl EditSession {
    /// Open an edit for the selected row, prefilled with its stored values.
    pub fn begin(view: &RosterView) -> Result<Self, RosterError> {
        let student = view.selected_student().ok_or_else(|| {
            warn!("edit requested without a selection");
            RosterError::NoSelection
        })?;
        Ok(Self {
            id: student.id,
            course_options: Course::options_including(&student.course),
            initial: StudentInput::from(&student),
        })
    }

    /// Id of the record being edited.
    pub fn id(&self) -> i64 {
        self.id
    }

    /// Field values as they were stored when the edit began.
    pub fn initial(&self) -> &StudentInput {
        &self.initial
    }

    /// Fixed course list, plus the stored course if it falls outside it.
    pub fn course_options(&self) -> &[String] {
        &self.course_options
    }

    /// Write the new values. The id is checked against storage first so an
    /// edit of a record removed since the last reload is reported instead of
    /// silently doing nothing.
    pub fn submit(
        &self,
        repo: &StudentRepository,
        view: &mut RosterView,
        input: &StudentInput,
    ) -> Result<(), RosterError> {
        let input = input
            .validated()
            .inspect_err(|err| warn!("update of student {} rejected: {err}", self.id))?;
        if !self.course_options.contains(&input.course) {
            warn!("update of student {} rejected: unknown course {:?}", self.id, input.course);
            return Err(RosterError::UnknownCourse(input.course));
        }
        if repo.find_by_id(self.id)?.is_none() {
            view.reload(repo)?;
            return Err(RosterError::NotFound(self.id));
        }
        repo.update_by_id(self.id, &input)?;
        view.reload(repo)?;
        view.select_id(self.id);
        info!("student {} updated", self.id);
        Ok(())
    }
}

/// A delete waiting on the yes/no confirmation. Dropping it is the "no"
/// answer; nothing touches storage until [`PendingDelete::confirm`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDelete {
    student: Student,
}

impl PendingDelete {
    /// Capture the selected row for confirmation. Fails with
    /// [`RosterError::NoSelection`] when nothing is selected.
    pub fn begin(view: &RosterView) -> Result<Self, RosterError> {
        let student = view.selected_student().ok_or_else(|| {
            warn!("delete requested without a selection");
            RosterError::NoSelection
        })?;
        Ok(Self { student })
    }

    /// The record as displayed when the delete was requested.
    pub fn student(&self) -> &Student {
        &self.student
    }

    /// Remove the record, reload, and hand back what was deleted so the
    /// caller can report it.
    pub fn confirm(
        self,
        repo: &StudentRepository,
        view: &mut RosterView,
    ) -> Result<Student, RosterError> {
        let id = self.student.id;
        if repo.find_by_id(id)?.is_none() {
            view.reload(repo)?;
            return Err(RosterError::NotFound(id));
        }
        repo.delete_by_id(id)?;
        view.reload(repo)?;
        info!("student {id} deleted");
        Ok(self.student)
    }
}

/// What a search found in storage and how much of it is now highlighted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOutcome {
    /// Every stored record with the searched name.
    pub matches: Vec<Student>,
    /// Rows marked in the view after the search.
    pub highlighted: usize,
    /// True when the view had to be reloaded to show every match.
    pub reloaded: bool,
}

/// Look up students by exact name and highlight them in the view. Matches
/// are resolved by id; if storage returned a record the snapshot does not
/// have yet, the view is reloaded first so every match can be shown. The
/// edit/delete selection is carried across that reload by id.
pub fn search(
    repo: &StudentRepository,
    view: &mut RosterView,
    name: &str,
) -> Result<SearchOutcome, RosterError> {
    if name.is_empty() {
        return Err(RosterError::Validation("name"));
    }
    let matches = repo.find_by_exact_name(name)?;
    let reloaded = matches.iter().any(|student| !view.contains_id(student.id));
    if reloaded {
        let selected_id = view.selected_student().map(|student| student.id);
        view.reload(repo)?;
        if let Some(id) = selected_id {
            view.select_id(id);
        }
    }
    let highlighted = view.highlight_ids(matches.iter().map(|student| student.id));
    info!("search for {name:?} matched {} students", matches.len());
    Ok(SearchOutcome {
        matches,
        highlighted,
        reloaded,
    })
}
