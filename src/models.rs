//! Domain models that mirror the `students` table and get passed between the
//! repository, the roster view and the terminal front-end. They stay plain
//! data holders so persistence and presentation logic live elsewhere.

use std::fmt;
use std::str::FromStr;

use crate::error::RosterError;

#[derive(Debug, Clone, PartialEq, Eq)]
/// One stored student record.
pub struct Student {
    /// Primary key assigned by SQLite on insert. This is the only value used to
    /// correlate a displayed row with its stored record.
    pub id: i64,
    /// Display name; not unique.
    pub name: String,
    /// Stored as raw text rather than [`Course`] so records written with a
    /// course outside the current fixed set still load and stay editable.
    pub course: String,
    /// Free-form phone number; no format is enforced.
    pub mobile: String,
}

/// The fixed set of courses offered in the insert and edit forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Course {
    Biology,
    Math,
    Astronomy,
    Physics,
}

impl Course {
    /// Every course in the order the forms present them.
    pub const ALL: [Course; 4] = [
        Course::Biology,
        Course::Math,
        Course::Astronomy,
        Course::Physics,
    ];

    /// Text stored in the `course` column for this course.
    pub fn as_str(self) -> &'static str {
        match self {
            Course::Biology => "Biology",
            Course::Math => "Math",
            Course::Astronomy => "Astronomy",
            Course::Physics => "Physics",
        }
    }

    /// Option list for an edit form. The stored value is appended when it is
    /// not part of the fixed set so the form can always pre-select it.
    pub fn options_including(current: &str) -> Vec<String> {
        let mut options: Vec<String> = Course::ALL
            .iter()
            .map(|course| course.as_str().to_string())
            .collect();
        if !current.is_empty() && !options.iter().any(|option| option == current) {
            options.push(current.to_string());
        }
        options
    }

    /// Option list for a fresh insert form.
    pub fn options() -> Vec<String> {
        Course::options_including("")
    }
}

impl fmt::Display for Course {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Course {
    type Err = RosterError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Course::ALL
            .into_iter()
            .find(|course| course.as_str() == value)
            .ok_or_else(|| RosterError::UnknownCourse(value.to_string()))
    }
}

/// Raw field values collected by the presentation layer for an insert or an
/// update. Nothing here is trusted until a workflow validates it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentInput {
    pub name: String,
    /// Must name an offered course; edits may also keep the stored one.
    pub course: String,
    pub mobile: String,
}

impl StudentInput {
    /// Bundle raw field values without checking them.
    pub fn new(
        name: impl Into<String>,
        course: impl Into<String>,
        mobile: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            course: course.into(),
            mobile: mobile.into(),
        }
    }

    /// Reject blank fields and return a trimmed copy ready for storage.
    pub fn validated(&self) -> Result<StudentInput, RosterError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(RosterError::Validation("name"));
        }
        let course = self.course.trim();
        if course.is_empty() {
            return Err(RosterError::Validation("course"));
        }
        let mobile = self.mobile.trim();
        if mobile.is_empty() {
            return Err(RosterError::Validation("mobile"));
        }
        Ok(StudentInput::new(name, course, mobile))
    }
}

impl From<&Student> for StudentInput {
    fn from(student: &Student) -> Self {
        StudentInput::new(
            student.name.clone(),
            student.course.clone(),
            student.mobile.clone(),
        )
    }
}
