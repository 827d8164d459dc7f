use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::models::{Course, StudentInput};
use crate::workflows::EditSession;

/// State of the insert/edit modal. Course is picked from a list rather than
/// typed so only offered values can be submitted.
#[derive(Debug, Clone)]
pub(crate) struct StudentForm {
    pub(crate) name: String,
    pub(crate) course_options: Vec<String>,
    pub(crate) course_index: usize,
    pub(crate) mobile: String,
    pub(crate) active: StudentField,
    pub(crate) error: Option<String>,
}

/// Fields available within the student form.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub(crate) enum StudentField {
    #[default]
    Name,
    Course,
    Mobile,
}

impl StudentForm {
    /// Blank form for registering a student, first course preselected.
    pub(crate) fn for_insert() -> Self {
        Self {
            name: String::new(),
            course_options: Course::options(),
            course_index: 0,
            mobile: String::new(),
            active: StudentField::Name,
            error: None,
        }
    }

    /// Form prefilled from the record an edit session was opened on, with the
    /// stored course preselected.
    pub(crate) fn for_edit(session: &EditSession) -> Self {
        let initial = session.initial();
        let course_options = session.course_options().to_vec();
        let course_index = course_options
            .iter()
            .position(|course| *course == initial.course)
            .unwrap_or(0);
        Self {
            name: initial.name.clone(),
            course_options,
            course_index,
            mobile: initial.mobile.clone(),
            active: StudentField::Name,
            error: None,
        }
    }

    pub(crate) fn next_field(&mut self) {
        self.active = match self.active {
            StudentField::Name => StudentField::Course,
            StudentField::Course => StudentField::Mobile,
            StudentField::Mobile => StudentField::Name,
        };
    }

    pub(crate) fn previous_field(&mut self) {
        self.active = match self.active {
            StudentField::Name => StudentField::Mobile,
            StudentField::Course => StudentField::Name,
            StudentField::Mobile => StudentField::Course,
        };
    }

    /// Step through the course list, wrapping at both ends.
    pub(crate) fn cycle_course(&mut self, offset: isize) {
        let len = self.course_options.len();
        if len == 0 {
            return;
        }
        let shifted = (self.course_index as isize + offset).rem_euclid(len as isize);
        self.course_index = shifted as usize;
    }

    /// Type into the active text field. The course field ignores typing.
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        match self.active {
            StudentField::Name => self.name.push(ch),
            StudentField::Mobile => self.mobile.push(ch),
            StudentField::Course => return false,
        }
        true
    }

    pub(crate) fn backspace(&mut self) {
        match self.active {
            StudentField::Name => {
                self.name.pop();
            }
            StudentField::Mobile => {
                self.mobile.pop();
            }
            StudentField::Course => {}
        }
    }

    pub(crate) fn course(&self) -> &str {
        self.course_options
            .get(self.course_index)
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Raw values handed to a workflow; validation happens there.
    pub(crate) fn input(&self) -> StudentInput {
        StudentInput::new(self.name.clone(), self.course(), self.mobile.clone())
    }

    /// Render a single line for the form widget.
    pub(crate) fn build_line(&self, field_name: &str, field: StudentField) -> Line<'static> {
        let is_active = self.active == field;
        let value = match field {
            StudentField::Name => self.name.clone(),
            StudentField::Course => format!("< {} >", self.course()),
            StudentField::Mobile => self.mobile.clone(),
        };

        let display = if value.is_empty() {
            "<required>".to_string()
        } else {
            value.clone()
        };

        let style = if is_active {
            Style::default().fg(Color::Yellow)
        } else if value.is_empty() {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        };

        Line::from(vec![
            Span::raw(format!("{field_name}: ")),
            Span::styled(display, style),
        ])
    }

    /// Character count of the requested text field, used for the cursor.
    pub(crate) fn value_len(&self, field: StudentField) -> usize {
        match field {
            StudentField::Name => self.name.chars().count(),
            StudentField::Course => 0,
            StudentField::Mobile => self.mobile.chars().count(),
        }
    }
}

/// State for an active name search.
#[derive(Debug, Default, Clone)]
pub(crate) struct SearchState {
    pub(crate) query: String,
}
