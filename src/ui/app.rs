use std::mem;

use crossterm::event::KeyCode;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap};
use ratatui::Frame;

use crate::db::StudentRepository;
use crate::roster::RosterView;
use crate::workflows::{insert_student, search, EditSession, PendingDelete};

use super::forms::{SearchState, StudentField, StudentForm};
use super::helpers::{centered_rect, cursor_column, search_summary};

/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
/// Rows skipped by PageUp / PageDown.
const PAGE_STEP: isize = 10;
const ABOUT_TEXT: &str = "Student Roster keeps a list of students, their course and \
mobile number in a local SQLite file. Feel free to modify and reuse it.";

/// Fine-grained modes layered over the student table.
enum Mode {
    Normal,
    Inserting(StudentForm),
    Editing {
        session: EditSession,
        form: StudentForm,
    },
    ConfirmDelete(PendingDelete),
    Searching(SearchState),
    About,
}

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer.
enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Central application state shared across the TUI.
pub struct App {
    repo: StudentRepository,
    view: RosterView,
    mode: Mode,
    status: Option<StatusMessage>,
}

impl App {
    /// Wrap an already loaded roster; the first frame draws it as is.
    pub fn new(repo: StudentRepository, view: RosterView) -> Self {
        Self {
            repo,
            view,
            mode: Mode::Normal,
            status: None,
        }
    }

    /// Feed one key press through the current mode. Returns true when the
    /// user asked to quit.
    pub fn handle_key(&mut self, code: KeyCode) -> bool {
        let mut exit = false;
        let mode = mem::replace(&mut self.mode, Mode::Normal);

        self.mode = match mode {
            Mode::Normal => self.handle_normal_key(code, &mut exit),
            Mode::Inserting(form) => self.handle_insert(code, form),
            Mode::Editing { session, form } => self.handle_edit(code, session, form),
            Mode::ConfirmDelete(pending) => self.handle_confirm_delete(code, pending),
            Mode::Searching(state) => self.handle_search(code, state),
            Mode::About => Mode::Normal,
        };

        exit
    }

    fn handle_normal_key(&mut self, code: KeyCode, exit: &mut bool) -> Mode {
        match code {
            KeyCode::Char('q') => *exit = true,
            KeyCode::Up => self.view.move_selection(-1),
            KeyCode::Down => self.view.move_selection(1),
            KeyCode::PageUp => self.view.move_selection(-PAGE_STEP),
            KeyCode::PageDown => self.view.move_selection(PAGE_STEP),
            KeyCode::Home => self.view.select_first(),
            KeyCode::End => self.view.select_last(),
            KeyCode::Esc => {
                self.view.clear_highlights();
                self.clear_status();
            }
            KeyCode::Char('+') | KeyCode::Char('a') => {
                self.clear_status();
                return Mode::Inserting(StudentForm::for_insert());
            }
            KeyCode::Char('e') | KeyCode::Char('E') => match EditSession::begin(&self.view) {
                Ok(session) => {
                    self.clear_status();
                    let form = StudentForm::for_edit(&session);
                    return Mode::Editing { session, form };
                }
                Err(err) => self.set_status(err.to_string(), StatusKind::Error),
            },
            KeyCode::Char('-') | KeyCode::Char('d') => match PendingDelete::begin(&self.view) {
                Ok(pending) => {
                    self.clear_status();
                    return Mode::ConfirmDelete(pending);
                }
                Err(err) => self.set_status(err.to_string(), StatusKind::Error),
            },
            KeyCode::Char('f') | KeyCode::Char('/') => {
                self.clear_status();
                return Mode::Searching(SearchState::default());
            }
            KeyCode::Char('r') | KeyCode::Char('R') => match self.view.reload(&self.repo) {
                Ok(()) => self.set_status(
                    format!("Loaded {} students.", self.view.len()),
                    StatusKind::Info,
                ),
                Err(err) => self.set_status(err.to_string(), StatusKind::Error),
            },
            KeyCode::Char('?') => return Mode::About,
            _ => {}
        }
        Mode::Normal
    }

    fn handle_insert(&mut self, code: KeyCode, mut form: StudentForm) -> Mode {
        match code {
            KeyCode::Esc => {
                self.set_status("Insert cancelled.", StatusKind::Info);
                return Mode::Normal;
            }
            KeyCode::Tab | KeyCode::Down => form.next_field(),
            KeyCode::BackTab | KeyCode::Up => form.previous_field(),
            KeyCode::Left if form.active == StudentField::Course => form.cycle_course(-1),
            KeyCode::Right if form.active == StudentField::Course => form.cycle_course(1),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter => match insert_student(&self.repo, &mut self.view, &form.input()) {
                Ok(id) => {
                    self.set_status(format!("Registered student {id}."), StatusKind::Info);
                    return Mode::Normal;
                }
                Err(err) => {
                    let message = err.to_string();
                    form.error = Some(message.clone());
                    self.set_status(message, StatusKind::Error);
                }
            },
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                }
            }
            _ => {}
        }
        Mode::Inserting(form)
    }

    fn handle_edit(&mut self, code: KeyCode, session: EditSession, mut form: StudentForm) -> Mode {
        match code {
            KeyCode::Esc => {
                self.set_status("Edit cancelled.", StatusKind::Info);
                return Mode::Normal;
            }
            KeyCode::Tab | KeyCode::Down => form.next_field(),
            KeyCode::BackTab | KeyCode::Up => form.previous_field(),
            KeyCode::Left if form.active == StudentField::Course => form.cycle_course(-1),
            KeyCode::Right if form.active == StudentField::Course => form.cycle_course(1),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter => match session.submit(&self.repo, &mut self.view, &form.input()) {
                Ok(()) => {
                    self.set_status(
                        format!("Updated student {}.", session.id()),
                        StatusKind::Info,
                    );
                    return Mode::Normal;
                }
                Err(err) => {
                    let message = err.to_string();
                    form.error = Some(message.clone());
                    self.set_status(message, StatusKind::Error);
                }
            },
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                }
            }
            _ => {}
        }
        Mode::Editing { session, form }
    }

    fn handle_confirm_delete(&mut self, code: KeyCode, pending: PendingDelete) -> Mode {
        match code {
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
                self.set_status("Deletion cancelled.", StatusKind::Info);
                Mode::Normal
            }
            KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => {
                match pending.confirm(&self.repo, &mut self.view) {
                    Ok(_) => {
                        self.set_status("The record was deleted successfully!", StatusKind::Info)
                    }
                    Err(err) => self.set_status(err.to_string(), StatusKind::Error),
                }
                Mode::Normal
            }
            _ => Mode::ConfirmDelete(pending),
        }
    }

    fn handle_search(&mut self, code: KeyCode, mut state: SearchState) -> Mode {
        match code {
            KeyCode::Esc => {
                self.clear_status();
                return Mode::Normal;
            }
            KeyCode::Backspace => {
                state.query.pop();
            }
            KeyCode::Enter => match search(&self.repo, &mut self.view, &state.query) {
                Ok(outcome) => {
                    self.set_status(search_summary(&state.query, &outcome), StatusKind::Info);
                    return Mode::Normal;
                }
                Err(err) => self.set_status(err.to_string(), StatusKind::Error),
            },
            KeyCode::Char(ch) if !ch.is_control() => state.query.push(ch),
            _ => {}
        }
        Mode::Searching(state)
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let footer_height = FOOTER_HEIGHT.min(area.height);

        let (content_area, footer_area) = if area.height > footer_height {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(0), Constraint::Length(footer_height)])
                .split(area);
            (chunks[0], chunks[1])
        } else {
            (area, area)
        };

        self.draw_table(frame, content_area);

        if area.height >= footer_height {
            self.draw_footer(frame, footer_area);
        }

        match &self.mode {
            Mode::Inserting(form) => self.draw_student_form(frame, area, "Insert Student Data", form),
            Mode::Editing { form, .. } => {
                self.draw_student_form(frame, area, "Update Student Data", form)
            }
            Mode::ConfirmDelete(pending) => self.draw_confirm_delete(frame, area, pending),
            Mode::Searching(state) => self.draw_search_bar(frame, area, state),
            Mode::About => self.draw_about(frame, area),
            Mode::Normal => {}
        }
    }

    fn draw_table(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title("Student Management System");

        if self.view.is_empty() {
            let message = Paragraph::new("No students yet. Press '+' to add one.")
                .alignment(Alignment::Center)
                .block(block);
            frame.render_widget(message, area);
            return;
        }

        let header = Row::new(["Id", "Name", "Course", "Mobile"])
            .style(Style::default().add_modifier(Modifier::BOLD));
        let match_style = Style::default().fg(Color::Black).bg(Color::Cyan);
        let rows = self.view.rows().iter().enumerate().map(|(index, student)| {
            let row = Row::new([
                Cell::from(student.id.to_string()),
                Cell::from(student.name.clone()),
                Cell::from(student.course.clone()),
                Cell::from(student.mobile.clone()),
            ]);
            if self.view.is_highlighted(index) {
                row.style(match_style)
            } else {
                row
            }
        });

        let table = Table::new(
            rows,
            [
                Constraint::Length(6),
                Constraint::Percentage(40),
                Constraint::Length(12),
                Constraint::Min(12),
            ],
        )
        .header(header)
        .block(block)
        .row_highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::REVERSED),
        );

        let mut state = TableState::default().with_selected(self.view.selected_index());
        frame.render_stateful_widget(table, area, &mut state);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else {
            Line::from("")
        };

        let paragraph = Paragraph::new(vec![status_line, self.footer_instructions()])
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        let key_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        let keys: &[(&str, &str)] = match self.mode {
            Mode::Inserting(_) | Mode::Editing { .. } => &[
                ("[Tab]", " Next Field   "),
                ("[←→]", " Course   "),
                ("[Enter]", " Save   "),
                ("[Esc]", " Cancel"),
            ],
            Mode::ConfirmDelete(_) => &[("[y]", " Delete   "), ("[n]", " Keep")],
            Mode::Searching(_) => &[("[Enter]", " Search   "), ("[Esc]", " Cancel")],
            Mode::About => &[("[any key]", " Close")],
            Mode::Normal => &[
                ("[↑↓]", " Select   "),
                ("[+]", " Add   "),
                ("[e]", " Edit   "),
                ("[-]", " Delete   "),
                ("[f]", " Search   "),
                ("[r]", " Reload   "),
                ("[?]", " About   "),
                ("[q]", " Quit"),
            ],
        };

        let spans: Vec<Span<'static>> = keys
            .iter()
            .flat_map(|(key, label)| {
                [
                    Span::styled(key.to_string(), key_style),
                    Span::raw(label.to_string()),
                ]
            })
            .collect();
        Line::from(spans)
    }

    fn draw_student_form(&self, frame: &mut Frame, area: Rect, title: &str, form: &StudentForm) {
        let popup_area = centered_rect(60, 40, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title(title).borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let mut lines = vec![
            form.build_line("Name", StudentField::Name),
            form.build_line("Course", StudentField::Course),
            form.build_line("Mobile", StudentField::Mobile),
            Line::from(""),
        ];

        if let Some(error) = &form.error {
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            )));
        } else {
            lines.push(Line::from(Span::styled(
                "Enter to save • Tab to switch • Esc to cancel",
                Style::default().fg(Color::Gray),
            )));
        }

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);

        let (prefix, row) = match form.active {
            StudentField::Name => ("Name: ", 0),
            StudentField::Course => return,
            StudentField::Mobile => ("Mobile: ", 2),
        };
        let offset = prefix.len() + form.value_len(form.active);
        frame.set_cursor_position((cursor_column(inner, offset), inner.y.saturating_add(row)));
    }

    fn draw_confirm_delete(&self, frame: &mut Frame, area: Rect, pending: &PendingDelete) {
        let popup_area = centered_rect(60, 30, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title("Delete Student Data")
            .borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let student = pending.student();
        let lines = vec![
            Line::from("Are you sure you want to delete?"),
            Line::from(format!(
                "{} • {} • {} (id {})",
                student.name, student.course, student.mobile, student.id
            )),
            Line::from(""),
            Line::from(Span::styled(
                "Press Y to confirm or N / Esc to cancel.",
                Style::default().fg(Color::Gray),
            )),
        ];

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn draw_search_bar(&self, frame: &mut Frame, area: Rect, state: &SearchState) {
        let height = 3u16.min(area.height);
        let popup_area = Rect {
            x: area.x,
            y: area.y,
            width: area.width,
            height,
        };
        frame.render_widget(Clear, popup_area);

        let block = Block::default().borders(Borders::ALL).title("Search Student");
        let paragraph = Paragraph::new(Span::raw(format!("Name: {}", state.query)))
            .block(block.clone())
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, popup_area);

        let inner = block.inner(popup_area);
        let offset = "Name: ".len() + state.query.chars().count();
        frame.set_cursor_position((cursor_column(inner, offset), inner.y));
    }

    fn draw_about(&self, frame: &mut Frame, area: Rect) {
        let popup_area = centered_rect(50, 30, area);
        frame.render_widget(Clear, popup_area);

        let paragraph = Paragraph::new(ABOUT_TEXT)
            .block(Block::default().title("About").borders(Borders::ALL))
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, popup_area);
    }

    fn set_status<S: Into<String>>(&mut self, text: S, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }
}

#[cfg(test)]
mod tests {
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;
    use tempfile::TempDir;

    use super::*;
    use crate::db::StorageGateway;
    use crate::models::StudentInput;

    fn app(temp: &TempDir) -> App {
        let gateway = StorageGateway::new(temp.path().join("students.sqlite"));
        gateway.initialize().unwrap();
        let repo = StudentRepository::new(gateway);
        let view = RosterView::load(&repo).unwrap();
        App::new(repo, view)
    }

    fn type_text(app: &mut App, text: &str) {
        for ch in text.chars() {
            app.handle_key(KeyCode::Char(ch));
        }
    }

    fn status_text(app: &App) -> String {
        app.status
            .as_ref()
            .map(|status| status.text.clone())
            .unwrap_or_default()
    }

    fn screen_text(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 20)).unwrap();
        terminal.draw(|frame| app.draw(frame)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn insert_form_registers_a_student() {
        let temp = TempDir::new().unwrap();
        let mut app = app(&temp);

        app.handle_key(KeyCode::Char('+'));
        type_text(&mut app, "Ann");
        app.handle_key(KeyCode::Tab);
        app.handle_key(KeyCode::Right);
        app.handle_key(KeyCode::Tab);
        type_text(&mut app, "555-1111");
        app.handle_key(KeyCode::Enter);

        assert!(matches!(app.mode, Mode::Normal));
        let student = app.view.selected_student().unwrap();
        assert_eq!(StudentInput::from(&student), StudentInput::new("Ann", "Math", "555-1111"));
        assert!(screen_text(&app).contains("555-1111"));
    }

    #[test]
    fn blank_insert_keeps_the_form_open() {
        let temp = TempDir::new().unwrap();
        let mut app = app(&temp);

        app.handle_key(KeyCode::Char('+'));
        app.handle_key(KeyCode::Enter);

        assert!(matches!(app.mode, Mode::Inserting(_)));
        assert_eq!(status_text(&app), "Student name is required.");
        assert!(app.view.is_empty());
    }

    #[test]
    fn edit_without_selection_reports_instead_of_opening() {
        let temp = TempDir::new().unwrap();
        let mut app = app(&temp);

        app.handle_key(KeyCode::Char('e'));

        assert!(matches!(app.mode, Mode::Normal));
        assert_eq!(status_text(&app), "Select a student first.");
    }

    #[test]
    fn delete_asks_before_removing() {
        let temp = TempDir::new().unwrap();
        let mut app = app(&temp);
        app.repo
            .insert(&StudentInput::new("Ann", "Math", "1"))
            .unwrap();
        app.handle_key(KeyCode::Char('r'));
        app.handle_key(KeyCode::Down);

        app.handle_key(KeyCode::Char('-'));
        app.handle_key(KeyCode::Char('n'));
        assert_eq!(app.view.len(), 1);

        app.handle_key(KeyCode::Char('-'));
        app.handle_key(KeyCode::Char('y'));
        assert!(app.view.is_empty());
        assert_eq!(status_text(&app), "The record was deleted successfully!");
    }

    #[test]
    fn search_highlights_and_escape_clears() {
        let temp = TempDir::new().unwrap();
        let mut app = app(&temp);
        app.repo
            .insert(&StudentInput::new("Ann", "Math", "1"))
            .unwrap();

        app.handle_key(KeyCode::Char('f'));
        type_text(&mut app, "Ann");
        app.handle_key(KeyCode::Enter);

        assert!(app.view.is_highlighted(0));
        assert_eq!(status_text(&app), "1 student named \"Ann\" highlighted.");

        app.handle_key(KeyCode::Esc);
        assert_eq!(app.view.highlight_count(), 0);
    }

    #[test]
    fn quit_key_exits() {
        let temp = TempDir::new().unwrap();
        let mut app = app(&temp);
        assert!(!app.handle_key(KeyCode::Down));
        assert!(app.handle_key(KeyCode::Char('q')));
    }
}
