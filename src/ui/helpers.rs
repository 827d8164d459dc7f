use ratatui::layout::{Constraint, Direction, Layout, Rect};

use crate::workflows::SearchOutcome;

/// Produce a rectangle centered within `area` that spans the requested percent
/// of the width and height. Used for modal dialogs.
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(area);

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(horizontal[1]);

    vertical[1]
}

/// Column for a text cursor `offset` cells into `inner`, kept on the last
/// cell of the area when the text is wider than it.
pub(crate) fn cursor_column(inner: Rect, offset: usize) -> u16 {
    let offset = u16::try_from(offset).unwrap_or(u16::MAX);
    inner
        .x
        .saturating_add(offset)
        .min(inner.right().saturating_sub(1))
}

/// Footer text summarising a finished search.
pub(crate) fn search_summary(name: &str, outcome: &SearchOutcome) -> String {
    match outcome.matches.len() {
        0 => format!("No student named \"{name}\"."),
        1 => format!("1 student named \"{name}\" highlighted."),
        count => format!("{count} students named \"{name}\" highlighted."),
    }
}
