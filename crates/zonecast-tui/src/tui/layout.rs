// Screen layout.
//
// +--------------------------------------------------+
// | Metric bar (1 row)                                |
// +--------------------------------------------------+
// | Chart (fill)                                      |
// +--------------------------------------------------+
// | Help bar (1 row)                                  |
// +--------------------------------------------------+

use ratatui::layout::{Constraint, Direction, Layout, Rect};

#[derive(Debug, Clone)]
pub struct AppLayout {
    /// Metric tabs and the current player position.
    pub metric_bar: Rect,
    pub chart: Rect,
    /// Keyboard shortcut hints.
    pub help_bar: Rect,
}

pub fn build_layout(area: Rect) -> AppLayout {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(10),
            Constraint::Length(1),
        ])
        .split(area);

    AppLayout {
        metric_bar: vertical[0],
        chart: vertical[1],
        help_bar: vertical[2],
    }
}
