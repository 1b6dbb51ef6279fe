//! Output pane: the tail of the monitor log.

use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    // Newest lines at the bottom; only what fits inside the borders.
    let visible = area.height.saturating_sub(2) as usize;
    let skip = app.log.len().saturating_sub(visible);

    let lines: Vec<Line> = app
        .log
        .iter()
        .skip(skip)
        .map(|line| Line::from(Span::styled(line.to_string(), app.theme.level_style(line.level))))
        .collect();

    let block = Block::default()
        .title(Span::styled(" Output ", app.theme.header))
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
