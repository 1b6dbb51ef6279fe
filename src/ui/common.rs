//! Common UI components: header bar, status bar and help overlay.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::App;
use crate::data::duration::format_duration;

/// Render the header bar.
///
/// Displays: running indicator, title, sensor URL and source.
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let state = app.monitor_state();
    let target = match app.monitor().settings().sensor.endpoint() {
        Ok(endpoint) => endpoint.url(),
        Err(e) => e.to_string(),
    };

    let line = Line::from(vec![
        Span::styled(" ● ", app.theme.state_style(state)),
        Span::styled(state.label(), app.theme.state_style(state)),
        Span::raw(" │ "),
        Span::styled("GRAVITRACK ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("Sensor Monitor │ "),
        Span::styled(target, Style::default().fg(app.theme.highlight)),
        Span::styled(
            format!(" ({})", app.monitor().source_description()),
            Style::default().add_modifier(Modifier::DIM),
        ),
    ]);

    frame.render_widget(Paragraph::new(line), area);
}

/// Render the status bar at the bottom.
///
/// Shows: cadence, time since last reading, available controls.
/// Also displays temporary status messages.
pub fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    if let Some(msg) = app.get_status_message() {
        let paragraph =
            Paragraph::new(format!(" {} ", msg)).style(Style::default().fg(app.theme.highlight));
        frame.render_widget(paragraph, area);
        return;
    }

    let timing = app.monitor().timing();
    let updated = match app.last_reading {
        Some(reading) => {
            let age = chrono::Local::now().signed_duration_since(reading.at);
            format!("Updated {:.1}s ago", age.num_milliseconds().max(0) as f64 / 1000.0)
        }
        None => "No reading yet".to_string(),
    };

    let status = format!(
        " {} | every {} | cooldown {} | s:start/stop r:reload c:clear ?:help q:quit",
        updated,
        format_duration(timing.poll_interval),
        format_duration(timing.cooldown),
    );

    let paragraph = Paragraph::new(status).style(Style::default().add_modifier(Modifier::DIM));
    frame.render_widget(paragraph, area);
}

/// Render the help overlay with keyboard shortcuts.
///
/// Displayed as a centered modal on top of the screen.
pub fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let help_text = vec![
        Line::from(vec![Span::styled("Keyboard Shortcuts", app.theme.header)]),
        Line::from(""),
        Line::from("  s / Enter   Start or stop monitoring"),
        Line::from("  r           Reload config file"),
        Line::from("  c           Clear output"),
        Line::from("  ?           Toggle this help"),
        Line::from("  q / Esc     Quit"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press any key to close",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    let paragraph = Paragraph::new(help_text).block(block);

    // Center the help overlay - responsive to terminal size
    let help_width = 44u16.min(area.width.saturating_sub(4));
    let help_height = 11u16.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(help_width)) / 2;
    let y = area.y + (area.height.saturating_sub(help_height)) / 2;
    let help_area = Rect::new(x, y, help_width, help_height);

    // Clear the area behind the help
    frame.render_widget(Clear, help_area);
    frame.render_widget(paragraph, help_area);
}
