//! Side-by-side panels for the two magnitudes.

use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let columns =
        Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)]).split(area);

    let limits = app.limits();
    render_panel(
        frame,
        app,
        columns[0],
        "Acceleration",
        app.acceleration(),
        limits.map(|l| l.acceleration_limit),
        "m/s²",
    );
    render_panel(
        frame,
        app,
        columns[1],
        "Gyroscope",
        app.angular_velocity(),
        limits.map(|l| l.angular_velocity_limit),
        "rad/s",
    );
}

fn render_panel(
    frame: &mut Frame,
    app: &App,
    area: Rect,
    title: &str,
    value: f64,
    limit: Option<f64>,
    unit: &str,
) {
    let exceeded = limit.is_some_and(|l| value > l);
    let value_style = if exceeded {
        Style::default().fg(app.theme.error).add_modifier(Modifier::BOLD)
    } else {
        app.theme.value
    };

    let limit_text = match limit {
        Some(l) => format!("{}  limit {:.2}", unit, l),
        None => format!("{}  limit invalid", unit),
    };

    let text = vec![
        Line::from(Span::styled(format!("{:.2}", value), value_style)),
        Line::from(Span::styled(
            limit_text,
            Style::default().add_modifier(Modifier::DIM),
        )),
    ];

    let block = Block::default()
        .title(Span::styled(format!(" {} ", title), app.theme.header))
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));

    let paragraph = Paragraph::new(text)
        .alignment(Alignment::Center)
        .block(block);
    frame.render_widget(paragraph, area);
}
