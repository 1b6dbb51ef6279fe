//! Theme configuration for the TUI.
//!
//! Supports light and dark themes with automatic terminal detection.

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::block::BorderType;

use crate::monitor::{LogLevel, MonitorState};

/// Color and style theme for the TUI.
///
/// Use [`Theme::auto_detect()`] for automatic theme selection based on
/// terminal background, or [`Theme::dark()`]/[`Theme::light()`] explicitly.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Accent color for highlights and active elements.
    pub highlight: Color,
    /// Color for info log lines and the running indicator.
    pub ok: Color,
    /// Color for warning log lines (stop events).
    pub warning: Color,
    /// Color for error log lines, the stopped indicator and exceeded limits.
    pub error: Color,
    /// Color for borders and separators.
    pub border: Color,
    /// Style for panel titles.
    pub header: Style,
    /// Style for the large magnitude values.
    pub value: Style,
    /// Border style (rounded, plain, etc.).
    pub border_type: BorderType,
}

impl Theme {
    /// Create a dark theme suitable for dark terminal backgrounds.
    pub fn dark() -> Self {
        Self {
            highlight: Color::Cyan,
            ok: Color::Green,
            warning: Color::Yellow,
            error: Color::Red,
            border: Color::Gray,
            header: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            value: Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            border_type: BorderType::Rounded,
        }
    }

    /// Create a light theme suitable for light terminal backgrounds.
    pub fn light() -> Self {
        Self {
            highlight: Color::Blue,
            ok: Color::Green,
            warning: Color::Yellow,
            error: Color::Red,
            border: Color::DarkGray,
            header: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            value: Style::default().fg(Color::Black).add_modifier(Modifier::BOLD),
            border_type: BorderType::Rounded,
        }
    }

    /// Auto-detect based on terminal background
    pub fn auto_detect() -> Self {
        // Use terminal-light crate to detect background luminance
        match terminal_light::luma() {
            Ok(luma) if luma > 0.5 => Self::light(),
            _ => Self::dark(),
        }
    }

    /// Get style for a log line
    pub fn level_style(&self, level: LogLevel) -> Style {
        match level {
            LogLevel::Info => Style::default().fg(self.ok),
            LogLevel::Warning => Style::default().fg(self.warning),
            LogLevel::Error => Style::default().fg(self.error).add_modifier(Modifier::BOLD),
        }
    }

    /// Get style for the running/stopped indicator
    pub fn state_style(&self, state: MonitorState) -> Style {
        match state {
            MonitorState::Running => Style::default().fg(self.ok).add_modifier(Modifier::BOLD),
            MonitorState::Stopped => Style::default().fg(self.error).add_modifier(Modifier::BOLD),
        }
    }
}
