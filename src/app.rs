//! Application state for the presentation side.
//!
//! The [`App`] owns everything that is displayed. Readings and log lines
//! arrive from the polling task through the monitor's event queue and are
//! applied here, on the thread that renders.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use tokio::sync::mpsc;

use crate::data::ThresholdConfig;
use crate::monitor::{LogLevel, LogLine, MonitorEvent, MonitorHandle, MonitorState, Reading};
use crate::settings::SettingsLoader;
use crate::ui::Theme;

/// Number of log lines kept for display.
pub const MAX_LOG_LINES: usize = 1000;

/// Main application state.
pub struct App {
    pub running: bool,
    pub show_help: bool,

    // Monitor control and its display queue
    monitor: MonitorHandle,
    events: mpsc::UnboundedReceiver<MonitorEvent>,
    loader: SettingsLoader,

    // Display state
    pub last_reading: Option<Reading>,
    pub log: VecDeque<LogLine>,

    // UI
    pub theme: Theme,

    // Status message (temporary feedback)
    pub status_message: Option<(String, Instant)>,
}

impl App {
    /// Create a new App around a spawned monitor.
    pub fn new(
        monitor: MonitorHandle,
        events: mpsc::UnboundedReceiver<MonitorEvent>,
        loader: SettingsLoader,
        theme: Theme,
    ) -> Self {
        let mut log = VecDeque::new();
        log.push_back(LogLine::new(LogLevel::Info, "GraviTrack ready!"));
        Self {
            running: true,
            show_help: false,
            monitor,
            events,
            loader,
            last_reading: None,
            log,
            theme,
            status_message: None,
        }
    }

    pub fn monitor_state(&self) -> MonitorState {
        self.monitor.state()
    }

    pub fn monitor(&self) -> &MonitorHandle {
        &self.monitor
    }

    /// Start or stop the polling loop.
    pub fn toggle_monitoring(&mut self) {
        self.monitor.toggle();
    }

    /// Apply every event queued by the monitor since the last call.
    ///
    /// Returns how many events were applied.
    pub fn drain_events(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.events.try_recv() {
            self.apply(event);
            applied += 1;
        }
        applied
    }

    /// Apply one event to the display state.
    pub fn apply(&mut self, event: MonitorEvent) {
        if let MonitorEvent::Reading(reading) = &event {
            self.last_reading = Some(*reading);
        }
        self.push_log(event.log_line());
    }

    fn push_log(&mut self, line: LogLine) {
        self.log.push_back(line);
        while self.log.len() > MAX_LOG_LINES {
            self.log.pop_front();
        }
    }

    /// Latest acceleration magnitude, 0.0 before the first reading.
    pub fn acceleration(&self) -> f64 {
        self.last_reading.map_or(0.0, |r| r.acceleration)
    }

    /// Latest angular velocity magnitude, 0.0 before the first reading.
    pub fn angular_velocity(&self) -> f64 {
        self.last_reading.map_or(0.0, |r| r.angular_velocity)
    }

    /// The limits currently configured, if they parse.
    pub fn limits(&self) -> Option<ThresholdConfig> {
        ThresholdConfig::from_settings(&self.monitor.settings().thresholds).ok()
    }

    /// Reload settings from the config file and hand them to the loop.
    pub fn reload_settings(&mut self) {
        match self.loader.load() {
            Ok(settings) => {
                self.monitor.update_settings(settings);
                self.set_status_message("Settings reloaded".to_string());
            }
            Err(e) => {
                self.set_status_message(format!("Reload failed: {}", e));
            }
        }
    }

    /// Clear the on-screen log.
    pub fn clear_log(&mut self) {
        self.log.clear();
    }

    /// Set a temporary status message that will be shown for a few seconds.
    pub fn set_status_message(&mut self, message: String) {
        self.status_message = Some((message, Instant::now()));
    }

    /// Get the current status message if it hasn't expired (3 seconds).
    pub fn get_status_message(&self) -> Option<&str> {
        if let Some((msg, time)) = &self.status_message {
            if time.elapsed() < Duration::from_secs(3) {
                return Some(msg);
            }
        }
        None
    }

    /// Toggle the help overlay.
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Signal the application to quit.
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Stop the loop and wait for it to exit.
    pub async fn shutdown(self) {
        self.monitor.stop();
        self.monitor.shutdown().await;
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::MonitorError;
    use crate::monitor::{LoopTiming, MonitorLoop};
    use crate::notify::DispatchOutcome;
    use crate::settings::{MonitorSettings, SettingsOverrides};
    use crate::test_support::{RecordingNotifier, ScriptedSource};
    use std::sync::Arc;

    /// An app whose monitor is never started.
    pub(crate) fn idle_app() -> App {
        let source = Arc::new(ScriptedSource::new(Err(MonitorError::HttpStatus(503))));
        let notifier = Arc::new(RecordingNotifier::new(DispatchOutcome::Sent));
        let (handle, events) = MonitorLoop::spawn(
            source,
            notifier,
            MonitorSettings::default(),
            LoopTiming::default(),
        );
        App::new(handle, events, SettingsLoader::default(), Theme::dark())
    }

    #[tokio::test]
    async fn test_reading_updates_magnitudes_and_log() {
        let mut app = idle_app();
        assert_eq!(app.acceleration(), 0.0);

        app.apply(MonitorEvent::Reading(Reading::new(12.5, 3.25)));
        assert_eq!(app.acceleration(), 12.5);
        assert_eq!(app.angular_velocity(), 3.25);
        assert_eq!(app.log.back().unwrap().message, "Acc: 12.50 | Gyr: 3.25");
    }

    #[tokio::test]
    async fn test_error_line_keeps_previous_magnitudes() {
        let mut app = idle_app();
        app.apply(MonitorEvent::Reading(Reading::new(4.0, 1.0)));
        app.apply(MonitorEvent::Log(LogLine::new(LogLevel::Error, "HTTP 503")));

        assert_eq!(app.acceleration(), 4.0);
        assert_eq!(app.angular_velocity(), 1.0);
        assert_eq!(app.log.back().unwrap().level, LogLevel::Error);
    }

    #[tokio::test]
    async fn test_log_is_capped() {
        let mut app = idle_app();
        for i in 0..(MAX_LOG_LINES + 10) {
            app.apply(MonitorEvent::Log(LogLine::new(LogLevel::Info, i.to_string())));
        }
        assert_eq!(app.log.len(), MAX_LOG_LINES);
        assert_eq!(
            app.log.back().unwrap().message,
            (MAX_LOG_LINES + 9).to_string()
        );
    }

    #[tokio::test]
    async fn test_toggle_and_drain() {
        let mut app = idle_app();
        assert_eq!(app.monitor_state(), MonitorState::Stopped);

        app.toggle_monitoring();
        assert_eq!(app.monitor_state(), MonitorState::Running);
        app.toggle_monitoring();
        assert_eq!(app.monitor_state(), MonitorState::Stopped);

        // Start and stop lines were queued by the handle.
        assert!(app.drain_events() >= 2);
        let messages: Vec<&str> = app.log.iter().map(|l| l.message.as_str()).collect();
        assert!(messages.contains(&"Starting monitoring..."));
        assert!(messages.contains(&"Monitoring stopped"));
    }

    #[tokio::test]
    async fn test_reload_publishes_overrides() {
        let mut app = idle_app();
        app.loader = SettingsLoader::new(
            None,
            SettingsOverrides {
                acceleration: Some("42".to_string()),
                ..Default::default()
            },
        );

        app.reload_settings();
        assert_eq!(app.monitor().settings().thresholds.acceleration, "42");
        assert_eq!(app.limits().unwrap().acceleration_limit, 42.0);
        assert_eq!(app.get_status_message(), Some("Settings reloaded"));
    }

    #[tokio::test]
    async fn test_quit_and_clear() {
        let mut app = idle_app();
        app.clear_log();
        assert!(app.log.is_empty());
        app.quit();
        assert!(!app.running);
    }
}
