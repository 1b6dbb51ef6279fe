//! The monitoring loop and its control handle.
//!
//! ```text
//!  control side (TUI / headless)                 polling task
//! ┌──────────────────────────┐  watch<State>   ┌───────────────────────────┐
//! │ MonitorHandle            │────────────────▶│ MonitorLoop               │
//! │  start / stop            │  watch<Settings>│  fetch → parse → magnitude│
//! │  update_settings         │────────────────▶│  → evaluate → notify      │
//! └──────────────────────────┘                 │  → sleep                  │
//!             ▲                                └─────────────┬─────────────┘
//!             │          mpsc<MonitorEvent>                  │
//!             └──────────────────────────────────────────────┘
//! ```
//!
//! The loop is a single long-lived task. `Stopped` parks it between cycles;
//! `Running` lets it cycle. A stop never interrupts a cycle in flight.

mod event;

pub use event::{LogLevel, LogLine, MonitorEvent, Reading};

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use futures_util::FutureExt;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use crate::data::{evaluate, parse_reading, NotificationState, ThresholdConfig, DEFAULT_COOLDOWN};
use crate::error::MonitorError;
use crate::notify::Notifier;
use crate::settings::MonitorSettings;
use crate::source::SensorSource;

/// Default pause between the end of one cycle and the start of the next.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Whether the loop is cycling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorState {
    Stopped,
    Running,
}

impl MonitorState {
    pub fn label(&self) -> &'static str {
        match self {
            MonitorState::Stopped => "Stopped",
            MonitorState::Running => "Running",
        }
    }
}

/// Cadence of the loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopTiming {
    /// Sleep after every cycle, whatever its outcome.
    pub poll_interval: Duration,
    /// Minimum time between two notification attempts.
    pub cooldown: Duration,
}

impl Default for LoopTiming {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            cooldown: DEFAULT_COOLDOWN,
        }
    }
}

/// The polling side of the monitor.
#[derive(Debug)]
pub struct MonitorLoop {
    source: Arc<dyn SensorSource>,
    notifier: Arc<dyn Notifier>,
    /// Running flag. Written only by [`MonitorHandle`], read at cycle boundaries.
    state: watch::Receiver<MonitorState>,
    /// Latest settings. Cloned at the start of every cycle.
    settings: watch::Receiver<MonitorSettings>,
    events: mpsc::UnboundedSender<MonitorEvent>,
    /// Last notification attempt. Written only by this loop.
    notification: NotificationState,
    timing: LoopTiming,
}

impl MonitorLoop {
    /// Spawn the loop on the current tokio runtime, initially stopped.
    ///
    /// Returns the control handle and the receiving end of the display queue.
    pub fn spawn(
        source: Arc<dyn SensorSource>,
        notifier: Arc<dyn Notifier>,
        settings: MonitorSettings,
        timing: LoopTiming,
    ) -> (MonitorHandle, mpsc::UnboundedReceiver<MonitorEvent>) {
        let (state_tx, state_rx) = watch::channel(MonitorState::Stopped);
        let (settings_tx, settings_rx) = watch::channel(settings);
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let source_description = source.description().to_string();

        let monitor = MonitorLoop {
            source,
            notifier,
            state: state_rx,
            settings: settings_rx,
            events: events_tx.clone(),
            notification: NotificationState::default(),
            timing,
        };
        let task = tokio::spawn(monitor.run());

        let handle = MonitorHandle {
            state: state_tx,
            settings: settings_tx,
            events: events_tx,
            task,
            source_description,
            timing,
        };
        (handle, events_rx)
    }

    /// Run until the handle is dropped.
    pub async fn run(mut self) {
        loop {
            if self
                .state
                .wait_for(|s| *s == MonitorState::Running)
                .await
                .is_err()
            {
                break;
            }

            loop {
                let running = *self.state.borrow_and_update() == MonitorState::Running;
                if !running {
                    break;
                }

                self.run_cycle_isolated().await;
                tokio::time::sleep(self.timing.poll_interval).await;

                if self.state.has_changed().is_err() {
                    debug!("monitor handle dropped, exiting loop");
                    return;
                }
            }
        }
        debug!("monitor handle dropped, exiting loop");
    }

    /// Run one cycle, reporting any error or panic instead of propagating it.
    async fn run_cycle_isolated(&mut self) {
        match AssertUnwindSafe(self.run_cycle()).catch_unwind().await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                warn!(error = %e, "monitor cycle failed");
                self.log(LogLevel::Error, e.to_string());
            }
            Err(_) => {
                error!("monitor cycle panicked");
                self.log(LogLevel::Error, "Error: monitoring cycle panicked");
            }
        }
    }

    async fn run_cycle(&mut self) -> Result<(), MonitorError> {
        let settings = self.settings.borrow_and_update().clone();

        let endpoint = settings.sensor.endpoint()?;
        let payload = self.source.fetch(&endpoint).await?;

        let parsed = parse_reading(&payload);
        for err in &parsed.errors {
            warn!(channel = %err.channel, value = %err.value, "non-numeric channel value");
            self.log(LogLevel::Error, err.to_string());
        }

        let reading = Reading::new(
            parsed.acceleration.magnitude(),
            parsed.angular_velocity.magnitude(),
        );
        debug!(
            acceleration = reading.acceleration,
            angular_velocity = reading.angular_velocity,
            "cycle reading"
        );
        self.emit(MonitorEvent::Reading(reading));

        let limits = ThresholdConfig::from_settings(&settings.thresholds)?;
        let evaluation = evaluate(
            reading.acceleration,
            reading.angular_velocity,
            &limits,
            &self.notification,
            Instant::now(),
            self.timing.cooldown,
        );

        if evaluation.should_notify {
            let alerts = evaluation.alerts();
            info!(?alerts, "threshold exceeded, dispatching notification");

            let outcome = self
                .notifier
                .notify(&settings.pushover.credentials(), &alerts)
                .await;
            // Cooldown counts from the attempt, delivered or not.
            self.notification.record_attempt(Instant::now());

            let level = if outcome.is_sent() {
                LogLevel::Info
            } else {
                LogLevel::Error
            };
            self.log(level, outcome.to_string());
        }

        Ok(())
    }

    fn log(&self, level: LogLevel, message: impl Into<String>) {
        self.emit(MonitorEvent::Log(LogLine::new(level, message)));
    }

    fn emit(&self, event: MonitorEvent) {
        // The presentation side may already be gone during shutdown.
        let _ = self.events.send(event);
    }
}

/// Control side of a spawned [`MonitorLoop`].
///
/// Dropping the handle (or calling [`MonitorHandle::shutdown`]) ends the loop
/// after its current cycle.
#[derive(Debug)]
pub struct MonitorHandle {
    state: watch::Sender<MonitorState>,
    settings: watch::Sender<MonitorSettings>,
    events: mpsc::UnboundedSender<MonitorEvent>,
    task: JoinHandle<()>,
    source_description: String,
    timing: LoopTiming,
}

impl MonitorHandle {
    pub fn state(&self) -> MonitorState {
        *self.state.borrow()
    }

    /// Stopped → Running. Returns false if already running.
    pub fn start(&self) -> bool {
        if self.state() == MonitorState::Running {
            return false;
        }
        info!("monitoring started");
        self.log(LogLevel::Info, "Starting monitoring...");
        self.state.send_replace(MonitorState::Running);
        true
    }

    /// Running → Stopped. The cycle in flight finishes; no new one begins.
    /// Returns false if already stopped.
    pub fn stop(&self) -> bool {
        if self.state() == MonitorState::Stopped {
            return false;
        }
        self.state.send_replace(MonitorState::Stopped);
        info!("monitoring stopped");
        self.log(LogLevel::Warning, "Monitoring stopped");
        true
    }

    /// Flip between the two states and return the new one.
    pub fn toggle(&self) -> MonitorState {
        match self.state() {
            MonitorState::Running => {
                self.stop();
            }
            MonitorState::Stopped => {
                self.start();
            }
        }
        self.state()
    }

    /// Publish new settings; the loop picks them up on its next cycle.
    pub fn update_settings(&self, settings: MonitorSettings) {
        self.settings.send_replace(settings);
    }

    /// The settings the next cycle will use.
    pub fn settings(&self) -> MonitorSettings {
        self.settings.borrow().clone()
    }

    /// Append a line to the monitor log from the control side.
    pub fn log(&self, level: LogLevel, message: impl Into<String>) {
        let _ = self.events.send(MonitorEvent::Log(LogLine::new(level, message)));
    }

    pub fn timing(&self) -> LoopTiming {
        self.timing
    }

    pub fn source_description(&self) -> &str {
        &self.source_description
    }

    /// Close the control channels and wait for the loop to exit.
    pub async fn shutdown(self) {
        let MonitorHandle {
            state,
            settings,
            events,
            task,
            ..
        } = self;
        drop(state);
        drop(settings);
        drop(events);
        let _ = task.await;
    }
}
