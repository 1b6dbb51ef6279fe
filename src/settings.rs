//! Configuration surface for the monitor.
//!
//! Values are kept in the string form they were entered in. They are parsed
//! on every cycle, so a bad edit shows up as a logged error on the next
//! cycle instead of stopping the monitor.
//!
//! # Configuration
//!
//! Settings are layered (later wins): built-in defaults, an optional TOML
//! file, then `GRAVITRACK__SECTION__KEY` environment variables.
//!
//! ```toml
//! [sensor]
//! host = "192.168.1.20"
//! port = 8080
//!
//! [pushover]
//! user_key = "u123"
//! api_token = "a456"
//!
//! [thresholds]
//! acceleration = 59.75
//! angular_velocity = 25.0
//! ```

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::error::MonitorError;
use crate::notify::PushCredentials;
use crate::source::SensorEndpoint;

const DEFAULT_HOST: &str = "172.16.1.91";
const DEFAULT_PORT: &str = "8080";
const DEFAULT_USER_KEY: &str = "your_user_key";
const DEFAULT_API_TOKEN: &str = "your_api_token";
const DEFAULT_ACCELERATION: &str = "59.75";
const DEFAULT_ANGULAR_VELOCITY: &str = "25.00";

/// Everything the monitor reads from its configuration, re-read every cycle.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MonitorSettings {
    pub sensor: SensorSettings,
    pub pushover: PushoverSettings,
    pub thresholds: ThresholdSettings,
}

/// Where the phyphox remote-access server lives.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SensorSettings {
    pub host: String,
    pub port: String,
}

/// Pushover credentials.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PushoverSettings {
    pub user_key: String,
    pub api_token: String,
}

/// Alert limits as entered (parsed by `ThresholdConfig::from_settings`).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ThresholdSettings {
    pub acceleration: String,
    pub angular_velocity: String,
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self {
            sensor: SensorSettings {
                host: DEFAULT_HOST.to_string(),
                port: DEFAULT_PORT.to_string(),
            },
            pushover: PushoverSettings {
                user_key: DEFAULT_USER_KEY.to_string(),
                api_token: DEFAULT_API_TOKEN.to_string(),
            },
            thresholds: ThresholdSettings {
                acceleration: DEFAULT_ACCELERATION.to_string(),
                angular_velocity: DEFAULT_ANGULAR_VELOCITY.to_string(),
            },
        }
    }
}

impl MonitorSettings {
    /// Load settings from defaults, an optional file and the environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .set_default("sensor.host", DEFAULT_HOST)?
            .set_default("sensor.port", DEFAULT_PORT)?
            .set_default("pushover.user_key", DEFAULT_USER_KEY)?
            .set_default("pushover.api_token", DEFAULT_API_TOKEN)?
            .set_default("thresholds.acceleration", DEFAULT_ACCELERATION)?
            .set_default("thresholds.angular_velocity", DEFAULT_ANGULAR_VELOCITY)?;

        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }

        builder
            .add_source(Environment::with_prefix("GRAVITRACK").separator("__"))
            .build()?
            .try_deserialize()
    }
}

/// Values given on the command line; each one beats the file and environment.
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub host: Option<String>,
    pub port: Option<String>,
    pub user_key: Option<String>,
    pub api_token: Option<String>,
    pub acceleration: Option<String>,
    pub angular_velocity: Option<String>,
}

impl SettingsOverrides {
    pub fn apply(&self, settings: &mut MonitorSettings) {
        let pairs = [
            (&self.host, &mut settings.sensor.host),
            (&self.port, &mut settings.sensor.port),
            (&self.user_key, &mut settings.pushover.user_key),
            (&self.api_token, &mut settings.pushover.api_token),
            (&self.acceleration, &mut settings.thresholds.acceleration),
            (&self.angular_velocity, &mut settings.thresholds.angular_velocity),
        ];
        for (value, slot) in pairs {
            if let Some(value) = value {
                *slot = value.clone();
            }
        }
    }
}

/// Reproducible settings load: the same file and overrides on every reload.
#[derive(Debug, Clone, Default)]
pub struct SettingsLoader {
    pub path: Option<PathBuf>,
    pub overrides: SettingsOverrides,
}

impl SettingsLoader {
    pub fn new(path: Option<PathBuf>, overrides: SettingsOverrides) -> Self {
        Self { path, overrides }
    }

    pub fn load(&self) -> Result<MonitorSettings, ConfigError> {
        let mut settings = MonitorSettings::load(self.path.as_deref())?;
        self.overrides.apply(&mut settings);
        Ok(settings)
    }
}

impl SensorSettings {
    /// Resolve the configured host and port into an endpoint.
    pub fn endpoint(&self) -> Result<SensorEndpoint, MonitorError> {
        let port = self
            .port
            .trim()
            .parse::<u16>()
            .map_err(|_| MonitorError::ConfigValue {
                field: "port",
                value: self.port.clone(),
            })?;
        Ok(SensorEndpoint::new(self.host.trim(), port))
    }
}

impl PushoverSettings {
    pub fn credentials(&self) -> PushCredentials {
        PushCredentials {
            user_key: self.user_key.clone(),
            api_token: self.api_token.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let settings = MonitorSettings::default();
        assert_eq!(settings.sensor.host, "172.16.1.91");
        assert_eq!(settings.sensor.port, "8080");
        assert_eq!(settings.thresholds.acceleration, "59.75");
        assert_eq!(settings.thresholds.angular_velocity, "25.00");
    }

    #[test]
    fn test_load_from_toml_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[sensor]
host = "10.0.0.5"
port = 9000

[thresholds]
acceleration = 12.5
"#
        )
        .unwrap();

        let settings = MonitorSettings::load(Some(file.path())).unwrap();
        assert_eq!(settings.sensor.host, "10.0.0.5");
        assert_eq!(settings.sensor.port, "9000");
        assert_eq!(settings.thresholds.acceleration, "12.5");
        // Untouched keys keep their defaults
        assert_eq!(settings.thresholds.angular_velocity, "25.00");
        assert_eq!(settings.pushover.user_key, "your_user_key");
    }

    #[test]
    fn test_load_missing_file_fails() {
        let result = MonitorSettings::load(Some(Path::new("/nonexistent/gravitrack.toml")));
        assert!(result.is_err());
    }

    #[test]
    fn test_overrides_beat_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[sensor]\nhost = \"10.0.0.5\"\nport = 9000").unwrap();

        let loader = SettingsLoader::new(
            Some(file.path().to_path_buf()),
            SettingsOverrides {
                port: Some("8081".to_string()),
                angular_velocity: Some("3.5".to_string()),
                ..Default::default()
            },
        );
        let settings = loader.load().unwrap();
        assert_eq!(settings.sensor.host, "10.0.0.5");
        assert_eq!(settings.sensor.port, "8081");
        assert_eq!(settings.thresholds.angular_velocity, "3.5");
    }

    #[test]
    fn test_endpoint() {
        let sensor = SensorSettings {
            host: "192.168.0.7".to_string(),
            port: " 8080 ".to_string(),
        };
        let endpoint = sensor.endpoint().unwrap();
        assert_eq!(endpoint.url(), "http://192.168.0.7:8080/get");
    }

    #[test]
    fn test_endpoint_rejects_bad_port() {
        let sensor = SensorSettings {
            host: "localhost".to_string(),
            port: "80a".to_string(),
        };
        assert_eq!(
            sensor.endpoint().unwrap_err(),
            MonitorError::ConfigValue {
                field: "port",
                value: "80a".to_string()
            }
        );
    }
}
