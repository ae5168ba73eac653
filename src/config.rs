use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;

/// How elapsed time is reduced to whole seconds before the slow-request check.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThresholdMode {
    /// Seconds component of the elapsed time (0-59); minutes and above are
    /// discarded, so a 63s request measures as 3.
    #[default]
    SecondsComponent,
    /// Total elapsed whole seconds.
    TotalSeconds,
}

impl ThresholdMode {
    pub fn measure(self, elapsed: Duration) -> u64 {
        match self {
            ThresholdMode::SecondsComponent => elapsed.as_secs() % 60,
            ThresholdMode::TotalSeconds => elapsed.as_secs(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoggingBehaviorConfig {
    /// A request is slow when its measured seconds are strictly greater.
    pub slow_request_threshold_secs: u64,
    pub threshold_mode: ThresholdMode,
}

impl Default for LoggingBehaviorConfig {
    fn default() -> Self {
        Self {
            slow_request_threshold_secs: 3,
            threshold_mode: ThresholdMode::SecondsComponent,
        }
    }
}

impl LoggingBehaviorConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    /// Returns the measured seconds when `elapsed` counts as slow.
    pub fn slow_seconds(&self, elapsed: Duration) -> Option<u64> {
        let seconds = self.threshold_mode.measure(elapsed);
        (seconds > self.slow_request_threshold_secs).then_some(seconds)
    }
}
