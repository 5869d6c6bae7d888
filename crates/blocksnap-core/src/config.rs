//! Snapping distances used while dragging blocks.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum distance between connections for a drag to snap (workspace units).
pub const SNAP_RADIUS: f64 = 28.0;

/// Maximum distance kept while a connection is already highlighted.
pub const CONNECTING_SNAP_RADIUS: f64 = 48.0;

/// Bonus distance given to the currently highlighted connection, so a nearby
/// candidate must be this much closer before the highlight moves.
pub const CURRENT_CONNECTION_PREFERENCE: f64 = 8.0;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: &'static str, value: f64 },
    #[error("connecting_snap_radius ({connecting}) is smaller than snap_radius ({snap})")]
    RadiusOrder { snap: f64, connecting: f64 },
}

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Snapping configuration for a workspace.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapConfig {
    /// Radius searched for a new snap target.
    pub snap_radius: f64,
    /// Radius searched once a target is highlighted.
    pub connecting_snap_radius: f64,
    /// Preference given to the highlighted target.
    pub current_connection_preference: f64,
}

impl Default for SnapConfig {
    fn default() -> Self {
        Self {
            snap_radius: SNAP_RADIUS,
            connecting_snap_radius: CONNECTING_SNAP_RADIUS,
            current_connection_preference: CURRENT_CONNECTION_PREFERENCE,
        }
    }
}

impl SnapConfig {
    /// Parse and validate a configuration from JSON. Missing fields take
    /// their default values.
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Check that every distance is finite and non-negative and that the
    /// connecting radius is at least the snap radius.
    pub fn validate(&self) -> ConfigResult<()> {
        let fields = [
            ("snap_radius", self.snap_radius),
            ("connecting_snap_radius", self.connecting_snap_radius),
            ("current_connection_preference", self.current_connection_preference),
        ];
        for (field, value) in fields {
            if !value.is_finite() || value < 0.0 {
                log::warn!("Rejected snap config: {} = {}", field, value);
                return Err(ConfigError::InvalidValue { field, value });
            }
        }
        if self.connecting_snap_radius < self.snap_radius {
            log::warn!(
                "Rejected snap config: connecting radius {} below snap radius {}",
                self.connecting_snap_radius,
                self.snap_radius
            );
            return Err(ConfigError::RadiusOrder {
                snap: self.snap_radius,
                connecting: self.connecting_snap_radius,
            });
        }
        Ok(())
    }

    /// Radius to search with, depending on whether a target is already
    /// highlighted.
    pub fn search_radius(&self, has_highlight: bool) -> f64 {
        if has_highlight {
            self.connecting_snap_radius
        } else {
            self.snap_radius
        }
    }
}
