//! Arrival thresholds.
//!
//! # Sources
//!
//! Values are layered: built-in defaults, then a TOML file or string, then
//! environment overrides.
//!
//! ```toml
//! threshold_m  = 40.0
//! hysteresis_m = 15.0
//! ```
//!
//! | Variable                  | Field          |
//! |---------------------------|----------------|
//! | `FD_ARRIVAL_THRESHOLD_M`  | `threshold_m`  |
//! | `FD_ARRIVAL_HYSTERESIS_M` | `hysteresis_m` |
//!
//! Keys missing from the TOML keep their defaults.  An environment value
//! that does not parse, or fails validation, is logged and ignored.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{ArrivalError, ArrivalResult};

/// Default arrival radius.  Consumer GPS under open sky is good to roughly
/// 5–15 m; 50 m also absorbs the walk from a kerbside parking spot to the
/// ATM fascia.
pub const DEFAULT_THRESHOLD_M: f64 = 50.0;

/// Default dead-zone beyond the threshold before `Arrived` reverts.
pub const DEFAULT_HYSTERESIS_M: f64 = 25.0;

pub const ENV_THRESHOLD_M: &str = "FD_ARRIVAL_THRESHOLD_M";
pub const ENV_HYSTERESIS_M: &str = "FD_ARRIVAL_HYSTERESIS_M";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ArrivalConfig {
    /// Distance at or below which the engineer has arrived, in metres.
    pub threshold_m: f64,

    /// Extra margin past `threshold_m` that must be exceeded before an
    /// `Arrived` engineer reverts to `EnRoute`, in metres.
    pub hysteresis_m: f64,
}

impl Default for ArrivalConfig {
    fn default() -> Self {
        Self {
            threshold_m:  DEFAULT_THRESHOLD_M,
            hysteresis_m: DEFAULT_HYSTERESIS_M,
        }
    }
}

impl ArrivalConfig {
    /// Construct and validate.
    pub fn new(threshold_m: f64, hysteresis_m: f64) -> ArrivalResult<Self> {
        let config = Self { threshold_m, hysteresis_m };
        config.validate()?;
        Ok(config)
    }

    /// Threshold must be finite and positive; hysteresis finite and
    /// non-negative.
    pub fn validate(&self) -> ArrivalResult<()> {
        if !self.threshold_m.is_finite() || self.threshold_m <= 0.0 {
            return Err(ArrivalError::Config(format!(
                "threshold_m must be a positive number of metres, got {}",
                self.threshold_m
            )));
        }
        if !self.hysteresis_m.is_finite() || self.hysteresis_m < 0.0 {
            return Err(ArrivalError::Config(format!(
                "hysteresis_m must be a non-negative number of metres, got {}",
                self.hysteresis_m
            )));
        }
        Ok(())
    }

    /// Distance beyond which an `Arrived` engineer reverts to `EnRoute`.
    #[inline]
    pub fn release_m(&self) -> f64 {
        self.threshold_m + self.hysteresis_m
    }

    /// Parse from TOML.  Missing keys take their defaults.
    pub fn from_toml_str(s: &str) -> ArrivalResult<Self> {
        let config: Self = toml::from_str(s)
            .map_err(|e| ArrivalError::Config(format!("failed to parse TOML: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML file.
    pub fn load_from_file(path: impl AsRef<Path>) -> ArrivalResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Apply `FD_ARRIVAL_*` overrides from the process environment.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup.
    ///
    /// Each override is checked on its own; a bad value is skipped without
    /// affecting the other.
    pub fn with_overrides_from<L>(mut self, lookup: L) -> Self
    where
        L: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(ENV_THRESHOLD_M) {
            let candidate = raw.trim().parse::<f64>().ok().map(|v| Self { threshold_m: v, ..self });
            match candidate {
                Some(c) if c.validate().is_ok() => self = c,
                _ => tracing::warn!(
                    "Invalid {} value '{}': expected a positive number of metres",
                    ENV_THRESHOLD_M,
                    raw
                ),
            }
        }

        if let Some(raw) = lookup(ENV_HYSTERESIS_M) {
            let candidate = raw.trim().parse::<f64>().ok().map(|v| Self { hysteresis_m: v, ..self });
            match candidate {
                Some(c) if c.validate().is_ok() => self = c,
                _ => tracing::warn!(
                    "Invalid {} value '{}': expected a non-negative number of metres",
                    ENV_HYSTERESIS_M,
                    raw
                ),
            }
        }

        self
    }
}
