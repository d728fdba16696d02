use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Which walk implementation to build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WalkKind {
    #[default]
    Random,
    PriceSeeded,
}

impl FromStr for WalkKind {
    type Err = WalkConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "random" => Ok(WalkKind::Random),
            "price-seeded" | "priceseeded" => Ok(WalkKind::PriceSeeded),
            other => Err(WalkConfigError::UnknownKind(other.to_string())),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum WalkConfigError {
    #[error("{field} out of range: {value}")]
    OutOfRange { field: &'static str, value: f64 },

    #[error("Unknown walk kind: {0}")]
    UnknownKind(String),
}

/// Tunables for the per-tick price walk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WalkConfig {
    pub kind: WalkKind,
    /// Chance (0.0 to 1.0) that an instrument is picked on a tick
    pub selection_probability: f64,
    /// Largest move per tick as a fraction of price (0.002 = 0.2%)
    pub max_move_percent: f64,
    /// Chance (0.0 to 1.0) that a picked instrument moves down
    pub down_probability: f64,
    /// RNG seed for reproducible runs
    pub seed: Option<u64>,
}

impl Default for WalkConfig {
    fn default() -> Self {
        Self {
            kind: WalkKind::Random,
            selection_probability: 0.1,
            max_move_percent: 0.002,
            down_probability: 0.51,
            seed: None,
        }
    }
}

impl WalkConfig {
    pub fn validate(&self) -> Result<(), WalkConfigError> {
        check_unit("selection_probability", self.selection_probability)?;
        check_unit("down_probability", self.down_probability)?;
        if !self.max_move_percent.is_finite() || !(0.0..1.0).contains(&self.max_move_percent) {
            return Err(WalkConfigError::OutOfRange {
                field: "max_move_percent",
                value: self.max_move_percent,
            });
        }
        Ok(())
    }
}

fn check_unit(field: &'static str, value: f64) -> Result<(), WalkConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(WalkConfigError::OutOfRange { field, value })
    }
}
