//! Engine configuration.
//!
//! Every constant the coverage procedures depend on lives here, with
//! defaults matching the reference operating day. Configurations can be
//! built in code with the `with_*` setters or deserialized from JSON;
//! missing fields take their defaults.
//!
//! # Defaults
//!
//! | Setting | Default |
//! |---------|---------|
//! | Demand grid | 07:00–18:00, 30 min |
//! | Break-candidate grid | 09:00–17:00, 15 min |
//! | Nap threshold | > 0.7 of present children |
//! | Peak / nap instants | 10:00 / 13:00 |
//! | Break length | 10 min |
//! | Surplus alert margin | 2 |

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::{ClockTime, TimeGrid, DEFAULT_RATIO};

/// Source of the day-wide nap signal used when placing breaks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NapSignalScope {
    /// Napping if any occupied classroom is in nap mode.
    #[default]
    AnyClassroom,
    /// Napping if the first occupied classroom is in nap mode.
    FirstClassroom,
}

/// Tunables for demand evaluation and break placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Grid the demand curve is evaluated on.
    pub demand_grid: TimeGrid,
    /// Grid break candidates are drawn from.
    pub break_grid: TimeGrid,
    /// Fraction of present children that must be napping, exclusive.
    pub nap_threshold: f64,
    /// Ratio used when the policy has no entry.
    pub default_ratio: u32,
    /// Instant used for the peak-demand summary and alerts.
    pub peak_instant: ClockTime,
    /// Instant used for the nap-demand summary.
    pub nap_instant: ClockTime,
    /// Length of each short break (minutes).
    pub break_minutes: u16,
    /// Break 1 must start more than this many minutes after shift start.
    pub min_lead_after_shift_start: u16,
    /// Break 1 must end more than this many minutes before lunch.
    pub min_gap_before_lunch: u16,
    /// Break 2 must start more than this many minutes after lunch.
    pub min_gap_after_lunch: u16,
    /// Break 2 must end more than this many minutes before shift end.
    pub min_gap_before_shift_end: u16,
    /// Default break offset from shift start / lunch end (minutes).
    pub fallback_offset: u16,
    /// Break 2 offset back from shift end when no lunch is recorded.
    pub no_lunch_break2_offset: u16,
    /// Staff above peak need (exclusive) that raises a surplus alert.
    pub surplus_alert_margin: u32,
    /// Day-wide nap signal for break placement.
    pub nap_signal: NapSignalScope,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            demand_grid: TimeGrid::new(at(7, 0), at(18, 0), 30),
            break_grid: TimeGrid::new(at(9, 0), at(17, 0), 15),
            nap_threshold: 0.7,
            default_ratio: DEFAULT_RATIO,
            peak_instant: at(10, 0),
            nap_instant: at(13, 0),
            break_minutes: 10,
            min_lead_after_shift_start: 60,
            min_gap_before_lunch: 30,
            min_gap_after_lunch: 60,
            min_gap_before_shift_end: 30,
            fallback_offset: 120,
            no_lunch_break2_offset: 90,
            surplus_alert_margin: 2,
            nap_signal: NapSignalScope::AnyClassroom,
        }
    }
}

fn at(hours: u16, minutes: u16) -> ClockTime {
    ClockTime::from_minutes(hours * 60 + minutes).unwrap_or(ClockTime::MIDNIGHT)
}

impl EngineConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the demand grid.
    pub fn with_demand_grid(mut self, grid: TimeGrid) -> Self {
        self.demand_grid = grid;
        self
    }

    /// Sets the break-candidate grid.
    pub fn with_break_grid(mut self, grid: TimeGrid) -> Self {
        self.break_grid = grid;
        self
    }

    /// Sets the nap threshold.
    pub fn with_nap_threshold(mut self, threshold: f64) -> Self {
        self.nap_threshold = threshold;
        self
    }

    /// Sets the break length.
    pub fn with_break_minutes(mut self, minutes: u16) -> Self {
        self.break_minutes = minutes;
        self
    }

    /// Sets the nap-signal scope.
    pub fn with_nap_signal(mut self, scope: NapSignalScope) -> Self {
        self.nap_signal = scope;
        self
    }

    /// Sets the surplus alert margin.
    pub fn with_surplus_alert_margin(mut self, margin: u32) -> Self {
        self.surplus_alert_margin = margin;
        self
    }

    /// Rejects configurations the procedures cannot run with.
    pub fn validate(&self) -> EngineResult<()> {
        let invalid = |msg: &str| Err(EngineError::InvalidConfig(msg.to_string()));
        for (name, grid) in [("demand_grid", &self.demand_grid), ("break_grid", &self.break_grid)] {
            if grid.step_minutes == 0 {
                return invalid(&format!("{name} step must be positive"));
            }
            if grid.end < grid.start {
                return invalid(&format!("{name} ends before it starts"));
            }
        }
        if !(self.nap_threshold > 0.0 && self.nap_threshold < 1.0) {
            return invalid("nap_threshold must be within (0, 1)");
        }
        if self.default_ratio == 0 {
            return invalid("default_ratio must be positive");
        }
        if self.break_minutes == 0 {
            return invalid("break_minutes must be positive");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::clock::t;

    #[test]
    fn test_defaults_are_valid() {
        let c = EngineConfig::default();
        assert!(c.validate().is_ok());
        assert_eq!(c.demand_grid.len(), 23);
        assert_eq!(c.break_grid.len(), 33);
        assert_eq!(c.peak_instant, t("10:00"));
    }

    #[test]
    fn test_partial_json_takes_defaults() {
        let c: EngineConfig =
            serde_json::from_str(r#"{"break_minutes":15,"nap_signal":"first_classroom"}"#).unwrap();
        assert_eq!(c.break_minutes, 15);
        assert_eq!(c.nap_signal, NapSignalScope::FirstClassroom);
        assert_eq!(c.nap_instant, t("13:00"));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(EngineConfig::new().with_nap_threshold(1.0).validate().is_err());
        assert!(EngineConfig::new().with_break_minutes(0).validate().is_err());
        let inverted = TimeGrid::new(t("18:00"), t("07:00"), 30);
        assert!(EngineConfig::new().with_demand_grid(inverted).validate().is_err());
        let flat = TimeGrid::new(t("07:00"), t("18:00"), 0);
        assert!(EngineConfig::new().with_break_grid(flat).validate().is_err());
    }
}
