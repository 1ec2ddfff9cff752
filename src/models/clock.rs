//! Wall-clock time and time window models.
//!
//! All arithmetic happens on minutes since midnight. Values cross the
//! crate boundary as 24-hour `HH:MM` strings.
//!
//! # Time Model
//! A [`ClockTime`] is a point within one operating day. A [`TimeWindow`]
//! is a half-open interval `[start, end)` of such points. A [`TimeGrid`]
//! is an inclusive, evenly stepped sequence of points used for demand
//! evaluation and break-candidate search.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::EngineError;

/// Minutes in one day. Valid only as an exclusive end.
pub const MINUTES_PER_DAY: u16 = 24 * 60;

/// A wall-clock time, stored as minutes since midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ClockTime(u16);

impl ClockTime {
    /// Midnight.
    pub const MIDNIGHT: ClockTime = ClockTime(0);

    /// End of day (24:00), exclusive.
    pub const END_OF_DAY: ClockTime = ClockTime(MINUTES_PER_DAY);

    /// Creates a time from hours and minutes.
    ///
    /// Returns `None` outside `00:00..=24:00`.
    pub fn hm(hours: u16, minutes: u16) -> Option<Self> {
        if minutes >= 60 {
            return None;
        }
        Self::from_minutes(hours.checked_mul(60)?.checked_add(minutes)?)
    }

    /// Creates a time from minutes since midnight.
    pub fn from_minutes(minutes: u16) -> Option<Self> {
        (minutes <= MINUTES_PER_DAY).then_some(Self(minutes))
    }

    /// Minutes since midnight.
    #[inline]
    pub fn minutes(self) -> u16 {
        self.0
    }

    /// Adds minutes, saturating at 24:00.
    #[inline]
    pub fn plus_minutes(self, minutes: u16) -> Self {
        Self(self.0.saturating_add(minutes).min(MINUTES_PER_DAY))
    }

    /// Subtracts minutes, saturating at 00:00.
    #[inline]
    pub fn minus_minutes(self, minutes: u16) -> Self {
        Self(self.0.saturating_sub(minutes))
    }

    /// Signed distance `other - self` in minutes.
    #[inline]
    pub fn minutes_until(self, other: ClockTime) -> i32 {
        i32::from(other.0) - i32::from(self.0)
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.0 / 60, self.0 % 60)
    }
}

impl FromStr for ClockTime {
    type Err = EngineError;

    /// Parses `HH:MM` or `HH:MM:SS` (seconds are ignored).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || EngineError::InvalidClockTime(s.to_string());
        let mut parts = s.trim().split(':');
        let hours = parts.next().ok_or_else(invalid)?;
        let minutes = parts.next().ok_or_else(invalid)?;
        if let Some(seconds) = parts.next() {
            seconds.parse::<u16>().ok().filter(|s| *s < 60).ok_or_else(invalid)?;
        }
        if parts.next().is_some() {
            return Err(invalid());
        }
        let hours: u16 = hours.parse().map_err(|_| invalid())?;
        let minutes: u16 = minutes.parse().map_err(|_| invalid())?;
        Self::hm(hours, minutes).ok_or_else(invalid)
    }
}

impl Serialize for ClockTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ClockTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// A time interval [start, end).
///
/// Half-open interval: includes start, excludes end.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TimeWindow {
    /// Interval start (inclusive).
    pub start: ClockTime,
    /// Interval end (exclusive).
    pub end: ClockTime,
}

impl TimeWindow {
    /// Creates a new time window.
    pub fn new(start: ClockTime, end: ClockTime) -> Self {
        Self { start, end }
    }

    /// Builds a window from optional bounds; both must be present.
    pub fn from_bounds(start: Option<ClockTime>, end: Option<ClockTime>) -> Option<Self> {
        Some(Self::new(start?, end?))
    }

    /// A window of `minutes` length starting at `start`.
    pub fn starting_at(start: ClockTime, minutes: u16) -> Self {
        Self::new(start, start.plus_minutes(minutes))
    }

    /// Duration of this window in minutes (0 if inverted).
    #[inline]
    pub fn duration_minutes(&self) -> u16 {
        self.end.minutes().saturating_sub(self.start.minutes())
    }

    /// Whether `end > start`.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.end > self.start
    }

    /// Whether a time falls within this window.
    #[inline]
    pub fn contains(&self, time: ClockTime) -> bool {
        time >= self.start && time < self.end
    }

    /// Whether `other` lies entirely inside this window.
    pub fn encloses(&self, other: &Self) -> bool {
        other.start >= self.start && other.end <= self.end
    }

    /// Whether two windows overlap.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// An inclusive, evenly stepped sequence of clock times.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TimeGrid {
    /// First point (inclusive).
    pub start: ClockTime,
    /// Last point (inclusive).
    pub end: ClockTime,
    /// Step in minutes.
    pub step_minutes: u16,
}

impl TimeGrid {
    /// Creates a grid.
    pub fn new(start: ClockTime, end: ClockTime, step_minutes: u16) -> Self {
        Self {
            start,
            end,
            step_minutes,
        }
    }

    /// Iterates over every grid point, `start..=end`.
    ///
    /// An empty iterator for a zero step or an inverted grid.
    pub fn points(&self) -> impl Iterator<Item = ClockTime> + '_ {
        let step = usize::from(self.step_minutes.max(1));
        let count = if self.step_minutes == 0 || self.end < self.start {
            0
        } else {
            usize::from(self.end.minutes() - self.start.minutes()) / step + 1
        };
        (self.start.minutes()..=self.end.minutes())
            .step_by(step)
            .take(count)
            .map(ClockTime)
    }

    /// Number of grid points.
    pub fn len(&self) -> usize {
        self.points().count()
    }

    /// Whether the grid has no points.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
pub(crate) fn t(s: &str) -> ClockTime {
    s.parse().expect("valid clock time")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        assert_eq!(t("07:30").minutes(), 450);
        assert_eq!(t("7:05").to_string(), "07:05");
        assert_eq!(t("13:00:59").to_string(), "13:00");
        assert_eq!(t("24:00"), ClockTime::END_OF_DAY);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for bad in ["", "12", "12:60", "25:00", "ab:cd", "12:00:00:00", "12:00:75"] {
            assert!(bad.parse::<ClockTime>().is_err(), "{bad} should not parse");
        }
    }

    #[test]
    fn test_saturating_arithmetic() {
        assert_eq!(t("23:50").plus_minutes(30), ClockTime::END_OF_DAY);
        assert_eq!(t("00:10").minus_minutes(30), ClockTime::MIDNIGHT);
        assert_eq!(t("10:00").minutes_until(t("09:30")), -30);
    }

    #[test]
    fn test_serde_as_string() {
        let json = serde_json::to_string(&t("09:15")).unwrap();
        assert_eq!(json, "\"09:15\"");
        let back: ClockTime = serde_json::from_str(&json).unwrap();
        assert_eq!(back, t("09:15"));
        assert!(serde_json::from_str::<ClockTime>("\"9h15\"").is_err());
    }

    #[test]
    fn test_time_window() {
        let w = TimeWindow::new(t("12:00"), t("13:00"));
        assert_eq!(w.duration_minutes(), 60);
        assert!(w.contains(t("12:00")));
        assert!(w.contains(t("12:59")));
        assert!(!w.contains(t("13:00"))); // exclusive end
        assert!(w.is_valid());
        assert!(!TimeWindow::new(t("13:00"), t("12:00")).is_valid());
    }

    #[test]
    fn test_time_window_overlap() {
        let a = TimeWindow::new(t("09:00"), t("10:00"));
        let b = TimeWindow::new(t("09:30"), t("10:30"));
        let c = TimeWindow::new(t("10:00"), t("11:00")); // touching
        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c));
        assert!(TimeWindow::new(t("08:00"), t("17:00")).encloses(&a));
    }

    #[test]
    fn test_grid_points() {
        let grid = TimeGrid::new(t("07:00"), t("18:00"), 30);
        let points: Vec<_> = grid.points().collect();
        assert_eq!(points.len(), 23);
        assert_eq!(points[0], t("07:00"));
        assert_eq!(points[22], t("18:00"));

        let empty = TimeGrid::new(t("10:00"), t("09:00"), 15);
        assert!(empty.is_empty());
        assert!(TimeGrid::new(t("10:00"), t("11:00"), 0).is_empty());
    }
}
