//! Classroom and student presence models.

use serde::{Deserialize, Serialize};

use super::{ClockTime, TimeWindow};

/// Fixed classroom age category. Drives ratio lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgeGroup {
    /// Infants.
    Infant,
    /// Toddlers.
    Toddler,
    /// Two-year-olds.
    Twos,
    /// Three-year-olds.
    Threes,
    /// Preschool.
    Preschool,
    /// Pre-kindergarten.
    PreK,
}

impl AgeGroup {
    /// All age groups, youngest first.
    pub const ALL: [AgeGroup; 6] = [
        AgeGroup::Infant,
        AgeGroup::Toddler,
        AgeGroup::Twos,
        AgeGroup::Threes,
        AgeGroup::Preschool,
        AgeGroup::PreK,
    ];

    /// Infant and toddler rooms require infant-qualified staff.
    pub fn is_infant_room(self) -> bool {
        matches!(self, AgeGroup::Infant | AgeGroup::Toddler)
    }
}

/// A classroom of one school.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Classroom {
    /// Unique classroom identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Age category.
    pub age_group: AgeGroup,
}

impl Classroom {
    /// Creates a classroom.
    pub fn new(id: impl Into<String>, name: impl Into<String>, age_group: AgeGroup) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            age_group,
        }
    }
}

/// An enrolled student's classroom assignment and nap window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Student {
    /// Unique student identifier.
    pub id: String,
    /// Assigned classroom.
    pub classroom_id: String,
    /// Nap start.
    #[serde(default)]
    pub nap_start: Option<ClockTime>,
    /// Nap end.
    #[serde(default)]
    pub nap_end: Option<ClockTime>,
}

impl Student {
    /// Creates a student without a nap window.
    pub fn new(id: impl Into<String>, classroom_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            classroom_id: classroom_id.into(),
            nap_start: None,
            nap_end: None,
        }
    }

    /// Sets the nap window.
    pub fn with_nap(mut self, start: ClockTime, end: ClockTime) -> Self {
        self.nap_start = Some(start);
        self.nap_end = Some(end);
        self
    }

    /// Nap window, when both bounds are recorded.
    pub fn nap(&self) -> Option<TimeWindow> {
        TimeWindow::from_bounds(self.nap_start, self.nap_end)
    }

    /// Whether the student is napping at `time`.
    pub fn is_napping_at(&self, time: ClockTime) -> bool {
        self.nap().is_some_and(|w| w.contains(time))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::clock::t;

    #[test]
    fn test_infant_rooms() {
        assert!(AgeGroup::Infant.is_infant_room());
        assert!(AgeGroup::Toddler.is_infant_room());
        assert!(!AgeGroup::Twos.is_infant_room());
        assert_eq!(AgeGroup::ALL.iter().filter(|a| a.is_infant_room()).count(), 2);
    }

    #[test]
    fn test_student_nap() {
        let s = Student::new("S1", "C1").with_nap(t("12:30"), t("14:30"));
        assert!(!s.is_napping_at(t("12:00")));
        assert!(s.is_napping_at(t("12:30")));
        assert!(!s.is_napping_at(t("14:30")));
        assert!(!Student::new("S2", "C1").is_napping_at(t("13:00")));
    }

    #[test]
    fn test_age_group_serde() {
        let g: AgeGroup = serde_json::from_str("\"pre_k\"").unwrap();
        assert_eq!(g, AgeGroup::PreK);
        assert!(serde_json::from_str::<AgeGroup>("\"kindergarten\"").is_err());
    }
}
