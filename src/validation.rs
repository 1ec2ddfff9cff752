//! Input validation for coverage runs.
//!
//! Checks structural integrity of staff, classroom and student records
//! before any computation. Detects:
//! - Duplicate IDs
//! - Inverted shifts (end at or before start)
//! - Lunch windows that are inverted or fall outside the shift
//! - Inverted nap windows
//!
//! Students pointing at unknown classrooms are not errors: the demand
//! model ignores them.

use std::collections::HashSet;

use crate::models::{Classroom, StaffMember, Student, TimeWindow};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two entities share the same ID.
    DuplicateId,
    /// Shift end is not after shift start.
    InvertedShift,
    /// Lunch is inverted or not inside the shift.
    InvalidLunch,
    /// Nap end is not after nap start.
    InvertedNap,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates the records for one coverage run.
///
/// Checks:
/// 1. No duplicate staff, classroom or student IDs
/// 2. Every full shift has `end > start`
/// 3. Every full lunch has `end > start` and lies inside the shift
/// 4. Every full nap window has `end > start`
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_input(
    staff: &[StaffMember],
    classrooms: &[Classroom],
    students: &[Student],
) -> ValidationResult {
    let mut errors = Vec::new();

    check_unique("staff", staff.iter().map(|s| s.id.as_str()), &mut errors);
    check_unique("classroom", classrooms.iter().map(|c| c.id.as_str()), &mut errors);
    check_unique("student", students.iter().map(|s| s.id.as_str()), &mut errors);

    for member in staff {
        let shift = member.shift();
        if let Some(shift) = shift.filter(|w| !w.is_valid()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvertedShift,
                format!("Staff '{}' shift {shift} ends before it starts", member.id),
            ));
            continue;
        }
        if let Some(lunch) = member.lunch() {
            if !lunch.is_valid() {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidLunch,
                    format!("Staff '{}' lunch {lunch} ends before it starts", member.id),
                ));
            } else if shift.is_some_and(|s| !s.encloses(&lunch)) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidLunch,
                    format!("Staff '{}' lunch {lunch} is outside the shift", member.id),
                ));
            }
        }
    }

    for student in students {
        if let Some(nap) = student.nap().filter(|w: &TimeWindow| !w.is_valid()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvertedNap,
                format!("Student '{}' nap {nap} ends before it starts", student.id),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_unique<'a>(
    label: &str,
    ids: impl Iterator<Item = &'a str>,
    errors: &mut Vec<ValidationError>,
) {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate {label} ID: {id}"),
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::clock::t;
    use crate::models::AgeGroup;

    fn sample_staff() -> Vec<StaffMember> {
        vec![
            StaffMember::teacher("T1")
                .with_shift(t("08:00"), t("17:00"))
                .with_lunch(t("12:00"), t("13:00")),
            StaffMember::teacher("T2"),
        ]
    }

    fn sample_rooms() -> Vec<Classroom> {
        vec![Classroom::new("C1", "Infant A", AgeGroup::Infant)]
    }

    fn sample_students() -> Vec<Student> {
        vec![
            Student::new("S1", "C1").with_nap(t("12:30"), t("14:30")),
            Student::new("S2", "unknown-room"),
        ]
    }

    #[test]
    fn test_valid_input() {
        assert!(validate_input(&sample_staff(), &sample_rooms(), &sample_students()).is_ok());
    }

    #[test]
    fn test_duplicate_staff_id() {
        let staff = vec![StaffMember::teacher("T1"), StaffMember::teacher("T1")];
        let errors = validate_input(&staff, &sample_rooms(), &[]).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::DuplicateId && e.message.contains("staff")));
    }

    #[test]
    fn test_duplicate_classroom_id() {
        let rooms = vec![
            Classroom::new("C1", "A", AgeGroup::Twos),
            Classroom::new("C1", "B", AgeGroup::Threes),
        ];
        let errors = validate_input(&[], &rooms, &[]).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("classroom"));
    }

    #[test]
    fn test_inverted_shift() {
        let staff = vec![StaffMember::teacher("T1").with_shift(t("17:00"), t("08:00"))];
        let errors = validate_input(&staff, &[], &[]).unwrap_err();
        assert_eq!(errors[0].kind, ValidationErrorKind::InvertedShift);
    }

    #[test]
    fn test_lunch_outside_shift() {
        let staff = vec![StaffMember::teacher("T1")
            .with_shift(t("13:00"), t("18:00"))
            .with_lunch(t("11:00"), t("12:00"))];
        let errors = validate_input(&staff, &[], &[]).unwrap_err();
        assert_eq!(errors[0].kind, ValidationErrorKind::InvalidLunch);
    }

    #[test]
    fn test_inverted_nap() {
        let students = vec![Student::new("S1", "C1").with_nap(t("14:00"), t("13:00"))];
        let errors = validate_input(&[], &sample_rooms(), &students).unwrap_err();
        assert_eq!(errors[0].kind, ValidationErrorKind::InvertedNap);
    }

    #[test]
    fn test_multiple_errors() {
        let staff = vec![
            StaffMember::teacher("T1").with_shift(t("09:00"), t("09:00")),
            StaffMember::teacher("T1"),
        ];
        let students = vec![Student::new("S1", "C1"), Student::new("S1", "C1")];
        let errors = validate_input(&staff, &[], &students).unwrap_err();
        assert!(errors.len() >= 3);
    }
}
