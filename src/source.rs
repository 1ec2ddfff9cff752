//! Record-store boundary.
//!
//! The coverage engine never talks to a database. It reads one school's
//! records for one date through a [`RosterSource`], then computes over
//! the materialized copies. [`InMemoryRoster`] is a ready-made source for
//! fixtures, tests and embedding; it loads from JSON.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{Classroom, RatioRecord, RatioSettings, School, StaffMember, Student};

/// Failure reading from a record store.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The store could not be reached or refused the query.
    #[error("record store unavailable: {0}")]
    Unavailable(String),

    /// A record could not be decoded.
    #[error("malformed record: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Read access to one tenant's records.
///
/// Implementations may fetch concurrently; the engine only needs the
/// results.
pub trait RosterSource {
    /// The school record, or `None` if it does not exist.
    fn school(&self, school_id: &str) -> Result<Option<School>, SourceError>;

    /// Active staff of the school.
    fn active_staff(&self, school_id: &str) -> Result<Vec<StaffMember>, SourceError>;

    /// Classrooms of the school.
    fn classrooms(&self, school_id: &str) -> Result<Vec<Classroom>, SourceError>;

    /// Enrolled students of the school.
    fn students(&self, school_id: &str) -> Result<Vec<Student>, SourceError>;

    /// IDs of students marked present on `date`. Empty when no attendance
    /// was taken.
    fn present_student_ids(&self, school_id: &str, date: NaiveDate)
        -> Result<Vec<String>, SourceError>;

    /// Stored ratio policy records for the school.
    fn ratio_settings(&self, school_id: &str) -> Result<RatioSettings, SourceError>;
}

/// All records of one school.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchoolRecords {
    /// School record.
    pub school: School,
    /// Active staff.
    #[serde(default)]
    pub staff: Vec<StaffMember>,
    /// Classrooms.
    #[serde(default)]
    pub classrooms: Vec<Classroom>,
    /// Enrolled students.
    #[serde(default)]
    pub students: Vec<Student>,
    /// Present student IDs by date.
    #[serde(default)]
    pub attendance: BTreeMap<NaiveDate, Vec<String>>,
    /// School-level ratio overrides.
    #[serde(default)]
    pub ratios: Option<RatioRecord>,
}

impl SchoolRecords {
    /// Creates an empty record set for a school.
    pub fn new(school: School) -> Self {
        Self {
            school,
            staff: Vec::new(),
            classrooms: Vec::new(),
            students: Vec::new(),
            attendance: BTreeMap::new(),
            ratios: None,
        }
    }

    /// Adds a staff member.
    pub fn with_staff(mut self, member: StaffMember) -> Self {
        self.staff.push(member);
        self
    }

    /// Adds a classroom.
    pub fn with_classroom(mut self, classroom: Classroom) -> Self {
        self.classrooms.push(classroom);
        self
    }

    /// Adds a student.
    pub fn with_student(mut self, student: Student) -> Self {
        self.students.push(student);
        self
    }

    /// Records attendance for a date.
    pub fn with_attendance(mut self, date: NaiveDate, present: Vec<String>) -> Self {
        self.attendance.insert(date, present);
        self
    }

    /// Sets school-level ratio overrides.
    pub fn with_ratios(mut self, ratios: RatioRecord) -> Self {
        self.ratios = Some(ratios);
        self
    }
}

/// A record store held in memory.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InMemoryRoster {
    /// Organization-wide ratio defaults.
    #[serde(default)]
    pub global_ratios: Option<RatioRecord>,
    /// Schools.
    #[serde(default)]
    pub schools: Vec<SchoolRecords>,
}

impl InMemoryRoster {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a store from JSON.
    pub fn from_json(json: &str) -> Result<Self, SourceError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Adds a school.
    pub fn with_school(mut self, records: SchoolRecords) -> Self {
        self.schools.push(records);
        self
    }

    /// Sets organization-wide ratio defaults.
    pub fn with_global_ratios(mut self, ratios: RatioRecord) -> Self {
        self.global_ratios = Some(ratios);
        self
    }

    fn records(&self, school_id: &str) -> Option<&SchoolRecords> {
        self.schools.iter().find(|r| r.school.id == school_id)
    }

    fn with_records<T>(
        &self,
        school_id: &str,
        f: impl FnOnce(&SchoolRecords) -> T,
    ) -> Result<T, SourceError>
    where
        T: Default,
    {
        Ok(self.records(school_id).map(f).unwrap_or_default())
    }
}

impl RosterSource for InMemoryRoster {
    fn school(&self, school_id: &str) -> Result<Option<School>, SourceError> {
        Ok(self.records(school_id).map(|r| r.school.clone()))
    }

    fn active_staff(&self, school_id: &str) -> Result<Vec<StaffMember>, SourceError> {
        self.with_records(school_id, |r| r.staff.clone())
    }

    fn classrooms(&self, school_id: &str) -> Result<Vec<Classroom>, SourceError> {
        self.with_records(school_id, |r| r.classrooms.clone())
    }

    fn students(&self, school_id: &str) -> Result<Vec<Student>, SourceError> {
        self.with_records(school_id, |r| r.students.clone())
    }

    fn present_student_ids(
        &self,
        school_id: &str,
        date: NaiveDate,
    ) -> Result<Vec<String>, SourceError> {
        self.with_records(school_id, |r| {
            r.attendance.get(&date).cloned().unwrap_or_default()
        })
    }

    fn ratio_settings(&self, school_id: &str) -> Result<RatioSettings, SourceError> {
        Ok(RatioSettings {
            global: self.global_ratios.clone(),
            school: self.records(school_id).and_then(|r| r.ratios.clone()),
        })
    }
}
