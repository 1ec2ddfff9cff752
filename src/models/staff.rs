//! Staff model.
//!
//! Staff members are the resources the coverage procedures assign. Each
//! has a role, an optional regular shift, an optional lunch window, a
//! home classroom and a structured qualification set.
//!
//! Qualifications arrive from the record store as free text. They are
//! parsed once, at the boundary, into [`Qualification`] tags so that the
//! coverage rules test capabilities instead of searching strings.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::{ClockTime, TimeWindow};

/// Staff role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StaffRole {
    /// Center director.
    Director,
    /// Assistant director.
    AssistantDirector,
    /// Lead teacher (always counts as infant-qualified).
    LeadTeacher,
    /// Teacher.
    Teacher,
    /// Classroom assistant.
    Assistant,
    /// Floating staff without a fixed room.
    Floater,
}

impl StaffRole {
    /// Directors and assistant directors do not count toward ratios.
    pub fn is_coverage_exempt(self) -> bool {
        matches!(self, StaffRole::Director | StaffRole::AssistantDirector)
    }
}

/// A structured qualification tag.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Qualification {
    /// Certified for infant and toddler rooms.
    InfantToddler,
    /// CPR certification.
    Cpr,
    /// First aid certification.
    FirstAid,
    /// Child Development Associate credential.
    Cda,
    /// Early childhood education degree.
    EarlyChildhoodDegree,
    /// Anything else, kept verbatim (trimmed).
    Other(String),
}

impl Qualification {
    /// Classifies one free-text qualification entry.
    fn classify(entry: &str) -> Self {
        let lower = entry.to_ascii_lowercase();
        if lower.contains("infant") {
            Qualification::InfantToddler
        } else if lower.contains("cpr") {
            Qualification::Cpr
        } else if lower.contains("first aid") || lower.contains("first-aid") {
            Qualification::FirstAid
        } else if lower == "cda" || lower.contains("child development associate") {
            Qualification::Cda
        } else if lower.contains("early childhood") || lower == "ece" {
            Qualification::EarlyChildhoodDegree
        } else {
            Qualification::Other(entry.to_string())
        }
    }
}

/// An ordered set of qualification tags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QualificationSet(BTreeSet<Qualification>);

impl QualificationSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses free text such as `"CPR, Infant/Toddler cert; First Aid"`.
    ///
    /// Entries are separated by `,` or `;`. Empty entries are dropped.
    pub fn parse(text: &str) -> Self {
        Self(
            text.split([',', ';'])
                .map(str::trim)
                .filter(|e| !e.is_empty())
                .map(Qualification::classify)
                .collect(),
        )
    }

    /// Adds a tag.
    pub fn insert(&mut self, tag: Qualification) {
        self.0.insert(tag);
    }

    /// Whether the set holds a tag.
    pub fn has(&self, tag: &Qualification) -> bool {
        self.0.contains(tag)
    }

    /// Iterates over the tags in order.
    pub fn iter(&self) -> impl Iterator<Item = &Qualification> {
        self.0.iter()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<Qualification> for QualificationSet {
    fn from_iter<I: IntoIterator<Item = Qualification>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum QualificationInput {
    Text(String),
    Tags(BTreeSet<Qualification>),
}

fn qualifications_from_text_or_tags<'de, D>(deserializer: D) -> Result<QualificationSet, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(match Option::<QualificationInput>::deserialize(deserializer)? {
        Some(QualificationInput::Text(text)) => QualificationSet::parse(&text),
        Some(QualificationInput::Tags(tags)) => QualificationSet(tags),
        None => QualificationSet::new(),
    })
}

/// A staff member of one school.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffMember {
    /// Unique staff identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Role.
    pub role: StaffRole,
    /// Home classroom title, if any.
    #[serde(default)]
    pub classroom_title: Option<String>,
    /// Regular shift start.
    #[serde(default)]
    pub shift_start: Option<ClockTime>,
    /// Regular shift end.
    #[serde(default)]
    pub shift_end: Option<ClockTime>,
    /// Recorded lunch start.
    #[serde(default)]
    pub lunch_start: Option<ClockTime>,
    /// Recorded lunch end.
    #[serde(default)]
    pub lunch_end: Option<ClockTime>,
    /// Qualification tags. Accepts a tag list or the record store's free text.
    #[serde(default, deserialize_with = "qualifications_from_text_or_tags")]
    pub qualifications: QualificationSet,
}

impl StaffMember {
    /// Creates a staff member with no shift, lunch or qualifications.
    pub fn new(id: impl Into<String>, role: StaffRole) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            role,
            classroom_title: None,
            shift_start: None,
            shift_end: None,
            lunch_start: None,
            lunch_end: None,
            qualifications: QualificationSet::new(),
        }
    }

    /// Creates a teacher.
    pub fn teacher(id: impl Into<String>) -> Self {
        Self::new(id, StaffRole::Teacher)
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the home classroom title.
    pub fn with_classroom(mut self, title: impl Into<String>) -> Self {
        self.classroom_title = Some(title.into());
        self
    }

    /// Sets the regular shift.
    pub fn with_shift(mut self, start: ClockTime, end: ClockTime) -> Self {
        self.shift_start = Some(start);
        self.shift_end = Some(end);
        self
    }

    /// Sets the lunch window.
    pub fn with_lunch(mut self, start: ClockTime, end: ClockTime) -> Self {
        self.lunch_start = Some(start);
        self.lunch_end = Some(end);
        self
    }

    /// Adds a qualification tag.
    pub fn with_qualification(mut self, tag: Qualification) -> Self {
        self.qualifications.insert(tag);
        self
    }

    /// Replaces qualifications with the tags parsed from free text.
    pub fn with_qualification_text(mut self, text: &str) -> Self {
        self.qualifications = QualificationSet::parse(text);
        self
    }

    /// Regular shift, when both bounds are recorded.
    pub fn shift(&self) -> Option<TimeWindow> {
        TimeWindow::from_bounds(self.shift_start, self.shift_end)
    }

    /// Recorded lunch, when both bounds are recorded.
    pub fn lunch(&self) -> Option<TimeWindow> {
        TimeWindow::from_bounds(self.lunch_start, self.lunch_end)
    }

    /// Whether this staff member works today (has a full shift).
    pub fn is_working(&self) -> bool {
        self.shift().is_some()
    }

    /// Whether this staff member is excluded from ratio coverage.
    pub fn is_coverage_exempt(&self) -> bool {
        self.role.is_coverage_exempt()
    }

    /// Whether this staff member may count toward infant/toddler coverage.
    pub fn is_infant_qualified(&self) -> bool {
        self.role == StaffRole::LeadTeacher
            || self.qualifications.has(&Qualification::InfantToddler)
    }
}
