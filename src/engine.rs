//! Coverage engine: request handling around the two procedures.
//!
//! # Flow
//!
//! 1. Validate request parameters (school id, `YYYY-MM-DD` date).
//! 2. Fetch the school's records from the [`RosterSource`].
//! 3. Validate the records.
//! 4. Build the demand model and run the procedure.
//!
//! Steps 1–3 fail fast with an [`EngineError`]. Once they pass, a result
//! is always returned; sparse data and infeasible demand show up in
//! `warnings` and `alerts`.

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::config::EngineConfig;
use crate::demand::{DemandModel, PresentRoster};
use crate::error::{EngineError, EngineResult};
use crate::models::{
    BreakOptimizationResult, Classroom, MinimalCoverageResult, RatioPolicy, RatioSettings, School,
    StaffMember, Student,
};
use crate::scheduler::{schedule_breaks, select_minimal_coverage, staffing_alerts, summarize};
use crate::selection::{ListOrder, SelectionStrategy};
use crate::source::RosterSource;
use crate::validation::validate_input;

/// Materialized inputs for one (school, date) run.
#[derive(Debug, Clone)]
pub struct CoverageInputs {
    /// School record.
    pub school: School,
    /// Planned date.
    pub date: NaiveDate,
    /// Active staff.
    pub staff: Vec<StaffMember>,
    /// Classrooms.
    pub classrooms: Vec<Classroom>,
    /// Enrolled students.
    pub students: Vec<Student>,
    /// Students marked present (empty = no attendance taken).
    pub present_ids: Vec<String>,
    /// Stored ratio policy records.
    pub ratios: RatioSettings,
}

impl CoverageInputs {
    /// Creates inputs with no records.
    pub fn new(school: School, date: NaiveDate) -> Self {
        Self {
            school,
            date,
            staff: Vec::new(),
            classrooms: Vec::new(),
            students: Vec::new(),
            present_ids: Vec::new(),
            ratios: RatioSettings::default(),
        }
    }

    /// Reads everything one run needs from `source`.
    pub fn fetch<S: RosterSource + ?Sized>(
        source: &S,
        school_id: &str,
        date: &str,
    ) -> EngineResult<Self> {
        let school_id = school_id.trim();
        if school_id.is_empty() {
            return Err(EngineError::MissingSchoolId);
        }
        let date = parse_date(date)?;
        let school = source
            .school(school_id)?
            .ok_or_else(|| EngineError::SchoolNotFound(school_id.to_string()))?;

        Ok(Self {
            staff: source.active_staff(school_id)?,
            classrooms: source.classrooms(school_id)?,
            students: source.students(school_id)?,
            present_ids: source.present_student_ids(school_id, date)?,
            ratios: source.ratio_settings(school_id)?,
            school,
            date,
        })
    }
}

/// Parses a `YYYY-MM-DD` request date.
pub fn parse_date(date: &str) -> EngineResult<NaiveDate> {
    NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
        .map_err(|_| EngineError::InvalidDate(date.to_string()))
}

/// Demand model plus the data-sparsity warnings found building it.
struct Prepared {
    demand: DemandModel,
    warnings: Vec<String>,
}

/// Runs break optimization and minimal coverage for a record store.
///
/// # Example
/// ```
/// use u_coverage::engine::CoverageEngine;
/// use u_coverage::models::{AgeGroup, Classroom, ClockTime, School, StaffMember, Student};
/// use u_coverage::source::{InMemoryRoster, SchoolRecords};
///
/// let t = |s: &str| s.parse::<ClockTime>().unwrap();
/// let mut records = SchoolRecords::new(School::new("s1", "Maple"))
///     .with_classroom(Classroom::new("C1", "Twos", AgeGroup::Twos))
///     .with_staff(StaffMember::teacher("T1").with_shift(t("08:00"), t("17:00")));
/// for i in 0..10 {
///     records = records.with_student(Student::new(format!("S{i}"), "C1"));
/// }
/// let engine = CoverageEngine::new(InMemoryRoster::new().with_school(records));
///
/// let plan = engine.minimal_coverage("s1", "2026-10-16").unwrap();
/// assert_eq!(plan.minimal_teachers_needed, 1);
/// assert!(engine.minimal_coverage("missing", "2026-10-16").is_err());
/// ```
pub struct CoverageEngine<S> {
    source: S,
    config: EngineConfig,
    strategy: Box<dyn SelectionStrategy>,
}

impl<S: RosterSource> CoverageEngine<S> {
    /// Creates an engine with the default configuration and list order.
    pub fn new(source: S) -> Self {
        Self {
            source,
            config: EngineConfig::default(),
            strategy: Box::new(ListOrder),
        }
    }

    /// Sets the configuration.
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the selection-order strategy.
    pub fn with_strategy<T: SelectionStrategy + 'static>(mut self, strategy: T) -> Self {
        self.strategy = Box::new(strategy);
        self
    }

    /// Active configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Underlying record store.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Fetches inputs and places breaks for every working staff member.
    pub fn optimize_breaks(
        &self,
        school_id: &str,
        date: &str,
    ) -> EngineResult<BreakOptimizationResult> {
        let inputs = CoverageInputs::fetch(&self.source, school_id, date)?;
        self.optimize_breaks_for(&inputs)
    }

    /// Fetches inputs and selects the minimal covering staff subset.
    pub fn minimal_coverage(
        &self,
        school_id: &str,
        date: &str,
    ) -> EngineResult<MinimalCoverageResult> {
        let inputs = CoverageInputs::fetch(&self.source, school_id, date)?;
        self.minimal_coverage_for(&inputs)
    }

    /// Places breaks over already-fetched inputs.
    pub fn optimize_breaks_for(
        &self,
        inputs: &CoverageInputs,
    ) -> EngineResult<BreakOptimizationResult> {
        info!(school_id = %inputs.school.id, date = %inputs.date, "optimizing breaks");
        let Prepared { demand, warnings } = self.prepare(inputs)?;

        let breaks = schedule_breaks(&inputs.staff, &demand, &self.config);
        let coverage_summary = summarize(&inputs.staff, &demand);
        let alerts = staffing_alerts(&coverage_summary, &self.config);

        info!(
            school_id = %inputs.school.id,
            breaks = breaks.len(),
            alerts = alerts.len(),
            "breaks optimized"
        );
        Ok(BreakOptimizationResult {
            success: true,
            date: inputs.date,
            school_id: inputs.school.id.clone(),
            school_name: inputs.school.name.clone(),
            breaks,
            alerts,
            coverage_summary,
            warnings,
        })
    }

    /// Selects minimal coverage over already-fetched inputs.
    pub fn minimal_coverage_for(
        &self,
        inputs: &CoverageInputs,
    ) -> EngineResult<MinimalCoverageResult> {
        info!(school_id = %inputs.school.id, date = %inputs.date, "computing minimal coverage");
        let Prepared {
            demand,
            mut warnings,
        } = self.prepare(inputs)?;

        let curve = demand.curve();
        let plan = select_minimal_coverage(
            &inputs.staff,
            &inputs.classrooms,
            &curve,
            &self.config,
            self.strategy.as_ref(),
        );

        let current = u32::try_from(plan.essential.len() + plan.surplus.len()).unwrap_or(u32::MAX);
        let minimal = plan.minimal_staff_needed();
        warnings.extend(plan.warnings);

        info!(
            school_id = %inputs.school.id,
            current,
            minimal,
            "minimal coverage computed"
        );
        Ok(MinimalCoverageResult {
            success: true,
            date: inputs.date,
            school_id: inputs.school.id.clone(),
            school_name: inputs.school.name.clone(),
            current_teachers: current,
            minimal_teachers_needed: minimal,
            potential_savings: current.saturating_sub(minimal),
            essential_teachers: plan.essential,
            surplus_teachers: plan.surplus,
            warnings,
        })
    }

    fn prepare(&self, inputs: &CoverageInputs) -> EngineResult<Prepared> {
        self.config.validate()?;
        validate_input(&inputs.staff, &inputs.classrooms, &inputs.students)
            .map_err(EngineError::InvalidInput)?;

        let present = PresentRoster::resolve(&inputs.students, &inputs.present_ids);
        let demand = DemandModel::build(
            &inputs.classrooms,
            &present,
            RatioPolicy::resolve(&inputs.ratios),
            &self.config,
        );

        let mut warnings = Vec::new();
        if inputs.students.is_empty() {
            warnings.push(format!(
                "No enrolled students found for {}; demand is zero",
                inputs.school.name
            ));
        } else if present.is_fallback() {
            warnings.push(format!(
                "No attendance recorded for {}; treating all {} enrolled students as present",
                inputs.date,
                inputs.students.len()
            ));
        }
        if !inputs.students.is_empty() && demand.occupied_classrooms().next().is_none() {
            warnings.push("No classrooms have present students; demand is zero".to_string());
        }
        for w in &warnings {
            warn!(school_id = %inputs.school.id, "{w}");
        }

        Ok(Prepared { demand, warnings })
    }
}
