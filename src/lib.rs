//! Staff-coverage optimization for child-care centers.
//!
//! Given one school's staff, classrooms, enrolled children, attendance and
//! ratio policy for a date, the engine answers two questions:
//!
//! - **Break optimization**: when should each working staff member take
//!   two short breaks, preferring nap time and avoiding collisions?
//! - **Minimal coverage**: what is the smallest set of staff that keeps
//!   every classroom in ratio all day, with infant/toddler rooms covered
//!   only by infant-qualified staff?
//!
//! # Modules
//!
//! - **`models`**: Domain types: `ClockTime`, `StaffMember`, `Classroom`,
//!   `Student`, `RatioPolicy`, and the result shapes
//! - **`demand`**: Nap-aware, ratio-driven staffing demand per classroom
//! - **`scheduler`**: Break placement, minimal coverage, staffing alerts
//! - **`selection`**: Pool ordering strategies for coverage selection
//! - **`source`**: Record-store boundary (`RosterSource`, `InMemoryRoster`)
//! - **`engine`**: Request handling around the two procedures
//! - **`validation`**: Input integrity checks (duplicate IDs, inverted windows)
//! - **`config`**, **`error`**: Tunables and the error type
//!
//! # Determinism
//!
//! Every computation is a pure function of its inputs. Identical inputs
//! produce identical results, including order.

pub mod config;
pub mod demand;
pub mod engine;
pub mod error;
pub mod models;
pub mod scheduler;
pub mod selection;
pub mod source;
pub mod validation;

pub use config::EngineConfig;
pub use engine::{CoverageEngine, CoverageInputs};
pub use error::{EngineError, EngineResult};
