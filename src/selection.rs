//! Selection-order strategies for greedy coverage selection.
//!
//! The minimal-coverage selector takes staff from a pool front to back,
//! so the order of the pool decides who is essential and who is surplus.
//! A [`SelectionStrategy`] fixes that order. Strategies must be
//! deterministic: identical pools yield identical orders.
//!
//! | Strategy | Order |
//! |----------|-------|
//! | [`ListOrder`] | Input order (stable, default) |
//! | [`ById`] | Lexicographic staff id |

use std::fmt;

use crate::models::StaffMember;

/// Orders a candidate pool before greedy selection.
pub trait SelectionStrategy: Send + Sync {
    /// Short identifier (e.g. "LIST", "ID").
    fn name(&self) -> &'static str;

    /// Returns the pool in selection order.
    fn order<'a>(&self, pool: Vec<&'a StaffMember>) -> Vec<&'a StaffMember>;

    /// Human-readable description.
    fn description(&self) -> &'static str {
        self.name()
    }
}

impl fmt::Debug for dyn SelectionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SelectionStrategy({})", self.name())
    }
}

/// Keeps the pool in input order.
#[derive(Debug, Clone, Copy, Default)]
pub struct ListOrder;

impl SelectionStrategy for ListOrder {
    fn name(&self) -> &'static str {
        "LIST"
    }

    fn order<'a>(&self, pool: Vec<&'a StaffMember>) -> Vec<&'a StaffMember> {
        pool
    }

    fn description(&self) -> &'static str {
        "Input List Order"
    }
}

/// Orders the pool by staff id.
#[derive(Debug, Clone, Copy, Default)]
pub struct ById;

impl SelectionStrategy for ById {
    fn name(&self) -> &'static str {
        "ID"
    }

    fn order<'a>(&self, mut pool: Vec<&'a StaffMember>) -> Vec<&'a StaffMember> {
        pool.sort_by(|a, b| a.id.cmp(&b.id));
        pool
    }

    fn description(&self) -> &'static str {
        "Lexicographic Staff ID"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(pool: &[&StaffMember]) -> Vec<String> {
        pool.iter().map(|s| s.id.clone()).collect()
    }

    #[test]
    fn test_list_order_is_stable() {
        let staff = [
            StaffMember::teacher("T3"),
            StaffMember::teacher("T1"),
            StaffMember::teacher("T2"),
        ];
        let ordered = ListOrder.order(staff.iter().collect());
        assert_eq!(ids(&ordered), ["T3", "T1", "T2"]);
    }

    #[test]
    fn test_by_id() {
        let staff = [
            StaffMember::teacher("T3"),
            StaffMember::teacher("T1"),
            StaffMember::teacher("T2"),
        ];
        let ordered = ById.order(staff.iter().collect());
        assert_eq!(ids(&ordered), ["T1", "T2", "T3"]);
    }

    #[test]
    fn test_trait_object_debug() {
        let s: Box<dyn SelectionStrategy> = Box::new(ById);
        assert_eq!(format!("{s:?}"), "SelectionStrategy(ID)");
        assert_eq!(s.description(), "Lexicographic Staff ID");
    }
}
