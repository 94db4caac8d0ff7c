//! Settlement planning.
//!
//! Turns a balance snapshot into an ordered list of point-to-point transfers that brings
//! every balance to zero. Planning is read-only: nothing is posted until the caller records
//! each transfer as a settlement.

pub mod planner;

#[cfg(test)]
mod planner_props;

pub use planner::{SettlementPlan, SettlementPlanner, Transfer};
