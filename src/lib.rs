//! Incentive eligibility matching and stacking optimization engine.
//!
//! Given a capital-project snapshot and a catalog of government/utility
//! incentive programs, the engine scores eligibility per program, builds the
//! pairwise compatibility graph (stackable vs. mutually exclusive), selects
//! the value-maximizing legal combination, and layers statutory bonus adders
//! and direct-pay eligibility on top.
//!
//! Everything here is synchronous and side-effect-free: identical inputs
//! yield identical outputs, and concurrent evaluations share no state. The
//! calling layer owns catalog retrieval and result persistence.

pub mod bonus;
pub mod compat;
pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod matcher;
pub mod optimizer;
pub mod telemetry;

pub use bonus::direct_pay::{
    check_direct_pay, estimate_direct_pay_value, DirectPayEstimate, DirectPayInputs,
    DirectPayResult,
};
pub use bonus::{BonusBreakdown, BonusCalculator};
pub use compat::{CompatibilityGraph, CompatibilityResolver};
pub use domain::{
    EntityProfile, IncentiveProgram, MatchedIncentive, Project, ValueEstimate,
};
pub use engine::{EngineConfig, FinalStackValuation, StackEngine};
pub use error::EngineError;
pub use matcher::{EligibilityMatcher, MatcherConfig};
pub use optimizer::{OptimizerConfig, StackOptimizer, StackingGroup, StackingPlan};
