use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::program::{IncentiveProgram, Requirement};
use super::types::Money;

/// Confidence tier attached to a value estimate.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, strum_macros::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

/// Min/expected/max dollar window for one program on one project.
/// Invariant: `0 <= min <= expected <= max`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ValueEstimate {
    pub min: Money,
    pub expected: Money,
    pub max: Money,
}

impl ValueEstimate {
    pub fn zero() -> Self {
        Self {
            min: Money::zero(),
            expected: Money::zero(),
            max: Money::zero(),
        }
    }

    /// Build from raw dollars, reordering so the invariant holds and
    /// flooring negatives to zero.
    pub fn from_window(min: f64, expected: f64, max: f64) -> Self {
        let min = min.max(0.0);
        let expected = expected.max(min);
        let max = max.max(expected);
        Self {
            min: Money::dollars(min),
            expected: Money::dollars(expected),
            max: Money::dollars(max),
        }
    }

    pub fn is_ordered(&self) -> bool {
        0.0 <= self.min.as_dollars()
            && self.min <= self.expected
            && self.expected <= self.max
    }
}

/// Outcome of evaluating one checklist requirement against the project.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, strum_macros::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RequirementStatus {
    Met,
    NotMet,
    /// Not decidable from the project snapshot; counts half credit.
    NeedsReview,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequirementCheck {
    pub requirement: Requirement,
    pub status: RequirementStatus,
}

/// One program scored against one project. Created fresh per run; never
/// persisted by the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchedIncentive {
    pub project_id: Uuid,
    /// Catalog entry this match was scored against, carried whole so the
    /// resolver and optimizer do not need the catalog again.
    pub program: IncentiveProgram,
    /// Composite score in [0, 1].
    pub score: f64,
    pub category_score: f64,
    pub location_score: f64,
    pub eligibility_score: f64,
    pub value: ValueEstimate,
    pub confidence: Confidence,
    pub reasons: Vec<String>,
    pub requirements: Vec<RequirementCheck>,
}

impl MatchedIncentive {
    pub fn program_id(&self) -> &str {
        &self.program.id
    }

    pub fn expected_value(&self) -> f64 {
        self.value.expected.as_dollars()
    }

    /// Requirements not yet satisfied (NotMet or NeedsReview). Feeds the
    /// optimizer tie-break.
    pub fn unmet_requirement_count(&self) -> usize {
        self.requirements
            .iter()
            .filter(|c| c.status != RequirementStatus::Met)
            .count()
    }
}
