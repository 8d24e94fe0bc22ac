use serde::{Deserialize, Serialize};

use super::entity::CreditCode;
use super::types::{JurisdictionLevel, Mechanism, Sector, Technology};

/// Catalog entry for one incentive program. Read-only to the engine; the
/// catalog itself is owned by an external collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncentiveProgram {
    /// Stable catalog id, e.g. "us-itc-48" or "ny-nyserda-mf-nc".
    pub id: String,
    pub name: String,
    pub level: JurisdictionLevel,
    /// Jurisdiction code the program is scoped to (state code, city name,
    /// utility name). `None` means nationwide at its level.
    pub jurisdiction_code: Option<String>,
    pub mechanism: Mechanism,
    /// Empty list means sector-agnostic.
    #[serde(default)]
    pub sectors: Vec<Sector>,
    /// Empty list means any building type.
    #[serde(default)]
    pub building_types: Vec<String>,
    /// Empty list means technology-agnostic.
    #[serde(default)]
    pub technologies: Vec<Technology>,
    pub amount: AmountModel,
    #[serde(default)]
    pub bonus_adders: Vec<BonusAdder>,
    /// Cap on the sum of bonus percentages, percentage points.
    pub bonus_ceiling_percent: Option<f64>,
    /// Explicitly non-stackable programs conflict with everything.
    #[serde(default = "default_true")]
    pub stackable: bool,
    /// Program ids this program may not be combined with. Overrides the
    /// rule table in either direction.
    #[serde(default)]
    pub excludes: Vec<String>,
    #[serde(default)]
    pub requirements: Vec<Requirement>,
    /// Set when the program is a federal credit reachable through elective
    /// pay; names the statutory credit code.
    pub direct_pay_credit: Option<CreditCode>,
}

fn default_true() -> bool {
    true
}

/// How a program's dollar value is computed. Closed variant set with one
/// exhaustive evaluator in `matcher::value`; adding a model is a checked
/// extension point.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum AmountModel {
    /// Flat award.
    Fixed { amount: f64 },
    /// `rate` is a fraction of the qualifying basis (0.30 = 30%).
    PercentOfBasis {
        rate: f64,
        min: Option<f64>,
        max: Option<f64>,
    },
    /// Per dwelling/tenant unit.
    PerUnit { amount: f64 },
    /// Per kW of nameplate capacity.
    PerKilowatt { amount: f64 },
    /// Per kWh of estimated annual production.
    PerKilowattHour { amount: f64 },
    /// Free-form formula the engine cannot evaluate; falls back to
    /// `default_value` and flags the match low-confidence.
    Formula {
        expression: String,
        default_value: Option<f64>,
    },
}

/// Statutory bonus adder categories.
#[derive(
    Debug,
    Clone,
    Copy,
    Serialize,
    Deserialize,
    PartialEq,
    Eq,
    Hash,
    strum_macros::Display,
    strum_macros::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum BonusKind {
    DomesticContent,
    EnergyCommunity,
    LowIncomeCommunity,
    PrevailingWage,
}

/// A bonus adder declared on a program: `percent` percentage points added to
/// the same basis as the base amount when the project qualifies.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct BonusAdder {
    pub kind: BonusKind,
    pub percent: f64,
}

/// One entry of a program's requirement checklist.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Requirement {
    pub description: String,
    pub kind: RequirementKind,
}

/// Machine-checkable requirement predicates. `Manual` requirements cannot be
/// decided from the project snapshot and score as "needs review".
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RequirementKind {
    MinCapacityKw { kw: f64 },
    MinUnits { units: u32 },
    MinSquareFeet { sqft: f64 },
    PrevailingWage,
    DomesticContent,
    EnergyCommunityLocation,
    LowIncomeCommunityLocation,
    Certification { name: String },
    NewConstructionOnly,
    /// Needs human review against program documents.
    Manual,
}
