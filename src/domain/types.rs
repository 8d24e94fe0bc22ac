use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};

// ============================================================================
// Money
// ============================================================================

/// Dollar amount (USD). All program values and project costs use this newtype
/// so value arithmetic never mixes with rates or quantities.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, PartialOrd)]
pub struct Money(pub f64);

impl Money {
    pub fn dollars(d: f64) -> Self {
        Self(d)
    }

    pub fn zero() -> Self {
        Self(0.0)
    }

    pub fn as_dollars(&self) -> f64 {
        self.0
    }

    /// Clamp to a [min, max] window; either bound may be absent.
    pub fn clamp_to(&self, min: Option<Money>, max: Option<Money>) -> Money {
        let mut v = self.0;
        if let Some(lo) = min {
            v = v.max(lo.0);
        }
        if let Some(hi) = max {
            v = v.min(hi.0);
        }
        Money(v)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.abs() >= 1_000_000.0 {
            write!(f, "${:.2}M", self.0 / 1_000_000.0)
        } else if self.0.abs() >= 1_000.0 {
            write!(f, "${:.1}k", self.0 / 1_000.0)
        } else {
            write!(f, "${:.2}", self.0)
        }
    }
}

impl Add for Money {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Money {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        Self(iter.map(|m| m.0).sum())
    }
}

// ============================================================================
// Jurisdiction and mechanism
// ============================================================================

/// Level of government (or utility) offering a program. Ordering is the
/// reporting order: federal first, utility last.
#[derive(
    Debug,
    Clone,
    Copy,
    Serialize,
    Deserialize,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum_macros::Display,
    strum_macros::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum JurisdictionLevel {
    Federal,
    State,
    Local,
    Utility,
}

/// Funding mechanism. Programs with different mechanisms never compete for
/// the same cost basis; same-level same-mechanism pairs may.
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
pub enum Mechanism {
    TaxCredit,
    Grant,
    Rebate,
    Loan,
    /// Federal credit eligible for elective (cash) pay.
    DirectPayCredit,
}

impl Mechanism {
    /// Direct-pay credits are tax credits for stacking purposes.
    pub fn basis_family(&self) -> Mechanism {
        match self {
            Mechanism::DirectPayCredit => Mechanism::TaxCredit,
            other => *other,
        }
    }
}

// ============================================================================
// Project categories
// ============================================================================

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
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Sector {
    Residential,
    Commercial,
    Industrial,
    Institutional,
    Agricultural,
}

impl Sector {
    /// Sectors a program for `self` gives partial credit to.
    pub fn adjacent(&self) -> &'static [Sector] {
        match self {
            Sector::Commercial => &[Sector::Industrial, Sector::Institutional],
            Sector::Industrial => &[Sector::Commercial, Sector::Agricultural],
            Sector::Institutional => &[Sector::Commercial],
            Sector::Residential => &[],
            Sector::Agricultural => &[Sector::Industrial],
        }
    }
}

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
pub enum ConstructionType {
    NewConstruction,
    Retrofit,
    Expansion,
}

/// Energy technology categories used for matching and for the
/// technology-overlap exclusion rule.
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
pub enum Technology {
    SolarPv,
    WindTurbine,
    BatteryStorage,
    GeothermalHeatPump,
    AirSourceHeatPump,
    EvCharging,
    CleanHydrogen,
    CarbonCapture,
    CombinedHeatPower,
    EnvelopeEfficiency,
}
