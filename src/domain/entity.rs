use serde::{Deserialize, Serialize};

/// Statutory credit codes reachable through elective (direct) pay.
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
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CreditCode {
    /// §48 investment tax credit.
    InvestmentItc,
    /// §45 production tax credit (electricity).
    ProductionPtc,
    /// §48E clean electricity investment credit.
    CleanElectricityItc,
    /// §45Y clean electricity production credit.
    CleanElectricityPtc,
    /// §45V clean hydrogen production credit.
    CleanHydrogen,
    /// §45Q carbon capture and sequestration credit.
    CarbonCapture,
    /// §45W commercial clean vehicle credit.
    CleanVehicles,
    /// §45X advanced manufacturing production credit.
    AdvancedManufacturing,
}

/// Who is claiming the credit. Drives direct-pay eligibility.
#[derive(
    Debug,
    Clone,
    Copy,
    Serialize,
    Deserialize,
    PartialEq,
    Eq,
    strum_macros::Display,
    strum_macros::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EntityType {
    TaxExemptOrganization,
    StateOrLocalGovernment,
    TribalGovernment,
    RuralElectricCooperative,
    /// The Tennessee Valley Authority, the one designated regional power
    /// authority in the statute.
    RegionalPowerAuthority,
    AlaskaNativeCorporation,
    ForProfitBusiness,
    FederalAgency,
}

/// Entity descriptor handed in for direct-pay checks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityProfile {
    pub name: String,
    pub entity_type: EntityType,
    /// IRS-recognized tax-exempt status. Only meaningful for
    /// `TaxExemptOrganization`; a nonprofit that lost its exemption is not
    /// direct-pay eligible.
    #[serde(default)]
    pub tax_exempt: bool,
}
