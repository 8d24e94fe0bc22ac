//! Direct-pay (elective payment) eligibility and value estimation.
//!
//! Only the statutory list of tax-exempt and governmental entity types can
//! take a credit as a cash refund; everyone else is pointed at the
//! transfer-sale alternative. Credit rates live in a data table keyed by
//! credit code so statute updates are table edits.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

use crate::domain::{CreditCode, EntityProfile, EntityType};

/// How a credit's dollar value is measured.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RateBasis {
    /// Fraction of total qualifying investment (0.30 = 30%).
    PercentOfInvestment { rate: f64 },
    /// Dollars per produced/placed unit.
    PerUnit { rate: f64, unit: ProductionUnit },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, strum_macros::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ProductionUnit {
    KilowattHour,
    KilogramHydrogen,
    TonneCo2,
    Vehicle,
}

/// Statutory rate entry for one credit code.
#[derive(Debug, Clone, Copy)]
pub struct CreditRate {
    pub basis: RateBasis,
    /// Multiplier unlocked by meeting both prevailing-wage and
    /// apprenticeship conditions, where the statute defines one.
    pub labor_multiplier: Option<f64>,
}

/// Statutory credit-rate table. Data, not branches: a rate change under a
/// new revenue procedure edits this table only.
pub static CREDIT_RATES: Lazy<BTreeMap<CreditCode, CreditRate>> = Lazy::new(|| {
    BTreeMap::from([
        (
            CreditCode::InvestmentItc,
            CreditRate {
                basis: RateBasis::PercentOfInvestment { rate: 0.30 },
                labor_multiplier: Some(5.0),
            },
        ),
        (
            CreditCode::CleanElectricityItc,
            CreditRate {
                basis: RateBasis::PercentOfInvestment { rate: 0.30 },
                labor_multiplier: Some(5.0),
            },
        ),
        (
            CreditCode::ProductionPtc,
            CreditRate {
                basis: RateBasis::PerUnit {
                    rate: 0.003,
                    unit: ProductionUnit::KilowattHour,
                },
                labor_multiplier: Some(5.0),
            },
        ),
        (
            CreditCode::CleanElectricityPtc,
            CreditRate {
                basis: RateBasis::PerUnit {
                    rate: 0.003,
                    unit: ProductionUnit::KilowattHour,
                },
                labor_multiplier: Some(5.0),
            },
        ),
        (
            CreditCode::CleanHydrogen,
            CreditRate {
                basis: RateBasis::PerUnit {
                    rate: 0.60,
                    unit: ProductionUnit::KilogramHydrogen,
                },
                labor_multiplier: Some(5.0),
            },
        ),
        (
            CreditCode::CarbonCapture,
            CreditRate {
                basis: RateBasis::PerUnit {
                    rate: 17.0,
                    unit: ProductionUnit::TonneCo2,
                },
                labor_multiplier: Some(5.0),
            },
        ),
        (
            CreditCode::CleanVehicles,
            CreditRate {
                basis: RateBasis::PerUnit {
                    rate: 7_500.0,
                    unit: ProductionUnit::Vehicle,
                },
                labor_multiplier: None,
            },
        ),
        (
            CreditCode::AdvancedManufacturing,
            CreditRate {
                basis: RateBasis::PerUnit {
                    rate: 35.0,
                    unit: ProductionUnit::KilowattHour,
                },
                labor_multiplier: None,
            },
        ),
    ])
});

/// Percentage added to the credit value per qualifying bonus flag.
static DIRECT_PAY_BONUS_PERCENT: Lazy<BTreeMap<&'static str, f64>> =
    Lazy::new(|| BTreeMap::from([("energy_community", 10.0), ("domestic_content", 10.0)]));

/// Outcome of a direct-pay eligibility check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectPayResult {
    pub eligible: bool,
    pub eligible_credits: Vec<CreditCode>,
    pub reason: String,
    pub requirements: Vec<String>,
    pub notes: Vec<String>,
    pub registration_deadline: Option<String>,
}

/// Inputs to a direct-pay value estimate.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct DirectPayInputs {
    /// Total qualifying investment, dollars. Drives investment credits.
    pub total_investment: Option<f64>,
    /// Measured production in the credit's unit (kWh, kg H2, tonnes CO2,
    /// vehicles placed in service). Drives production credits.
    pub production_quantity: Option<f64>,
    pub prevailing_wage: bool,
    pub apprenticeship: bool,
    pub energy_community: bool,
    pub domestic_content: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectPayEstimate {
    pub credit: CreditCode,
    /// Value at the statutory base rate, before the labor multiplier and
    /// bonuses.
    pub base_value: f64,
    pub labor_multiplier_applied: bool,
    pub bonus_value: f64,
    pub total_value: f64,
    pub notes: Vec<String>,
}

const REGISTRATION_DEADLINE: &str =
    "IRS pre-filing registration must be completed before the return due date \
     for the tax year the property is placed in service";

/// Check whether an entity can elect direct pay for the requested credits.
/// Invalid or out-of-scope entities get an explicit ineligible result with
/// reason text; this never errors.
pub fn check_direct_pay(entity: &EntityProfile, requested: &[CreditCode]) -> DirectPayResult {
    let (eligible, reason) = match entity.entity_type {
        EntityType::TaxExemptOrganization => {
            if entity.tax_exempt {
                (true, "tax-exempt organization with recognized exemption".to_string())
            } else {
                (
                    false,
                    "organization is not currently recognized as tax-exempt; direct pay \
                     requires standing exemption"
                        .to_string(),
                )
            }
        }
        EntityType::StateOrLocalGovernment => (true, "state or local government".to_string()),
        EntityType::TribalGovernment => (true, "tribal government".to_string()),
        EntityType::RuralElectricCooperative => (true, "rural electric cooperative".to_string()),
        EntityType::RegionalPowerAuthority => {
            (true, "designated regional power authority".to_string())
        }
        EntityType::AlaskaNativeCorporation => (true, "Alaska Native corporation".to_string()),
        EntityType::ForProfitBusiness => (
            false,
            "for-profit entities are not direct-pay eligible; consider selling the credit \
             through the transfer-sale mechanism instead"
                .to_string(),
        ),
        EntityType::FederalAgency => (
            false,
            "federal agencies are not direct-pay eligible; the transfer-sale mechanism is \
             the available alternative"
                .to_string(),
        ),
    };

    if !eligible {
        debug!(entity = %entity.name, %reason, "direct pay ineligible");
        return DirectPayResult {
            eligible: false,
            eligible_credits: Vec::new(),
            reason,
            requirements: Vec::new(),
            notes: vec![
                "Credit transferability under the sale mechanism is open to most taxable \
                 entities and typically prices at a discount to face value"
                    .to_string(),
            ],
            registration_deadline: None,
        };
    }

    // All statutory credits are reachable; an empty request means the caller
    // wants the full list.
    let eligible_credits: Vec<CreditCode> = if requested.is_empty() {
        CREDIT_RATES.keys().copied().collect()
    } else {
        requested
            .iter()
            .copied()
            .filter(|c| CREDIT_RATES.contains_key(c))
            .collect()
    };

    DirectPayResult {
        eligible: true,
        eligible_credits,
        reason,
        requirements: vec![
            "Complete IRS pre-filing registration for each credit property".to_string(),
            "Make the elective payment election on the annual return (Form 990-T for \
             tax-exempt filers)"
                .to_string(),
            "Retain placed-in-service documentation and labor-condition records".to_string(),
        ],
        notes: vec![
            "Refund timing follows the filing cycle; plan bridge financing accordingly"
                .to_string(),
        ],
        registration_deadline: Some(REGISTRATION_DEADLINE.to_string()),
    }
}

/// Estimate the cash value of one credit under direct pay. Missing inputs
/// degrade to a zero estimate with an explanatory note.
pub fn estimate_direct_pay_value(credit: CreditCode, inputs: &DirectPayInputs) -> DirectPayEstimate {
    let Some(rate) = CREDIT_RATES.get(&credit) else {
        return DirectPayEstimate {
            credit,
            base_value: 0.0,
            labor_multiplier_applied: false,
            bonus_value: 0.0,
            total_value: 0.0,
            notes: vec!["credit code has no statutory rate entry".to_string()],
        };
    };

    let mut notes = Vec::new();

    let base_value = match rate.basis {
        RateBasis::PercentOfInvestment { rate: r } => match inputs.total_investment {
            Some(inv) if inv > 0.0 => inv * r,
            _ => {
                notes.push("total investment not provided; value is zero".to_string());
                0.0
            }
        },
        RateBasis::PerUnit { rate: r, unit } => match inputs.production_quantity {
            Some(q) if q > 0.0 => q * r,
            _ => {
                notes.push(format!(
                    "production quantity ({unit}) not provided; value is zero"
                ));
                0.0
            }
        },
    };

    // The statutory multiplier requires both labor conditions together.
    let labor_ok = inputs.prevailing_wage && inputs.apprenticeship;
    let (multiplied, labor_multiplier_applied) = match rate.labor_multiplier {
        Some(m) if labor_ok => {
            notes.push(format!(
                "prevailing-wage and apprenticeship conditions met; {m}x multiplier applied"
            ));
            (base_value * m, true)
        }
        Some(_) => {
            notes.push(
                "labor conditions not met; statutory multiplier not applied".to_string(),
            );
            (base_value, false)
        }
        None => (base_value, false),
    };

    let mut bonus_percent = 0.0;
    if inputs.energy_community {
        bonus_percent += DIRECT_PAY_BONUS_PERCENT["energy_community"];
    }
    if inputs.domestic_content {
        bonus_percent += DIRECT_PAY_BONUS_PERCENT["domestic_content"];
    }
    let bonus_value = multiplied * bonus_percent / 100.0;

    DirectPayEstimate {
        credit,
        base_value,
        labor_multiplier_applied,
        bonus_value,
        total_value: multiplied + bonus_value,
        notes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs_10m() -> DirectPayInputs {
        DirectPayInputs {
            total_investment: Some(10_000_000.0),
            ..Default::default()
        }
    }

    #[test]
    fn test_nonprofit_is_eligible() {
        let entity = EntityProfile {
            name: "Community Housing Trust".into(),
            entity_type: EntityType::TaxExemptOrganization,
            tax_exempt: true,
        };
        let result = check_direct_pay(&entity, &[]);
        assert!(result.eligible);
        assert!(!result.eligible_credits.is_empty());
        assert!(result.registration_deadline.is_some());
    }

    #[test]
    fn test_nonprofit_without_exemption_is_not() {
        let entity = EntityProfile {
            name: "Lapsed Org".into(),
            entity_type: EntityType::TaxExemptOrganization,
            tax_exempt: false,
        };
        assert!(!check_direct_pay(&entity, &[]).eligible);
    }

    #[test]
    fn test_for_profit_pointed_at_transfer_sale() {
        let entity = EntityProfile {
            name: "Acme Development LLC".into(),
            entity_type: EntityType::ForProfitBusiness,
            tax_exempt: false,
        };
        let result = check_direct_pay(&entity, &[CreditCode::InvestmentItc]);
        assert!(!result.eligible);
        assert!(result.eligible_credits.is_empty());
        assert!(result.reason.contains("transfer-sale"));
    }

    #[test]
    fn test_federal_agency_rejected() {
        let entity = EntityProfile {
            name: "GSA".into(),
            entity_type: EntityType::FederalAgency,
            tax_exempt: false,
        };
        let result = check_direct_pay(&entity, &[]);
        assert!(!result.eligible);
        assert!(result.reason.contains("transfer-sale"));
    }

    #[test]
    fn test_itc_base_value_without_labor_compliance() {
        let est = estimate_direct_pay_value(CreditCode::InvestmentItc, &inputs_10m());
        assert_eq!(est.base_value, 3_000_000.0);
        assert!(!est.labor_multiplier_applied);
        assert_eq!(est.total_value, 3_000_000.0);
    }

    #[test]
    fn test_labor_compliance_strictly_increases_value() {
        let base = estimate_direct_pay_value(CreditCode::InvestmentItc, &inputs_10m());
        let compliant = estimate_direct_pay_value(
            CreditCode::InvestmentItc,
            &DirectPayInputs {
                prevailing_wage: true,
                apprenticeship: true,
                ..inputs_10m()
            },
        );
        assert!(compliant.total_value > base.total_value);
        assert!(compliant.labor_multiplier_applied);
    }

    #[test]
    fn test_one_labor_condition_is_not_enough() {
        let est = estimate_direct_pay_value(
            CreditCode::InvestmentItc,
            &DirectPayInputs {
                prevailing_wage: true,
                apprenticeship: false,
                ..inputs_10m()
            },
        );
        assert!(!est.labor_multiplier_applied);
    }

    #[test]
    fn test_bonus_flags_strictly_increase_value() {
        let base = estimate_direct_pay_value(CreditCode::InvestmentItc, &inputs_10m());
        let with_ec = estimate_direct_pay_value(
            CreditCode::InvestmentItc,
            &DirectPayInputs {
                energy_community: true,
                ..inputs_10m()
            },
        );
        let with_dc = estimate_direct_pay_value(
            CreditCode::InvestmentItc,
            &DirectPayInputs {
                domestic_content: true,
                ..inputs_10m()
            },
        );
        assert!(with_ec.total_value > base.total_value);
        assert!(with_dc.total_value > base.total_value);
    }

    #[test]
    fn test_production_credit_uses_quantity() {
        let est = estimate_direct_pay_value(
            CreditCode::CleanHydrogen,
            &DirectPayInputs {
                production_quantity: Some(1_000_000.0),
                prevailing_wage: true,
                apprenticeship: true,
                ..Default::default()
            },
        );
        // 1M kg at $0.60/kg, x5 with labor compliance.
        assert_eq!(est.base_value, 600_000.0);
        assert_eq!(est.total_value, 3_000_000.0);
    }

    #[test]
    fn test_vehicle_credit_has_no_multiplier() {
        let est = estimate_direct_pay_value(
            CreditCode::CleanVehicles,
            &DirectPayInputs {
                production_quantity: Some(10.0),
                prevailing_wage: true,
                apprenticeship: true,
                ..Default::default()
            },
        );
        assert!(!est.labor_multiplier_applied);
        assert_eq!(est.total_value, 75_000.0);
    }

    #[test]
    fn test_missing_inputs_degrade_to_zero() {
        let est = estimate_direct_pay_value(CreditCode::InvestmentItc, &DirectPayInputs::default());
        assert_eq!(est.total_value, 0.0);
        assert!(est.notes.iter().any(|n| n.contains("not provided")));
    }
}
