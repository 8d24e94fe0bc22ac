//! End-to-end flows over a small fixture catalog: matching, exclusion,
//! optimization, bonuses, and the direct-pay path.

use incentive_stack_engine::domain::{
    AmountModel, BonusAdder, BonusKind, ConstructionType, CreditCode, EntityProfile, EntityType,
    IncentiveProgram, JurisdictionLevel, Mechanism, Money, Project, ProjectFlags, ProjectLocation,
    Sector, Technology,
};
use incentive_stack_engine::{
    check_direct_pay, estimate_direct_pay_value, DirectPayInputs, EngineConfig, EngineError,
    StackEngine,
};
use uuid::Uuid;

fn solar_project() -> Project {
    Project {
        id: Uuid::new_v4(),
        name: "Harbor Point Apartments".into(),
        sector: Sector::Commercial,
        building_type: "multifamily".into(),
        construction_type: ConstructionType::NewConstruction,
        location: ProjectLocation {
            state: "NY".into(),
            county: Some("Kings".into()),
            city: Some("Brooklyn".into()),
            utility: Some("ConEd".into()),
        },
        size_sqft: Some(180_000.0),
        unit_count: Some(210),
        capacity_kw: Some(400.0),
        annual_production_kwh: Some(520_000.0),
        total_cost: Money::dollars(10_000_000.0),
        target_certification: None,
        energy_systems: vec![Technology::SolarPv, Technology::BatteryStorage],
        flags: ProjectFlags {
            prevailing_wage: true,
            energy_community: true,
            ..Default::default()
        },
    }
}

fn fixture_catalog() -> Vec<IncentiveProgram> {
    vec![
        // Federal investment credit, 30% of basis, direct-pay eligible.
        IncentiveProgram {
            id: "us-itc-48".into(),
            name: "Federal Investment Tax Credit".into(),
            level: JurisdictionLevel::Federal,
            jurisdiction_code: None,
            mechanism: Mechanism::DirectPayCredit,
            sectors: vec![Sector::Commercial, Sector::Industrial],
            building_types: vec![],
            technologies: vec![Technology::SolarPv, Technology::BatteryStorage],
            amount: AmountModel::PercentOfBasis {
                rate: 0.30,
                min: None,
                max: None,
            },
            bonus_adders: vec![
                BonusAdder {
                    kind: BonusKind::EnergyCommunity,
                    percent: 10.0,
                },
                BonusAdder {
                    kind: BonusKind::DomesticContent,
                    percent: 10.0,
                },
            ],
            bonus_ceiling_percent: Some(20.0),
            stackable: true,
            excludes: vec![],
            requirements: vec![],
            direct_pay_credit: Some(CreditCode::InvestmentItc),
        },
        // Federal production credit on the same technology: competes with
        // the ITC for the same basis.
        IncentiveProgram {
            id: "us-ptc-45".into(),
            name: "Federal Production Tax Credit".into(),
            level: JurisdictionLevel::Federal,
            jurisdiction_code: None,
            mechanism: Mechanism::DirectPayCredit,
            sectors: vec![Sector::Commercial],
            building_types: vec![],
            technologies: vec![Technology::SolarPv],
            amount: AmountModel::PerKilowattHour { amount: 0.015 },
            bonus_adders: vec![],
            bonus_ceiling_percent: None,
            stackable: true,
            excludes: vec![],
            requirements: vec![],
            direct_pay_credit: Some(CreditCode::ProductionPtc),
        },
        // Unrelated state grant: stacks with either federal credit.
        IncentiveProgram {
            id: "ny-mf-grant".into(),
            name: "NY Multifamily New Construction Grant".into(),
            level: JurisdictionLevel::State,
            jurisdiction_code: Some("NY".into()),
            mechanism: Mechanism::Grant,
            sectors: vec![Sector::Commercial],
            building_types: vec!["multifamily".into()],
            technologies: vec![],
            amount: AmountModel::Fixed { amount: 500_000.0 },
            bonus_adders: vec![],
            bonus_ceiling_percent: None,
            stackable: true,
            excludes: vec![],
            requirements: vec![],
            direct_pay_credit: None,
        },
        // Utility rebate per kW of capacity.
        IncentiveProgram {
            id: "coned-storage-rebate".into(),
            name: "ConEd Storage Rebate".into(),
            level: JurisdictionLevel::Utility,
            jurisdiction_code: Some("ConEd".into()),
            mechanism: Mechanism::Rebate,
            sectors: vec![],
            building_types: vec![],
            technologies: vec![Technology::BatteryStorage],
            amount: AmountModel::PerKilowatt { amount: 200.0 },
            bonus_adders: vec![],
            bonus_ceiling_percent: None,
            stackable: true,
            excludes: vec![],
            requirements: vec![],
            direct_pay_credit: None,
        },
        // Malformed record: formula with no usable default.
        IncentiveProgram {
            id: "zz-broken".into(),
            name: "Broken Catalog Entry".into(),
            level: JurisdictionLevel::Federal,
            jurisdiction_code: None,
            mechanism: Mechanism::Grant,
            sectors: vec![],
            building_types: vec![],
            technologies: vec![],
            amount: AmountModel::Formula {
                expression: "lesser of 50% capex or state cap".into(),
                default_value: None,
            },
            bonus_adders: vec![],
            bonus_ceiling_percent: None,
            stackable: true,
            excludes: vec![],
            requirements: vec![],
            direct_pay_credit: None,
        },
    ]
}

#[test]
fn federal_credit_and_state_grant_stack_additively() {
    let engine = StackEngine::new(EngineConfig::default());
    let valuation = engine.evaluate(&solar_project(), &fixture_catalog()).unwrap();

    let ids = &valuation.optimal_stack.program_ids;
    assert!(ids.contains(&"us-itc-48".to_string()));
    assert!(ids.contains(&"ny-mf-grant".to_string()));

    // Combined stack value equals the sum of independent expected values.
    let sum: f64 = valuation
        .matches
        .iter()
        .filter(|m| ids.contains(&m.program.id))
        .map(|m| m.expected_value())
        .sum();
    assert!((valuation.optimal_stack.combined_value - sum).abs() < 1e-6);
}

#[test]
fn same_basis_credits_are_mutually_exclusive_with_recommendation() {
    let engine = StackEngine::new(EngineConfig::default());
    let valuation = engine.evaluate(&solar_project(), &fixture_catalog()).unwrap();

    let pair = valuation
        .mutually_exclusive_pairs
        .iter()
        .find(|p| {
            (p.a == "us-itc-48" && p.b == "us-ptc-45")
                || (p.a == "us-ptc-45" && p.b == "us-itc-48")
        })
        .expect("ITC/PTC pair should be flagged exclusive");
    // The 30% ITC on $10M dwarfs the per-kWh PTC.
    assert_eq!(pair.keep, "us-itc-48");
    assert!(pair.value_delta > 0.0);

    // The optimal stack never carries both.
    let ids = &valuation.optimal_stack.program_ids;
    assert!(!(ids.contains(&"us-itc-48".to_string()) && ids.contains(&"us-ptc-45".to_string())));
}

#[test]
fn optimal_stack_contains_no_exclusive_pair_exhaustive() {
    let engine = StackEngine::new(EngineConfig::default());
    let valuation = engine.evaluate(&solar_project(), &fixture_catalog()).unwrap();

    let ids = &valuation.optimal_stack.program_ids;
    for (i, a) in ids.iter().enumerate() {
        for b in &ids[i + 1..] {
            let conflicting = valuation
                .mutually_exclusive_pairs
                .iter()
                .any(|p| (&p.a == a && &p.b == b) || (&p.a == b && &p.b == a));
            assert!(!conflicting, "{a} and {b} are exclusive but both in stack");
        }
    }
}

#[test]
fn match_scores_and_windows_stay_in_bounds() {
    let engine = StackEngine::new(EngineConfig::default());
    let valuation = engine.evaluate(&solar_project(), &fixture_catalog()).unwrap();
    assert!(!valuation.matches.is_empty());
    for m in &valuation.matches {
        assert!((0.0..=1.0).contains(&m.score), "score out of bounds");
        assert!(m.value.is_ordered(), "value window out of order");
    }
}

#[test]
fn bonuses_respect_declared_ceiling_and_raise_total() {
    let engine = StackEngine::new(EngineConfig::default());
    let valuation = engine.evaluate(&solar_project(), &fixture_catalog()).unwrap();

    let itc = valuation
        .bonus_breakdowns
        .iter()
        .find(|b| b.program_id == "us-itc-48")
        .expect("ITC breakdown present");
    // Project qualifies for the energy-community adder only.
    assert_eq!(itc.bonuses.len(), 1);
    assert!(itc.total_with_bonuses > itc.base_value);
    assert!(itc.total_bonus_percent() <= 20.0);
    assert!(valuation.total_combined_value >= valuation.optimal_stack.combined_value);
}

#[test]
fn value_by_jurisdiction_rolls_up_the_stack() {
    let engine = StackEngine::new(EngineConfig::default());
    let valuation = engine.evaluate(&solar_project(), &fixture_catalog()).unwrap();

    let total: f64 = valuation.value_by_jurisdiction.values().sum();
    assert!((total - valuation.total_combined_value).abs() < 1e-6);
    assert!(valuation
        .value_by_jurisdiction
        .contains_key(&JurisdictionLevel::Federal));
    assert!(valuation
        .value_by_jurisdiction
        .contains_key(&JurisdictionLevel::State));
}

#[test]
fn malformed_record_never_blocks_the_batch() {
    let engine = StackEngine::new(EngineConfig::default());
    let valuation = engine.evaluate(&solar_project(), &fixture_catalog()).unwrap();
    // The broken entry still scored (at zero value) and everything else
    // proceeded normally.
    assert!(valuation.matches.len() >= 4);
    if let Some(broken) = valuation.matches.iter().find(|m| m.program.id == "zz-broken") {
        assert_eq!(broken.expected_value(), 0.0);
    }
}

#[test]
fn identical_inputs_produce_identical_matches() {
    let engine = StackEngine::new(EngineConfig::default());
    let project = solar_project();
    let catalog = fixture_catalog();
    let a = engine.evaluate(&project, &catalog).unwrap();
    let b = engine.evaluate(&project, &catalog).unwrap();
    assert_eq!(
        serde_json::to_string(&a.matches).unwrap(),
        serde_json::to_string(&b.matches).unwrap()
    );
    assert_eq!(a.optimal_stack.program_ids, b.optimal_stack.program_ids);
}

#[test]
fn empty_catalog_rejected_at_the_boundary() {
    let engine = StackEngine::new(EngineConfig::default());
    assert!(matches!(
        engine.evaluate(&solar_project(), &[]),
        Err(EngineError::EmptyCatalog)
    ));
}

#[test]
fn direct_pay_flow_for_a_nonprofit_owner() {
    let entity = EntityProfile {
        name: "Harbor Point Community Trust".into(),
        entity_type: EntityType::TaxExemptOrganization,
        tax_exempt: true,
    };
    let result = check_direct_pay(&entity, &[CreditCode::InvestmentItc]);
    assert!(result.eligible);
    assert_eq!(result.eligible_credits, vec![CreditCode::InvestmentItc]);

    let baseline = estimate_direct_pay_value(
        CreditCode::InvestmentItc,
        &DirectPayInputs {
            total_investment: Some(10_000_000.0),
            ..Default::default()
        },
    );
    assert_eq!(baseline.base_value, 3_000_000.0);

    let compliant = estimate_direct_pay_value(
        CreditCode::InvestmentItc,
        &DirectPayInputs {
            total_investment: Some(10_000_000.0),
            prevailing_wage: true,
            apprenticeship: true,
            energy_community: true,
            ..Default::default()
        },
    );
    assert!(compliant.total_value > baseline.total_value);
}

#[test]
fn direct_pay_rejects_for_profit_with_transfer_pointer() {
    let entity = EntityProfile {
        name: "Harbor Point Developers LLC".into(),
        entity_type: EntityType::ForProfitBusiness,
        tax_exempt: false,
    };
    let result = check_direct_pay(&entity, &[CreditCode::InvestmentItc]);
    assert!(!result.eligible);
    assert!(result.reason.contains("transfer-sale"));
}
