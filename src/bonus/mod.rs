//! Bonus adder calculation: statutory percentage adders layered on a
//! program's base value, additive on the same basis and capped at the
//! program's declared bonus ceiling.

pub mod direct_pay;

use serde::{Deserialize, Serialize};

use crate::domain::{AmountModel, BonusKind, IncentiveProgram, Project};
use crate::matcher::estimate_value;

/// Whether a bonus is locked in or still depends on execution. Location
/// facts (energy community, low-income community) are secured; sourcing and
/// labor outcomes can still slip.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, strum_macros::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum BonusSecurity {
    Secured,
    AtRisk,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppliedBonus {
    pub kind: BonusKind,
    /// Percentage points actually applied, after any ceiling clip.
    pub percent: f64,
    pub amount: f64,
    pub security: BonusSecurity,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BonusBreakdown {
    pub program_id: String,
    pub base_value: f64,
    pub bonuses: Vec<AppliedBonus>,
    pub total_with_bonuses: f64,
    /// True when the declared bonus ceiling clipped one or more adders.
    pub ceiling_applied: bool,
}

impl BonusBreakdown {
    pub fn total_bonus_percent(&self) -> f64 {
        self.bonuses.iter().map(|b| b.percent).sum()
    }
}

pub struct BonusCalculator;

impl BonusCalculator {
    /// Layer the program's declared adders over its base value for this
    /// project. Adders the project does not qualify for are skipped;
    /// qualifying adders apply additively (not compounding) against the
    /// same basis, with the running percentage capped at the program's
    /// declared ceiling.
    pub fn apply_bonuses(project: &Project, program: &IncentiveProgram) -> BonusBreakdown {
        let base_value = estimate_value(project, program)
            .estimate
            .expected
            .as_dollars();

        // Percent-of-basis programs measure adders against the same cost
        // basis; all other models measure against the base award.
        let basis = match program.amount {
            AmountModel::PercentOfBasis { .. } => project.total_cost.as_dollars(),
            _ => base_value,
        };

        let mut bonuses = Vec::new();
        let mut running_percent = 0.0;
        let mut ceiling_applied = false;

        for adder in &program.bonus_adders {
            if !Self::qualifies(project, adder.kind) || adder.percent <= 0.0 {
                continue;
            }
            let mut percent = adder.percent;
            if let Some(ceiling) = program.bonus_ceiling_percent {
                let headroom = (ceiling - running_percent).max(0.0);
                if percent > headroom {
                    percent = headroom;
                    ceiling_applied = true;
                }
            }
            if percent <= 0.0 {
                continue;
            }
            running_percent += percent;
            bonuses.push(AppliedBonus {
                kind: adder.kind,
                percent,
                amount: basis * percent / 100.0,
                security: Self::security(project, adder.kind),
            });
        }

        let total_with_bonuses = base_value + bonuses.iter().map(|b| b.amount).sum::<f64>();
        BonusBreakdown {
            program_id: program.id.clone(),
            base_value,
            bonuses,
            total_with_bonuses,
            ceiling_applied,
        }
    }

    fn qualifies(project: &Project, kind: BonusKind) -> bool {
        match kind {
            BonusKind::DomesticContent => project.flags.domestic_content,
            BonusKind::EnergyCommunity => project.flags.energy_community,
            BonusKind::LowIncomeCommunity => project.flags.low_income_community,
            BonusKind::PrevailingWage => project.flags.prevailing_wage,
        }
    }

    fn security(_project: &Project, kind: BonusKind) -> BonusSecurity {
        match kind {
            // Location designations are facts about the site.
            BonusKind::EnergyCommunity | BonusKind::LowIncomeCommunity => BonusSecurity::Secured,
            // A wage commitment is contractual; sourcing is not settled
            // until procurement closes.
            BonusKind::PrevailingWage => BonusSecurity::Secured,
            BonusKind::DomesticContent => BonusSecurity::AtRisk,
        }
    }
}
