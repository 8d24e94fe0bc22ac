use serde::{Deserialize, Serialize};

use crate::domain::{
    ConstructionType, IncentiveProgram, JurisdictionLevel, Project, Requirement,
    RequirementCheck, RequirementKind, RequirementStatus,
};

/// Sub-score weights for the composite match score. Tunable via config; the
/// defaults below are the calibrated production weights.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MatchWeights {
    pub category: f64,
    pub location: f64,
    pub eligibility: f64,
}

impl Default for MatchWeights {
    fn default() -> Self {
        Self {
            category: 0.40,
            location: 0.35,
            eligibility: 0.25,
        }
    }
}

impl MatchWeights {
    /// Weighted average, normalized so nonstandard weights still land in
    /// [0, 1].
    pub fn composite(&self, category: f64, location: f64, eligibility: f64) -> f64 {
        let total = self.category + self.location + self.eligibility;
        if total <= 0.0 {
            return 0.0;
        }
        let score = (category * self.category
            + location * self.location
            + eligibility * self.eligibility)
            / total;
        score.clamp(0.0, 1.0)
    }
}

/// Partial credit for a sector the program declares adjacent.
const ADJACENT_SECTOR_CREDIT: f64 = 0.5;
/// Residual score for a jurisdiction mismatch.
const LOCATION_MISMATCH_DECAY: f64 = 0.1;

/// Category sub-score: mean of sector, building-type, and technology parts.
/// An empty applicability list is agnostic and scores full credit.
pub fn category_score(project: &Project, program: &IncentiveProgram) -> f64 {
    let sector = if program.sectors.is_empty() || program.sectors.contains(&project.sector) {
        1.0
    } else if program
        .sectors
        .iter()
        .any(|s| s.adjacent().contains(&project.sector))
    {
        ADJACENT_SECTOR_CREDIT
    } else {
        0.0
    };

    let building = if program.building_types.is_empty()
        || program
            .building_types
            .iter()
            .any(|b| b.eq_ignore_ascii_case(&project.building_type))
    {
        1.0
    } else {
        0.0
    };

    let technology = if project.has_any_technology(&program.technologies) {
        1.0
    } else {
        0.0
    };

    (sector + building + technology) / 3.0
}

/// Location sub-score: 1.0 for an exact jurisdiction match or a nationwide
/// program, decaying to a small residual on mismatch.
pub fn location_score(project: &Project, program: &IncentiveProgram) -> f64 {
    let code = match &program.jurisdiction_code {
        // Nationwide at its level.
        None => return 1.0,
        Some(c) => c,
    };

    let matched = match program.level {
        JurisdictionLevel::Federal => true,
        JurisdictionLevel::State => code.eq_ignore_ascii_case(&project.location.state),
        JurisdictionLevel::Local => {
            let city = project.location.city.as_deref().unwrap_or("");
            let county = project.location.county.as_deref().unwrap_or("");
            code.eq_ignore_ascii_case(city) || code.eq_ignore_ascii_case(county)
        }
        JurisdictionLevel::Utility => project
            .location
            .utility
            .as_deref()
            .map(|u| code.eq_ignore_ascii_case(u))
            .unwrap_or(false),
    };

    if matched {
        1.0
    } else {
        LOCATION_MISMATCH_DECAY
    }
}

/// Evaluate one checklist requirement against the project snapshot.
pub fn check_requirement(project: &Project, requirement: &Requirement) -> RequirementStatus {
    let met = match &requirement.kind {
        RequirementKind::MinCapacityKw { kw } => {
            match project.capacity_kw {
                Some(cap) => cap >= *kw,
                None => return RequirementStatus::NeedsReview,
            }
        }
        RequirementKind::MinUnits { units } => {
            match project.unit_count {
                Some(n) => n >= *units,
                None => return RequirementStatus::NeedsReview,
            }
        }
        RequirementKind::MinSquareFeet { sqft } => {
            match project.size_sqft {
                Some(s) => s >= *sqft,
                None => return RequirementStatus::NeedsReview,
            }
        }
        RequirementKind::PrevailingWage => project.flags.prevailing_wage,
        RequirementKind::DomesticContent => project.flags.domestic_content,
        RequirementKind::EnergyCommunityLocation => project.flags.energy_community,
        RequirementKind::LowIncomeCommunityLocation => project.flags.low_income_community,
        RequirementKind::Certification { name } => match &project.target_certification {
            Some(cert) => cert.eq_ignore_ascii_case(name),
            None => false,
        },
        RequirementKind::NewConstructionOnly => {
            project.construction_type == ConstructionType::NewConstruction
        }
        RequirementKind::Manual => return RequirementStatus::NeedsReview,
    };

    if met {
        RequirementStatus::Met
    } else {
        RequirementStatus::NotMet
    }
}

/// Run the full checklist. Returns the per-requirement outcomes and the
/// eligibility sub-score (met = 1, needs-review = 0.5, not-met = 0).
pub fn eligibility_checklist(
    project: &Project,
    program: &IncentiveProgram,
) -> (Vec<RequirementCheck>, f64) {
    if program.requirements.is_empty() {
        return (Vec::new(), 1.0);
    }

    let checks: Vec<RequirementCheck> = program
        .requirements
        .iter()
        .map(|r| RequirementCheck {
            requirement: r.clone(),
            status: check_requirement(project, r),
        })
        .collect();

    let credit: f64 = checks
        .iter()
        .map(|c| match c.status {
            RequirementStatus::Met => 1.0,
            RequirementStatus::NeedsReview => 0.5,
            RequirementStatus::NotMet => 0.0,
        })
        .sum();

    let score = credit / checks.len() as f64;
    (checks, score)
}
