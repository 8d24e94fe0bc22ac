//! Eligibility matcher: scores one project against every candidate program.
//!
//! Pure and deterministic; identical inputs always produce identical match
//! lists. Per-program problems degrade to zero-value low-confidence matches
//! so one bad catalog record never blocks the batch.

pub mod scoring;
pub mod value;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::{Confidence, IncentiveProgram, MatchedIncentive, Project};

pub use scoring::MatchWeights;
pub use value::{estimate_value, ValueResult};

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct MatcherConfig {
    pub weights: MatchWeights,
    /// Matches scoring below this composite are dropped from the output.
    pub score_threshold: f64,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            weights: MatchWeights::default(),
            score_threshold: 0.35,
        }
    }
}

pub struct EligibilityMatcher {
    cfg: MatcherConfig,
}

impl EligibilityMatcher {
    pub fn new(cfg: MatcherConfig) -> Self {
        Self { cfg }
    }

    /// Score every catalog program against the project. Results are sorted
    /// by descending composite score (program id breaks ties for
    /// determinism) with below-threshold matches dropped.
    pub fn match_programs(
        &self,
        project: &Project,
        programs: &[IncentiveProgram],
    ) -> Vec<MatchedIncentive> {
        let mut matches: Vec<MatchedIncentive> = programs
            .iter()
            .map(|p| self.score_one(project, p))
            .filter(|m| m.score >= self.cfg.score_threshold)
            .collect();

        matches.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| a.program.id.cmp(&b.program.id))
        });

        debug!(
            project_id = %project.id,
            candidates = programs.len(),
            matched = matches.len(),
            "eligibility matching complete"
        );
        matches
    }

    fn score_one(&self, project: &Project, program: &IncentiveProgram) -> MatchedIncentive {
        let category = scoring::category_score(project, program);
        let location = scoring::location_score(project, program);
        let (requirements, eligibility) = scoring::eligibility_checklist(project, program);
        let score = self.cfg.weights.composite(category, location, eligibility);

        let value = estimate_value(project, program);

        let mut reasons = Vec::new();
        if category >= 1.0 {
            reasons.push("sector, building type, and technology all apply".to_string());
        } else if category > 0.0 {
            reasons.push(format!("partial category fit ({:.0}%)", category * 100.0));
        }
        if location >= 1.0 {
            reasons.push(format!("program covers the project jurisdiction ({})", program.level));
        } else {
            reasons.push("project sits outside the program jurisdiction".to_string());
        }
        if !requirements.is_empty() {
            let met = requirements.len()
                - requirements
                    .iter()
                    .filter(|c| c.status != crate::domain::RequirementStatus::Met)
                    .count();
            reasons.push(format!(
                "meets {met} of {} checklist requirements",
                requirements.len()
            ));
        }
        if let Some(note) = &value.note {
            reasons.push(note.clone());
        }

        // A strong score with a degraded value estimate still reports low
        // confidence; reviewers should look at the record, not the math.
        let confidence = match value.confidence {
            Confidence::High if score >= 0.75 => Confidence::High,
            Confidence::High => Confidence::Medium,
            other => other,
        };

        MatchedIncentive {
            project_id: project.id,
            program: program.clone(),
            score,
            category_score: category,
            location_score: location,
            eligibility_score: eligibility,
            value: value.estimate,
            confidence,
            reasons,
            requirements,
        }
    }
}
