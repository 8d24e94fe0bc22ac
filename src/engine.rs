use chrono::{DateTime, Utc};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::info;
use uuid::Uuid;

use crate::bonus::{BonusBreakdown, BonusCalculator};
use crate::compat::{CompatibilityResolver, ExclusionPair};
use crate::domain::{IncentiveProgram, JurisdictionLevel, MatchedIncentive, Project};
use crate::error::EngineError;
use crate::matcher::{EligibilityMatcher, MatcherConfig};
use crate::optimizer::{OptimizerConfig, StackOptimizer, StackingGroup};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    pub matcher: MatcherConfig,
    pub optimizer: OptimizerConfig,
}

/// Full engine output for one project evaluation: the ranked matches, the
/// exclusion pairs, the optimal stack with alternatives, and the bonus
/// layer, plus run metadata for reporting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinalStackValuation {
    pub run_id: Uuid,
    pub evaluated_at: DateTime<Utc>,
    pub engine_version: String,
    pub project_id: Uuid,
    pub matches: Vec<MatchedIncentive>,
    pub mutually_exclusive_pairs: Vec<ExclusionPair>,
    pub stacking_groups: Vec<StackingGroup>,
    pub optimal_stack: StackingGroup,
    pub bonus_breakdowns: Vec<BonusBreakdown>,
    /// Optimal-stack value including qualifying bonus adders.
    pub total_combined_value: f64,
    /// Optimal-stack value (with bonuses) rolled up by jurisdiction level.
    pub value_by_jurisdiction: BTreeMap<JurisdictionLevel, f64>,
}

/// Orchestrates matcher -> resolver -> optimizer -> bonus calculator. Each
/// stage is a pure function; the engine itself holds only configuration and
/// is safe to share across threads.
pub struct StackEngine {
    matcher: EligibilityMatcher,
    optimizer: StackOptimizer,
}

impl StackEngine {
    pub fn new(cfg: EngineConfig) -> Self {
        Self {
            matcher: EligibilityMatcher::new(cfg.matcher),
            optimizer: StackOptimizer::new(cfg.optimizer),
        }
    }

    /// Evaluate one project against the catalog. Only a missing/invalid
    /// project or an empty catalog fails hard; every per-program problem
    /// degrades into the result.
    pub fn evaluate(
        &self,
        project: &Project,
        catalog: &[IncentiveProgram],
    ) -> Result<FinalStackValuation, EngineError> {
        Self::validate_boundary(project, catalog)?;

        let matches = self.matcher.match_programs(project, catalog);
        let graph = CompatibilityResolver::build_graph(&matches);
        let plan = self.optimizer.optimize(&matches, &graph);

        // Bonus layer over the optimal stack only; alternatives report raw
        // expected value.
        let in_stack = |m: &MatchedIncentive| {
            plan.optimal.program_ids.iter().any(|id| id == m.program_id())
        };
        let bonus_breakdowns: Vec<BonusBreakdown> = matches
            .iter()
            .filter(|m| in_stack(m))
            .map(|m| BonusCalculator::apply_bonuses(project, &m.program))
            .collect();

        let total_combined_value: f64 =
            bonus_breakdowns.iter().map(|b| b.total_with_bonuses).sum();

        let mut value_by_jurisdiction: BTreeMap<JurisdictionLevel, f64> = BTreeMap::new();
        for m in matches.iter().filter(|m| in_stack(m)) {
            let with_bonuses = bonus_breakdowns
                .iter()
                .find(|b| b.program_id == m.program.id)
                .map(|b| b.total_with_bonuses)
                .unwrap_or_else(|| m.expected_value());
            *value_by_jurisdiction.entry(m.program.level).or_insert(0.0) += with_bonuses;
        }

        let mutually_exclusive_pairs: Vec<ExclusionPair> = graph
            .pairs
            .iter()
            .cloned()
            .sorted_by(|x, y| (&x.a, &x.b).cmp(&(&y.a, &y.b)))
            .collect();

        info!(
            project_id = %project.id,
            matches = matches.len(),
            exclusive_pairs = mutually_exclusive_pairs.len(),
            stack_size = plan.optimal.program_ids.len(),
            total_combined_value,
            "stack valuation complete"
        );

        Ok(FinalStackValuation {
            run_id: Uuid::new_v4(),
            evaluated_at: Utc::now(),
            engine_version: format!("stack-engine-{}", env!("CARGO_PKG_VERSION")),
            project_id: project.id,
            matches,
            mutually_exclusive_pairs,
            stacking_groups: plan.groups,
            optimal_stack: plan.optimal,
            bonus_breakdowns,
            total_combined_value,
            value_by_jurisdiction,
        })
    }

    fn validate_boundary(
        project: &Project,
        catalog: &[IncentiveProgram],
    ) -> Result<(), EngineError> {
        if catalog.is_empty() {
            return Err(EngineError::EmptyCatalog);
        }
        let cost = project.total_cost.as_dollars();
        if !cost.is_finite() || cost <= 0.0 {
            return Err(EngineError::InvalidProject(
                "total development cost must be a positive amount".into(),
            ));
        }
        if project.location.state.trim().is_empty() {
            return Err(EngineError::InvalidProject(
                "project location must carry a state code".into(),
            ));
        }
        Ok(())
    }
}
