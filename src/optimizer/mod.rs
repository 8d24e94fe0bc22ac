//! Stack optimizer: maximum-weight independent set over the exclusion
//! graph, weighted by expected value.
//!
//! The graph is decomposed into connected components; components are
//! independent, so the global optimum is the union of per-component optima.
//! Small components are enumerated exhaustively; a component above the
//! enumeration cap falls back to greedy selection and flags the plan as
//! heuristic.

pub mod components;
pub mod exhaustive;
pub mod greedy;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::compat::CompatibilityGraph;
use crate::domain::MatchedIncentive;
use exhaustive::Selection;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    /// Largest conflict component enumerated exhaustively. Bitmask
    /// enumeration is 2^n, so `StackOptimizer::new` clamps this to the
    /// enumeration bound; larger components fall back to greedy.
    pub max_cluster_size: usize,
    /// Number of alternative value tiers reported for what-if comparison.
    pub max_groups: usize,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            max_cluster_size: 16,
            max_groups: 5,
        }
    }
}

/// One pairwise-compatible program subset with its combined expected value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StackingGroup {
    /// 1 is the optimal stack; higher ranks are alternative tiers.
    pub rank: usize,
    pub program_ids: Vec<String>,
    pub combined_value: f64,
    /// Set when greedy fallback contributed; the group is then not proven
    /// optimal.
    pub heuristic: bool,
}

/// Optimizer output: the optimal stack plus up to `max_groups` tiers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StackingPlan {
    pub optimal: StackingGroup,
    pub groups: Vec<StackingGroup>,
}

pub struct StackOptimizer {
    cfg: OptimizerConfig,
}

impl StackOptimizer {
    /// The configured cluster cap is clamped to the bitmask enumeration
    /// bound; components above it always take the greedy path.
    pub fn new(mut cfg: OptimizerConfig) -> Self {
        if cfg.max_cluster_size > exhaustive::MAX_ENUMERATION_SIZE {
            warn!(
                configured = cfg.max_cluster_size,
                bound = exhaustive::MAX_ENUMERATION_SIZE,
                "max_cluster_size exceeds the enumeration bound, clamping"
            );
            cfg.max_cluster_size = exhaustive::MAX_ENUMERATION_SIZE;
        }
        Self { cfg }
    }

    pub fn optimize(
        &self,
        matches: &[MatchedIncentive],
        graph: &CompatibilityGraph,
    ) -> StackingPlan {
        let comps = components::connected_components(matches, graph);

        // Ranked selections per component; index 0 is that component's
        // optimum.
        let mut per_component: Vec<(Vec<Selection>, bool)> = Vec::with_capacity(comps.len());
        for comp in &comps {
            if comp.len() <= self.cfg.max_cluster_size {
                let sels =
                    exhaustive::enumerate_component(matches, graph, comp, self.cfg.max_groups);
                per_component.push((sels, false));
            } else {
                warn!(
                    cluster_size = comp.len(),
                    cap = self.cfg.max_cluster_size,
                    "conflict cluster exceeds enumeration cap, using greedy selection"
                );
                let sel = greedy::greedy_component(matches, graph, comp);
                per_component.push((vec![sel], true));
            }
        }

        let heuristic = per_component.iter().any(|(_, h)| *h);

        // Tier k is the union of each component's k-th best selection
        // (clamped to what the component has). Tier 0 is the optimum.
        let mut groups: Vec<StackingGroup> = Vec::new();
        for tier in 0..self.cfg.max_groups.max(1) {
            let mut member_indices: Vec<usize> = Vec::new();
            let mut value = 0.0;
            for (sels, _) in &per_component {
                let sel = &sels[tier.min(sels.len() - 1)];
                member_indices.extend(&sel.members);
                value += sel.value;
            }
            let mut program_ids: Vec<String> = member_indices
                .iter()
                .map(|&i| matches[i].program.id.clone())
                .collect();
            program_ids.sort();

            // Stop once tiers stop changing; skip empty what-if tiers.
            if let Some(prev) = groups.last() {
                if prev.program_ids == program_ids {
                    break;
                }
                if program_ids.is_empty() {
                    continue;
                }
            }
            groups.push(StackingGroup {
                rank: groups.len() + 1,
                program_ids,
                combined_value: value,
                heuristic,
            });
        }

        let optimal = groups[0].clone();
        debug!(
            components = comps.len(),
            stack_size = optimal.program_ids.len(),
            combined_value = optimal.combined_value,
            heuristic,
            "stack optimization complete"
        );
        StackingPlan { optimal, groups }
    }
}
