use ordered_float::OrderedFloat;

use super::exhaustive::Selection;
use crate::compat::CompatibilityGraph;
use crate::domain::MatchedIncentive;

/// Greedy highest-value-first fallback for components too large to
/// enumerate. Not proven optimal; the plan carries a heuristic flag when
/// this path runs.
pub fn greedy_component(
    matches: &[MatchedIncentive],
    graph: &CompatibilityGraph,
    component: &[usize],
) -> Selection {
    let mut order: Vec<usize> = component.to_vec();
    order.sort_by_key(|&i| {
        (
            std::cmp::Reverse(OrderedFloat(matches[i].expected_value())),
            matches[i].unmet_requirement_count(),
            matches[i].program_id().to_string(),
        )
    });

    let mut chosen: Vec<usize> = Vec::new();
    for i in order {
        let compatible = chosen.iter().all(|&j| {
            !graph.are_exclusive(matches[i].program_id(), matches[j].program_id())
        });
        if compatible && matches[i].expected_value() > 0.0 {
            chosen.push(i);
        }
    }
    chosen.sort_unstable();

    Selection {
        value: chosen.iter().map(|&i| matches[i].expected_value()).sum(),
        unmet_requirements: chosen
            .iter()
            .map(|&i| matches[i].unmet_requirement_count())
            .sum(),
        members: chosen,
    }
}
