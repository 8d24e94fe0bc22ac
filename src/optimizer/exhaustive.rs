use crate::compat::CompatibilityGraph;
use crate::domain::MatchedIncentive;

/// One valid (pairwise-compatible) selection inside a single component.
#[derive(Debug, Clone)]
pub struct Selection {
    /// Indices into the full match slice, ascending.
    pub members: Vec<usize>,
    pub value: f64,
    pub unmet_requirements: usize,
}

impl Selection {
    pub fn empty() -> Self {
        Self {
            members: Vec::new(),
            value: 0.0,
            unmet_requirements: 0,
        }
    }
}

/// Selection ordering: value descending, then fewer unmet requirements,
/// then lexical program-id order for determinism.
pub fn rank_selections(selections: &mut [Selection], matches: &[MatchedIncentive]) {
    selections.sort_by(|a, b| {
        b.value
            .total_cmp(&a.value)
            .then_with(|| a.unmet_requirements.cmp(&b.unmet_requirements))
            .then_with(|| member_ids(a, matches).cmp(&member_ids(b, matches)))
    });
}

fn member_ids<'a>(s: &Selection, matches: &'a [MatchedIncentive]) -> Vec<&'a str> {
    s.members.iter().map(|&i| matches[i].program_id()).collect()
}

/// Hard ceiling on exhaustively enumerable component size. The bitmask walk
/// is 2^n over a u32, so anything larger must go through the greedy path;
/// `StackOptimizer` clamps its configured cap to this bound.
pub const MAX_ENUMERATION_SIZE: usize = 24;

/// Exhaustively enumerate every independent subset of one component and
/// return the best `keep_top` selections, ranked. The caller guarantees
/// `component.len()` is at or under `MAX_ENUMERATION_SIZE`, so the bitmask
/// walk is bounded regardless of catalog size.
pub fn enumerate_component(
    matches: &[MatchedIncentive],
    graph: &CompatibilityGraph,
    component: &[usize],
    keep_top: usize,
) -> Vec<Selection> {
    // Zero-value members can only pad a stack, never improve it; drop them
    // up front so ranking ties cannot smuggle one in.
    let component: Vec<usize> = component
        .iter()
        .copied()
        .filter(|&i| matches[i].expected_value() > 0.0)
        .collect();

    let n = component.len();
    debug_assert!(n <= MAX_ENUMERATION_SIZE, "component exceeds enumeration bounds");

    // Conflict bitmask per local position.
    let mut conflicts = vec![0u32; n];
    for (li, &gi) in component.iter().enumerate() {
        for (lj, &gj) in component.iter().enumerate() {
            if li != lj
                && graph.are_exclusive(matches[gi].program_id(), matches[gj].program_id())
            {
                conflicts[li] |= 1 << lj;
            }
        }
    }

    let mut selections = Vec::new();
    'mask: for mask in 0u32..(1 << n) {
        let mut value = 0.0;
        let mut unmet = 0;
        for li in 0..n {
            if mask & (1 << li) != 0 {
                if conflicts[li] & mask != 0 {
                    continue 'mask;
                }
                value += matches[component[li]].expected_value();
                unmet += matches[component[li]].unmet_requirement_count();
            }
        }
        selections.push(Selection {
            members: component
                .iter()
                .enumerate()
                .filter(|(li, _)| mask & (1 << li) != 0)
                .map(|(_, &gi)| gi)
                .collect(),
            value,
            unmet_requirements: unmet,
        });
    }

    rank_selections(&mut selections, matches);
    selections.truncate(keep_top.max(1));
    selections
}
