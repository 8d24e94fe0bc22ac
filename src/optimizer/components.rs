use std::collections::HashMap;

use crate::compat::CompatibilityGraph;
use crate::domain::MatchedIncentive;

/// Plain union-find over match indices. Exclusion graphs are small and
/// sparse, so this stays allocation-light and needs no graph dependency.
pub struct UnionFind {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl UnionFind {
    pub fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            rank: vec![0; n],
        }
    }

    pub fn find(&mut self, x: usize) -> usize {
        if self.parent[x] != x {
            let root = self.find(self.parent[x]);
            self.parent[x] = root;
        }
        self.parent[x]
    }

    pub fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra == rb {
            return;
        }
        match self.rank[ra].cmp(&self.rank[rb]) {
            std::cmp::Ordering::Less => self.parent[ra] = rb,
            std::cmp::Ordering::Greater => self.parent[rb] = ra,
            std::cmp::Ordering::Equal => {
                self.parent[rb] = ra;
                self.rank[ra] += 1;
            }
        }
    }
}

/// Decompose the matches into connected components of the exclusion graph.
/// Components come back as sorted index lists, ordered by their smallest
/// member, so downstream output is deterministic.
pub fn connected_components(
    matches: &[MatchedIncentive],
    graph: &CompatibilityGraph,
) -> Vec<Vec<usize>> {
    let index_of: HashMap<&str, usize> = matches
        .iter()
        .enumerate()
        .map(|(i, m)| (m.program_id(), i))
        .collect();

    let mut uf = UnionFind::new(matches.len());
    for pair in &graph.pairs {
        if let (Some(&a), Some(&b)) = (index_of.get(pair.a.as_str()), index_of.get(pair.b.as_str()))
        {
            uf.union(a, b);
        }
    }

    let mut by_root: HashMap<usize, Vec<usize>> = HashMap::new();
    for i in 0..matches.len() {
        let root = uf.find(i);
        by_root.entry(root).or_default().push(i);
    }

    let mut components: Vec<Vec<usize>> = by_root.into_values().collect();
    for c in &mut components {
        c.sort_unstable();
    }
    components.sort_by_key(|c| c[0]);
    components
}
