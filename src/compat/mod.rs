//! Compatibility resolver: builds the pairwise exclusion graph over matched
//! programs.
//!
//! Two programs are mutually exclusive when the same-level same-mechanism
//! rule fires on overlapping technology, when either program's exclusion
//! list names the other, or when either is flagged non-stackable. Different
//! jurisdiction levels and different mechanisms always combine; that is the
//! policy intent behind federal+state+local+utility stacking.

pub mod rules;

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

use crate::domain::{JurisdictionLevel, MatchedIncentive, Mechanism};

/// Why an exclusion edge exists.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum ExclusionReason {
    /// Same level, same mechanism, overlapping technology.
    BasisCompetition {
        level: JurisdictionLevel,
        mechanism: Mechanism,
    },
    /// One program's exclusion list names the other.
    ProgramRule { declared_by: String },
    /// One side is flagged non-stackable with everything.
    NonStackable { program_id: String },
}

impl std::fmt::Display for ExclusionReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExclusionReason::BasisCompetition { level, mechanism } => {
                write!(f, "competes for the same basis ({level} {mechanism})")
            }
            ExclusionReason::ProgramRule { declared_by } => {
                write!(f, "excluded by program rule of {declared_by}")
            }
            ExclusionReason::NonStackable { program_id } => {
                write!(f, "{program_id} is not stackable with other programs")
            }
        }
    }
}

/// One mutually-exclusive pair, with a recommendation naming the program
/// worth keeping and the expected-value delta backing it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExclusionPair {
    pub a: String,
    pub b: String,
    pub reason: ExclusionReason,
    /// Program id the resolver recommends keeping.
    pub keep: String,
    /// Expected-value gap between the two, non-negative dollars.
    pub value_delta: f64,
}

/// Adjacency-set representation of the exclusion graph, keyed by program id.
/// Node and edge ordering is BTree-deterministic.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompatibilityGraph {
    pub nodes: Vec<String>,
    adjacency: BTreeMap<String, BTreeSet<String>>,
    pub pairs: Vec<ExclusionPair>,
}

impl CompatibilityGraph {
    pub fn are_exclusive(&self, a: &str, b: &str) -> bool {
        self.adjacency.get(a).is_some_and(|s| s.contains(b))
    }

    pub fn exclusions_of(&self, id: &str) -> impl Iterator<Item = &str> {
        self.adjacency.get(id).into_iter().flatten().map(String::as_str)
    }

    pub fn edge_count(&self) -> usize {
        self.pairs.len()
    }

    fn add_edge(&mut self, pair: ExclusionPair) {
        // Symmetric by construction.
        self.adjacency
            .entry(pair.a.clone())
            .or_default()
            .insert(pair.b.clone());
        self.adjacency
            .entry(pair.b.clone())
            .or_default()
            .insert(pair.a.clone());
        self.pairs.push(pair);
    }
}

pub struct CompatibilityResolver;

impl CompatibilityResolver {
    /// Build the exclusion graph over the matched programs.
    pub fn build_graph(matches: &[MatchedIncentive]) -> CompatibilityGraph {
        let mut graph = CompatibilityGraph {
            nodes: matches.iter().map(|m| m.program.id.clone()).collect(),
            ..Default::default()
        };

        for (i, a) in matches.iter().enumerate() {
            for b in &matches[i + 1..] {
                if let Some(reason) = Self::exclusion_reason(a, b) {
                    let (keep, delta) = Self::recommend(a, b);
                    graph.add_edge(ExclusionPair {
                        a: a.program.id.clone(),
                        b: b.program.id.clone(),
                        reason,
                        keep,
                        value_delta: delta,
                    });
                }
            }
        }

        debug!(
            nodes = graph.nodes.len(),
            exclusive_pairs = graph.edge_count(),
            "compatibility graph built"
        );
        graph
    }

    fn exclusion_reason(a: &MatchedIncentive, b: &MatchedIncentive) -> Option<ExclusionReason> {
        let (pa, pb) = (&a.program, &b.program);

        // Non-stackable programs conflict with everything.
        if !pa.stackable {
            return Some(ExclusionReason::NonStackable {
                program_id: pa.id.clone(),
            });
        }
        if !pb.stackable {
            return Some(ExclusionReason::NonStackable {
                program_id: pb.id.clone(),
            });
        }

        // Program-declared exclusion lists override the rule table.
        if pa.excludes.iter().any(|id| id == &pb.id) {
            return Some(ExclusionReason::ProgramRule {
                declared_by: pa.id.clone(),
            });
        }
        if pb.excludes.iter().any(|id| id == &pa.id) {
            return Some(ExclusionReason::ProgramRule {
                declared_by: pb.id.clone(),
            });
        }

        // Rule table: same level + competing mechanism + overlapping
        // technology, e.g. an investment-credit vs production-credit
        // election on the same system.
        if pa.level == pb.level
            && rules::mechanisms_compete(pa.mechanism, pb.mechanism)
            && rules::technologies_overlap(&pa.technologies, &pb.technologies)
        {
            return Some(ExclusionReason::BasisCompetition {
                level: pa.level,
                mechanism: pa.mechanism.basis_family(),
            });
        }

        None
    }

    /// Pick the program worth keeping from an exclusive pair: higher
    /// expected value, then fewer unmet requirements, then lexical id.
    fn recommend(a: &MatchedIncentive, b: &MatchedIncentive) -> (String, f64) {
        let delta = (a.expected_value() - b.expected_value()).abs();
        let keep = match a.expected_value().total_cmp(&b.expected_value()) {
            std::cmp::Ordering::Greater => &a.program.id,
            std::cmp::Ordering::Less => &b.program.id,
            std::cmp::Ordering::Equal => {
                match a.unmet_requirement_count().cmp(&b.unmet_requirement_count()) {
                    std::cmp::Ordering::Less => &a.program.id,
                    std::cmp::Ordering::Greater => &b.program.id,
                    std::cmp::Ordering::Equal => (&a.program.id).min(&b.program.id),
                }
            }
        };
        (keep.clone(), delta)
    }
}
