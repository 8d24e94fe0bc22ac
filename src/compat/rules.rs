use once_cell::sync::Lazy;
use std::collections::HashSet;

use crate::domain::{Mechanism, Technology};

/// Mechanism pairs that compete for the same cost basis when offered at the
/// same jurisdiction level. Kept as data so a new mechanism (or a policy
/// change) is a table edit, not a code branch. Pairs are stored in one
/// orientation; lookups normalize.
static BASIS_COMPETING_MECHANISMS: Lazy<HashSet<(Mechanism, Mechanism)>> = Lazy::new(|| {
    HashSet::from([
        (Mechanism::TaxCredit, Mechanism::TaxCredit),
        (Mechanism::Grant, Mechanism::Grant),
        (Mechanism::Rebate, Mechanism::Rebate),
        (Mechanism::Loan, Mechanism::Loan),
    ])
});

/// True when the two mechanisms compete for the same basis at one level.
/// Direct-pay credits compete as tax credits.
pub fn mechanisms_compete(a: Mechanism, b: Mechanism) -> bool {
    let (a, b) = (a.basis_family(), b.basis_family());
    BASIS_COMPETING_MECHANISMS.contains(&(a, b)) || BASIS_COMPETING_MECHANISMS.contains(&(b, a))
}

/// Technology overlap for the exclusion rule. An empty list is
/// technology-agnostic and overlaps everything.
pub fn technologies_overlap(a: &[Technology], b: &[Technology]) -> bool {
    if a.is_empty() || b.is_empty() {
        return true;
    }
    a.iter().any(|t| b.contains(t))
}
