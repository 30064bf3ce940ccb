//! Configuration consistency engine
//!
//! Applies the ordered rule catalogue exactly once, left to right, to a
//! symbol table. A later rule may observe a value that an earlier rule just
//! wrote, and earlier rules are never re-evaluated after later ones run. The
//! pass is deliberately linear; it does not iterate to a fixed point. It also
//! has no failure path: every action is a total mutation, and a table that
//! arrives with its declared invariants already violated is resolved rather
//! than rejected.

pub mod rules;

pub use rules::{Rule, CATALOGUE};

use crate::symbols::ConfigTable;

/// Run the full rule catalogue over `table`, mutating it in place.
pub fn resolve(table: &mut ConfigTable) {
    for rule in CATALOGUE {
        if (rule.predicate)(table) {
            (rule.action)(table);
        }
    }
}
