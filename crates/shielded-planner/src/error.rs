//! the planner error taxonomy (§7)

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// no legal combination of input cardinalities covers the requested
    /// output; surfaced to the user as the consolidation message
    #[error("Please consolidate balances before multi-sending…")]
    PlannerInfeasible,

    /// the request needs a circuit shape the protocol does not offer
    #[error("This transaction requires a complex circuit for multi-sending, which is not supported…")]
    PlannerUnsupported,

    /// a solution batch's cardinality fell outside `V = {1, 2, 8}`; this
    /// is an internal invariant violation, not a funds-availability problem
    #[error("Invalid nullifier count")]
    InvariantViolation { count: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
