//! the spending-solution planner (§4.5): coin selection constrained to
//! produce input sets whose cardinality is one the circuit accepts.
//!
//! builds on [`shielded_wallet::txo`] (`Txo`, `TreeBalance`, the shapes a
//! wallet's `balances_by_tree` already produces) and
//! [`ligerito_shielded_pool::Note`] (the output side of a spend).

mod batch;
mod error;
mod groups;
mod nullifier_count;

pub use batch::{find_next_solution_batch, should_add_more_utxos};
pub use error::{Error, Result};
pub use groups::{
    create_complex_satisfying_spending_solution_groups, create_spending_solution_groups_for_output,
    plan_spending_solutions, SpendingSolutionGroup,
};
pub use nullifier_count::{is_valid_count, next_nullifier_target, sort_utxos_by_size, VALID_COUNTS};
