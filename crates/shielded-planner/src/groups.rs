//! `createSpendingSolutionGroupsForOutput` and
//! `createComplexSatisfyingSpendingSolutionGroups` (§4.5)

use std::collections::HashSet;

use ligerito_shielded_pool::{Amount, Note};
use shielded_wallet::txo::{Txo, TreeBalance};

use crate::batch::find_next_solution_batch;
use crate::error::{Error, Result};

/// one circuit invocation: a tree, the input UTXOs it spends, the single
/// output note it produces (cloned from the requested output with the
/// portion of the value this group actually covers), and any withdrawal.
#[derive(Clone, Debug)]
pub struct SpendingSolutionGroup {
    pub spending_tree: u32,
    pub utxos: Vec<Txo>,
    pub outputs: Vec<Note>,
    pub withdraw_value: Amount,
}

fn with_value(output: &Note, value: u128) -> Note {
    let mut note = *output;
    note.value = value;
    note
}

/// satisfy a single output across `tree_balances`, in the order given,
/// reserving spent UTXOs into the shared `excluded` set as it goes.
pub fn create_spending_solution_groups_for_output(
    tree_balances: &[(u32, TreeBalance)],
    output: &Note,
    excluded: &mut HashSet<[u8; 32]>,
) -> Result<Vec<SpendingSolutionGroup>> {
    let required = output.value;
    let mut left = required;
    let mut groups = Vec::new();

    for (tree, balance) in tree_balances {
        while left > 0 {
            let Some(batch) = find_next_solution_batch(balance, left, excluded)? else {
                break;
            };

            for utxo in &batch {
                excluded.insert(utxo.txid);
            }

            let total_spend: u128 = batch.iter().map(|u| u.value.0).sum();
            let solution_value = total_spend.min(left);

            groups.push(SpendingSolutionGroup {
                spending_tree: *tree,
                utxos: batch,
                outputs: vec![with_value(output, solution_value)],
                withdraw_value: Amount::ZERO,
            });

            left = left.saturating_sub(total_spend);
        }
    }

    if left > 0 {
        return Err(Error::PlannerInfeasible);
    }

    Ok(groups)
}

/// process every output in order against a shared `excluded` set; the
/// planner is not globally optimal across many destination addresses, so
/// an earlier output can starve a later one of UTXOs it would otherwise
/// have used.
pub fn create_complex_satisfying_spending_solution_groups(
    tree_balances: &[(u32, TreeBalance)],
    outputs: &[Note],
) -> Result<Vec<SpendingSolutionGroup>> {
    let mut excluded = HashSet::new();
    let mut groups = Vec::new();
    for output in outputs {
        let produced = create_spending_solution_groups_for_output(tree_balances, output, &mut excluded)?;
        groups.extend(produced);
    }
    Ok(groups)
}

/// the planner's single entry point. a request for exactly one output
/// goes through the per-output routine directly and reports an
/// unsatisfiable result as [`Error::PlannerUnsupported`] ("complex
/// circuit", §6); two or more outputs go through the multi-output
/// orchestrator, whose failure is [`Error::PlannerInfeasible`]
/// ("consolidate balances", §4.5). see DESIGN.md for why the split falls
/// here.
pub fn plan_spending_solutions(
    tree_balances: &[(u32, TreeBalance)],
    outputs: &[Note],
) -> Result<Vec<SpendingSolutionGroup>> {
    match outputs {
        [single] => {
            let mut excluded = HashSet::new();
            create_spending_solution_groups_for_output(tree_balances, single, &mut excluded)
                .map_err(|err| match err {
                    Error::PlannerInfeasible => Error::PlannerUnsupported,
                    other => other,
                })
        }
        _ => create_complex_satisfying_spending_solution_groups(tree_balances, outputs),
    }
}
