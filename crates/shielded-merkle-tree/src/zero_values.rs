//! per-level filler values for an absent subtree (§3: "missing children
//! default to `zeroValues[level-1]`")

use shielded_crypto::field::Field;
use shielded_crypto::poseidon::hash_left_right;

use crate::constants::merkle_zero_value;
use crate::Result;

/// `zero_values()[level]` is the node value of a fully-empty subtree whose
/// leaves are all `MERKLE_ZERO_VALUE`, for `level` in `0..=depth`
pub fn compute(depth: u32) -> Result<Vec<Field>> {
    let mut values = Vec::with_capacity(depth as usize + 1);
    values.push(merkle_zero_value());
    for level in 0..depth {
        let prev = values[level as usize];
        values.push(hash_left_right(prev, prev)?);
    }
    Ok(values)
}
