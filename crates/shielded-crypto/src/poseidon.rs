//! poseidon hashing over the snark scalar field
//!
//! used for note commitments, note public keys, nullifiers, and merkle
//! node hashing. arity is chosen from the input slice length, matching
//! the circuit's fixed-arity poseidon instances (2-, 3-, and 5-ary are
//! the ones the pool actually uses).

use light_poseidon::{Poseidon, PoseidonHasher};

use crate::field::Field;
use crate::Error;

/// hash a slice of field elements with poseidon
///
/// `inputs` must be non-empty; light-poseidon's circom-compatible
/// parameter set supports up to 16 inputs, comfortably covering the
/// arities this crate needs (2 for `hashLeftRight`, 2-3 for note
/// derivations, 2 for nullifiers).
pub fn poseidon(inputs: &[Field]) -> Result<Field, Error> {
    if inputs.is_empty() {
        return Err(Error::EmptyPoseidonInput);
    }
    let mut hasher =
        Poseidon::<Field>::new_circom(inputs.len()).map_err(|e| Error::Poseidon(e.to_string()))?;
    hasher
        .hash(inputs)
        .map_err(|e| Error::Poseidon(e.to_string()))
}

/// `hashLeftRight(l, r) = Poseidon(l, r)` — the merkle tree's node hash
pub fn hash_left_right(left: Field, right: Field) -> Result<Field, Error> {
    poseidon(&[left, right])
}
