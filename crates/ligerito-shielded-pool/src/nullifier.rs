//! nullifiers (§3, §4.3): the deterministic tag revealed on spend
//!
//! `nullifyingKey = Poseidon(viewingPrivateKey)`,
//! `nullifier(note, position) = Poseidon(nullifyingKey, position)`.

use shielded_crypto::field::Field;
use shielded_crypto::poseidon::poseidon;

use crate::Error;

/// `Poseidon(viewingPrivateKey)`
pub fn nullifying_key(viewing_private_key: Field) -> Result<Field, Error> {
    Ok(poseidon(&[viewing_private_key])?)
}

/// `Poseidon(nullifyingKey, position)`, the static nullifier function
pub fn nullifier(nullifying_key: Field, position: u64) -> Result<Field, Error> {
    Ok(poseidon(&[nullifying_key, Field::from(position)])?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic_for_same_position() {
        let nk = nullifying_key(Field::from(7u64)).unwrap();
        let a = nullifier(nk, 42).unwrap();
        let b = nullifier(nk, 42).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn differs_by_position() {
        let nk = nullifying_key(Field::from(7u64)).unwrap();
        assert_ne!(nullifier(nk, 1).unwrap(), nullifier(nk, 2).unwrap());
    }

    #[test]
    fn differs_by_viewing_key() {
        let nk_a = nullifying_key(Field::from(1u64)).unwrap();
        let nk_b = nullifying_key(Field::from(2u64)).unwrap();
        assert_ne!(nullifier(nk_a, 5).unwrap(), nullifier(nk_b, 5).unwrap());
    }
}
