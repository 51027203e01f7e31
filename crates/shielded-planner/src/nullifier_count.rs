//! valid spending-group cardinalities (§4.5: `V = {1, 2, 8}`)

use shielded_wallet::txo::Txo;

/// the only input counts the circuit accepts for a single spending group
pub const VALID_COUNTS: [usize; 3] = [1, 2, 8];

pub fn is_valid_count(n: usize) -> bool {
    VALID_COUNTS.contains(&n)
}

/// `min { v ∈ V : v > n }`; `None` if `n ≥ max V`
pub fn next_nullifier_target(n: usize) -> Option<usize> {
    VALID_COUNTS.iter().copied().find(|&v| v > n)
}

/// descending by value; ties keep their relative order. a zero-value UTXO
/// sorts last since it can never be greater than anything else.
pub fn sort_utxos_by_size(utxos: &mut [Txo]) {
    utxos.sort_by(|a, b| b.value.cmp(&a.value));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_target_matches_the_worked_table() {
        assert_eq!(next_nullifier_target(0), Some(1));
        assert_eq!(next_nullifier_target(1), Some(2));
        for n in 2..=7 {
            assert_eq!(next_nullifier_target(n), Some(8), "n = {n}");
        }
        assert_eq!(next_nullifier_target(8), None);
        assert_eq!(next_nullifier_target(9), None);
    }

    #[test]
    fn next_target_is_monotone() {
        for n1 in 0..12 {
            for n2 in n1..12 {
                let (t1, t2) = (next_nullifier_target(n1), next_nullifier_target(n2));
                match (t1, t2) {
                    (Some(a), Some(b)) => assert!(a <= b),
                    (Some(_), None) => {}
                    (None, None) => {}
                    (None, Some(_)) => panic!("target({n1})=None but target({n2})=Some, n1<=n2"),
                }
            }
        }
    }
}
