//! tree-shape constants (§3, §8 scenario 6)

use sha3::{Digest, Keccak256};
use shielded_crypto::field::{self, Field};

/// depth of a production commitment tree; `2^DEPTH` leaves per tree
pub const DEPTH: u32 = 16;

/// total leaf capacity of a depth-16 tree
pub const TOTAL_LEAVES: u64 = 1 << DEPTH;

/// `keccak256("Railgun") mod SNARK_PRIME`, the level-0 filler value for an
/// empty subtree
pub fn merkle_zero_value() -> Field {
    let digest = Keccak256::digest(b"Railgun");
    field::from_bytes_be_mod_order(&digest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_value_is_deterministic() {
        assert_eq!(merkle_zero_value(), merkle_zero_value());
    }
}
