//! the snark scalar field
//!
//! every hash, commitment, and nullifier in the shielded pool is a field
//! element of the bn254 scalar field. we serialize field elements as
//! big-endian 32-byte arrays and lowercase hex, matching the wire format
//! the rest of the ecosystem (circuits, the on-chain verifier) expects.

use ark_ff::{BigInteger, PrimeField};

/// an element of the snark scalar field (bn254 `Fr`)
pub type Field = ark_bn254::Fr;

/// big-endian encode a field element to 32 bytes
pub fn to_bytes_be(f: &Field) -> [u8; 32] {
    let mut out = [0u8; 32];
    let be = f.into_bigint().to_bytes_be();
    out[32 - be.len()..].copy_from_slice(&be);
    out
}

/// decode 32 big-endian bytes modulo the field order
pub fn from_bytes_be_mod_order(bytes: &[u8]) -> Field {
    Field::from_be_bytes_mod_order(bytes)
}

/// lowercase hex encoding of a field element, as used for KV keys and
/// wire values (§6: "keys are arrays of lowercase hex strings")
pub fn to_hex(f: &Field) -> String {
    hex::encode(to_bytes_be(f))
}

/// parse a lowercase (or mixed-case) hex string into a field element,
/// reducing modulo the field order if the decoded integer is out of range
pub fn from_hex(s: &str) -> Result<Field, hex::FromHexError> {
    let bytes = hex::decode(s.trim_start_matches("0x"))?;
    Ok(from_bytes_be_mod_order(&bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip() {
        let f = Field::from(424242u64);
        let bytes = to_bytes_be(&f);
        assert_eq!(from_bytes_be_mod_order(&bytes), f);
    }

    #[test]
    fn hex_roundtrip() {
        let f = Field::from(7u64);
        let hex = to_hex(&f);
        assert_eq!(from_hex(&hex).unwrap(), f);
    }
}
