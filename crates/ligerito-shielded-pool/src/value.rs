//! token id and value types for the note model (§3)

/// a 20-byte token identifier (the on-chain asset address)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TokenId(pub [u8; 20]);

impl TokenId {
    /// normalize an arbitrary-length byte slice to 20 bytes, right-aligned
    /// (matching how a shorter on-chain address would be zero-padded)
    pub fn normalize(bytes: &[u8]) -> Self {
        let mut out = [0u8; 20];
        let take = bytes.len().min(20);
        out[20 - take..].copy_from_slice(&bytes[bytes.len() - take..]);
        Self(out)
    }

    pub fn to_bytes(&self) -> [u8; 20] {
        self.0
    }
}

/// amount (u128, matching the note's `value` field in §3)
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(pub u128);

impl Amount {
    pub const ZERO: Self = Self(0);

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }

    pub fn saturating_sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }
}

impl From<u128> for Amount {
    fn from(v: u128) -> Self {
        Self(v)
    }
}

impl From<Amount> for u128 {
    fn from(v: Amount) -> Self {
        v.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_right_pads() {
        let id = TokenId::normalize(&[1, 2, 3]);
        assert_eq!(id.0[17..], [1, 2, 3]);
        assert_eq!(id.0[..17], [0u8; 17]);
    }

    #[test]
    fn normalize_truncates_from_the_left() {
        let full: Vec<u8> = (0..24u8).collect();
        let id = TokenId::normalize(&full);
        assert_eq!(id.0, &full[4..]);
    }
}
