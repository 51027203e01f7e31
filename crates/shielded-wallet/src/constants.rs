//! wallet-identity constants (§4.4)
//!
//! the two derivation-prefix constants are the extent of HD-path handling
//! this crate owns; BIP-39 mnemonic-to-seed conversion and the generic
//! BIP-32 derivation algorithm are named external collaborators (§1) and
//! are reached through [`crate::hd::HdDeriver`].

/// `m/44'/1984'/0'/0'` — the spending (BabyJubJub) subtree prefix
pub const SPENDING_DERIVATION_PREFIX: &str = "m/44'/1984'/0'/0'";

/// `m/420'/1984'/0'/0'` — the viewing (Ed25519) subtree prefix
pub const VIEWING_DERIVATION_PREFIX: &str = "m/420'/1984'/0'/0'";

/// full hardened path for the spending key of wallet `index`
pub fn spending_path(index: u32) -> String {
    format!("{SPENDING_DERIVATION_PREFIX}/{index}'")
}

/// full hardened path for the viewing key of wallet `index`
pub fn viewing_path(index: u32) -> String {
    format!("{VIEWING_DERIVATION_PREFIX}/{index}'")
}

/// a chain identifier; `None` encodes the chain-agnostic `any` address
/// family (§3 `Address.chainID?`)
pub type ChainId = u64;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_are_hardened_and_indexed() {
        assert_eq!(spending_path(0), "m/44'/1984'/0'/0'/0'");
        assert_eq!(viewing_path(3), "m/420'/1984'/0'/0'/3'");
    }
}
