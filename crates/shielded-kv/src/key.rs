//! key encoding (§6: "keys are arrays of lowercase hex strings of 64
//! characters, left-padded; the on-disk key is the colon-join of those
//! components")

/// one component of a namespaced key
pub type Key = Vec<String>;

/// a bare namespace label, e.g. `"wallet"` or `"merkletree-spend"`
pub fn label(s: &str) -> String {
    s.to_ascii_lowercase()
}

/// a numeric identifier, left-padded hex to 64 characters (32 bytes)
pub fn numeric(n: u64) -> String {
    format!("{:0>64x}", n)
}

/// a raw 32-byte hash or field element, hex-encoded
pub fn hash32(bytes: &[u8; 32]) -> String {
    hex::encode(bytes)
}

/// the colon-joined on-disk key for a component list
pub fn join(key: &[String]) -> String {
    key.join(":")
}
