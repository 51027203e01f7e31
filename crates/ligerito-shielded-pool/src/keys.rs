//! addresses (§3, §6): `masterPublicKey` + `viewingPublicKey`, bech32-encoded
//! with a chain-family prefix.

use bech32::{self, FromBase32, ToBase32, Variant};

use shielded_crypto::field::{self, Field};

use crate::Error;

/// the closed set of address-family prefixes (§9: "a closed enum; encode
/// chain ID → prefix as a table")
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChainFamily {
    Ethereum,
    Bsc,
    /// no chain bound; the address is valid for any chain the viewer scans
    Any,
}

impl ChainFamily {
    pub fn hrp(self) -> &'static str {
        match self {
            ChainFamily::Ethereum => "rgeth",
            ChainFamily::Bsc => "rgbsc",
            ChainFamily::Any => "rgany",
        }
    }

    /// chain ID → family, per the closed table; unlisted chain IDs still
    /// round-trip through `Any` rather than failing encoding
    pub fn from_chain_id(chain_id: Option<u64>) -> Self {
        match chain_id {
            None => ChainFamily::Any,
            Some(1) => ChainFamily::Ethereum,
            Some(56) => ChainFamily::Bsc,
            Some(_) => ChainFamily::Any,
        }
    }

    fn from_hrp(hrp: &str) -> Option<Self> {
        match hrp {
            "rgeth" => Some(ChainFamily::Ethereum),
            "rgbsc" => Some(ChainFamily::Bsc),
            "rgany" => Some(ChainFamily::Any),
            _ => None,
        }
    }
}

/// a shielded-pool address: `{ masterPublicKey, viewingPublicKey, chainID? }`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Address {
    pub master_public_key: Field,
    pub viewing_public_key: [u8; 32],
    pub chain_id: Option<u64>,
}

impl Address {
    pub fn new(master_public_key: Field, viewing_public_key: [u8; 32], chain_id: Option<u64>) -> Self {
        Self {
            master_public_key,
            viewing_public_key,
            chain_id,
        }
    }

    /// bech32 encode: hrp from the chain family, payload = mpk ‖ vpk (64B)
    pub fn encode(&self) -> Result<String, Error> {
        let mut payload = Vec::with_capacity(64);
        payload.extend_from_slice(&field::to_bytes_be(&self.master_public_key));
        payload.extend_from_slice(&self.viewing_public_key);

        let hrp = ChainFamily::from_chain_id(self.chain_id).hrp();
        bech32::encode(hrp, payload.to_base32(), Variant::Bech32m)
            .map_err(|e| Error::Address(e.to_string()))
    }

    /// inverse of [`Address::encode`]; the chain family is recovered from
    /// the hrp but the concrete `chain_id` inside that family is not
    /// recoverable from the address alone (the caller supplies it from
    /// context, e.g. which RPC endpoint scanned the commitment)
    pub fn decode(s: &str) -> Result<Self, Error> {
        let (hrp, data, variant) =
            bech32::decode(s).map_err(|e| Error::Address(e.to_string()))?;
        if variant != Variant::Bech32m {
            return Err(Error::Address("expected bech32m".into()));
        }
        if ChainFamily::from_hrp(&hrp).is_none() {
            return Err(Error::Address(format!("unknown address prefix {hrp}")));
        }
        let payload = Vec::<u8>::from_base32(&data).map_err(|e| Error::Address(e.to_string()))?;
        if payload.len() != 64 {
            return Err(Error::Address("address payload must be 64 bytes".into()));
        }

        let master_public_key = field::from_bytes_be_mod_order(&payload[..32]);
        let mut viewing_public_key = [0u8; 32];
        viewing_public_key.copy_from_slice(&payload[32..]);

        Ok(Self {
            master_public_key,
            viewing_public_key,
            chain_id: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrips_through_bech32() {
        let addr = Address::new(Field::from(42u64), [7u8; 32], Some(1));
        let encoded = addr.encode().unwrap();
        assert!(encoded.starts_with("rgeth1"));

        let decoded = Address::decode(&encoded).unwrap();
        assert_eq!(decoded.master_public_key, addr.master_public_key);
        assert_eq!(decoded.viewing_public_key, addr.viewing_public_key);
    }

    #[test]
    fn any_chain_uses_rgany_prefix() {
        let addr = Address::new(Field::from(1u64), [0u8; 32], None);
        assert!(addr.encode().unwrap().starts_with("rgany1"));
    }

    #[test]
    fn unknown_prefix_is_rejected() {
        assert!(Address::decode("bc1qar0srrr7xfkvy5l643lydnw9re59gtzzwf5mdq").is_err());
    }
}
