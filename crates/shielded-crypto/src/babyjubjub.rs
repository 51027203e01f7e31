//! eddsa-babyjubjub: spending-key signatures, and ecdh on the babyjubjub curve
//!
//! the spending key lives on babyjubjub because that is the curve the
//! circuit verifies signatures over; ecdh shared-secret derivation
//! (note encryption) also happens on this curve so both the prover and
//! the wallet agree on the same point arithmetic.
//!
//! `babyjubjub-rs` represents scalars/coordinates with its own field
//! type; we bridge to our bn254 `Field` through decimal strings, which
//! both `ark-ff` and the curve library's field type round-trip exactly.

use std::str::FromStr;

use num_bigint::BigInt;

use crate::field::Field;
use crate::Error;

fn field_to_bigint(f: Field) -> BigInt {
    BigInt::from_str(&f.to_string()).expect("field element decimal string is always valid")
}

fn bigint_to_field(i: &BigInt) -> Field {
    Field::from_str(&i.to_string()).unwrap_or(Field::from(0u64))
}

fn point_x_field(p: &babyjubjub_rs::Point) -> Field {
    Field::from_str(&p.x.to_string()).unwrap_or(Field::from(0u64))
}

fn point_y_field(p: &babyjubjub_rs::Point) -> Field {
    Field::from_str(&p.y.to_string()).unwrap_or(Field::from(0u64))
}

/// a babyjubjub point, e.g. a public key or an ephemeral dh point
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Point(pub(crate) babyjubjub_rs::Point);

impl Point {
    pub fn x(&self) -> Field {
        point_x_field(&self.0)
    }

    pub fn y(&self) -> Field {
        point_y_field(&self.0)
    }

    /// scalar multiplication, `r * self`
    pub fn mul_scalar(&self, r: &Field) -> Point {
        Point(self.0.mul_scalar(&field_to_bigint(*r)))
    }

    pub fn to_bytes(&self) -> [u8; 32] {
        self.0.compress()
    }

    pub fn from_bytes(bytes: [u8; 32]) -> Result<Self, Error> {
        babyjubjub_rs::decompress_point(bytes)
            .map(Point)
            .map_err(Error::BabyJubJub)
    }
}

/// eddsa-babyjubjub signature, `(R8.x, R8.y, s)`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Signature {
    pub r8_x: Field,
    pub r8_y: Field,
    pub s: Field,
}

/// babyjubjub spending key: signs and derives the public spending point
pub struct SigningKey(babyjubjub_rs::PrivateKey);

impl SigningKey {
    /// import a 32-byte seed as a babyjubjub private scalar
    pub fn from_seed(seed: [u8; 32]) -> Result<Self, Error> {
        babyjubjub_rs::PrivateKey::import(seed.to_vec())
            .map(SigningKey)
            .map_err(Error::BabyJubJub)
    }

    pub fn public(&self) -> Point {
        Point(self.0.public())
    }

    /// the clamped scalar the curve library actually multiplies points
    /// by (distinct from the raw 32-byte seed); this is what [`ecdh`]
    /// expects as its private-scalar argument
    pub fn scalar(&self) -> Field {
        bigint_to_field(&self.0.scalar_key())
    }

    /// sign a field-element message (e.g. a poseidon hash of circuit inputs)
    pub fn sign(&self, message: Field) -> Result<Signature, Error> {
        let sig = self
            .0
            .sign(field_to_bigint(message))
            .map_err(Error::BabyJubJub)?;
        Ok(Signature {
            r8_x: point_x_field(&sig.r_b8),
            r8_y: point_y_field(&sig.r_b8),
            s: bigint_to_field(&sig.s),
        })
    }
}

/// verify an eddsa-babyjubjub signature
pub fn verify(public_key: &Point, message: Field, signature: &Signature) -> bool {
    let sig = babyjubjub_rs::Signature {
        r_b8: babyjubjub_rs::Point {
            x: babyjubjub_rs::Fr::from_str(&signature.r8_x.to_string()).unwrap_or_default(),
            y: babyjubjub_rs::Fr::from_str(&signature.r8_y.to_string()).unwrap_or_default(),
        },
        s: field_to_bigint(signature.s),
    };
    babyjubjub_rs::verify(public_key.0.clone(), sig, field_to_bigint(message))
}

/// ecdh shared secret on babyjubjub: `scalar * point`
///
/// the caller is responsible for hashing the resulting point down to a
/// symmetric key (see [`derive_shared_key`]); the raw point is not itself
/// uniformly random over the key space.
pub fn ecdh(private_scalar: &Field, their_public: &Point) -> Point {
    their_public.mul_scalar(private_scalar)
}

/// hash an ecdh shared point down to a 256-bit aes-gcm key
pub fn derive_shared_key(point: &Point) -> [u8; 32] {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(crate::field::to_bytes_be(&point.x()));
    hasher.update(crate::field::to_bytes_be(&point.y()));
    hasher.finalize().into()
}

/// draw a uniform random scalar in the snark scalar field
pub fn random_scalar<R: rand::RngCore + rand::CryptoRng>(rng: &mut R) -> Field {
    let mut bytes = [0u8; 32];
    rng.fill_bytes(&mut bytes);
    crate::field::from_bytes_be_mod_order(&bytes)
}

/// ephemeral-key blinding: `getEphemeralKeys(A, B, r) = (rA, rB)`
///
/// used when encrypting a note to a recipient address `(A, B)` (the
/// master public key and the viewing public key): the sender blinds both
/// recipient points by the same ephemeral scalar `r` so the on-chain
/// ciphertext reveals neither the recipient's keys nor the link between
/// multiple notes sent to them.
pub fn get_ephemeral_keys(a: &Point, b: &Point, r: &Field) -> (Point, Point) {
    (a.mul_scalar(r), b.mul_scalar(r))
}

/// inverse of `getEphemeralKeys`: recover `X` from `rX` given `r`
///
/// requires `r != 0`; the circuit and the sender never construct a
/// blinding with `r = 0`; guard against division-by-zero by inverting `r`
/// in the same scalar field the point multiplication used.
pub fn unblinded_ephemeral_key(blinded: &Point, r: &Field) -> Result<Point, Error> {
    use ark_ff::Field as _;
    let r_inv = r.inverse().ok_or(Error::ZeroBlindingScalar)?;
    Ok(blinded.mul_scalar(&r_inv))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::OsRng;

    #[test]
    fn sign_verify_roundtrip() {
        let sk = SigningKey::from_seed([7u8; 32]).unwrap();
        let pk = sk.public();
        let msg = Field::from(123456789u64);
        let sig = sk.sign(msg).unwrap();
        assert!(verify(&pk, msg, &sig));
        assert!(!verify(&pk, Field::from(1u64), &sig));
    }

    #[test]
    fn ephemeral_key_blinding_round_trips() {
        let mut rng = OsRng;
        let sk_a = SigningKey::from_seed([1u8; 32]).unwrap();
        let sk_b = SigningKey::from_seed([2u8; 32]).unwrap();
        let a = sk_a.public();
        let b = sk_b.public();
        let r = random_scalar(&mut rng);

        let (ra, rb) = get_ephemeral_keys(&a, &b, &r);
        assert_eq!(unblinded_ephemeral_key(&ra, &r).unwrap(), a);
        assert_eq!(unblinded_ephemeral_key(&rb, &r).unwrap(), b);
    }

    #[test]
    fn ecdh_is_symmetric() {
        let sk_a = SigningKey::from_seed([3u8; 32]).unwrap();
        let sk_b = SigningKey::from_seed([4u8; 32]).unwrap();

        // a*B == b*A
        let shared_ab = ecdh(&sk_a.scalar(), &sk_b.public());
        let shared_ba = ecdh(&sk_b.scalar(), &sk_a.public());
        assert_eq!(shared_ab.x(), shared_ba.x());
        assert_eq!(shared_ab.y(), shared_ba.y());
        assert_eq!(derive_shared_key(&shared_ab), derive_shared_key(&shared_ba));
    }
}
