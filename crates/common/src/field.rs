//! Elements of the scalar field the circuit operates in.
//!
//! The pipeline works over a single prime field (the BN254 scalar field used
//! by the circuit toolchain). Values are carried as arbitrary-precision
//! integers reduced modulo the prime, rendered as decimal strings in JSON and
//! as fixed-width little-endian bytes in binary formats, so no precision is
//! lost on either side of a file boundary.

use crate::error::{Error, Result};
use num_bigint::BigUint;
use num_traits::Zero;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::OnceLock;

/// Decimal representation of the field modulus.
pub const MODULUS_DECIMAL: &str =
    "21888242871839275222246405745257275088548364400416034343698204186575808495617";

/// Fixed byte width of one serialized field element.
pub const FIELD_ELEMENT_BYTES: usize = 32;

/// The field modulus as a big integer.
pub fn modulus() -> &'static BigUint {
    static MODULUS: OnceLock<BigUint> = OnceLock::new();
    MODULUS.get_or_init(|| MODULUS_DECIMAL.parse().expect("valid modulus literal"))
}

/// A value in the scalar field, kept in canonical reduced form.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct FieldElement(BigUint);

impl FieldElement {
    /// Reduce an arbitrary big integer into the field.
    pub fn new(value: BigUint) -> Self {
        Self(value % modulus())
    }

    pub fn zero() -> Self {
        Self(BigUint::zero())
    }

    pub fn one() -> Self {
        Self(BigUint::from(1u8))
    }

    pub fn from_u64(value: u64) -> Self {
        Self::new(BigUint::from(value))
    }

    pub fn from_u128(value: u128) -> Self {
        Self::new(BigUint::from(value))
    }

    /// Parse a decimal string into a field element.
    pub fn from_decimal(s: &str) -> Result<Self> {
        let value: BigUint = s
            .trim()
            .parse()
            .map_err(|_| Error::InputSchema(format!("'{s}' is not a decimal field element")))?;
        Ok(Self::new(value))
    }

    pub fn to_decimal(&self) -> String {
        self.0.to_str_radix(10)
    }

    pub fn as_biguint(&self) -> &BigUint {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn add(&self, other: &FieldElement) -> FieldElement {
        Self::new(&self.0 + &other.0)
    }

    /// Modular subtraction; wraps around the modulus for negative results.
    pub fn sub(&self, other: &FieldElement) -> FieldElement {
        if self.0 >= other.0 {
            Self(&self.0 - &other.0)
        } else {
            Self((&self.0 + modulus()) - &other.0)
        }
    }

    pub fn mul(&self, other: &FieldElement) -> FieldElement {
        Self::new(&self.0 * &other.0)
    }

    /// Fixed-width little-endian encoding.
    pub fn to_le_bytes(&self) -> [u8; FIELD_ELEMENT_BYTES] {
        let raw = self.0.to_bytes_le();
        let mut out = [0u8; FIELD_ELEMENT_BYTES];
        out[..raw.len()].copy_from_slice(&raw);
        out
    }

    /// Decode a fixed-width little-endian element, rejecting non-canonical
    /// values (at or above the modulus).
    pub fn from_le_bytes(bytes: &[u8; FIELD_ELEMENT_BYTES]) -> Result<Self> {
        let value = BigUint::from_bytes_le(bytes);
        if &value >= modulus() {
            return Err(Error::BadArtifact(
                "field element is not in canonical form".into(),
            ));
        }
        Ok(Self(value))
    }
}

impl fmt::Debug for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FieldElement({})", self.to_decimal())
    }
}

impl fmt::Display for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_decimal())
    }
}

impl From<u64> for FieldElement {
    fn from(value: u64) -> Self {
        Self::from_u64(value)
    }
}

impl Serialize for FieldElement {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_decimal())
    }
}

struct FieldElementVisitor;

impl<'de> Visitor<'de> for FieldElementVisitor {
    type Value = FieldElement;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a decimal string or non-negative integer")
    }

    // Input files produced by the circuit toolchain carry values either as
    // decimal strings or as bare JSON integers; both are accepted.
    fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<FieldElement, E> {
        FieldElement::from_decimal(v).map_err(E::custom)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<FieldElement, E> {
        Ok(FieldElement::from_u64(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<FieldElement, E> {
        u64::try_from(v)
            .map(FieldElement::from_u64)
            .map_err(|_| E::custom("field elements cannot be negative"))
    }
}

impl<'de> Deserialize<'de> for FieldElement {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_any(FieldElementVisitor)
    }
}
