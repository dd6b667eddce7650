//! Conversions between prime field elements and bits, big integers and hex.
//!
//! The engine only ever needs to look at a field element as an integer
//! when it decomposes a value into chunks, so everything here is phrased in
//! terms of the canonical (non-Montgomery) representative.

use ark_ff::{BigInteger, PrimeField};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use num_bigint::BigUint;
use thiserror::Error;

/// Field helpers error
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldHelpersError {
    #[error("failed to deserialize field bytes")]
    DeserializeBytes,
    #[error("failed to decode hex")]
    DecodeHex,
    #[error("{0} bits do not fit in a field element of {1} bits")]
    TooManyBits(usize, u32),
    #[error("integer is not smaller than the field modulus")]
    NotCanonical,
}

pub type Result<T> = std::result::Result<T, FieldHelpersError>;

/// Integer views of a prime field element
pub trait FieldHelpers<F> {
    /// Build an element from little-endian bits.
    /// Fails when there are more bits than the modulus has, or when the
    /// encoded integer is not reduced.
    fn from_bits(bits: &[bool]) -> Result<F>;

    /// Build an element from its canonical integer value
    fn from_biguint(big: &BigUint) -> Result<F>;

    /// Deserialize from the hex of the compressed arkworks encoding
    fn from_hex(hex: &str) -> Result<F>;

    /// Little-endian bits of the canonical representative,
    /// exactly `MODULUS_BIT_SIZE` long
    fn to_bits(&self) -> Vec<bool>;

    /// Canonical representative as a `BigUint`
    fn to_biguint(&self) -> BigUint;

    /// Hex of the compressed arkworks encoding
    fn to_hex(&self) -> String;

    /// The modulus as a `BigUint`
    fn modulus_biguint() -> BigUint;

    /// `2^exp` computed in the field
    fn two_pow(exp: u64) -> F;
}

impl<F: PrimeField> FieldHelpers<F> for F {
    fn from_bits(bits: &[bool]) -> Result<F> {
        if bits.len() > F::MODULUS_BIT_SIZE as usize {
            return Err(FieldHelpersError::TooManyBits(
                bits.len(),
                F::MODULUS_BIT_SIZE,
            ));
        }
        F::from_bigint(F::BigInt::from_bits_le(bits)).ok_or(FieldHelpersError::NotCanonical)
    }

    fn from_biguint(big: &BigUint) -> Result<F> {
        if *big >= F::modulus_biguint() {
            return Err(FieldHelpersError::NotCanonical);
        }
        Ok(F::from_le_bytes_mod_order(&big.to_bytes_le()))
    }

    fn from_hex(hex: &str) -> Result<F> {
        let bytes = hex::decode(hex).map_err(|_| FieldHelpersError::DecodeHex)?;
        F::deserialize_compressed(&mut &bytes[..]).map_err(|_| FieldHelpersError::DeserializeBytes)
    }

    fn to_bits(&self) -> Vec<bool> {
        let mut bits = self.into_bigint().to_bits_le();
        bits.truncate(F::MODULUS_BIT_SIZE as usize);
        bits
    }

    fn to_biguint(&self) -> BigUint {
        BigUint::from_bytes_le(&self.into_bigint().to_bytes_le())
    }

    fn to_hex(&self) -> String {
        let mut bytes = vec![];
        // Writing into a Vec cannot fail
        if self.serialize_compressed(&mut bytes).is_err() {
            return String::new();
        }
        hex::encode(bytes)
    }

    fn modulus_biguint() -> BigUint {
        BigUint::from_bytes_le(&F::MODULUS.to_bytes_le())
    }

    fn two_pow(exp: u64) -> F {
        F::from(2u64).pow([exp])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bn254::Fr;
    use ark_ff::{One, UniformRand, Zero};
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn bits_of_small_values() {
        let bits = Fr::from(19u64).to_bits();
        assert_eq!(bits.len(), Fr::MODULUS_BIT_SIZE as usize);
        assert_eq!(&bits[..6], &[true, true, false, false, true, false]);
        assert!(bits[6..].iter().all(|b| !b));
    }

    #[test]
    fn bits_roundtrip() {
        let rng = &mut StdRng::from_seed([7u8; 32]);
        for _ in 0..16 {
            let x = Fr::rand(rng);
            assert_eq!(Fr::from_bits(&x.to_bits()), Ok(x));
        }
        assert_eq!(Fr::from_bits(&[]), Ok(Fr::zero()));
    }

    #[test]
    fn too_many_bits() {
        let bits = vec![false; Fr::MODULUS_BIT_SIZE as usize + 1];
        assert_eq!(
            Fr::from_bits(&bits),
            Err(FieldHelpersError::TooManyBits(
                bits.len(),
                Fr::MODULUS_BIT_SIZE
            ))
        );
    }

    #[test]
    fn biguint_conversions() {
        let x = Fr::from(0xdead_beefu64);
        assert_eq!(x.to_biguint(), BigUint::from(0xdead_beefu64));
        assert_eq!(Fr::from_biguint(&BigUint::from(0xdead_beefu64)), Ok(x));

        let modulus = Fr::modulus_biguint();
        assert_eq!(Fr::from_biguint(&modulus), Err(FieldHelpersError::NotCanonical));
        let minus_one = modulus - BigUint::from(1u8);
        assert_eq!(Fr::from_biguint(&minus_one), Ok(-Fr::one()));
    }

    #[test]
    fn hex_roundtrip() {
        let x = Fr::from(123456789u64);
        assert_eq!(Fr::from_hex(&x.to_hex()), Ok(x));
        assert_eq!(Fr::from_hex("zz"), Err(FieldHelpersError::DecodeHex));
        assert_eq!(Fr::from_hex("00"), Err(FieldHelpersError::DeserializeBytes));
    }

    #[test]
    fn powers_of_two() {
        assert_eq!(Fr::two_pow(0), Fr::one());
        assert_eq!(Fr::two_pow(6), Fr::from(64u64));
    }
}
