//! Domain-separated digests of serde values.
//!
//! A type implementing [CryptoDigest] is hashed as
//! `SHA-256(PREFIX || messagepack(value))`. Two values with the same
//! serialization get the same digest, which is what makes the digest usable
//! as a structural fingerprint.
//!
//! Do not reuse a `PREFIX` for two different types.

use serde::Serialize;
use sha2::{Digest, Sha256};

pub trait CryptoDigest: Serialize {
    /// The domain separation string to use in the hash.
    const PREFIX: &'static [u8; 15];

    /// Returns the digest of `self`, or the encoding error if `self` cannot
    /// be written as messagepack.
    fn digest(&self) -> Result<[u8; 32], rmp_serde::encode::Error> {
        let encoded = rmp_serde::to_vec(self)?;
        let mut hasher = Sha256::new();
        hasher.update(Self::PREFIX);
        hasher.update(&encoded);
        Ok(hasher.finalize().into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Shape {
        rows: u8,
    }

    impl CryptoDigest for Shape {
        const PREFIX: &'static [u8; 15] = b"arith-test-shp0";
    }

    #[derive(Serialize)]
    struct OtherShape {
        rows: u8,
    }

    impl CryptoDigest for OtherShape {
        const PREFIX: &'static [u8; 15] = b"arith-test-shp1";
    }

    #[test]
    fn equal_values_equal_digests() {
        assert_eq!(
            Shape { rows: 1 }.digest().unwrap(),
            Shape { rows: 1 }.digest().unwrap()
        );
        assert_ne!(
            Shape { rows: 1 }.digest().unwrap(),
            Shape { rows: 2 }.digest().unwrap()
        );
    }

    #[test]
    fn prefix_separates_types() {
        assert_ne!(
            Shape { rows: 1 }.digest().unwrap(),
            OtherShape { rows: 1 }.digest().unwrap()
        );
    }
}
