// -*- mode: rust; -*-
//
// This file is part of cosi.
// Copyright (c) 2019 Web 3 Foundation
// See LICENSE for licensing information.
//
// Authors:
// - Jeffrey Burdges <jeff@web3.foundation>

//! Ed25519 key material as used in collective signing.
//!
//! Collective signing uses exactly the same keys as basic ed25519 does,
//! so keypairs produced by any conforming ed25519 implementation work
//! here, and keys produced here work with any conforming ed25519
//! implementation.  We deliberately keep `PublicKey` a thin wire type:
//! curve membership is only checked where a key is actually decoded
//! into a point, namely when building a `Cosigners` set.

use core::fmt::Debug;

use rand::{CryptoRng, RngCore};

#[cfg(feature = "serde")]
use serde::{Serialize, Deserialize};
#[cfg(feature = "serde")]
use serde::{Serializer, Deserializer};
#[cfg(feature = "serde")]
use serde::de::Error as SerdeError;
#[cfg(feature = "serde")]
use serde::de::Visitor;

use sha2::{Digest, Sha512};

use clear_on_drop::clear::Clear;

use curve25519_dalek::constants;
use curve25519_dalek::edwards::CompressedEdwardsY;
use curve25519_dalek::scalar::Scalar;

use subtle::{Choice, ConstantTimeEq};

use crate::errors::{SignatureError, SignatureResult};


/// The length of an ed25519 `PublicKey`, in bytes.
pub const PUBLIC_KEY_LENGTH: usize = 32;

/// The length of the seed portion of an ed25519 `PrivateKey`, in bytes.
const PRIVATE_KEY_SEED_LENGTH: usize = 32;

/// The length of an ed25519 `PrivateKey`, in bytes.
pub const PRIVATE_KEY_LENGTH: usize = PRIVATE_KEY_SEED_LENGTH + PUBLIC_KEY_LENGTH;


/// An ed25519 public key identifying one cosigner, or an aggregate of
/// several cosigners.
///
/// Internally this is only the canonical 32-byte compressed Edwards
/// encoding.  Decoding to a curve point, with its curve-membership
/// check, happens in [`crate::cosigners::Cosigners::new`].
#[derive(Clone, Copy, Eq, PartialEq)]
pub struct PublicKey(pub(crate) CompressedEdwardsY);

impl Debug for PublicKey {
    fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
        write!(f, "PublicKey( {:?} )", self.0)
    }
}

impl AsRef<[u8]> for PublicKey {
    fn as_ref(&self) -> &[u8] {
        &(self.0).0
    }
}

impl PublicKey {
    const DISCRIPTION : &'static str = "An ed25519 public key as 32 bytes, as specified in RFC8032.";

    /// Convert this public key to a byte array.
    #[inline]
    pub fn to_bytes(&self) -> [u8; PUBLIC_KEY_LENGTH] {
        self.0.to_bytes()
    }

    /// View this public key as a byte array.
    #[inline]
    pub fn as_bytes<'a>(&'a self) -> &'a [u8; PUBLIC_KEY_LENGTH] {
        &(self.0).0
    }

    /// Construct a `PublicKey` from a slice of bytes.
    ///
    /// Only the length is checked here; an off-curve encoding surfaces
    /// as [`SignatureError::PointDecompressionError`] when the key is
    /// handed to `Cosigners::new`.
    ///
    /// # Example
    ///
    /// ```
    /// use cosi::PublicKey;
    /// use cosi::PUBLIC_KEY_LENGTH;
    /// use cosi::SignatureError;
    ///
    /// # fn doctest() -> Result<PublicKey, SignatureError> {
    /// let public_key_bytes: [u8; PUBLIC_KEY_LENGTH] = [
    ///    215,  90, 152,   1, 130, 177,  10, 183,
    ///    213,  75, 254, 211, 201, 100,   7,  58,
    ///     14, 225, 114, 243, 218, 166,  35,  37,
    ///    175,   2,  26, 104, 247,   7,  81,  26, ];
    ///
    /// let public_key: PublicKey = PublicKey::from_bytes(&public_key_bytes)?;
    /// #
    /// # Ok(public_key)
    /// # }
    /// #
    /// # fn main() {
    /// #     assert!(doctest().is_ok());
    /// # }
    /// ```
    #[inline]
    pub fn from_bytes(bytes: &[u8]) -> SignatureResult<PublicKey> {
        if bytes.len() != PUBLIC_KEY_LENGTH {
            return Err(SignatureError::BytesLengthError {
                name: "PublicKey",
                description: PublicKey::DISCRIPTION,
                length: PUBLIC_KEY_LENGTH,
            });
        }
        let mut bits: [u8; 32] = [0u8; 32];
        bits.copy_from_slice(&bytes[..32]);
        Ok(PublicKey(CompressedEdwardsY(bits)))
    }
}

serde_boilerplate!(PublicKey);


/// An ed25519 private key belonging to one cosigner.
///
/// This is the standard 64-byte ed25519 private-key representation:
/// a random 32-byte seed whose SHA-512 digest yields the actual secret
/// scalar, followed by the corresponding public key.  Only the seed is
/// secret, and only the seed is hashed during [`crate::sign::cosign`].
#[derive(Clone, Default)] // we derive Default in order to use the clear() method in Drop
pub struct PrivateKey {
    /// The random seed, hashed with SHA-512 to produce the secret scalar.
    pub(crate) seed: [u8; 32],
    /// The corresponding public key.
    pub(crate) public: [u8; 32],
}

impl Debug for PrivateKey {
    fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
        write!(f, "PrivateKey {{ seed: <erased>, public: {:?} }}", &self.public)
    }
}

/// Overwrite secret seed material with null bytes when it goes out of scope.
impl Drop for PrivateKey {
    fn drop(&mut self) {
        self.seed.clear();
    }
}

impl Eq for PrivateKey {}
impl PartialEq for PrivateKey {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).unwrap_u8() == 1u8
    }
}
impl ConstantTimeEq for PrivateKey {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.seed.ct_eq(&other.seed)
    }
}

impl PrivateKey {
    const DISCRIPTION : &'static str = "An ed25519 private key, as 64 bytes of seed followed by public key, as specified in RFC8032.";

    /// Generate an ed25519 `PrivateKey` from a `csprng`.
    ///
    /// # Example
    ///
    /// ```
    /// use rand::thread_rng;
    /// use cosi::{PrivateKey, PublicKey};
    ///
    /// let private_key: PrivateKey = PrivateKey::generate(&mut thread_rng());
    /// let public_key: PublicKey = private_key.public_key();
    /// ```
    pub fn generate<R>(csprng: &mut R) -> PrivateKey
    where R: CryptoRng + RngCore,
    {
        let mut seed = [0u8; 32];
        csprng.fill_bytes(&mut seed);
        let private_key = PrivateKey::from_seed(seed);
        seed.clear();
        private_key
    }

    /// Construct a `PrivateKey` from its 32-byte seed, computing the
    /// public half.
    pub fn from_seed(seed: [u8; 32]) -> PrivateKey {
        let mut scalar = PrivateKey::expand_seed(&seed);
        let public = (&scalar * &constants::ED25519_BASEPOINT_TABLE).compress().to_bytes();
        scalar.clear();
        PrivateKey { seed, public }
    }

    /// Derive the `PublicKey` corresponding to this `PrivateKey`.
    #[inline]
    pub fn public_key(&self) -> PublicKey {
        PublicKey(CompressedEdwardsY(self.public))
    }

    /// Convert this private key to its standard 64-byte representation,
    /// seed followed by public key.
    #[inline]
    pub fn to_bytes(&self) -> [u8; PRIVATE_KEY_LENGTH] {
        let mut bytes: [u8; PRIVATE_KEY_LENGTH] = [0u8; PRIVATE_KEY_LENGTH];
        bytes[..32].copy_from_slice(&self.seed);
        bytes[32..].copy_from_slice(&self.public);
        bytes
    }

    /// Construct a `PrivateKey` from a slice of bytes.
    ///
    /// The first 32 bytes are the seed and the last 32 bytes the public
    /// key; the public half is taken on trust, as standard ed25519
    /// implementations do.
    ///
    /// # Example
    ///
    /// ```
    /// use cosi::PrivateKey;
    /// use cosi::PRIVATE_KEY_LENGTH;
    /// use cosi::SignatureError;
    ///
    /// # fn doctest() -> Result<PrivateKey, SignatureError> {
    /// let private_key_bytes: [u8; PRIVATE_KEY_LENGTH] = [
    ///    157,  97, 177, 157, 239, 253,  90,  96,
    ///    186, 132,  74, 244, 146, 236,  44, 196,
    ///     68,  73, 197, 105, 123,  50, 105,  25,
    ///    112,  59, 172,   3,  28, 174, 127,  96,
    ///    215,  90, 152,   1, 130, 177,  10, 183,
    ///    213,  75, 254, 211, 201, 100,   7,  58,
    ///     14, 225, 114, 243, 218, 166,  35,  37,
    ///    175,   2,  26, 104, 247,   7,  81,  26, ];
    ///
    /// let private_key: PrivateKey = PrivateKey::from_bytes(&private_key_bytes)?;
    /// assert_eq!(&private_key.public_key().to_bytes()[..], &private_key_bytes[32..]);
    /// #
    /// # Ok(private_key)
    /// # }
    /// #
    /// # fn main() {
    /// #     assert!(doctest().is_ok());
    /// # }
    /// ```
    #[inline]
    pub fn from_bytes(bytes: &[u8]) -> SignatureResult<PrivateKey> {
        if bytes.len() != PRIVATE_KEY_LENGTH {
            return Err(SignatureError::BytesLengthError {
                name: "PrivateKey",
                description: PrivateKey::DISCRIPTION,
                length: PRIVATE_KEY_LENGTH,
            });
        }
        let mut seed: [u8; 32] = [0u8; 32];
        let mut public: [u8; 32] = [0u8; 32];
        seed.copy_from_slice(&bytes[..32]);
        public.copy_from_slice(&bytes[32..]);
        Ok(PrivateKey { seed, public })
    }

    /// The expanded secret scalar `a`: the clamped lower half of the
    /// SHA-512 digest of the seed.
    pub(crate) fn expanded_scalar(&self) -> Scalar {
        PrivateKey::expand_seed(&self.seed)
    }

    fn expand_seed(seed: &[u8; 32]) -> Scalar {
        let mut h = Sha512::new();
        h.input(&seed[..]);
        let digest = h.result();

        let mut key = [0u8; 32];
        key.copy_from_slice(&digest.as_slice()[..32]);
        key[0]  &= 248;
        key[31] &=  63;
        key[31] |=  64;
        let scalar = Scalar::from_bits(key);
        key.clear();
        scalar
    }
}

serde_boilerplate!(PrivateKey);


#[cfg(test)]
mod test {
    use rand::prelude::*;
    use rand_chacha::ChaChaRng;

    use super::*;

    #[test]
    fn rfc8032_seed_expands_to_known_public_key() {
        // Test vector 1 from RFC 8032 section 7.1.
        let seed = hex::decode("9d61b19deffd5a60ba844af492ec2cc44449c5697b326919703bac031cae7f60").unwrap();
        let public = hex::decode("d75a980182b10ab7d54bfed3c964073a0ee172f3daa62325af021a68f707511a").unwrap();

        let mut seed_bytes = [0u8; 32];
        seed_bytes.copy_from_slice(&seed);
        let private_key = PrivateKey::from_seed(seed_bytes);
        assert_eq!(&private_key.public_key().to_bytes()[..], &public[..]);
    }

    #[test]
    fn private_key_bytes_round_trip() {
        let mut csprng: ChaChaRng = ChaChaRng::from_seed([7u8; 32]);
        let private_key = PrivateKey::generate(&mut csprng);
        let bytes = private_key.to_bytes();
        let again = PrivateKey::from_bytes(&bytes[..]).unwrap();
        assert_eq!(private_key, again);
        assert_eq!(private_key.public_key(), again.public_key());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_round_trips_key_types() {
        let mut csprng: ChaChaRng = ChaChaRng::from_seed([8u8; 32]);
        let private_key = PrivateKey::generate(&mut csprng);
        let public_key = private_key.public_key();

        let encoded = bincode::serialize(&public_key).unwrap();
        let decoded: PublicKey = bincode::deserialize(&encoded).unwrap();
        assert_eq!(public_key, decoded);

        let encoded = bincode::serialize(&private_key).unwrap();
        let decoded: PrivateKey = bincode::deserialize(&encoded).unwrap();
        assert_eq!(private_key, decoded);
    }

    #[test]
    fn public_key_rejects_wrong_length() {
        assert!(PublicKey::from_bytes(&[0u8; 31]).is_err());
        assert!(PublicKey::from_bytes(&[0u8; 33]).is_err());
        assert!(PrivateKey::from_bytes(&[0u8; 63]).is_err());
    }
}
