// -*- mode: rust; -*-
//
// This file is part of cosi.
// Copyright (c) 2019 Web 3 Foundation
// See LICENSE for licensing information.
//
// Authors:
// - Jeffrey Burdges <jeff@web3.foundation>

//! Cosigner-side signing operations: one-time commits and signature parts.
//!
//! A cosigner participates in a signing round with exactly two calls.
//! First [`commit`] mints a fresh one-time commit, which travels to the
//! leader for aggregation.  Once the leader answers with the aggregate
//! commit and aggregate public key, [`cosign`] produces this cosigner's
//! share of the collective signature.  The [`Secret`] minted by
//! [`commit`] links the two calls and is destroyed by the second.

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

use clear_on_drop::clear::Clear;

use curve25519_dalek::constants;
use curve25519_dalek::scalar::Scalar;

use crate::errors::{SignatureError, SignatureResult};
use crate::keys::{PrivateKey, PublicKey};
use crate::scalars;


/// The length of a cosigner's one-time `Commitment`, in bytes.
pub const COMMITMENT_LENGTH: usize = 32;

/// The length of a cosigner's `SignaturePart`, in bytes.
pub const SIGNATURE_PART_LENGTH: usize = 32;


/// A cosigner's one-time Schnorr commit `R = [r]B`.
///
/// Produced by [`commit`] and sent to the leader for combination via
/// `Cosigners::aggregate_commit`.  On the wire this is a canonical
/// 32-byte Edwards point encoding; it is decoded, and thereby
/// validated, only during aggregation.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Commitment(
    /// The commit as a 32-byte Edwards point encoding.
    pub [u8; COMMITMENT_LENGTH],
);

impl Commitment {
    const DISCRIPTION : &'static str = "A cosigner's one-time commit as 32 bytes, a canonical Edwards point encoding.";

    /// Convert this commit to a byte array.
    #[inline]
    pub fn to_bytes(&self) -> [u8; COMMITMENT_LENGTH] {
        self.0
    }

    /// View this commit as a byte array.
    #[inline]
    pub fn as_bytes<'a>(&'a self) -> &'a [u8; COMMITMENT_LENGTH] {
        &self.0
    }

    /// Construct a `Commitment` from a slice of bytes.
    #[inline]
    pub fn from_bytes(bytes: &[u8]) -> SignatureResult<Commitment> {
        if bytes.len() != COMMITMENT_LENGTH {
            return Err(SignatureError::BytesLengthError {
                name: "Commitment",
                description: Commitment::DISCRIPTION,
                length: COMMITMENT_LENGTH,
            });
        }
        let mut bits: [u8; 32] = [0u8; 32];
        bits.copy_from_slice(&bytes[..32]);
        Ok(Commitment(bits))
    }
}

serde_boilerplate!(Commitment);


/// A cosigner's share `s_i = H(R̄ ‖ Ā ‖ M)·a_i + r_i mod ℓ` of a
/// collective signature.
///
/// Produced by [`cosign`] and sent to the leader for combination via
/// `Cosigners::aggregate_signature`.  On the wire this is a canonical
/// 32-byte scalar encoding with the top three bits zero.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct SignaturePart(
    /// The share as a 32-byte canonical scalar encoding.
    pub [u8; SIGNATURE_PART_LENGTH],
);

impl SignaturePart {
    const DISCRIPTION : &'static str = "A cosigner's signature part as 32 bytes, a canonical scalar encoding.";

    /// Convert this signature part to a byte array.
    #[inline]
    pub fn to_bytes(&self) -> [u8; SIGNATURE_PART_LENGTH] {
        self.0
    }

    /// View this signature part as a byte array.
    #[inline]
    pub fn as_bytes<'a>(&'a self) -> &'a [u8; SIGNATURE_PART_LENGTH] {
        &self.0
    }

    /// Construct a `SignaturePart` from a slice of bytes.
    ///
    /// Rejects encodings with any of the top three bits set, so a part
    /// accepted here is always a scalar a leader can aggregate.
    #[inline]
    pub fn from_bytes(bytes: &[u8]) -> SignatureResult<SignaturePart> {
        if bytes.len() != SIGNATURE_PART_LENGTH {
            return Err(SignatureError::BytesLengthError {
                name: "SignaturePart",
                description: SignaturePart::DISCRIPTION,
                length: SIGNATURE_PART_LENGTH,
            });
        }
        let mut bits: [u8; 32] = [0u8; 32];
        bits.copy_from_slice(&bytes[..32]);
        scalars::check_scalar(bits)?;
        Ok(SignaturePart(bits))
    }
}

serde_boilerplate!(SignaturePart);


/// A one-time random secret used in collectively signing a single message.
///
/// Minted by [`commit`] and consumed by exactly one call to [`cosign`],
/// which zeroes the scalar before returning.  Reusing a `Secret` across
/// two challenges would let anyone recover the cosigner's long-term
/// secret key, so a second `cosign` call on the same `Secret` panics.
#[derive(Default)] // we derive Default in order to use the clear() method in Drop
pub struct Secret {
    /// The one-time scalar `r`, already reduced mod ℓ.
    pub(crate) reduced: Scalar,
    /// Cleared by `cosign` the moment the scalar has been used.
    pub(crate) valid: bool,
}

impl Debug for Secret {
    fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
        write!(f, "Secret {{ valid: {:?} }}", self.valid)
    }
}

/// Overwrite the one-time scalar with null bytes when it goes out of scope.
impl Drop for Secret {
    fn drop(&mut self) {
        self.reduced.clear();
        self.valid = false;
    }
}


/// Produce a one-time commit for the collective signing of a single message.
///
/// Draws 64 bytes from `csprng`, reduces them mod ℓ to the one-time
/// scalar `r`, and returns the encoded commit `R = [r]B` together with
/// the [`Secret`] holding `r`.  The commit travels to the leader; the
/// secret stays with the cosigner for the matching [`cosign`] call.
///
/// Fails only if the random number generator does.
///
/// # Example
///
/// ```
/// use rand::thread_rng;
///
/// let (commitment, secret) = cosi::commit(&mut thread_rng()).unwrap();
/// ```
pub fn commit<R>(csprng: &mut R) -> SignatureResult<(Commitment, Secret)>
where R: CryptoRng + RngCore,
{
    let mut secret_full = [0u8; 64];
    csprng.try_fill_bytes(&mut secret_full).map_err(|_| SignatureError::RngError)?;

    let reduced = Scalar::from_bytes_mod_order_wide(&secret_full);
    Clear::clear(&mut secret_full[..]);

    let commitment = Commitment((&reduced * &constants::ED25519_BASEPOINT_TABLE).compress().to_bytes());
    Ok((commitment, Secret { reduced, valid: true }))
}

/// Produce one cosigner's part of a collective signature.
///
/// This is the only operation that touches the cosigner's private key.
/// It requires the per-message [`Secret`] minted by the matching
/// [`commit`] call, plus the aggregate public key and aggregate commit
/// the leader obtained from `Cosigners::aggregate_public_key` and
/// `Cosigners::aggregate_commit` for this round.
///
/// The challenge hashes the aggregate values rather than this
/// cosigner's own key and commit, so the sum of all parts forms a
/// signature verifiable against the aggregate public key alone.  Both
/// aggregates are hashed as the 32-byte wire values received from the
/// leader, without decoding them.
///
/// # Panics
///
/// Panics if `secret` was already consumed by an earlier `cosign` call.
/// A `Secret` must be used exactly once: it is zeroed and invalidated
/// before this function returns.
pub fn cosign(
    private_key: &PrivateKey,
    secret: &mut Secret,
    message: &[u8],
    aggregate_key: &PublicKey,
    aggregate_commit: &Commitment,
) -> SignaturePart {
    if !secret.valid {
        panic!("a one-time cosigning Secret may only be used once");
    }

    let mut expanded = private_key.expanded_scalar();
    let h = scalars::compute_challenge(aggregate_commit.as_bytes(), aggregate_key.as_bytes(), message);
    let s = &(&h * &expanded) + &secret.reduced;
    expanded.clear();

    // Erase the one-time secret now, so a buggy caller invoking cosign
    // twice after a single commit cannot leak the private key.
    secret.reduced.clear();
    secret.valid = false;

    SignaturePart(s.to_bytes())
}
