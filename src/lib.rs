// -*- mode: rust; -*-
//
// This file is part of cosi.
// Copyright (c) 2019 Web 3 Foundation
// See LICENSE for licensing information.
//
// Authors:
// - Jeffrey Burdges <jeff@web3.foundation>

//! Collective Ed25519 signatures.
//!
//! A collective signature lets any number of participants sign one
//! message together, producing a single compact signature verifiable
//! almost as quickly as an individual ed25519 signature.  Despite its
//! compactness, the signature records exactly which subset of the group
//! signed: it carries a short bitmask, one bit per cosigner, which is
//! cryptographically bound into the signature itself.  Flipping a mask
//! bit to pretend an absent participant signed, or to disown a present
//! one, renders the signature invalid.
//!
//! This crate implements the cryptographic operations for creating and
//! verifying such signatures over the ed25519 curve.  It does not speak
//! any network protocol: moving commits and signature parts between the
//! participants, deciding who leads a signing round, and detecting
//! unresponsive cosigners all belong to the caller.
//!
//! # Keys
//!
//! Collective signing uses ordinary ed25519 keypairs.  A group is
//! described by an ordered list of its members' public keys, wrapped in
//! a [`Cosigners`] object; the order is arbitrary but must be identical
//! for signing and verification.  One caution specific to collective
//! signing: when the group's keys come from mutually distrustful
//! parties, each member must prove knowledge of its private key, e.g.
//! by self-signing its public key, before being admitted.  Otherwise a
//! malicious member could register a related key and later forge
//! signatures that appear to involve honest members.  This crate
//! assumes that discipline has been applied upstream.
//!
//! # Verifying
//!
//! Verification needs no interaction.  Build a [`Cosigners`] from the
//! group's public-key list and call [`Cosigners::verify`].  Besides
//! checking the signature cryptographically against the aggregate of
//! the participating members' keys, `verify` consults a [`Policy`]
//! deciding whether the participant set itself is acceptable.  The
//! default policy demands that everyone signed; [`ThresholdPolicy`]
//! accepts any sufficiently large subset, and anything implementing
//! [`Policy`], closures included, can express richer rules.  After
//! `verify` returns, the object's mask reports exactly who signed.
//!
//! # Signing
//!
//! Producing a collective signature takes one leader, which needs no
//! private key, and the participating cosigners:
//!
//! 1. The leader sends the message to the cosigners.
//! 2. Each willing cosigner answers with a one-time commit from
//!    [`commit`], keeping the returned [`Secret`] for step 4.
//! 3. The leader disables the mask bits of absent cosigners, then
//!    distributes [`Cosigners::aggregate_commit`] and
//!    [`Cosigners::aggregate_public_key`] to the group.
//! 4. Each cosigner produces its share of the signature with
//!    [`cosign`], consuming its `Secret`.
//! 5. The leader checks each share with [`Cosigners::verify_part`]
//!    and combines them via [`Cosigners::aggregate_signature`].
//!
//! The participation mask must not change between steps 3 and 5; if a
//! cosigner drops out after committing, the leader restarts the round
//! with fresh commits and a corrected mask.
//!
//! ```
//! use rand::thread_rng;
//! use cosi::{commit, cosign, Cosigners, PrivateKey, ThresholdPolicy};
//!
//! let mut csprng = thread_rng();
//! let keypairs: Vec<PrivateKey> = (0..3).map(|_| PrivateKey::generate(&mut csprng)).collect();
//! let publics: Vec<_> = keypairs.iter().map(|k| k.public_key()).collect();
//! let message = b"The truth is inconvertible";
//!
//! // Each cosigner mints a one-time commit for this round.
//! let mut secrets = Vec::new();
//! let mut commits = Vec::new();
//! for _ in 0..3 {
//!     let (commitment, secret) = commit(&mut csprng).unwrap();
//!     commits.push(commitment);
//!     secrets.push(secret);
//! }
//!
//! // The leader combines the commits and the enabled public keys.
//! let leader = Cosigners::new(&publics).unwrap();
//! let aggregate_commit = leader.aggregate_commit(&commits).unwrap();
//! let aggregate_key = leader.aggregate_public_key();
//!
//! // Each cosigner contributes its share of the signature.
//! let parts: Vec<_> = keypairs.iter().zip(secrets.iter_mut())
//!     .map(|(keypair, secret)| {
//!         cosign(keypair, secret, message, &aggregate_key, &aggregate_commit)
//!     })
//!     .collect();
//!
//! // The leader assembles the collective signature.
//! let signature = leader.aggregate_signature(&aggregate_commit, &parts);
//!
//! // Anyone holding the same public-key list can verify it, under the
//! // policy of their choosing.
//! let mut verifier = Cosigners::new(&publics).unwrap();
//! assert!(verifier.verify(message, &signature));
//! verifier.set_policy(Box::new(ThresholdPolicy::new(2)));
//! assert!(verifier.verify(message, &signature));
//! ```
//!
//! # Efficiency
//!
//! A `Cosigners` object caches the aggregate public key matching its
//! current participation mask.  Signing and verification are therefore
//! cheapest when one object is reused across rounds whose masks drift
//! little: each changed mask bit costs one curve addition, far below
//! the fixed scalar-multiplication cost of the signature check itself.

#![no_std]
#![allow(unused_features)]
#![deny(missing_docs)] // refuse to compile if documentation is missing

extern crate curve25519_dalek;
extern crate sha2;

extern crate rand;
extern crate clear_on_drop;
extern crate subtle;

#[cfg(feature = "failure")]
extern crate failure;

#[cfg(feature = "serde")]
extern crate serde;

#[cfg(all(feature = "alloc", not(feature = "std")))]
extern crate alloc;

#[cfg(any(feature = "std", test))]
#[macro_use]
extern crate std;

#[cfg(test)]
extern crate hex;

#[cfg(test)]
extern crate rand_chacha;

macro_rules! serde_boilerplate { ($t:ty) => {
    #[cfg(feature = "serde")]
    impl Serialize for $t {
        fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error> where S: Serializer {
            serializer.serialize_bytes(&self.to_bytes()[..])
        }
    }

    #[cfg(feature = "serde")]
    impl<'d> Deserialize<'d> for $t {
        fn deserialize<D>(deserializer: D) -> Result<Self, D::Error> where D: Deserializer<'d> {
            struct BytesVisitor;

            impl<'d> Visitor<'d> for BytesVisitor {
                type Value = $t;

                fn expecting(&self, formatter: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                    formatter.write_str(<$t>::DISCRIPTION)
                }

                fn visit_bytes<E>(self, bytes: &[u8]) -> Result<$t, E> where E: SerdeError {
                    <$t>::from_bytes(bytes).map_err(crate::errors::serde_error_from_signature_error)
                }
            }
            deserializer.deserialize_bytes(BytesVisitor)
        }
    }
} }

pub mod errors;
pub mod keys;
mod scalars;
pub mod sign;

#[cfg(any(feature = "std", feature = "alloc"))]
pub mod policy;
#[cfg(any(feature = "std", feature = "alloc"))]
pub mod cosigners;

pub use crate::errors::{SignatureError, SignatureResult};
pub use crate::keys::{PrivateKey, PublicKey, PRIVATE_KEY_LENGTH, PUBLIC_KEY_LENGTH};
pub use crate::sign::{commit, cosign, Commitment, Secret, SignaturePart};
pub use crate::sign::{COMMITMENT_LENGTH, SIGNATURE_PART_LENGTH};

#[cfg(any(feature = "std", feature = "alloc"))]
pub use crate::policy::{FullPolicy, Policy, ThresholdPolicy};
#[cfg(any(feature = "std", feature = "alloc"))]
pub use crate::cosigners::{Cosigners, MaskBit, SIGNATURE_LENGTH};
