// -*- mode: rust; -*-
//
// This file is part of cosi.
// Copyright (c) 2019 Web 3 Foundation
// See LICENSE for licensing information.
//
// Authors:
// - Jeffrey Burdges <jeff@web3.foundation>

//! The leader's and verifier's view of a cosigning group.
//!
//! A [`Cosigners`] object represents a group of collective signers
//! identified by an immutable, ordered list of their ed25519 public
//! keys, together with a mutable participation bitmask over that list
//! and a [`Policy`] deciding which participant sets a verifier accepts.
//!
//! The object caches the aggregate of the enabled cosigners' public
//! keys.  Every mask mutation keeps the cache in sync, which makes
//! repeated signing rounds and verifications over the same, or a
//! similar, participation mask cheap: only the cosigners whose bit
//! actually changed cost a curve operation.

use core::fmt::Debug;

#[cfg(all(feature = "alloc", not(feature = "std")))]
use alloc::{boxed::Box, vec::Vec};
#[cfg(feature = "std")]
use std::{boxed::Box, vec::Vec};

use curve25519_dalek::edwards::{CompressedEdwardsY, EdwardsPoint};
use curve25519_dalek::scalar::Scalar;
use curve25519_dalek::traits::Identity;

use subtle::ConstantTimeEq;

use crate::errors::{SignatureError, SignatureResult};
use crate::keys::PublicKey;
use crate::policy::{FullPolicy, Policy};
use crate::scalars;
use crate::sign::{Commitment, SignaturePart};


/// The length of a collective signature excluding its participation
/// bitmask, in bytes: the aggregate commit followed by the aggregate
/// scalar.  A complete collective signature over `n` cosigners is
/// `SIGNATURE_LENGTH + (n + 7) / 8` bytes.
pub const SIGNATURE_LENGTH: usize = 64;


/// One bit of a participation bitmask, indicating whether a given
/// cosigner is enabled or disabled.
///
/// On the wire a *set* bit marks a cosigner as `Disabled`, i.e. absent,
/// and a clear bit as `Enabled`.  This polarity is inverted from many
/// other multisignature schemes and is preserved exactly, since a short
/// or missing mask must conservatively mean everyone signed.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum MaskBit {
    /// The cosigner participates in the signature.
    Enabled,
    /// The cosigner is absent from the signature.
    Disabled,
}


/// A group of collective signers.
///
/// The public-key list is fixed at construction and decoded once; the
/// participation bitmask and the policy may change freely afterwards.
/// Verifiers must build their `Cosigners` from a public-key list
/// identical, including order, to the one used during signing.
///
/// A `Cosigners` object contains mutable state and implements no
/// internal synchronization, so a given instance must be used by only
/// one thread at a time.  Distinct instances over the same key list
/// are independent.
pub struct Cosigners {
    /// All cosigners' public keys, decoded.  Immutable after `new`.
    keys: Vec<EdwardsPoint>,

    /// Byte-packed little-endian bit-vector of *disabled* cosigners,
    /// always exactly ⌈n/8⌉ bytes with the trailing bits clear.
    mask: Vec<u8>,

    /// Cached aggregate of all enabled cosigners' public keys.
    aggr: EdwardsPoint,

    /// Cosigner-presence policy consulted by `verify`.
    policy: Box<dyn Policy>,
}

impl Debug for Cosigners {
    fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
        write!(f, "Cosigners {{ total: {:?}, mask: {:?} }}", self.keys.len(), &self.mask[..])
    }
}

impl Cosigners {
    /// Create a `Cosigners` object for the given list of cosigner
    /// public keys.
    ///
    /// Every key is decoded here; construction fails with
    /// [`SignatureError::PointDecompressionError`] if any encoding is
    /// not a curve point.  Beyond the decoder's own on-curve check no
    /// further vetting happens: in particular low-order keys pass, as
    /// the surrounding ecosystem requires each key to be self-signed
    /// before admission to a cosigning group anyway.
    ///
    /// The new object starts with every cosigner enabled and the
    /// conservative [`FullPolicy`] installed.
    pub fn new(public_keys: &[PublicKey]) -> SignatureResult<Cosigners> {
        let mut keys: Vec<EdwardsPoint> = Vec::with_capacity(public_keys.len());
        for public_key in public_keys {
            let point = public_key.0.decompress()
                .ok_or(SignatureError::PointDecompressionError) ?;
            keys.push(point);
        }
        let mut cosigners = Cosigners {
            keys,
            mask: Vec::new(),
            aggr: EdwardsPoint::identity(),
            policy: Box::new(FullPolicy),
        };
        cosigners.set_mask(&[]);
        Ok(cosigners)
    }

    /// The total number of cosigners, i.e. the length of the public-key
    /// list supplied to [`Cosigners::new`].
    pub fn count_total(&self) -> usize {
        self.keys.len()
    }

    /// The number of cosigners currently marked enabled, between 0 and
    /// `count_total` inclusive.
    pub fn count_enabled(&self) -> usize {
        (0..self.keys.len())
            .filter(|&i| self.mask_bit(i) == MaskBit::Enabled)
            .count()
    }

    /// The length in bytes of a complete participation bitmask for this
    /// cosigner list.
    pub fn mask_len(&self) -> usize {
        (self.keys.len() + 7) >> 3
    }

    /// The current participation bitmask as a byte-packed little-endian
    /// bit-vector of `mask_len` bytes, set bits marking disabled
    /// cosigners.
    pub fn mask(&self) -> Vec<u8> {
        self.mask.clone()
    }

    /// Whether the indicated cosigner is currently enabled or disabled.
    ///
    /// # Panics
    ///
    /// Panics if `signer` is not below `count_total`.
    pub fn mask_bit(&self, signer: usize) -> MaskBit {
        assert!(signer < self.keys.len(), "cosigner index out of range");
        if self.mask[signer >> 3] & (1 << (signer & 7)) != 0 {
            MaskBit::Disabled
        } else {
            MaskBit::Enabled
        }
    }

    /// Set the entire participation bitmask from a byte-packed
    /// little-endian bit-vector: bit `j` of byte `k` corresponds to
    /// cosigner `8k + j`, and a set bit disables the cosigner.
    ///
    /// If `mask` is shorter than `mask_len` bytes, the missing bits are
    /// conservatively taken as clear, i.e. enabled.  Bits at indices
    /// beyond the cosigner list are ignored.
    ///
    /// This rebuilds the cached aggregate public key from scratch, one
    /// point addition per enabled cosigner.  For small changes to a
    /// large group prefer [`Cosigners::set_mask_bit`].
    pub fn set_mask(&mut self, mask: &[u8]) {
        self.mask.clear();
        self.mask.resize((self.keys.len() + 7) >> 3, 0);
        self.aggr = EdwardsPoint::identity();
        for i in 0..self.keys.len() {
            if (i >> 3) < mask.len() && mask[i >> 3] & (1 << (i & 7)) != 0 {
                self.mask[i >> 3] |= 1 << (i & 7);      // disable
            } else {
                self.aggr += self.keys[i];              // enable
            }
        }
    }

    /// Enable or disable the mask bit for an individual cosigner,
    /// updating the cached aggregate public key incrementally with at
    /// most one curve operation.
    ///
    /// # Panics
    ///
    /// Panics if `signer` is not below `count_total`.
    pub fn set_mask_bit(&mut self, signer: usize, bit: MaskBit) {
        assert!(signer < self.keys.len(), "cosigner index out of range");
        let byte = signer >> 3;
        let mask = 1 << (signer & 7);
        match bit {
            MaskBit::Disabled => {
                if self.mask[byte] & mask == 0 {        // was enabled
                    self.mask[byte] |= mask;
                    self.aggr -= self.keys[signer];
                }
            },
            MaskBit::Enabled => {
                if self.mask[byte] & mask != 0 {        // was disabled
                    self.mask[byte] &= !mask;
                    self.aggr += self.keys[signer];
                }
            },
        }
    }

    /// The aggregate public key for the cosigners currently enabled in
    /// the participation bitmask.
    ///
    /// The leader distributes this to the cosigners for their `cosign`
    /// calls.  Reads the cache; never recomputes.
    pub fn aggregate_public_key(&self) -> PublicKey {
        PublicKey(self.aggr.compress())
    }

    /// Combine the enabled cosigners' individual commits into the
    /// aggregate commit for this round, which the leader passes back to
    /// every cosigner and later to [`Cosigners::aggregate_signature`].
    ///
    /// `commitments` must carry one entry per cosigner; the entries of
    /// disabled cosigners are ignored without inspection.  Fails with
    /// [`SignatureError::PointDecompressionError`] if any enabled
    /// commit is not a curve point, in which case the round cannot
    /// proceed.
    ///
    /// # Panics
    ///
    /// Panics if `commitments` does not have exactly one entry per
    /// cosigner.
    pub fn aggregate_commit(&self, commitments: &[Commitment]) -> SignatureResult<Commitment> {
        assert_eq!(commitments.len(), self.keys.len(),
                   "one commitment slot per cosigner required");

        let mut aggregate = EdwardsPoint::identity();
        for i in 0..self.keys.len() {
            if self.mask_bit(i) == MaskBit::Disabled {
                continue;
            }
            let point = CompressedEdwardsY(commitments[i].0).decompress()
                .ok_or(SignatureError::PointDecompressionError) ?;
            aggregate += point;
        }
        Ok(Commitment(aggregate.compress().to_bytes()))
    }

    /// Combine the enabled cosigners' signature parts into a complete
    /// collective signature `R̄ ‖ s̄ ‖ mask`.
    ///
    /// `aggregate_commit` must be the exact value returned by
    /// [`Cosigners::aggregate_commit`] for this round, and the
    /// participation bitmask must not have changed in between; the mask
    /// is embedded in the returned signature.  `parts` must carry one
    /// entry per cosigner, and the entries of disabled cosigners are
    /// ignored without inspection.
    ///
    /// # Panics
    ///
    /// Panics if `parts` does not have exactly one entry per cosigner.
    pub fn aggregate_signature(&self, aggregate_commit: &Commitment, parts: &[SignaturePart]) -> Vec<u8> {
        assert_eq!(parts.len(), self.keys.len(),
                   "one signature-part slot per cosigner required");

        let mut aggregate = Scalar::zero();
        for i in 0..self.keys.len() {
            if self.mask_bit(i) == MaskBit::Disabled {
                continue;
            }
            aggregate += Scalar::from_bytes_mod_order(parts[i].0);
        }

        let mut signature = Vec::with_capacity(SIGNATURE_LENGTH + self.mask.len());
        signature.extend_from_slice(aggregate_commit.as_bytes());
        signature.extend_from_slice(aggregate.as_bytes());
        signature.extend_from_slice(&self.mask);
        signature
    }

    /// Check an individual cosigner's signature part against its
    /// individual commit, before folding it into the collective
    /// signature.
    ///
    /// A false return identifies a buggy or malicious cosigner.  The
    /// leader cannot finish the current round in that case, but can
    /// restart the signing process, with fresh commits, after disabling
    /// the cosigner responsible.
    ///
    /// # Panics
    ///
    /// Panics if `signer` is not below `count_total`.
    pub fn verify_part(
        &self,
        message: &[u8],
        aggregate_commit: &Commitment,
        signer: usize,
        commitment: &Commitment,
        part: &SignaturePart,
    ) -> bool {
        assert!(signer < self.keys.len(), "cosigner index out of range");
        let key = self.keys[signer];
        self.verify_with_key(message, aggregate_commit.as_bytes(), commitment.as_bytes(), part.as_bytes(), &key)
    }

    /// Verify a collective signature on `message`.
    ///
    /// The signature must be exactly `SIGNATURE_LENGTH + mask_len`
    /// bytes.  Its trailing bitmask is written into this object's
    /// participation mask *before* the policy runs, so the installed
    /// [`Policy`] sees exactly which cosigners produced this signature.
    /// The caller can inspect the same information afterwards through
    /// [`Cosigners::mask`] or [`Cosigners::mask_bit`].
    ///
    /// Returns false on a malformed length, on a mask with bits set
    /// beyond the cosigner list, on policy rejection, or on failure of
    /// the Schnorr equation against the aggregate public key of the
    /// cosigners the signature claims participated.
    pub fn verify(&mut self, message: &[u8], signature: &[u8]) -> bool {
        if signature.len() != SIGNATURE_LENGTH + self.mask_len() {
            return false;
        }

        // Adopt the participation recorded in the signature.
        self.set_mask(&signature[SIGNATURE_LENGTH..]);

        // The embedded mask must be canonical: bits past the cosigner
        // list carry no meaning and a flipped one must not verify.
        if self.mask[..] != signature[SIGNATURE_LENGTH..] {
            return false;
        }

        // A sufficient set of signers?
        if !self.policy.check(self) {
            return false;
        }

        let mut sig_r = [0u8; 32];
        let mut sig_s = [0u8; 32];
        sig_r.copy_from_slice(&signature[..32]);
        sig_s.copy_from_slice(&signature[32..64]);
        let aggr = self.aggr;
        self.verify_with_key(message, &sig_r, &sig_r, &sig_s, &aggr)
    }

    /// Replace the policy consulted by [`Cosigners::verify`].
    ///
    /// Every new `Cosigners` object starts with the conservative
    /// [`FullPolicy`].  Standard T-of-N threshold checking is available
    /// through [`crate::policy::ThresholdPolicy`]; arbitrary custom
    /// rules through any [`Policy`] implementation, closures included.
    pub fn set_policy(&mut self, policy: Box<dyn Policy>) {
        self.policy = policy;
    }

    /// The shared Schnorr check: does `[s]B` equal `R + [H(R̄‖Ā‖M)]·key`?
    ///
    /// The challenge always hashes the *aggregate* commit and the
    /// *aggregate* public key, while `R` and `key` are either the
    /// aggregates themselves (full verification) or one cosigner's
    /// commit and public key (part verification).
    fn verify_with_key(
        &self,
        message: &[u8],
        aggregate_commit: &[u8; 32],
        sig_r: &[u8; 32],
        sig_s: &[u8; 32],
        key: &EdwardsPoint,
    ) -> bool {
        let s = match scalars::check_scalar(*sig_s) {
            Ok(s) => s,
            Err(_) => return false,
        };

        let aggregate_key = self.aggr.compress();
        let h = scalars::compute_challenge(aggregate_commit, aggregate_key.as_bytes(), message);

        // Negate a copy of the key; the cache must survive verification.
        let minus_key = -key;
        let r = EdwardsPoint::vartime_double_scalar_mul_basepoint(&h, &minus_key, &s);

        r.compress().as_bytes()[..].ct_eq(&sig_r[..]).unwrap_u8() == 1
    }
}


#[cfg(test)]
mod test {
    use std::boxed::Box;
    use std::vec::Vec;

    use rand::prelude::*;
    use rand_chacha::ChaChaRng;
    use sha2::{Digest, Sha512};

    use super::*;
    use crate::keys::PrivateKey;
    use crate::policy::ThresholdPolicy;
    use crate::sign::{commit, cosign};

    fn keypairs(n: usize, seed: u8) -> (Vec<PrivateKey>, Vec<PublicKey>) {
        let mut csprng: ChaChaRng = ChaChaRng::from_seed([seed; 32]);
        let privates: Vec<PrivateKey> = (0..n).map(|_| PrivateKey::generate(&mut csprng)).collect();
        let publics: Vec<PublicKey> = privates.iter().map(|k| k.public_key()).collect();
        (privates, publics)
    }

    /// One complete leader-driven round over the currently enabled
    /// cosigners, returning the collective signature.
    fn sign_round(
        cosigners: &Cosigners,
        privates: &[PrivateKey],
        message: &[u8],
        csprng: &mut ChaChaRng,
    ) -> Vec<u8> {
        let n = cosigners.count_total();

        let mut commitments: Vec<Commitment> = Vec::with_capacity(n);
        let mut secrets = Vec::with_capacity(n);
        for i in 0..n {
            if cosigners.mask_bit(i) == MaskBit::Enabled {
                let (commitment, secret) = commit(csprng).unwrap();
                commitments.push(commitment);
                secrets.push(Some(secret));
            } else {
                commitments.push(Commitment([0u8; 32]));
                secrets.push(None);
            }
        }

        let aggregate_commit = cosigners.aggregate_commit(&commitments).unwrap();
        let aggregate_key = cosigners.aggregate_public_key();

        let mut parts: Vec<SignaturePart> = Vec::with_capacity(n);
        for i in 0..n {
            match secrets[i].take() {
                Some(mut secret) => {
                    let part = cosign(&privates[i], &mut secret, message,
                                      &aggregate_key, &aggregate_commit);
                    assert!(cosigners.verify_part(message, &aggregate_commit,
                                                  i, &commitments[i], &part));
                    parts.push(part);
                },
                None => parts.push(SignaturePart([0u8; 32])),
            }
        }

        cosigners.aggregate_signature(&aggregate_commit, &parts)
    }

    /// The plain RFC 8032 verification equation, written out directly
    /// against the curve primitives.
    fn standard_ed25519_verify(public_key: &PublicKey, message: &[u8], signature: &[u8]) -> bool {
        assert_eq!(signature.len(), 64);
        let a = public_key.0.decompress().unwrap();

        let mut sig_s = [0u8; 32];
        sig_s.copy_from_slice(&signature[32..64]);
        assert_eq!(sig_s[31] & 224, 0);
        let s = Scalar::from_bits(sig_s);

        let mut h = Sha512::new();
        h.input(&signature[..32]);
        h.input(public_key.as_bytes());
        h.input(message);
        let mut digest = [0u8; 64];
        digest.copy_from_slice(h.result().as_slice());
        let k = Scalar::from_bytes_mod_order_wide(&digest);

        let r = EdwardsPoint::vartime_double_scalar_mul_basepoint(&k, &(-a), &s);
        r.compress().as_bytes() == &signature[..32]
    }

    #[test]
    fn full_participation_signs_and_verifies() {
        let mut csprng: ChaChaRng = ChaChaRng::from_seed([10u8; 32]);
        let (privates, publics) = keypairs(3, 11);

        let leader = Cosigners::new(&publics).unwrap();
        let signature = sign_round(&leader, &privates, b"hello", &mut csprng);
        assert_eq!(signature.len(), 65);
        assert_eq!(signature[64], 0x00);

        let mut verifier = Cosigners::new(&publics).unwrap();
        assert!(verifier.verify(b"hello", &signature));
        assert_eq!(verifier.count_enabled(), 3);
        assert!(!verifier.verify(b"goodbye", &signature));
    }

    #[test]
    fn absent_cosigner_needs_a_threshold_policy() {
        let mut csprng: ChaChaRng = ChaChaRng::from_seed([20u8; 32]);
        let (privates, publics) = keypairs(3, 21);

        let mut leader = Cosigners::new(&publics).unwrap();
        leader.set_mask_bit(1, MaskBit::Disabled);
        let signature = sign_round(&leader, &privates, b"hello", &mut csprng);
        assert_eq!(signature[64], 0x02);

        // The default all-must-sign policy refuses the two-signer group.
        let mut verifier = Cosigners::new(&publics).unwrap();
        assert!(!verifier.verify(b"hello", &signature));

        verifier.set_policy(Box::new(ThresholdPolicy::new(2)));
        assert!(verifier.verify(b"hello", &signature));

        // Verification left behind who signed.
        assert_eq!(verifier.mask_bit(0), MaskBit::Enabled);
        assert_eq!(verifier.mask_bit(1), MaskBit::Disabled);
        assert_eq!(verifier.mask_bit(2), MaskBit::Enabled);
        assert_eq!(verifier.mask(), vec![0x02]);
    }

    #[test]
    fn mask_is_cryptographically_bound() {
        let mut csprng: ChaChaRng = ChaChaRng::from_seed([30u8; 32]);
        let (privates, publics) = keypairs(3, 31);

        let leader = Cosigners::new(&publics).unwrap();
        let mut signature = sign_round(&leader, &privates, b"hello", &mut csprng);

        // Pretending a participant was absent shifts the aggregate key
        // out from under the challenge, however permissive the policy.
        signature[64] ^= 0x01;
        let mut verifier = Cosigners::new(&publics).unwrap();
        verifier.set_policy(Box::new(ThresholdPolicy::new(0)));
        assert!(!verifier.verify(b"hello", &signature));
    }

    #[test]
    fn any_flipped_bit_invalidates() {
        let mut csprng: ChaChaRng = ChaChaRng::from_seed([40u8; 32]);
        let (privates, publics) = keypairs(3, 41);

        let leader = Cosigners::new(&publics).unwrap();
        let signature = sign_round(&leader, &privates, b"hello", &mut csprng);

        let mut verifier = Cosigners::new(&publics).unwrap();
        verifier.set_policy(Box::new(ThresholdPolicy::new(0)));
        assert!(verifier.verify(b"hello", &signature));

        for i in 0..signature.len() {
            for j in 0..8 {
                let mut tampered = signature.clone();
                tampered[i] ^= 1 << j;
                assert!(!verifier.verify(b"hello", &tampered),
                        "tampered bit {} of byte {} was not caught", j, i);
            }
        }
    }

    #[test]
    fn malformed_commit_aborts_aggregation() {
        let mut csprng: ChaChaRng = ChaChaRng::from_seed([50u8; 32]);
        let (_privates, publics) = keypairs(3, 51);
        let leader = Cosigners::new(&publics).unwrap();

        let mut commitments: Vec<Commitment> = (0..3)
            .map(|_| commit(&mut csprng).unwrap().0)
            .collect();

        // Find an encoding that is not a curve point.
        let mut bad = [0u8; 32];
        for b in 0..=255u8 {
            bad[0] = b;
            if CompressedEdwardsY(bad).decompress().is_none() {
                break;
            }
        }
        assert!(CompressedEdwardsY(bad).decompress().is_none());

        commitments[1] = Commitment(bad);
        assert_eq!(leader.aggregate_commit(&commitments),
                   Err(SignatureError::PointDecompressionError));

        // The same garbage in a disabled slot is never looked at.
        let mut leader = leader;
        leader.set_mask_bit(1, MaskBit::Disabled);
        assert!(leader.aggregate_commit(&commitments).is_ok());
    }

    #[test]
    fn empty_participation_is_a_policy_question() {
        let (privates, publics) = keypairs(3, 61);
        let mut csprng: ChaChaRng = ChaChaRng::from_seed([60u8; 32]);

        let mut leader = Cosigners::new(&publics).unwrap();
        leader.set_mask(&[0xff]);
        assert_eq!(leader.count_enabled(), 0);

        let signature = sign_round(&leader, &privates, b"hello", &mut csprng);
        assert_eq!(signature[64], 0x07);

        let mut verifier = Cosigners::new(&publics).unwrap();
        assert!(!verifier.verify(b"hello", &signature));

        verifier.set_policy(Box::new(ThresholdPolicy::new(0)));
        assert!(verifier.verify(b"hello", &signature));
    }

    #[test]
    fn mask_round_trips_and_short_masks_enable() {
        let (_privates, publics) = keypairs(12, 71);
        let mut cosigners = Cosigners::new(&publics).unwrap();
        assert_eq!(cosigners.mask_len(), 2);

        let mask = [0b1011_0100u8, 0b0000_1001u8];
        cosigners.set_mask(&mask);
        assert_eq!(cosigners.mask(), vec![0b1011_0100, 0b0000_1001]);
        assert_eq!(cosigners.count_enabled(), 12 - 6);

        // Missing trailing bytes mean everyone there is enabled.
        cosigners.set_mask(&[0xff]);
        assert_eq!(cosigners.mask(), vec![0xff, 0x00]);
        assert_eq!(cosigners.count_enabled(), 4);

        // Bits beyond the cosigner list are dropped.
        cosigners.set_mask(&[0x00, 0xff, 0xff]);
        assert_eq!(cosigners.mask(), vec![0x00, 0x0f]);
    }

    #[test]
    fn incremental_mask_updates_match_rebuilds() {
        let (_privates, publics) = keypairs(10, 81);
        let mut incremental = Cosigners::new(&publics).unwrap();
        let mut csprng: ChaChaRng = ChaChaRng::from_seed([80u8; 32]);

        incremental.set_mask(&[0b0101_0101, 0b0000_0010]);
        for _ in 0..200 {
            let signer = csprng.gen_range(0, 10);
            let bit = if csprng.gen::<bool>() { MaskBit::Disabled } else { MaskBit::Enabled };
            incremental.set_mask_bit(signer, bit);

            let mut rebuilt = Cosigners::new(&publics).unwrap();
            rebuilt.set_mask(&incremental.mask());
            assert_eq!(rebuilt.aggregate_public_key(),
                       incremental.aggregate_public_key());
        }
    }

    #[test]
    fn aggregate_key_is_the_sum_of_enabled_keys() {
        let (_privates, publics) = keypairs(5, 91);
        let mut cosigners = Cosigners::new(&publics).unwrap();
        cosigners.set_mask(&[0b0001_0010]);

        let mut sum = EdwardsPoint::identity();
        for (i, public_key) in publics.iter().enumerate() {
            if i != 1 && i != 4 {
                sum += public_key.0.decompress().unwrap();
            }
        }
        assert_eq!(cosigners.aggregate_public_key().to_bytes(), sum.compress().to_bytes());
    }

    #[test]
    fn single_cosigner_yields_a_standard_ed25519_signature() {
        let mut csprng: ChaChaRng = ChaChaRng::from_seed([100u8; 32]);
        let (privates, publics) = keypairs(1, 101);

        let leader = Cosigners::new(&publics).unwrap();
        let signature = sign_round(&leader, &privates, b"hello", &mut csprng);
        assert_eq!(signature.len(), 65);

        assert!(standard_ed25519_verify(&publics[0], b"hello", &signature[..64]));
    }

    #[test]
    fn rfc8032_signatures_verify_as_singleton_collectives() {
        // Test vectors 1 and 2 from RFC 8032 section 7.1: a standard
        // ed25519 signature plus an all-enabled mask byte is a valid
        // collective signature over the singleton group.
        let vectors: [(&str, &[u8], &str); 2] = [
            ("d75a980182b10ab7d54bfed3c964073a0ee172f3daa62325af021a68f707511a",
             b"",
             "e5564300c360ac729086e2cc806e828a84877f1eb8e5d974d873e06522490155\
              5fb8821590a33bacc61e39701cf9b46bd25bf5f0595bbe24655141438e7a100b"),
            ("3d4017c3e843895a92b70aa74d1b7ebc9c982ccf2ec4968cc0cd55f12af4660c",
             b"\x72",
             "92a009a9f0d4cab8720e820b5f642540a2b27b5416503f8fb3762223ebdb69da\
              085ac1e43e15996e458f3613d0f11d8c387b2eaeb4302aeeb00d291612bb0c00"),
        ];

        for (public_hex, message, signature_hex) in vectors.iter() {
            let public = PublicKey::from_bytes(&hex::decode(public_hex).unwrap()).unwrap();
            let mut signature = hex::decode(signature_hex).unwrap();
            signature.push(0x00);

            let mut cosigners = Cosigners::new(&[public]).unwrap();
            assert!(cosigners.verify(message, &signature));
        }
    }

    #[test]
    fn wrong_length_signatures_are_rejected() {
        let mut csprng: ChaChaRng = ChaChaRng::from_seed([110u8; 32]);
        let (privates, publics) = keypairs(3, 111);

        let leader = Cosigners::new(&publics).unwrap();
        let signature = sign_round(&leader, &privates, b"hello", &mut csprng);

        let mut verifier = Cosigners::new(&publics).unwrap();
        assert!(!verifier.verify(b"hello", &signature[..64]));
        let mut long = signature.clone();
        long.push(0x00);
        assert!(!verifier.verify(b"hello", &long));
    }

    #[test]
    fn custom_policies_see_the_signature_mask() {
        let mut csprng: ChaChaRng = ChaChaRng::from_seed([120u8; 32]);
        let (privates, publics) = keypairs(3, 121);

        let mut leader = Cosigners::new(&publics).unwrap();
        leader.set_mask_bit(2, MaskBit::Disabled);
        let signature = sign_round(&leader, &privates, b"hello", &mut csprng);

        // Cosigner 0 is the one we insist on.
        let mut verifier = Cosigners::new(&publics).unwrap();
        verifier.set_policy(Box::new(|cosigners: &Cosigners| {
            cosigners.mask_bit(0) == MaskBit::Enabled
        }));
        assert!(verifier.verify(b"hello", &signature));

        // A policy pinning the absent cosigner refuses.
        verifier.set_policy(Box::new(|cosigners: &Cosigners| {
            cosigners.mask_bit(2) == MaskBit::Enabled
        }));
        assert!(!verifier.verify(b"hello", &signature));
    }

    #[test]
    fn verify_part_pinpoints_a_bad_share() {
        let mut csprng: ChaChaRng = ChaChaRng::from_seed([130u8; 32]);
        let (privates, publics) = keypairs(3, 131);
        let leader = Cosigners::new(&publics).unwrap();

        let commits: Vec<_> = (0..3).map(|_| commit(&mut csprng).unwrap()).collect();
        let commitments: Vec<Commitment> = commits.iter().map(|c| c.0).collect();
        let aggregate_commit = leader.aggregate_commit(&commitments).unwrap();
        let aggregate_key = leader.aggregate_public_key();

        let mut secrets: Vec<_> = commits.into_iter().map(|c| c.1).collect();
        let parts: Vec<SignaturePart> = (0..3)
            .map(|i| cosign(&privates[i], &mut secrets[i], b"hello",
                            &aggregate_key, &aggregate_commit))
            .collect();

        for i in 0..3 {
            assert!(leader.verify_part(b"hello", &aggregate_commit,
                                       i, &commitments[i], &parts[i]));
        }

        // A share computed over the wrong message stands out.
        let (bad_commitment, mut bad_secret) = commit(&mut csprng).unwrap();
        let bad_part = cosign(&privates[1], &mut bad_secret, b"gotcha",
                              &aggregate_key, &aggregate_commit);
        assert!(!leader.verify_part(b"hello", &aggregate_commit,
                                    1, &bad_commitment, &bad_part));
        assert!(!leader.verify_part(b"hello", &aggregate_commit,
                                    1, &commitments[1], &bad_part));
    }

    #[test]
    #[should_panic(expected = "one commitment slot per cosigner")]
    fn short_commitment_slices_are_a_caller_bug() {
        let (_privates, publics) = keypairs(3, 141);
        let leader = Cosigners::new(&publics).unwrap();
        let _ = leader.aggregate_commit(&[Commitment([0u8; 32])]);
    }

    #[test]
    fn off_curve_public_keys_fail_construction() {
        let (_privates, mut publics) = keypairs(3, 151);

        let mut bad = [0u8; 32];
        for b in 0..=255u8 {
            bad[0] = b;
            if CompressedEdwardsY(bad).decompress().is_none() {
                break;
            }
        }
        publics[2] = PublicKey(CompressedEdwardsY(bad));
        assert!(Cosigners::new(&publics).is_err());
    }
}
