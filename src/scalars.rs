// -*- mode: rust; -*-
//
// This file is part of cosi.
// Copyright (c) 2019 Web 3 Foundation
// See LICENSE for licensing information.
//
// Authors:
// - Jeffrey Burdges <jeff@web3.foundation>

//! Scalar tooling
//!
//! The two places where bytes become scalars in this crate: the
//! Fiat-Shamir challenge, and wire-format scalar decoding.

use curve25519_dalek::scalar::Scalar;

use sha2::{Digest, Sha512};

use crate::errors::{SignatureError, SignatureResult};


/// Computes the ed25519 Schnorr challenge `SHA-512(R̄ ‖ Ā ‖ M) mod ℓ`.
///
/// Both the aggregate commit and the aggregate public key are hashed in
/// their 32-byte wire encodings, exactly as a standard ed25519 verifier
/// hashes `R` and `A`, which is what makes a collective signature over
/// the aggregate key verify as an ordinary ed25519 signature.
pub(crate) fn compute_challenge(
    aggregate_commit: &[u8; 32],
    aggregate_key: &[u8; 32],
    message: &[u8],
) -> Scalar {
    let mut h = Sha512::new();
    h.input(&aggregate_commit[..]);
    h.input(&aggregate_key[..]);
    h.input(message);

    let mut digest = [0u8; 64];
    digest.copy_from_slice(h.result().as_slice());
    Scalar::from_bytes_mod_order_wide(&digest)
}

/// Decode a 32-byte scalar in wire format.
///
/// Rejects any encoding with one of the top three bits set, the same
/// check most ed25519 verifiers apply to the `s` half of a signature.
/// The remaining 253-bit range is accepted unreduced, matching the
/// reference verification equation's tolerance.
pub(crate) fn check_scalar(bytes: [u8; 32]) -> SignatureResult<Scalar> {
    if bytes[31] & 224 != 0 {
        return Err(SignatureError::ScalarFormatError);
    }
    Ok(Scalar::from_bits(bytes))
}


#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn challenge_depends_on_every_input() {
        let r = [3u8; 32];
        let a = [5u8; 32];
        let base = compute_challenge(&r, &a, b"msg");
        assert_ne!(base, compute_challenge(&a, &r, b"msg"));
        assert_ne!(base, compute_challenge(&r, &a, b"msh"));
    }

    #[test]
    fn high_bit_scalars_are_rejected() {
        let mut bytes = [0u8; 32];
        bytes[31] = 0x20;
        assert!(check_scalar(bytes).is_err());
        bytes[31] = 0x1f;
        assert!(check_scalar(bytes).is_ok());
    }
}
