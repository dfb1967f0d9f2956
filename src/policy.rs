// -*- mode: rust; -*-
//
// This file is part of cosi.
// Copyright (c) 2019 Web 3 Foundation
// See LICENSE for licensing information.
//
// Authors:
// - Jeffrey Burdges <jeff@web3.foundation>

//! Cosigner-presence policies.
//!
//! A collective signature records exactly which cosigners participated,
//! but only the verifier can decide whether that set suffices.  A
//! [`Policy`] makes that decision.  The default installed in every new
//! `Cosigners` object conservatively requires all cosigners to have
//! signed; verifiers relax it with [`ThresholdPolicy`] or any custom
//! implementation before calling `Cosigners::verify`.

use crate::cosigners::Cosigners;


/// A fully customizable policy deciding which participant sets are and
/// are not sufficient for a collective signature to be acceptable.
///
/// `check` runs after the verifier's participation bitmask has been
/// refreshed from the signature under inspection, so it may call
/// `Cosigners::mask`, `Cosigners::mask_bit`, or `Cosigners::count_enabled`
/// to learn exactly who signed, and may consult any other contextual
/// information it closed over, such as how security-critical the
/// operation relying on the signature is.
pub trait Policy {
    /// Returns true if the participant set recorded in `cosigners`
    /// is acceptable.
    fn check(&self, cosigners: &Cosigners) -> bool;
}

/// Any closure over the cosigner set works as a policy.
impl<F> Policy for F
where F: Fn(&Cosigners) -> bool,
{
    fn check(&self, cosigners: &Cosigners) -> bool {
        self(cosigners)
    }
}


/// The conservative default policy: every cosigner must have signed.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct FullPolicy;

impl Policy for FullPolicy {
    fn check(&self, cosigners: &Cosigners) -> bool {
        cosigners.count_enabled() == cosigners.count_total()
    }
}


/// A simple T-of-N policy, satisfied whenever at least the given number
/// of cosigners participated.
///
/// Note a threshold of zero accepts a collective signature in which no
/// cosigner participated at all, over an aggregate key equal to the
/// identity point.  Such a signature is technically valid, which is
/// precisely why the verification policy deserves to be chosen with
/// care.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct ThresholdPolicy {
    threshold: usize,
}

impl ThresholdPolicy {
    /// Create a policy requiring at least `threshold` participants.
    pub fn new(threshold: usize) -> ThresholdPolicy {
        ThresholdPolicy { threshold }
    }

    /// The number of participants this policy requires.
    pub fn threshold(&self) -> usize {
        self.threshold
    }
}

impl Policy for ThresholdPolicy {
    fn check(&self, cosigners: &Cosigners) -> bool {
        cosigners.count_enabled() >= self.threshold
    }
}
