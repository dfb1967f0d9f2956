// -*- mode: rust; -*-
//
// This file is part of cosi.
// Copyright (c) 2019 Web 3 Foundation
// See LICENSE for licensing information.
//
// Authors:
// - Jeffrey Burdges <jeff@web3.foundation>

//! ### Errors which may occur when parsing keys, commits, or signatures to or from wire formats.

use core::fmt;
use core::fmt::Display;


/// `Result` specialized to this crate for convenience.
pub type SignatureResult<T> = Result<T, SignatureError>;

/// Errors which may occur while processing collective signatures.
///
/// All of these represent a failed signing round or an unverifiable
/// signature when they occur in the context of verification, including
/// in deserializing for verification.  We expose the distinction among
/// them primarily for debugging purposes.
///
/// This error may arise due to:
///
/// * Being given bytes with a length different to what was expected.
///
/// * A problem decompressing a curve point, either a cosigner's public
///   key at set construction or an individual commit during aggregation.
///
/// * A problem with the format of `s`, a scalar, in a signature part.
///   This is only raised if the high three bits of the scalar were set.
///
/// * A failure of the caller-supplied random number generator.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum SignatureError {
    /// Invalid point provided, either a cosigner public key handed to
    /// `Cosigners::new` or an individual commit handed to
    /// `Cosigners::aggregate_commit`.
    PointDecompressionError,
    /// Invalid scalar provided, usually to `SignaturePart::from_bytes`.
    ScalarFormatError,
    /// An error in the length of bytes handed to a constructor.
    ///
    /// To use this, pass a string specifying the `name` of the type
    /// which is returning the error, and the `length` in bytes which
    /// its constructor expects.
    BytesLengthError {
        /// Identifies the type returning the error
        name: &'static str,
        /// Describes the type returning the error
        description: &'static str,
        /// Length expected by the constructor in bytes
        length: usize,
    },
    /// The caller-supplied random number generator failed while
    /// producing a one-time commit.
    RngError,
}

impl Display for SignatureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use self::SignatureError::*;
        match *self {
            PointDecompressionError =>
                write!(f, "Cannot decompress Edwards point"),
            ScalarFormatError =>
                write!(f, "Cannot use scalar with high-bit set"),
            BytesLengthError { name, length, .. } =>
                write!(f, "{} must be {} bytes in length", name, length),
            RngError =>
                write!(f, "Random number generator failed"),
        }
    }
}

#[cfg(feature = "failure")]
impl ::failure::Fail for SignatureError {}

/// Convert `SignatureError` into `::serde::de::Error` aka `SerdeError`
///
/// We should do this with `From` but right now the orphan rules prohibit
/// `impl From<SignatureError> for E where E: ::serde::de::Error`.
#[cfg(feature = "serde")]
pub fn serde_error_from_signature_error<E>(err: SignatureError) -> E
where E: ::serde::de::Error
{
    use self::SignatureError::*;
    match err {
        PointDecompressionError
            => E::custom("Edwards point decompression failed"),
        ScalarFormatError
            => E::custom("improper scalar has high-bit set"),
        BytesLengthError { description, length, .. }
            => E::invalid_length(length, &description),
        _ => panic!("Non-serialisation error encountered by serde!"),
    }
}
