//! Crate-wide error taxonomy.
//!
//! Every fallible operation in the library reports one of the variants
//! below. Scheme-level operations convert internal failures to the nearest
//! public error before returning; in particular `DecryptionFailure` and
//! `InvalidSignature` deliberately carry no information about *which*
//! sub-step failed.

use thiserror::Error;

/// Errors reported by the public-key cryptography core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
    /// Unknown or unsupported scheme/parameter-set tuple.
    #[error("invalid parameter set")]
    InvalidParameterSet,

    /// A key failed structural or range checks.
    #[error("invalid key")]
    InvalidKey,

    /// Signature verification failed.
    #[error("invalid signature")]
    InvalidSignature,

    /// Ciphertext is malformed, or a MAC/hint check failed.
    #[error("decryption failure")]
    DecryptionFailure,

    /// Division by zero in multiple-precision arithmetic.
    #[error("divide by zero")]
    DivideByZero,

    /// A modular inverse was requested for a non-invertible element.
    #[error("element is not invertible")]
    NonInvertible,

    /// An elliptic-curve operation produced the group identity where a
    /// finite point was required.
    #[error("point at infinity")]
    PointAtInfinity,

    /// Internal elliptic-curve arithmetic failure, e.g. an inversion
    /// required during coordinate conversion did not exist.
    #[error("elliptic curve arithmetic error")]
    PointError,

    /// A scalar recoding produced an unexpected leading-zero symbol for an
    /// algorithm that requires a leading one.
    #[error("scalar recoding error")]
    RecodingError,

    /// Bit-stream read past the produced length, or write past the
    /// preallocated capacity.
    #[error("insufficient buffer")]
    InsufficientBuffer,

    /// The entropy callback signalled failure, or a capped restart loop
    /// exhausted its iteration cap.
    #[error("entropy source failure")]
    EntropyFailure,
}

/// Crate-wide result alias.
pub type Result<T> = core::result::Result<T, Error>;
