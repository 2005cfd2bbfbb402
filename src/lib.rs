//! Phantom: classical and post-quantum public-key cryptography.
//!
//! This crate provides the mathematical and protocol machinery shared by
//! its schemes — key exchange, key encapsulation, public-key encryption
//! and digital signatures — built from explicit, auditable primitives
//! rather than wrappers over external implementations.
//!
//! # Module overview
//!
//! - `core`
//!   The arithmetic engine: limb primitives parametric in the word width,
//!   unsigned and signed multiple-precision integers, Barrett/Montgomery
//!   reduction contexts, GF(2^n) arithmetic over sparse moduli, fixed-
//!   length polynomial rings with Toom-Cook multiplication, the NTT
//!   engine, and the constant-time condition kit.
//!
//! - `hash`
//!   SHA-2 (with a SHA-NI accelerated path), Keccak/SHA-3, the SHAKE
//!   XOFs, and HMAC. One streaming interface with deep-copyable states.
//!
//! - `rng`
//!   A deterministic CSPRNG expanded from a caller-supplied entropy
//!   callback, with periodic reseeding and forward-secret rekeying.
//!
//! - `packing`
//!   The bit-granularity stream codec behind every fixed wire format.
//!
//! - `ecc`
//!   Curve configurations, coordinate-system-parametric points
//!   (affine, projective, Jacobian, López–Dahab, extended), scalar
//!   recoding (binary, NAF-w, windowed, ladder) and the scalar
//!   multiplication drivers.
//!
//! - `sampling`
//!   Uniform-rejection and centered-binomial samplers for the lattice
//!   schemes.
//!
//! - `schemes`
//!   The scheme cores: RSA (SP 800-56B key generation, OAEP, PSS, CRT),
//!   ECDSA (randomized and RFC 6979), EdDSA (Ed25519/Ed448 and their
//!   prehash variants), ECDH, Kyber, Saber and Dilithium.
//!
//! - `ctx`
//!   The per-user context API: scheme catalogue, key lifecycle and the
//!   uniform operation surface.
//!
//! # Design notes
//!
//! Secret-dependent work goes through the constant-time helpers: ladders
//! with conditional swaps instead of branches, accumulated comparison
//! masks instead of early exits. Contexts own their key material and
//! scrub it on drop; modulus contexts and precomputed tables are
//! immutable after construction and freely shareable. The core keeps no
//! process-wide mutable state beyond the one-time CPU-feature probe for
//! the SHA-NI dispatch.

pub mod core;
pub mod ctx;
pub mod ecc;
pub mod error;
pub mod hash;
pub mod packing;
pub mod rng;
pub mod sampling;
pub mod schemes;

pub use ctx::{PkcContext, PkcScheme, create_ctx, create_ctx_with_entropy};
pub use error::{Error, Result};
