//! Arithmetic core: limb primitives, constant-time helpers,
//! multiple-precision integers, modular reduction contexts, binary fields,
//! small-coefficient polynomial rings and the NTT engine.

pub mod ct;
pub mod gf2n;
pub mod limb;
pub mod mpbase;
pub mod mpz;
pub mod ntt;
pub mod poly;
pub mod reduction;
