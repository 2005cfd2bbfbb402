//! Elliptic-curve machinery: curve configurations, coordinate-parametric
//! points, scalar recoding and the scalar-multiplication drivers.

pub mod config;
pub mod edwards;
pub mod montgomery;
pub mod point;
pub mod recoding;
pub mod scalar_mul;
pub mod weierstrass_binary;
pub mod weierstrass_prime;

pub use config::{CoordSystem, CurveConfig, FieldKind, ParamAKind};
pub use point::{Coords, EcPoint};
pub use recoding::{Recoder, Recoding, Symbol};
pub use scalar_mul::{double_scalar_mul, scalar_mul};
