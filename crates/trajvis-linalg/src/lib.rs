#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Error types for the linear algebra module.
pub mod error;

/// Gaussian elimination with partial pivoting.
pub mod solve;

pub use error::LinalgError;
pub use solve::{solve_linear_system, LinearSystem};
