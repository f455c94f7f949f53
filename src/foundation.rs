//! Shared value types, the error taxonomy and small fixed-point helpers.

/// Frame, time and colour value types.
pub mod core;
/// Error taxonomy.
pub mod error;
pub(crate) mod math;
