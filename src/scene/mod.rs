//! Composition state.

/// The article composition and its enumerations.
pub mod state;
