//! Field editors and the editing session.

/// Editable fields, their kinds and declared ranges.
pub mod field;
/// The editing session.
pub mod session;
