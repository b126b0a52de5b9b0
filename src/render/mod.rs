//! Preview rendering: templates build a visual tree, which export resolves, lays out and
//! rasterizes on the CPU.

pub(crate) mod cpu;
pub(crate) mod layout;
/// Effective style resolution.
pub mod resolve;
/// The five article templates.
pub mod templates;
pub(crate) mod text;
/// Visual tree types.
pub mod tree;
