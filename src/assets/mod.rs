//! Image and color inputs.

/// CSS color strings.
pub mod color;
/// Image file loading into embedded data URLs.
pub mod image_loader;
