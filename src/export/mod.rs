//! JPEG export of the live preview.
//!
//! An export resolves a snapshot of the preview tree to concrete colors, lays it out, rasterizes
//! it on the CPU and hands the encoded file to an [`sink::ArtifactSink`].

/// Export pipeline and options.
pub mod exporter;
/// Artifact sinks.
pub mod sink;
