//! newsprint composes newspaper-style articles.
//!
//! An [`EditorSession`] owns the article [`Composition`] and keeps a live preview tree in sync with
//! every edit. Five templates arrange the same fields differently. An [`Exporter`] snapshots the
//! preview, lays it out and rasterizes it on the CPU, and delivers a JPEG to an [`ArtifactSink`].
//!
//! ```no_run
//! use newsprint::{DirectorySink, EditorSession, ExportOpts, Exporter, Layout};
//!
//! # fn main() -> newsprint::NewsprintResult<()> {
//! let mut session = EditorSession::new();
//! session.set_heading("Breaking News");
//! session.set_layout(Layout::Magazine);
//! println!("{}", session.outline());
//!
//! let mut exporter = Exporter::new(ExportOpts::default())?;
//! let mut sink = DirectorySink::new("out");
//! let artifact = session.export(&mut exporter, &mut sink)?;
//! println!("{}", artifact.file_name);
//! # Ok(())
//! # }
//! ```
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

/// Image and color inputs.
pub mod assets;
/// Field editors and the editing session.
pub mod editor;
/// JPEG export.
pub mod export;
/// Preview rendering.
pub mod render;
/// Composition state.
pub mod scene;

pub use crate::assets::color::CssColor;
pub use crate::assets::image_loader::{EmbeddedImage, load_image};
pub use crate::editor::field::{Field, FieldKind};
pub use crate::editor::session::EditorSession;
pub use crate::export::exporter::{Clock, ExportOpts, Exporter, SystemClock};
pub use crate::export::sink::{Artifact, ArtifactSink, DirectorySink, InMemorySink};
pub use crate::foundation::core::{Bitmap, Rgba8};
pub use crate::foundation::error::{NewsprintError, NewsprintResult};
pub use crate::render::templates::render;
pub use crate::render::tree::{Node, Role};
pub use crate::scene::state::{Composition, ImageFit, Layout, NumericRange};
