//! # darkroom-export
//!
//! The Export Compositor (`spec.md` §4.9): the final stage that takes a
//! positive from the Orchestrator's [`darkroom_pipeline`] and turns it into
//! a delivery file. Five steps: resize to the content target, frame it on a
//! paper canvas with a border, select greyscale/color mode, run an ICC
//! transform, encode to JPEG or TIFF.
//!
//! Filename rendering lives alongside it in [`template`] since every
//! exported file needs both a buffer and a name, but the two are otherwise
//! independent: callers build the [`template::FilenameContext`] from their
//! own file metadata and combine it with [`compositor::ExportedFile`]'s
//! extension themselves.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod compositor;
mod error;
mod sizing;
mod template;

pub use compositor::{export, ExportedFile};
pub use error::{ExportError, ExportResult};
pub use sizing::{compute_content_sizing, fit_content_dims, parse_hex_color, paper_dims, ContentSizing};
pub use template::{render_filename, FilenameContext};

/// Common imports for consumers of this crate.
pub mod prelude {
    pub use crate::compositor::{export, ExportedFile};
    pub use crate::error::{ExportError, ExportResult};
    pub use crate::template::{render_filename, FilenameContext};
}
