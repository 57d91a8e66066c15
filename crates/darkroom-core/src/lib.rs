//! # darkroom-core
//!
//! Foundational types for the darkroom photometric pipeline: the float32
//! image buffer, region-of-interest and dimension types, and the crate-local
//! error type other darkroom crates build on.
//!
//! ## Crate structure
//!
//! ```text
//! darkroom-core (this crate)
//!    ^
//!    +-- darkroom-math (affine matrices, interpolation)
//!    +-- darkroom-ops (warp/filter/resize kernels)
//!    +-- darkroom-exposure, -geometry, -retouch, -lab, -toning (stage kernels)
//!    +-- darkroom-pipeline (orchestrator, stage cache)
//!    +-- darkroom-io, -export, -icc, -compute, -cli
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod error;
pub mod image;
pub mod process_mode;
pub mod roi;

pub use error::{Error, Result};
pub use image::{
    collapse_to_luma_rgb, ensure_rgb, float_to_uint8, luma, luma3, uint16_to_float32, FloatImage,
    LUMA_B, LUMA_G, LUMA_R,
};
pub use process_mode::ProcessMode;
pub use roi::{Dimensions, Roi};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::image::FloatImage;
    pub use crate::process_mode::ProcessMode;
    pub use crate::roi::{Dimensions, Roi};
}
