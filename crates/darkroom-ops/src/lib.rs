//! # darkroom-ops
//!
//! Generic pixel kernels shared by the darkroom stage crates: coordinate
//! warping, convolution/blur, and resampling. Domain semantics (what a
//! warp's coordinate function computes, what a blur is used for) live in
//! the stage crates (`darkroom-geometry`, `darkroom-retouch`, `darkroom-lab`);
//! this crate only supplies the mechanism.
//!
//! # Modules
//!
//! - [`resize`] - Lanczos/box resampling, used by the Export Compositor
//! - [`filter`] - Kernel convolution, separable box/Gaussian blur
//! - [`warp`] - Generic coordinate-warp driver + bilinear sampling
//! - [`transform`] - Axis-aligned flips and 90-degree rotation
//!
//! # Example
//!
//! ```rust,ignore
//! use darkroom_ops::resize::{resize_f32, Filter};
//!
//! let scaled = resize_f32(&data, w, h, 3, new_w, new_h, Filter::Lanczos3)?;
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
pub mod resize;
pub mod filter;
pub mod transform;
pub mod warp;

#[cfg(feature = "parallel")]
pub mod parallel;

pub use error::{OpsError, OpsResult};
pub use resize::Filter;
