//! # darkroom-math
//!
//! Math utilities for the darkroom pipeline.
//!
//! - [`Mat3`] - 3x3 matrices, used for the Lab kernel's spectral crosstalk
//!   matrix (`D' = D * M_applied^T`, density space).
//! - [`Vec3`] - 3D vectors for RGB/density triples.
//! - [`Affine2`] - 2x3 affine transform for the geometry kernel's fine
//!   rotation (mirrors OpenCV's `getRotationMatrix2D`).
//! - Interpolation utilities (lerp, smoothstep).
//!
//! # Design
//!
//! Matrix operations assume **row-major** storage and **column vectors**:
//!
//! ```text
//! result = matrix * vector
//! ```
//!
//! # Dependencies
//!
//! - [`glam`] - matrix/vector storage

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod affine;
mod mat3;
mod vec3;
mod interp;
mod adapt;
pub mod simd;

pub use affine::Affine2;
pub use mat3::*;
pub use vec3::*;
pub use interp::*;
pub use adapt::*;

/// Re-export glam types for direct use
pub mod glam {
    pub use ::glam::{Mat3 as GlamMat3, Vec3 as GlamVec3, Vec3A};
}
