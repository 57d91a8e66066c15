//! Optional tiled GPU execution path for the darkroom pipeline.
//!
//! The pipeline's kernels (density curve, local contrast, sharpening, ...)
//! are plain CPU functions over an interleaved f32 buffer. This crate does
//! not reimplement them: it provides the VRAM-aware strategy selection and
//! halo'd tiling that let the same kernel closure run either directly over
//! a whole image or piecewise over device-sized tiles, so large images don't
//! exceed the GPU's max texture dimension or overrun its VRAM.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │   Pipeline stage kernel: Fn(&[f32], w, h, ch) -> Vec<f32> │
//! ├──────────────────────────────────────────────────────────┤
//! │                     TiledRunner                          │
//! │   GpuLimits -> ProcessingStrategy -> SinglePass | Tiled   │
//! │   tiles carry a halo so convolution-like kernels don't    │
//! │   seam at tile borders                                    │
//! ├──────────────────────────────────────────────────────────┤
//! │         RegionCache / TextureCache (scratch reuse)        │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```ignore
//! use darkroom_compute::{Backend, GpuLimits, TiledRunner};
//!
//! let backend = Backend::Auto.resolve();
//! let limits = GpuLimits::with_vram(darkroom_compute::total_vram());
//! let runner = TiledRunner::new(limits);
//!
//! let output = runner.run(&pixels, width, height, 3, |tile, w, h, c| {
//!     // same kernel as the CPU-only path
//!     darkroom_exposure::apply_density_curve(tile, w, h, c, &curve)
//! });
//! ```
//!
//! # Feature Flags
//!
//! - `wgpu` - enables wgpu adapter probing so [`Backend::Auto`] can prefer a
//!   real GPU device over the CPU fallback.

pub mod backend;

pub use backend::{
    Backend, GpuLimits, ProcessingStrategy, TileWorkflow, Tile, generate_tiles,
    RegionKey, RegionCache, TextureKey, TextureCache,
    TiledRunner, TileKernel, DEFAULT_HALO,
    detect_backends, select_best_backend, describe_backends, BackendInfo,
    VramInfo, detect_vram, total_vram, available_vram,
    available_memory, system_memory, cache_budget, processing_budget, format_bytes,
};

use thiserror::Error;

/// GPU path errors.
#[derive(Error, Debug)]
pub enum ComputeError {
    #[error("no suitable GPU adapter found")]
    NoAdapter,

    #[error("backend not available: {0}")]
    BackendNotAvailable(String),

    #[error("image too large: {width}x{height} exceeds GPU limit {limit}")]
    ImageTooLarge { width: u32, height: u32, limit: u32 },

    #[error("invalid dimensions: {0}x{1}")]
    InvalidDimensions(u32, u32),

    #[error("GPU operation failed: {0}")]
    OperationFailed(String),
}

/// Result alias for this crate.
pub type ComputeResult<T> = Result<T, ComputeError>;
