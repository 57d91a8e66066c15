//! Tiled execution driver for the optional GPU path.
//!
//! The per-tile kernel is the same closure the caller would run on the CPU
//! directly; this module only owns the tiling/halo mechanics and VRAM-aware
//! strategy selection. The pipeline stages (density curve, local contrast,
//! sharpening, ...) that actually produce those closures live in their own
//! crates.

use super::tiling::{GpuLimits, ProcessingStrategy, generate_tiles};

/// Default halo width in pixels for tiled processing.
///
/// Wide enough that local-contrast (CLAHE) and sharpening kernels, whose
/// widest support is a handful of pixels, see a neighborhood that avoids
/// visible seams at tile borders.
pub const DEFAULT_HALO: u32 = 32;

/// Per-tile processing function: takes an interleaved f32 buffer (with halo)
/// and its dimensions, returns a buffer of the same dimensions.
pub trait TileKernel: Fn(&[f32], u32, u32, u32) -> Vec<f32> + Sync {}
impl<F> TileKernel for F where F: Fn(&[f32], u32, u32, u32) -> Vec<f32> + Sync {}

/// Drives tiled (or single-pass) execution of a [`TileKernel`] over a full
/// image, selecting a strategy from [`GpuLimits`] and stitching halo'd tile
/// results back into the destination buffer.
pub struct TiledRunner {
    limits: GpuLimits,
    halo: u32,
}

impl TiledRunner {
    /// Create a runner with the default halo width.
    pub fn new(limits: GpuLimits) -> Self {
        Self { limits, halo: DEFAULT_HALO }
    }

    /// Create a runner with an explicit halo width.
    pub fn with_halo(limits: GpuLimits, halo: u32) -> Self {
        Self { limits, halo }
    }

    /// GPU limits this runner plans against.
    pub fn limits(&self) -> &GpuLimits {
        &self.limits
    }

    /// Run `kernel` over `src` (`width x height x channels`), returning a
    /// buffer of the same size.
    ///
    /// When the image fits the single-pass budget the kernel runs once over
    /// the whole image. Otherwise the image is split into tiles with a
    /// `halo`-pixel overlap: the kernel sees the expanded tile, but only the
    /// inner region is written back, so every tile observes the same local
    /// neighborhood it would in a non-tiled run.
    pub fn run<F>(&self, src: &[f32], width: u32, height: u32, channels: u32, kernel: F) -> Vec<f32>
    where
        F: TileKernel,
    {
        let strategy = ProcessingStrategy::recommend(width, height, channels, &self.limits);

        match strategy {
            ProcessingStrategy::SinglePass => kernel(src, width, height, channels),
            ProcessingStrategy::Tiled { tile_size, .. } | ProcessingStrategy::Streaming { tile_size } => {
                self.run_tiled(src, width, height, channels, tile_size, &kernel)
            }
        }
    }

    fn run_tiled<F>(&self, src: &[f32], width: u32, height: u32, channels: u32, tile_size: u32, kernel: &F) -> Vec<f32>
    where
        F: TileKernel,
    {
        let tiles = generate_tiles(width, height, tile_size);
        let mut dst = vec![0.0f32; (width as usize) * (height as usize) * (channels as usize)];

        for tile in &tiles {
            let exp_x = tile.x.saturating_sub(self.halo);
            let exp_y = tile.y.saturating_sub(self.halo);
            let exp_w = (tile.x + tile.width + self.halo).min(width) - exp_x;
            let exp_h = (tile.y + tile.height + self.halo).min(height) - exp_y;

            let expanded = extract_region(src, width, channels, exp_x, exp_y, exp_w, exp_h);
            let processed = kernel(&expanded, exp_w, exp_h, channels);

            let inner_x = tile.x - exp_x;
            let inner_y = tile.y - exp_y;
            let inner = extract_region(&processed, exp_w, channels, inner_x, inner_y, tile.width, tile.height);

            write_region(&mut dst, width, channels, tile.x, tile.y, tile.width, tile.height, &inner);
        }

        dst
    }
}

fn extract_region(data: &[f32], stride_w: u32, channels: u32, x: u32, y: u32, w: u32, h: u32) -> Vec<f32> {
    let c = channels as usize;
    let stride = (stride_w as usize) * c;
    let mut out = Vec::with_capacity((w as usize) * (h as usize) * c);
    for row in y..(y + h) {
        let start = (row as usize) * stride + (x as usize) * c;
        let end = start + (w as usize) * c;
        out.extend_from_slice(&data[start..end]);
    }
    out
}

fn write_region(dst: &mut [f32], stride_w: u32, channels: u32, x: u32, y: u32, w: u32, h: u32, data: &[f32]) {
    let c = channels as usize;
    let stride = (stride_w as usize) * c;
    let tile_stride = (w as usize) * c;
    for row in 0..h as usize {
        let src_start = row * tile_stride;
        let dst_row = y as usize + row;
        let dst_start = dst_row * stride + (x as usize) * c;
        dst[dst_start..dst_start + tile_stride].copy_from_slice(&data[src_start..src_start + tile_stride]);
    }
}
