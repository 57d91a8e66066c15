//! Backend selection and tiled-execution support for the optional GPU path.

mod tiling;
mod cache;
mod texture_cache;
mod memory;
mod vram;
mod detect;
mod runner;

pub use tiling::{GpuLimits, Tile, generate_tiles, ProcessingStrategy, TileWorkflow};
pub use cache::{RegionKey, RegionCache};
pub use texture_cache::{TextureKey, TextureCache};
pub use memory::{available_memory, system_memory, cache_budget, processing_budget, format_bytes};
pub use vram::{VramInfo, detect_vram, total_vram, available_vram};
pub use detect::{detect_backends, select_best_backend, describe_backends, BackendInfo};
pub use runner::{TiledRunner, TileKernel, DEFAULT_HALO};

/// Available compute backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Backend {
    /// Auto-select best available (wgpu > CPU).
    #[default]
    Auto,
    /// CPU backend using rayon for parallelization.
    Cpu,
    /// wgpu backend (Vulkan/Metal/DX12), writing into a device texture.
    Wgpu,
}

impl Backend {
    /// Check if this backend is available on the current system.
    pub fn is_available(&self) -> bool {
        match self {
            Self::Auto => true,
            Self::Cpu => true,
            #[cfg(feature = "wgpu")]
            Self::Wgpu => {
                let backends = detect_backends();
                backends.iter().any(|b| b.name == "wgpu" && b.available)
            }
            #[cfg(not(feature = "wgpu"))]
            Self::Wgpu => false,
        }
    }

    /// Resolve `Auto` to a concrete backend.
    pub fn resolve(self) -> Backend {
        match self {
            Self::Auto => select_best_backend(),
            other => other,
        }
    }
}
