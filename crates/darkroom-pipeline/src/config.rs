//! `WorkspaceConfig`: the aggregate of every kernel's sliders plus export
//! settings (`spec.md` §3).

use serde::{Deserialize, Serialize};

use darkroom_core::ProcessMode;
use darkroom_exposure::ExposureConfig;
use darkroom_geometry::GeometryConfig;
use darkroom_lab::LabConfig;
use darkroom_retouch::RetouchConfig;
use darkroom_toning::ToningConfig;

/// Target export color space (`spec.md` §3 `ExportConfig`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ExportColorSpace {
    /// The working color space, unconverted.
    #[default]
    WorkingSpace,
    /// sRGB.
    Srgb,
    /// Display P3.
    DisplayP3,
    /// Single-channel greyscale.
    Greyscale,
}

/// Output file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ExportFormat {
    /// Baseline JPEG.
    #[default]
    Jpeg,
    /// TIFF, optionally 16-bit with LZW compression.
    Tiff,
}

/// The Export Compositor's user-facing controls (`spec.md` §3 `ExportConfig`,
/// §4.9).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Output file format.
    pub format: ExportFormat,
    /// Target color space for the encoded file.
    pub color_space: ExportColorSpace,
    /// Print size, long edge, in centimeters.
    pub print_size_cm: f32,
    /// Output resolution in dots per inch.
    pub dpi: f32,
    /// Border width in centimeters.
    pub border_size_cm: f32,
    /// Border fill color, `"#RRGGBB"`.
    pub border_color_hex: String,
    /// Paper aspect ratio, `"Original"` or a `"W:H"` string.
    pub paper_aspect_ratio: String,
    /// Skip all resampling and export at the buffer's native resolution.
    pub use_original_res: bool,
    /// Filename template, e.g. `"{{ original_name }}_{{ date }}"`.
    pub filename_pattern: String,
    /// Path to an ICC profile to transform into before encoding.
    pub icc_profile_path: Option<String>,
    /// Whether the ICC transform direction is inverted (profile-to-working
    /// rather than working-to-profile).
    pub icc_invert: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            format: ExportFormat::Jpeg,
            color_space: ExportColorSpace::WorkingSpace,
            print_size_cm: 20.0,
            dpi: 300.0,
            border_size_cm: 0.0,
            border_color_hex: "#FFFFFF".to_string(),
            paper_aspect_ratio: "Original".to_string(),
            use_original_res: false,
            filename_pattern: "{{ original_name }}".to_string(),
            icc_profile_path: None,
            icc_invert: false,
        }
    }
}

/// The complete, immutable aggregate of every kernel's user-facing sliders
/// plus export settings (`spec.md` §3 `WorkspaceConfig`). Mutations produce
/// a new instance rather than mutating in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkspaceConfig {
    /// Which film process produced the source negative.
    pub process_mode: ProcessMode,
    /// Geometry Kernel settings.
    pub geometry: GeometryConfig,
    /// Exposure Kernel settings.
    pub exposure: ExposureConfig,
    /// Retouch Kernel settings.
    pub retouch: RetouchConfig,
    /// Lab Kernel settings.
    pub lab: LabConfig,
    /// Toning Kernel settings.
    pub toning: ToningConfig,
    /// Export Compositor settings.
    pub export: ExportConfig,
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            process_mode: ProcessMode::default(),
            geometry: GeometryConfig::default(),
            exposure: ExposureConfig::default(),
            retouch: RetouchConfig::default(),
            lab: LabConfig::default(),
            toning: ToningConfig::default(),
            export: ExportConfig::default(),
        }
    }
}
