//! negpy - headless batch converter for the darkroom photometric pipeline
//!
//! Turns one or more RAW film scans into positive JPEG/TIFF prints without a
//! UI, suitable for scripting a whole roll or a whole archive in one call.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

mod batch;
mod colorspace;
mod discovery;
mod pipeline_run;
mod settings;

use darkroom_core::ProcessMode;
use darkroom_pipeline::{ExportFormat, WorkspaceConfig};

#[derive(Parser)]
#[command(name = "negpy")]
#[command(author, version, about = "Headless batch converter for film negative scans")]
#[command(long_about = "
Converts RAW negative scans into positive prints, reproducing traditional
darkroom enlarger behavior: density/exposure, grade/contrast, color
separation, local contrast, dust healing, and paper framing.

Examples:
  negpy --output ./prints roll12/
  negpy --mode bw --grade 3.0 --output ./prints frame_001.dng
  negpy --settings preset.json --format tiff --output ./prints roll12/
")]
struct Cli {
    /// Film process the source negatives were shot on.
    #[arg(long, value_enum, default_value = "c41")]
    mode: ModeArg,

    /// Output file format.
    #[arg(long, value_enum, default_value = "jpeg")]
    format: FormatArg,

    /// Directory exported files are written into. Created if missing.
    #[arg(long)]
    output: PathBuf,

    /// Target color space for the encoded file.
    #[arg(long = "color-space", default_value = "srgb")]
    color_space: String,

    /// Overall exposure density offset.
    #[arg(long)]
    density: Option<f32>,

    /// Contrast grade.
    #[arg(long)]
    grade: Option<f32>,

    /// Sharpening strength.
    #[arg(long)]
    sharpen: Option<f32>,

    /// Output resolution in dots per inch.
    #[arg(long)]
    dpi: Option<f32>,

    /// Print size, long edge, in centimeters.
    #[arg(long = "print-size")]
    print_size: Option<f32>,

    /// Skip all resampling; export at the buffer's native resolution.
    #[arg(long = "original-res")]
    original_res: bool,

    /// Output filename template, e.g. "{{ original_name }}_{{ date }}".
    #[arg(long = "filename-pattern")]
    filename_pattern: Option<String>,

    /// Accepted for interface parity; this CLI has no GPU execution path.
    #[arg(long = "no-gpu")]
    no_gpu: bool,

    /// A JSON settings document overlaying the built-in defaults, itself
    /// overridden by any explicit flag above.
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Verbose output (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// RAW files or directories of RAW files to convert.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum ModeArg {
    C41,
    Bw,
    E6,
}

impl From<ModeArg> for ProcessMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::C41 => ProcessMode::C41,
            ModeArg::Bw => ProcessMode::BW,
            ModeArg::E6 => ProcessMode::E6,
        }
    }
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum FormatArg {
    Jpeg,
    Tiff,
}

impl From<FormatArg> for ExportFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Jpeg => ExportFormat::Jpeg,
            FormatArg::Tiff => ExportFormat::Tiff,
        }
    }
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => "warn",
        1 => "negpy=info",
        2 => "negpy=debug",
        _ => "negpy=trace",
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_timer(fmt::time::uptime())
        .init();
}

/// Builds the base `WorkspaceConfig` every discovered file starts from:
/// defaults, overlaid with `--settings` if given, overlaid with any explicit
/// flag (`spec.md` §6.2's stated precedence).
fn build_base_settings(cli: &Cli) -> Result<WorkspaceConfig> {
    let mut cfg = match &cli.settings {
        Some(path) => settings::load_settings_file(path)?,
        None => WorkspaceConfig::default(),
    };

    cfg.process_mode = cli.mode.into();
    cfg.export.format = cli.format.into();

    if let Some(density) = cli.density {
        cfg.exposure.density = density;
    }
    if let Some(grade) = cli.grade {
        cfg.exposure.grade = grade;
    }
    if let Some(sharpen) = cli.sharpen {
        cfg.lab.sharpen = sharpen;
    }
    if let Some(dpi) = cli.dpi {
        cfg.export.dpi = dpi;
    }
    if let Some(print_size) = cli.print_size {
        cfg.export.print_size_cm = print_size;
    }
    if cli.original_res {
        cfg.export.use_original_res = true;
    }
    if let Some(pattern) = &cli.filename_pattern {
        cfg.export.filename_pattern = pattern.clone();
    }

    let resolved = colorspace::resolve_color_space(&cli.color_space)
        .with_context(|| format!("invalid --color-space value: {}", cli.color_space))?;
    cfg.export.color_space = resolved.color_space;
    if resolved.icc_profile_path.is_some() {
        cfg.export.icc_profile_path = resolved.icc_profile_path;
    }

    Ok(cfg)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.no_gpu {
        tracing::debug!("--no-gpu has no effect: this build has no GPU execution path");
    }

    let inputs = discovery::discover_inputs(&cli.inputs);
    if inputs.is_empty() {
        anyhow::bail!("no recognized RAW files found in the given paths");
    }

    let base_settings = build_base_settings(&cli)?;
    let report = batch::run_batch(&inputs, &base_settings, &cli.output)?;

    let (succeeded, failed) = (report.succeeded(), report.failed());
    println!("{succeeded} converted, {failed} failed, {} total", inputs.len());

    if failed > 0 {
        anyhow::bail!("{failed} file(s) failed to convert");
    }
    Ok(())
}
