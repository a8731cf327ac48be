// ============================================================================
// Headless mode: one image in, one operation, one image out
// ============================================================================
//
// Usage examples:
//   tonelab -i photo.png --op butterworth-lowpass --cutoff 30 --order 2 -o lp.png
//   tonelab -i photo.png --op gamma --gamma 0.4           (writes photo_gamma.jpg)
//   warplab -i kiwi.jpg --op rotate --angle 45 --expand -o turned.jpg
//   warplab -i kiwi.jpg --op translate --dx 30 --dy -10 --edge wrap --format png
//
// No window is opened. The same session, kernels and encoder as the GUI are
// used, so the defaults match the GUI exactly.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use clap::{Parser, ValueEnum};

use crate::commands::{ToneOp, ToneSettings, Warp, WarpKind, WarpOptions};
use crate::error::Result;
use crate::io::{self, DEFAULT_QUALITY, SaveFormat};
use crate::logger;
use crate::ops::{ButterworthParams, EdgeMode, Interpolation};
use crate::session::Session;

/// Returns `true` when `--input`/`-i` is present in the real process arguments.
/// Used by `main()` to route before creating an eframe window.
pub fn is_cli_mode() -> bool {
    std::env::args().any(|a| a == "--input" || a == "-i" || a.starts_with("--input="))
}

// ============================================================================
// Arguments
// ============================================================================

/// Output options shared by both programs.
#[derive(clap::Args, Debug, Clone)]
pub struct OutputArgs {
    /// Output file. Defaults to `<input stem>_<op>.<ext>` next to the input.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format: png, jpeg, bmp, tga, tiff.
    /// When omitted, the format is inferred from --output's extension.
    #[arg(short, long, value_name = "FORMAT")]
    pub format: Option<SaveFormat>,

    /// JPEG quality (1-100).
    #[arg(short, long, default_value_t = DEFAULT_QUALITY, value_name = "1-100",
          value_parser = clap::value_parser!(u8).range(1..=100))]
    pub quality: u8,

    /// Echo log lines to stderr and print timing.
    #[arg(short, long)]
    pub verbose: bool,
}

/// tonelab: grayscale point and frequency filters.
#[derive(Parser, Debug)]
#[command(name = "tonelab", version, about = "Grayscale point and frequency-domain filters")]
pub struct ToneArgs {
    /// Input image (converted to 8-bit grayscale).
    #[arg(short, long, value_name = "FILE")]
    pub input: PathBuf,

    /// Operation to apply.
    #[arg(long, value_enum)]
    pub op: ToneOp,

    /// Gamma exponent.
    #[arg(long, default_value_t = 0.5)]
    pub gamma: f64,

    /// Butterworth cutoff radius D0 (pixels from the spectrum centre).
    #[arg(long, default_value_t = 30.0)]
    pub cutoff: f64,

    /// Butterworth order n.
    #[arg(long, default_value_t = 2)]
    pub order: u32,

    #[command(flatten)]
    pub out: OutputArgs,
}

impl ToneArgs {
    pub fn settings(&self) -> ToneSettings {
        ToneSettings {
            gamma: self.gamma,
            butterworth: ButterworthParams {
                cutoff: self.cutoff,
                order: self.order,
            },
        }
    }
}

/// warplab: geometric and spatial transforms of colour images.
#[derive(Parser, Debug)]
#[command(name = "warplab", version, about = "Colour image translate, rotate, zoom, blur and wave")]
pub struct WarpArgs {
    /// Input image (converted to 8-bit RGB).
    #[arg(short, long, value_name = "FILE")]
    pub input: PathBuf,

    /// Transform to apply.
    #[arg(long, value_enum)]
    pub op: WarpKind,

    /// Horizontal shift in pixels (translate).
    #[arg(long, default_value_t = 30, allow_hyphen_values = true)]
    pub dx: i64,

    /// Vertical shift in pixels (translate).
    #[arg(long, default_value_t = 30, allow_hyphen_values = true)]
    pub dy: i64,

    /// Counter-clockwise angle in degrees (rotate).
    #[arg(long, default_value_t = 45.0, allow_hyphen_values = true)]
    pub angle: f64,

    /// Grow the canvas to hold the whole rotated image (rotate).
    #[arg(long)]
    pub expand: bool,

    /// Scale factor (zoom).
    #[arg(long, default_value_t = 1.5)]
    pub factor: f64,

    /// Gaussian standard deviation in pixels (blur).
    #[arg(long, default_value_t = 2.0)]
    pub sigma: f64,

    /// Wave amplitude in pixels (wave).
    #[arg(long, default_value_t = 10.0, allow_hyphen_values = true)]
    pub amplitude: f64,

    /// Edge mode for translate/rotate: constant[:v], reflect, mirror, nearest, wrap.
    /// Defaults to constant for translate and reflect for rotate.
    #[arg(long, value_name = "MODE")]
    pub edge: Option<EdgeMode>,

    /// Interpolation: nearest, bilinear, bicubic.
    #[arg(long, default_value = "bilinear", value_name = "METHOD")]
    pub interp: Interpolation,

    #[command(flatten)]
    pub out: OutputArgs,
}

impl WarpArgs {
    pub fn warp(&self) -> Warp {
        match self.op {
            WarpKind::Translate => Warp::Translate {
                dx: self.dx as f64,
                dy: self.dy as f64,
            },
            WarpKind::Rotate => Warp::Rotate {
                angle: self.angle,
                expand: self.expand,
            },
            WarpKind::Zoom => Warp::Zoom { factor: self.factor },
            WarpKind::Blur => Warp::Blur { sigma: self.sigma },
            WarpKind::Wave => Warp::Wave { amplitude: self.amplitude },
        }
    }

    pub fn options(&self) -> WarpOptions {
        let mut opts = WarpOptions {
            interpolation: self.interp,
            ..WarpOptions::default()
        };
        if let Some(edge) = self.edge {
            opts.translate_edge = edge;
            opts.rotate_edge = edge;
        }
        opts
    }
}

// ============================================================================
// Public entry points
// ============================================================================

/// Run tonelab headless. `0` on success, `1` on any failure.
pub fn run_tone(args: ToneArgs) -> ExitCode {
    let start = Instant::now();
    report(run_tone_inner(&args), &args.out, start)
}

/// Run warplab headless. `0` on success, `1` on any failure.
pub fn run_warp(args: WarpArgs) -> ExitCode {
    let start = Instant::now();
    report(run_warp_inner(&args), &args.out, start)
}

fn run_tone_inner(args: &ToneArgs) -> Result<PathBuf> {
    let settings = args.settings();
    let op = args.op;

    let mut session = Session::new();
    session.load_with(&args.input, io::load_gray)?;
    session.apply(op.label(), |img| op.apply(img, &settings))?;

    let slug = op.to_possible_value().map(|v| v.get_name().to_string());
    save(&session, &args.input, slug.as_deref().unwrap_or("out"), &args.out)
}

fn run_warp_inner(args: &WarpArgs) -> Result<PathBuf> {
    let warp = args.warp();
    let opts = args.options();

    let mut session = Session::new();
    session.load_with(&args.input, io::load_rgb)?;
    session.apply(&warp.describe(), |img| warp.apply(img, &opts))?;

    let slug = args.op.to_possible_value().map(|v| v.get_name().to_string());
    save(&session, &args.input, slug.as_deref().unwrap_or("out"), &args.out)
}

fn save<I>(session: &Session<I>, input: &Path, slug: &str, out: &OutputArgs) -> Result<PathBuf>
where
    I: Clone + Into<image::DynamicImage>,
{
    let path = output_path(input, out.output.as_deref(), out.format, slug);
    match out.format {
        Some(format) => session.save_as(&path, format, out.quality)?,
        None => session.save(&path, out.quality)?,
    };
    Ok(path)
}

fn report(outcome: Result<PathBuf>, out: &OutputArgs, start: Instant) -> ExitCode {
    match outcome {
        Ok(path) => {
            if out.verbose {
                println!(
                    "  -> {} ({:.0}ms)",
                    path.display(),
                    start.elapsed().as_secs_f64() * 1000.0
                );
                if let Some(log) = logger::log_path() {
                    println!("  log: {}", log.display());
                }
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Compute the output path.
///
/// Priority:
/// 1. `--output` (explicit path)
/// 2. Fallback: next to the input, `<stem>_<slug>.<ext>` where the extension
///    comes from `--format` or defaults to jpg
fn output_path(
    input: &Path,
    output: Option<&Path>,
    format: Option<SaveFormat>,
    slug: &str,
) -> PathBuf {
    if let Some(out) = output {
        return out.to_path_buf();
    }
    let ext = format.unwrap_or_default().extension();
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    let parent = input.parent().unwrap_or(Path::new("."));
    parent.join(format!("{}_{}.{}", stem, slug, ext))
}
