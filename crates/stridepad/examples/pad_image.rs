//! Example: pad an image with one of the border policies.
//!
//! Loads an image as RGBA8, copies it into a larger canvas at `(top, left)`
//! and extrapolates the border. Padding and policy come from an optional JSON
//! config; command-line flags override individual fields.
//!
//! A JSON report with sizes and timing is written next to the output image.
//!
//! Run from the workspace root:
//!   cargo run -p stridepad --example pad_image -- --help
//!   cargo run -p stridepad --example pad_image -- --input in.png --border reflect101 --pad 16

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result, bail};
use clap::Parser;
use image::{ImageReader, RgbaImage};
use serde::{Deserialize, Serialize};
use stridepad::{
    BorderSpec, BorderType, CopyMakeBorder, Image, ImageBatch, ImageBatchMut, ImageFormat,
    ImageView, Offset, Offsets, Stream,
};

// ── CLI ───────────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(about = "Pad an image using constant, replicate, reflect, wrap or reflect101 borders")]
struct Args {
    /// Input image (any format the `image` crate decodes)
    #[arg(long)]
    input: PathBuf,

    /// Output PNG path (default: <input stem>_padded.png next to input)
    #[arg(long)]
    out: Option<PathBuf>,

    /// JSON file with a `PadConfig`
    #[arg(long)]
    config: Option<PathBuf>,

    /// Border policy name or numeric code (0-4)
    #[arg(long)]
    border: Option<BorderType>,

    /// Same padding on all four sides
    #[arg(long)]
    pad: Option<u32>,

    #[arg(long)]
    top: Option<u32>,
    #[arg(long)]
    bottom: Option<u32>,
    #[arg(long)]
    left: Option<u32>,
    #[arg(long)]
    right: Option<u32>,

    /// Worker threads; 0 uses the global rayon pool
    #[arg(long, default_value_t = 0)]
    threads: usize,
}

// ── Config / report ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
struct PadConfig {
    spec: BorderSpec,
    top: u32,
    bottom: u32,
    left: u32,
    right: u32,
}

impl PadConfig {
    fn load(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)
            .with_context(|| format!("opening config {}", path.display()))?;
        serde_json::from_reader(file).with_context(|| format!("parsing config {}", path.display()))
    }

    fn apply_overrides(&mut self, args: &Args) {
        if let Some(border) = args.border {
            self.spec.border = border;
        }
        if let Some(pad) = args.pad {
            (self.top, self.bottom, self.left, self.right) = (pad, pad, pad, pad);
        }
        self.top = args.top.unwrap_or(self.top);
        self.bottom = args.bottom.unwrap_or(self.bottom);
        self.left = args.left.unwrap_or(self.left);
        self.right = args.right.unwrap_or(self.right);
    }
}

#[derive(Serialize)]
struct Report {
    input: String,
    output: String,
    config: PadConfig,
    src_size: [usize; 2],
    dst_size: [usize; 2],
    threads: usize,
    elapsed_ms: f64,
}

// ── Main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut cfg = match &args.config {
        Some(path) => PadConfig::load(path)?,
        None => PadConfig::default(),
    };
    cfg.apply_overrides(&args);

    let out_path = args.out.clone().unwrap_or_else(|| {
        let stem = args.input.file_stem().unwrap_or_default().to_string_lossy();
        let dir = args.input.parent().unwrap_or(Path::new("."));
        dir.join(format!("{stem}_padded.png"))
    });

    let rgba = ImageReader::open(&args.input)
        .with_context(|| format!("opening {}", args.input.display()))?
        .decode()
        .with_context(|| format!("decoding {}", args.input.display()))?
        .into_rgba8();

    let (width, height) = (rgba.width() as usize, rgba.height() as usize);
    let dst_width = width + cfg.left as usize + cfg.right as usize;
    let dst_height = height + cfg.top as usize + cfg.bottom as usize;
    if i32::try_from(cfg.top).is_err() || i32::try_from(cfg.left).is_err() {
        bail!("padding too large: top={}, left={}", cfg.top, cfg.left);
    }

    log::info!(
        "padding {width}x{height} -> {dst_width}x{dst_height} with {}",
        cfg.spec.border
    );

    let src = ImageView::from_slice(width, height, ImageFormat::RGBA8, width * 4, rgba.as_raw())
        .context("wrapping decoded image")?;
    let mut dst = Image::new(dst_width, dst_height, ImageFormat::RGBA8, 0)
        .context("allocating destination")?;

    let stream = match args.threads {
        0 => Stream::global(),
        n => Stream::with_threads(n).context("building thread pool")?,
    };

    let t0 = Instant::now();
    CopyMakeBorder::new(cfg.spec)
        .run(
            &stream,
            &ImageBatch::from(vec![src]),
            &mut ImageBatchMut::from(vec![dst.as_view_mut()]),
            &Offsets::from(Offset::new(cfg.top as i32, cfg.left as i32)),
        )
        .context("copy_make_border")?;
    let elapsed_ms = t0.elapsed().as_secs_f64() * 1e3;
    println!("padded in {elapsed_ms:.2} ms on {} threads", stream.num_threads());

    let view = dst.as_view();
    let mut packed = Vec::with_capacity(dst_width * dst_height * 4);
    for y in 0..dst_height {
        packed.extend_from_slice(view.row(y));
    }
    let out_img = RgbaImage::from_raw(dst_width as u32, dst_height as u32, packed)
        .context("building output image")?;
    out_img
        .save(&out_path)
        .with_context(|| format!("saving {}", out_path.display()))?;
    println!("image written to {}", out_path.display());

    let report_path = out_path.with_extension("json");
    let report = Report {
        input: args.input.display().to_string(),
        output: out_path.display().to_string(),
        config: cfg,
        src_size: [width, height],
        dst_size: [dst_width, dst_height],
        threads: stream.num_threads(),
        elapsed_ms,
    };
    let report_file = std::fs::File::create(&report_path)
        .with_context(|| format!("creating {}", report_path.display()))?;
    serde_json::to_writer_pretty(report_file, &report)
        .with_context(|| format!("writing JSON to {}", report_path.display()))?;

    println!("report written to {}", report_path.display());
    Ok(())
}
