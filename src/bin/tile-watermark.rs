use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use tile_watermark::{ProcessOptions, ProcessResult, ResizeTarget, Watermarker};

#[derive(Parser)]
#[command(
    name = "tile-watermark",
    about = "Stamp a watermark across an image in a centered repeating grid",
    version,
    after_help = "Simple usage: tile-watermark -i photo.jpg -w logo.png  (writes marked.jpg)\n\n\
                  The image is resized to 1024px wide (landscape) or 768px tall (portrait)\n\
                  before marking unless --no-resize is given."
)]
struct Cli {
    /// Image file or directory to mark
    #[arg(short, long, default_value = "image.jpg")]
    image: PathBuf,

    /// Watermark image
    #[arg(short, long, default_value = "watermark.png")]
    watermark: PathBuf,

    /// Output file, or output directory when the image is a directory
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// JPEG quality (1-100)
    #[arg(long, default_value_t = tile_watermark::DEFAULT_JPEG_QUALITY)]
    quality: u8,

    /// Keep the source resolution instead of resizing
    #[arg(long)]
    no_resize: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all non-error output
    #[arg(short, long)]
    quiet: bool,
}

const DEFAULT_OUTPUT: &str = "marked.jpg";

/// Default log filter when `RUST_LOG` is unset.
fn log_level(quiet: bool, verbose: bool) -> &'static str {
    if quiet {
        "warn"
    } else if verbose {
        "debug"
    } else {
        "info"
    }
}

/// Output file for a single-image run.
fn single_output(output: Option<&Path>) -> PathBuf {
    output.map_or_else(|| PathBuf::from(DEFAULT_OUTPUT), Path::to_path_buf)
}

fn resize_target(no_resize: bool) -> Option<ResizeTarget> {
    if no_resize {
        None
    } else {
        Some(ResizeTarget::default())
    }
}

fn init_logging(opts: &ProcessOptions) {
    let level = log_level(opts.quiet, opts.verbose);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn main() {
    let cli = Cli::parse();

    if !(1..=100).contains(&cli.quality) {
        eprintln!("Error: Quality must be between 1 and 100");
        process::exit(1);
    }

    let opts = ProcessOptions {
        quality: cli.quality,
        resize: resize_target(cli.no_resize),
        verbose: cli.verbose,
        quiet: cli.quiet,
    };
    init_logging(&opts);

    let marker = match Watermarker::from_path(&cli.watermark) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("Fatal: {e}");
            process::exit(1);
        }
    };

    let input_path = cli.image.as_path();
    if !input_path.exists() {
        eprintln!("Error: Input path does not exist: {}", input_path.display());
        process::exit(1);
    }

    if !opts.quiet {
        let (w, h) = marker.watermark().dimensions();
        eprintln!("Watermark: {} ({w}x{h})", cli.watermark.display());
        eprintln!();
    }

    let results = if input_path.is_dir() {
        let Some(output_dir) = &cli.output else {
            eprintln!("Error: Output directory is required for batch processing");
            eprintln!("Usage: tile-watermark -i <input_dir> -w <watermark> -o <output_dir>");
            process::exit(1);
        };
        marker.process_directory(input_path, output_dir, &opts)
    } else {
        let output_path = single_output(cli.output.as_deref());
        vec![marker.process_file(input_path, &output_path, &opts)]
    };

    let mut success_count = 0u32;
    let mut fail_count = 0u32;

    for r in &results {
        print_result(r, &opts);
        if r.success {
            success_count += 1;
        } else {
            fail_count += 1;
        }
    }

    if results.len() > 1 && !opts.quiet {
        eprintln!();
        eprint!("[Summary] Marked: {success_count}");
        if fail_count > 0 {
            eprint!(", Failed: {fail_count}");
        }
        eprintln!(" (Total: {})", results.len());
    }

    if fail_count > 0 {
        process::exit(1);
    }
}

fn display_name(path: &Path) -> String {
    path.file_name().map_or_else(
        || path.display().to_string(),
        |f| f.to_string_lossy().to_string(),
    )
}

fn print_result(result: &ProcessResult, opts: &ProcessOptions) {
    let filename = display_name(&result.path);

    if result.success {
        if opts.quiet {
            return;
        }
        match &result.output {
            Some(out) => eprintln!("[OK] {filename} -> {}", out.display()),
            None => eprintln!("[OK] {filename}"),
        }
    } else {
        eprintln!("[FAIL] {filename}: {}", result.message);
    }

    if opts.verbose && result.success {
        eprintln!("  -> {}", result.message);
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults_match_the_upload_client() {
        let cli = Cli::try_parse_from(["tile-watermark"]).unwrap();
        assert_eq!(cli.image, PathBuf::from("image.jpg"));
        assert_eq!(cli.watermark, PathBuf::from("watermark.png"));
        assert_eq!(cli.output, None);
        assert_eq!(cli.quality, 95);
        assert!(!cli.no_resize);
        assert_eq!(single_output(cli.output.as_deref()), PathBuf::from("marked.jpg"));
    }

    #[test]
    fn explicit_flags_are_parsed() {
        let cli = Cli::try_parse_from([
            "tile-watermark",
            "-i",
            "photos",
            "-w",
            "logo.png",
            "-o",
            "out/final.png",
            "--quality",
            "80",
            "--no-resize",
            "-v",
        ])
        .unwrap();
        assert_eq!(cli.image, PathBuf::from("photos"));
        assert_eq!(cli.watermark, PathBuf::from("logo.png"));
        assert_eq!(
            single_output(cli.output.as_deref()),
            PathBuf::from("out/final.png")
        );
        assert_eq!(cli.quality, 80);
        assert_eq!(resize_target(cli.no_resize), None);
        assert!(cli.verbose);
    }

    #[test]
    fn resize_is_on_by_default() {
        assert_eq!(resize_target(false), Some(ResizeTarget::default()));
    }

    #[test]
    fn log_level_follows_verbosity_flags() {
        assert_eq!(log_level(false, false), "info");
        assert_eq!(log_level(false, true), "debug");
        assert_eq!(log_level(true, false), "warn");
        assert_eq!(log_level(true, true), "warn");
    }

    #[test]
    fn quality_out_of_u8_range_is_rejected() {
        assert!(Cli::try_parse_from(["tile-watermark", "--quality", "300"]).is_err());
    }
}
