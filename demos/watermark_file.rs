//! Tile a watermark over a single image.
//!
//! Usage:
//! ```sh
//! cargo run --example watermark_file -- image.jpg watermark.png marked.jpg
//! ```

use std::env;
use std::path::Path;
use std::process;

use tile_watermark::{ProcessOptions, Watermarker};

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() < 4 {
        eprintln!("Usage: {} <image> <watermark> <output>", args[0]);
        process::exit(1);
    }

    let marker = Watermarker::from_path(Path::new(&args[2])).expect("failed to load watermark");
    let opts = ProcessOptions::default();
    let result = marker.process_file(args[1].as_ref(), args[3].as_ref(), &opts);

    if result.success {
        println!("Done: {}", result.message);
    } else {
        eprintln!("Error: {}", result.message);
        process::exit(1);
    }
}
