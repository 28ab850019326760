//! Render command: one frame to PNG or SVG.

use std::fs;
use std::path::Path;
use std::time::Instant;

use littlebird::create_little_bird_pattern;

use super::common::{frame_work, parse_view_args, print_view_flags};
use crate::error::CliError;
use crate::skia::{render_pixmap, to_image};
use crate::svg::render_svg;

#[derive(Debug, Clone, Copy, PartialEq)]
enum OutputFormat {
    Png,
    Svg,
}

impl OutputFormat {
    fn from_path(path: &str) -> Option<Self> {
        let extension = Path::new(path).extension()?.to_str()?.to_lowercase();
        match extension.as_str() {
            "png" => Some(OutputFormat::Png),
            "svg" => Some(OutputFormat::Svg),
            _ => None,
        }
    }
}

/// Execute the render command.
pub fn cmd_render(args: &[String]) -> Result<(), CliError> {
    let (config, rest) = parse_view_args(args)?;

    let mut output: Option<String> = None;
    let mut i = 0;
    while i < rest.len() {
        match rest[i].as_str() {
            "-o" | "--output" => {
                i += 1;
                output = rest.get(i).cloned();
            }
            "-h" | "--help" => {
                print_usage();
                return Ok(());
            }
            other => return Err(CliError::usage(format!("unexpected argument '{}'", other))),
        }
        i += 1;
    }

    let output = output.ok_or_else(|| CliError::usage("render requires -o <file.png|file.svg>"))?;
    let format = OutputFormat::from_path(&output)
        .ok_or_else(|| CliError::usage(format!("cannot tell the format of '{}' (use .png or .svg)", output)))?;

    let canvas = config.canvas_rect();
    let transformation = config.initial_transformation();
    let pattern = create_little_bird_pattern(canvas, &config.pattern);
    let (width, height) = (config.canvas.width, config.canvas.height);

    let start = Instant::now();
    match format {
        OutputFormat::Png => {
            let pixmap = render_pixmap(&pattern, &transformation, width, height)?;
            to_image(pixmap)?.save(&output)?;
        }
        OutputFormat::Svg => {
            fs::write(&output, render_svg(&pattern, &transformation, width, height))?;
        }
    }
    let elapsed = start.elapsed();

    let work = frame_work(canvas, &transformation)?;
    eprintln!("Rendered {} cells in {:?}", work.cells, elapsed);
    eprintln!("Wrote: {} ({}x{})", output, width, height);
    Ok(())
}

fn print_usage() {
    eprintln!("Usage: littlebird render -o <file.png|file.svg> [options]");
    eprintln!();
    print_view_flags();
}
