//! Benchmark command implementation.

use std::time::Instant;

use littlebird::{RecordingCanvas, create_little_bird_pattern, Drawable};

use super::common::{frame_work, parse_view_args, print_view_flags};
use crate::error::CliError;
use crate::skia::render_pixmap;

/// Zoom factors swept relative to the configured scaling.
const ZOOM_SWEEP: [f64; 6] = [4.0, 2.0, 1.0, 0.5, 0.25, 0.125];

/// Execute the benchmark command.
pub fn cmd_benchmark(args: &[String]) -> Result<(), CliError> {
    let (config, rest) = parse_view_args(args)?;

    let mut frames = 5usize;
    let mut i = 0;
    while i < rest.len() {
        match rest[i].as_str() {
            "-n" | "--frames" => {
                i += 1;
                frames = rest
                    .get(i)
                    .and_then(|v| v.parse().ok())
                    .filter(|n| *n > 0)
                    .ok_or_else(|| CliError::usage("--frames requires a positive integer"))?;
            }
            "-h" | "--help" => {
                print_usage();
                return Ok(());
            }
            other => return Err(CliError::usage(format!("unexpected argument '{}'", other))),
        }
        i += 1;
    }

    let canvas = config.canvas_rect();
    let (width, height) = (config.canvas.width, config.canvas.height);
    let pattern = create_little_bird_pattern(canvas, &config.pattern);
    let base = config.initial_transformation();

    println!();
    println!("═══════════════════════════════════════════════════════════════");
    println!("  LITTLE BIRD BENCHMARK: {}x{}, {} frames per zoom", width, height, frames);
    println!("═══════════════════════════════════════════════════════════════");
    println!(
        "  {:>8}  {:>7}  {:>5}  {:>9}  {:>11}  {:>11}",
        "scaling", "cells", "rows", "overlaps", "record(ms)", "raster(ms)"
    );

    for factor in ZOOM_SWEEP {
        let mut view = base;
        view.zoom_about(canvas.center(), factor);

        let work = frame_work(canvas, &view)?;

        let start = Instant::now();
        let mut issued = 0;
        for _ in 0..frames {
            let mut recorder = RecordingCanvas::new();
            pattern.render(&mut recorder, &view);
            issued = recorder.count(|c| matches!(c, littlebird::Command::Save));
        }
        let record_ms = start.elapsed().as_secs_f64() * 1000.0 / frames as f64;

        let start = Instant::now();
        for _ in 0..frames {
            render_pixmap(&pattern, &view, width, height)?;
        }
        let raster_ms = start.elapsed().as_secs_f64() * 1000.0 / frames as f64;

        println!(
            "  {:>8.2}  {:>7}  {:>5}  {:>9}  {:>11.2}  {:>11.2}",
            view.scaling, work.cells, work.rows, work.overlap_tests, record_ms, raster_ms
        );
        if issued < work.cells {
            eprintln!("warning: recorded {} unit draws for {} cells", issued, work.cells);
        }
    }
    println!("═══════════════════════════════════════════════════════════════");
    Ok(())
}

fn print_usage() {
    eprintln!("Usage: littlebird benchmark [-n <frames>] [options]");
    eprintln!();
    eprintln!("Times covering and full renders across a zoom sweep.");
    eprintln!();
    print_view_flags();
}
