//! littlebird - terminal viewer and renderer for the Little Bird tiling
//!
//! Usage:
//!   littlebird [view] [options]         Launch TUI
//!   littlebird render -o <file> [opts]  Write one frame (PNG or SVG)
//!   littlebird covering [opts]          Dump tiling coverings as JSON
//!   littlebird benchmark [opts]         Time covering + rendering

mod cli;
mod config;
mod error;
mod input;
mod skia;
mod svg;
mod viewer;

use std::env;

use cli::{cmd_benchmark, cmd_covering, cmd_render, parse_view_args, print_view_flags};
use error::CliError;

fn main() {
    // Logs go to stderr; stdout carries command output
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();

    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        if matches!(e, CliError::Usage(_)) {
            eprintln!("Run 'littlebird help' for usage.");
        }
        std::process::exit(1);
    }
}

fn run(args: &[String]) -> Result<(), CliError> {
    let command = args.get(1).map(String::as_str).unwrap_or("view");
    let rest: &[String] = args.get(2..).unwrap_or(&[]);

    match command {
        "render" => cmd_render(rest),
        "covering" => cmd_covering(rest),
        "benchmark" => cmd_benchmark(rest),
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        "view" => cmd_view(rest),
        // Bare flags launch the viewer
        flag if flag.starts_with("--") => cmd_view(&args[1..]),
        other => Err(CliError::usage(format!("unknown command '{}'", other))),
    }
}

fn cmd_view(args: &[String]) -> Result<(), CliError> {
    let (config, rest) = parse_view_args(args)?;
    if let Some(extra) = rest.first() {
        return Err(CliError::usage(format!("unexpected argument '{}'", extra)));
    }
    viewer::run_tui(config)
}

fn print_usage() {
    eprintln!("littlebird - infinite Little Bird tiling in the terminal");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  littlebird [view] [options]            Launch TUI");
    eprintln!("  littlebird render -o <file.png|.svg>   Render one frame");
    eprintln!("  littlebird covering [--tiling star|wing]");
    eprintln!("  littlebird benchmark [-n <frames>]");
    eprintln!("  littlebird help");
    eprintln!();
    print_view_flags();
    eprintln!();
    eprintln!("TUI Controls:");
    eprintln!("  WASD / arrows  Pan");
    eprintln!("  + / -          Zoom about the centre");
    eprintln!("  mouse drag     Pan");
    eprintln!("  mouse wheel    Zoom about the cursor");
    eprintln!("  0 / r          Reset view");
    eprintln!("  b              Toggle bounding-box outlines");
    eprintln!("  q / Esc        Quit");
    eprintln!();
    eprintln!("Logging: set RUST_LOG (e.g. RUST_LOG=littlebird=debug), default warn.");
}
