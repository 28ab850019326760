//! Common utilities shared across CLI commands.

use std::path::Path;

use littlebird::pattern::LAYERS;
use littlebird::{CoveringError, CoveringStats, Motif, Rectangle, Transformation};

use crate::config::Config;
use crate::error::CliError;

/// Build the effective [`Config`] from `--config` plus the view flags
/// (`--width`, `--height`, `--scale`, `--tx`, `--ty`, `--debug-bounds`).
///
/// Flags override the file regardless of order. Arguments that are not view
/// flags are returned for the command to interpret.
pub fn parse_view_args(args: &[String]) -> Result<(Config, Vec<String>), CliError> {
    let mut config_path: Option<&str> = None;
    let mut overrides: Vec<(&str, &str)> = Vec::new();
    let mut debug_bounds = false;
    let mut rest = Vec::new();

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            flag @ ("--config" | "--width" | "--height" | "--scale" | "--tx" | "--ty") => {
                i += 1;
                let value = args
                    .get(i)
                    .map(String::as_str)
                    .ok_or_else(|| CliError::usage(format!("{} requires a value", flag)))?;
                if flag == "--config" {
                    config_path = Some(value);
                } else {
                    overrides.push((flag, value));
                }
            }
            "--debug-bounds" => debug_bounds = true,
            other => rest.push(other.to_string()),
        }
        i += 1;
    }

    let mut config = match config_path {
        Some(path) => Config::load(Path::new(path))?,
        None => Config::default(),
    };

    for (flag, value) in overrides {
        match flag {
            "--width" => config.canvas.width = parse_number(flag, value)?,
            "--height" => config.canvas.height = parse_number(flag, value)?,
            "--scale" => config.view.scaling = parse_number(flag, value)?,
            "--tx" => config.view.translation[0] = parse_number(flag, value)?,
            "--ty" => config.view.translation[1] = parse_number(flag, value)?,
            _ => {}
        }
    }
    if debug_bounds {
        config.pattern.debug_bounds = true;
    }

    config.validate()?;
    Ok((config, rest))
}

fn parse_number<T: std::str::FromStr>(flag: &str, value: &str) -> Result<T, CliError> {
    value
        .parse()
        .map_err(|_| CliError::usage(format!("invalid value for {}: '{}'", flag, value)))
}

/// Lines of help shared by every command that takes view flags.
pub fn print_view_flags() {
    eprintln!("View options:");
    eprintln!("  --config <file>   YAML configuration");
    eprintln!("  --width <px>      Canvas width (default: 1200)");
    eprintln!("  --height <px>     Canvas height (default: 800)");
    eprintln!("  --scale <n>       Pixels per unit (default: 40)");
    eprintln!("  --tx <px>         Horizontal translation (default: 600)");
    eprintln!("  --ty <px>         Vertical translation (default: 400)");
    eprintln!("  --debug-bounds    Outline each tiling's recentred unit");
}

/// Covering work for every layer of every motif under `transformation`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameWork {
    pub cells: usize,
    pub overlap_tests: usize,
    pub rows: usize,
}

/// Sum the covering sizes the Little Bird pattern issues for one frame.
pub fn frame_work(canvas: Rectangle, transformation: &Transformation) -> Result<FrameWork, CoveringError> {
    let mut work = FrameWork::default();
    for motif in Motif::all() {
        let tiling = motif.tiling(canvas);
        for layer in 0..LAYERS {
            let layer_view = motif.layer_transformation(layer, transformation);
            let (cells, stats): (Vec<_>, CoveringStats) = tiling.covering_with_stats(&layer_view)?;
            work.cells += cells.len();
            work.overlap_tests += stats.overlap_tests;
            work.rows += stats.rows;
        }
    }
    Ok(work)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn flags_override_defaults() {
        let (config, rest) =
            parse_view_args(&args(&["-o", "out.png", "--width", "300", "--scale", "12.5", "--tx", "-4"])).unwrap();
        assert_eq!(config.canvas.width, 300);
        assert_eq!(config.canvas.height, 800);
        assert_eq!(config.view.scaling, 12.5);
        assert_eq!(config.view.translation, [-4.0, 400.0]);
        assert_eq!(rest, args(&["-o", "out.png"]));
    }

    #[test]
    fn bad_values_are_usage_errors() {
        assert!(matches!(parse_view_args(&args(&["--width", "wide"])), Err(CliError::Usage(_))));
        assert!(matches!(parse_view_args(&args(&["--scale"])), Err(CliError::Usage(_))));
        assert!(matches!(parse_view_args(&args(&["--scale", "0"])), Err(CliError::Config(_))));
    }

    #[test]
    fn frame_work_counts_all_tilings() {
        let config = Config::default();
        let work = frame_work(config.canvas_rect(), &config.initial_transformation()).unwrap();
        assert!(work.cells > 0);
        assert!(work.rows >= 2 * LAYERS);
        assert!(work.overlap_tests >= work.cells);
    }
}
