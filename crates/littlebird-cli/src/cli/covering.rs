//! Covering command: dump the lattice cells each tiling would draw as JSON.

use serde::Serialize;

use littlebird::pattern::LAYERS;
use littlebird::{Motif, Transformation};

use super::common::{parse_view_args, print_view_flags};
use crate::error::CliError;

/// JSON output for one layer of one motif.
#[derive(Serialize)]
struct JsonCovering {
    tiling: Motif,
    layer: usize,
    cells: Vec<[i64; 2]>,
    overlap_tests: usize,
    rows: usize,
}

#[derive(Serialize)]
struct JsonReport {
    canvas: [u32; 2],
    translation: [f64; 2],
    scaling: f64,
    total_cells: usize,
    coverings: Vec<JsonCovering>,
}

/// Execute the covering command.
pub fn cmd_covering(args: &[String]) -> Result<(), CliError> {
    let (config, rest) = parse_view_args(args)?;

    let mut motifs: Vec<Motif> = Motif::all().to_vec();
    let mut i = 0;
    while i < rest.len() {
        match rest[i].as_str() {
            "-t" | "--tiling" => {
                i += 1;
                let name = rest.get(i).map(String::as_str).unwrap_or("");
                let motif = Motif::from_name(name)
                    .ok_or_else(|| CliError::usage(format!("unknown tiling '{}' (use star or wing)", name)))?;
                motifs = vec![motif];
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
    let transformation = config.initial_transformation();

    let mut coverings = Vec::new();
    for motif in motifs {
        let tiling = motif.tiling(canvas);
        for layer in 0..LAYERS {
            let view: Transformation = motif.layer_transformation(layer, &transformation);
            let (cells, stats) = tiling.covering_with_stats(&view)?;
            coverings.push(JsonCovering {
                tiling: motif,
                layer,
                cells: cells.iter().map(|c| [c.x as i64, c.y as i64]).collect(),
                overlap_tests: stats.overlap_tests,
                rows: stats.rows,
            });
        }
    }

    let report = JsonReport {
        canvas: [config.canvas.width, config.canvas.height],
        translation: config.view.translation,
        scaling: config.view.scaling,
        total_cells: coverings.iter().map(|c| c.cells.len()).sum(),
        coverings,
    };

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn print_usage() {
    eprintln!("Usage: littlebird covering [--tiling star|wing] [options]");
    eprintln!();
    eprintln!("Prints, for each layer, the lattice coefficients of every drawn cell.");
    eprintln!();
    print_view_flags();
}
