//! The Little Bird pattern: four interlocking layers of stars and wings.
//!
//! Each layer is one star tiling and one wing tiling filled in the same
//! colour. The four layers share lattices and are told apart only by a
//! per-layer offset, which is what makes the birds interlock.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::canvas::{Canvas, Colour};
use crate::drawing::{
    Drawable, Join, Tiling, Unit, create_tiling, draw_background, join_drawables, with_fill,
    with_modify_transformation,
};
use crate::geometry::{Basis, Rectangle, Transformation, Vector};

const SQRT_3: f64 = 1.732_050_807_568_877_2;

/// Number of coloured layers in the pattern.
pub const LAYERS: usize = 4;

/// Six-pointed star, centred on the origin.
pub const STAR: Unit = Unit {
    draw: draw_star,
    bounding_box: Rectangle::new(Vector::new(-1.0, -1.0), Vector::new(1.0, 1.0)),
};

/// Three-bladed wing, centred on `(0, 2)`.
pub const WING: Unit = Unit {
    draw: draw_wing,
    bounding_box: Rectangle::new(
        Vector::new(-WING_REACH, -WING_REACH + 2.0),
        Vector::new(WING_REACH, WING_REACH + 2.0),
    ),
};

const WING_REACH: f64 = 3.0 * SQRT_3 / 2.0;

pub const STAR_BASIS: Basis = Basis::new(Vector::new(0.0, 12.0), Vector::new(2.0 * SQRT_3, 0.0));
pub const WING_BASIS: Basis = Basis::new(Vector::new(-SQRT_3, 3.0), Vector::new(8.0 * SQRT_3, 0.0));

fn draw_star(canvas: &mut dyn Canvas) {
    let r = SQRT_3 - 1.0;
    canvas.move_to(r, 0.0);
    canvas.save();
    for _ in 0..6 {
        canvas.line_to(r, 0.0);
        canvas.line_to(0.5 * r, 0.25 * r);
        canvas.rotate(PI / 3.0);
    }
    canvas.line_to(r, 0.0);
    canvas.restore();
}

fn draw_wing(canvas: &mut dyn Canvas) {
    let r = SQRT_3 - 1.0;
    canvas.save();
    canvas.translate(0.0, 2.0);
    for _ in 0..3 {
        canvas.move_to(0.5 * r, r * SQRT_3 / 2.0);
        canvas.arc(0.5 * SQRT_3, 1.5, 1.0, 4.0 * PI / 3.0, 3.0 * PI / 2.0, false);
        canvas.arc(SQRT_3 / 2.0, -0.5, 1.0, PI / 2.0, 11.0 * PI / 6.0, true);
        canvas.arc(SQRT_3 / 2.0, -1.5, 1.0, PI / 6.0, 2.0 * PI / 3.0, false);
        canvas.line_to(r, 0.0);
        canvas.line_to(0.5 * r, r * SQRT_3 / 2.0);
        canvas.rotate(2.0 * PI / 3.0);
    }
    canvas.restore();
}

// ============================================================================
// Tiling kinds
// ============================================================================

/// The two motifs the pattern is made of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Motif {
    Star,
    Wing,
}

impl Motif {
    pub fn all() -> &'static [Motif] {
        &[Motif::Star, Motif::Wing]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Motif::Star => "star",
            Motif::Wing => "wing",
        }
    }

    pub fn from_name(name: &str) -> Option<Motif> {
        match name.to_lowercase().as_str() {
            "star" | "stars" => Some(Motif::Star),
            "wing" | "wings" => Some(Motif::Wing),
            _ => None,
        }
    }

    pub fn unit(&self) -> Unit {
        match self {
            Motif::Star => STAR,
            Motif::Wing => WING,
        }
    }

    pub fn basis(&self) -> Basis {
        match self {
            Motif::Star => STAR_BASIS,
            Motif::Wing => WING_BASIS,
        }
    }

    /// Offset of layer `layer` in unit coordinates.
    pub fn layer_offset(&self, layer: usize) -> Vector {
        let i = layer as f64;
        match self {
            Motif::Star => Vector::new(i * SQRT_3, 3.0 * i),
            Motif::Wing => Vector::new(2.0 * SQRT_3 * i, 0.0),
        }
    }

    pub fn tiling(&self, canvas: Rectangle) -> Tiling {
        create_tiling(self.unit(), self.basis(), canvas)
    }

    /// The view a given layer of this motif is rendered under.
    pub fn layer_transformation(&self, layer: usize, transformation: &Transformation) -> Transformation {
        transformation.translated(self.layer_offset(layer).scale(transformation.scaling))
    }
}

// ============================================================================
// Assembly
// ============================================================================

/// Colours and switches for [`create_little_bird_pattern`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatternConfig {
    /// One fill per layer, bottom layer first.
    pub colours: [Colour; LAYERS],
    pub background: Colour,
    /// Outline each tiling's recentred unit in red.
    pub debug_bounds: bool,
}

impl Default for PatternConfig {
    fn default() -> Self {
        Self {
            colours: [
                Colour::BLACK,
                Colour::rgb(176, 93, 37),
                Colour::rgb(35, 98, 45),
                Colour::rgb(81, 122, 184),
            ],
            background: Colour::WHITE,
            debug_bounds: false,
        }
    }
}

/// Background, then per layer a filled star tiling and a filled wing tiling.
pub fn create_little_bird_pattern(canvas: Rectangle, config: &PatternConfig) -> Join {
    let mut drawables: Vec<Box<dyn Drawable>> =
        vec![Box::new(draw_background(canvas).with_colour(config.background))];

    for (layer, colour) in config.colours.iter().enumerate() {
        for motif in Motif::all().iter().copied() {
            let tiling = motif.tiling(canvas).with_debug_bounds(config.debug_bounds);
            drawables.push(Box::new(with_modify_transformation(
                with_fill(tiling, Some(*colour)),
                move |t: &Transformation| motif.layer_transformation(layer, t),
            )));
        }
    }

    join_drawables(drawables)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recording::{Command, RecordingCanvas};

    fn screen() -> Rectangle {
        Rectangle::new(Vector::ZERO, Vector::new(1200.0, 800.0))
    }

    fn view() -> Transformation {
        Transformation::new(Vector::new(600.0, 400.0), 40.0)
    }

    fn painted_points(unit: Unit) -> Vec<Vector> {
        let mut canvas = RecordingCanvas::new();
        canvas.begin_path();
        (unit.draw)(&mut canvas);
        canvas.fill();
        assert_eq!(canvas.depth(), 0);
        canvas.painted().fills[0].0.on_curve_points().collect()
    }

    #[test]
    fn units_stay_inside_their_bounding_boxes() {
        for unit in [STAR, WING] {
            let b = unit.bounding_box;
            let points = painted_points(unit);
            assert!(!points.is_empty());
            for p in points {
                assert!(
                    p.x >= b.top_left.x - 1e-9
                        && p.x <= b.bottom_right.x + 1e-9
                        && p.y >= b.top_left.y - 1e-9
                        && p.y <= b.bottom_right.y + 1e-9,
                    "{:?} outside {:?}",
                    p,
                    b
                );
            }
        }
    }

    #[test]
    fn star_has_six_points() {
        let mut canvas = RecordingCanvas::new();
        draw_star(&mut canvas);
        assert_eq!(canvas.count(|c| matches!(c, Command::Rotate(_))), 6);
        assert_eq!(canvas.count(|c| matches!(c, Command::LineTo(..))), 13);
    }

    #[test]
    fn wing_has_three_blades_of_three_arcs() {
        let mut canvas = RecordingCanvas::new();
        draw_wing(&mut canvas);
        assert_eq!(canvas.count(|c| matches!(c, Command::Arc { .. })), 9);
        assert_eq!(canvas.count(|c| matches!(c, Command::Arc { anticlockwise: true, .. })), 3);
        assert_eq!(canvas.count(|c| matches!(c, Command::MoveTo(..))), 3);
    }

    #[test]
    fn layer_offsets() {
        assert_eq!(Motif::Star.layer_offset(0), Vector::ZERO);
        assert_eq!(Motif::Wing.layer_offset(0), Vector::ZERO);
        assert_eq!(Motif::Star.layer_offset(2), Vector::new(2.0 * SQRT_3, 6.0));
        assert_eq!(Motif::Wing.layer_offset(3), Vector::new(6.0 * SQRT_3, 0.0));

        let t = Motif::Star.layer_transformation(1, &view());
        assert!((t.translation.x - (600.0 + 40.0 * SQRT_3)).abs() < 1e-9);
        assert!((t.translation.y - 520.0).abs() < 1e-9);
        assert_eq!(t.scaling, 40.0);
    }

    #[test]
    fn motif_names() {
        for motif in Motif::all() {
            assert_eq!(Motif::from_name(motif.name()), Some(*motif));
        }
        assert_eq!(Motif::from_name("WINGS"), Some(Motif::Wing));
        assert_eq!(Motif::from_name("bird"), None);
    }

    #[test]
    fn pattern_is_background_plus_eight_fills() {
        let config = PatternConfig::default();
        let pattern = create_little_bird_pattern(screen(), &config);
        assert_eq!(pattern.len(), 1 + 2 * LAYERS);

        let mut canvas = RecordingCanvas::new();
        pattern.render(&mut canvas, &view());

        assert_eq!(canvas.count(|c| matches!(c, Command::FillRect(..))), 1);
        assert_eq!(canvas.count(|c| *c == Command::Fill), 2 * LAYERS);
        assert_eq!(canvas.depth(), 0);

        let fills: Vec<Colour> = canvas.painted().fills.iter().map(|(_, colour)| *colour).collect();
        let mut expected = vec![Colour::WHITE];
        for colour in config.colours {
            expected.push(colour);
            expected.push(colour);
        }
        assert_eq!(fills, expected);
    }

    #[test]
    fn debug_config_outlines_every_tiling() {
        let config = PatternConfig {
            debug_bounds: true,
            ..PatternConfig::default()
        };
        let mut canvas = RecordingCanvas::new();
        create_little_bird_pattern(screen(), &config).render(&mut canvas, &view());
        assert_eq!(canvas.count(|c| matches!(c, Command::StrokeRect(..))), 2 * LAYERS);
    }

    #[test]
    fn config_defaults_fill_missing_fields() {
        let config: PatternConfig = serde_json::from_str(r#"{"debug_bounds": true}"#).unwrap();
        assert!(config.debug_bounds);
        assert_eq!(config.colours, PatternConfig::default().colours);

        let custom: PatternConfig = serde_json::from_str(
            r##"{"colours": ["red", "#000000", "rgb(1, 2, 3)", "white"], "background": "black"}"##,
        )
        .unwrap();
        assert_eq!(custom.colours[0], Colour::RED);
        assert_eq!(custom.background, Colour::BLACK);
    }
}
