//! The drawing capability the pattern renders against.
//!
//! [`Canvas`] mirrors an immediate-mode 2D canvas: a save/restore stack of
//! transform + style state, path construction in the current transform, and
//! fills/strokes. Anything providing these calls can render the pattern.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// An immediate-mode 2D drawing target.
///
/// Path points are transformed by the current transform at the moment they
/// are added, so `save`/`restore` inside a path does not move points that
/// were already added. `save`/`restore` cover the transform and all style
/// state (fill colour, stroke colour, line width).
pub trait Canvas {
    fn save(&mut self);
    fn restore(&mut self);

    fn translate(&mut self, x: f64, y: f64);
    fn scale(&mut self, sx: f64, sy: f64);
    /// Rotate by `angle` radians (clockwise on a y-down screen).
    fn rotate(&mut self, angle: f64);

    /// Discard the current path.
    fn begin_path(&mut self);
    fn move_to(&mut self, x: f64, y: f64);
    fn line_to(&mut self, x: f64, y: f64);
    /// Circular arc around `(x, y)`. If the path has a current point, a
    /// straight line joins it to the arc's start.
    fn arc(&mut self, x: f64, y: f64, radius: f64, start_angle: f64, end_angle: f64, anticlockwise: bool);

    fn set_fill_colour(&mut self, colour: Colour);
    /// Fill the current path (nonzero winding) with the fill colour.
    fn fill(&mut self);

    fn set_stroke_colour(&mut self, colour: Colour);
    fn set_line_width(&mut self, width: f64);
    fn stroke_rect(&mut self, x: f64, y: f64, width: f64, height: f64);

    /// Fill a rectangle without touching the current path.
    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64);
}

/// An sRGB colour with alpha.
///
/// Serialises as a CSS-like string: `"black"`, `"#b05d25"`,
/// `"rgb(176, 93, 37)"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Colour {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

/// Error for an unparseable colour string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid colour '{0}' (expected a name, #rrggbb or rgb(r, g, b))")]
pub struct ColourError(pub String);

impl Colour {
    pub const BLACK: Colour = Colour::rgb(0, 0, 0);
    pub const WHITE: Colour = Colour::rgb(255, 255, 255);
    pub const RED: Colour = Colour::rgb(255, 0, 0);

    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// `#rrggbb`, used for SVG attributes.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    pub fn parse(s: &str) -> Result<Colour, ColourError> {
        let trimmed = s.trim();
        let lower = trimmed.to_lowercase();
        let invalid = || ColourError(trimmed.to_string());

        match lower.as_str() {
            "black" => return Ok(Colour::BLACK),
            "white" => return Ok(Colour::WHITE),
            "red" => return Ok(Colour::RED),
            _ => {}
        }

        if let Some(hex) = lower.strip_prefix('#') {
            if hex.len() != 6 {
                return Err(invalid());
            }
            let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
            return Ok(Colour::rgb(channel(0)?, channel(2)?, channel(4)?));
        }

        if let Some(body) = lower.strip_prefix("rgb(").and_then(|rest| rest.strip_suffix(')')) {
            let parts: Vec<&str> = body.split(',').map(str::trim).collect();
            if parts.len() != 3 {
                return Err(invalid());
            }
            let channel = |p: &str| p.parse::<u8>().map_err(|_| invalid());
            return Ok(Colour::rgb(channel(parts[0])?, channel(parts[1])?, channel(parts[2])?));
        }

        Err(invalid())
    }
}

impl fmt::Display for Colour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Colour::BLACK => write!(f, "black"),
            Colour::WHITE => write!(f, "white"),
            Colour { r, g, b, a: 255 } => write!(f, "rgb({}, {}, {})", r, g, b),
            Colour { r, g, b, a } => write!(f, "rgba({}, {}, {}, {:.3})", r, g, b, a as f64 / 255.0),
        }
    }
}

impl FromStr for Colour {
    type Err = ColourError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Colour::parse(s)
    }
}

impl TryFrom<String> for Colour {
    type Error = ColourError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Colour::parse(&value)
    }
}

impl From<Colour> for String {
    fn from(colour: Colour) -> String {
        colour.to_string()
    }
}
