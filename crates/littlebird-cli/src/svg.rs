//! Vector backend: a [`Canvas`] that writes SVG.
//!
//! Coordinates are transformed before they are written, so the document is
//! a flat list of `<path>` elements with no nested transforms.

use std::fmt::Write as _;

use littlebird::path::{DevicePath, PathCanvas, PathElement, Surface};
use littlebird::{Colour, Drawable, Transformation};

/// Accumulates `<path>` elements.
pub struct SvgSurface {
    width: u32,
    height: u32,
    body: String,
}

pub type SvgCanvas = PathCanvas<SvgSurface>;

impl SvgSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            body: String::new(),
        }
    }

    pub fn finish(self) -> String {
        let mut svg = String::new();
        svg.push_str(&format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">
"#,
            w = self.width,
            h = self.height
        ));
        svg.push_str(&self.body);
        svg.push_str("</svg>\n");
        svg
    }

    fn push_path(&mut self, path: &DevicePath, attributes: &str) {
        let d = path_data(path);
        if d.is_empty() {
            return;
        }
        let _ = writeln!(self.body, "  <path d=\"{}\" {}/>", d, attributes);
    }
}

impl Surface for SvgSurface {
    fn fill_path(&mut self, path: &DevicePath, colour: Colour) {
        let attributes = format!("fill=\"{}\"{}", colour.to_hex(), opacity("fill-opacity", colour));
        self.push_path(path, &attributes);
    }

    fn stroke_path(&mut self, path: &DevicePath, colour: Colour, width: f64) {
        let attributes = format!(
            "fill=\"none\" stroke=\"{}\" stroke-width=\"{:.2}\"{}",
            colour.to_hex(),
            width,
            opacity("stroke-opacity", colour)
        );
        self.push_path(path, &attributes);
    }
}

fn opacity(attribute: &str, colour: Colour) -> String {
    if colour.a == 255 {
        String::new()
    } else {
        format!(" {}=\"{:.3}\"", attribute, colour.a as f64 / 255.0)
    }
}

fn path_data(path: &DevicePath) -> String {
    let mut d = String::new();
    for element in path.elements() {
        // Writing to a String cannot fail.
        let _ = match *element {
            PathElement::MoveTo(p) => write!(d, "M{:.2},{:.2}", p.x, p.y),
            PathElement::LineTo(p) => write!(d, "L{:.2},{:.2}", p.x, p.y),
            PathElement::CubicTo(c1, c2, p) => write!(
                d,
                "C{:.2},{:.2} {:.2},{:.2} {:.2},{:.2}",
                c1.x, c1.y, c2.x, c2.y, p.x, p.y
            ),
            PathElement::Close => write!(d, "Z"),
        };
    }
    d
}

/// Render `drawable` as a standalone SVG document.
pub fn render_svg(drawable: &dyn Drawable, transformation: &Transformation, width: u32, height: u32) -> String {
    let mut canvas: SvgCanvas = PathCanvas::new(SvgSurface::new(width, height));
    drawable.render(&mut canvas, transformation);
    canvas.into_surface().finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use littlebird::{Canvas, Rectangle, Vector, draw_background};

    #[test]
    fn background_becomes_one_path() {
        let rect = Rectangle::new(Vector::ZERO, Vector::new(10.0, 5.0));
        let svg = render_svg(&draw_background(rect), &Transformation::IDENTITY, 10, 5);
        assert!(svg.starts_with("<?xml"));
        assert!(svg.contains(r#"viewBox="0 0 10 5""#));
        assert!(svg.contains(r##"<path d="M0.00,0.00L10.00,0.00L10.00,5.00L0.00,5.00Z" fill="#ffffff"/>"##));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn coordinates_are_pre_transformed() {
        let mut canvas: SvgCanvas = PathCanvas::new(SvgSurface::new(100, 100));
        canvas.translate(50.0, 50.0);
        canvas.scale(2.0, 2.0);
        canvas.begin_path();
        canvas.move_to(1.0, 1.0);
        canvas.line_to(2.0, 1.0);
        canvas.fill();
        canvas.set_stroke_colour(Colour::RED);
        canvas.set_line_width(5.0);
        canvas.stroke_rect(0.0, 0.0, 1.0, 1.0);

        let svg = canvas.into_surface().finish();
        assert_eq!(svg.matches("<path").count(), 2);
        assert!(svg.contains("M52.00,52.00L54.00,52.00"));
        assert!(svg.contains(r##"stroke="#ff0000" stroke-width="10.00""##));
        assert!(!svg.contains("transform"));
    }
}
