//! Device-space path building shared by every canvas backend.
//!
//! A backend only has to put filled and stroked paths onto its surface.
//! [`PathCanvas`] handles everything else: the save/restore state stack,
//! transforming points into device space, and turning arcs into cubics.
//!
//! ## Rust Lesson #9: Generic Structs over Traits
//!
//! `PathCanvas<S: Surface>` is monomorphised for every surface type, so the
//! raster and SVG backends share this code with zero dynamic dispatch:
//!
//! ```rust,ignore
//! let mut canvas = PathCanvas::new(PixmapSurface::new(800, 600));
//! canvas.move_to(0.0, 0.0); // same code path for every S
//! ```

use std::f64::consts::TAU;

use lyon_geom::{Angle, Arc, CubicBezierSegment, point, vector};

use crate::canvas::{Canvas, Colour};
use crate::geometry::Vector;

// ============================================================================
// Affine transform
// ============================================================================

/// A 2D affine map: `x' = a·x + c·y + e`, `y' = b·x + d·y + f`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Affine {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Affine {
    pub const IDENTITY: Affine = Affine { a: 1.0, b: 0.0, c: 0.0, d: 1.0, e: 0.0, f: 0.0 };

    /// Compose a translation applied before `self`.
    pub fn pre_translate(&self, tx: f64, ty: f64) -> Affine {
        Affine {
            e: self.a * tx + self.c * ty + self.e,
            f: self.b * tx + self.d * ty + self.f,
            ..*self
        }
    }

    pub fn pre_scale(&self, sx: f64, sy: f64) -> Affine {
        Affine {
            a: self.a * sx,
            b: self.b * sx,
            c: self.c * sy,
            d: self.d * sy,
            ..*self
        }
    }

    pub fn pre_rotate(&self, angle: f64) -> Affine {
        let (sin, cos) = angle.sin_cos();
        Affine {
            a: self.a * cos + self.c * sin,
            b: self.b * cos + self.d * sin,
            c: self.c * cos - self.a * sin,
            d: self.d * cos - self.b * sin,
            ..*self
        }
    }

    #[inline]
    pub fn apply(&self, p: Vector) -> Vector {
        Vector::new(self.a * p.x + self.c * p.y + self.e, self.b * p.x + self.d * p.y + self.f)
    }

    /// Geometric-mean scale, used to map line widths into device space.
    pub fn scale_factor(&self) -> f64 {
        (self.a * self.d - self.b * self.c).abs().sqrt()
    }
}

impl Default for Affine {
    fn default() -> Self {
        Affine::IDENTITY
    }
}

// ============================================================================
// Paths
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathElement {
    MoveTo(Vector),
    LineTo(Vector),
    CubicTo(Vector, Vector, Vector),
    Close,
}

/// A path whose points are already in device space.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DevicePath {
    elements: Vec<PathElement>,
    current: Option<Vector>,
}

impl DevicePath {
    pub fn new() -> Self {
        Self::default()
    }

    /// Closed polygon through `points`.
    pub fn polygon(points: &[Vector]) -> Self {
        let mut path = DevicePath::new();
        if let Some((first, rest)) = points.split_first() {
            path.move_to(*first);
            for p in rest {
                path.line_to(*p);
            }
            path.close();
        }
        path
    }

    pub fn elements(&self) -> &[PathElement] {
        &self.elements
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn current_point(&self) -> Option<Vector> {
        self.current
    }

    pub fn clear(&mut self) {
        self.elements.clear();
        self.current = None;
    }

    pub fn move_to(&mut self, p: Vector) {
        self.elements.push(PathElement::MoveTo(p));
        self.current = Some(p);
    }

    /// Starts a new subpath when there is no current point.
    pub fn line_to(&mut self, p: Vector) {
        if self.current.is_none() {
            self.move_to(p);
            return;
        }
        self.elements.push(PathElement::LineTo(p));
        self.current = Some(p);
    }

    pub fn cubic_to(&mut self, ctrl1: Vector, ctrl2: Vector, to: Vector) {
        if self.current.is_none() {
            self.move_to(ctrl1);
        }
        self.elements.push(PathElement::CubicTo(ctrl1, ctrl2, to));
        self.current = Some(to);
    }

    pub fn close(&mut self) {
        if self.current.is_some() {
            self.elements.push(PathElement::Close);
        }
    }

    /// Every on-curve point of the path (control points excluded).
    pub fn on_curve_points(&self) -> impl Iterator<Item = Vector> + '_ {
        self.elements.iter().filter_map(|element| match *element {
            PathElement::MoveTo(p) | PathElement::LineTo(p) | PathElement::CubicTo(_, _, p) => Some(p),
            PathElement::Close => None,
        })
    }
}

// ============================================================================
// Arcs
// ============================================================================

/// Signed sweep of a canvas-style arc from `start` to `end`.
///
/// Clockwise (positive) unless `anticlockwise`. A requested difference of a
/// full turn or more draws the whole circle; otherwise the sweep is reduced
/// into `[0, 2π)` in the drawing direction.
pub fn arc_sweep(start: f64, end: f64, anticlockwise: bool) -> f64 {
    let (delta, sign) = if anticlockwise { (start - end, -1.0) } else { (end - start, 1.0) };
    if delta >= TAU {
        return sign * TAU;
    }
    sign * delta.rem_euclid(TAU)
}

/// A cubic Bézier piece of an arc: `(ctrl1, ctrl2, to)`.
pub type CubicPiece = (Vector, Vector, Vector);

/// Approximate a circular arc with cubic Béziers (in the arc's own space).
///
/// Returns the arc's start point and the pieces following it.
pub fn arc_to_cubics(
    center: Vector,
    radius: f64,
    start_angle: f64,
    end_angle: f64,
    anticlockwise: bool,
) -> (Vector, Vec<CubicPiece>) {
    let arc = Arc {
        center: point(center.x, center.y),
        radii: vector(radius, radius),
        start_angle: Angle::radians(start_angle),
        sweep_angle: Angle::radians(arc_sweep(start_angle, end_angle, anticlockwise)),
        x_rotation: Angle::radians(0.0),
    };

    let from = arc.from();
    let mut pieces = Vec::new();
    if arc.sweep_angle.radians != 0.0 {
        arc.for_each_cubic_bezier(&mut |segment: &CubicBezierSegment<f64>| {
            pieces.push((
                Vector::new(segment.ctrl1.x, segment.ctrl1.y),
                Vector::new(segment.ctrl2.x, segment.ctrl2.y),
                Vector::new(segment.to.x, segment.to.y),
            ));
        });
    }
    (Vector::new(from.x, from.y), pieces)
}

// ============================================================================
// Shared canvas implementation
// ============================================================================

/// The part of a canvas that differs between backends.
pub trait Surface {
    /// Fill a device-space path with the nonzero winding rule.
    fn fill_path(&mut self, path: &DevicePath, colour: Colour);

    /// Stroke a device-space path with a device-space line width.
    fn stroke_path(&mut self, path: &DevicePath, colour: Colour, width: f64);
}

/// Everything `save`/`restore` covers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasState {
    pub transform: Affine,
    pub fill: Colour,
    pub stroke: Colour,
    pub line_width: f64,
}

impl Default for CanvasState {
    fn default() -> Self {
        Self {
            transform: Affine::IDENTITY,
            fill: Colour::BLACK,
            stroke: Colour::BLACK,
            line_width: 1.0,
        }
    }
}

/// A [`Canvas`] built on a [`Surface`].
#[derive(Debug)]
pub struct PathCanvas<S> {
    surface: S,
    state: CanvasState,
    saved: Vec<CanvasState>,
    path: DevicePath,
}

impl<S: Surface> PathCanvas<S> {
    pub fn new(surface: S) -> Self {
        Self {
            surface,
            state: CanvasState::default(),
            saved: Vec::new(),
            path: DevicePath::new(),
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    pub fn state(&self) -> &CanvasState {
        &self.state
    }

    /// Number of unmatched `save` calls.
    pub fn depth(&self) -> usize {
        self.saved.len()
    }

    fn device(&self, x: f64, y: f64) -> Vector {
        self.state.transform.apply(Vector::new(x, y))
    }

    fn rect_path(&self, x: f64, y: f64, width: f64, height: f64) -> DevicePath {
        DevicePath::polygon(&[
            self.device(x, y),
            self.device(x + width, y),
            self.device(x + width, y + height),
            self.device(x, y + height),
        ])
    }
}

impl<S: Surface> Canvas for PathCanvas<S> {
    fn save(&mut self) {
        self.saved.push(self.state);
    }

    fn restore(&mut self) {
        // An unmatched restore is ignored.
        if let Some(state) = self.saved.pop() {
            self.state = state;
        }
    }

    fn translate(&mut self, x: f64, y: f64) {
        self.state.transform = self.state.transform.pre_translate(x, y);
    }

    fn scale(&mut self, sx: f64, sy: f64) {
        self.state.transform = self.state.transform.pre_scale(sx, sy);
    }

    fn rotate(&mut self, angle: f64) {
        self.state.transform = self.state.transform.pre_rotate(angle);
    }

    fn begin_path(&mut self) {
        self.path.clear();
    }

    fn move_to(&mut self, x: f64, y: f64) {
        let p = self.device(x, y);
        self.path.move_to(p);
    }

    fn line_to(&mut self, x: f64, y: f64) {
        let p = self.device(x, y);
        self.path.line_to(p);
    }

    fn arc(&mut self, x: f64, y: f64, radius: f64, start_angle: f64, end_angle: f64, anticlockwise: bool) {
        let (start, pieces) = arc_to_cubics(Vector::new(x, y), radius, start_angle, end_angle, anticlockwise);
        let transform = self.state.transform;
        self.path.line_to(transform.apply(start));
        for (ctrl1, ctrl2, to) in pieces {
            self.path.cubic_to(transform.apply(ctrl1), transform.apply(ctrl2), transform.apply(to));
        }
    }

    fn set_fill_colour(&mut self, colour: Colour) {
        self.state.fill = colour;
    }

    fn fill(&mut self) {
        if !self.path.is_empty() {
            self.surface.fill_path(&self.path, self.state.fill);
        }
    }

    fn set_stroke_colour(&mut self, colour: Colour) {
        self.state.stroke = colour;
    }

    fn set_line_width(&mut self, width: f64) {
        if width.is_finite() && width > 0.0 {
            self.state.line_width = width;
        }
    }

    fn stroke_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        let path = self.rect_path(x, y, width, height);
        let device_width = self.state.line_width * self.state.transform.scale_factor();
        self.surface.stroke_path(&path, self.state.stroke, device_width);
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        let path = self.rect_path(x, y, width, height);
        self.surface.fill_path(&path, self.state.fill);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[derive(Default)]
    struct Sink {
        fills: Vec<(DevicePath, Colour)>,
        strokes: Vec<(DevicePath, Colour, f64)>,
    }

    impl Surface for Sink {
        fn fill_path(&mut self, path: &DevicePath, colour: Colour) {
            self.fills.push((path.clone(), colour));
        }

        fn stroke_path(&mut self, path: &DevicePath, colour: Colour, width: f64) {
            self.strokes.push((path.clone(), colour, width));
        }
    }

    fn close(a: Vector, b: Vector) -> bool {
        (a - b).norm() < 1e-9
    }

    #[test]
    fn affine_composes_like_a_canvas() {
        let t = Affine::IDENTITY.pre_translate(10.0, 20.0).pre_scale(2.0, 2.0).pre_rotate(FRAC_PI_2);
        // rotate first: (1, 0) -> (0, 1), scale -> (0, 2), translate -> (10, 22)
        assert!(close(t.apply(Vector::new(1.0, 0.0)), Vector::new(10.0, 22.0)));
        assert!((t.scale_factor() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn sweep_follows_canvas_rules() {
        assert!((arc_sweep(0.0, FRAC_PI_2, false) - FRAC_PI_2).abs() < 1e-12);
        assert!((arc_sweep(FRAC_PI_2, 0.0, false) - 1.5 * PI).abs() < 1e-12);
        assert!((arc_sweep(FRAC_PI_2, 11.0 * PI / 6.0, true) + 2.0 * PI / 3.0).abs() < 1e-12);
        assert_eq!(arc_sweep(0.0, 3.0 * PI, false), TAU);
        assert_eq!(arc_sweep(1.0, 1.0, false), 0.0);
    }

    #[test]
    fn arc_pieces_stay_on_the_circle() {
        let center = Vector::new(3.0, -1.0);
        let (start, pieces) = arc_to_cubics(center, 2.0, 0.0, PI, false);
        assert!(close(start, Vector::new(5.0, -1.0)));
        assert!(!pieces.is_empty());
        for (_, _, to) in &pieces {
            assert!(((*to - center).norm() - 2.0).abs() < 1e-9);
        }
        let (_, _, last) = pieces[pieces.len() - 1];
        assert!(close(last, Vector::new(1.0, -1.0)));
    }

    #[test]
    fn points_are_fixed_when_added() {
        let mut canvas = PathCanvas::new(Sink::default());
        canvas.translate(100.0, 0.0);
        canvas.move_to(1.0, 1.0);
        canvas.save();
        canvas.scale(10.0, 10.0);
        canvas.line_to(1.0, 0.0);
        canvas.restore();
        canvas.line_to(0.0, 0.0);
        canvas.fill();

        let sink = canvas.into_surface();
        let points: Vec<Vector> = sink.fills[0].0.on_curve_points().collect();
        assert_eq!(points, vec![Vector::new(101.0, 1.0), Vector::new(110.0, 0.0), Vector::new(100.0, 0.0)]);
    }

    #[test]
    fn save_restore_covers_styles() {
        let mut canvas = PathCanvas::new(Sink::default());
        canvas.set_fill_colour(Colour::RED);
        canvas.save();
        canvas.set_fill_colour(Colour::WHITE);
        canvas.restore();
        canvas.restore(); // unmatched: ignored
        assert_eq!(canvas.state().fill, Colour::RED);
        assert_eq!(canvas.depth(), 0);
    }

    #[test]
    fn stroke_width_scales_with_transform() {
        let mut canvas = PathCanvas::new(Sink::default());
        canvas.scale(3.0, 3.0);
        canvas.set_line_width(5.0);
        canvas.stroke_rect(0.0, 0.0, 1.0, 1.0);
        let sink = canvas.into_surface();
        assert_eq!(sink.strokes.len(), 1);
        assert!((sink.strokes[0].2 - 15.0).abs() < 1e-12);
    }

    #[test]
    fn empty_fill_reaches_nothing() {
        let mut canvas = PathCanvas::new(Sink::default());
        canvas.begin_path();
        canvas.fill();
        assert!(canvas.surface().fills.is_empty());
    }
}
