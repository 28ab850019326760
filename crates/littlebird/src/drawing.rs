//! Drawables: things that render onto a [`Canvas`] under a view transform.
//!
//! [`Tiling`] does the real work: it repeats a [`Unit`] over a lattice,
//! drawing only the copies that can be visible. The other drawables are
//! small combinators for building a pattern out of tilings.
//!
//! ## Rust Lesson #10: Trait Objects vs Generics
//!
//! The wrappers ([`WithFill`], [`ModifyTransformation`]) are generic over
//! what they wrap, so nesting them costs nothing at runtime. [`Join`] has to
//! hold drawables of *different* types in one list, so it stores
//! `Box<dyn Drawable>` and pays one virtual call per child.

use std::fmt;

use crate::canvas::{Canvas, Colour};
use crate::covering::{CoveringError, CoveringStats, generate_covering, generate_covering_with_stats};
use crate::geometry::{Basis, Rectangle, Transformation, Vector};
use crate::log::{error, warn};

/// How many lattice steps either side of the rounded recentring cell are
/// searched for one that overlaps the canvas.
const RECENTRE_REACH: i32 = 3;

/// Draw callback for a unit: appends path segments in unit coordinates.
pub type DrawFn = fn(&mut dyn Canvas);

/// The motif repeated by a tiling, in unit coordinates.
///
/// `draw` must only build path segments and must leave the canvas
/// transform as it found it. `bounding_box` must contain everything `draw`
/// produces.
#[derive(Clone, Copy)]
pub struct Unit {
    pub draw: DrawFn,
    pub bounding_box: Rectangle,
}

impl fmt::Debug for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Unit").field("bounding_box", &self.bounding_box).finish_non_exhaustive()
    }
}

/// Anything that can render itself under a view transformation.
pub trait Drawable {
    fn render(&self, canvas: &mut dyn Canvas, transformation: &Transformation);
}

impl<D: Drawable + ?Sized> Drawable for Box<D> {
    fn render(&self, canvas: &mut dyn Canvas, transformation: &Transformation) {
        (**self).render(canvas, transformation)
    }
}

// ============================================================================
// Tiling
// ============================================================================

/// A unit repeated over the lattice spanned by `basis`.
#[derive(Debug, Clone, Copy)]
pub struct Tiling {
    unit: Unit,
    basis: Basis,
    canvas: Rectangle,
    debug_bounds: bool,
}

/// A unit placed in pixel space: its bounding box and the transform that
/// takes unit coordinates to pixels.
#[derive(Debug, Clone, Copy)]
struct PlacedUnit {
    unit: Unit,
    placement: Transformation,
    bounding_box: Rectangle,
}

impl PlacedUnit {
    fn new(unit: Unit, transformation: Transformation) -> Self {
        Self {
            unit,
            placement: transformation,
            bounding_box: unit.bounding_box.transform(&transformation),
        }
    }

    fn translated(&self, offset: Vector) -> Self {
        Self {
            unit: self.unit,
            placement: self.placement.translated(offset),
            bounding_box: self.bounding_box.translate(offset),
        }
    }

    fn draw_at(&self, canvas: &mut dyn Canvas, offset: Vector) {
        let origin = offset + self.placement.translation;
        canvas.save();
        canvas.translate(origin.x, origin.y);
        canvas.scale(self.placement.scaling, self.placement.scaling);
        (self.unit.draw)(canvas);
        canvas.restore();
    }
}

/// Build a tiling of `unit` over `basis`, clipped to `canvas` (pixels).
pub fn create_tiling(unit: Unit, basis: Basis, canvas: Rectangle) -> Tiling {
    Tiling {
        unit,
        basis,
        canvas,
        debug_bounds: false,
    }
}

impl Tiling {
    /// Outline the recentred unit's bounding box in red when rendering.
    pub fn with_debug_bounds(mut self, debug_bounds: bool) -> Self {
        self.debug_bounds = debug_bounds;
        self
    }

    pub fn basis(&self) -> &Basis {
        &self.basis
    }

    pub fn canvas(&self) -> &Rectangle {
        &self.canvas
    }

    /// Transform the unit and basis, then shift the unit by a whole lattice
    /// vector so its bounding box sits near the canvas center.
    ///
    /// The shift is a lattice translation, so it never changes the picture;
    /// it only keeps the covering search anchored on screen however far the
    /// view has been panned.
    ///
    /// Rounding the coefficients only finds the nearest lattice point for an
    /// orthogonal basis. On a sheared one (the wing lattice) the rounded cell
    /// can miss the canvas while a neighbour overlaps it, so the cells within
    /// [`RECENTRE_REACH`] of the rounded one are compared and the overlapping
    /// one closest to the center wins.
    fn place(&self, transformation: &Transformation) -> (PlacedUnit, Basis) {
        let basis = self.basis.scale(transformation.scaling);
        let unit = PlacedUnit::new(self.unit, *transformation);
        let target = self.canvas.center();
        let rounded = basis.to_coefficients(target - unit.bounding_box.center()).round();
        let canvas_square = self.canvas.containing_square();

        // (misses canvas, distance to center, offset)
        let mut best: Option<(bool, f64, Vector)> = None;
        for da in -RECENTRE_REACH..=RECENTRE_REACH {
            for db in -RECENTRE_REACH..=RECENTRE_REACH {
                let candidate = rounded + Vector::new(da as f64, db as f64);
                let offset = basis.from_coefficients(candidate);
                let bounds = unit.bounding_box.translate(offset);
                let misses = !bounds.containing_square().overlaps(&canvas_square);
                let distance = (bounds.center() - target).norm();
                let better = match best {
                    None => true,
                    Some((best_misses, best_distance, _)) => {
                        (misses, distance) < (best_misses, best_distance)
                    }
                };
                if better {
                    best = Some((misses, distance, offset));
                }
            }
        }

        match best {
            Some((misses, _, offset)) => {
                if misses {
                    warn!("tiling: no cell near the canvas center overlaps the canvas");
                }
                (unit.translated(offset), basis)
            }
            None => (unit, basis),
        }
    }

    /// The lattice coefficients drawn for `transformation`, relative to the
    /// recentred unit.
    pub fn covering(&self, transformation: &Transformation) -> Result<Vec<Vector>, CoveringError> {
        let (unit, basis) = self.place(transformation);
        generate_covering(&unit.bounding_box, &basis, &self.canvas)
    }

    /// [`Tiling::covering`] plus the search counters.
    pub fn covering_with_stats(
        &self,
        transformation: &Transformation,
    ) -> Result<(Vec<Vector>, CoveringStats), CoveringError> {
        let (unit, basis) = self.place(transformation);
        generate_covering_with_stats(&unit.bounding_box, &basis, &self.canvas)
    }

    /// Pixel offsets of every drawn copy relative to the unmoved view
    /// placement. Pan-invariant up to a lattice vector.
    pub fn cell_origins(&self, transformation: &Transformation) -> Result<Vec<Vector>, CoveringError> {
        let (unit, basis) = self.place(transformation);
        let cells = generate_covering(&unit.bounding_box, &basis, &self.canvas)?;
        Ok(cells
            .into_iter()
            .map(|c| basis.from_coefficients(c) + unit.placement.translation)
            .collect())
    }
}

impl Drawable for Tiling {
    fn render(&self, canvas: &mut dyn Canvas, transformation: &Transformation) {
        let (unit, basis) = self.place(transformation);

        if self.debug_bounds {
            let bounds = unit.bounding_box;
            canvas.save();
            canvas.set_line_width(5.0);
            canvas.set_stroke_colour(Colour::RED);
            canvas.stroke_rect(bounds.top_left.x, bounds.top_left.y, bounds.width(), bounds.height());
            canvas.restore();
        }

        let cells = match generate_covering(&unit.bounding_box, &basis, &self.canvas) {
            Ok(cells) => cells,
            Err(e) => {
                error!("tiling skipped: {}", e);
                return;
            }
        };

        for coefficients in cells {
            unit.draw_at(canvas, basis.from_coefficients(coefficients));
        }
    }
}

// ============================================================================
// Combinators
// ============================================================================

/// Collects the inner drawable into one path and fills it once.
#[derive(Debug, Clone, Copy)]
pub struct WithFill<D> {
    inner: D,
    colour: Option<Colour>,
}

/// Fill `inner` as a single path. With `None`, the canvas's current fill
/// colour is used.
pub fn with_fill<D: Drawable>(inner: D, colour: Option<Colour>) -> WithFill<D> {
    WithFill { inner, colour }
}

impl<D: Drawable> Drawable for WithFill<D> {
    fn render(&self, canvas: &mut dyn Canvas, transformation: &Transformation) {
        canvas.begin_path();
        self.inner.render(canvas, transformation);
        if let Some(colour) = self.colour {
            canvas.set_fill_colour(colour);
        }
        canvas.fill();
    }
}

/// Renders the inner drawable under a rewritten transformation.
#[derive(Clone, Copy)]
pub struct ModifyTransformation<D, F> {
    inner: D,
    modify: F,
}

pub fn with_modify_transformation<D, F>(inner: D, modify: F) -> ModifyTransformation<D, F>
where
    D: Drawable,
    F: Fn(&Transformation) -> Transformation,
{
    ModifyTransformation { inner, modify }
}

impl<D, F> Drawable for ModifyTransformation<D, F>
where
    D: Drawable,
    F: Fn(&Transformation) -> Transformation,
{
    fn render(&self, canvas: &mut dyn Canvas, transformation: &Transformation) {
        let modified = (self.modify)(transformation);
        self.inner.render(canvas, &modified);
    }
}

/// Renders its children in order, later ones on top.
pub struct Join {
    drawables: Vec<Box<dyn Drawable>>,
}

pub fn join_drawables(drawables: Vec<Box<dyn Drawable>>) -> Join {
    Join { drawables }
}

impl Join {
    pub fn len(&self) -> usize {
        self.drawables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drawables.is_empty()
    }
}

impl Drawable for Join {
    fn render(&self, canvas: &mut dyn Canvas, transformation: &Transformation) {
        for drawable in &self.drawables {
            drawable.render(canvas, transformation);
        }
    }
}

/// Solid fill of the whole canvas, independent of the view.
#[derive(Debug, Clone, Copy)]
pub struct Background {
    canvas: Rectangle,
    colour: Colour,
}

/// White background covering `canvas`.
pub fn draw_background(canvas: Rectangle) -> Background {
    Background {
        canvas,
        colour: Colour::WHITE,
    }
}

impl Background {
    pub fn with_colour(mut self, colour: Colour) -> Self {
        self.colour = colour;
        self
    }
}

impl Drawable for Background {
    fn render(&self, canvas: &mut dyn Canvas, _transformation: &Transformation) {
        canvas.set_fill_colour(self.colour);
        canvas.fill_rect(
            self.canvas.top_left.x,
            self.canvas.top_left.y,
            self.canvas.width(),
            self.canvas.height(),
        );
    }
}

// ============================================================================
// TESTS
// ============================================================================
