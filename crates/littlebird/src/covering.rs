//! Lattice covering search.
//!
//! Given the bounding box of a unit, a lattice basis and a target rectangle,
//! find every integer coefficient pair `(a, b)` such that the bounding box
//! shifted by `a * v + b * w` still overlaps the target.
//!
//! The coefficient range is not known up front, so instead of scanning a
//! rectangle of coefficients we discover it row by row:
//!
//! 1. Walk left and right from `(0, 0)` to find the centre row.
//! 2. Step one row up (then down), seeding the left/right walks from the
//!    previous row's endpoints. Consecutive rows overlap heavily, so each
//!    seed is already close to the new endpoint.
//! 3. Stop at the first row with no overlapping cell.
//!
//! Work is proportional to the number of cells returned, not to the area of
//! the target.
//!
//! Both rectangles are widened to their containing squares before testing.
//! That over-approximates (a few returned cells may not touch the target)
//! but never drops a cell that does.

use thiserror::Error;

use crate::geometry::{Basis, Rectangle, Vector};
use crate::log::debug;

/// Errors from the covering search.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoveringError {
    /// Range endpoints are on different rows. Indicates a seeding bug.
    #[error("range endpoints must share a row ({left} != {right})")]
    UnalignedRange { left: f64, right: f64 },

    /// Range endpoints are reversed. Indicates a seeding bug.
    #[error("range endpoints must be ordered by x ({left} > {right})")]
    UnorderedRange { left: f64, right: f64 },

    /// The basis vectors are collinear; the lattice has no finite covering.
    #[error("lattice basis is degenerate (determinant {determinant})")]
    DegenerateBasis { determinant: f64 },
}

/// A contiguous run of coefficients `left.x ..= right.x` on row `left.y`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HorizontalRange {
    left: Vector,
    right: Vector,
}

impl HorizontalRange {
    /// Create a range, checking that both ends share a row and are ordered.
    pub fn new(left: Vector, right: Vector) -> Result<Self, CoveringError> {
        if left.y != right.y {
            return Err(CoveringError::UnalignedRange { left: left.y, right: right.y });
        }
        if left.x > right.x {
            return Err(CoveringError::UnorderedRange { left: left.x, right: right.x });
        }
        Ok(Self { left, right })
    }

    #[inline]
    pub fn left(&self) -> Vector {
        self.left
    }

    #[inline]
    pub fn right(&self) -> Vector {
        self.right
    }

    /// Row index shared by both ends.
    #[inline]
    pub fn y(&self) -> f64 {
        self.left.y
    }

    /// Number of cells. Never zero.
    #[inline]
    pub fn len(&self) -> usize {
        (self.right.x - self.left.x) as usize + 1
    }

    /// Iterate the coefficients left to right.
    pub fn iter(&self) -> HorizontalRangeIter {
        HorizontalRangeIter {
            x: self.left.x,
            right: self.right.x,
            y: self.left.y,
        }
    }
}

impl IntoIterator for HorizontalRange {
    type Item = Vector;
    type IntoIter = HorizontalRangeIter;

    fn into_iter(self) -> HorizontalRangeIter {
        self.iter()
    }
}

impl IntoIterator for &HorizontalRange {
    type Item = Vector;
    type IntoIter = HorizontalRangeIter;

    fn into_iter(self) -> HorizontalRangeIter {
        self.iter()
    }
}

/// Iterator over the cells of a [`HorizontalRange`].
#[derive(Debug, Clone)]
pub struct HorizontalRangeIter {
    x: f64,
    right: f64,
    y: f64,
}

impl Iterator for HorizontalRangeIter {
    type Item = Vector;

    fn next(&mut self) -> Option<Vector> {
        if self.x > self.right {
            return None;
        }
        let v = Vector::new(self.x, self.y);
        self.x += 1.0;
        Some(v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = if self.x > self.right {
            0
        } else {
            (self.right - self.x) as usize + 1
        };
        (n, Some(n))
    }
}

impl ExactSizeIterator for HorizontalRangeIter {}

/// Counters from one covering search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CoveringStats {
    /// Number of translated-overlap evaluations.
    pub overlap_tests: usize,
    /// Number of non-empty rows found.
    pub rows: usize,
}

/// Return the basis coefficients of every translation by which
/// `bounding_box` can be shifted while still overlapping `canvas`.
///
/// The untranslated `bounding_box` is expected to overlap `canvas`; if it
/// does not, the result is empty.
pub fn generate_covering(
    bounding_box: &Rectangle,
    basis: &Basis,
    canvas: &Rectangle,
) -> Result<Vec<Vector>, CoveringError> {
    generate_covering_with_stats(bounding_box, basis, canvas).map(|(coefficients, _)| coefficients)
}

/// Same as [`generate_covering`], also returning search counters.
pub fn generate_covering_with_stats(
    bounding_box: &Rectangle,
    basis: &Basis,
    canvas: &Rectangle,
) -> Result<(Vec<Vector>, CoveringStats), CoveringError> {
    if basis.is_degenerate() {
        return Err(CoveringError::DegenerateBasis { determinant: basis.determinant() });
    }

    let mut probe = OverlapProbe::new(bounding_box, basis, canvas);

    if !probe.overlaps(Vector::ZERO) {
        debug!("covering: origin cell misses the canvas, nothing to draw");
        return Ok((Vec::new(), probe.stats(0)));
    }

    let left_most = probe.search_left(Vector::ZERO);
    let right_most = probe.search_right(Vector::ZERO);
    let center_range = HorizontalRange::new(left_most, right_most)?;

    let mut coefficients: Vec<Vector> = center_range.iter().collect();
    let mut rows = 1;

    for step in [1.0, -1.0] {
        for range in RowSearch::new(&mut probe, center_range, step) {
            coefficients.extend(range?);
            rows += 1;
        }
    }

    let stats = probe.stats(rows);
    debug!(
        "covering: {} cells in {} rows, {} overlap tests",
        coefficients.len(),
        stats.rows,
        stats.overlap_tests
    );
    Ok((coefficients, stats))
}

/// Overlap test for a candidate coefficient, with an evaluation counter.
struct OverlapProbe<'a> {
    bounding_square: Rectangle,
    canvas_square: Rectangle,
    basis: &'a Basis,
    tests: usize,
}

impl<'a> OverlapProbe<'a> {
    fn new(bounding_box: &Rectangle, basis: &'a Basis, canvas: &Rectangle) -> Self {
        Self {
            bounding_square: bounding_box.containing_square(),
            canvas_square: canvas.containing_square(),
            basis,
            tests: 0,
        }
    }

    fn overlaps(&mut self, coefficients: Vector) -> bool {
        self.tests += 1;
        self.bounding_square
            .translate(self.basis.from_coefficients(coefficients))
            .overlaps(&self.canvas_square)
    }

    /// Walk from `initial` (exclusive) in steps of `dx` while cells overlap;
    /// return the last overlapping cell, or `initial` if the first step fails.
    fn search_horizontal(&mut self, initial: Vector, dx: f64) -> Vector {
        let mut v = Vector::new(initial.x + dx, initial.y);
        while self.overlaps(v) {
            v.x += dx;
        }
        Vector::new(v.x - dx, v.y)
    }

    fn search_left(&mut self, initial: Vector) -> Vector {
        self.search_horizontal(initial, -1.0)
    }

    fn search_right(&mut self, initial: Vector) -> Vector {
        self.search_horizontal(initial, 1.0)
    }

    /// Find the overlapping run on the row after `previous` (in direction
    /// `dy`), or `None` if that row has no overlapping cell.
    fn search_row(
        &mut self,
        previous: &HorizontalRange,
        dy: f64,
    ) -> Result<Option<HorizontalRange>, CoveringError> {
        let y = previous.y() + dy;
        let mut left_most = self.search_left(Vector::new(previous.left().x, y));
        let mut right_most = self.search_right(Vector::new(previous.right().x, y));

        // Seeds may sit outside this row's run; close in on it.
        while !self.overlaps(left_most) && left_most.x < right_most.x {
            left_most.x += 1.0;
        }
        while !self.overlaps(right_most) && left_most.x < right_most.x {
            right_most.x -= 1.0;
        }

        if self.overlaps(left_most) {
            HorizontalRange::new(left_most, right_most).map(Some)
        } else {
            Ok(None)
        }
    }

    fn stats(&self, rows: usize) -> CoveringStats {
        CoveringStats { overlap_tests: self.tests, rows }
    }
}

/// Rows above (`step = 1`) or below (`step = -1`) a starting range, ending
/// at the first empty row.
struct RowSearch<'p, 'a> {
    probe: &'p mut OverlapProbe<'a>,
    current: Option<HorizontalRange>,
    step: f64,
}

impl<'p, 'a> RowSearch<'p, 'a> {
    fn new(probe: &'p mut OverlapProbe<'a>, initial: HorizontalRange, step: f64) -> Self {
        Self { probe, current: Some(initial), step }
    }
}

impl Iterator for RowSearch<'_, '_> {
    type Item = Result<HorizontalRange, CoveringError>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.current.take()?;
        match self.probe.search_row(&current, self.step) {
            Ok(Some(next)) => {
                self.current = Some(next);
                Some(Ok(next))
            }
            Ok(None) => None,
            Err(e) => Some(Err(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::geometry::Transformation;

    const SQRT3: f64 = 1.732_050_807_568_877_2;

    fn star_basis() -> Basis {
        Basis::new(Vector::new(0.0, 12.0), Vector::new(2.0 * SQRT3, 0.0))
    }

    fn wing_basis() -> Basis {
        Basis::new(Vector::new(-SQRT3, 3.0), Vector::new(8.0 * SQRT3, 0.0))
    }

    fn view() -> Transformation {
        Transformation::new(Vector::new(600.0, 400.0), 40.0)
    }

    fn screen() -> Rectangle {
        Rectangle::new(Vector::new(0.0, 0.0), Vector::new(1200.0, 800.0))
    }

    fn unit_box() -> Rectangle {
        Rectangle::new(Vector::new(-1.0, -1.0), Vector::new(1.0, 1.0))
    }

    fn key(v: Vector) -> (i64, i64) {
        (v.x as i64, v.y as i64)
    }

    /// The overlap test the search is meant to agree with.
    fn overlaps_exhaustive(bbox: &Rectangle, basis: &Basis, canvas: &Rectangle, c: Vector) -> bool {
        bbox.containing_square()
            .translate(basis.from_coefficients(c))
            .overlaps(&canvas.containing_square())
    }

    fn exhaustive(bbox: &Rectangle, basis: &Basis, canvas: &Rectangle, n: i64) -> HashSet<(i64, i64)> {
        let mut cells = HashSet::new();
        for a in -n..=n {
            for b in -n..=n {
                let c = Vector::new(a as f64, b as f64);
                if overlaps_exhaustive(bbox, basis, canvas, c) {
                    cells.insert((a, b));
                }
            }
        }
        cells
    }

    fn cases() -> Vec<(Rectangle, Basis, Rectangle)> {
        let t = view();
        let sheared = Basis::new(Vector::new(30.0, 10.0), Vector::new(-5.0, 25.0));
        let centered = Rectangle::new(Vector::new(590.0, 390.0), Vector::new(610.0, 410.0));
        vec![
            (unit_box().transform(&t), star_basis().scale(t.scaling), screen()),
            (
                Rectangle::new(Vector::new(-2.6, -0.6), Vector::new(2.6, 4.6)).transform(&t),
                wing_basis().scale(t.scaling),
                screen(),
            ),
            (centered, sheared, screen()),
        ]
    }

    #[test]
    fn range_rejects_mismatched_rows() {
        let err = HorizontalRange::new(Vector::new(0.0, 1.0), Vector::new(2.0, 2.0)).unwrap_err();
        assert_eq!(err, CoveringError::UnalignedRange { left: 1.0, right: 2.0 });
    }

    #[test]
    fn range_rejects_reversed_ends() {
        let err = HorizontalRange::new(Vector::new(3.0, 0.0), Vector::new(2.0, 0.0)).unwrap_err();
        assert_eq!(err, CoveringError::UnorderedRange { left: 3.0, right: 2.0 });
    }

    #[test]
    fn range_iterates_inclusive_and_restarts() {
        let range = HorizontalRange::new(Vector::new(-1.0, 4.0), Vector::new(2.0, 4.0)).unwrap();
        let cells: Vec<Vector> = range.iter().collect();
        assert_eq!(cells.len(), 4);
        assert_eq!(range.len(), 4);
        assert_eq!(cells[0], Vector::new(-1.0, 4.0));
        assert_eq!(cells[3], Vector::new(2.0, 4.0));
        // Iterating again gives the same cells
        assert_eq!(range.into_iter().collect::<Vec<_>>(), cells);
    }

    #[test]
    fn single_cell_range() {
        let v = Vector::new(5.0, -2.0);
        let range = HorizontalRange::new(v, v).unwrap();
        assert_eq!(range.len(), 1);
        assert_eq!(range.iter().collect::<Vec<_>>(), vec![v]);
    }

    #[test]
    fn includes_origin_when_box_overlaps() {
        for (bbox, basis, canvas) in cases() {
            let cells = generate_covering(&bbox, &basis, &canvas).unwrap();
            assert!(cells.contains(&Vector::ZERO), "origin missing for basis {:?}", basis);
        }
    }

    #[test]
    fn identity_overlap_includes_origin() {
        let a = Rectangle::new(Vector::new(0.0, 0.0), Vector::new(3.0, 3.0));
        let b = Rectangle::new(Vector::new(2.0, 1.0), Vector::new(10.0, 5.0));
        let basis = Basis::new(Vector::new(4.0, 1.0), Vector::new(1.0, 4.0));
        let cells = generate_covering(&a, &basis, &b).unwrap();
        assert!(cells.contains(&Vector::ZERO));
    }

    #[test]
    fn no_duplicates() {
        for (bbox, basis, canvas) in cases() {
            let cells = generate_covering(&bbox, &basis, &canvas).unwrap();
            let unique: HashSet<_> = cells.iter().copied().map(key).collect();
            assert_eq!(unique.len(), cells.len(), "duplicate coefficients for {:?}", basis);
        }
    }

    #[test]
    fn matches_exhaustive_search() {
        for (bbox, basis, canvas) in cases() {
            let found: HashSet<_> = generate_covering(&bbox, &basis, &canvas)
                .unwrap()
                .into_iter()
                .map(key)
                .collect();
            let expected = exhaustive(&bbox, &basis, &canvas, 100);
            assert_eq!(found, expected, "covering differs from exhaustive search for {:?}", basis);
        }
    }

    #[test]
    fn neighbours_are_returned_or_rejected() {
        for (bbox, basis, canvas) in cases() {
            let cells = generate_covering(&bbox, &basis, &canvas).unwrap();
            let set: HashSet<_> = cells.iter().copied().map(key).collect();
            for c in &cells {
                for d in [(1.0, 0.0), (-1.0, 0.0), (0.0, 1.0), (0.0, -1.0)] {
                    let n = Vector::new(c.x + d.0, c.y + d.1);
                    assert!(
                        set.contains(&key(n)) || !overlaps_exhaustive(&bbox, &basis, &canvas, n),
                        "neighbour {:?} of {:?} overlaps but was not returned",
                        n,
                        c
                    );
                }
            }
        }
    }

    #[test]
    fn returned_cells_overlap() {
        for (bbox, basis, canvas) in cases() {
            for c in generate_covering(&bbox, &basis, &canvas).unwrap() {
                assert!(overlaps_exhaustive(&bbox, &basis, &canvas, c), "{:?} does not overlap", c);
            }
        }
    }

    #[test]
    fn work_scales_with_result_not_area() {
        // A canvas far larger than the cells: thousands of cells, but each
        // costs only a handful of overlap tests.
        let t = view();
        let canvas = Rectangle::new(Vector::new(0.0, 0.0), Vector::new(20_000.0, 20_000.0));
        let bbox = unit_box().transform(&t).translate(Vector::new(9_400.0, 9_600.0));
        let basis = star_basis().scale(t.scaling);
        let (cells, stats) = generate_covering_with_stats(&bbox, &basis, &canvas).unwrap();
        assert!(cells.len() > 1000, "expected a large covering, got {}", cells.len());
        assert!(
            stats.overlap_tests <= 3 * cells.len() + 6 * (stats.rows + 2) + 3,
            "{} overlap tests for {} cells in {} rows",
            stats.overlap_tests,
            cells.len(),
            stats.rows
        );
    }

    #[test]
    fn scenario_covers_screen_without_gaps() {
        let t = view();
        let bbox = unit_box().transform(&t);
        let basis = star_basis().scale(t.scaling);
        let cells = generate_covering(&bbox, &basis, &screen()).unwrap();
        assert!(cells.contains(&Vector::ZERO));

        // Every lattice translate whose box touches the screen must be there.
        let set: HashSet<_> = cells.iter().copied().map(key).collect();
        for (a, b) in exhaustive(&bbox, &basis, &screen(), 60) {
            assert!(set.contains(&(a, b)), "cell ({}, {}) missing", a, b);
        }
        // Centres of the screen corners are reached by some cell
        for corner in screen().corners() {
            let hit = cells.iter().any(|c| {
                let center = bbox.translate(basis.from_coefficients(*c)).center();
                (center.x - corner.x).abs() <= basis.w.norm() && (center.y - corner.y).abs() <= basis.v.norm()
            });
            assert!(hit, "no cell near screen corner {:?}", corner);
        }
    }

    #[test]
    fn zero_size_canvas_gives_single_cell() {
        let t = view();
        let bbox = unit_box().transform(&t);
        let canvas = Rectangle::new(Vector::new(600.0, 400.0), Vector::new(600.0, 400.0));
        let cells = generate_covering(&bbox, &star_basis().scale(t.scaling), &canvas).unwrap();
        assert_eq!(cells, vec![Vector::ZERO]);
    }

    #[test]
    fn zero_size_canvas_outside_box_is_empty() {
        let t = view();
        let bbox = unit_box().transform(&t);
        let canvas = Rectangle::new(Vector::new(5.0, 5.0), Vector::new(5.0, 5.0));
        let cells = generate_covering(&bbox, &star_basis().scale(t.scaling), &canvas).unwrap();
        assert!(cells.is_empty());
    }

    #[test]
    fn degenerate_basis_is_rejected() {
        let basis = Basis::new(Vector::new(1.0, 1.0), Vector::new(2.0, 2.0));
        let err = generate_covering(&unit_box(), &basis, &screen()).unwrap_err();
        assert!(matches!(err, CoveringError::DegenerateBasis { .. }));
    }
}
