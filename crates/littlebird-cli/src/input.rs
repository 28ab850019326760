//! View state and the input events that change it.
//!
//! [`ViewState`] owns the one [`Transformation`] the viewer renders with.
//! Every input handler mutates it in place and bumps a revision counter;
//! the viewer redraws whenever the revision changes.

use littlebird::{Transformation, Vector};

use crate::config::Config;

/// Keyboard zoom is this many wheel notches at once.
const KEY_ZOOM_NOTCHES: i32 = 5;

#[derive(Debug, Clone)]
pub struct ViewState {
    transformation: Transformation,
    initial: Transformation,
    center: Vector,
    zoom_step: f64,
    pan_step: f64,
    min_scaling: f64,
    max_scaling: f64,
    drag: Option<Vector>,
    debug_bounds: bool,
    revision: u64,
}

impl ViewState {
    pub fn new(config: &Config) -> Self {
        let initial = config.initial_transformation();
        Self {
            transformation: initial,
            initial,
            center: config.canvas_rect().center(),
            zoom_step: config.view.zoom_step,
            pan_step: config.view.pan_step,
            min_scaling: config.view.min_scaling,
            max_scaling: config.view.max_scaling,
            drag: None,
            debug_bounds: config.pattern.debug_bounds,
            revision: 0,
        }
    }

    pub fn transformation(&self) -> &Transformation {
        &self.transformation
    }

    /// Increases by one for every change that needs a redraw.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn debug_bounds(&self) -> bool {
        self.debug_bounds
    }

    fn touch(&mut self) {
        self.revision += 1;
    }

    /// Move the pattern by a pixel delta.
    pub fn pan(&mut self, dx: f64, dy: f64) {
        if dx == 0.0 && dy == 0.0 {
            return;
        }
        self.transformation.pan(dx, dy);
        self.touch();
    }

    /// Pan by whole keyboard steps, e.g. `(-1, 0)` for one step left.
    pub fn step(&mut self, steps_x: f64, steps_y: f64) {
        self.pan(steps_x * self.pan_step, steps_y * self.pan_step);
    }

    /// Zoom by `ratio` about the pixel `center`, clamped to the configured
    /// scaling range.
    pub fn zoom(&mut self, center: Vector, ratio: f64) {
        let current = self.transformation.scaling;
        let target = (current * ratio).clamp(self.min_scaling, self.max_scaling);
        if target == current {
            return;
        }
        self.transformation.zoom_about(center, target / current);
        self.touch();
    }

    pub fn zoom_in(&mut self) {
        self.zoom(self.center, self.zoom_step.powi(KEY_ZOOM_NOTCHES));
    }

    pub fn zoom_out(&mut self) {
        self.zoom(self.center, (2.0 - self.zoom_step).powi(KEY_ZOOM_NOTCHES));
    }

    /// One wheel notch at `position`. Positive `delta_y` (scrolling down)
    /// zooms out.
    pub fn wheel(&mut self, position: Vector, delta_y: f64) {
        if delta_y == 0.0 {
            return;
        }
        let ratio = if delta_y > 0.0 { 2.0 - self.zoom_step } else { self.zoom_step };
        self.zoom(position, ratio);
    }

    pub fn pointer_down(&mut self, position: Vector) {
        self.drag = Some(position);
    }

    /// While dragging, pan by the pointer movement since the last event.
    pub fn pointer_move(&mut self, position: Vector) {
        if let Some(last) = self.drag {
            let delta = position - last;
            self.drag = Some(position);
            self.pan(delta.x, delta.y);
        }
    }

    pub fn pointer_up(&mut self, position: Vector) {
        self.pointer_move(position);
        self.drag = None;
    }

    /// End a drag without a final position (pointer left the view).
    pub fn pointer_cancel(&mut self) {
        self.drag = None;
    }

    pub fn reset(&mut self) {
        self.transformation = self.initial;
        self.drag = None;
        self.touch();
    }

    pub fn toggle_debug_bounds(&mut self) {
        self.debug_bounds = !self.debug_bounds;
        self.touch();
    }
}
