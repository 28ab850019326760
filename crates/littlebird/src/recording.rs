//! A canvas that remembers what was drawn on it.
//!
//! Used by tests and by the benchmark to inspect a render without a
//! pixel buffer.

use crate::canvas::{Canvas, Colour};
use crate::path::{DevicePath, PathCanvas, Surface};

/// One call made on a [`RecordingCanvas`].
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Save,
    Restore,
    Translate(f64, f64),
    Scale(f64, f64),
    Rotate(f64),
    BeginPath,
    MoveTo(f64, f64),
    LineTo(f64, f64),
    Arc {
        x: f64,
        y: f64,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
        anticlockwise: bool,
    },
    SetFillColour(Colour),
    Fill,
    SetStrokeColour(Colour),
    SetLineWidth(f64),
    StrokeRect(f64, f64, f64, f64),
    FillRect(f64, f64, f64, f64),
}

/// Painted output in device space.
#[derive(Debug, Default)]
pub struct Painted {
    pub fills: Vec<(DevicePath, Colour)>,
    pub strokes: Vec<(DevicePath, Colour, f64)>,
}

impl Surface for Painted {
    fn fill_path(&mut self, path: &DevicePath, colour: Colour) {
        self.fills.push((path.clone(), colour));
    }

    fn stroke_path(&mut self, path: &DevicePath, colour: Colour, width: f64) {
        self.strokes.push((path.clone(), colour, width));
    }
}

/// Records every call and also paints into device-space paths.
#[derive(Debug)]
pub struct RecordingCanvas {
    commands: Vec<Command>,
    inner: PathCanvas<Painted>,
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
            inner: PathCanvas::new(Painted::default()),
        }
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// Count the commands matching `predicate`.
    pub fn count(&self, predicate: impl Fn(&Command) -> bool) -> usize {
        self.commands.iter().filter(|c| predicate(c)).count()
    }

    pub fn painted(&self) -> &Painted {
        self.inner.surface()
    }

    /// Number of unmatched `save` calls so far.
    pub fn depth(&self) -> usize {
        self.inner.depth()
    }
}

impl Default for RecordingCanvas {
    fn default() -> Self {
        Self::new()
    }
}

impl Canvas for RecordingCanvas {
    fn save(&mut self) {
        self.commands.push(Command::Save);
        self.inner.save();
    }

    fn restore(&mut self) {
        self.commands.push(Command::Restore);
        self.inner.restore();
    }

    fn translate(&mut self, x: f64, y: f64) {
        self.commands.push(Command::Translate(x, y));
        self.inner.translate(x, y);
    }

    fn scale(&mut self, sx: f64, sy: f64) {
        self.commands.push(Command::Scale(sx, sy));
        self.inner.scale(sx, sy);
    }

    fn rotate(&mut self, angle: f64) {
        self.commands.push(Command::Rotate(angle));
        self.inner.rotate(angle);
    }

    fn begin_path(&mut self) {
        self.commands.push(Command::BeginPath);
        self.inner.begin_path();
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.commands.push(Command::MoveTo(x, y));
        self.inner.move_to(x, y);
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.commands.push(Command::LineTo(x, y));
        self.inner.line_to(x, y);
    }

    fn arc(&mut self, x: f64, y: f64, radius: f64, start_angle: f64, end_angle: f64, anticlockwise: bool) {
        self.commands.push(Command::Arc {
            x,
            y,
            radius,
            start_angle,
            end_angle,
            anticlockwise,
        });
        self.inner.arc(x, y, radius, start_angle, end_angle, anticlockwise);
    }

    fn set_fill_colour(&mut self, colour: Colour) {
        self.commands.push(Command::SetFillColour(colour));
        self.inner.set_fill_colour(colour);
    }

    fn fill(&mut self) {
        self.commands.push(Command::Fill);
        self.inner.fill();
    }

    fn set_stroke_colour(&mut self, colour: Colour) {
        self.commands.push(Command::SetStrokeColour(colour));
        self.inner.set_stroke_colour(colour);
    }

    fn set_line_width(&mut self, width: f64) {
        self.commands.push(Command::SetLineWidth(width));
        self.inner.set_line_width(width);
    }

    fn stroke_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.commands.push(Command::StrokeRect(x, y, width, height));
        self.inner.stroke_rect(x, y, width, height);
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.commands.push(Command::FillRect(x, y, width, height));
        self.inner.fill_rect(x, y, width, height);
    }
}
