//! Raster backend: a [`Canvas`] drawing into a tiny-skia `Pixmap`.

use image::{DynamicImage, RgbaImage};
use tiny_skia::{FillRule, Paint, Path, PathBuilder, Pixmap, Stroke, Transform};

use littlebird::path::{DevicePath, PathCanvas, PathElement, Surface};
use littlebird::{Colour, Drawable, Transformation};

use crate::error::CliError;

/// A pixmap that accepts device-space paths.
pub struct PixmapSurface {
    pixmap: Pixmap,
}

pub type SkiaCanvas = PathCanvas<PixmapSurface>;

impl PixmapSurface {
    pub fn new(width: u32, height: u32) -> Result<Self, CliError> {
        let pixmap = Pixmap::new(width, height).ok_or(CliError::Pixmap { width, height })?;
        Ok(Self { pixmap })
    }

    pub fn into_pixmap(self) -> Pixmap {
        self.pixmap
    }

    fn paint(colour: Colour) -> Paint<'static> {
        let mut paint = Paint::default();
        paint.set_color_rgba8(colour.r, colour.g, colour.b, colour.a);
        paint.anti_alias = true;
        paint
    }
}

impl Surface for PixmapSurface {
    fn fill_path(&mut self, path: &DevicePath, colour: Colour) {
        if let Some(path) = to_skia_path(path) {
            self.pixmap
                .fill_path(&path, &Self::paint(colour), FillRule::Winding, Transform::identity(), None);
        }
    }

    fn stroke_path(&mut self, path: &DevicePath, colour: Colour, width: f64) {
        if let Some(path) = to_skia_path(path) {
            let stroke = Stroke {
                width: width as f32,
                ..Stroke::default()
            };
            self.pixmap
                .stroke_path(&path, &Self::paint(colour), &stroke, Transform::identity(), None);
        }
    }
}

/// `None` for paths tiny-skia considers empty or degenerate.
fn to_skia_path(path: &DevicePath) -> Option<Path> {
    let mut builder = PathBuilder::new();
    for element in path.elements() {
        match *element {
            PathElement::MoveTo(p) => builder.move_to(p.x as f32, p.y as f32),
            PathElement::LineTo(p) => builder.line_to(p.x as f32, p.y as f32),
            PathElement::CubicTo(c1, c2, p) => builder.cubic_to(
                c1.x as f32,
                c1.y as f32,
                c2.x as f32,
                c2.y as f32,
                p.x as f32,
                p.y as f32,
            ),
            PathElement::Close => builder.close(),
        }
    }
    builder.finish()
}

/// Render `drawable` into a fresh `width`×`height` pixmap.
pub fn render_pixmap(
    drawable: &dyn Drawable,
    transformation: &Transformation,
    width: u32,
    height: u32,
) -> Result<Pixmap, CliError> {
    let mut canvas: SkiaCanvas = PathCanvas::new(PixmapSurface::new(width, height)?);
    drawable.render(&mut canvas, transformation);
    Ok(canvas.into_surface().into_pixmap())
}

/// Convert to an `image` buffer. The pattern paints an opaque background,
/// so premultiplied and straight alpha agree.
pub fn to_image(pixmap: Pixmap) -> Result<DynamicImage, CliError> {
    let (width, height) = (pixmap.width(), pixmap.height());
    RgbaImage::from_raw(width, height, pixmap.take())
        .map(DynamicImage::ImageRgba8)
        .ok_or(CliError::Pixmap { width, height })
}
