// SPDX: CC0-1.0

//! Affine mapping between the viewport and the pixel surface.
//!
//! Domain y grows upward, pixel y grows downward: `y max` lands on pixel
//! row `0` and `y min` on row `H`.

use crate::{
    viewport::{InvalidViewport, Viewport},
    Number,
};
use core::{fmt, num::NonZeroU32};

/// Height of a canvas derived from its width (3:5 aspect).
pub const ASPECT: Number = 0.6;

/// Pixel dimensions of the drawing surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Canvas {
    pub width: NonZeroU32,
    pub height: NonZeroU32,
}

impl Canvas {
    pub const fn new(width: NonZeroU32, height: NonZeroU32) -> Self {
        Self { width, height }
    }

    pub fn from_width(width: NonZeroU32) -> Self {
        let height = (Number::from(width.get()) * ASPECT).round() as u32;
        Self {
            width,
            height: NonZeroU32::new(height).unwrap_or(NonZeroU32::MIN),
        }
    }
}

impl fmt::Display for Canvas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Mapper {
    x_min: Number,
    x_span: Number,
    y_max: Number,
    y_span: Number,
    width: Number,
    height: Number,
}

impl Mapper {
    pub fn new(viewport: &Viewport, canvas: Canvas) -> Result<Self, InvalidViewport> {
        viewport.validate()?;
        Ok(Self {
            x_min: viewport.x.start,
            x_span: viewport.x.end - viewport.x.start,
            y_max: viewport.y.end,
            y_span: viewport.y.end - viewport.y.start,
            width: Number::from(canvas.width.get()),
            height: Number::from(canvas.height.get()),
        })
    }

    pub const fn width(&self) -> Number {
        self.width
    }

    pub const fn height(&self) -> Number {
        self.height
    }

    pub fn x_min(&self) -> Number {
        self.x_min
    }

    pub fn x_max(&self) -> Number {
        self.x_min + self.x_span
    }

    pub fn y_min(&self) -> Number {
        self.y_max - self.y_span
    }

    pub fn y_max(&self) -> Number {
        self.y_max
    }

    #[inline]
    pub fn to_pixel_x(&self, x: Number) -> Number {
        self.width * (x - self.x_min) / self.x_span
    }

    #[inline]
    pub fn to_pixel_y(&self, y: Number) -> Number {
        self.height * (self.y_max - y) / self.y_span
    }

    #[inline]
    pub fn to_domain_x(&self, px: Number) -> Number {
        self.x_min + px / self.width * self.x_span
    }

    #[inline]
    pub fn to_domain_y(&self, py: Number) -> Number {
        self.y_max - py / self.height * self.y_span
    }

    /// Domain x sampled at pixel column `column`.
    #[inline]
    pub fn column_x(&self, column: u32) -> Number {
        self.x_min + (Number::from(column) / self.width) * self.x_span
    }

    /// Whether a pixel row lies on the surface, edges included.
    #[inline]
    pub fn contains_row(&self, py: Number) -> bool {
        (0.0..=self.height).contains(&py)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canvas(width: u32, height: u32) -> Canvas {
        Canvas::new(
            NonZeroU32::new(width).unwrap(),
            NonZeroU32::new(height).unwrap(),
        )
    }

    #[test]
    fn height_derives_from_width() {
        let canvas = Canvas::from_width(NonZeroU32::new(500).unwrap());
        assert_eq!(canvas.height.get(), 300);
        let tiny = Canvas::from_width(NonZeroU32::new(1).unwrap());
        assert_eq!(tiny.height.get(), 1);
    }

    #[test]
    fn corners_map_to_surface_edges() {
        let mapper = Mapper::new(&Viewport::default(), canvas(500, 300)).unwrap();
        assert_eq!(mapper.to_pixel_x(-10.0), 0.0);
        assert_eq!(mapper.to_pixel_x(10.0), 500.0);
        assert_eq!(mapper.to_pixel_y(10.0), 0.0);
        assert_eq!(mapper.to_pixel_y(-10.0), 300.0);
        assert_eq!(mapper.to_pixel_x(0.0), 250.0);
        assert_eq!(mapper.to_pixel_y(0.0), 150.0);
    }

    #[test]
    fn round_trips_through_pixels() {
        let viewport = Viewport {
            x: -3.7..12.25,
            y: 0.001..0.002,
        };
        let mapper = Mapper::new(&viewport, canvas(777, 123)).unwrap();
        for i in 0..=100 {
            let t = Number::from(i) / 100.0;
            let x = -50.0 + 100.0 * t;
            let y = 0.0005 + 0.002 * t;
            assert!((mapper.to_domain_x(mapper.to_pixel_x(x)) - x).abs() < 1e-9);
            assert!((mapper.to_domain_y(mapper.to_pixel_y(y)) - y).abs() < 1e-15);
        }
    }

    #[test]
    fn rejects_degenerate_viewport() {
        let viewport = Viewport {
            x: 1.0..1.0,
            y: -1.0..1.0,
        };
        assert_eq!(
            Mapper::new(&viewport, canvas(10, 10)),
            Err(InvalidViewport::X)
        );
        let viewport = Viewport {
            x: -1.0..1.0,
            y: 2.0..-2.0,
        };
        assert_eq!(
            Mapper::new(&viewport, canvas(10, 10)),
            Err(InvalidViewport::Y)
        );
    }

    #[test]
    fn column_x_starts_at_x_min() {
        let mapper = Mapper::new(&Viewport::default(), canvas(500, 300)).unwrap();
        assert_eq!(mapper.column_x(0), -10.0);
        assert_eq!(mapper.column_x(250), 0.0);
        assert!(mapper.column_x(499) < 10.0);
    }
}
