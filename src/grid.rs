// SPDX: CC0-1.0

use crate::{mapper::Mapper, Number};

/// Pixel positions of the axes and the unit gridlines of a window.
#[derive(Clone, Debug, PartialEq)]
pub struct GridPlan {
    /// Pixel row of `y = 0`. May lie outside the surface.
    pub x_axis: Number,
    /// Pixel column of `x = 0`. May lie outside the surface.
    pub y_axis: Number,
    /// Pixel columns of the vertical gridlines, left to right.
    pub vertical: Vec<Number>,
    /// Pixel rows of the horizontal gridlines, in increasing domain y.
    pub horizontal: Vec<Number>,
}

/// Nonzero integers strictly between `ceil(min)` and `floor(max)`, ascending.
///
/// Empty when there would be more than `limit` of them, since lines closer
/// than a pixel apart cannot be told apart.
fn integers_between(min: Number, max: Number, limit: Number) -> impl Iterator<Item = Number> {
    let first = min.ceil() + 1.0;
    let last = max.floor() - 1.0;
    let span = last - first + 1.0;
    let count = if span >= 1.0 && span <= limit {
        span as u64
    } else {
        0
    };
    (0..count)
        .map(move |i| first + i as Number)
        .filter(|&k| k != 0.0)
}

impl GridPlan {
    pub fn new(mapper: &Mapper) -> Self {
        Self {
            x_axis: mapper.to_pixel_y(0.0),
            y_axis: mapper.to_pixel_x(0.0),
            vertical: integers_between(mapper.x_min(), mapper.x_max(), mapper.width())
                .map(|x| mapper.to_pixel_x(x))
                .collect(),
            horizontal: integers_between(mapper.y_min(), mapper.y_max(), mapper.height())
                .map(|y| mapper.to_pixel_y(y))
                .collect(),
        }
    }
}
