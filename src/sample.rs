// SPDX: CC0-1.0

//! One sample per pixel column, split into strokes wherever the curve is
//! undefined or leaves the surface.
//!
//! Vertical asymptotes only get as close as the nearest sampled column, so a
//! curve like `1/x` stops short of the surface edge next to `x = 0`.

use crate::{expr::Expression, mapper::Mapper, Number, Point};
use log::trace;

/// One continuous stroke, in pixel coordinates.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Segment {
    pub points: Vec<Point<Number>>,
}

impl Segment {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Lazily yields the segments of `expr` over the mapped window.
///
/// Each call starts from column `0`; nothing is shared between calls.
pub fn segments<'a>(expr: &'a Expression, mapper: &'a Mapper) -> Segments<'a> {
    Segments {
        expr,
        mapper,
        column: 0,
        columns: mapper.width() as u32,
        open: Segment::default(),
        stack: Vec::new(),
    }
}

#[derive(Debug)]
pub struct Segments<'a> {
    expr: &'a Expression,
    mapper: &'a Mapper,
    column: u32,
    columns: u32,
    open: Segment,
    stack: Vec<Number>,
}

impl Segments<'_> {
    /// Pixel row of the curve at `column`, if it is drawable there.
    fn sample(&mut self, column: u32) -> Option<Number> {
        let x = self.mapper.column_x(column);
        match self.expr.eval_with(x, &mut self.stack) {
            Ok(y) => {
                let py = self.mapper.to_pixel_y(y);
                self.mapper.contains_row(py).then_some(py)
            }
            Err(err) => {
                trace!("break at x = {x}: {err}");
                None
            }
        }
    }

    fn close(&mut self) -> Option<Segment> {
        if self.open.is_empty() {
            None
        } else {
            let segment = core::mem::take(&mut self.open);
            trace!("segment of {} points", segment.len());
            Some(segment)
        }
    }
}

impl Iterator for Segments<'_> {
    type Item = Segment;

    fn next(&mut self) -> Option<Self::Item> {
        while self.column < self.columns {
            let column = self.column;
            self.column += 1;
            match self.sample(column) {
                Some(py) => self.open.points.push(Point::new(Number::from(column), py)),
                None => {
                    if let Some(segment) = self.close() {
                        return Some(segment);
                    }
                }
            }
        }
        self.close()
    }
}
