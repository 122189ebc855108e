// SPDX: CC0-1.0

pub mod eval;
pub mod expr;
pub mod grid;
pub mod lex;
pub mod mapper;
pub mod parse;
pub mod plot;
pub mod sample;
pub mod shell;
pub mod stdlib;
pub mod svg;
pub mod viewport;

pub use expr::{evaluate_at, validate, EvalError, Expression, SyntaxError};
pub use grid::GridPlan;
pub use mapper::{Canvas, Mapper};
pub use plot::{
    FunctionEntry, FunctionId, FunctionStatus, LineKind, Plotter, RedrawError, Rgb, Stroke,
};
pub use sample::{segments, Segment, Segments};
pub use viewport::{Bound, InvalidViewport, Viewport};

pub type Number = f64;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point<T> {
    pub x: T,
    pub y: T,
}

impl<T> Point<T> {
    #[inline]
    pub const fn new(x: T, y: T) -> Self {
        Self { x, y }
    }
}
