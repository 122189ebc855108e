// SPDX: CC0-1.0

use crate::{
    expr::{self, SyntaxError},
    grid::GridPlan,
    mapper::{Canvas, Mapper},
    sample,
    viewport::{InvalidViewport, Viewport},
    Number, Point,
};
use core::{fmt, str::FromStr};
use log::debug;
use plotters::style::RGBColor;
use std::collections::HashMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FunctionId(pub u32);

impl fmt::Display for FunctionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl FromStr for FunctionId {
    type Err = core::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.strip_prefix('#').unwrap_or(s).parse().map(Self)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Self = Self::new(0, 0, 0);

    /// Colors handed out to new functions, in order.
    pub const PALETTE: [Self; 6] = [
        Self::new(0x1f, 0x77, 0xb4),
        Self::new(0xd6, 0x27, 0x28),
        Self::new(0x2c, 0xa0, 0x2c),
        Self::new(0xff, 0x7f, 0x0e),
        Self::new(0x94, 0x67, 0xbd),
        Self::new(0x27, 0x42, 0x2e),
    ];

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn nth_default(n: usize) -> Self {
        Self::PALETTE[n % Self::PALETTE.len()]
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl From<Rgb> for RGBColor {
    fn from(Rgb { r, g, b }: Rgb) -> Self {
        RGBColor(r, g, b)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("expected a color of the form #rrggbb")]
pub struct ParseRgbError;

impl FromStr for Rgb {
    type Err = ParseRgbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ParseRgbError);
        }
        let channel =
            |at: usize| u8::from_str_radix(&hex[at..at + 2], 16).map_err(|_| ParseRgbError);
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }
}

/// A function as the user entered it.
#[derive(Clone, Debug, PartialEq)]
pub struct FunctionEntry {
    pub id: FunctionId,
    pub expr: String,
    pub color: Rgb,
    pub visible: bool,
}

impl FunctionEntry {
    pub fn new(id: FunctionId, expr: impl Into<String>, color: Rgb) -> Self {
        Self {
            id,
            expr: expr.into(),
            color,
            visible: true,
        }
    }

    fn is_blank(&self) -> bool {
        self.expr.trim().is_empty()
    }
}

/// Outcome of the last redraw that looked at a function.
#[derive(Clone, Debug, PartialEq)]
pub enum FunctionStatus {
    Ok,
    ParseFailed(SyntaxError),
}

impl FunctionStatus {
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Ok => None,
            Self::ParseFailed(err) => Some(&err.message),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineKind {
    XAxis,
    YAxis,
    Gridline,
}

/// A drawing command for the rendering backend, in pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Stroke<'a> {
    Line {
        kind: LineKind,
        from: Point<Number>,
        to: Point<Number>,
    },
    Polyline {
        id: FunctionId,
        points: &'a [Point<Number>],
        color: Rgb,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum RedrawError<E> {
    #[error("invalid viewport: {0}")]
    Viewport(#[from] InvalidViewport),
    #[error("drawing failed: {0}")]
    Draw(E),
}

/// Redraws function entries and remembers how each one fared.
#[derive(Debug, Default)]
pub struct Plotter {
    statuses: HashMap<FunctionId, FunctionStatus>,
}

impl Plotter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self, id: FunctionId) -> Option<&FunctionStatus> {
        self.statuses.get(&id)
    }

    pub fn statuses(&self) -> &HashMap<FunctionId, FunctionStatus> {
        &self.statuses
    }

    /// Drops the status of a removed function.
    pub fn forget(&mut self, id: FunctionId) -> Option<FunctionStatus> {
        self.statuses.remove(&id)
    }

    /// Draws the grid, then every visible function in order, through `draw`.
    ///
    /// A function that fails to validate is recorded as
    /// [`FunctionStatus::ParseFailed`] and draws nothing; the others are
    /// unaffected. Hidden functions keep whatever status they had.
    pub fn redraw<D, DErr>(
        &mut self,
        entries: &[FunctionEntry],
        viewport: &Viewport,
        canvas: Canvas,
        mut draw: D,
    ) -> Result<(), RedrawError<DErr>>
    where
        D: FnMut(Stroke<'_>) -> Result<(), DErr>,
    {
        let mapper = Mapper::new(viewport, canvas)?;
        debug!(
            "redraw {} function(s) on {canvas} over {viewport}",
            entries.len()
        );

        self.statuses
            .retain(|id, _| entries.iter().any(|entry| entry.id == *id));

        for line in grid_lines(&GridPlan::new(&mapper), &mapper) {
            draw(line).map_err(RedrawError::Draw)?;
        }

        for entry in entries.iter().filter(|entry| entry.visible) {
            if entry.is_blank() {
                self.statuses.remove(&entry.id);
                continue;
            }

            let expr = match expr::validate(&entry.expr) {
                Ok(expr) => expr,
                Err(err) => {
                    debug!("{}: {err}", entry.id);
                    self.statuses
                        .insert(entry.id, FunctionStatus::ParseFailed(err));
                    continue;
                }
            };
            self.statuses.insert(entry.id, FunctionStatus::Ok);

            let mut count = 0usize;
            for segment in sample::segments(&expr, &mapper) {
                count += 1;
                draw(Stroke::Polyline {
                    id: entry.id,
                    points: &segment.points,
                    color: entry.color,
                })
                .map_err(RedrawError::Draw)?;
            }
            debug!("{}: {count} segment(s)", entry.id);
        }

        Ok(())
    }
}

fn grid_lines(grid: &GridPlan, mapper: &Mapper) -> Vec<Stroke<'static>> {
    let (width, height) = (mapper.width(), mapper.height());
    let vertical = |kind, px| Stroke::Line {
        kind,
        from: Point::new(px, 0.0),
        to: Point::new(px, height),
    };
    let horizontal = |kind, py| Stroke::Line {
        kind,
        from: Point::new(0.0, py),
        to: Point::new(width, py),
    };

    let mut lines: Vec<Stroke<'static>> = grid
        .vertical
        .iter()
        .map(|&px| vertical(LineKind::Gridline, px))
        .chain(
            grid.horizontal
                .iter()
                .map(|&py| horizontal(LineKind::Gridline, py)),
        )
        .collect();
    lines.push(horizontal(LineKind::XAxis, grid.x_axis));
    lines.push(vertical(LineKind::YAxis, grid.y_axis));
    lines
}
