// SPDX: CC0-1.0

use crate::Number;
use core::{fmt, ops::Range, str::FromStr};

pub const ZOOM_IN_FACTOR: Number = 0.8;
pub const ZOOM_OUT_FACTOR: Number = 1.2;
pub const DEFAULT_RANGE: Range<Number> = -10.0..10.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum InvalidViewport {
    #[error("x range must be finite with x min < x max")]
    X,
    #[error("y range must be finite with y min < y max")]
    Y,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Bound {
    XMin,
    XMax,
    YMin,
    YMax,
}

impl Bound {
    pub const fn exhaustive() -> &'static [Bound] {
        &[Self::XMin, Self::XMax, Self::YMin, Self::YMax]
    }

    pub const fn name(&self) -> &'static str {
        match self {
            Self::XMin => "x min",
            Self::XMax => "x max",
            Self::YMin => "y min",
            Self::YMax => "y max",
        }
    }
}

impl FromStr for Bound {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::exhaustive()
            .iter()
            .find(|bound| bound.name().replace(' ', "") == s.replace(' ', ""))
            .copied()
            .ok_or(())
    }
}

/// The rectangle of the (x, y) plane that is visible.
#[derive(Clone, Debug, PartialEq)]
pub struct Viewport {
    pub x: Range<Number>,
    pub y: Range<Number>,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            x: DEFAULT_RANGE,
            y: DEFAULT_RANGE,
        }
    }
}

impl fmt::Display for Viewport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Viewport")
            .field("x range", &self.x)
            .field("y range", &self.y)
            .finish()
    }
}

fn is_valid(range: &Range<Number>) -> bool {
    range.start < range.end && (range.end - range.start).is_finite()
}

impl Viewport {
    pub fn validate(&self) -> Result<(), InvalidViewport> {
        if !is_valid(&self.x) {
            Err(InvalidViewport::X)
        } else if !is_valid(&self.y) {
            Err(InvalidViewport::Y)
        } else {
            Ok(())
        }
    }

    pub fn bound(&self, which: Bound) -> Number {
        match which {
            Bound::XMin => self.x.start,
            Bound::XMax => self.x.end,
            Bound::YMin => self.y.start,
            Bound::YMax => self.y.end,
        }
    }

    fn bound_mut(&mut self, which: Bound) -> &mut Number {
        match which {
            Bound::XMin => &mut self.x.start,
            Bound::XMax => &mut self.x.end,
            Bound::YMin => &mut self.y.start,
            Bound::YMax => &mut self.y.end,
        }
    }

    /// Overwrites one bound as is. An edit that breaks the ordering of its
    /// axis is reported as [`InvalidViewport`] the next time the viewport is
    /// mapped, not corrected here.
    pub fn set_bound(&mut self, which: Bound, value: Number) {
        *self.bound_mut(which) = value;
    }

    /// Copy of `self` with one bound replaced, if the result is still valid.
    pub fn with_bound(&self, which: Bound, value: Number) -> Result<Self, InvalidViewport> {
        let mut edited = self.clone();
        edited.set_bound(which, value);
        edited.validate()?;
        Ok(edited)
    }

    /// Multiplies every bound by `factor`. Bounds scale about the origin,
    /// not about the center of the window.
    fn scale(&mut self, factor: Number) {
        for &which in Bound::exhaustive() {
            *self.bound_mut(which) *= factor;
        }
    }

    pub fn zoom_in(&mut self) {
        self.scale(ZOOM_IN_FACTOR);
    }

    pub fn zoom_out(&mut self) {
        self.scale(ZOOM_OUT_FACTOR);
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
