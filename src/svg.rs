// SPDX: CC0-1.0

use crate::{
    mapper::Canvas,
    plot::{LineKind, Stroke},
    Number, Point,
};
use plotters::{
    backend::SVGBackend,
    coord::Shift,
    drawing::{DrawingArea, DrawingAreaErrorKind, IntoDrawingArea},
    element::{Circle, PathElement},
    style::{Color, RGBColor, BLACK, WHITE},
};

const GRID_COLOR: RGBColor = RGBColor(0xdd, 0xdd, 0xdd);
const CURVE_WIDTH: u32 = 2;

pub type SvgError = DrawingAreaErrorKind<std::io::Error>;

/// Draws strokes onto an SVG document the size of the canvas.
///
/// The document is rendered into the borrowed string on [`SvgSink::finish`].
pub struct SvgSink<'a> {
    area: DrawingArea<SVGBackend<'a>, Shift>,
    width: Number,
    height: Number,
}

impl<'a> SvgSink<'a> {
    pub fn new(buf: &'a mut String, canvas: Canvas) -> Result<Self, SvgError> {
        let (width, height) = (canvas.width.get(), canvas.height.get());
        let area = SVGBackend::with_string(buf, (width, height)).into_drawing_area();
        area.fill(&WHITE)?;
        Ok(Self {
            area,
            width: Number::from(width),
            height: Number::from(height),
        })
    }

    fn on_surface(&self, from: Point<Number>, to: Point<Number>) -> bool {
        let xs = 0.0..=self.width;
        let ys = 0.0..=self.height;
        (xs.contains(&from.x) || xs.contains(&to.x)) && (ys.contains(&from.y) || ys.contains(&to.y))
    }

    pub fn stroke(&self, stroke: Stroke<'_>) -> Result<(), SvgError> {
        match stroke {
            Stroke::Line { kind, from, to } => {
                // axes of a window that does not contain the origin
                if !self.on_surface(from, to) {
                    return Ok(());
                }
                let style = match kind {
                    LineKind::Gridline => GRID_COLOR.stroke_width(1),
                    LineKind::XAxis | LineKind::YAxis => BLACK.stroke_width(2),
                };
                self.area
                    .draw(&PathElement::new(vec![pixel(from), pixel(to)], style))
            }

            Stroke::Polyline { points, color, .. } => {
                let color = RGBColor::from(color);
                if let [p] = points {
                    return self
                        .area
                        .draw(&Circle::new(pixel(*p), CURVE_WIDTH / 2, color.filled()));
                }
                let path: Vec<(i32, i32)> = points.iter().copied().map(pixel).collect();
                self.area
                    .draw(&PathElement::new(path, color.stroke_width(CURVE_WIDTH)))
            }
        }
    }

    /// Renders the document into the borrowed string.
    pub fn finish(self) -> Result<(), SvgError> {
        self.area.present()
    }
}

fn pixel(p: Point<Number>) -> (i32, i32) {
    (p.x.round() as i32, p.y.round() as i32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plot::{FunctionId, Rgb};
    use core::num::NonZeroU32;

    fn canvas() -> Canvas {
        Canvas::new(NonZeroU32::new(50).unwrap(), NonZeroU32::new(30).unwrap())
    }

    fn render(strokes: &[Stroke<'_>]) -> String {
        let mut buf = String::new();
        let svg = SvgSink::new(&mut buf, canvas()).unwrap();
        for &stroke in strokes {
            svg.stroke(stroke).unwrap();
        }
        svg.finish().unwrap();
        buf.to_lowercase()
    }

    #[test]
    fn document_has_canvas_size() {
        let doc = render(&[]);
        assert!(doc.contains("<svg"));
        assert!(doc.contains(r#"width="50""#));
        assert!(doc.contains(r#"height="30""#));
        assert!(doc.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn off_surface_axis_is_skipped() {
        let doc = render(&[
            Stroke::Line {
                kind: LineKind::YAxis,
                from: Point::new(-20.0, 0.0),
                to: Point::new(-20.0, 30.0),
            },
            Stroke::Line {
                kind: LineKind::XAxis,
                from: Point::new(0.0, 15.0),
                to: Point::new(50.0, 15.0),
            },
        ]);
        assert_eq!(doc.matches("<polyline").count(), 1);
        assert!(doc.contains("#000000"));
    }

    #[test]
    fn polylines_use_entry_color() {
        let points = [Point::new(0.0, 1.0), Point::new(1.0, 2.6)];
        let doc = render(&[Stroke::Polyline {
            id: FunctionId(0),
            points: &points,
            color: Rgb::new(0xd6, 0x27, 0x28),
        }]);
        assert_eq!(doc.matches("<polyline").count(), 1);
        assert!(doc.contains("#d62728"));
    }

    #[test]
    fn single_point_becomes_dot() {
        let points = [Point::new(3.0, 4.0)];
        let doc = render(&[Stroke::Polyline {
            id: FunctionId(0),
            points: &points,
            color: Rgb::BLACK,
        }]);
        assert!(doc.contains("<circle"));
        assert!(!doc.contains("<polyline"));
    }
}
