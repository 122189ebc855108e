use core::num::NonZeroU32;
use function_plot::{
    plot::{FunctionEntry, FunctionId, FunctionStatus, Plotter, Rgb, Stroke},
    segments, validate, Canvas, Mapper, Number, Point, Viewport,
};
use std::collections::HashMap;

fn canvas(width: u32) -> Canvas {
    Canvas::from_width(NonZeroU32::new(width).unwrap())
}

fn sample(src: &str, viewport: &Viewport, width: u32) -> (Vec<Vec<Point<Number>>>, Mapper) {
    let mapper = Mapper::new(viewport, canvas(width)).unwrap();
    let expr = validate(src).expect("valid expression");
    let segs = segments(&expr, &mapper).map(|seg| seg.points).collect();
    (segs, mapper)
}

/// Runs one redraw and collects the polylines drawn for each function.
fn redraw(
    plotter: &mut Plotter,
    entries: &[FunctionEntry],
    viewport: &Viewport,
) -> HashMap<FunctionId, Vec<Vec<Point<Number>>>> {
    let mut drawn: HashMap<FunctionId, Vec<Vec<Point<Number>>>> = HashMap::new();
    plotter
        .redraw(entries, viewport, canvas(500), |stroke| {
            if let Stroke::Polyline { id, points, .. } = stroke {
                drawn.entry(id).or_default().push(points.to_vec());
            }
            Ok::<_, ()>(())
        })
        .unwrap();
    drawn
}

#[test]
fn parabola_is_one_segment_turning_at_origin() {
    let (segs, mapper) = sample("x^2", &Viewport::default(), 500);
    assert_eq!(segs.len(), 1);
    let seg = &segs[0];

    // x^2 <= 10 only for |x| <= sqrt(10)
    let first_x = mapper.to_domain_x(seg[0].x);
    assert!((first_x + Number::sqrt(10.0)).abs() < 0.05, "{first_x}");

    let turn = seg
        .iter()
        .position(|p| p.x == 250.0)
        .expect("column of x = 0 is drawn");
    let ys: Vec<Number> = seg.iter().map(|p| mapper.to_domain_y(p.y)).collect();
    assert!(ys[..=turn].windows(2).all(|w| w[0] >= w[1]));
    assert!(ys[turn..].windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn parabola_fully_inside_window_starts_at_x_min() {
    let viewport = Viewport {
        x: -10.0..10.0,
        y: -1.0..100.0,
    };
    let (segs, mapper) = sample("x^2", &viewport, 500);
    assert_eq!(segs.len(), 1);
    assert_eq!(segs[0].len(), 500);
    assert!((mapper.to_domain_x(segs[0][0].x) + 10.0).abs() < 1e-9);
}

#[test]
fn reciprocal_breaks_at_zero() {
    let (segs, mapper) = sample("1/x", &Viewport::default(), 500);
    assert!(segs.len() >= 2);

    let zero_column = mapper.to_pixel_x(0.0);
    assert!(segs.iter().flatten().all(|p| p.x != zero_column));
    let left = segs
        .iter()
        .filter_map(|seg| seg.last())
        .any(|p| p.x < zero_column);
    let right = segs
        .iter()
        .filter_map(|seg| seg.first())
        .any(|p| p.x > zero_column);
    assert!(left && right);
}

#[test]
fn undefined_columns_split_without_failing() {
    let (segs, _) = sample("sqrt(x^2 - 4)", &Viewport::default(), 500);
    assert_eq!(segs.len(), 2);

    let (segs, _) = sample("log(x, -1)", &Viewport::default(), 500);
    assert!(segs.is_empty());
}

#[test]
fn malformed_function_does_not_affect_others() {
    let mut plotter = Plotter::new();
    let entries = [
        FunctionEntry::new(FunctionId(0), "x^2", Rgb::nth_default(0)),
        FunctionEntry::new(FunctionId(1), "x+", Rgb::nth_default(1)),
        FunctionEntry::new(FunctionId(2), "1/x", Rgb::nth_default(2)),
    ];
    let drawn = redraw(&mut plotter, &entries, &Viewport::default());

    assert_eq!(drawn[&FunctionId(0)].len(), 1);
    assert!(!drawn.contains_key(&FunctionId(1)));
    assert!(drawn[&FunctionId(2)].len() >= 2);

    assert_eq!(plotter.status(FunctionId(0)), Some(&FunctionStatus::Ok));
    assert_eq!(plotter.status(FunctionId(2)), Some(&FunctionStatus::Ok));
    let message = plotter
        .status(FunctionId(1))
        .and_then(FunctionStatus::message)
        .expect("parse failure is recorded");
    assert!(!message.is_empty());
}

#[test]
fn nan_columns_are_not_parse_failures() {
    let mut plotter = Plotter::new();
    let entries = [FunctionEntry::new(FunctionId(7), "log(x, -1)", Rgb::BLACK)];
    let drawn = redraw(&mut plotter, &entries, &Viewport::default());
    assert!(drawn.is_empty());
    assert_eq!(plotter.status(FunctionId(7)), Some(&FunctionStatus::Ok));
}

#[test]
fn fixing_an_expression_clears_its_error() {
    let mut plotter = Plotter::new();
    let mut entries = [FunctionEntry::new(FunctionId(0), "sin(x", Rgb::BLACK)];
    redraw(&mut plotter, &entries, &Viewport::default());
    assert!(matches!(
        plotter.status(FunctionId(0)),
        Some(FunctionStatus::ParseFailed(_))
    ));

    entries[0].expr = "sin(x)".to_string();
    let drawn = redraw(&mut plotter, &entries, &Viewport::default());
    assert_eq!(plotter.status(FunctionId(0)), Some(&FunctionStatus::Ok));
    assert_eq!(drawn[&FunctionId(0)].len(), 1);
}

#[test]
fn redraw_is_idempotent() {
    let mut plotter = Plotter::new();
    let entries = [
        FunctionEntry::new(FunctionId(0), "tan(x)", Rgb::BLACK),
        FunctionEntry::new(FunctionId(1), "x^", Rgb::BLACK),
    ];
    let first = redraw(&mut plotter, &entries, &Viewport::default());
    let statuses = plotter.statuses().clone();
    let second = redraw(&mut plotter, &entries, &Viewport::default());
    assert_eq!(first, second);
    assert_eq!(&statuses, plotter.statuses());
}

#[test]
fn zoom_and_reset() {
    let mut viewport = Viewport::default();
    viewport.zoom_in();
    viewport.zoom_in();
    assert!((viewport.x.start + 10.0 * 0.64).abs() < 1e-12);
    assert!((viewport.y.end - 10.0 * 0.64).abs() < 1e-12);

    viewport.zoom_out();
    viewport.reset();
    assert_eq!(viewport, Viewport::default());
    assert_eq!(viewport.x, -10.0..10.0);
}

#[test]
fn mapper_round_trip() {
    let viewport = Viewport {
        x: -2.5..40.0,
        y: -1e3..1e3,
    };
    let mapper = Mapper::new(&viewport, canvas(321)).unwrap();
    for x in [-2.5, 0.0, 1.25, 17.0, 40.0, 100.0] {
        assert!((mapper.to_domain_x(mapper.to_pixel_x(x)) - x).abs() < 1e-9);
    }
    for y in [-1e3, -3.5, 0.0, 999.0] {
        assert!((mapper.to_domain_y(mapper.to_pixel_y(y)) - y).abs() < 1e-9);
    }
}

#[test]
fn huge_window_keeps_grid_bounded() {
    let viewport = Viewport {
        x: -1e12..1e12,
        y: -10.0..10.0,
    };
    let mut lines = 0usize;
    Plotter::new()
        .redraw(&[], &viewport, canvas(500), |stroke| {
            if let Stroke::Line { .. } = stroke {
                lines += 1;
            }
            Ok::<_, ()>(())
        })
        .unwrap();
    // horizontal gridlines plus both axes
    assert_eq!(lines, 18 + 2);
}

#[test]
fn overflowing_window_is_rejected_before_drawing() {
    let viewport = Viewport {
        x: -1.7e308..1.7e308,
        y: -10.0..10.0,
    };
    let mut drawn = 0usize;
    let result = Plotter::new().redraw(&[], &viewport, canvas(500), |_| {
        drawn += 1;
        Ok::<_, ()>(())
    });
    assert!(result.is_err());
    assert_eq!(drawn, 0);
}
