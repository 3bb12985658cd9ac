use crate::chart::Chart;
use crate::error::PlotError;
use crate::fmt::PlotFmt;
use serde::Deserialize;

/// Fractions of the annotated point's coordinates by which the label is moved
/// left (`x`) and up (`y`).
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Offset {
    pub x: f64,
    pub y: f64,
}

impl Offset {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A formatted value drawn at `anchor` and referring to `point`.
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    pub text: String,
    pub point: (f64, f64),
    pub anchor: (f64, f64),
    pub font_size: f64,
}

/// Returns the point with the largest `y`; the first one wins ties and `NaN`
/// values are skipped.
pub fn extremal_point(x: &[f64], y: &[f64]) -> Option<(f64, f64)> {
    x.iter()
        .zip(y)
        .filter(|(_, y)| !y.is_nan())
        .fold(None, |max: Option<(f64, f64)>, (&x, &y)| match max {
            Some((_, max_y)) if max_y >= y => max,
            _ => Some((x, y)),
        })
}

/// `(x - x * offset.x, y + y * offset.y)`. If a coordinate is zero the anchor
/// stays on the point along that axis.
pub fn anchor(point: (f64, f64), offset: Offset) -> (f64, f64) {
    let (x, y) = point;
    (x - x * offset.x, y + y * offset.y)
}

/// Annotates the maximum of the series `(x, y)` with `format` applied to its
/// `y` value. An empty series is left unannotated.
pub fn place(
    chart: &mut Chart,
    x: &[f64],
    y: &[f64],
    offset: Offset,
    format: &str,
    font_size: f64,
) -> Result<(), PlotError> {
    let point = match extremal_point(x, y) {
        Some(point) => point,
        None => return Ok(()),
    };
    let text = PlotFmt::value(format, point.1)?;
    chart.annotate(Annotation {
        text,
        point,
        anchor: anchor(point, offset),
        font_size,
    });
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck_macros::quickcheck;

    #[test]
    fn annotate_maximum() {
        let mut chart = Chart::new();
        let x = [1.0, 2.0, 3.0];
        let y = [5.0, 12.0, 9.0];
        place(&mut chart, &x, &y, Offset::new(0.1, 0.1), "%d units", 15.0)
            .unwrap();

        let annotation = &chart.annotations()[0];
        assert_eq!(annotation.text, "12 units");
        assert_eq!(annotation.point, (2.0, 12.0));
        let (anchor_x, anchor_y) = annotation.anchor;
        assert!((anchor_x - 1.8).abs() < 1e-9);
        assert!((anchor_y - 13.2).abs() < 1e-9);
    }

    #[test]
    fn extremal_point_ties_and_nan() {
        let x = [1.0, 2.0, 3.0, 4.0];
        let y = [f64::NAN, 7.0, 7.0, 1.0];
        assert_eq!(extremal_point(&x, &y), Some((2.0, 7.0)));
        assert_eq!(extremal_point(&[], &[]), None);
        assert_eq!(extremal_point(&[1.0], &[f64::NAN]), None);
    }

    #[test]
    fn zero_coordinates_keep_anchor_on_point() {
        assert_eq!(anchor((0.0, 0.0), Offset::new(0.5, 0.5)), (0.0, 0.0));
        assert_eq!(anchor((0.0, 10.0), Offset::new(0.5, 0.5)), (0.0, 15.0));
    }

    #[test]
    fn empty_series_is_not_annotated() {
        let mut chart = Chart::new();
        place(&mut chart, &[], &[], Offset::new(0.1, 0.1), "%d", 15.0).unwrap();
        assert!(chart.annotations().is_empty());
    }

    #[test]
    fn invalid_format() {
        let mut chart = Chart::new();
        let offset = Offset::new(0.1, 0.1);
        let err = place(&mut chart, &[1.0], &[1.0], offset, "%q", 15.0)
            .unwrap_err();
        assert!(matches!(err, PlotError::Usage(_)));
    }

    #[quickcheck]
    fn anchor_formula(x: f64, y: f64, x_offset: f64, y_offset: f64) -> bool {
        let values = [x, y, x_offset, y_offset];
        if values.iter().any(|value| !value.is_finite()) {
            return true;
        }
        let (anchor_x, anchor_y) =
            anchor((x, y), Offset::new(x_offset, y_offset));
        anchor_x.to_bits() == (x - x * x_offset).to_bits()
            && anchor_y.to_bits() == (y + y * y_offset).to_bits()
    }
}
