use crate::Errors;
use anyhow::Result;
use nalgebra::Point2;
use std::fmt;

/// Pure crossing decision between two consecutive side values
///
pub mod crossing;

/// Default dead-zone around the line, pixels
pub const DEFAULT_LINE_MARGIN: f32 = 12.0;

/// Default vertical position of a line built from ratios (55% of frame height)
pub const DEFAULT_LINE_Y_RATIO: f32 = 0.55;

/// Default horizontal extent of a line built from ratios
pub const DEFAULT_LINE_X_RATIOS: (f32, f32) = (0.1, 0.9);

/// Half-plane a point occupies relative to the oriented line `p1 -> p2`.
///
/// Image coordinates grow downwards, so for a left-to-right line the negative half-plane is
/// visually above the line and the positive half-plane is below it.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    /// Negative side value, outside of the dead-zone
    Above,
    /// Positive side value, outside of the dead-zone
    Below,
    /// Inside of the dead-zone (`|side| <= margin`)
    On,
}

/// Direction of a confirmed traversal
///
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CrossingDirection {
    /// From [Side::Above] to [Side::Below]
    Down,
    /// From [Side::Below] to [Side::Above]
    Up,
}

impl fmt::Display for CrossingDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CrossingDirection::Down => write!(f, "down"),
            CrossingDirection::Up => write!(f, "up"),
        }
    }
}

/// Which crossing directions are counted
///
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DirectionFilter {
    #[default]
    Both,
    Down,
    Up,
}

impl DirectionFilter {
    pub fn admits(&self, direction: CrossingDirection) -> bool {
        matches!(
            (self, direction),
            (DirectionFilter::Both, _)
                | (DirectionFilter::Down, CrossingDirection::Down)
                | (DirectionFilter::Up, CrossingDirection::Up)
        )
    }
}

/// Counting boundary: an oriented line through `p1` and `p2` with an optional dead-zone.
///
/// The side value of a point is the signed perpendicular distance (pixels) from the line, the
/// 2-D cross product of `p2 - p1` and `point - p1` divided by the line length. For a horizontal
/// left-to-right line it is exactly `point.y - line.y`.
///
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineGeometry {
    p1: Point2<f32>,
    p2: Point2<f32>,
    margin: f32,
}

impl LineGeometry {
    /// Creates the line
    ///
    /// # Parameters
    /// * `p1`, `p2` - endpoints in frame pixels, must differ
    /// * `margin` - dead-zone half-width in pixels, `None` means no dead-zone
    ///
    pub fn new(p1: Point2<f32>, p2: Point2<f32>, margin: Option<f32>) -> Result<Self> {
        if !(p1.x.is_finite() && p1.y.is_finite() && p2.x.is_finite() && p2.y.is_finite())
            || (p2 - p1).norm() <= 0.0
        {
            return Err(Errors::DegenerateLine(p1.x, p1.y).into());
        }
        let margin = margin.unwrap_or(0.0);
        if !margin.is_finite() || margin < 0.0 {
            return Err(Errors::NegativeMargin(margin).into());
        }
        Ok(Self { p1, p2, margin })
    }

    /// Horizontal left-to-right line at `y` spanning `x1..x2`
    ///
    pub fn horizontal(y: f32, x1: f32, x2: f32, margin: Option<f32>) -> Result<Self> {
        Self::new(Point2::new(x1, y), Point2::new(x2, y), margin)
    }

    /// Horizontal line placed with frame-relative ratios
    ///
    /// # Parameters
    /// * `width`, `height` - frame size
    /// * `y_ratio` - vertical position, `0.0` is the top of the frame
    /// * `x1_ratio`, `x2_ratio` - horizontal extent
    /// * `margin` - dead-zone in pixels
    ///
    pub fn from_ratios(
        width: u32,
        height: u32,
        y_ratio: f32,
        x1_ratio: f32,
        x2_ratio: f32,
        margin: Option<f32>,
    ) -> Result<Self> {
        for r in [y_ratio, x1_ratio, x2_ratio] {
            if !(0.0..=1.0).contains(&r) {
                return Err(Errors::InvalidRatio(r).into());
            }
        }
        let (w, h) = (width as f32, height as f32);
        Self::horizontal((h * y_ratio).trunc(), w * x1_ratio, w * x2_ratio, margin)
    }

    pub fn p1(&self) -> Point2<f32> {
        self.p1
    }

    pub fn p2(&self) -> Point2<f32> {
        self.p2
    }

    pub fn margin(&self) -> f32 {
        self.margin
    }

    pub fn length(&self) -> f32 {
        (self.p2 - self.p1).norm()
    }

    /// Signed perpendicular distance of `point` from the line
    ///
    pub fn side(&self, point: &Point2<f32>) -> f32 {
        let direction = self.p2 - self.p1;
        direction.perp(&(point - self.p1)) / direction.norm()
    }

    /// Classifies an already computed side value against the dead-zone
    ///
    pub fn classify_value(&self, side: f32) -> Side {
        if side.abs() <= self.margin {
            Side::On
        } else if side < 0.0 {
            Side::Above
        } else {
            Side::Below
        }
    }

    pub fn classify(&self, point: &Point2<f32>) -> Side {
        self.classify_value(self.side(point))
    }
}

#[cfg(test)]
mod tests {
    use crate::line::{CrossingDirection, DirectionFilter, LineGeometry, Side};
    use crate::{Errors, EPS};
    use nalgebra::Point2;

    #[test]
    fn horizontal_side_is_vertical_offset() {
        let line = LineGeometry::horizontal(300.0, 0.0, 1280.0, None).unwrap();
        for y in [0.0_f32, 150.0, 299.5, 300.0, 301.0, 720.0] {
            let side = line.side(&Point2::new(640.0, y));
            assert!((side - (y - 300.0)).abs() < EPS, "y={y} side={side}");
        }
    }

    #[test]
    fn reversed_line_flips_sign() {
        let line = LineGeometry::horizontal(300.0, 1280.0, 0.0, None).unwrap();
        assert!(line.side(&Point2::new(10.0, 310.0)) < 0.0);
        assert_eq!(line.classify(&Point2::new(10.0, 310.0)), Side::Above);
    }

    #[test]
    fn diagonal_line() {
        let line = LineGeometry::new(Point2::new(0.0, 0.0), Point2::new(100.0, 100.0), None).unwrap();
        let below = line.side(&Point2::new(0.0, 10.0));
        let above = line.side(&Point2::new(10.0, 0.0));
        assert!(below > 0.0);
        assert!(above < 0.0);
        assert!((below - 10.0 / 2.0_f32.sqrt()).abs() < 1e-4);
        assert!(line.side(&Point2::new(50.0, 50.0)).abs() < EPS);
    }

    #[test]
    fn classify_with_margin() {
        let line = LineGeometry::horizontal(100.0, 0.0, 200.0, Some(5.0)).unwrap();
        assert_eq!(line.classify(&Point2::new(0.0, 90.0)), Side::Above);
        assert_eq!(line.classify(&Point2::new(0.0, 95.0)), Side::On);
        assert_eq!(line.classify(&Point2::new(0.0, 102.0)), Side::On);
        assert_eq!(line.classify(&Point2::new(0.0, 105.0)), Side::On);
        assert_eq!(line.classify(&Point2::new(0.0, 105.5)), Side::Below);
    }

    #[test]
    fn zero_margin_only_exact_hits_are_on() {
        let line = LineGeometry::horizontal(100.0, 0.0, 200.0, None).unwrap();
        assert_eq!(line.classify(&Point2::new(0.0, 100.0)), Side::On);
        assert_eq!(line.classify(&Point2::new(0.0, 100.1)), Side::Below);
        assert_eq!(line.classify(&Point2::new(0.0, 99.9)), Side::Above);
    }

    #[test]
    fn degenerate_line() {
        let p = Point2::new(10.0, 10.0);
        let err = LineGeometry::new(p, p, None).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<Errors>(),
            Some(Errors::DegenerateLine(..))
        ));

        let err = LineGeometry::horizontal(10.0, 0.0, 10.0, Some(-1.0)).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<Errors>(),
            Some(Errors::NegativeMargin(_))
        ));
    }

    #[test]
    fn from_ratios() {
        let line = LineGeometry::from_ratios(1280, 720, 0.55, 0.1, 0.9, Some(12.0)).unwrap();
        assert!((line.p1().y - 396.0).abs() < EPS);
        assert!((line.p1().x - 128.0).abs() < EPS);
        assert!((line.p2().x - 1152.0).abs() < EPS);
        assert!((line.margin() - 12.0).abs() < EPS);

        let err = LineGeometry::from_ratios(1280, 720, 1.5, 0.1, 0.9, None).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<Errors>(),
            Some(Errors::InvalidRatio(_))
        ));
    }

    #[test]
    fn direction_filter() {
        assert!(DirectionFilter::Both.admits(CrossingDirection::Up));
        assert!(DirectionFilter::Both.admits(CrossingDirection::Down));
        assert!(DirectionFilter::Down.admits(CrossingDirection::Down));
        assert!(!DirectionFilter::Down.admits(CrossingDirection::Up));
        assert!(!DirectionFilter::Up.admits(CrossingDirection::Down));
        assert_eq!(CrossingDirection::Down.to_string(), "down");
        assert_eq!(CrossingDirection::Up.to_string(), "up");
    }
}
