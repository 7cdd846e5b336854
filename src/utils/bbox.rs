use crate::utils::EstimateClose;
use crate::Errors;
use anyhow::Result;
use nalgebra::Point2;

/// Point of the box that is judged against the counting line
///
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Anchor {
    /// Geometric center of the box
    #[default]
    Center,
    /// Middle of the bottom edge, where a vehicle touches the road
    BottomCenter,
}

/// Bounding box in the format (x1, y1, x2, y2), frame-pixel coordinates
///
#[derive(Clone, Default, Debug, Copy, PartialEq)]
pub struct BoundingBox {
    _left: f32,
    _top: f32,
    _right: f32,
    _bottom: f32,
}

impl BoundingBox {
    /// Constructor from the corner coordinates the detector emits
    ///
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self {
            _left: x1,
            _top: y1,
            _right: x2,
            _bottom: y2,
        }
    }

    /// Constructor from left, top, width, height
    ///
    pub fn ltwh(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self::new(left, top, left + width, top + height)
    }

    pub fn left(&self) -> f32 {
        self._left
    }

    pub fn top(&self) -> f32 {
        self._top
    }

    pub fn right(&self) -> f32 {
        self._right
    }

    pub fn bottom(&self) -> f32 {
        self._bottom
    }

    pub fn width(&self) -> f32 {
        self._right - self._left
    }

    pub fn height(&self) -> f32 {
        self._bottom - self._top
    }

    pub fn center(&self) -> Point2<f32> {
        Point2::new(
            (self._left + self._right) / 2.0,
            (self._top + self._bottom) / 2.0,
        )
    }

    pub fn bottom_center(&self) -> Point2<f32> {
        Point2::new((self._left + self._right) / 2.0, self._bottom)
    }

    pub fn anchor(&self, anchor: Anchor) -> Point2<f32> {
        match anchor {
            Anchor::Center => self.center(),
            Anchor::BottomCenter => self.bottom_center(),
        }
    }

    /// The box must have finite coordinates and a positive area
    ///
    pub fn validate(&self) -> Result<()> {
        let coords = [self._left, self._top, self._right, self._bottom];
        if coords.iter().any(|c| !c.is_finite()) || self.width() <= 0.0 || self.height() <= 0.0 {
            return Err(Errors::DegenerateBox(self._left, self._top, self._right, self._bottom).into());
        }
        Ok(())
    }
}

impl EstimateClose for BoundingBox {
    fn almost_same(&self, other: &Self, eps: f32) -> bool {
        (self._left - other._left).abs() < eps
            && (self._top - other._top).abs() < eps
            && (self._right - other._right).abs() < eps
            && (self._bottom - other._bottom).abs() < eps
    }
}
