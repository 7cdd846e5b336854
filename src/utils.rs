/// Bounding boxes in the detector's `(x1, y1, x2, y2)` format and the anchor point judged against the line
pub mod bbox;

/// Approximate equality for geometric values
///
pub trait EstimateClose {
    fn almost_same(&self, other: &Self, eps: f32) -> bool;
}

impl EstimateClose for nalgebra::Point2<f32> {
    fn almost_same(&self, other: &Self, eps: f32) -> bool {
        (self.x - other.x).abs() < eps && (self.y - other.y).abs() < eps
    }
}
