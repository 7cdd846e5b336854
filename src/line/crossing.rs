use crate::line::{CrossingDirection, LineGeometry, Side};

/// Decides whether a track traversed the line between two consecutive observations.
///
/// A crossing requires the previous value to be strictly outside the dead-zone on one side and
/// the current value strictly outside on the other side. Values that only touch or enter the
/// dead-zone never produce a crossing. With a zero margin this reduces to a sign flip.
///
/// # Parameters
/// * `line` - the boundary the values were computed against
/// * `previous` - side value at the last observation, `None` for a new track
/// * `current` - side value at this observation
///
pub fn detect(
    line: &LineGeometry,
    previous: Option<f32>,
    current: f32,
) -> Option<CrossingDirection> {
    let previous = previous?;
    match (line.classify_value(previous), line.classify_value(current)) {
        (Side::Above, Side::Below) => Some(CrossingDirection::Down),
        (Side::Below, Side::Above) => Some(CrossingDirection::Up),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use crate::line::crossing::detect;
    use crate::line::{CrossingDirection, LineGeometry};
    use nalgebra::Point2;

    fn horizontal(y: f32, margin: Option<f32>) -> LineGeometry {
        LineGeometry::horizontal(y, 0.0, 1000.0, margin).unwrap()
    }

    fn side_of(line: &LineGeometry, y: f32) -> f32 {
        line.side(&Point2::new(500.0, y))
    }

    #[test]
    fn new_track_never_crosses() {
        let line = horizontal(100.0, None);
        assert_eq!(detect(&line, None, 50.0), None);
    }

    #[test]
    fn sign_flip_without_margin() {
        let line = horizontal(0.0, None);
        assert_eq!(detect(&line, Some(-10.0), 10.0), Some(CrossingDirection::Down));
        assert_eq!(detect(&line, Some(10.0), -10.0), Some(CrossingDirection::Up));
        assert_eq!(detect(&line, Some(-10.0), -1.0), None);
        assert_eq!(detect(&line, Some(-10.0), 0.0), None);
    }

    #[test]
    fn dead_zone_suppression() {
        let line = horizontal(100.0, Some(5.0));
        let ys = [90.0, 102.0, 90.0];
        let sides = ys.iter().map(|y| side_of(&line, *y)).collect::<Vec<_>>();
        assert_eq!(detect(&line, Some(sides[0]), sides[1]), None);
        assert_eq!(detect(&line, Some(sides[1]), sides[2]), None);
    }

    #[test]
    fn touching_the_band_edges_is_not_enough() {
        let line = horizontal(300.0, Some(5.0));
        assert_eq!(
            detect(&line, Some(side_of(&line, 295.0)), side_of(&line, 305.0)),
            None
        );
        assert_eq!(
            detect(&line, Some(side_of(&line, 294.0)), side_of(&line, 305.0)),
            None
        );
        assert_eq!(
            detect(&line, Some(side_of(&line, 294.0)), side_of(&line, 306.0)),
            Some(CrossingDirection::Down)
        );
    }

    #[test]
    fn margin_vertical_policy() {
        let line = horizontal(300.0, Some(5.0));
        assert_eq!(
            detect(&line, Some(side_of(&line, 290.0)), side_of(&line, 310.0)),
            Some(CrossingDirection::Down)
        );
        assert_eq!(
            detect(&line, Some(side_of(&line, 320.0)), side_of(&line, 280.0)),
            Some(CrossingDirection::Up)
        );
        assert_eq!(
            detect(&line, Some(side_of(&line, 280.0)), side_of(&line, 290.0)),
            None
        );
    }
}
