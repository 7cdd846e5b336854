use crate::detection::Detection;
use crate::utils::bbox::BoundingBox;
use rand::distributions::Uniform;
use rand::prelude::ThreadRng;
use rand::Rng;

/// Side of the square boxes produced by the helpers
pub const BOX_SIZE: f32 = 20.0;

/// Square box centered at `(cx, cy)`
///
pub fn box_at(cx: f32, cy: f32) -> BoundingBox {
    let half = BOX_SIZE / 2.0;
    BoundingBox::new(cx - half, cy - half, cx + half, cy + half)
}

pub fn detection_at(track_id: u64, class_label: &str, confidence: f32, cx: f32, cy: f32) -> Detection {
    Detection::new(track_id, class_label, confidence, box_at(cx, cy))
}

/// Endless generator of a track moving vertically with a constant step and a random jitter
///
/// # Parameters
/// * `track_id` - id of every produced detection
/// * `class_label`, `confidence` - constant detector output
/// * `x`, `y` - start center
/// * `step` - vertical movement per frame, negative values move up
/// * `jitter` - maximal absolute random vertical offset added to every position
///
pub struct TrackGen {
    track_id: u64,
    class_label: String,
    confidence: f32,
    x: f32,
    y: f32,
    step: f32,
    gen: ThreadRng,
    dist_jitter: Uniform<f32>,
}

impl TrackGen {
    pub fn new(
        track_id: u64,
        class_label: &str,
        confidence: f32,
        x: f32,
        y: f32,
        step: f32,
        jitter: f32,
    ) -> Self {
        Self {
            track_id,
            class_label: class_label.to_string(),
            confidence,
            x,
            y,
            step,
            gen: rand::thread_rng(),
            dist_jitter: Uniform::new_inclusive(-jitter, jitter),
        }
    }

    /// Current center without the jitter
    ///
    pub fn position(&self) -> (f32, f32) {
        (self.x, self.y)
    }
}

impl Iterator for TrackGen {
    type Item = Detection;

    fn next(&mut self) -> Option<Self::Item> {
        self.y += self.step;
        let y = self.y + self.gen.sample(self.dist_jitter);
        Some(detection_at(
            self.track_id,
            &self.class_label,
            self.confidence,
            self.x,
            y,
        ))
    }
}

#[cfg(test)]
mod tests {
    use crate::test_stuff::{box_at, TrackGen, BOX_SIZE};

    #[test]
    fn box_helper() {
        let b = box_at(100.0, 50.0);
        assert_eq!(b.width(), BOX_SIZE);
        assert_eq!(b.center().y, 50.0);
    }

    #[test]
    fn track_gen() {
        let mut g = TrackGen::new(3, "car", 0.8, 10.0, 100.0, 5.0, 1.0);
        for i in 1..=10 {
            let d = g.next().unwrap();
            assert_eq!(d.track_id, Some(3));
            let expected = 100.0 + 5.0 * i as f32;
            assert!((d.bbox.center().y - expected).abs() <= 1.0 + 1e-3);
        }
        assert_eq!(g.position(), (10.0, 150.0));

        let mut still = TrackGen::new(4, "bus", 0.8, 10.0, 100.0, 0.0, 0.0);
        assert_eq!(still.next().unwrap().bbox.center().y, 100.0);
    }
}
