use crate::utils::bbox::BoundingBox;
use crate::vocabulary::ClassVocabulary;
use crate::Errors;
use anyhow::Result;

/// Single tracked detection as emitted by the detector/tracker for one frame
///
#[derive(Clone, Debug, PartialEq)]
pub struct Detection {
    /// Tracker-assigned id, `None` when the tracker did not associate the box
    pub track_id: Option<u64>,
    pub class_label: String,
    /// Detector confidence in `[0, 1]`
    pub confidence: f32,
    pub bbox: BoundingBox,
}

impl Detection {
    pub fn new(
        track_id: u64,
        class_label: impl Into<String>,
        confidence: f32,
        bbox: BoundingBox,
    ) -> Self {
        Self {
            track_id: Some(track_id),
            class_label: class_label.into(),
            confidence,
            bbox,
        }
    }

    /// Detection the tracker could not associate with a track
    ///
    pub fn untracked(class_label: impl Into<String>, confidence: f32, bbox: BoundingBox) -> Self {
        Self {
            track_id: None,
            class_label: class_label.into(),
            confidence,
            bbox,
        }
    }

    /// Builds the detection from a numeric class id, `None` if the id is outside of the vocabulary
    ///
    pub fn from_class_id(
        track_id: u64,
        class_id: usize,
        vocabulary: &ClassVocabulary,
        confidence: f32,
        bbox: BoundingBox,
    ) -> Option<Self> {
        vocabulary
            .label_of(class_id)
            .map(|label| Self::new(track_id, label, confidence, bbox))
    }

    /// Checks the detection can be used for counting and returns its track id
    ///
    pub fn validate(&self) -> Result<u64> {
        let track_id = match self.track_id {
            Some(id) if id > 0 => id,
            _ => return Err(Errors::MissingTrackId.into()),
        };
        if !(0.0..=1.0).contains(&self.confidence) {
            return Err(Errors::ConfidenceOutOfRange(self.confidence).into());
        }
        self.bbox.validate()?;
        Ok(track_id)
    }
}

#[cfg(test)]
mod tests {
    use crate::detection::Detection;
    use crate::utils::bbox::BoundingBox;
    use crate::vocabulary::ClassVocabulary;
    use crate::Errors;

    fn bbox() -> BoundingBox {
        BoundingBox::new(0.0, 0.0, 10.0, 10.0)
    }

    fn error_of(d: &Detection) -> Errors {
        d.validate()
            .unwrap_err()
            .downcast_ref::<Errors>()
            .cloned()
            .unwrap()
    }

    #[test]
    fn valid() {
        assert_eq!(Detection::new(7, "car", 0.6, bbox()).validate().unwrap(), 7);
        assert_eq!(Detection::new(7, "car", 0.0, bbox()).validate().unwrap(), 7);
        assert_eq!(Detection::new(7, "car", 1.0, bbox()).validate().unwrap(), 7);
    }

    #[test]
    fn malformed() {
        assert_eq!(
            error_of(&Detection::untracked("car", 0.6, bbox())),
            Errors::MissingTrackId
        );
        assert_eq!(
            error_of(&Detection::new(0, "car", 0.6, bbox())),
            Errors::MissingTrackId
        );
        assert!(matches!(
            error_of(&Detection::new(1, "car", 60.0, bbox())),
            Errors::ConfidenceOutOfRange(_)
        ));
        assert!(matches!(
            error_of(&Detection::new(1, "car", f32::NAN, bbox())),
            Errors::ConfidenceOutOfRange(_)
        ));
        assert!(matches!(
            error_of(&Detection::new(1, "car", 0.5, BoundingBox::new(0.0, 0.0, 0.0, 0.0))),
            Errors::DegenerateBox(..)
        ));
    }

    #[test]
    fn from_class_id() {
        let v = ClassVocabulary::default();
        let d = Detection::from_class_id(3, 2, &v, 0.9, bbox()).unwrap();
        assert_eq!(d.class_label, "bus");
        assert!(Detection::from_class_id(3, 99, &v, 0.9, bbox()).is_none());
    }
}
