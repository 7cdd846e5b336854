use itertools::Itertools;
use once_cell::sync::Lazy;
use std::collections::HashSet;
use std::sync::Arc;

/// Class names emitted by the vehicle detector, indexed by class id
pub const VEHICLE_CLASSES: [&str; 18] = [
    "ambulance",
    "boxtruck",
    "bus",
    "e_tan",
    "hatchback",
    "jeep",
    "mini_truck",
    "motorcycle",
    "pickup",
    "saleng",
    "sedan",
    "songthaew",
    "supercar",
    "suv",
    "taxi",
    "truck",
    "tuktuk",
    "van",
];

static DEFAULT_VOCABULARY: Lazy<ClassVocabulary> =
    Lazy::new(|| ClassVocabulary::new(VEHICLE_CLASSES.iter().copied()));

/// Fixed set of class labels a counting session knows about.
///
/// The vocabulary pre-seeds the per-class counters. Every label is counted unless the vocabulary
/// is restricted with [ClassVocabulary::count_only]; detections with a label outside of the
/// restricted set are ignored by the counter.
///
#[derive(Clone, Debug, PartialEq)]
pub struct ClassVocabulary {
    names: Arc<Vec<String>>,
    counted: Option<Arc<HashSet<String>>>,
}

impl Default for ClassVocabulary {
    fn default() -> Self {
        DEFAULT_VOCABULARY.clone()
    }
}

impl ClassVocabulary {
    /// Creates a vocabulary that counts every label. Duplicate names are dropped.
    ///
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names = names.into_iter().map(Into::<String>::into).unique().collect::<Vec<_>>();
        Self {
            names: Arc::new(names),
            counted: None,
        }
    }

    /// Restricts counting to `labels`; labels unknown to the vocabulary are ignored
    ///
    pub fn count_only<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let counted = labels
            .into_iter()
            .filter(|l| self.contains(l.as_ref()))
            .map(|l| l.as_ref().to_string())
            .collect();
        self.counted = Some(Arc::new(counted));
        self
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn contains(&self, label: &str) -> bool {
        self.names.iter().any(|n| n == label)
    }

    pub fn is_counted(&self, label: &str) -> bool {
        match &self.counted {
            Some(counted) => counted.contains(label),
            None => true,
        }
    }

    /// Class name for the detector's class id
    ///
    pub fn label_of(&self, class_id: usize) -> Option<&str> {
        self.names.get(class_id).map(String::as_str)
    }

    pub fn id_of(&self, label: &str) -> Option<usize> {
        self.names.iter().position(|n| n == label)
    }
}

#[cfg(test)]
mod tests {
    use crate::vocabulary::{ClassVocabulary, VEHICLE_CLASSES};

    #[test]
    fn default_is_vehicle_model() {
        let v = ClassVocabulary::default();
        assert_eq!(v.len(), VEHICLE_CLASSES.len());
        assert_eq!(v.label_of(0), Some("ambulance"));
        assert_eq!(v.label_of(17), Some("van"));
        assert_eq!(v.label_of(18), None);
        assert_eq!(v.id_of("motorcycle"), Some(7));
        assert!(v.names().all(|n| v.is_counted(n)));
        assert!(v.is_counted("car"));
    }

    #[test]
    fn count_only() {
        let v = ClassVocabulary::default().count_only(["bus", "truck", "spaceship"]);
        assert!(v.is_counted("bus"));
        assert!(v.is_counted("truck"));
        assert!(!v.is_counted("sedan"));
        assert!(!v.is_counted("spaceship"));
        assert!(v.contains("sedan"));
    }

    #[test]
    fn duplicates_dropped() {
        let v = ClassVocabulary::new(["car", "bus", "car"]);
        assert_eq!(v.names().collect::<Vec<_>>(), vec!["car", "bus"]);
    }
}
