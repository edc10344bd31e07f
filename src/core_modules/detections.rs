// THEORY:
// The `detections` module is the bridge between a raw object detector and the
// engine. Detectors speak in class ids and scores; the engine speaks in category
// names and already-trusted observations. This module resolves the ids through a
// `CategoryIndex`, drops low-confidence detections, and attaches the shared frame
// to every surviving observation.

use crate::config::DescriberConfig;
use crate::core_modules::observation::{BoundingBox, ObjectObservation};
use image::RgbImage;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Name used for class ids missing from the category index.
pub const UNKNOWN_CATEGORY: &str = "unknown object";

/// One raw detector output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Detection {
    pub class_id: u32,
    pub score: f32,
    pub bbox: BoundingBox,
}

/// Mapping from detector class id to category name.
#[derive(Debug, Clone, Default)]
pub struct CategoryIndex {
    names: HashMap<u32, String>,
}

impl CategoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, class_id: u32, name: impl Into<String>) {
        self.names.insert(class_id, name.into());
    }

    pub fn name(&self, class_id: u32) -> &str {
        self.names
            .get(&class_id)
            .map(String::as_str)
            .unwrap_or(UNKNOWN_CATEGORY)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(u32, S)> for CategoryIndex {
    fn from_iter<T: IntoIterator<Item = (u32, S)>>(iter: T) -> Self {
        Self {
            names: iter.into_iter().map(|(id, name)| (id, name.into())).collect(),
        }
    }
}

/// Turn one frame of detections into observations.
///
/// Only the first `max_objects` detections are considered, and of those only the
/// ones scoring strictly above `min_score_threshold` are kept.
pub fn observations_from_detections(
    image: Arc<RgbImage>,
    detections: &[Detection],
    categories: &CategoryIndex,
    config: &DescriberConfig,
) -> Vec<ObjectObservation> {
    let considered = config.max_objects.unwrap_or(detections.len()).min(detections.len());

    detections[..considered]
        .iter()
        .filter(|detection| detection.score > config.min_score_threshold)
        .map(|detection| {
            let category = categories.name(detection.class_id);
            debug!(
                class_id = detection.class_id,
                category,
                percent = (detection.score * 100.0) as u32,
                "Accepted detection"
            );
            ObjectObservation::new(category, detection.score, detection.bbox, Arc::clone(&image))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn categories() -> CategoryIndex {
        [(1, "person"), (47, "cup")].into_iter().collect()
    }

    fn detection(class_id: u32, score: f32) -> Detection {
        Detection {
            class_id,
            score,
            bbox: BoundingBox::new(0.1, 0.1, 0.5, 0.5),
        }
    }

    #[test]
    fn unknown_ids_resolve_to_placeholder() {
        let index = categories();
        assert_eq!(index.name(47), "cup");
        assert_eq!(index.name(999), UNKNOWN_CATEGORY);
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn threshold_is_strict() {
        let image = Arc::new(RgbImage::new(10, 10));
        let detections = [detection(1, 0.9), detection(47, 0.5), detection(47, 0.51)];
        let observations =
            observations_from_detections(image, &detections, &categories(), &DescriberConfig::default());
        let names: Vec<&str> = observations.iter().map(|o| o.category.as_str()).collect();
        assert_eq!(names, vec!["person", "cup"]);
    }

    #[test]
    fn max_objects_caps_before_filtering() {
        let image = Arc::new(RgbImage::new(10, 10));
        let detections = [detection(1, 0.2), detection(47, 0.9), detection(1, 0.9)];
        let config = DescriberConfig {
            max_objects: Some(2),
            ..DescriberConfig::default()
        };
        let observations = observations_from_detections(image, &detections, &categories(), &config);
        assert_eq!(observations.len(), 1);
        assert_eq!(observations[0].category, "cup");
    }

    #[test]
    fn observations_share_the_frame() {
        let image = Arc::new(RgbImage::new(10, 10));
        let detections = [detection(1, 0.9), detection(47, 0.9)];
        let observations =
            observations_from_detections(Arc::clone(&image), &detections, &categories(), &DescriberConfig::default());
        assert!(observations.iter().all(|o| Arc::ptr_eq(&o.source_image, &image)));
    }
}
