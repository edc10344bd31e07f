// THEORY:
// The `pipeline` module is the top-level API for the engine. It wires the stages
// together into the one call the outside world needs:
//
//   observations -> (position + color, per object) -> features -> groups -> sentence
//
// Every stage is a pure function of its inputs, so the pipeline itself holds no
// state between frames. Anything that must be remembered across frames lives in a
// `FrameWindow` that the caller owns and passes in.

use crate::config::DescriberConfig;
use crate::core_modules::aggregator::aggregate;
use crate::core_modules::color::estimate_colors;
use crate::core_modules::composer::compose;
use crate::core_modules::detections::{observations_from_detections, CategoryIndex, Detection};
use crate::core_modules::feature;
use crate::core_modules::position::normalize;
use crate::error::DescribeError;
use image::RgbImage;
use std::sync::Arc;
use tracing::{debug, trace};

// Re-export key data structures for the public API.
pub use crate::core_modules::aggregator::{FeatureGroup, GroupKey};
pub use crate::core_modules::color::{Color, ColorProfile};
pub use crate::core_modules::feature::ObjectFeature;
pub use crate::core_modules::observation::{BoundingBox, ObjectObservation, PixelBox};
pub use crate::core_modules::position::{PositionDescriptor, Region};
pub use crate::core_modules::window::{FrameWindow, SceneFrame};

/// Run the per-object stages for one observation.
pub fn extract_feature(observation: &ObjectObservation) -> Result<ObjectFeature, DescribeError> {
    let position = normalize(observation.image_dims(), &observation.pixel_box())?;
    let profile = estimate_colors(&observation.source_image, Some(&observation.bbox))?;
    let feature = feature::extract(&observation.category, &profile, &position);

    trace!(
        category = %feature.category,
        color = %feature.color,
        region = %feature.region,
        "Extracted object feature"
    );
    Ok(feature)
}

/// Group and narrate already-extracted features.
pub fn describe_features(
    features: &[ObjectFeature],
    include_color: bool,
    include_position: bool,
) -> Result<String, DescribeError> {
    let groups = aggregate(features, include_color, include_position);
    debug!(
        objects = features.len(),
        groups = groups.len(),
        include_color,
        include_position,
        "Composing scene description"
    );
    compose(&groups, include_color, include_position)
}

/// Describe one frame's observations as a single sentence.
///
/// An empty frame yields an empty string.
pub fn describe_scene(
    observations: &[ObjectObservation],
    include_color: bool,
    include_position: bool,
) -> Result<String, DescribeError> {
    let features = observations
        .iter()
        .map(extract_feature)
        .collect::<Result<Vec<_>, _>>()?;
    describe_features(&features, include_color, include_position)
}

/// The configured, reusable entry point for frame-by-frame narration.
#[derive(Debug, Clone)]
pub struct SceneDescriber {
    config: DescriberConfig,
}

impl SceneDescriber {
    pub fn new(config: DescriberConfig) -> Result<Self, DescribeError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &DescriberConfig {
        &self.config
    }

    /// A fresh window sized by this describer's config.
    pub fn new_window(&self) -> FrameWindow {
        FrameWindow::from_config(&self.config)
    }

    pub fn extract_frame(&self, observations: &[ObjectObservation]) -> Result<SceneFrame, DescribeError> {
        let features = observations
            .iter()
            .map(extract_feature)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(SceneFrame::new(features))
    }

    pub fn describe(&self, observations: &[ObjectObservation]) -> Result<String, DescribeError> {
        describe_scene(
            observations,
            self.config.include_color,
            self.config.include_position,
        )
    }

    /// Process one detector frame end to end, recording it in `window`.
    pub fn process_frame(
        &self,
        image: Arc<RgbImage>,
        detections: &[Detection],
        categories: &CategoryIndex,
        window: &mut FrameWindow,
    ) -> Result<String, DescribeError> {
        // Stage 1: Ingestion
        let observations = observations_from_detections(image, detections, categories, &self.config);

        // Stage 2: Per-object feature extraction
        let frame = self.extract_frame(&observations)?;

        // Stage 3: Grouping and composition
        let description = describe_features(
            &frame.features,
            self.config.include_color,
            self.config.include_position,
        )?;

        window.push(frame);
        Ok(description)
    }
}
