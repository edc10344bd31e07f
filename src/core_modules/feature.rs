// THEORY:
// The `feature` module is the Feature Extractor. It collapses everything known
// about one object in one frame into the three properties the narration can speak
// about: what it is, what color it mostly is, and which side it is on. The
// resulting `ObjectFeature` is a frozen value, used only as a grouping key.

use crate::core_modules::color::{Color, ColorProfile};
use crate::core_modules::position::{PositionDescriptor, Region};
use serde::{Deserialize, Serialize};

/// Immutable (category, dominant color, region) signature of one observation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectFeature {
    pub category: String,
    pub color: Color,
    pub region: Region,
}

impl ObjectFeature {
    pub fn new(category: impl Into<String>, color: Color, region: Region) -> Self {
        Self {
            category: category.into(),
            color,
            region,
        }
    }
}

pub fn extract(category: &str, color_profile: &ColorProfile, position: &PositionDescriptor) -> ObjectFeature {
    ObjectFeature::new(category, color_profile.dominant(), position.region)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn takes_dominant_color_and_region() {
        let mut frequencies = [0.0; 10];
        frequencies[Color::Yellow.index()] = 0.7;
        frequencies[Color::White.index()] = 0.3;
        let profile = ColorProfile::from_frequencies(frequencies);
        let position = PositionDescriptor {
            x: 0.2,
            y: -0.5,
            z: 0.0,
            width: 0.3,
            height: 0.3,
            depth: 0.0,
            region: Region::Right,
        };

        let feature = extract("banana", &profile, &position);
        assert_eq!(feature, ObjectFeature::new("banana", Color::Yellow, Region::Right));
    }
}
