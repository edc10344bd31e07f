// THEORY:
// The `position` module is the Spatial Normalizer. It maps a pixel bounding box
// onto a centered, scale-invariant frame where the image center is the origin and
// the half-width / half-height map to 1.0, so (-1,-1) is the top-left corner and a
// full-frame box has width 2.0. From that descriptor it derives a coarse
// horizontal `Region` relative to the viewer.
//
// It is a stateless utility: validation happens up front, each violated bound
// reported with its own message, and the computation is a handful of divisions.

use crate::core_modules::observation::PixelBox;
use crate::error::BoxViolation;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse horizontal placement of an object relative to the image center.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    Left,
    Center,
    Right,
}

impl Region {
    pub fn as_str(&self) -> &'static str {
        match self {
            Region::Left => "left",
            Region::Center => "center",
            Region::Right => "right",
        }
    }

    /// Classify a normalized left edge `x` and normalized `width`.
    ///
    /// A box whose left edge sits exactly on the center line (`x == 0`) is `Right`.
    pub fn classify(x: f64, width: f64) -> Self {
        if x >= 0.0 {
            Region::Right
        } else if x + width <= 0.0 {
            Region::Left
        } else {
            Region::Center
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A center-relative, scale-invariant description of where a box sits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionDescriptor {
    /// Left edge, -1.0 at the left border of the image, 0.0 at the center.
    pub x: f64,
    /// Top edge, -1.0 at the top border of the image, 0.0 at the center.
    pub y: f64,
    /// Always 0.0; depth is not estimated.
    pub z: f64,
    pub width: f64,
    pub height: f64,
    /// Always 0.0; depth is not estimated.
    pub depth: f64,
    pub region: Region,
}

fn validate(image_dims: (u32, u32), bbox: &PixelBox) -> Result<(), BoxViolation> {
    let (image_width, image_height) = (image_dims.0 as f64, image_dims.1 as f64);

    if bbox.xmin > bbox.xmax {
        return Err(BoxViolation::XminGreaterThanXmax);
    }
    if bbox.ymin > bbox.ymax {
        return Err(BoxViolation::YminGreaterThanYmax);
    }
    if bbox.xmin > image_width {
        return Err(BoxViolation::XminBeyondWidth);
    }
    if bbox.xmax > image_width {
        return Err(BoxViolation::XmaxBeyondWidth);
    }
    if bbox.ymin > image_height {
        return Err(BoxViolation::YminBeyondHeight);
    }
    if bbox.ymax > image_height {
        return Err(BoxViolation::YmaxBeyondHeight);
    }
    if bbox.xmin < 0.0 {
        return Err(BoxViolation::NegativeXmin);
    }
    if bbox.ymin < 0.0 {
        return Err(BoxViolation::NegativeYmin);
    }
    if image_dims.0 == 0 || image_dims.1 == 0 {
        return Err(BoxViolation::EmptyImage);
    }
    Ok(())
}

/// Map a pixel box on a `(width, height)` image to a `PositionDescriptor`.
pub fn normalize(image_dims: (u32, u32), bbox: &PixelBox) -> Result<PositionDescriptor, BoxViolation> {
    validate(image_dims, bbox)?;

    let x_center = image_dims.0 as f64 / 2.0;
    let y_center = image_dims.1 as f64 / 2.0;

    let x = (bbox.xmin - x_center) / x_center;
    let y = (bbox.ymin - y_center) / y_center;
    let width = bbox.width() / x_center;
    let height = bbox.height() / y_center;

    Ok(PositionDescriptor {
        x,
        y,
        z: 0.0,
        width,
        height,
        depth: 0.0,
        region: Region::classify(x, width),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const IMAGE: (u32, u32) = (400, 600);

    fn boxed(xmin: f64, xmax: f64, ymin: f64, ymax: f64) -> PixelBox {
        PixelBox::new(xmin, xmax, ymin, ymax)
    }

    #[test]
    fn full_frame_box_is_centered() {
        let position = normalize(IMAGE, &boxed(0.0, 400.0, 0.0, 600.0)).unwrap();
        assert_eq!(position.x, -1.0);
        assert_eq!(position.y, -1.0);
        assert_eq!(position.width, 2.0);
        assert_eq!(position.height, 2.0);
        assert_eq!(position.z, 0.0);
        assert_eq!(position.depth, 0.0);
        assert_eq!(position.region, Region::Center);
    }

    #[test]
    fn scaled_offsets_match_hand_computation() {
        let position = normalize(IMAGE, &boxed(10.0, 90.0, 10.0, 90.0)).unwrap();
        assert!((position.x - -0.95).abs() < 1e-12);
        assert!((position.y - -0.9666666666666667).abs() < 1e-12);
        assert!((position.width - 0.4).abs() < 1e-12);
        assert!((position.height - 0.26666666666666666).abs() < 1e-12);
    }

    #[test]
    fn box_left_of_center_is_left() {
        let position = normalize(IMAGE, &boxed(0.0, 100.0, 0.0, 200.0)).unwrap();
        assert_eq!(position.region, Region::Left);
    }

    #[test]
    fn box_ending_on_center_line_is_left() {
        let position = normalize(IMAGE, &boxed(50.0, 200.0, 0.0, 200.0)).unwrap();
        assert_eq!(position.region, Region::Left);
    }

    #[test]
    fn box_starting_on_center_line_is_right() {
        let position = normalize(IMAGE, &boxed(200.0, 400.0, 300.0, 400.0)).unwrap();
        assert_eq!(position.x, 0.0);
        assert_eq!(position.region, Region::Right);
    }

    #[test]
    fn zero_width_box_on_center_line_is_right() {
        let position = normalize(IMAGE, &boxed(200.0, 200.0, 0.0, 10.0)).unwrap();
        assert_eq!(position.region, Region::Right);
    }

    #[test]
    fn every_box_gets_exactly_one_region() {
        for xmin in (0..=400).step_by(25) {
            for xmax in (xmin..=400).step_by(25) {
                let position =
                    normalize(IMAGE, &boxed(xmin as f64, xmax as f64, 0.0, 10.0)).unwrap();
                let right_edge = position.x + position.width;
                let expected = if position.x >= 0.0 {
                    Region::Right
                } else if right_edge <= 0.0 {
                    Region::Left
                } else {
                    Region::Center
                };
                assert_eq!(position.region, expected, "xmin={xmin} xmax={xmax}");
            }
        }
    }

    #[test]
    fn inverted_x_is_rejected() {
        let err = normalize(IMAGE, &boxed(100.0, 50.0, 0.0, 600.0)).unwrap_err();
        assert_eq!(err, BoxViolation::XminGreaterThanXmax);
        assert_eq!(err.to_string(), "xmin is greater than xmax");
    }

    #[test]
    fn inverted_y_is_rejected() {
        let err = normalize(IMAGE, &boxed(100.0, 400.0, 200.0, 100.0)).unwrap_err();
        assert_eq!(err.to_string(), "ymin is greater than ymax");
    }

    #[test]
    fn out_of_bounds_coordinates_are_rejected() {
        assert_eq!(
            normalize(IMAGE, &boxed(100.0, 600.0, 0.0, 600.0)).unwrap_err(),
            BoxViolation::XmaxBeyondWidth
        );
        assert_eq!(
            normalize(IMAGE, &boxed(0.0, 400.0, 0.0, 800.0)).unwrap_err(),
            BoxViolation::YmaxBeyondHeight
        );
        assert_eq!(
            normalize(IMAGE, &boxed(-100.0, 400.0, 100.0, 100.0)).unwrap_err(),
            BoxViolation::NegativeXmin
        );
        assert_eq!(
            normalize(IMAGE, &boxed(0.0, 400.0, -1.0, 100.0)).unwrap_err(),
            BoxViolation::NegativeYmin
        );
    }

    #[test]
    fn empty_image_is_rejected() {
        assert_eq!(
            normalize((0, 0), &boxed(0.0, 0.0, 0.0, 0.0)).unwrap_err(),
            BoxViolation::EmptyImage
        );
    }

    #[test]
    fn region_displays_lowercase() {
        assert_eq!(Region::Left.to_string(), "left");
        assert_eq!(Region::Center.to_string(), "center");
        assert_eq!(Region::Right.to_string(), "right");
    }
}
