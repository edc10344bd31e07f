// THEORY:
// The `observation` module holds the raw input of the engine: one detected object
// in one frame. An `ObjectObservation` is a "dumb", immutable data container. It
// is created once per detection, handed through the per-object stages, and then
// dropped; nothing about it survives into the next frame.
//
// Bounding boxes arrive from detectors in two flavors, absolute pixels or
// `[0,1]`-normalized coordinates, always ordered (ymin, xmin, ymax, xmax). The
// `BoundingBox` keeps that order as named fields and knows how to resolve itself
// into a `PixelBox` against concrete image dimensions.

use image::RgbImage;
use std::sync::Arc;

/// A bounding box as produced by a detector, either in pixel units or normalized.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub ymin: f64,
    pub xmin: f64,
    pub ymax: f64,
    pub xmax: f64,
}

/// A bounding box resolved to absolute pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelBox {
    pub xmin: f64,
    pub xmax: f64,
    pub ymin: f64,
    pub ymax: f64,
}

/// Boxes whose four coordinates sum to at most this value are treated as normalized.
const NORMALIZED_SUM_LIMIT: f64 = 4.0;

impl BoundingBox {
    pub fn new(ymin: f64, xmin: f64, ymax: f64, xmax: f64) -> Self {
        Self {
            ymin,
            xmin,
            ymax,
            xmax,
        }
    }

    /// A box covering a whole `width` x `height` image, in pixel units.
    pub fn full_frame(width: u32, height: u32) -> Self {
        Self::new(0.0, 0.0, height as f64, width as f64)
    }

    /// True when the box looks like `[0,1]` coordinates rather than pixels.
    ///
    /// A box with a negative coordinate is never normalized, so it reaches the
    /// bounds checks unscaled and is reported as the negative edge it is.
    pub fn is_normalized(&self) -> bool {
        let coordinates = [self.ymin, self.xmin, self.ymax, self.xmax];
        coordinates.iter().all(|c| *c >= 0.0) && coordinates.iter().sum::<f64>() <= NORMALIZED_SUM_LIMIT
    }

    /// Resolve to pixel coordinates, rescaling normalized boxes by the image size.
    pub fn to_pixels(&self, width: u32, height: u32) -> PixelBox {
        if self.is_normalized() {
            PixelBox {
                xmin: self.xmin * width as f64,
                xmax: self.xmax * width as f64,
                ymin: self.ymin * height as f64,
                ymax: self.ymax * height as f64,
            }
        } else {
            PixelBox {
                xmin: self.xmin,
                xmax: self.xmax,
                ymin: self.ymin,
                ymax: self.ymax,
            }
        }
    }
}

impl PixelBox {
    pub fn new(xmin: f64, xmax: f64, ymin: f64, ymax: f64) -> Self {
        Self {
            xmin,
            xmax,
            ymin,
            ymax,
        }
    }

    pub fn width(&self) -> f64 {
        self.xmax - self.xmin
    }

    pub fn height(&self) -> f64 {
        self.ymax - self.ymin
    }
}

/// One detected object instance in one frame.
#[derive(Debug, Clone)]
pub struct ObjectObservation {
    /// Already-resolved category name, e.g. "cup".
    pub category: String,
    /// Detector confidence in [0,1], already filtered by the caller.
    pub confidence: f32,
    pub bbox: BoundingBox,
    /// The frame the object was detected in. Shared by every observation of the frame.
    pub source_image: Arc<RgbImage>,
}

impl ObjectObservation {
    pub fn new(
        category: impl Into<String>,
        confidence: f32,
        bbox: BoundingBox,
        source_image: Arc<RgbImage>,
    ) -> Self {
        Self {
            category: category.into(),
            confidence,
            bbox,
            source_image,
        }
    }

    /// (width, height) of the source image.
    pub fn image_dims(&self) -> (u32, u32) {
        self.source_image.dimensions()
    }

    /// The bounding box resolved against this observation's own image.
    pub fn pixel_box(&self) -> PixelBox {
        let (width, height) = self.image_dims();
        self.bbox.to_pixels(width, height)
    }
}
