// THEORY:
// The `color` module is the Color Estimator. Its job is to answer "what color is
// this object?" in the words a person would use, from nothing but the pixels
// inside its bounding box.
//
// Algorithm:
// 1.  **Center Crop**: The box is inset by a quarter of its width and height on
//     every side. Detector boxes are loose; the central half is mostly object,
//     the border is mostly background.
// 2.  **HSV Conversion**: Each pixel is converted with the single-pixel
//     heuristics in `pixel` into an 8-bit HSV triple (hue on the 0..180 axis).
// 3.  **Brightness Gate**: The Value channel is digitized into 32 equal bins.
//     The darkest 5 bins are `black`, the brightest 7 are `white`. Only the
//     remaining, chromatic pixels get a hue name.
// 4.  **Hue Buckets**: Eight hand-tuned angular ranges map hue to a color name.
//     Red straddles the wrap point, so both ends of the axis count as red.
// 5.  **Normalization**: All ten counts are divided by the number of sampled
//     pixels, giving a `ColorProfile` that sums to 1.0.
//
// Palette order is fixed and meaningful: when two colors tie for the largest
// share, the one listed first wins.

use crate::core_modules::observation::BoundingBox;
use crate::core_modules::pixel::pixel::{HalfHue, Pixel};
use crate::error::DescribeError;
use image::imageops;
use image::{GenericImageView, RgbImage};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::trace;

const PALETTE_SIZE: usize = 10;

/// Number of equal-width bins the Value channel is digitized into.
const VALUE_BINS: usize = 32;
/// Pixels in the lowest `BLACK_BINS` value bins are black.
const BLACK_BINS: usize = 5;
/// Pixels in the highest `WHITE_BINS` value bins are white.
const WHITE_BINS: usize = 7;

/// Exclusive upper edge of each hue bucket on the 0..180 axis, in ascending order.
/// Anything at or above the last edge wraps back to red.
const HUE_BUCKETS: [(HalfHue, Color); 8] = [
    (7, Color::Red),
    (22, Color::Orange),
    (37, Color::Yellow),
    (82, Color::Green),
    (97, Color::Cyan),
    (127, Color::Blue),
    (142, Color::Purple),
    (171, Color::Pink),
];

/// One entry of the fixed, ordered color palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Black,
    White,
    Red,
    Orange,
    Yellow,
    Green,
    Cyan,
    Blue,
    Purple,
    Pink,
}

impl Color {
    /// The palette, in tie-break order.
    pub const ALL: [Color; PALETTE_SIZE] = [
        Color::Black,
        Color::White,
        Color::Red,
        Color::Orange,
        Color::Yellow,
        Color::Green,
        Color::Cyan,
        Color::Blue,
        Color::Purple,
        Color::Pink,
    ];

    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Color::Black => "black",
            Color::White => "white",
            Color::Red => "red",
            Color::Orange => "orange",
            Color::Yellow => "yellow",
            Color::Green => "green",
            Color::Cyan => "cyan",
            Color::Blue => "blue",
            Color::Purple => "purple",
            Color::Pink => "pink",
        }
    }

    /// Name a chromatic pixel's half-hue.
    pub fn from_half_hue(hue: HalfHue) -> Self {
        HUE_BUCKETS
            .iter()
            .find(|(upper, _)| hue < *upper)
            .map(|(_, color)| *color)
            .unwrap_or(Color::Red)
    }

    /// Classify one pixel: brightness first, hue only for chromatic pixels.
    pub fn classify(pixel: &Pixel) -> Self {
        let hsv = pixel.to_hsv();
        let bin = hsv.value as usize * VALUE_BINS / 256;
        if bin < BLACK_BINS {
            Color::Black
        } else if bin >= VALUE_BINS - WHITE_BINS {
            Color::White
        } else {
            Self::from_half_hue(hsv.hue)
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized frequency of every palette color over a sampled pixel population.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorProfile {
    frequencies: [f64; PALETTE_SIZE],
}

impl ColorProfile {
    /// Wrap a histogram that is already normalized, indexed in palette order.
    pub fn from_frequencies(frequencies: [f64; PALETTE_SIZE]) -> Self {
        Self { frequencies }
    }

    /// A profile where every sampled pixel was `color`.
    pub fn solid(color: Color) -> Self {
        let mut frequencies = [0.0; PALETTE_SIZE];
        frequencies[color.index()] = 1.0;
        Self { frequencies }
    }

    fn from_counts(counts: &[usize; PALETTE_SIZE], total: usize) -> Self {
        let mut frequencies = [0.0; PALETTE_SIZE];
        for (frequency, count) in frequencies.iter_mut().zip(counts) {
            *frequency = *count as f64 / total as f64;
        }
        Self { frequencies }
    }

    pub fn frequency(&self, color: Color) -> f64 {
        self.frequencies[color.index()]
    }

    /// (color, frequency) pairs in palette order.
    pub fn iter(&self) -> impl Iterator<Item = (Color, f64)> + '_ {
        Color::ALL.iter().map(|color| (*color, self.frequency(*color)))
    }

    pub fn total(&self) -> f64 {
        self.frequencies.iter().sum()
    }

    /// The most frequent color; the earliest palette entry wins a tie.
    pub fn dominant(&self) -> Color {
        let mut best = Color::ALL[0];
        let mut best_frequency = self.frequency(best);
        for (color, frequency) in self.iter().skip(1) {
            if frequency > best_frequency {
                best = color;
                best_frequency = frequency;
            }
        }
        best
    }
}

/// Integer crop window, in pixels, after the quarter inset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CropWindow {
    x: u32,
    y: u32,
    width: u32,
    height: u32,
}

fn axis_window(lower: f64, upper: f64, limit: u32) -> (u32, u32) {
    let lower = lower.round().clamp(0.0, limit as f64) as u32;
    let upper = upper.round().clamp(0.0, limit as f64) as u32;
    let span = upper.saturating_sub(lower);
    let inset = span / 4;
    (lower + inset, span - 2 * inset)
}

fn crop_window(image: &RgbImage, bbox: Option<&BoundingBox>) -> CropWindow {
    let (image_width, image_height) = image.dimensions();
    let pixel_box = bbox
        .copied()
        .unwrap_or_else(|| BoundingBox::full_frame(image_width, image_height))
        .to_pixels(image_width, image_height);

    let (x, width) = axis_window(pixel_box.xmin, pixel_box.xmax, image_width);
    let (y, height) = axis_window(pixel_box.ymin, pixel_box.ymax, image_height);
    CropWindow {
        x,
        y,
        width,
        height,
    }
}

/// Estimate the color distribution of `image` inside `bbox` (or the whole image).
///
/// `bbox` may be in pixels or normalized; see `BoundingBox::is_normalized`.
pub fn estimate_colors(image: &RgbImage, bbox: Option<&BoundingBox>) -> Result<ColorProfile, DescribeError> {
    let window = crop_window(image, bbox);
    if window.width == 0 || window.height == 0 {
        return Err(DescribeError::DegenerateRegion {
            width: window.width,
            height: window.height,
        });
    }

    let crop = imageops::crop_imm(image, window.x, window.y, window.width, window.height);

    let mut counts = [0usize; PALETTE_SIZE];
    for (_, _, rgb) in crop.pixels() {
        let color = Color::classify(&Pixel::from(&rgb));
        counts[color.index()] += 1;
    }

    let total = (window.width * window.height) as usize;
    trace!(
        x = window.x,
        y = window.y,
        width = window.width,
        height = window.height,
        total,
        "Estimated color histogram"
    );

    Ok(ColorProfile::from_counts(&counts, total))
}
