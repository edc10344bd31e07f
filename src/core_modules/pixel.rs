// THEORY (1D Pixel Heuristics):
// The `Pixel` module is the most fundamental unit of the engine. It is a "dumb"
// data container for a single RGB pixel plus the single-pixel heuristics the color
// estimator needs: HSV value, chroma, saturation and hue. Nothing here looks at a
// neighbor; grouping pixels into a histogram belongs to the `color` module.
//
// Channel forms:
// - raw (0..255 bytes), as read from the source image
// - normalized (0..1 sRGB), divide by 255.0, still gamma-encoded
//
// The HSV triple follows the common 8-bit convention: hue is halved so the full
// circle fits in 0..180, saturation and value are scaled to 0..255. Hand-tuned
// hue boundaries elsewhere in the crate are written against that axis.

pub mod pixel {
    use image::Rgb;

    pub type Channel = u8;
    pub type NormalizedChannel = f32;
    pub type Hue = f32;
    pub type HalfHue = u8;
    pub type SaturationHSV = f32;
    pub type ValueHSV = f32;
    pub type Chroma = f32;

    /// Hue values in the half-hue representation lie in `0..HALF_HUE_RANGE`.
    pub const HALF_HUE_RANGE: u16 = 180;

    /// A "dumb" data container representing a single RGB pixel.
    #[derive(Debug, Clone, Copy, PartialEq, Default)]
    pub struct Pixel {
        /// The red channel value (0-255).
        pub red: Channel,
        /// The green channel value (0-255).
        pub green: Channel,
        /// The blue channel value (0-255).
        pub blue: Channel,
        /// The red channel value (0.0-1.0).
        pub red_normalized: NormalizedChannel,
        /// The green channel value (0.0-1.0).
        pub green_normalized: NormalizedChannel,
        /// The blue channel value (0.0-1.0).
        pub blue_normalized: NormalizedChannel,
    }

    /// An 8-bit HSV triple: hue in 0..180, saturation and value in 0..=255.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Hsv {
        pub hue: HalfHue,
        pub saturation: Channel,
        pub value: Channel,
    }

    impl Pixel {
        pub fn new(red: Channel, green: Channel, blue: Channel) -> Self {
            Pixel {
                red,
                green,
                blue,
                red_normalized: red as NormalizedChannel / 255.0f32,
                green_normalized: green as NormalizedChannel / 255.0f32,
                blue_normalized: blue as NormalizedChannel / 255.0f32,
            }
        }

        fn maximum_channel(&self) -> NormalizedChannel {
            self.red_normalized
                .max(self.green_normalized.max(self.blue_normalized))
        }

        fn minimum_channel(&self) -> NormalizedChannel {
            self.red_normalized
                .min(self.green_normalized.min(self.blue_normalized))
        }

        /// HSV Value (V): brightness defined as max(R, G, B), 0..1.
        pub fn value_hsv(&self) -> ValueHSV {
            self.maximum_channel()
        }

        /// Chroma (C): color purity = max(R,G,B) - min(R,G,B).
        pub fn chroma(&self) -> Chroma {
            self.maximum_channel() - self.minimum_channel()
        }

        /// Saturation (HSV): S = chroma / value. Zero for black.
        pub fn saturation_hsv(&self) -> SaturationHSV {
            let maximum_channel = self.maximum_channel();
            if maximum_channel <= 1e-6 {
                return 0.0;
            }
            self.chroma() / maximum_channel
        }

        /// Hue angle in degrees [0, 360). Grays have no hue and report 0.
        pub fn hue(&self) -> Hue {
            let maximum_channel = self.maximum_channel();
            let chroma = self.chroma();

            if chroma <= 1e-6 {
                return 0.0;
            }

            let inverse_chroma = 1.0 / chroma;

            let (base_difference, sector_offset) = if maximum_channel == self.red_normalized {
                (self.green_normalized - self.blue_normalized, 0.0)
            } else if maximum_channel == self.green_normalized {
                (self.blue_normalized - self.red_normalized, 2.0)
            } else {
                (self.red_normalized - self.green_normalized, 4.0)
            };

            let mut hue_degrees = (base_difference * inverse_chroma + sector_offset) * 60.0;
            if hue_degrees < 0.0 {
                hue_degrees += 360.0;
            }
            hue_degrees
        }

        /// Hue on the half-degree axis, rounded to the nearest integer in 0..180.
        pub fn half_hue(&self) -> HalfHue {
            let half = (self.hue() / 2.0).round() as u16;
            (half % HALF_HUE_RANGE) as HalfHue
        }

        pub fn to_hsv(&self) -> Hsv {
            Hsv {
                hue: self.half_hue(),
                saturation: (self.saturation_hsv() * 255.0).round() as Channel,
                // Value is the max raw channel; no rounding needed.
                value: self.red.max(self.green.max(self.blue)),
            }
        }
    }

    impl From<&Rgb<u8>> for Pixel {
        fn from(rgb: &Rgb<u8>) -> Self {
            Pixel::new(rgb[0], rgb[1], rgb[2])
        }
    }

    impl From<[u8; 3]> for Pixel {
        fn from(channels: [u8; 3]) -> Self {
            Pixel::new(channels[0], channels[1], channels[2])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::pixel::*;

    #[test]
    fn primary_hues_land_on_the_half_axis() {
        assert_eq!(Pixel::new(200, 0, 0).half_hue(), 0);
        assert_eq!(Pixel::new(0, 200, 0).half_hue(), 60);
        assert_eq!(Pixel::new(0, 0, 200).half_hue(), 120);
        assert_eq!(Pixel::new(200, 200, 0).half_hue(), 30);
    }

    #[test]
    fn hue_near_full_circle_wraps_to_zero() {
        // 359.x degrees rounds to 180 on the half axis, which is the same angle as 0.
        let pixel = Pixel::new(255, 0, 2);
        assert!(pixel.hue() > 359.0);
        assert_eq!(pixel.half_hue(), 0);
    }

    #[test]
    fn gray_has_no_hue_or_saturation() {
        let pixel = Pixel::new(90, 90, 90);
        assert_eq!(pixel.hue(), 0.0);
        let hsv = pixel.to_hsv();
        assert_eq!(hsv.saturation, 0);
        assert_eq!(hsv.value, 90);
    }

    #[test]
    fn black_saturation_is_zero() {
        assert_eq!(Pixel::new(0, 0, 0).saturation_hsv(), 0.0);
    }

    #[test]
    fn value_is_max_channel() {
        let hsv = Pixel::from([10u8, 140, 70]).to_hsv();
        assert_eq!(hsv.value, 140);
        assert_eq!(hsv.saturation, 237);
    }
}
