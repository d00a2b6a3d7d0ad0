//! Color-space transfer abstraction.
//!
//! A [`ColorSpace`] is an invertible pair of pure functions translating
//! between an encoded (gamma-compressed) and a scene-linear representation:
//! `expand` decodes, `compress` encodes. Conversions elsewhere in the crate
//! take a `ColorSpace` parameter (default [`ColorSpace::Linear`]) so one code
//! path serves both gamma-encoded and scene-linear callers.

/// sRGB encoded-side linear-segment threshold (IEC 61966-2-1).
const SRGB_ENCODED_THRESHOLD: f64 = 0.04045;
/// sRGB linear-side threshold, `SRGB_ENCODED_THRESHOLD / 12.92`.
const SRGB_LINEAR_THRESHOLD: f64 = 0.003_130_8;
/// Gain of the sRGB linear segment.
const SRGB_GAIN: f64 = 12.92;
/// Offset of the sRGB power segment.
const SRGB_OFFSET: f64 = 0.055;
/// Exponent of the sRGB power segment.
const SRGB_POWER: f64 = 2.4;

/// An encode/decode transfer-function pair.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ColorSpace {
    /// Identity pair: values are already scene-linear.
    #[default]
    Linear,
    /// The piecewise sRGB curve (IEC 61966-2-1).
    Srgb,
    /// Pure power-law pair with the given decoding exponent.
    Gamma(f64),
}

impl ColorSpace {
    /// Decode one encoded component into linear light.
    #[must_use]
    pub fn expand(self, encoded: f64) -> f64 {
        match self {
            Self::Linear => encoded,
            Self::Srgb => {
                if encoded <= SRGB_ENCODED_THRESHOLD {
                    encoded / SRGB_GAIN
                } else {
                    ((encoded + SRGB_OFFSET) / (1.0 + SRGB_OFFSET)).powf(SRGB_POWER)
                }
            }
            Self::Gamma(exponent) => encoded.powf(exponent),
        }
    }

    /// Encode one linear component.
    #[must_use]
    pub fn compress(self, linear: f64) -> f64 {
        match self {
            Self::Linear => linear,
            Self::Srgb => {
                if linear <= SRGB_LINEAR_THRESHOLD {
                    linear * SRGB_GAIN
                } else {
                    (1.0 + SRGB_OFFSET) * linear.powf(1.0 / SRGB_POWER) - SRGB_OFFSET
                }
            }
            Self::Gamma(exponent) => linear.powf(1.0 / exponent),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_is_identity() {
        for v in [-0.5, 0.0, 0.25, 1.0, 2.0] {
            assert!((ColorSpace::Linear.expand(v) - v).abs() < 1e-15);
            assert!((ColorSpace::Linear.compress(v) - v).abs() < 1e-15);
        }
    }

    #[test]
    fn test_srgb_known_values() {
        // 0.5 encoded decodes to ~0.2140 linear (IEC 61966-2-1 reference)
        let lin = ColorSpace::Srgb.expand(0.5);
        assert!((lin - 0.214).abs() < 1e-3);
        assert!((ColorSpace::Srgb.compress(lin) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_srgb_linear_segment() {
        let encoded = 0.02;
        let lin = ColorSpace::Srgb.expand(encoded);
        assert!((lin - encoded / 12.92).abs() < 1e-12);
        assert!((ColorSpace::Srgb.compress(lin) - encoded).abs() < 1e-12);
    }

    #[test]
    fn test_srgb_round_trip() {
        for i in 0..=255 {
            let encoded = f64::from(i) / 255.0;
            let back = ColorSpace::Srgb.compress(ColorSpace::Srgb.expand(encoded));
            assert!(
                (back - encoded).abs() < 1e-12,
                "sRGB round trip diverged at {encoded}"
            );
        }
    }

    #[test]
    fn test_gamma_pair_inverts() {
        let space = ColorSpace::Gamma(2.2);
        for v in [0.0, 0.1, 0.5, 0.9, 1.0] {
            let back = space.compress(space.expand(v));
            assert!((back - v).abs() < 1e-12);
        }
    }

    #[test]
    fn test_nan_propagates() {
        assert!(ColorSpace::Srgb.expand(f64::NAN).is_nan());
        assert!(ColorSpace::Srgb.compress(f64::NAN).is_nan());
        assert!(ColorSpace::Gamma(2.2).expand(f64::NAN).is_nan());
    }
}
