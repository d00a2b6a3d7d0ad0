//! CIE L\*a\*b\* and L\*C\*h° perceptual color models.
//!
//! RGB is taken through linear sRGB into CIE XYZ, chromatically adapted
//! between reference white points with precomputed Bradford matrices, and
//! pushed through the CIE 1931 nonlinearity. The default reference white is
//! D50, per the CSS Color specification; D65 is offered explicitly.
//!
//! Conversions take a [`ColorSpace`] that expands encoded RGB callers to
//! linear light first; pass [`ColorSpace::Linear`] for already-linear
//! values.

use std::f64::consts::TAU;

use crate::css::FormatOptions;
use crate::error::{Error, Result};
use crate::math::interval;
use crate::parse;
use crate::rgb::{ensure_finite, Rgba};
use crate::transfer::ColorSpace;

/// CIE 1931 nonlinearity threshold, 6/29.
const DELTA: f64 = 6.0 / 29.0;

/// Linear sRGB to XYZ (D65), sRGB primaries per IEC 61966-2-1.
const SRGB_TO_XYZ_D65: [[f64; 3]; 3] = [
    [0.412_390_799_265_959_5, 0.357_584_339_383_877_96, 0.180_480_788_401_834_3],
    [0.212_639_005_871_510_36, 0.715_168_678_767_755_9, 0.072_192_315_360_733_71],
    [0.019_330_818_715_591_85, 0.119_194_779_794_626, 0.950_532_152_249_660_5],
];

/// XYZ (D65) to linear sRGB, inverse of [`SRGB_TO_XYZ_D65`].
const XYZ_D65_TO_SRGB: [[f64; 3]; 3] = [
    [3.240_969_941_904_521_4, -1.537_383_177_570_093_5, -0.498_610_760_293_003_3],
    [-0.969_243_636_280_879_8, 1.875_967_501_507_720_7, 0.041_555_057_407_175_61],
    [0.055_630_079_696_993_61, -0.203_976_958_888_976_65, 1.056_971_514_242_878_6],
];

/// Bradford chromatic adaptation, D65 white to D50 white. Derived from the
/// Bradford cone response and the white points in [`Illuminant::white_point`],
/// so adapting the D65 white reproduces the D50 white exactly.
const D65_TO_D50: [[f64; 3]; 3] = [
    [1.047_929_792_544_996_9, 0.022_946_870_601_609_708, -0.050_192_266_289_205_27],
    [0.029_627_808_770_055_993, 0.990_434_426_753_88, -0.017_073_799_063_418_826],
    [-0.009_243_040_646_204_514, 0.015_055_191_490_298_145, 0.751_874_281_428_137_2],
];

/// Bradford chromatic adaptation, D50 white to D65 white: the f64 inverse of
/// [`D65_TO_D50`], so the pair round-trips at machine precision.
const D50_TO_D65: [[f64; 3]; 3] = [
    [0.955_473_421_488_075, -0.023_098_454_948_764_696, 0.063_259_243_200_570_73],
    [-0.028_369_709_333_863_888, 1.009_995_398_081_304_1, 0.021_041_441_191_917_327],
    [0.012_314_014_864_481_99, -0.020_507_649_298_898_957, 1.330_365_926_242_124],
];

fn mat_mul(m: &[[f64; 3]; 3], v: [f64; 3]) -> [f64; 3] {
    [
        m[0][0] * v[0] + m[0][1] * v[1] + m[0][2] * v[2],
        m[1][0] * v[0] + m[1][1] * v[1] + m[1][2] * v[2],
        m[2][0] * v[0] + m[2][1] * v[1] + m[2][2] * v[2],
    ]
}

/// Reference white point for Lab conversion.
///
/// Adaptation matrices are a static precomputed table rather than a runtime
/// cache; only these two illuminants exist here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Illuminant {
    /// D50, the CSS Color 4 Lab reference white (default).
    #[default]
    D50,
    /// D65, the sRGB native white.
    D65,
}

impl Illuminant {
    /// Tristimulus white point, Y normalized to 1.
    #[must_use]
    pub fn white_point(self) -> [f64; 3] {
        match self {
            // x,y chromaticity (0.3457, 0.3585)
            Self::D50 => [0.964_295_676_429_567_7, 1.0, 0.825_104_602_510_460_2],
            // x,y chromaticity (0.3127, 0.3290)
            Self::D65 => [0.950_455_927_051_671_6, 1.0, 1.089_057_750_759_878_4],
        }
    }

    /// Adapt an XYZ triple measured against D65 to this white.
    fn adapt_from_d65(self, xyz: [f64; 3]) -> [f64; 3] {
        match self {
            Self::D65 => xyz,
            Self::D50 => mat_mul(&D65_TO_D50, xyz),
        }
    }

    /// Adapt an XYZ triple measured against this white back to D65.
    fn adapt_to_d65(self, xyz: [f64; 3]) -> [f64; 3] {
        match self {
            Self::D65 => xyz,
            Self::D50 => mat_mul(&D50_TO_D65, xyz),
        }
    }
}

/// CIE 1931 nonlinearity: cube root above δ³, linear segment below.
fn cie_f(t: f64) -> f64 {
    if t > DELTA * DELTA * DELTA {
        t.cbrt()
    } else {
        t / (3.0 * DELTA * DELTA) + 4.0 / 29.0
    }
}

fn cie_f_inv(t: f64) -> f64 {
    if t > DELTA {
        t * t * t
    } else {
        3.0 * DELTA * DELTA * (t - 4.0 / 29.0)
    }
}

/// CIE L\*a\*b\* color. Lightness nominally 0..100; a/b unbounded.
///
/// Nothing is clamped until stringification.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lab {
    /// Perceptual lightness (nominally 0.0-100.0).
    pub lightness: f64,
    /// Green-red axis.
    pub a: f64,
    /// Blue-yellow axis.
    pub b: f64,
    /// Alpha (nominally 0.0-1.0).
    pub alpha: f64,
}

impl Default for Lab {
    fn default() -> Self {
        Self::new(0.0, 0.0, 0.0, 1.0)
    }
}

/// CIE L\*C\*h° color, the polar form of [`Lab`]. Hue in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lch {
    /// Perceptual lightness (nominally 0.0-100.0).
    pub lightness: f64,
    /// Chroma (nominally >= 0).
    pub chroma: f64,
    /// Hue angle in radians.
    pub hue: f64,
    /// Alpha (nominally 0.0-1.0).
    pub alpha: f64,
}

impl Default for Lch {
    fn default() -> Self {
        Self::new(0.0, 0.0, 0.0, 1.0)
    }
}

impl Lab {
    /// Create a new Lab color.
    #[must_use]
    pub const fn new(lightness: f64, a: f64, b: f64, alpha: f64) -> Self {
        Self {
            lightness,
            a,
            b,
            alpha,
        }
    }

    /// Convert from RGBA against reference white `white`. `space` expands
    /// encoded callers to linear light.
    #[must_use]
    pub fn from_rgba(rgba: Rgba, space: ColorSpace, white: Illuminant) -> Self {
        let linear = [
            space.expand(rgba.r),
            space.expand(rgba.g),
            space.expand(rgba.b),
        ];
        let xyz = white.adapt_from_d65(mat_mul(&SRGB_TO_XYZ_D65, linear));
        let wp = white.white_point();
        let fx = cie_f(xyz[0] / wp[0]);
        let fy = cie_f(xyz[1] / wp[1]);
        let fz = cie_f(xyz[2] / wp[2]);
        Self::new(
            116.0 * fy - 16.0,
            500.0 * (fx - fy),
            200.0 * (fy - fz),
            rgba.a,
        )
    }

    /// Caller-supplied-target variant of [`Lab::from_rgba`].
    pub fn assign_from_rgba(&mut self, rgba: Rgba, space: ColorSpace, white: Illuminant) {
        *self = Self::from_rgba(rgba, space, white);
    }

    /// Convert to RGBA. The result may be out of gamut; it is clamped only
    /// when serialized.
    #[must_use]
    pub fn to_rgba(self, space: ColorSpace, white: Illuminant) -> Rgba {
        let fy = (self.lightness + 16.0) / 116.0;
        let fx = fy + self.a / 500.0;
        let fz = fy - self.b / 200.0;
        let wp = white.white_point();
        let xyz = [
            wp[0] * cie_f_inv(fx),
            wp[1] * cie_f_inv(fy),
            wp[2] * cie_f_inv(fz),
        ];
        let linear = mat_mul(&XYZ_D65_TO_SRGB, white.adapt_to_d65(xyz));
        Rgba::new(
            space.compress(linear[0]),
            space.compress(linear[1]),
            space.compress(linear[2]),
            self.alpha,
        )
    }

    /// Convert from the polar form.
    #[must_use]
    pub fn from_lch(lch: Lch) -> Self {
        Self::new(
            lch.lightness,
            lch.chroma * lch.hue.cos(),
            lch.chroma * lch.hue.sin(),
            lch.alpha,
        )
    }

    /// Caller-supplied-target variant of [`Lab::from_lch`].
    pub fn assign_from_lch(&mut self, lch: Lch) {
        *self = Self::from_lch(lch);
    }

    /// Parse `lab()` functional notation (modern space/slash syntax only).
    pub fn from_css(s: &str) -> Result<Self> {
        Self::parse_function(s).ok_or_else(|| Error::BadCssColor(s.trim().to_string()))
    }

    fn parse_function(s: &str) -> Option<Self> {
        let args = parse::function_args(s, "lab")?;
        if args.legacy {
            return None;
        }
        let lightness = parse::number_or_percent(args.channels[0], &parse::LAB_LIGHTNESS)?;
        let a = parse::number_or_percent(args.channels[1], &parse::LAB_AXIS)?;
        let b = parse::number_or_percent(args.channels[2], &parse::LAB_AXIS)?;
        let alpha = parse::parse_alpha(args.alpha)?;
        Some(Self::new(lightness, a, b, alpha))
    }

    /// Serialize to `lab()` notation. Lightness clamps to [0, 100] here
    /// and only here.
    pub fn to_css(self, opts: &FormatOptions) -> Result<String> {
        ensure_finite(
            "lab",
            &[
                ("lightness", self.lightness),
                ("a", self.a),
                ("b", self.b),
                ("alpha", self.alpha),
            ],
        )?;
        let l = opts.fixed(self.lightness.clamp(0.0, 100.0));
        let a = opts.fixed(self.a);
        let b = opts.fixed(self.b);
        let alpha = self.alpha.clamp(0.0, 1.0);
        Ok(if alpha < 1.0 {
            format!("lab({l} {a} {b} / {})", opts.fixed(alpha))
        } else {
            format!("lab({l} {a} {b})")
        })
    }
}

impl Lch {
    /// Create a new LCh color.
    #[must_use]
    pub const fn new(lightness: f64, chroma: f64, hue: f64, alpha: f64) -> Self {
        Self {
            lightness,
            chroma,
            hue,
            alpha,
        }
    }

    /// Convert from rectangular Lab. Hue lands in `[0, 2π)`; at zero chroma
    /// it is exactly 0.
    #[must_use]
    pub fn from_lab(lab: Lab) -> Self {
        Self::new(
            lab.lightness,
            lab.b.hypot(lab.a),
            interval(lab.b.atan2(lab.a), 0.0, TAU),
            lab.alpha,
        )
    }

    /// Caller-supplied-target variant of [`Lch::from_lab`].
    pub fn assign_from_lab(&mut self, lab: Lab) {
        *self = Self::from_lab(lab);
    }

    /// Convert to rectangular Lab.
    #[must_use]
    pub fn to_lab(self) -> Lab {
        Lab::from_lch(self)
    }

    /// Convert from RGBA through Lab.
    #[must_use]
    pub fn from_rgba(rgba: Rgba, space: ColorSpace, white: Illuminant) -> Self {
        Self::from_lab(Lab::from_rgba(rgba, space, white))
    }

    /// Convert to RGBA through Lab.
    #[must_use]
    pub fn to_rgba(self, space: ColorSpace, white: Illuminant) -> Rgba {
        self.to_lab().to_rgba(space, white)
    }

    /// Whether hue carries no meaning for this color (near-zero chroma or
    /// lightness), per CSS Color 4 interpolation rules.
    #[must_use]
    pub fn is_hue_powerless(&self) -> bool {
        self.chroma.abs() < 1e-7 || self.lightness.abs() < 1e-7
    }

    /// Whether chroma carries no meaning (near-zero lightness).
    #[must_use]
    pub fn is_chroma_powerless(&self) -> bool {
        self.lightness.abs() < 1e-7
    }

    /// Parse `lch()` functional notation (modern space/slash syntax only).
    pub fn from_css(s: &str) -> Result<Self> {
        Self::parse_function(s).ok_or_else(|| Error::BadCssColor(s.trim().to_string()))
    }

    fn parse_function(s: &str) -> Option<Self> {
        let args = parse::function_args(s, "lch")?;
        if args.legacy {
            return None;
        }
        let lightness = parse::number_or_percent(args.channels[0], &parse::LAB_LIGHTNESS)?;
        let chroma = parse::number_or_percent(args.channels[1], &parse::LCH_CHROMA)?;
        let hue = parse::parse_angle(args.channels[2])?;
        let alpha = parse::parse_alpha(args.alpha)?;
        Some(Self::new(lightness, chroma, hue, alpha))
    }

    /// Serialize to `lch()` notation. Lightness clamps to [0, 100], chroma
    /// to >= 0; hue is emitted in `opts.angle_unit`.
    pub fn to_css(self, opts: &FormatOptions) -> Result<String> {
        ensure_finite(
            "lch",
            &[
                ("lightness", self.lightness),
                ("chroma", self.chroma),
                ("hue", self.hue),
                ("alpha", self.alpha),
            ],
        )?;
        let l = opts.fixed(self.lightness.clamp(0.0, 100.0));
        let c = opts.fixed(self.chroma.max(0.0));
        let h = opts.hue(self.hue);
        let alpha = self.alpha.clamp(0.0, 1.0);
        Ok(if alpha < 1.0 {
            format!("lch({l} {c} {h} / {})", opts.fixed(alpha))
        } else {
            format!("lch({l} {c} {h})")
        })
    }
}

impl From<Lch> for Lab {
    fn from(c: Lch) -> Self {
        Self::from_lch(c)
    }
}

impl From<Lab> for Lch {
    fn from(c: Lab) -> Self {
        Self::from_lab(c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LINEAR: ColorSpace = ColorSpace::Linear;

    #[test]
    fn test_adaptation_matrices_are_mutual_inverses() {
        for i in 0..3 {
            for j in 0..3 {
                let id: f64 = (0..3).map(|k| D65_TO_D50[i][k] * D50_TO_D65[k][j]).sum();
                let expected = if i == j { 1.0 } else { 0.0 };
                assert!((id - expected).abs() < 1e-12, "product[{i}][{j}] = {id}");
            }
        }
    }

    #[test]
    fn test_adaptation_maps_white_to_white() {
        let adapted = mat_mul(&D65_TO_D50, Illuminant::D65.white_point());
        let d50 = Illuminant::D50.white_point();
        for k in 0..3 {
            assert!((adapted[k] - d50[k]).abs() < 1e-12);
        }
    }

    #[test]
    fn test_white_is_l100() {
        for white in [Illuminant::D50, Illuminant::D65] {
            let lab = Lab::from_rgba(Rgba::WHITE, LINEAR, white);
            assert!((lab.lightness - 100.0).abs() < 1e-6, "white L* for {white:?}");
            assert!(lab.a.abs() < 1e-6);
            assert!(lab.b.abs() < 1e-6);
        }
    }

    #[test]
    fn test_black_is_l0() {
        let lab = Lab::from_rgba(Rgba::BLACK, LINEAR, Illuminant::D50);
        assert!(lab.lightness.abs() < 1e-9);
    }

    #[test]
    fn test_rgb_round_trip() {
        let cases = [
            Rgba::new(0.8, 0.2, 0.1, 1.0),
            Rgba::new(0.1, 0.5, 0.9, 0.5),
            Rgba::new(0.33, 0.33, 0.33, 1.0),
        ];
        for white in [Illuminant::D50, Illuminant::D65] {
            for rgba in cases {
                let back = Lab::from_rgba(rgba, LINEAR, white).to_rgba(LINEAR, white);
                assert!((back.r - rgba.r).abs() < 1e-9);
                assert!((back.g - rgba.g).abs() < 1e-9);
                assert!((back.b - rgba.b).abs() < 1e-9);
                assert!((back.a - rgba.a).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_red_reference_values() {
        // sRGB red in Lab D50 is approximately L*54.29, a*80.81, b*69.89
        // (CSS Color 4 sample conversion)
        let lab = Lab::from_rgba(Rgba::new(1.0, 0.0, 0.0, 1.0), ColorSpace::Srgb, Illuminant::D50);
        assert!((lab.lightness - 54.29).abs() < 0.05, "L* {}", lab.lightness);
        assert!((lab.a - 80.81).abs() < 0.1, "a* {}", lab.a);
        assert!((lab.b - 69.89).abs() < 0.1, "b* {}", lab.b);
    }

    #[test]
    fn test_polar_round_trip() {
        let lch = Lch::new(52.0, 72.0, 0.87, 1.0);
        let back = Lch::from_lab(Lab::from_lch(lch));
        assert!((back.lightness - lch.lightness).abs() < 1e-9);
        assert!((back.chroma - lch.chroma).abs() < 1e-9);
        assert!((back.hue - lch.hue).abs() < 1e-9);
    }

    #[test]
    fn test_zero_chroma_hue_is_zero() {
        let lch = Lch::from_lab(Lab::new(50.0, 0.0, 0.0, 1.0));
        assert_eq!(lch.hue, 0.0);
        assert_eq!(lch.chroma, 0.0);
    }

    #[test]
    fn test_powerless_predicates() {
        assert!(Lch::new(50.0, 0.0, 1.0, 1.0).is_hue_powerless());
        assert!(Lch::new(0.0, 30.0, 1.0, 1.0).is_hue_powerless());
        assert!(Lch::new(0.0, 30.0, 1.0, 1.0).is_chroma_powerless());
        assert!(!Lch::new(50.0, 30.0, 1.0, 1.0).is_hue_powerless());
        assert!(!Lch::new(50.0, 30.0, 1.0, 1.0).is_chroma_powerless());
    }

    #[test]
    fn test_nan_propagates() {
        let lab = Lab::from_rgba(Rgba::new(f64::NAN, 0.0, 0.0, 1.0), LINEAR, Illuminant::D50);
        assert!(lab.lightness.is_nan() || lab.a.is_nan());
        let rgba = Lab::new(f64::NAN, 0.0, 0.0, 1.0).to_rgba(LINEAR, Illuminant::D50);
        assert!(rgba.r.is_nan());
    }

    #[test]
    fn test_css_parse_lab() {
        let lab = Lab::from_css("lab(52.2 40.1 59.9)").unwrap();
        assert!((lab.lightness - 52.2).abs() < 1e-12);
        assert!((lab.a - 40.1).abs() < 1e-12);

        let lab = Lab::from_css("lab(52.2% 100% -100% / 0.5)").unwrap();
        assert!((lab.a - 125.0).abs() < 1e-12);
        assert!((lab.b + 125.0).abs() < 1e-12);
        assert!((lab.alpha - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_css_parse_lch() {
        let lch = Lch::from_css("lch(52.2 72.2 50)").unwrap();
        assert!((lch.lightness - 52.2).abs() < 1e-12);
        assert!((lch.chroma - 72.2).abs() < 1e-12);
        assert!((lch.hue - 50.0_f64.to_radians()).abs() < 1e-9);

        let lch = Lch::from_css("lch(52.2 -5 50)").unwrap();
        assert_eq!(lch.chroma, 0.0);
    }

    #[test]
    fn test_css_rejects_legacy_commas() {
        assert!(Lab::from_css("lab(52.2, 40.1, 59.9)").is_err());
        assert!(Lch::from_css("lch(52.2, 72.2, 50)").is_err());
    }

    #[test]
    fn test_to_css() {
        let opts = FormatOptions::new();
        let s = Lab::new(52.2, 40.1, 59.9, 1.0).to_css(&opts).unwrap();
        assert_eq!(s, "lab(52.2 40.1 59.9)");

        let s = Lab::new(52.2, 40.1, 59.9, 0.5).to_css(&opts).unwrap();
        assert_eq!(s, "lab(52.2 40.1 59.9 / 0.5)");

        let s = Lch::new(52.2, 72.2, 50.0_f64.to_radians(), 1.0)
            .to_css(&opts)
            .unwrap();
        assert_eq!(s, "lch(52.2 72.2 50)");
    }

    #[test]
    fn test_to_css_clamps_lightness() {
        let opts = FormatOptions::new();
        let s = Lab::new(120.0, 0.0, 0.0, 1.0).to_css(&opts).unwrap();
        assert_eq!(s, "lab(100 0 0)");
        let s = Lch::new(50.0, -3.0, 0.0, 1.0).to_css(&opts).unwrap();
        assert_eq!(s, "lch(50 0 0)");
    }

    #[test]
    fn test_to_css_nan_is_error() {
        let opts = FormatOptions::new();
        let err = Lab::new(f64::NAN, 0.0, 0.0, 1.0).to_css(&opts).unwrap_err();
        assert!(err.to_string().starts_with("bad lab color"));
        let err = Lch::new(50.0, f64::NAN, 0.0, 1.0).to_css(&opts).unwrap_err();
        assert!(err.to_string().starts_with("bad lch color"));
    }
}
