//! HSL and HSLA color models.
//!
//! Hue is measured in radians and normalized lazily: stored values may be
//! negative or exceed 2π and are folded only where a formula or stringifier
//! needs a canonical range. HSL is defined over encoded (display) RGB, so
//! conversions take a [`ColorSpace`] mapping the caller's RGB domain to the
//! encoded domain; pass [`ColorSpace::Linear`] when the values already are
//! encoded (or when no gamma handling is wanted).
//!
//! Singularity policy: at zero chroma (gray, white, black) hue and
//! saturation are defined as exactly 0, never NaN.

use std::f64::consts::{PI, TAU};

use crate::css::{CssFormat, FormatOptions};
use crate::error::{Error, Result};
use crate::math::interval;
use crate::parse;
use crate::rgb::{ensure_finite, Rgb, Rgba};
use crate::transfer::ColorSpace;

/// One hue sector spans 60 degrees.
const SECTOR: f64 = PI / 3.0;

/// HSL color. Hue in radians, saturation and lightness nominally [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Hsl {
    /// Hue angle in radians (any value; folded on demand).
    pub hue: f64,
    /// Saturation (nominally 0.0-1.0).
    pub saturation: f64,
    /// Lightness (nominally 0.0-1.0).
    pub lightness: f64,
}

/// HSL color with alpha. Same alpha contract as [`Rgba`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsla {
    /// Hue angle in radians (any value; folded on demand).
    pub hue: f64,
    /// Saturation (nominally 0.0-1.0).
    pub saturation: f64,
    /// Lightness (nominally 0.0-1.0).
    pub lightness: f64,
    /// Alpha (nominally 0.0-1.0, 1.0 = fully opaque).
    pub alpha: f64,
}

impl Default for Hsla {
    fn default() -> Self {
        Self::new(0.0, 0.0, 0.0, 1.0)
    }
}

/// max/min that propagate NaN instead of ignoring it (unlike `f64::max`),
/// so a poisoned channel poisons every derived field.
fn nan_max3(a: f64, b: f64, c: f64) -> f64 {
    if a.is_nan() || b.is_nan() || c.is_nan() {
        f64::NAN
    } else {
        a.max(b).max(c)
    }
}

fn nan_min3(a: f64, b: f64, c: f64) -> f64 {
    if a.is_nan() || b.is_nan() || c.is_nan() {
        f64::NAN
    } else {
        a.min(b).min(c)
    }
}

/// Six-sector RGB (encoded) to HSL. Hue in radians.
fn rgb_to_hsl(r: f64, g: f64, b: f64) -> (f64, f64, f64) {
    let max = nan_max3(r, g, b);
    let min = nan_min3(r, g, b);
    let chroma = max - min;
    let lightness = (max + min) / 2.0;

    if chroma == 0.0 {
        // zero-chroma singularity: hue and saturation are 0 by definition
        return (0.0, 0.0, lightness);
    }

    let sector = if max == r {
        ((g - b) / chroma).rem_euclid(6.0)
    } else if max == g {
        (b - r) / chroma + 2.0
    } else {
        (r - g) / chroma + 4.0
    };
    let saturation = chroma / (1.0 - (2.0 * lightness - 1.0).abs());
    (sector * SECTOR, saturation, lightness)
}

/// Inverse six-sector table: HSL to encoded RGB.
fn hsl_to_rgb(hue: f64, saturation: f64, lightness: f64) -> (f64, f64, f64) {
    if hue.is_nan() || saturation.is_nan() || lightness.is_nan() {
        return (f64::NAN, f64::NAN, f64::NAN);
    }
    let sector = interval(hue, 0.0, TAU) / SECTOR;
    let chroma = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
    let x = chroma * (1.0 - (sector % 2.0 - 1.0).abs());
    let m = lightness - chroma / 2.0;
    let (r, g, b) = if sector < 1.0 {
        (chroma, x, 0.0)
    } else if sector < 2.0 {
        (x, chroma, 0.0)
    } else if sector < 3.0 {
        (0.0, chroma, x)
    } else if sector < 4.0 {
        (0.0, x, chroma)
    } else if sector < 5.0 {
        (x, 0.0, chroma)
    } else {
        (chroma, 0.0, x)
    };
    (r + m, g + m, b + m)
}

fn css_fraction(v: f64, opts: &FormatOptions) -> String {
    format!("{}%", opts.fixed(v.clamp(0.0, 1.0) * 100.0))
}

impl Hsl {
    /// Create a new HSL color.
    #[must_use]
    pub const fn new(hue: f64, saturation: f64, lightness: f64) -> Self {
        Self {
            hue,
            saturation,
            lightness,
        }
    }

    /// Extend with an alpha component.
    #[must_use]
    pub const fn with_alpha(self, alpha: f64) -> Hsla {
        Hsla {
            hue: self.hue,
            saturation: self.saturation,
            lightness: self.lightness,
            alpha,
        }
    }

    /// Convert from RGB. `space` compresses the caller's values into the
    /// encoded domain HSL is defined over.
    #[must_use]
    pub fn from_rgb(rgb: Rgb, space: ColorSpace) -> Self {
        let (hue, saturation, lightness) = rgb_to_hsl(
            space.compress(rgb.r),
            space.compress(rgb.g),
            space.compress(rgb.b),
        );
        Self::new(hue, saturation, lightness)
    }

    /// Caller-supplied-target variant of [`Hsl::from_rgb`].
    pub fn assign_from_rgb(&mut self, rgb: Rgb, space: ColorSpace) {
        *self = Self::from_rgb(rgb, space);
    }

    /// Convert to RGB, expanding the encoded result back through `space`.
    #[must_use]
    pub fn to_rgb(self, space: ColorSpace) -> Rgb {
        let (r, g, b) = hsl_to_rgb(self.hue, self.saturation, self.lightness);
        Rgb::new(space.expand(r), space.expand(g), space.expand(b))
    }

    /// Flatten an HSLA color against an opaque matte.
    ///
    /// Compositing happens in RGB space (linear interpolation weighted by
    /// alpha), not in HSL space; hue/saturation/lightness are re-derived
    /// from the composited RGB.
    #[must_use]
    pub fn from_hsla(hsla: Hsla, matte: Rgb, space: ColorSpace) -> Self {
        let fg = Hsl::new(hsla.hue, hsla.saturation, hsla.lightness).to_rgb(space);
        let composited = matte.lerp(fg, hsla.alpha);
        Self::from_rgb(composited, space)
    }

    /// Caller-supplied-target variant of [`Hsl::from_hsla`].
    pub fn assign_from_hsla(&mut self, hsla: Hsla, matte: Rgb, space: ColorSpace) {
        *self = Self::from_hsla(hsla, matte, space);
    }

    /// Parse `hsl()`/`hsla()` functional notation, dropping alpha.
    pub fn from_css(s: &str) -> Result<Self> {
        Hsla::from_css(s).map(|c| Self::new(c.hue, c.saturation, c.lightness))
    }

    /// Serialize to `hsl()` notation. Hue is emitted in `opts.angle_unit`
    /// (no suffix for degrees), saturation/lightness as percentages.
    pub fn to_css(self, opts: &FormatOptions) -> Result<String> {
        ensure_finite(
            "hsl",
            &[
                ("hue", self.hue),
                ("saturation", self.saturation),
                ("lightness", self.lightness),
            ],
        )?;
        let h = opts.hue(self.hue);
        let s = css_fraction(self.saturation, opts);
        let l = css_fraction(self.lightness, opts);
        Ok(match opts.format {
            CssFormat::Css2 => format!("hsl({h},{s},{l})"),
            CssFormat::Css4 => format!("hsl({h} {s} {l})"),
        })
    }
}

impl Hsla {
    /// Create a new HSLA color.
    #[must_use]
    pub const fn new(hue: f64, saturation: f64, lightness: f64, alpha: f64) -> Self {
        Self {
            hue,
            saturation,
            lightness,
            alpha,
        }
    }

    /// Create a color with modified alpha.
    #[must_use]
    pub const fn with_alpha(self, alpha: f64) -> Self {
        Self::new(self.hue, self.saturation, self.lightness, alpha)
    }

    /// Convert from RGBA; alpha passes through untouched.
    #[must_use]
    pub fn from_rgba(rgba: Rgba, space: ColorSpace) -> Self {
        Hsl::from_rgb(Rgb::from(rgba), space).with_alpha(rgba.a)
    }

    /// Caller-supplied-target variant of [`Hsla::from_rgba`].
    pub fn assign_from_rgba(&mut self, rgba: Rgba, space: ColorSpace) {
        *self = Self::from_rgba(rgba, space);
    }

    /// Convert to RGBA; alpha passes through untouched.
    #[must_use]
    pub fn to_rgba(self, space: ColorSpace) -> Rgba {
        Hsl::new(self.hue, self.saturation, self.lightness)
            .to_rgb(space)
            .with_alpha(self.alpha)
    }

    /// Parse `hsl()`/`hsla()` functional notation in either delimiter
    /// style. Alpha defaults to 1 when absent.
    pub fn from_css(s: &str) -> Result<Self> {
        Self::parse_function(s).ok_or_else(|| Error::BadCssColor(s.trim().to_string()))
    }

    fn parse_function(s: &str) -> Option<Self> {
        let args =
            parse::function_args(s, "hsl").or_else(|| parse::function_args(s, "hsla"))?;
        let hue = parse::parse_angle(args.channels[0])?;
        let saturation = parse::number_or_percent(args.channels[1], &parse::FRACTION)?;
        let lightness = parse::number_or_percent(args.channels[2], &parse::FRACTION)?;
        let alpha = parse::parse_alpha(args.alpha)?;
        Some(Self::new(hue, saturation, lightness, alpha))
    }

    /// Serialize to functional notation. Alpha is emitted only when below
    /// 1: `hsla(h,s%,l%,a)` in css2, `hsl(h s% l% / a)` in css4.
    pub fn to_css(self, opts: &FormatOptions) -> Result<String> {
        ensure_finite(
            "hsla",
            &[
                ("hue", self.hue),
                ("saturation", self.saturation),
                ("lightness", self.lightness),
                ("alpha", self.alpha),
            ],
        )?;
        let alpha = self.alpha.clamp(0.0, 1.0);
        if alpha >= 1.0 {
            return Hsl::new(self.hue, self.saturation, self.lightness).to_css(opts);
        }
        let h = opts.hue(self.hue);
        let s = css_fraction(self.saturation, opts);
        let l = css_fraction(self.lightness, opts);
        let a = opts.fixed(alpha);
        Ok(match opts.format {
            CssFormat::Css2 => format!("hsla({h},{s},{l},{a})"),
            CssFormat::Css4 => format!("hsl({h} {s} {l} / {a})"),
        })
    }
}

impl From<Hsla> for Hsl {
    fn from(c: Hsla) -> Self {
        Self::new(c.hue, c.saturation, c.lightness)
    }
}

impl From<Hsl> for Hsla {
    fn from(c: Hsl) -> Self {
        c.with_alpha(1.0)
    }
}
