//! RGB and RGBA records with hex, packed-integer, and CSS codecs.
//!
//! Components are scene-referred `f64` values, nominally in [0, 1] but free
//! to exceed it (out-of-gamut) until serialization, where they are silently
//! clamped. NaN is never clamped away: serializing a NaN component is a hard
//! error.

use crate::css::{CssFormat, FormatOptions, Precision};
use crate::error::{Error, Result};
use crate::math::align;
use crate::parse;
use crate::transfer::ColorSpace;

/// RGB color with unclamped floating-point components.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rgb {
    /// Red component (nominally 0.0-1.0).
    pub r: f64,
    /// Green component (nominally 0.0-1.0).
    pub g: f64,
    /// Blue component (nominally 0.0-1.0).
    pub b: f64,
}

/// RGBA color with unclamped floating-point components.
///
/// Alpha is unconstrained in memory and clamped to [0, 1] only at
/// serialization.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    /// Red component (nominally 0.0-1.0).
    pub r: f64,
    /// Green component (nominally 0.0-1.0).
    pub g: f64,
    /// Blue component (nominally 0.0-1.0).
    pub b: f64,
    /// Alpha component (nominally 0.0-1.0, 1.0 = fully opaque).
    pub a: f64,
}

impl Default for Rgba {
    fn default() -> Self {
        Self::new(0.0, 0.0, 0.0, 1.0)
    }
}

pub(crate) fn ensure_finite(model: &'static str, fields: &[(&'static str, f64)]) -> Result<()> {
    for &(component, value) in fields {
        if value.is_nan() {
            return Err(Error::NanComponent { model, component });
        }
    }
    Ok(())
}

fn hex_nibble(b: u8) -> Option<u8> {
    char::from(b).to_digit(16).map(|d| d as u8)
}

/// Quantize one nominal-[0, 1] component to a `u8`, half-up.
pub(crate) fn quantize8(c: f64) -> u8 {
    align(c.clamp(0.0, 1.0) * 255.0, 1.0, 0.5) as u8
}

/// Collapse `#rrggbb` / `#rrggbbaa` to `#rgb` / `#rgba` when every channel's
/// two hex digits are identical.
pub(crate) fn shorten_hex(hex: &str) -> Option<String> {
    let digits = hex.strip_prefix('#')?;
    if digits.len() != 6 && digits.len() != 8 {
        return None;
    }
    let bytes = digits.as_bytes();
    let mut short = String::from("#");
    for pair in bytes.chunks_exact(2) {
        if pair[0] != pair[1] {
            return None;
        }
        short.push(char::from(pair[0]));
    }
    Some(short)
}

/// Format one channel under the configured precision/percent/profile.
fn css_channel(c: f64, opts: &FormatOptions) -> String {
    let encoded = opts.profile.compress(c).clamp(0.0, 1.0);
    let scaled = encoded * 255.0;
    let scaled = match opts.precision {
        Precision::Uint8 => align(scaled, 1.0, 0.5),
        Precision::Float64 => scaled,
    };
    if opts.percent {
        // exact at the endpoints, mirroring the parser's percent scaling
        format!("{}%", opts.fixed(scaled * 100.0 / 255.0))
    } else {
        opts.fixed(scaled)
    }
}

fn parse_hex_color(s: &str) -> Option<Rgba> {
    let t = s.trim();
    let digits = t.strip_prefix('#').unwrap_or(t).as_bytes();
    let nibbles: Vec<u8> = digits.iter().map(|&b| hex_nibble(b)).collect::<Option<_>>()?;
    let wide = |hi: u8, lo: u8| f64::from(hi * 16 + lo) / 255.0;
    match nibbles[..] {
        [r, g, b] => Some(Rgba::new(wide(r, r), wide(g, g), wide(b, b), 1.0)),
        [r, g, b, a] => Some(Rgba::new(wide(r, r), wide(g, g), wide(b, b), wide(a, a))),
        [r1, r2, g1, g2, b1, b2] => Some(Rgba::new(wide(r1, r2), wide(g1, g2), wide(b1, b2), 1.0)),
        [r1, r2, g1, g2, b1, b2, a1, a2] => Some(Rgba::new(
            wide(r1, r2),
            wide(g1, g2),
            wide(b1, b2),
            wide(a1, a2),
        )),
        _ => None,
    }
}

impl Rgb {
    /// Opaque black.
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0);
    /// Opaque white.
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0);
    /// Pure red.
    pub const RED: Self = Self::new(1.0, 0.0, 0.0);
    /// Pure green.
    pub const GREEN: Self = Self::new(0.0, 1.0, 0.0);
    /// Pure blue.
    pub const BLUE: Self = Self::new(0.0, 0.0, 1.0);

    /// Create a new RGB color.
    #[must_use]
    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    /// Extend with an alpha component.
    #[must_use]
    pub const fn with_alpha(self, a: f64) -> Rgba {
        Rgba::new(self.r, self.g, self.b, a)
    }

    /// Overwrite `self` with `other` (caller-supplied-target variant).
    pub fn assign(&mut self, other: Self) {
        *self = other;
    }

    /// Parse hex notation (`#rgb` or `#rrggbb`, leading `#` optional),
    /// ignoring an alpha component if present.
    pub fn from_hex(s: &str) -> Result<Self> {
        Rgba::from_hex(s).map(Self::from)
    }

    /// Serialize to `#rrggbb`, quantizing half-up to 8 bits.
    pub fn to_hex(self) -> Result<String> {
        ensure_finite("rgb", &[("r", self.r), ("g", self.g), ("b", self.b)])?;
        Ok(format!(
            "#{:02x}{:02x}{:02x}",
            quantize8(self.r),
            quantize8(self.g),
            quantize8(self.b)
        ))
    }

    /// Serialize to hex, collapsing to `#rgb` when every channel's two hex
    /// digits are identical.
    pub fn to_hex_short(self) -> Result<String> {
        let hex = self.to_hex()?;
        Ok(shorten_hex(&hex).unwrap_or(hex))
    }

    /// Unpack from a `0xRRGGBB` integer.
    #[must_use]
    pub fn from_packed(packed: u32) -> Self {
        Self::new(
            f64::from((packed >> 16) & 0xff) / 255.0,
            f64::from((packed >> 8) & 0xff) / 255.0,
            f64::from(packed & 0xff) / 255.0,
        )
    }

    /// Pack into a `0xRRGGBB` integer, quantizing half-up to 8 bits.
    pub fn to_packed(self) -> Result<u32> {
        ensure_finite("rgb", &[("r", self.r), ("g", self.g), ("b", self.b)])?;
        Ok((u32::from(quantize8(self.r)) << 16)
            | (u32::from(quantize8(self.g)) << 8)
            | u32::from(quantize8(self.b)))
    }

    /// Parse `rgb()` functional notation (alpha, if present, is dropped).
    pub fn from_css(s: &str) -> Result<Self> {
        Rgba::from_css(s).map(Self::from)
    }

    /// Serialize to `rgb()` functional notation per `opts`.
    pub fn to_css(self, opts: &FormatOptions) -> Result<String> {
        ensure_finite("rgb", &[("r", self.r), ("g", self.g), ("b", self.b)])?;
        let r = css_channel(self.r, opts);
        let g = css_channel(self.g, opts);
        let b = css_channel(self.b, opts);
        Ok(match opts.format {
            CssFormat::Css2 => format!("rgb({r},{g},{b})"),
            CssFormat::Css4 => format!("rgb({r} {g} {b})"),
        })
    }

    /// Component-wise linear interpolation, `t` clamped to [0, 1].
    #[must_use]
    pub fn lerp(self, other: Self, t: f64) -> Self {
        let t = t.clamp(0.0, 1.0);
        Self::new(
            self.r + (other.r - self.r) * t,
            self.g + (other.g - self.g) * t,
            self.b + (other.b - self.b) * t,
        )
    }

    /// Rec. 709 relative luminance. `space` expands encoded callers to
    /// linear light first; pass [`ColorSpace::Linear`] for already-linear
    /// values.
    #[must_use]
    pub fn relative_luminance(self, space: ColorSpace) -> f64 {
        let r = space.expand(self.r);
        let g = space.expand(self.g);
        let b = space.expand(self.b);
        0.2126 * r + 0.7152 * g + 0.0722 * b
    }

    /// WCAG 2.x contrast ratio between two colors.
    #[must_use]
    pub fn contrast_ratio(self, other: Self, space: ColorSpace) -> f64 {
        let a = self.relative_luminance(space);
        let b = other.relative_luminance(space);
        let (lighter, darker) = if a >= b { (a, b) } else { (b, a) };
        (lighter + 0.05) / (darker + 0.05)
    }
}

impl Rgba {
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::new(0.0, 0.0, 0.0, 0.0);
    /// Opaque black.
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);
    /// Opaque white.
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);

    /// Create a new RGBA color.
    #[must_use]
    pub const fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque color (alpha = 1.0).
    #[must_use]
    pub const fn opaque(r: f64, g: f64, b: f64) -> Self {
        Self::new(r, g, b, 1.0)
    }

    /// Create a color with modified alpha.
    #[must_use]
    pub const fn with_alpha(self, a: f64) -> Self {
        Self::new(self.r, self.g, self.b, a)
    }

    /// Overwrite `self` with `other` (caller-supplied-target variant).
    pub fn assign(&mut self, other: Self) {
        *self = other;
    }

    /// Parse hex notation: `#rgb`, `#rgba`, `#rrggbb` or `#rrggbbaa`, with
    /// or without the leading `#`. Short forms expand by digit doubling.
    pub fn from_hex(s: &str) -> Result<Self> {
        parse_hex_color(s).ok_or_else(|| Error::BadCssColor(s.trim().to_string()))
    }

    /// Serialize to hex, emitting `#rrggbbaa` only when alpha is below 1.
    pub fn to_hex(self) -> Result<String> {
        ensure_finite(
            "rgba",
            &[("r", self.r), ("g", self.g), ("b", self.b), ("a", self.a)],
        )?;
        let a = self.a.clamp(0.0, 1.0);
        if a < 1.0 {
            Ok(format!(
                "#{:02x}{:02x}{:02x}{:02x}",
                quantize8(self.r),
                quantize8(self.g),
                quantize8(self.b),
                quantize8(a)
            ))
        } else {
            Rgb::from(self).to_hex()
        }
    }

    /// Serialize to hex, collapsing to the 3/4-digit short form when every
    /// channel's two hex digits are identical.
    pub fn to_hex_short(self) -> Result<String> {
        let hex = self.to_hex()?;
        Ok(shorten_hex(&hex).unwrap_or(hex))
    }

    /// Unpack from a `0xRRGGBBAA` integer.
    #[must_use]
    pub fn from_packed(packed: u32) -> Self {
        Self::new(
            f64::from((packed >> 24) & 0xff) / 255.0,
            f64::from((packed >> 16) & 0xff) / 255.0,
            f64::from((packed >> 8) & 0xff) / 255.0,
            f64::from(packed & 0xff) / 255.0,
        )
    }

    /// Pack into a `0xRRGGBBAA` integer, quantizing half-up to 8 bits.
    pub fn to_packed(self) -> Result<u32> {
        ensure_finite(
            "rgba",
            &[("r", self.r), ("g", self.g), ("b", self.b), ("a", self.a)],
        )?;
        Ok((u32::from(quantize8(self.r)) << 24)
            | (u32::from(quantize8(self.g)) << 16)
            | (u32::from(quantize8(self.b)) << 8)
            | u32::from(quantize8(self.a)))
    }

    /// Parse `rgb()`/`rgba()` functional notation in either delimiter style.
    /// Alpha defaults to 1 when absent.
    pub fn from_css(s: &str) -> Result<Self> {
        Self::parse_function(s).ok_or_else(|| Error::BadCssColor(s.trim().to_string()))
    }

    fn parse_function(s: &str) -> Option<Self> {
        let args =
            parse::function_args(s, "rgb").or_else(|| parse::function_args(s, "rgba"))?;
        let r = parse::number_or_percent(args.channels[0], &parse::UINT8_CHANNEL)? / 255.0;
        let g = parse::number_or_percent(args.channels[1], &parse::UINT8_CHANNEL)? / 255.0;
        let b = parse::number_or_percent(args.channels[2], &parse::UINT8_CHANNEL)? / 255.0;
        let a = parse::parse_alpha(args.alpha)?;
        Some(Self::new(r, g, b, a))
    }

    /// Serialize to functional notation per `opts`. Alpha is emitted only
    /// when below 1: `rgba(r,g,b,a)` in css2, `rgb(r g b / a)` in css4.
    pub fn to_css(self, opts: &FormatOptions) -> Result<String> {
        ensure_finite(
            "rgba",
            &[("r", self.r), ("g", self.g), ("b", self.b), ("a", self.a)],
        )?;
        let a = self.a.clamp(0.0, 1.0);
        if a >= 1.0 {
            return Rgb::from(self).to_css(opts);
        }
        let r = css_channel(self.r, opts);
        let g = css_channel(self.g, opts);
        let b = css_channel(self.b, opts);
        let alpha = opts.fixed(a);
        Ok(match opts.format {
            CssFormat::Css2 => format!("rgba({r},{g},{b},{alpha})"),
            CssFormat::Css4 => format!("rgb({r} {g} {b} / {alpha})"),
        })
    }

    /// Component-wise linear interpolation, `t` clamped to [0, 1].
    #[must_use]
    pub fn lerp(self, other: Self, t: f64) -> Self {
        let t = t.clamp(0.0, 1.0);
        Self::new(
            self.r + (other.r - self.r) * t,
            self.g + (other.g - self.g) * t,
            self.b + (other.b - self.b) * t,
            self.a + (other.a - self.a) * t,
        )
    }
}

impl From<Rgba> for Rgb {
    fn from(c: Rgba) -> Self {
        Self::new(c.r, c.g, c.b)
    }
}

impl From<Rgb> for Rgba {
    fn from(c: Rgb) -> Self {
        c.with_alpha(1.0)
    }
}
