//! Named-color table, stringify options, and the CSS parse/stringify
//! dispatcher.
//!
//! Parsing tries name lookup, then hex notation, then each functional
//! notation's sniff predicate; the first match wins and is committed to its
//! dedicated parser. Stringification either emits the functional form
//! directly ([`Mode::Fast`]) or compares every valid encoding and returns
//! the shortest ([`Mode::Short`]).

use std::collections::HashMap;
use std::f64::consts::TAU;
use std::sync::{Mutex, OnceLock, PoisonError};

use crate::error::{Error, Result};
use crate::hsl::Hsla;
use crate::lab::{Illuminant, Lab, Lch};
use crate::math::{self, to_fixed, AngleUnit};
use crate::parse;
use crate::rgb::{Rgb, Rgba};
use crate::transfer::ColorSpace;

/// Name-to-color mapping. Keys are arbitrary lowercase strings.
pub type NamedColorTable = HashMap<String, Rgba>;

/// Quantization applied to channels when stringifying.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Precision {
    /// Align channels to 8-bit steps (half-up).
    #[default]
    Uint8,
    /// Emit full float64 channel values (subject to `decimals`).
    Float64,
}

/// Functional-notation punctuation style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CssFormat {
    /// Legacy comma-delimited (`rgb(r,g,b)`, `rgba(r,g,b,a)`).
    #[default]
    Css2,
    /// Modern space-delimited with slash alpha (`rgb(r g b / a)`).
    Css4,
}

/// Stringify dispatch strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Always emit the functional form.
    #[default]
    Fast,
    /// Compare hex, functional, hsla and named encodings; emit the
    /// shortest.
    Short,
}

/// Structured options recognized by every stringifier.
#[derive(Debug, Clone, Copy)]
pub struct FormatOptions<'a> {
    /// Unit for emitted hue tokens (suffix omitted for degrees).
    pub angle_unit: AngleUnit,
    /// Maximum fraction digits (0..=10); trailing zeros are trimmed.
    pub decimals: u8,
    /// Emit RGB channels as percentages.
    pub percent: bool,
    /// Channel quantization.
    pub precision: Precision,
    /// Punctuation style for rgb/hsl notations.
    pub format: CssFormat,
    /// Transfer pair compressing linear channels before quantization.
    pub profile: ColorSpace,
    /// Table for named-color lookup in [`Mode::Short`]; defaults to the
    /// built-in CSS keywords.
    pub named_colors: Option<&'a NamedColorTable>,
    /// Stringify dispatch strategy.
    pub mode: Mode,
}

impl Default for FormatOptions<'_> {
    fn default() -> Self {
        Self {
            angle_unit: AngleUnit::Deg,
            decimals: 3,
            percent: false,
            precision: Precision::Uint8,
            format: CssFormat::Css2,
            profile: ColorSpace::Linear,
            named_colors: None,
            mode: Mode::Fast,
        }
    }
}

impl<'a> FormatOptions<'a> {
    /// Default options: degrees, 3 decimals, uint8 precision, css2
    /// punctuation, linear profile, fast mode.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the emitted hue unit.
    #[must_use]
    pub fn with_angle_unit(mut self, unit: AngleUnit) -> Self {
        self.angle_unit = unit;
        self
    }

    /// Set the maximum fraction digits (clamped to 10 on use).
    #[must_use]
    pub fn with_decimals(mut self, decimals: u8) -> Self {
        self.decimals = decimals;
        self
    }

    /// Emit RGB channels as percentages.
    #[must_use]
    pub fn with_percent(mut self, percent: bool) -> Self {
        self.percent = percent;
        self
    }

    /// Set channel quantization.
    #[must_use]
    pub fn with_precision(mut self, precision: Precision) -> Self {
        self.precision = precision;
        self
    }

    /// Set functional punctuation style.
    #[must_use]
    pub fn with_format(mut self, format: CssFormat) -> Self {
        self.format = format;
        self
    }

    /// Set the transfer pair applied before quantization.
    #[must_use]
    pub fn with_profile(mut self, profile: ColorSpace) -> Self {
        self.profile = profile;
        self
    }

    /// Supply an explicit named-color table for short mode.
    #[must_use]
    pub fn with_named_colors(mut self, table: &'a NamedColorTable) -> Self {
        self.named_colors = Some(table);
        self
    }

    /// Set the stringify dispatch strategy.
    #[must_use]
    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Format one number under the decimals budget.
    pub(crate) fn fixed(&self, v: f64) -> String {
        to_fixed(v, usize::from(self.decimals.min(10)))
    }

    /// Format a hue (radians) in the configured unit, folding into one
    /// revolution first. Degrees carry no suffix.
    pub(crate) fn hue(&self, radians: f64) -> String {
        let folded = math::interval(radians, 0.0, TAU);
        let value = math::angle(folded, AngleUnit::Rad, self.angle_unit);
        let formatted = self.fixed(value);
        if self.angle_unit == AngleUnit::Deg {
            formatted
        } else {
            format!("{formatted}{}", self.angle_unit.suffix())
        }
    }
}

/// The built-in name table: the CSS Level 1 keywords (plus `orange`) and
/// `transparent`.
fn builtin_names() -> &'static NamedColorTable {
    static TABLE: OnceLock<NamedColorTable> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut table = NamedColorTable::new();
        let mut put = |name: &str, packed: u32| {
            table.insert(name.to_string(), Rgb::from_packed(packed).with_alpha(1.0));
        };
        put("black", 0x000000);
        put("silver", 0xc0c0c0);
        put("gray", 0x808080);
        put("white", 0xffffff);
        put("maroon", 0x800000);
        put("red", 0xff0000);
        put("purple", 0x800080);
        put("fuchsia", 0xff00ff);
        put("green", 0x008000);
        put("lime", 0x00ff00);
        put("olive", 0x808000);
        put("yellow", 0xffff00);
        put("navy", 0x000080);
        put("blue", 0x0000ff);
        put("teal", 0x008080);
        put("aqua", 0x00ffff);
        put("orange", 0xffa500);
        table.insert("transparent".to_string(), Rgba::TRANSPARENT);
        table
    })
}

/// Clone of the built-in name table, for callers extending it.
#[must_use]
pub fn default_named_colors() -> NamedColorTable {
    builtin_names().clone()
}

fn alias_table() -> &'static Mutex<NamedColorTable> {
    static ALIASES: OnceLock<Mutex<NamedColorTable>> = OnceLock::new();
    ALIASES.get_or_init(|| Mutex::new(NamedColorTable::new()))
}

/// Register process-wide name aliases recognized by [`to_rgba`]/[`to_rgb`].
///
/// Legacy compatibility shim; prefer passing an explicit table to
/// [`parse_css`]. Keys are lowercased. Hosts calling this from multiple
/// threads must serialize registration against parsing themselves if they
/// need a consistent view.
pub fn add_aliases<I>(entries: I)
where
    I: IntoIterator<Item = (String, Rgba)>,
{
    let mut table = alias_table().lock().unwrap_or_else(PoisonError::into_inner);
    table.extend(
        entries
            .into_iter()
            .map(|(name, color)| (name.to_ascii_lowercase(), color)),
    );
}

/// Clear every alias registered with [`add_aliases`].
pub fn reset_aliases() {
    alias_table()
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .clear();
}

/// Recognized CSS color notations, in dispatch order.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Notation {
    Named(Rgba),
    Hex,
    RgbFn,
    RgbaFn,
    HslFn,
    HslaFn,
    LabFn,
    LchFn,
}

fn classify(s: &str, names: &NamedColorTable) -> Option<Notation> {
    let key = s.trim().to_ascii_lowercase();
    if let Some(color) = names.get(&key) {
        return Some(Notation::Named(*color));
    }
    if parse::is_css_hex_string(s) {
        Some(Notation::Hex)
    } else if parse::is_css_rgb_string(s) {
        Some(Notation::RgbFn)
    } else if parse::is_css_rgba_string(s) {
        Some(Notation::RgbaFn)
    } else if parse::is_css_hsl_string(s) {
        Some(Notation::HslFn)
    } else if parse::is_css_hsla_string(s) {
        Some(Notation::HslaFn)
    } else if parse::is_css_lab_string(s) {
        Some(Notation::LabFn)
    } else if parse::is_css_lch_string(s) {
        Some(Notation::LchFn)
    } else {
        None
    }
}

/// Parse any recognized CSS color notation against an explicit name table.
///
/// The returned channels live in the encoded (display) domain, exactly as
/// written in the CSS text.
///
/// Name lookup lowercases the input first, so table keys must be lowercase
/// to be reachable ([`add_aliases`] and the built-in table already follow
/// this; [`default_named_colors`] gives a conforming starting point).
pub fn parse_css(s: &str, names: &NamedColorTable) -> Result<Rgba> {
    match classify(s, names) {
        None => Err(Error::NotCssColor(s.trim().to_string())),
        Some(Notation::Named(color)) => Ok(color),
        Some(Notation::Hex) => Rgba::from_hex(s),
        Some(Notation::RgbFn | Notation::RgbaFn) => Rgba::from_css(s),
        Some(Notation::HslFn | Notation::HslaFn) => {
            Ok(Hsla::from_css(s)?.to_rgba(ColorSpace::Linear))
        }
        // lab()/lch() are absolute; gamma-encode into the sRGB display
        // domain shared by the other notations
        Some(Notation::LabFn) => Ok(Lab::from_css(s)?.to_rgba(ColorSpace::Srgb, Illuminant::D50)),
        Some(Notation::LchFn) => Ok(Lch::from_css(s)?.to_rgba(ColorSpace::Srgb, Illuminant::D50)),
    }
}

/// Parse any recognized CSS color using the built-in names plus registered
/// aliases (legacy entry point).
pub fn to_rgba(s: &str) -> Result<Rgba> {
    let key = s.trim().to_ascii_lowercase();
    {
        let aliases = alias_table().lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(color) = aliases.get(&key) {
            return Ok(*color);
        }
    }
    parse_css(s, builtin_names())
}

/// Like [`to_rgba`], dropping alpha.
pub fn to_rgb(s: &str) -> Result<Rgb> {
    to_rgba(s).map(Rgb::from)
}

fn canonicalize(c: Rgba) -> Rgba {
    // fully-transparent colors compare equal regardless of their nominal
    // RGB; see name_of
    if c.a < 1e-10 {
        Rgba::new(c.r * c.a, c.g * c.a, c.b * c.a, c.a)
    } else {
        c
    }
}

/// Reverse lookup: the name of an exactly-equal table entry, if any.
///
/// Equality is exact value equality after one canonicalization: colors with
/// alpha below 1e-10 have their channels premultiplied, so any
/// fully-transparent color matches a fully-transparent entry regardless of
/// the RGB data behind its zero alpha. A table that intentionally stores
/// distinct near-transparent colors will see them collapse under this rule.
/// Ties prefer the shortest, then lexically smallest, name.
#[must_use]
pub fn name_of<'a>(rgba: Rgba, names: &'a NamedColorTable) -> Option<&'a str> {
    let probe = canonicalize(rgba);
    names
        .iter()
        .filter(|(_, color)| canonicalize(**color) == probe)
        .map(|(name, _)| name.as_str())
        .min_by(|a, b| a.len().cmp(&b.len()).then(a.cmp(b)))
}

fn shortest(candidates: Vec<String>) -> String {
    candidates
        .into_iter()
        .min_by(|a, b| a.len().cmp(&b.len()).then(a.cmp(b)))
        .unwrap_or_default()
}

/// Stringify an RGB color per `opts`.
///
/// [`Mode::Fast`] emits the functional form. [`Mode::Short`] also computes
/// the hex form (collapsed to `#rgb` when possible) and any matching name,
/// and returns the shortest encoding.
pub fn from_rgb(rgb: Rgb, opts: &FormatOptions) -> Result<String> {
    let functional = rgb.to_css(opts)?;
    if opts.mode == Mode::Fast {
        return Ok(functional);
    }
    let mut candidates = vec![functional];
    candidates.push(rgb.to_hex_short()?);
    // match, not unwrap_or_else(builtin_names): the fn item's &'static
    // return would pin the options' table lifetime to 'static
    let names = match opts.named_colors {
        Some(table) => table,
        None => builtin_names(),
    };
    if let Some(name) = name_of(Rgba::from(rgb), names) {
        candidates.push(name.to_string());
    }
    Ok(shortest(candidates))
}

/// Stringify an RGBA color per `opts`.
///
/// In [`Mode::Short`] with alpha below 1 the candidate set additionally
/// includes the `#rrggbbaa` hex form and an `hsla()` form.
pub fn from_rgba(rgba: Rgba, opts: &FormatOptions) -> Result<String> {
    let functional = rgba.to_css(opts)?;
    if opts.mode == Mode::Fast {
        return Ok(functional);
    }
    let mut candidates = vec![functional];
    candidates.push(rgba.to_hex_short()?);
    if rgba.a.clamp(0.0, 1.0) < 1.0 {
        candidates.push(Hsla::from_rgba(rgba, ColorSpace::Linear).to_css(opts)?);
    }
    // match, not unwrap_or_else(builtin_names): the fn item's &'static
    // return would pin the options' table lifetime to 'static
    let names = match opts.named_colors {
        Some(table) => table,
        None => builtin_names(),
    };
    if let Some(name) = name_of(rgba, names) {
        candidates.push(name.to_string());
    }
    Ok(shortest(candidates))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_lookup_case_insensitive() {
        let red = to_rgba("red").unwrap();
        assert_eq!(red, Rgba::opaque(1.0, 0.0, 0.0));
        assert_eq!(to_rgba(" Red ").unwrap(), red);
        assert_eq!(to_rgba("RED").unwrap(), red);
    }

    #[test]
    fn test_transparent_keyword() {
        assert_eq!(to_rgba("transparent").unwrap(), Rgba::TRANSPARENT);
    }

    #[test]
    fn test_dispatch_hex() {
        let c = to_rgba("#f00").unwrap();
        assert_eq!(c, Rgba::opaque(1.0, 0.0, 0.0));
        let c = to_rgba("ff0000").unwrap();
        assert_eq!(c, Rgba::opaque(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_dispatch_functional() {
        assert!(to_rgba("rgb(1,2,3)").is_ok());
        assert!(to_rgba("rgba(1,2,3,0.5)").is_ok());
        assert!(to_rgba("hsl(120, 50%, 50%)").is_ok());
        assert!(to_rgba("hsla(120, 50%, 50%, 0.5)").is_ok());
        assert!(to_rgba("lab(52.2 40.1 59.9)").is_ok());
        assert!(to_rgba("lch(52.2 72.2 50)").is_ok());
    }

    #[test]
    fn test_lab_dispatch_matches_direct_conversion() {
        let via_css = to_rgba("lab(54.29 80.8 69.89)").unwrap();
        let direct =
            Lab::new(54.29, 80.8, 69.89, 1.0).to_rgba(ColorSpace::Srgb, Illuminant::D50);
        assert!((via_css.r - direct.r).abs() < 1e-12);
        assert!((via_css.g - direct.g).abs() < 1e-12);
    }

    #[test]
    fn test_error_literals() {
        assert_eq!(
            to_rgb("rgb(0,0)").unwrap_err().to_string(),
            "bad css color 'rgb(0,0)'"
        );
        assert_eq!(to_rgb("foo").unwrap_err().to_string(), "not css color 'foo'");
    }

    #[test]
    fn test_aliases_register_and_reset() {
        add_aliases([("BrandBlue".to_string(), Rgba::opaque(0.0, 0.2, 0.8))]);
        let c = to_rgba("brandblue").unwrap();
        assert!((c.b - 0.8).abs() < 1e-12);

        reset_aliases();
        assert!(to_rgba("brandblue").is_err());
    }

    #[test]
    fn test_parse_css_requires_lowercase_table_keys() {
        let mut table = default_named_colors();
        table.insert("brand".to_string(), Rgba::opaque(0.0, 0.2, 0.8));
        table.insert("SHOUTY".to_string(), Rgba::opaque(1.0, 1.0, 0.0));

        // input casing is irrelevant, key casing is not
        assert!(parse_css("BRAND", &table).is_ok());
        assert!(parse_css("shouty", &table).is_err());
    }

    #[test]
    fn test_name_of_exact_match_only() {
        let names = builtin_names();
        assert_eq!(name_of(Rgba::opaque(1.0, 0.0, 0.0), names), Some("red"));
        assert_eq!(name_of(Rgba::opaque(0.999, 0.0, 0.0), names), None);
    }

    #[test]
    fn test_name_of_zero_alpha_premultiplies() {
        let names = builtin_names();
        let c = Rgba::new(0.5, 0.25, 0.75, 0.0);
        assert_eq!(name_of(c, names), Some("transparent"));
    }

    #[test]
    fn test_from_rgb_short_prefers_name() {
        let opts = FormatOptions::new().with_mode(Mode::Short);
        assert_eq!(from_rgb(Rgb::RED, &opts).unwrap(), "red");
    }

    #[test]
    fn test_from_rgb_short_prefers_short_hex() {
        let opts = FormatOptions::new().with_mode(Mode::Short);
        // #123 has no name; 4-char hex beats rgb(17,34,51)
        let c = Rgb::new(
            f64::from(0x11u8) / 255.0,
            f64::from(0x22u8) / 255.0,
            f64::from(0x33u8) / 255.0,
        );
        assert_eq!(from_rgb(c, &opts).unwrap(), "#123");
    }

    #[test]
    fn test_from_rgb_fast_skips_comparison() {
        let opts = FormatOptions::new();
        assert_eq!(from_rgb(Rgb::RED, &opts).unwrap(), "rgb(255,0,0)");
    }

    #[test]
    fn test_from_rgb_explicit_table() {
        let mut table = NamedColorTable::new();
        table.insert("r".to_string(), Rgba::opaque(1.0, 0.0, 0.0));
        let opts = FormatOptions::new()
            .with_mode(Mode::Short)
            .with_named_colors(&table);
        assert_eq!(from_rgb(Rgb::RED, &opts).unwrap(), "r");
    }

    #[test]
    fn test_from_rgba_short_with_alpha() {
        let opts = FormatOptions::new().with_mode(Mode::Short);
        let s = from_rgba(Rgba::new(1.0, 0.0, 0.0, 0.5), &opts).unwrap();
        // candidates: rgba(255,0,0,0.5), #ff000080, hsla(0,100%,50%,0.5)
        assert_eq!(s, "#ff000080");
    }

    #[test]
    fn test_from_rgba_short_transparent_name() {
        let opts = FormatOptions::new().with_mode(Mode::Short);
        let s = from_rgba(Rgba::new(0.3, 0.1, 0.9, 0.0), &opts).unwrap();
        // "transparent" is 11 chars; #4d1ae600 is 9 (0.3 * 255 lands on
        // exactly 76.5 in f64 and rounds half-up to 0x4d)
        assert_eq!(s, "#4d1ae600");
    }

    #[test]
    fn test_round_trip_uint8() {
        let opts = FormatOptions::new();
        for packed in [0x000000, 0xff8000, 0x123456, 0xffffff] {
            let rgb = Rgb::from_packed(packed);
            let s = from_rgb(rgb, &opts).unwrap();
            let back = to_rgb(&s).unwrap();
            assert!((back.r - rgb.r).abs() < 1e-12, "{s}");
            assert!((back.g - rgb.g).abs() < 1e-12, "{s}");
            assert!((back.b - rgb.b).abs() < 1e-12, "{s}");
        }
    }
}
