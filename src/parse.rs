//! Grammar and token parsers for CSS color notation.
//!
//! CSS numeric tokens are either a bare number or a percentage, each with a
//! per-channel reference value that `100%` maps to. [`number_or_percent`] is
//! the single generic parser; the [`ChannelSpec`] constants configure it per
//! channel. Syntax
//! sniffing predicates (`is_css_*_string`) classify a string by prefix and
//! suffix only, without committing to a full parse, so the dispatcher can
//! route before running a dedicated parser.
//!
//! Two delimiter styles parse to the same value: legacy comma-separated
//! (`rgb(r,g,b)`) and modern space-separated with a slash-separated alpha
//! (`rgb(r g b / a)`).

use std::f64::consts::TAU;

use crate::math::{self, AngleUnit};

/// Configuration for one channel's number-or-percent token.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ChannelSpec {
    /// Channel value that `100%` maps to; percentages scale linearly
    /// (a bare number is taken as-is). Kept as a reference value rather
    /// than a per-percent factor so `100%` lands on the endpoint exactly.
    pub percent_reference: f64,
    /// Post-scale clamp range, applied silently.
    pub clamp: Option<(f64, f64)>,
    /// Post-scale assertion range; values outside reject the token.
    pub assert_range: Option<(f64, f64)>,
}

/// 8-bit RGB channel: `50%` is 127.5, out-of-range tokens are rejected.
pub(crate) const UINT8_CHANNEL: ChannelSpec = ChannelSpec {
    percent_reference: 255.0,
    clamp: None,
    assert_range: Some((0.0, 255.0)),
};

/// Alpha: `50%` is 0.5, clamped into [0, 1].
pub(crate) const ALPHA: ChannelSpec = ChannelSpec {
    percent_reference: 1.0,
    clamp: Some((0.0, 1.0)),
    assert_range: None,
};

/// Saturation/lightness fraction: `50%` is 0.5, out of [0, 1] rejects.
pub(crate) const FRACTION: ChannelSpec = ChannelSpec {
    percent_reference: 1.0,
    clamp: None,
    assert_range: Some((0.0, 1.0)),
};

/// Lab/LCh lightness: `100%` is 100. Not clamped until stringification.
pub(crate) const LAB_LIGHTNESS: ChannelSpec = ChannelSpec {
    percent_reference: 100.0,
    clamp: None,
    assert_range: None,
};

/// Lab a/b axis: `100%` is 125 (CSS Color 4 reference range).
pub(crate) const LAB_AXIS: ChannelSpec = ChannelSpec {
    percent_reference: 125.0,
    clamp: None,
    assert_range: None,
};

/// LCh chroma: `100%` is 150, negative values clamp to 0.
pub(crate) const LCH_CHROMA: ChannelSpec = ChannelSpec {
    percent_reference: 150.0,
    clamp: Some((0.0, f64::INFINITY)),
    assert_range: None,
};

/// Parse a bare-number or percentage token under `spec`.
///
/// Returns `None` for malformed or out-of-asserted-range tokens; the caller
/// owns turning that into a `bad css color` error carrying the original
/// string.
pub(crate) fn number_or_percent(token: &str, spec: &ChannelSpec) -> Option<f64> {
    let token = token.trim();
    let (digits, percent) = match token.strip_suffix('%') {
        Some(t) => (t, true),
        None => (token, false),
    };
    let value: f64 = digits.parse().ok()?;
    // str::parse accepts "inf"/"NaN" spellings that CSS does not
    if !value.is_finite() {
        return None;
    }
    // multiply before dividing so "100%" hits the reference value exactly
    let mut value = if percent {
        value * spec.percent_reference / 100.0
    } else {
        value
    };
    if let Some((lo, hi)) = spec.assert_range {
        if value < lo || value > hi {
            return None;
        }
    }
    if let Some((lo, hi)) = spec.clamp {
        value = value.clamp(lo, hi);
    }
    Some(value)
}

/// Parse a CSS angle token (`deg` default, `rad`, `grad`, `turn`) into
/// radians wrapped into `[0, 2π)`.
pub(crate) fn parse_angle(token: &str) -> Option<f64> {
    let token = token.trim();
    // "grad" must be tried before "rad"
    let (digits, unit) = if let Some(t) = token.strip_suffix("turn") {
        (t, AngleUnit::Turn)
    } else if let Some(t) = token.strip_suffix("grad") {
        (t, AngleUnit::Grad)
    } else if let Some(t) = token.strip_suffix("rad") {
        (t, AngleUnit::Rad)
    } else if let Some(t) = token.strip_suffix("deg") {
        (t, AngleUnit::Deg)
    } else {
        (token, AngleUnit::Deg)
    };
    let value: f64 = digits.parse().ok()?;
    if !value.is_finite() {
        return None;
    }
    Some(math::interval(
        math::angle(value, unit, AngleUnit::Rad),
        0.0,
        TAU,
    ))
}

/// Parse an optional alpha token, defaulting to fully opaque.
pub(crate) fn parse_alpha(token: Option<&str>) -> Option<f64> {
    match token {
        Some(t) => number_or_percent(t, &ALPHA),
        None => Some(1.0),
    }
}

fn is_functional(s: &str, prefix: &str) -> bool {
    let t = s.trim();
    t.get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
        && t.len() > prefix.len()
        && t.ends_with(')')
}

/// Whether `s` looks like `rgb(...)`.
#[must_use]
pub fn is_css_rgb_string(s: &str) -> bool {
    is_functional(s, "rgb(")
}

/// Whether `s` looks like `rgba(...)`.
#[must_use]
pub fn is_css_rgba_string(s: &str) -> bool {
    is_functional(s, "rgba(")
}

/// Whether `s` looks like `hsl(...)`.
#[must_use]
pub fn is_css_hsl_string(s: &str) -> bool {
    is_functional(s, "hsl(")
}

/// Whether `s` looks like `hsla(...)`.
#[must_use]
pub fn is_css_hsla_string(s: &str) -> bool {
    is_functional(s, "hsla(")
}

/// Whether `s` looks like `lab(...)`.
#[must_use]
pub fn is_css_lab_string(s: &str) -> bool {
    is_functional(s, "lab(")
}

/// Whether `s` looks like `lch(...)`.
#[must_use]
pub fn is_css_lch_string(s: &str) -> bool {
    is_functional(s, "lch(")
}

/// Whether `s` is hex color notation: 3, 4, 6 or 8 hex digits with an
/// optional leading `#`.
#[must_use]
pub fn is_css_hex_string(s: &str) -> bool {
    let t = s.trim();
    let digits = t.strip_prefix('#').unwrap_or(t);
    matches!(digits.len(), 3 | 4 | 6 | 8) && digits.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Split-out arguments of one functional notation.
#[derive(Debug)]
pub(crate) struct FunctionArgs<'a> {
    /// Exactly three channel tokens.
    pub channels: [&'a str; 3],
    /// Optional alpha token (4th legacy argument or slash-delimited).
    pub alpha: Option<&'a str>,
    /// True when the legacy comma-delimited style was used.
    pub legacy: bool,
}

/// Extract the arguments of `name(...)` in either delimiter style.
///
/// Legacy style: three or four comma-separated tokens. Modern style: three
/// whitespace-separated channels with an optional `/ alpha`. `None` for
/// anything else (wrong arity, empty tokens, wrong function name).
pub(crate) fn function_args<'a>(s: &'a str, name: &str) -> Option<FunctionArgs<'a>> {
    let t = s.trim();
    let head = t.get(..name.len())?;
    if !head.eq_ignore_ascii_case(name) {
        return None;
    }
    let body = t
        .get(name.len()..)?
        .strip_prefix('(')?
        .strip_suffix(')')?
        .trim();

    if body.contains(',') {
        let parts: Vec<&str> = body.split(',').map(str::trim).collect();
        if parts.iter().any(|p| p.is_empty()) {
            return None;
        }
        match parts[..] {
            [r, g, b] => Some(FunctionArgs {
                channels: [r, g, b],
                alpha: None,
                legacy: true,
            }),
            [r, g, b, a] => Some(FunctionArgs {
                channels: [r, g, b],
                alpha: Some(a),
                legacy: true,
            }),
            _ => None,
        }
    } else {
        let (channel_part, alpha) = match body.split_once('/') {
            Some((c, a)) => {
                let a = a.trim();
                if a.is_empty() {
                    return None;
                }
                (c, Some(a))
            }
            None => (body, None),
        };
        let channels: Vec<&str> = channel_part.split_whitespace().collect();
        match channels[..] {
            [r, g, b] => Some(FunctionArgs {
                channels: [r, g, b],
                alpha,
                legacy: false,
            }),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_number_or_percent_scales() {
        let v = number_or_percent("50%", &UINT8_CHANNEL).unwrap();
        assert!((v - 127.5).abs() < 1e-12);
        let v = number_or_percent("128", &UINT8_CHANNEL).unwrap();
        assert!((v - 128.0).abs() < 1e-12);
    }

    #[test]
    fn test_percent_endpoints_are_exact() {
        assert_eq!(number_or_percent("100%", &UINT8_CHANNEL), Some(255.0));
        assert_eq!(number_or_percent("100%", &FRACTION), Some(1.0));
        assert_eq!(number_or_percent("100%", &LAB_LIGHTNESS), Some(100.0));
        assert_eq!(number_or_percent("-100%", &LAB_AXIS), Some(-125.0));
    }

    #[test]
    fn test_number_or_percent_assert_range() {
        assert!(number_or_percent("256", &UINT8_CHANNEL).is_none());
        assert!(number_or_percent("-1", &UINT8_CHANNEL).is_none());
        assert!(number_or_percent("101%", &FRACTION).is_none());
    }

    #[test]
    fn test_number_or_percent_clamps_alpha() {
        let v = number_or_percent("1.5", &ALPHA).unwrap();
        assert!((v - 1.0).abs() < 1e-12);
        let v = number_or_percent("-20%", &ALPHA).unwrap();
        assert!(v.abs() < 1e-12);
    }

    #[test]
    fn test_number_or_percent_rejects_garbage() {
        assert!(number_or_percent("abc", &ALPHA).is_none());
        assert!(number_or_percent("", &ALPHA).is_none());
        assert!(number_or_percent("1..2", &ALPHA).is_none());
        assert!(number_or_percent("inf", &LAB_LIGHTNESS).is_none());
    }

    #[test]
    fn test_lab_axis_percent_reference() {
        let v = number_or_percent("100%", &LAB_AXIS).unwrap();
        assert!((v - 125.0).abs() < 1e-12);
        let v = number_or_percent("100%", &LCH_CHROMA).unwrap();
        assert!((v - 150.0).abs() < 1e-12);
    }

    #[test]
    fn test_lch_chroma_clamps_negative() {
        let v = number_or_percent("-10", &LCH_CHROMA).unwrap();
        assert!(v.abs() < 1e-12);
    }

    #[test]
    fn test_parse_angle_units() {
        assert!((parse_angle("180deg").unwrap() - PI).abs() < 1e-12);
        assert!((parse_angle("180").unwrap() - PI).abs() < 1e-12);
        assert!((parse_angle("0.5turn").unwrap() - PI).abs() < 1e-12);
        assert!((parse_angle("200grad").unwrap() - PI).abs() < 1e-12);
        assert!((parse_angle("3.14159rad").unwrap() - 3.14159).abs() < 1e-12);
    }

    #[test]
    fn test_parse_angle_wraps() {
        assert!((parse_angle("540deg").unwrap() - PI).abs() < 1e-9);
        assert!((parse_angle("-90deg").unwrap() - 1.5 * PI).abs() < 1e-9);
    }

    #[test]
    fn test_parse_angle_bad_unit() {
        assert!(parse_angle("90degs").is_none());
        assert!(parse_angle("x").is_none());
    }

    #[test]
    fn test_sniff_predicates() {
        assert!(is_css_rgb_string("rgb(1,2,3)"));
        assert!(is_css_rgb_string("  RGB(1 2 3)  "));
        assert!(!is_css_rgb_string("rgba(1,2,3,1)"));
        assert!(is_css_rgba_string("rgba(1,2,3,1)"));
        assert!(is_css_hsl_string("hsl(120, 50%, 50%)"));
        assert!(is_css_hsla_string("hsla(120, 50%, 50%, 0.5)"));
        assert!(is_css_lab_string("lab(50 40 59.5)"));
        assert!(is_css_lch_string("lch(52.2 72.2 50)"));
        assert!(!is_css_rgb_string("rgb(1,2,3"));
        assert!(!is_css_lab_string("lab"));
    }

    #[test]
    fn test_sniff_hex() {
        assert!(is_css_hex_string("#fff"));
        assert!(is_css_hex_string("f00f"));
        assert!(is_css_hex_string("#DeadBeef"));
        assert!(!is_css_hex_string("#ffff0"));
        assert!(!is_css_hex_string("#ggg"));
    }

    #[test]
    fn test_function_args_legacy() {
        let args = function_args("rgb(1, 2, 3)", "rgb").unwrap();
        assert_eq!(args.channels, ["1", "2", "3"]);
        assert!(args.alpha.is_none());
        assert!(args.legacy);

        let args = function_args("rgba(1,2,3,0.5)", "rgba").unwrap();
        assert_eq!(args.alpha, Some("0.5"));
    }

    #[test]
    fn test_function_args_modern() {
        let args = function_args("rgb(1 2 3)", "rgb").unwrap();
        assert_eq!(args.channels, ["1", "2", "3"]);
        assert!(!args.legacy);

        let args = function_args("rgb(1 2 3 / 0.5)", "rgb").unwrap();
        assert_eq!(args.alpha, Some("0.5"));
    }

    #[test]
    fn test_function_args_bad_arity() {
        assert!(function_args("rgb(0,0)", "rgb").is_none());
        assert!(function_args("rgb(1,2,3,4,5)", "rgb").is_none());
        assert!(function_args("rgb(1 2)", "rgb").is_none());
        assert!(function_args("rgb(1 2 3 /)", "rgb").is_none());
        assert!(function_args("rgb(1,,3)", "rgb").is_none());
    }
}
