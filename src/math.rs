//! Numeric primitives shared by every codec.
//!
//! Angle-unit conversion, modular interval wrap, threshold quantization, and
//! trimmed fixed-decimal formatting. Every stringifier in the crate funnels
//! its number output through [`to_fixed`] so emitted CSS is deterministic and
//! minimal-length. NaN propagates through all of these functions.

use std::f64::consts::TAU;

/// CSS angle units. `Deg` is the default unit of CSS angle tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AngleUnit {
    /// Full revolutions (1 turn = 360deg).
    Turn,
    /// Radians.
    Rad,
    /// Degrees.
    #[default]
    Deg,
    /// Gradians (400 per revolution).
    Grad,
}

impl AngleUnit {
    /// Scale factor converting one of this unit into turns.
    #[must_use]
    pub fn in_turns(self) -> f64 {
        match self {
            Self::Turn => 1.0,
            Self::Rad => 1.0 / TAU,
            Self::Deg => 1.0 / 360.0,
            Self::Grad => 1.0 / 400.0,
        }
    }

    /// Canonical CSS suffix for this unit.
    #[must_use]
    pub fn suffix(self) -> &'static str {
        match self {
            Self::Turn => "turn",
            Self::Rad => "rad",
            Self::Deg => "deg",
            Self::Grad => "grad",
        }
    }

    /// Resolve a CSS angle-unit suffix. The empty string is `Deg`.
    #[must_use]
    pub fn from_suffix(suffix: &str) -> Option<Self> {
        match suffix {
            "" | "deg" => Some(Self::Deg),
            "rad" => Some(Self::Rad),
            "grad" => Some(Self::Grad),
            "turn" => Some(Self::Turn),
            _ => None,
        }
    }
}

/// Convert an angle between units, scaling through turns.
#[must_use]
pub fn angle(n: f64, from: AngleUnit, to: AngleUnit) -> f64 {
    n * from.in_turns() / to.in_turns()
}

/// Wrap `n` into the half-open interval `[min(a, b), max(a, b))`.
///
/// Used to fold hue into a canonical range for display. A zero-width
/// interval returns its bound.
#[must_use]
pub fn interval(n: f64, a: f64, b: f64) -> f64 {
    let lo = a.min(b);
    let hi = a.max(b);
    let width = hi - lo;
    if width == 0.0 {
        return lo;
    }
    let wrapped = n - width * ((n - lo) / width).floor();
    // floor() can land exactly on the upper bound when (n - lo) is a tiny
    // negative multiple of width.
    if wrapped >= hi {
        lo
    } else {
        wrapped
    }
}

/// Round `n` to the nearest multiple of `step`, with the round-up breakpoint
/// at `threshold` (a fraction of `step`; 0.5 is conventional half-up).
///
/// A single primitive serves both 8-bit channel quantization
/// (`align(x * 255.0, 1.0, 0.5)`) and coarser snapping.
#[must_use]
pub fn align(n: f64, step: f64, threshold: f64) -> f64 {
    let units = n / step;
    let base = units.floor();
    let frac = units - base;
    if frac >= threshold {
        (base + 1.0) * step
    } else {
        base * step
    }
}

/// Format `n` with at most `max_decimals` fraction digits, trimming trailing
/// zeros and never leaving a bare trailing decimal point.
///
/// `to_fixed(1.50, 3)` is `"1.5"`, `to_fixed(2.0, 3)` is `"2"`.
#[must_use]
pub fn to_fixed(n: f64, max_decimals: usize) -> String {
    let mut s = format!("{n:.max_decimals$}");
    if s.contains('.') {
        while s.ends_with('0') {
            s.pop();
        }
        if s.ends_with('.') {
            s.pop();
        }
    }
    if s == "-0" {
        "0".to_string()
    } else {
        s
    }
}
