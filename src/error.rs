//! Error types for tinct operations.

use thiserror::Error;

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while parsing or serializing colors.
///
/// Display strings are part of the public contract: callers match on them
/// when validating user-supplied CSS, so the literals are stable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A string matched a known notation but a component token failed its
    /// parser (bad number, out-of-range channel, bad angle unit, wrong arity).
    #[error("bad css color '{0}'")]
    BadCssColor(String),

    /// No notation or registered name matched the input at all.
    #[error("not css color '{0}'")]
    NotCssColor(String),

    /// A color record contained NaN in a component that must be finite at
    /// serialization time.
    #[error("bad {model} color: component '{component}' is NaN")]
    NanComponent {
        /// Color model being serialized (`rgb`, `rgba`, `hsl`, ...).
        model: &'static str,
        /// Name of the offending field.
        component: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bad_css_color_display() {
        let err = Error::BadCssColor("rgb(0,0)".to_string());
        assert_eq!(err.to_string(), "bad css color 'rgb(0,0)'");
    }

    #[test]
    fn test_not_css_color_display() {
        let err = Error::NotCssColor("foo".to_string());
        assert_eq!(err.to_string(), "not css color 'foo'");
    }

    #[test]
    fn test_nan_component_display() {
        let err = Error::NanComponent {
            model: "rgb",
            component: "r",
        };
        assert!(err.to_string().starts_with("bad rgb color"));
        assert!(err.to_string().contains("'r'"));
    }
}
