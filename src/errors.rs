//! Error types with miette diagnostics.
//!
//! The layout and outline functions are total and never return these. They
//! come from the validating entry points: config checks, `show`, and the
//! explicit radius precondition check.

use miette::Diagnostic;
use thiserror::Error;

use crate::types::NumericError;

#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum PopoverError {
    #[error("invalid {field}: {value}")]
    #[diagnostic(
        code(textpopover::invalid_metric),
        help("sizes and offsets must be finite and non-negative")
    )]
    InvalidMetric {
        field: &'static str,
        value: f64,
        #[source]
        source: NumericError,
    },

    #[error("corner radius {radius} exceeds half of the popover's smaller side")]
    #[diagnostic(
        code(textpopover::outline::radius_too_large),
        help("use a radius of at most {limit}")
    )]
    RadiusTooLarge { radius: f64, limit: f64 },

    #[error("popover has already been dismissed")]
    #[diagnostic(
        code(textpopover::popover::dismissed),
        help("create a new popover instead of re-showing a dismissed one")
    )]
    Dismissed,

    #[error("could not write SVG: {message}")]
    #[diagnostic(code(textpopover::render::svg))]
    Svg { message: String },
}

impl PopoverError {
    pub(crate) fn metric(field: &'static str, value: f64, source: NumericError) -> Self {
        PopoverError::InvalidMetric {
            field,
            value,
            source,
        }
    }
}

/// Validate a non-negative finite metric, tagging failures with the field name.
pub(crate) fn non_negative(field: &'static str, value: f64) -> Result<f64, PopoverError> {
    crate::types::check_non_negative(value).map_err(|e| PopoverError::metric(field, value, e))
}

/// Validate a finite value (which may be negative, e.g. a coordinate).
pub(crate) fn finite(field: &'static str, value: f64) -> Result<f64, PopoverError> {
    crate::types::check_finite(value).map_err(|e| PopoverError::metric(field, value, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metric_error_names_field() {
        let err = non_negative("radius", -2.0).unwrap_err();
        assert_eq!(err.to_string(), "invalid radius: -2");
        assert!(matches!(
            err,
            PopoverError::InvalidMetric {
                source: NumericError::Negative,
                ..
            }
        ));
    }

    #[test]
    fn finite_accepts_negative_coordinates() {
        assert_eq!(finite("anchor.x", -12.5), Ok(-12.5));
        assert!(finite("anchor.x", f64::NAN).is_err());
    }

    #[test]
    fn diagnostic_code() {
        let err = PopoverError::RadiusTooLarge {
            radius: 30.0,
            limit: 24.0,
        };
        let code = err.code().map(|c| c.to_string());
        assert_eq!(code.as_deref(), Some("textpopover::outline::radius_too_large"));
    }
}
