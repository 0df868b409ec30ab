//! Per-popover styling.

use crate::defaults;
use crate::errors::{PopoverError, non_negative};
use crate::types::Color;

#[derive(Debug, Clone, PartialEq)]
pub struct Font {
    pub family: String,
    pub size: f64,
}

impl Font {
    pub fn new(family: impl Into<String>, size: f64) -> Self {
        Self {
            family: family.into(),
            size,
        }
    }

    /// The platform UI font at `size`.
    pub fn system(size: f64) -> Self {
        Self::new(defaults::FONT_FAMILY, size)
    }
}

impl Default for Font {
    fn default() -> Self {
        Self::system(defaults::FONT_SIZE)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PopoverConfig {
    /// Gap between the anchor and the popover.
    pub offset: f64,
    /// Corner radius of the popover body.
    pub radius: f64,
    pub font: Font,
    pub text_color: Color,
    pub background_color: Color,
    /// Stroke color; `None` means the outline is only filled.
    pub border_color: Option<Color>,
    pub border_width: f64,
}

impl Default for PopoverConfig {
    fn default() -> Self {
        Self {
            offset: defaults::EDGE_OFFSET,
            radius: defaults::CORNER_RADIUS,
            font: Font::default(),
            text_color: Color::white(),
            background_color: Color::gray(),
            border_color: None,
            border_width: defaults::BORDER_WIDTH,
        }
    }
}

impl PopoverConfig {
    pub fn validate(&self) -> Result<(), PopoverError> {
        non_negative("offset", self.offset)?;
        non_negative("radius", self.radius)?;
        non_negative("font.size", self.font.size)?;
        non_negative("border_width", self.border_width)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_component_defaults() {
        let config = PopoverConfig::default();
        assert_eq!(config.offset, 5.0);
        assert_eq!(config.radius, 5.0);
        assert_eq!(config.font.size, 14.0);
        assert_eq!(config.text_color, Color::white());
        assert_eq!(config.background_color, Color::gray());
        assert!(config.border_color.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_rejects_negative_radius() {
        let config = PopoverConfig {
            radius: -1.0,
            ..PopoverConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(err, PopoverError::InvalidMetric { field: "radius", .. }));
    }

    #[test]
    fn validate_rejects_nan_font_size() {
        let config = PopoverConfig {
            font: Font::system(f64::NAN),
            ..PopoverConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
