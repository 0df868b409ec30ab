//! Popover placement.
//!
//! Turns an anchor rect, the container bounds and the measured message size
//! into the popover frame plus the arrow tip in popover-local coordinates.
//! Runs once per `show`; the result is cached and reused on every redraw.
//!
//! Clamping only happens on the axis orthogonal to the arrow. The tip of an
//! up/down arrow is computed from the anchor's midpoint minus the *clamped*
//! frame origin, so a shifted frame keeps its tail under the anchor rather than
//! at the frame's center.

use crate::defaults;
use crate::errors::{PopoverError, non_negative};
use crate::types::{Point, Rect, Size};

/// Which way the tail points, as seen from the popover body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArrowDirection {
    /// Tail on the top edge; the popover sits below the anchor.
    Up,
    /// Tail on the bottom edge; the popover sits above the anchor.
    Down,
    /// Tail on the right edge; the popover sits left of the anchor.
    Right,
}

impl ArrowDirection {
    pub const ALL: [ArrowDirection; 3] = [ArrowDirection::Up, ArrowDirection::Down, ArrowDirection::Right];

    /// Up and Down point along the y axis and get clamped horizontally.
    pub fn is_vertical(self) -> bool {
        matches!(self, ArrowDirection::Up | ArrowDirection::Down)
    }
}

/// Spacing used by [`compute_layout`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutMetrics {
    pub edge_offset: f64,
    pub text_margin: f64,
    pub arrow_height: f64,
    pub screen_inset: f64,
}

impl Default for LayoutMetrics {
    fn default() -> Self {
        Self {
            edge_offset: defaults::EDGE_OFFSET,
            text_margin: defaults::TEXT_MARGIN,
            arrow_height: defaults::ARROW_HEIGHT,
            screen_inset: defaults::SCREEN_INSET,
        }
    }
}

impl LayoutMetrics {
    /// Create metrics with validation; the screen inset keeps its default.
    pub fn try_new(edge_offset: f64, text_margin: f64, arrow_height: f64) -> Result<Self, PopoverError> {
        Ok(Self {
            edge_offset: non_negative("edge_offset", edge_offset)?,
            text_margin: non_negative("text_margin", text_margin)?,
            arrow_height: non_negative("arrow_height", arrow_height)?,
            screen_inset: defaults::SCREEN_INSET,
        })
    }

    pub fn with_screen_inset(mut self, inset: f64) -> Result<Self, PopoverError> {
        self.screen_inset = non_negative("screen_inset", inset)?;
        Ok(self)
    }

    pub fn with_edge_offset(mut self, offset: f64) -> Result<Self, PopoverError> {
        self.edge_offset = non_negative("edge_offset", offset)?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), PopoverError> {
        non_negative("edge_offset", self.edge_offset)?;
        non_negative("text_margin", self.text_margin)?;
        non_negative("arrow_height", self.arrow_height)?;
        non_negative("screen_inset", self.screen_inset)?;
        Ok(())
    }
}

/// Result of [`compute_layout`]. Immutable once produced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PopoverLayout {
    /// Frame in container coordinates.
    pub frame: Rect,
    /// Arrow tip in popover-local coordinates; always on the frame boundary.
    pub arrow_tip: Point,
    pub direction: ArrowDirection,
}

impl PopoverLayout {
    pub fn size(&self) -> Size {
        self.frame.size()
    }

    /// The arrow tip mapped back into container coordinates.
    pub fn arrow_tip_in_container(&self) -> Point {
        self.arrow_tip.offset_by(self.frame.origin())
    }

    /// Where the text block goes inside the popover. Only an up arrow pushes
    /// the text down, since it is the only tail above the body.
    pub fn text_origin(&self, metrics: &LayoutMetrics) -> Point {
        match self.direction {
            ArrowDirection::Up => Point::new(metrics.text_margin, metrics.text_margin + metrics.arrow_height),
            ArrowDirection::Down | ArrowDirection::Right => Point::new(metrics.text_margin, metrics.text_margin),
        }
    }
}

/// Compute the popover frame and arrow tip.
///
/// `anchor` is in the container's coordinate space and `container` is its
/// bounds; clamping compares against `container.width` only. Zero-size content
/// yields a frame of just the margins (plus the tail), which the caller should
/// avoid showing.
pub fn compute_layout(
    anchor: Rect,
    container: Rect,
    content: Size,
    direction: ArrowDirection,
    metrics: &LayoutMetrics,
) -> PopoverLayout {
    let margin = metrics.text_margin * 2.0;
    let mut size = content.inflate(margin, margin);

    let (frame, arrow_tip) = if direction.is_vertical() {
        size.height += metrics.arrow_height;

        let y = match direction {
            ArrowDirection::Up => anchor.max_y() + metrics.edge_offset,
            _ => anchor.min_y() - size.height - metrics.edge_offset,
        };
        let x = clamp_horizontally(anchor, container, size.width, metrics.screen_inset);
        let frame = Rect::new(x, y, size.width, size.height);

        let tip_y = if direction == ArrowDirection::Up { 0.0 } else { frame.height };
        (frame, Point::new(anchor.mid_x() - frame.min_x(), tip_y))
    } else {
        size.width += metrics.arrow_height;

        let y = anchor.min_y() + (anchor.height - size.height) / 2.0;
        let x = anchor.min_x() - size.width - metrics.edge_offset;
        let frame = Rect::new(x, y, size.width, size.height);

        (frame, Point::new(frame.width, frame.height / 2.0))
    };

    crate::log::debug!(%frame, tip = %arrow_tip, ?direction, "computed popover layout");

    PopoverLayout {
        frame,
        arrow_tip,
        direction,
    }
}

/// Center on the anchor, then keep `screen_inset` clear of either container edge.
fn clamp_horizontally(anchor: Rect, container: Rect, width: f64, screen_inset: f64) -> f64 {
    let centered = anchor.min_x() - (width - anchor.width) / 2.0;

    if centered + width > container.width {
        crate::log::debug!(centered, "popover clamped to the right edge");
        container.width - width - screen_inset
    } else if centered <= screen_inset {
        crate::log::debug!(centered, "popover clamped to the left edge");
        screen_inset
    } else {
        centered
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONTAINER: Rect = Rect::new(0.0, 0.0, 400.0, 800.0);

    fn anchor() -> Rect {
        Rect::new(100.0, 500.0, 60.0, 30.0)
    }

    #[test]
    fn up_places_below_anchor() {
        let layout = compute_layout(
            anchor(),
            CONTAINER,
            Size::new(60.0, 20.0),
            ArrowDirection::Up,
            &LayoutMetrics::default(),
        );
        assert_eq!(layout.frame, Rect::new(90.0, 535.0, 80.0, 48.0));
        assert_eq!(layout.arrow_tip, Point::new(40.0, 0.0));
    }

    #[test]
    fn down_places_above_anchor() {
        let layout = compute_layout(
            anchor(),
            CONTAINER,
            Size::new(60.0, 20.0),
            ArrowDirection::Down,
            &LayoutMetrics::default(),
        );
        assert_eq!(layout.frame.y, 500.0 - 48.0 - 5.0);
        assert_eq!(layout.arrow_tip, Point::new(40.0, 48.0));
    }

    #[test]
    fn right_places_left_of_anchor_and_centers_vertically() {
        let layout = compute_layout(
            anchor(),
            CONTAINER,
            Size::new(60.0, 20.0),
            ArrowDirection::Right,
            &LayoutMetrics::default(),
        );
        // 80 + 8 wide, 40 tall
        assert_eq!(layout.frame, Rect::new(100.0 - 88.0 - 5.0, 495.0, 88.0, 40.0));
        assert_eq!(layout.arrow_tip, Point::new(88.0, 20.0));
    }

    #[test]
    fn right_arrow_is_never_clamped() {
        let near_left = Rect::new(20.0, 100.0, 40.0, 20.0);
        let layout = compute_layout(
            near_left,
            CONTAINER,
            Size::new(100.0, 20.0),
            ArrowDirection::Right,
            &LayoutMetrics::default(),
        );
        assert!(layout.frame.x < 0.0);
    }

    #[test]
    fn clamp_to_right_edge() {
        let anchor = Rect::new(370.0, 100.0, 20.0, 20.0);
        let layout = compute_layout(
            anchor,
            CONTAINER,
            Size::new(100.0, 20.0),
            ArrowDirection::Up,
            &LayoutMetrics::default(),
        );
        assert_eq!(layout.frame.x, 400.0 - 120.0 - 10.0);
        // tip tracks the anchor center, not the frame center
        assert_eq!(layout.arrow_tip.x, 380.0 - 270.0);
    }

    #[test]
    fn clamp_to_left_edge_includes_exact_inset() {
        // centered x lands exactly on the inset: `<=` clamps it (to the same value)
        let anchor = Rect::new(30.0, 100.0, 20.0, 20.0);
        let layout = compute_layout(
            anchor,
            CONTAINER,
            Size::new(40.0, 20.0),
            ArrowDirection::Down,
            &LayoutMetrics::default(),
        );
        assert_eq!(layout.frame.x, 10.0);

        let anchor = Rect::new(0.0, 100.0, 20.0, 20.0);
        let layout = compute_layout(
            anchor,
            CONTAINER,
            Size::new(40.0, 20.0),
            ArrowDirection::Down,
            &LayoutMetrics::default(),
        );
        assert_eq!(layout.frame.x, 10.0);
        assert_eq!(layout.arrow_tip.x, 0.0);
    }

    #[test]
    fn zero_content_gives_margin_only_frame() {
        let layout = compute_layout(
            anchor(),
            CONTAINER,
            Size::ZERO,
            ArrowDirection::Right,
            &LayoutMetrics::default(),
        );
        assert_eq!(layout.size(), Size::new(28.0, 20.0));
    }

    #[test]
    fn text_origin_depends_on_direction() {
        let metrics = LayoutMetrics::default();
        let mut layout = compute_layout(anchor(), CONTAINER, Size::new(10.0, 10.0), ArrowDirection::Up, &metrics);
        assert_eq!(layout.text_origin(&metrics), Point::new(10.0, 18.0));
        layout.direction = ArrowDirection::Down;
        assert_eq!(layout.text_origin(&metrics), Point::new(10.0, 10.0));
    }

    #[test]
    fn tip_in_container_space() {
        let layout = compute_layout(
            anchor(),
            CONTAINER,
            Size::new(60.0, 20.0),
            ArrowDirection::Up,
            &LayoutMetrics::default(),
        );
        assert_eq!(layout.arrow_tip_in_container(), Point::new(130.0, 535.0));
    }

    #[test]
    fn metrics_reject_bad_values() {
        assert!(LayoutMetrics::try_new(5.0, 10.0, 8.0).is_ok());
        assert!(LayoutMetrics::try_new(-1.0, 10.0, 8.0).is_err());
        assert!(LayoutMetrics::try_new(5.0, f64::NAN, 8.0).is_err());
        assert!(LayoutMetrics::default().with_screen_inset(f64::INFINITY).is_err());
    }
}
