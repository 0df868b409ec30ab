//! Default metrics and styling, in host points.

use std::time::Duration;

/// Padding between the popover edge and the text block.
pub const TEXT_MARGIN: f64 = 10.0;
pub const CORNER_RADIUS: f64 = 5.0;
/// Depth of the tail, which is also half its base width.
pub const ARROW_HEIGHT: f64 = 8.0;
/// Gap between the anchor and the popover along the pointing axis.
pub const EDGE_OFFSET: f64 = 5.0;
/// Minimum distance kept from the container's left and right edges.
pub const SCREEN_INSET: f64 = 10.0;
pub const PREFERRED_WIDTH: f64 = 120.0;
pub const FONT_FAMILY: &str = "system-ui";
pub const FONT_SIZE: f64 = 14.0;
pub const BORDER_WIDTH: f64 = 1.0;
pub const FADE_DURATION: Duration = Duration::from_millis(300);
