//! Speech-bubble popovers anchored to a rectangle.
//!
//! Two pure pieces do the geometry:
//!
//! - [`compute_layout`] places the popover next to an anchor rect, clamped to
//!   the container horizontally, and finds the arrow tip in popover-local
//!   coordinates.
//! - [`build_outline`] turns that layout into one closed contour: a rounded
//!   rectangle with a triangular tail pointing at the anchor.
//!
//! [`TextPopover`] wires them to a message, a [`TextMeasurer`], a
//! [`PopoverRenderer`] and a one-shot dismissal lifecycle.
//!
//! ```
//! use textpopover::{ArrowDirection, LayoutMetrics, Rect, Size, build_outline, compute_layout};
//!
//! let layout = compute_layout(
//!     Rect::new(100.0, 500.0, 60.0, 30.0),
//!     Rect::new(0.0, 0.0, 400.0, 800.0),
//!     Size::new(60.0, 20.0),
//!     ArrowDirection::Up,
//!     &LayoutMetrics::default(),
//! );
//! assert_eq!(layout.frame, Rect::new(90.0, 535.0, 80.0, 48.0));
//!
//! let outline = build_outline(layout.size(), layout.arrow_tip, layout.direction, 5.0, 8.0);
//! assert_eq!(outline.corner_count(), 4);
//! ```

pub mod config;
pub mod defaults;
pub mod errors;
pub mod layout;
pub mod log;
pub mod measure;
pub mod outline;
pub mod popover;
pub mod render;
pub mod types;

pub use config::{Font, PopoverConfig};
pub use errors::PopoverError;
pub use layout::{ArrowDirection, LayoutMetrics, PopoverLayout, compute_layout};
pub use measure::{ProportionalMeasurer, TextMeasurer, message_size};
pub use outline::{Outline, PathSegment, build_outline, check_radius, outline_for_layout};
pub use popover::{DismissObserver, Hit, Phase, PopoverId, TextPopover};
pub use render::{PopoverRenderer, SvgRenderer};
pub use types::{Color, NumericError, Point, Rect, Size};
