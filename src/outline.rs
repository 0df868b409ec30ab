//! Outline construction for the popover shape.
//!
//! The outline is a rounded rectangle whose tail edge is interrupted by a
//! triangular notch meeting at the arrow tip. It always starts and ends at the
//! tip and walks the four corners in the same rotational sense for every
//! direction, so fills never self-intersect.
//!
//! # Corner walk
//!
//! | direction | tail edge | corners after the tail                    |
//! |-----------|-----------|-------------------------------------------|
//! | Up        | top       | top-left, bottom-left, bottom-right, top-right |
//! | Down      | bottom    | bottom-right, top-right, top-left, bottom-left |
//! | Right     | right     | top-right, top-left, bottom-left, bottom-right |
//!
//! Each corner is a straight run ending `radius` before the corner, then a
//! quadratic curve with the sharp corner as control point, ending `radius`
//! along the next edge.
//!
//! Precondition: `radius <= min(width, height) / 2`. Larger radii produce a
//! self-intersecting contour, not an error; see [`check_radius`].

use std::fmt;

use glam::{DVec2, dvec2};

use crate::errors::PopoverError;
use crate::layout::{ArrowDirection, PopoverLayout};
use crate::types::{Point, Size};

/// One step of a path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathSegment {
    MoveTo(Point),
    LineTo(Point),
    QuadCurveTo { end: Point, control: Point },
    Close,
}

/// A single closed contour.
#[derive(Debug, Clone, PartialEq)]
pub struct Outline {
    segments: Vec<PathSegment>,
}

impl Outline {
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Number of rounded corners (quadratic segments).
    pub fn corner_count(&self) -> usize {
        self.segments
            .iter()
            .filter(|s| matches!(s, PathSegment::QuadCurveTo { .. }))
            .count()
    }

    /// Every point the contour passes through or is pulled toward.
    pub fn points(&self) -> impl Iterator<Item = Point> + '_ {
        self.segments.iter().flat_map(|s| match *s {
            PathSegment::MoveTo(p) | PathSegment::LineTo(p) => vec![p],
            PathSegment::QuadCurveTo { end, control } => vec![control, end],
            PathSegment::Close => Vec::new(),
        })
    }

    pub fn into_segments(self) -> Vec<PathSegment> {
        self.segments
    }
}

/// SVG path data: `M x,y L x,y Q cx,cy x,y Z`.
impl fmt::Display for Outline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, seg) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            match seg {
                PathSegment::MoveTo(p) => write!(f, "M{},{}", fmt_num(p.x), fmt_num(p.y))?,
                PathSegment::LineTo(p) => write!(f, "L{},{}", fmt_num(p.x), fmt_num(p.y))?,
                PathSegment::QuadCurveTo { end, control } => write!(
                    f,
                    "Q{},{} {},{}",
                    fmt_num(control.x),
                    fmt_num(control.y),
                    fmt_num(end.x),
                    fmt_num(end.y)
                )?,
                PathSegment::Close => f.write_str("Z")?,
            }
        }
        Ok(())
    }
}

/// Incremental builder for an [`Outline`].
#[derive(Debug)]
struct OutlineBuilder {
    segments: Vec<PathSegment>,
    radius: f64,
}

impl OutlineBuilder {
    fn new(start: DVec2, radius: f64) -> Self {
        // move + tail side + 4 × (line, curve) + base + back to tip + close
        let mut segments = Vec::with_capacity(13);
        segments.push(PathSegment::MoveTo(start.into()));
        Self { segments, radius }
    }

    fn line_to(&mut self, p: DVec2) {
        self.segments.push(PathSegment::LineTo(p.into()));
    }

    /// Run along `heading_in` until `radius` short of `corner`, then curve
    /// around it to `radius` along `heading_out`.
    fn round_corner(&mut self, corner: DVec2, heading_in: DVec2, heading_out: DVec2) {
        self.line_to(corner - heading_in * self.radius);
        self.segments.push(PathSegment::QuadCurveTo {
            end: (corner + heading_out * self.radius).into(),
            control: corner.into(),
        });
    }

    fn close(mut self) -> Outline {
        self.segments.push(PathSegment::Close);
        Outline {
            segments: self.segments,
        }
    }
}

/// Build the popover contour in popover-local coordinates.
pub fn build_outline(
    size: Size,
    arrow_tip: Point,
    direction: ArrowDirection,
    radius: f64,
    arrow_height: f64,
) -> Outline {
    if radius > size.min_side() / 2.0 {
        crate::log::warn!(radius, width = size.width, height = size.height, "corner radius too large for popover");
    }

    let (w, h) = (size.width, size.height);
    let tip = arrow_tip.to_dvec2();
    let a = arrow_height;

    // Tail base endpoints (in walk order), the four body corners, and the
    // heading from the first base point toward the first corner.
    let (base_start, base_end, corners, heading) = match direction {
        ArrowDirection::Up => {
            let top = tip.y + a;
            (
                dvec2(tip.x - a, top),
                dvec2(tip.x + a, top),
                [dvec2(0.0, top), dvec2(0.0, h), dvec2(w, h), dvec2(w, top)],
                DVec2::NEG_X,
            )
        }
        ArrowDirection::Down => {
            let bottom = tip.y - a;
            (
                dvec2(tip.x + a, bottom),
                dvec2(tip.x - a, bottom),
                [dvec2(w, bottom), dvec2(w, 0.0), dvec2(0.0, 0.0), dvec2(0.0, bottom)],
                DVec2::X,
            )
        }
        ArrowDirection::Right => {
            let right = tip.x - a;
            (
                dvec2(right, tip.y - a),
                dvec2(right, tip.y + a),
                [dvec2(right, 0.0), dvec2(0.0, 0.0), dvec2(0.0, h), dvec2(right, h)],
                DVec2::NEG_Y,
            )
        }
    };

    let mut builder = OutlineBuilder::new(tip, radius);
    builder.line_to(base_start);

    let mut heading_in = heading;
    for corner in corners {
        let heading_out = turn(heading_in);
        builder.round_corner(corner, heading_in, heading_out);
        heading_in = heading_out;
    }

    builder.line_to(base_end);
    builder.line_to(tip);
    let outline = builder.close();

    crate::log::trace!(segments = outline.len(), ?direction, "built popover outline");
    outline
}

/// Build the outline for a cached layout.
pub fn outline_for_layout(layout: &PopoverLayout, radius: f64, arrow_height: f64) -> Outline {
    build_outline(layout.size(), layout.arrow_tip, layout.direction, radius, arrow_height)
}

/// Check the radius precondition that [`build_outline`] assumes.
pub fn check_radius(size: Size, radius: f64) -> Result<(), PopoverError> {
    let limit = size.min_side() / 2.0;
    if radius > limit {
        Err(PopoverError::RadiusTooLarge { radius, limit })
    } else {
        Ok(())
    }
}

/// Quarter turn with the same rotational sense for every direction
/// (y grows downward): west → south → east → north → west.
#[inline]
fn turn(heading: DVec2) -> DVec2 {
    -heading.perp()
}

/// Format a number with 6 significant figures, trailing zeros trimmed.
pub(crate) fn fmt_num(value: f64) -> String {
    const SIG_FIGS: i32 = 6;
    if value == 0.0 {
        return "0".to_string();
    }
    if !value.is_finite() {
        return value.to_string();
    }

    let magnitude = value.abs().log10().floor() as i32;
    let scale = 10_f64.powi(SIG_FIGS - 1 - magnitude);
    if !scale.is_finite() {
        // far below anything drawable
        return "0".to_string();
    }
    let rounded = (value * scale).round() / scale;

    let decimals = (SIG_FIGS - 1 - magnitude).max(0) as usize;
    let s = format!("{:.prec$}", rounded, prec = decimals);
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s
    }
}
