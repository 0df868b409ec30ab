//! Painting.
//!
//! [`PopoverRenderer`] is the seam to the host's drawing surface. The popover
//! hands it an outline and colors, then the text block; it never draws pixels
//! itself. [`SvgRenderer`] collects those calls as a small SVG element tree and
//! serializes it with `quick-xml`.

use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};

use crate::config::Font;
use crate::errors::PopoverError;
use crate::measure::ProportionalMeasurer;
use crate::outline::{Outline, fmt_num};
use crate::types::{Color, Rect};

const SVG_NS: &str = "http://www.w3.org/2000/svg";

/// Receives the drawing calls for one popover at a time.
///
/// Outlines and text frames are in popover-local coordinates; `begin_popover`
/// gives the frame that maps them into the container.
pub trait PopoverRenderer {
    fn begin_popover(&mut self, _frame: Rect, _opacity: f64) {}

    fn fill_outline(&mut self, outline: &Outline, color: &Color);

    fn stroke_outline(&mut self, outline: &Outline, color: &Color, width: f64);

    /// Draw `text` wrapped inside `frame`.
    ///
    /// `frame` is the measured message size, so the renderer does its own line
    /// breaking. Breaks match the measured size only when the renderer wraps
    /// with the same metrics as the popover's [`TextMeasurer`](crate::TextMeasurer).
    fn draw_text(&mut self, text: &str, frame: Rect, font: &Font, color: &Color);

    fn end_popover(&mut self) {}
}

#[derive(Debug, Clone, PartialEq)]
struct Group {
    transform: String,
    opacity: String,
    children: Vec<SvgNode>,
}

#[derive(Debug, Clone, PartialEq)]
struct TextSpan {
    x: String,
    y: String,
    text: String,
}

#[derive(Debug, Clone, PartialEq)]
enum SvgNode {
    Group(Group),
    Path {
        d: String,
        fill: String,
        stroke: Option<(String, String)>,
    },
    Text {
        family: String,
        size: String,
        fill: String,
        spans: Vec<TextSpan>,
    },
}

/// Collects popovers as SVG elements.
///
/// Text is wrapped with [`ProportionalMeasurer`], so line breaks agree with
/// popovers measured by it.
#[derive(Debug, Default)]
pub struct SvgRenderer {
    nodes: Vec<SvgNode>,
    open: Option<Group>,
    measurer: ProportionalMeasurer,
}

impl SvgRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when nothing has been drawn.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.open.is_none()
    }

    /// Elements drawn so far, without the `<svg>` wrapper.
    pub fn body(&self) -> Result<String, PopoverError> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
        for node in self.nodes.iter() {
            write_node(&mut writer, node)?;
        }
        if let Some(group) = &self.open {
            write_group(&mut writer, group)?;
        }
        into_string(writer)
    }

    /// Serialize everything drawn so far as an `<svg>` document of the given size.
    pub fn finish(mut self, width: f64, height: f64) -> Result<String, PopoverError> {
        self.end_popover();

        let (w, h) = (fmt_num(width), fmt_num(height));
        let view_box = format!("0 0 {w} {h}");
        let root = BytesStart::new("svg").with_attributes([
            ("xmlns", SVG_NS),
            ("width", w.as_str()),
            ("height", h.as_str()),
            ("viewBox", view_box.as_str()),
        ]);

        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
        emit(&mut writer, Event::Start(root))?;
        for node in self.nodes.iter() {
            write_node(&mut writer, node)?;
        }
        emit(&mut writer, Event::End(BytesEnd::new("svg")))?;
        into_string(writer)
    }

    fn push(&mut self, node: SvgNode) {
        match &mut self.open {
            Some(group) => group.children.push(node),
            None => self.nodes.push(node),
        }
    }
}

impl PopoverRenderer for SvgRenderer {
    fn begin_popover(&mut self, frame: Rect, opacity: f64) {
        self.end_popover();
        self.open = Some(Group {
            transform: format!("translate({},{})", fmt_num(frame.x), fmt_num(frame.y)),
            opacity: fmt_num(opacity),
            children: Vec::new(),
        });
    }

    fn fill_outline(&mut self, outline: &Outline, color: &Color) {
        self.push(SvgNode::Path {
            d: outline.to_string(),
            fill: color.to_string(),
            stroke: None,
        });
    }

    fn stroke_outline(&mut self, outline: &Outline, color: &Color, width: f64) {
        self.push(SvgNode::Path {
            d: outline.to_string(),
            fill: "none".to_string(),
            stroke: Some((color.to_string(), fmt_num(width))),
        });
    }

    fn draw_text(&mut self, text: &str, frame: Rect, font: &Font, color: &Color) {
        let line_height = self.measurer.line_height(font);
        let spans = self
            .measurer
            .wrap_lines(text, font, frame.width)
            .into_iter()
            .enumerate()
            .map(|(i, line)| TextSpan {
                x: fmt_num(frame.x),
                // baseline sits one font size below the top of each line box
                y: fmt_num(frame.y + i as f64 * line_height + font.size),
                text: line,
            })
            .collect();

        self.push(SvgNode::Text {
            family: font.family.clone(),
            size: fmt_num(font.size),
            fill: color.to_string(),
            spans,
        });
    }

    fn end_popover(&mut self) {
        if let Some(group) = self.open.take() {
            self.nodes.push(SvgNode::Group(group));
        }
    }
}

fn svg_error(err: impl std::fmt::Display) -> PopoverError {
    PopoverError::Svg {
        message: err.to_string(),
    }
}

fn emit(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<(), PopoverError> {
    writer.write_event(event).map_err(svg_error)
}

fn into_string(writer: Writer<Vec<u8>>) -> Result<String, PopoverError> {
    String::from_utf8(writer.into_inner()).map_err(svg_error)
}

fn write_group(writer: &mut Writer<Vec<u8>>, group: &Group) -> Result<(), PopoverError> {
    let start = BytesStart::new("g").with_attributes([
        ("transform", group.transform.as_str()),
        ("opacity", group.opacity.as_str()),
    ]);
    emit(writer, Event::Start(start))?;
    for child in group.children.iter() {
        write_node(writer, child)?;
    }
    emit(writer, Event::End(BytesEnd::new("g")))
}

fn write_node(writer: &mut Writer<Vec<u8>>, node: &SvgNode) -> Result<(), PopoverError> {
    match node {
        SvgNode::Group(group) => write_group(writer, group),
        SvgNode::Path { d, fill, stroke } => {
            let mut path = BytesStart::new("path");
            path.push_attribute(("d", d.as_str()));
            path.push_attribute(("fill", fill.as_str()));
            if let Some((color, width)) = stroke {
                path.push_attribute(("stroke", color.as_str()));
                path.push_attribute(("stroke-width", width.as_str()));
            }
            emit(writer, Event::Empty(path))
        }
        SvgNode::Text {
            family,
            size,
            fill,
            spans,
        } => {
            let start = BytesStart::new("text").with_attributes([
                ("font-family", family.as_str()),
                ("font-size", size.as_str()),
                ("fill", fill.as_str()),
            ]);
            emit(writer, Event::Start(start))?;
            for span in spans {
                let tspan =
                    BytesStart::new("tspan").with_attributes([("x", span.x.as_str()), ("y", span.y.as_str())]);
                emit(writer, Event::Start(tspan))?;
                emit(writer, Event::Text(BytesText::new(&span.text)))?;
                emit(writer, Event::End(BytesEnd::new("tspan")))?;
            }
            emit(writer, Event::End(BytesEnd::new("text")))
        }
    }
}
