//! Element model shared by both parse paths and every analyzer.

use serde::Serialize;
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

/// Values longer than this are shortened in reports (never in comparisons).
pub const DISPLAY_VALUE_LIMIT: usize = 30;
/// Link targets are shortened to this many characters plus `...` in reports.
pub const DISPLAY_HREF_LIMIT: usize = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementTag {
    Path,
    Rect,
    Circle,
    Ellipse,
    Polygon,
    Polyline,
    Line,
    Image,
    Text,
    Group,
}

impl ElementTag {
    pub const ALL: [ElementTag; 10] = [
        ElementTag::Path,
        ElementTag::Rect,
        ElementTag::Circle,
        ElementTag::Ellipse,
        ElementTag::Polygon,
        ElementTag::Polyline,
        ElementTag::Line,
        ElementTag::Image,
        ElementTag::Text,
        ElementTag::Group,
    ];

    /// Classifies a tag name. A namespace prefix (`svg:path`) is stripped and the match is
    /// case-insensitive, so hand-edited `<PATH>` still counts.
    pub fn from_name(name: &str) -> Option<Self> {
        let local = name.rsplit(':').next().unwrap_or(name);
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(local))
    }

    /// SVG element name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Path => "path",
            Self::Rect => "rect",
            Self::Circle => "circle",
            Self::Ellipse => "ellipse",
            Self::Polygon => "polygon",
            Self::Polyline => "polyline",
            Self::Line => "line",
            Self::Image => "image",
            Self::Text => "text",
            Self::Group => "g",
        }
    }

    pub fn is_group(self) -> bool {
        self == Self::Group
    }
}

impl fmt::Display for ElementTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The fixed allow-list of presentation attributes, stored with their full literal values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PaintAttributes {
    pub fill: Option<String>,
    pub stroke: Option<String>,
    pub stroke_width: Option<String>,
    pub stroke_dasharray: Option<String>,
    pub fill_opacity: Option<String>,
    pub stroke_opacity: Option<String>,
    pub opacity: Option<String>,
    pub transform: Option<String>,
    pub id: Option<String>,
    pub href: Option<String>,
}

impl PaintAttributes {
    /// Slot for an allow-listed attribute name, `None` for anything else.
    ///
    /// `href` is matched with or without a namespace prefix (`xlink:href`).
    pub(crate) fn slot_mut(&mut self, name: &str) -> Option<&mut Option<String>> {
        let slot = match name {
            "fill" => &mut self.fill,
            "stroke" => &mut self.stroke,
            "stroke-width" => &mut self.stroke_width,
            "stroke-dasharray" => &mut self.stroke_dasharray,
            "fill-opacity" => &mut self.fill_opacity,
            "stroke-opacity" => &mut self.stroke_opacity,
            "opacity" => &mut self.opacity,
            "transform" => &mut self.transform,
            "id" => &mut self.id,
            _ if name == "href" || name.ends_with(":href") => &mut self.href,
            _ => return None,
        };
        Some(slot)
    }
}

/// One drawable or container node, in document order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Element {
    pub tag: ElementTag,
    /// Paint order: later elements render on top.
    pub order: usize,
    /// Number of enclosing groups.
    pub depth: usize,
    pub attributes: PaintAttributes,
    /// Full `d` text for paths.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path_data: Option<String>,
    pub path_data_length: Option<usize>,
    pub path_command_count: Option<usize>,
    pub points_count: Option<usize>,
    /// Attributes outside the allow-list (`x`, `mask`, `class`, ...), keyed by local name.
    pub extra: BTreeMap<String, String>,
}

impl Element {
    pub fn has_mask(&self) -> bool {
        self.extra.contains_key("mask")
    }

    pub fn has_clip(&self) -> bool {
        self.extra.contains_key("clip-path")
    }

    pub fn extra(&self, name: &str) -> Option<&str> {
        self.extra.get(name).map(String::as_str)
    }
}

/// Which parse path produced an element sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParsePath {
    /// Well-formed markup walked as a tree.
    Structural,
    /// Pattern scan over malformed (or forced) input.
    Resilient,
}

impl fmt::Display for ParsePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Structural => f.write_str("structural"),
            Self::Resilient => f.write_str("resilient"),
        }
    }
}

fn truncate_chars(value: &str, max_chars: usize) -> Option<&str> {
    value
        .char_indices()
        .nth(max_chars)
        .map(|(byte_idx, _)| &value[..byte_idx])
}

/// Attribute value as shown in reports: at most [`DISPLAY_VALUE_LIMIT`] characters.
pub fn display_value(value: &str) -> &str {
    truncate_chars(value, DISPLAY_VALUE_LIMIT).unwrap_or(value)
}

/// Link target as shown in reports: [`DISPLAY_HREF_LIMIT`] characters followed by `...`.
pub fn display_href(value: &str) -> Cow<'_, str> {
    match truncate_chars(value, DISPLAY_HREF_LIMIT) {
        Some(head) => Cow::Owned(format!("{head}...")),
        None => Cow::Borrowed(value),
    }
}
