//! Document-level facts read straight from the markup: root size, `viewBox`, namespace prefixes.

use crate::parse::scan_attributes;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeSet;
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ViewBox {
    pub min_x: f64,
    pub min_y: f64,
    pub width: f64,
    pub height: f64,
}

impl ViewBox {
    /// Parses `minX minY width height` (whitespace and/or comma separated).
    ///
    /// Returns `None` unless the first four tokens are all numbers.
    pub fn parse(value: &str) -> Option<Self> {
        let mut nums = value
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|t| !t.is_empty())
            .map(|t| t.parse::<f64>().ok().filter(|v| v.is_finite()));
        Some(Self {
            min_x: nums.next()??,
            min_y: nums.next()??,
            width: nums.next()??,
            height: nums.next()??,
        })
    }

    /// The larger side, used as the reference length for relative stroke widths.
    pub fn canvas_size(&self) -> f64 {
        self.width.max(self.height)
    }
}

/// Attributes of the root `<svg>` tag.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SvgHeader {
    pub width: Option<String>,
    pub height: Option<String>,
    pub view_box: Option<ViewBox>,
}

fn re_svg_open() -> &'static Regex {
    static ONCE: OnceLock<Regex> = OnceLock::new();
    ONCE.get_or_init(|| {
        Regex::new(r#"(?i)<(?:[a-z_][\w.-]*:)?svg((?:[\s/](?:[^>"']|"[^"]*"|'[^']*')*)?)>"#).unwrap()
    })
}

/// Reads width/height/viewBox from the first `<svg>` opening tag. Works on malformed input.
pub fn read_header(text: &str) -> SvgHeader {
    let Some(caps) = re_svg_open().captures(text) else {
        return SvgHeader::default();
    };
    let attrs = caps.get(1).map(|m| m.as_str()).unwrap_or_default();

    let mut header = SvgHeader::default();
    for (name, value) in scan_attributes(attrs) {
        match name {
            "width" if header.width.is_none() => header.width = Some(value.to_string()),
            "height" if header.height.is_none() => header.height = Some(value.to_string()),
            "viewBox" if header.view_box.is_none() => header.view_box = ViewBox::parse(value),
            _ => {}
        }
    }
    header
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamespaceDecl {
    pub prefix: String,
    pub uri: String,
}

/// Namespace prefixes used on element tags. Some renderers drop `<svg:path>`-style elements.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NamespaceReport {
    pub declared: Vec<NamespaceDecl>,
    pub prefixed_element_count: usize,
    pub unique_prefixes: Vec<String>,
}

impl NamespaceReport {
    pub fn has_prefixed_elements(&self) -> bool {
        self.prefixed_element_count > 0
    }
}

fn re_xmlns_decl() -> &'static Regex {
    static ONCE: OnceLock<Regex> = OnceLock::new();
    ONCE.get_or_init(|| Regex::new(r#"xmlns:([\w.-]+)\s*=\s*(?:"([^"]*)"|'([^']*)')"#).unwrap())
}

fn re_prefixed_tag() -> &'static Regex {
    static ONCE: OnceLock<Regex> = OnceLock::new();
    ONCE.get_or_init(|| Regex::new(r"<([A-Za-z_][\w.-]*):[A-Za-z_]").unwrap())
}

pub fn check_namespaces(text: &str) -> NamespaceReport {
    let declared = re_xmlns_decl()
        .captures_iter(text)
        .map(|caps| NamespaceDecl {
            prefix: caps[1].to_string(),
            uri: caps
                .get(2)
                .or_else(|| caps.get(3))
                .map(|m| m.as_str().to_string())
                .unwrap_or_default(),
        })
        .collect();

    let mut prefixed_element_count = 0usize;
    let mut prefixes: BTreeSet<String> = BTreeSet::new();
    for caps in re_prefixed_tag().captures_iter(text) {
        prefixed_element_count += 1;
        prefixes.insert(caps[1].to_string());
    }

    NamespaceReport {
        declared,
        prefixed_element_count,
        unique_prefixes: prefixes.into_iter().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn view_box_accepts_commas_and_rejects_short_values() {
        let vb = ViewBox::parse("0,0, 800 600").expect("viewBox");
        assert_eq!((vb.width, vb.height), (800.0, 600.0));
        assert_eq!(vb.canvas_size(), 800.0);
        assert_eq!(ViewBox::parse("0 0 100"), None);
        assert_eq!(ViewBox::parse("0 0 wide 100"), None);
    }

    #[test]
    fn header_comes_from_root_tag_not_from_stroke_width() {
        let svg = r#"<?xml version="1.0"?>
<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 200 100" width="200px" height="100px">
  <path stroke-width="3" d="M0 0"/>
</svg>"#;
        let header = read_header(svg);
        assert_eq!(header.width.as_deref(), Some("200px"));
        assert_eq!(header.height.as_deref(), Some("100px"));
        assert_eq!(header.view_box.map(|v| v.height), Some(100.0));
    }

    #[test]
    fn prefixed_drawable_before_root_is_not_the_header() {
        let svg = r#"<svg:path d="M0 0"/><svg viewBox="0 0 100 100" width="100"><path d="M0 0"/></svg>"#;
        let header = read_header(svg);
        assert_eq!(header.width.as_deref(), Some("100"));
        assert_eq!(header.view_box.map(|v| v.width), Some(100.0));

        let prefixed_root = read_header(r#"<svg:svg viewBox="0 0 40 20"/>"#);
        assert_eq!(prefixed_root.view_box.map(|v| v.width), Some(40.0));
    }

    #[test]
    fn header_missing_attributes_stay_unset() {
        let header = read_header("<svg><rect/></svg>");
        assert_eq!(header, SvgHeader::default());
    }

    #[test]
    fn namespace_prefixes_are_counted() {
        let svg = r#"<svg:svg xmlns:svg="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink">
<svg:g><svg:path d="M0 0"/></svg:g><svg:image xlink:href="a.png"/></svg:svg>"#;
        let ns = check_namespaces(svg);
        assert_eq!(ns.prefixed_element_count, 4);
        assert_eq!(ns.unique_prefixes, vec!["svg".to_string()]);
        assert_eq!(ns.declared.len(), 2);
        assert_eq!(ns.declared[1].prefix, "xlink");
        assert!(ns.has_prefixed_elements());
    }
}
