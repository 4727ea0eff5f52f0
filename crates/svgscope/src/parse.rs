//! Document parser: a structural (tree) walk with a resilient pattern-scan fallback.

use crate::extract::extract_element;
use crate::model::{Element, ElementTag, ParsePath};
use regex::Regex;
use std::sync::OnceLock;

/// Ordered element sequence plus the parse path that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedElements {
    pub path: ParsePath,
    pub elements: Vec<Element>,
}

/// Parses `svg` into an ordered element sequence.
///
/// Well-formed markup is walked as a tree. Anything `roxmltree` rejects is handed to the
/// resilient scanner instead; that failure is logged, never returned. Input without any
/// recognized element yields an empty sequence.
pub fn parse_elements(svg: &str) -> ParsedElements {
    match parse_structural(svg) {
        Ok(elements) => ParsedElements {
            path: ParsePath::Structural,
            elements,
        },
        Err(err) => {
            tracing::debug!(error = %err, "structural parse failed; using resilient scan");
            ParsedElements {
                path: ParsePath::Resilient,
                elements: parse_resilient(svg),
            }
        }
    }
}

/// Tree walk over well-formed markup: depth-first, pre-order.
pub fn parse_structural(svg: &str) -> Result<Vec<Element>, roxmltree::Error> {
    let doc = roxmltree::Document::parse_with_options(
        svg,
        roxmltree::ParsingOptions {
            allow_dtd: true,
            ..roxmltree::ParsingOptions::default()
        },
    )?;

    let mut elements: Vec<Element> = Vec::new();
    walk(doc.root_element(), 0, &mut elements);
    Ok(elements)
}

fn walk(node: roxmltree::Node<'_, '_>, depth: usize, out: &mut Vec<Element>) {
    let tag = ElementTag::from_name(node.tag_name().name());
    if let Some(tag) = tag {
        let order = out.len();
        let attrs = node.attributes().map(|a| (a.name(), a.value()));
        out.push(extract_element(tag, order, depth, attrs));
    }

    let child_depth = if tag.is_some_and(ElementTag::is_group) {
        depth + 1
    } else {
        depth
    };
    for child in node.children().filter(|c| c.is_element()) {
        walk(child, child_depth, out);
    }
}

fn re_markup() -> &'static Regex {
    static ONCE: OnceLock<Regex> = OnceLock::new();
    ONCE.get_or_init(|| {
        Regex::new(concat!(
            r"<!--[\s\S]*?-->",
            r"|<!\[CDATA\[[\s\S]*?\]\]>",
            r"|</\s*(?P<close>[A-Za-z_][\w.:-]*)\s*>",
            r#"|<(?P<open>[A-Za-z_][\w.:-]*)(?P<attrs>(?:[^>"']|"[^"]*"|'[^']*')*)>"#,
            r"|<(?P<loose>[A-Za-z_][\w.:-]*)(?P<loose_attrs>[^>]*)>",
        ))
        .unwrap()
    })
}

fn re_attribute() -> &'static Regex {
    static ONCE: OnceLock<Regex> = OnceLock::new();
    ONCE.get_or_init(|| {
        Regex::new(r#"([A-Za-z_][\w.:-]*)\s*=\s*(?:"([^"]*)"|'([^']*)')"#).unwrap()
    })
}

/// `key="value"` / `key='value'` pairs of a raw attribute string, in source order.
pub(crate) fn scan_attributes(raw: &str) -> impl Iterator<Item = (&str, &str)> {
    re_attribute().captures_iter(raw).filter_map(|caps| {
        let name = caps.get(1)?.as_str();
        let value = caps.get(2).or_else(|| caps.get(3))?.as_str();
        Some((name, value))
    })
}

/// Pattern scan for malformed markup.
///
/// Opening tags of every recognized type are visited in one pass, merged by text position, so
/// `order` is the true document order across tag types. Group open/close tags move a running
/// depth counter; unbalanced closes never push it below zero. Comments and CDATA are skipped.
/// A tag with an unbalanced quote is still recorded; its attributes end at the first `>`.
pub fn parse_resilient(svg: &str) -> Vec<Element> {
    let mut elements: Vec<Element> = Vec::new();
    let mut depth = 0usize;

    for caps in re_markup().captures_iter(svg) {
        if let Some(close) = caps.name("close") {
            if ElementTag::from_name(close.as_str()).is_some_and(ElementTag::is_group) {
                depth = depth.saturating_sub(1);
            }
            continue;
        }
        // An unbalanced quote defeats the quote-aware form; such a tag ends at the first `>`.
        let (open, attrs) = match (caps.name("open"), caps.name("loose")) {
            (Some(open), _) => (open, caps.name("attrs")),
            (None, Some(loose)) => (loose, caps.name("loose_attrs")),
            (None, None) => continue,
        };
        let Some(tag) = ElementTag::from_name(open.as_str()) else {
            continue;
        };

        let raw_attrs = attrs.map(|m| m.as_str()).unwrap_or_default();
        let self_closing = raw_attrs.trim_end().ends_with('/');
        let order = elements.len();
        elements.push(extract_element(
            tag,
            order,
            depth,
            scan_attributes(raw_attrs),
        ));

        if tag.is_group() && !self_closing {
            depth += 1;
        }
    }

    elements
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structural_walk_assigns_order_and_group_depth() {
        let svg = r##"<svg xmlns="http://www.w3.org/2000/svg">
  <rect fill="#fff"/>
  <g transform="translate(1 2)">
    <path d="M0 0L1 1"/>
    <g><circle r="2"/></g>
  </g>
  <text>hi</text>
</svg>"##;
        let parsed = parse_elements(svg);
        assert_eq!(parsed.path, ParsePath::Structural);
        let summary: Vec<(ElementTag, usize, usize)> = parsed
            .elements
            .iter()
            .map(|e| (e.tag, e.order, e.depth))
            .collect();
        assert_eq!(
            summary,
            vec![
                (ElementTag::Rect, 0, 0),
                (ElementTag::Group, 1, 0),
                (ElementTag::Path, 2, 1),
                (ElementTag::Group, 3, 1),
                (ElementTag::Circle, 4, 2),
                (ElementTag::Text, 5, 0),
            ]
        );
    }

    #[test]
    fn structural_walk_reads_xlink_href() {
        let svg = r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink">
<image xlink:href="bg.png" width="10" height="10"/></svg>"#;
        let parsed = parse_elements(svg);
        assert_eq!(parsed.path, ParsePath::Structural);
        assert_eq!(
            parsed.elements[0].attributes.href.as_deref(),
            Some("bg.png")
        );
    }

    #[test]
    fn malformed_input_falls_back_to_resilient_scan() {
        // Unclosed <g> and an undeclared prefix: not well-formed.
        let svg = r##"<svg viewBox="0 0 10 10">
<svg:rect fill='red' width="10"/>
<g transform="scale(2)">
  <path d="M0 0 L5 5" fill="#ff7d2e" opacity=".03">
  <PATH d="M0 0 L5 5" stroke="#000" stroke-width="2"/>
"##;
        let parsed = parse_elements(svg);
        assert_eq!(parsed.path, ParsePath::Resilient);
        let tags: Vec<ElementTag> = parsed.elements.iter().map(|e| e.tag).collect();
        assert_eq!(
            tags,
            vec![
                ElementTag::Rect,
                ElementTag::Group,
                ElementTag::Path,
                ElementTag::Path
            ]
        );
        assert_eq!(parsed.elements[0].attributes.fill.as_deref(), Some("red"));
        assert_eq!(parsed.elements[2].depth, 1);
        assert_eq!(parsed.elements[2].attributes.opacity.as_deref(), Some(".03"));
        assert_eq!(parsed.elements[2].attributes.fill_opacity, None);
        assert_eq!(parsed.elements[3].path_data.as_deref(), Some("M0 0 L5 5"));
    }

    #[test]
    fn resilient_scan_tracks_group_closes_and_skips_comments() {
        let svg = r#"<svg><g><g/><!-- <rect/> --><line x1="0"/></g><ellipse rx="1"/>"#;
        let elements = parse_resilient(svg);
        let summary: Vec<(ElementTag, usize)> = elements.iter().map(|e| (e.tag, e.depth)).collect();
        assert_eq!(
            summary,
            vec![
                (ElementTag::Group, 0),
                (ElementTag::Group, 1),
                (ElementTag::Line, 1),
                (ElementTag::Ellipse, 0),
            ]
        );
    }

    #[test]
    fn quoted_angle_bracket_does_not_end_tag() {
        let elements = parse_resilient(r#"<svg><text id="a>b" fill="blue">x</text"#);
        assert_eq!(elements.len(), 1);
        assert_eq!(elements[0].attributes.id.as_deref(), Some("a>b"));
        assert_eq!(elements[0].attributes.fill.as_deref(), Some("blue"));
    }

    #[test]
    fn unbalanced_quote_keeps_the_element() {
        let svg = r#"<svg viewBox="0 0 10 10"><path d="M0 0 L1 1/><rect fill="red" width="10"/><circle r="1"/><g>"#;
        let elements = parse_resilient(svg);
        let tags: Vec<ElementTag> = elements.iter().map(|e| e.tag).collect();
        assert_eq!(
            tags,
            vec![
                ElementTag::Path,
                ElementTag::Rect,
                ElementTag::Circle,
                ElementTag::Group
            ]
        );
        let orders: Vec<usize> = elements.iter().map(|e| e.order).collect();
        assert_eq!(orders, vec![0, 1, 2, 3]);
        assert_eq!(elements[1].attributes.fill.as_deref(), Some("red"));
    }

    #[test]
    fn no_drawables_is_empty_not_error() {
        assert!(parse_elements("<svg xmlns=\"http://www.w3.org/2000/svg\"/>").elements.is_empty());
        assert!(parse_elements("not markup at all").elements.is_empty());
    }
}
