//! Uniform element records from either parse path.

use crate::model::{Element, ElementTag, PaintAttributes};
use std::collections::BTreeMap;

fn is_path_command(c: char) -> bool {
    matches!(
        c.to_ascii_uppercase(),
        'M' | 'L' | 'H' | 'V' | 'C' | 'S' | 'Q' | 'T' | 'A' | 'Z'
    )
}

/// Number of path-command letters in a `d` value.
pub fn count_path_commands(d: &str) -> usize {
    d.chars().filter(|c| is_path_command(*c)).count()
}

/// Number of whitespace-separated tokens in a `points` value.
pub fn count_point_tokens(points: &str) -> usize {
    points.split_whitespace().count()
}

/// Builds an [`Element`] from raw `(name, value)` attribute pairs.
///
/// Allow-listed names fill [`PaintAttributes`]; `d` and `points` feed the numeric summaries;
/// everything else lands in `extra`. When an attribute repeats, the first occurrence wins.
pub fn extract_element<'a, I>(tag: ElementTag, order: usize, depth: usize, attrs: I) -> Element
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut attributes = PaintAttributes::default();
    let mut path_data: Option<&str> = None;
    let mut points: Option<&str> = None;
    let mut extra: BTreeMap<String, String> = BTreeMap::new();

    for (name, value) in attrs {
        if let Some(slot) = attributes.slot_mut(name) {
            if slot.is_none() {
                *slot = Some(value.to_string());
            }
            continue;
        }
        match name {
            "d" if tag == ElementTag::Path => {
                path_data.get_or_insert(value);
            }
            "points" if matches!(tag, ElementTag::Polygon | ElementTag::Polyline) => {
                points.get_or_insert(value);
            }
            _ => {
                extra
                    .entry(name.to_string())
                    .or_insert_with(|| value.to_string());
            }
        }
    }

    Element {
        tag,
        order,
        depth,
        attributes,
        path_data_length: path_data.map(|d| d.chars().count()),
        path_command_count: path_data.map(count_path_commands),
        path_data: path_data.map(str::to_string),
        points_count: points.map(count_point_tokens),
        extra,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_summaries_count_commands_case_insensitively() {
        let el = extract_element(
            ElementTag::Path,
            0,
            0,
            [("d", "M0 0 l10 10 H5 v2 c1 1 2 2 3 3 z"), ("fill", "#fff")],
        );
        assert_eq!(el.path_data_length, Some(32));
        assert_eq!(el.path_command_count, Some(6));
        assert_eq!(el.attributes.fill.as_deref(), Some("#fff"));
        assert!(el.extra.is_empty());
    }

    #[test]
    fn points_only_counted_for_poly_shapes() {
        let poly = extract_element(ElementTag::Polygon, 0, 0, [("points", "0,0 10,0 10,10")]);
        assert_eq!(poly.points_count, Some(3));

        let rect = extract_element(ElementTag::Rect, 1, 0, [("points", "0,0 1,1")]);
        assert_eq!(rect.points_count, None);
        assert_eq!(rect.extra("points"), Some("0,0 1,1"));
    }

    #[test]
    fn full_values_are_kept_and_extras_recorded() {
        let long_fill = "url(#a-really-long-gradient-identifier-name)";
        let el = extract_element(
            ElementTag::Image,
            3,
            2,
            [
                ("fill", long_fill),
                ("xlink:href", "data:image/png;base64,AAAA"),
                ("mask", "url(#m)"),
                ("x", "10"),
            ],
        );
        assert_eq!(el.attributes.fill.as_deref(), Some(long_fill));
        assert_eq!(
            el.attributes.href.as_deref(),
            Some("data:image/png;base64,AAAA")
        );
        assert!(el.has_mask());
        assert!(!el.has_clip());
        assert_eq!(el.extra("x"), Some("10"));
        assert_eq!((el.order, el.depth), (3, 2));
    }
}
