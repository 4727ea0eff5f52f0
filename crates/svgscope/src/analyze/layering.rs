//! Z-order statistics and early opaque coverage.

use crate::model::{Element, ElementTag};
use indexmap::IndexMap;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayerStats {
    pub tag: ElementTag,
    pub count: usize,
    pub first_order: usize,
    pub last_order: usize,
}

impl LayerStats {
    pub fn range_label(&self) -> String {
        format!("positions {}-{}", self.first_order, self.last_order)
    }
}

/// Per-tag order statistics, sorted by first appearance.
pub fn analyze_layering(elements: &[Element]) -> Vec<LayerStats> {
    let mut by_tag: IndexMap<ElementTag, LayerStats> = IndexMap::new();
    for el in elements {
        by_tag
            .entry(el.tag)
            .and_modify(|s| {
                s.count += 1;
                s.first_order = s.first_order.min(el.order);
                s.last_order = s.last_order.max(el.order);
            })
            .or_insert(LayerStats {
                tag: el.tag,
                count: 1,
                first_order: el.order,
                last_order: el.order,
            });
    }

    let mut stats: Vec<LayerStats> = by_tag.into_values().collect();
    stats.sort_by_key(|s| s.first_order);
    stats
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BackgroundKind {
    FilledRect,
    Image,
}

/// An early element that paints opaque coverage under everything after it.
///
/// Informational only: later document order paints on top, so this is not an error by itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BackgroundCandidate {
    pub order: usize,
    pub tag: ElementTag,
    pub kind: BackgroundKind,
    pub fill: Option<String>,
}

impl BackgroundCandidate {
    pub fn issue(&self) -> &'static str {
        match self.kind {
            BackgroundKind::FilledRect => "Filled rect early in document - may cover content",
            BackgroundKind::Image => "Image early in document - may cover content if large",
        }
    }
}

fn is_visible_fill(fill: &str) -> bool {
    let fill = fill.trim();
    !fill.is_empty() && fill != "none" && fill != "transparent"
}

/// Filled rects and images among the first `window` elements.
pub fn find_background_candidates(elements: &[Element], window: usize) -> Vec<BackgroundCandidate> {
    elements
        .iter()
        .take(window)
        .filter_map(|el| match el.tag {
            ElementTag::Rect => {
                let fill = el.attributes.fill.as_deref().filter(|f| is_visible_fill(f))?;
                Some(BackgroundCandidate {
                    order: el.order,
                    tag: el.tag,
                    kind: BackgroundKind::FilledRect,
                    fill: Some(fill.to_string()),
                })
            }
            ElementTag::Image => Some(BackgroundCandidate {
                order: el.order,
                tag: el.tag,
                kind: BackgroundKind::Image,
                fill: None,
            }),
            _ => None,
        })
        .collect()
}
