//! Detection of geometry drawn twice: a translucent fill followed by a stroke-only outline.
//!
//! Detection only. Nothing here merges or rewrites elements.

use crate::model::{Element, ElementTag};
use serde::Serialize;

/// Paint-related attributes of one pair member.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PaintSignature {
    pub order: usize,
    pub fill: Option<String>,
    pub stroke: Option<String>,
    pub stroke_width: Option<String>,
    pub opacity: Option<String>,
    pub fill_opacity: Option<String>,
}

impl PaintSignature {
    fn of(el: &Element) -> Self {
        let a = &el.attributes;
        Self {
            order: el.order,
            fill: a.fill.clone(),
            stroke: a.stroke.clone(),
            stroke_width: a.stroke_width.clone(),
            opacity: a.opacity.clone(),
            fill_opacity: a.fill_opacity.clone(),
        }
    }

    fn paints_fill(&self) -> bool {
        self.fill
            .as_deref()
            .is_some_and(|f| !matches!(f.trim(), "" | "none" | "transparent"))
    }

    fn paints_stroke(&self) -> bool {
        self.stroke
            .as_deref()
            .is_some_and(|s| !matches!(s.trim(), "" | "none" | "transparent"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathPair {
    /// Index of the first member within the path subsequence.
    pub index: usize,
    pub same_path_data: bool,
    pub first: PaintSignature,
    pub second: PaintSignature,
}

impl PathPair {
    pub fn label(&self) -> String {
        format!("{} & {}", self.index, self.index + 1)
    }

    /// Same geometry, a visible fill first, then an outline without fill.
    pub fn is_highlight_composite(&self) -> bool {
        self.same_path_data
            && self.first.paints_fill()
            && self.second.paints_stroke()
            && !self.second.paints_fill()
    }
}

/// Byte equality of `d` when both members carry it, otherwise equal `d` lengths.
pub fn same_path_data(a: &Element, b: &Element) -> bool {
    match (a.path_data.as_deref(), b.path_data.as_deref()) {
        (Some(da), Some(db)) => da == db,
        _ => a.path_data_length == b.path_data_length,
    }
}

/// Pairs paths at consecutive indices (0&1, 2&3, ...) starting within the first `window` paths.
pub fn find_path_pairs(elements: &[Element], window: usize) -> Vec<PathPair> {
    let paths: Vec<&Element> = elements
        .iter()
        .filter(|e| e.tag == ElementTag::Path)
        .collect();

    (0..paths.len().min(window))
        .step_by(2)
        .filter(|i| i + 1 < paths.len())
        .map(|i| {
            let (a, b) = (paths[i], paths[i + 1]);
            PathPair {
                index: i,
                same_path_data: same_path_data(a, b),
                first: PaintSignature::of(a),
                second: PaintSignature::of(b),
            }
        })
        .collect()
}
