//! Group nesting, transform usage, nested-vs-top-level distribution and vertical coverage.

use crate::header::ViewBox;
use crate::model::{Element, ElementTag};
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::OnceLock;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GroupNesting {
    pub group_count: usize,
    pub max_depth: usize,
    /// Nesting level (1 = outermost group) to number of groups opened at that level.
    pub groups_at_depth: BTreeMap<usize, usize>,
}

/// Nesting levels from the group elements' `depth`: a group under `d` groups opens level `d + 1`.
pub fn analyze_group_nesting(elements: &[Element]) -> GroupNesting {
    let mut nesting = GroupNesting::default();
    for el in elements.iter().filter(|e| e.tag.is_group()) {
        let level = el.depth + 1;
        nesting.group_count += 1;
        nesting.max_depth = nesting.max_depth.max(level);
        *nesting.groups_at_depth.entry(level).or_insert(0) += 1;
    }
    nesting
}

/// How many `transform` values mention each primitive. One value may count several times.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TransformUsage {
    pub matrix: usize,
    pub translate: usize,
    pub scale: usize,
    pub rotate: usize,
    pub skew: usize,
}

impl TransformUsage {
    pub fn entries(&self) -> [(&'static str, usize); 5] {
        [
            ("matrix", self.matrix),
            ("translate", self.translate),
            ("scale", self.scale),
            ("rotate", self.rotate),
            ("skew", self.skew),
        ]
    }

    fn record(&mut self, transform: &str) {
        for (needle, slot) in [
            ("matrix", &mut self.matrix),
            ("translate", &mut self.translate),
            ("scale", &mut self.scale),
            ("rotate", &mut self.rotate),
            ("skew", &mut self.skew),
        ] {
            if transform.contains(needle) {
                *slot += 1;
            }
        }
    }
}

pub fn analyze_transforms(elements: &[Element]) -> TransformUsage {
    let mut usage = TransformUsage::default();
    for t in elements.iter().filter_map(|e| e.attributes.transform.as_deref()) {
        usage.record(t);
    }
    usage
}

/// A group carrying a `transform`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransformedGroup {
    pub order: usize,
    pub depth: usize,
    pub transform: String,
}

pub fn transformed_groups(elements: &[Element]) -> Vec<TransformedGroup> {
    elements
        .iter()
        .filter(|e| e.tag.is_group())
        .filter_map(|e| {
            Some(TransformedGroup {
                order: e.order,
                depth: e.depth,
                transform: e.attributes.transform.clone()?,
            })
        })
        .collect()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Placement {
    pub nested: usize,
    pub top_level: usize,
}

impl Placement {
    pub fn total(&self) -> usize {
        self.nested + self.top_level
    }

    fn add(&mut self, depth: usize) {
        if depth > 0 {
            self.nested += 1;
        } else {
            self.top_level += 1;
        }
    }
}

/// Drawable elements inside at least one group versus at the top level. Groups are not counted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Distribution {
    pub overall: Placement,
    pub by_tag: BTreeMap<ElementTag, Placement>,
}

impl Distribution {
    /// Share of drawables nested in groups, in percent; `None` without drawables.
    pub fn nested_percent(&self) -> Option<f64> {
        let total = self.overall.total();
        (total > 0).then(|| self.overall.nested as f64 * 100.0 / total as f64)
    }
}

pub fn analyze_distribution(elements: &[Element]) -> Distribution {
    let mut dist = Distribution::default();
    for el in elements.iter().filter(|e| !e.tag.is_group()) {
        dist.overall.add(el.depth);
        dist.by_tag.entry(el.tag).or_default().add(el.depth);
    }
    dist
}

/// Vertical extent of path geometry, from the coordinate pairs following `M`/`L` commands.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VerticalCoverage {
    pub min_y: f64,
    pub max_y: f64,
    pub y_range: f64,
    /// `y_range` as a percentage of the viewBox height, when a usable viewBox exists.
    pub view_box_percent: Option<f64>,
}

fn re_move_line_pair() -> &'static Regex {
    static ONCE: OnceLock<Regex> = OnceLock::new();
    ONCE.get_or_init(|| Regex::new(r"(?i)[ML]\s*([-\d.]+)[\s,]+([-\d.]+)").unwrap())
}

/// `None` when no path yields a parseable Y coordinate.
pub fn analyze_vertical_coverage(
    elements: &[Element],
    view_box: Option<&ViewBox>,
) -> Option<VerticalCoverage> {
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    let data = elements.iter().filter_map(|e| e.path_data.as_deref());
    for d in data {
        for caps in re_move_line_pair().captures_iter(d) {
            if let Ok(y) = caps[2].parse::<f64>() {
                min_y = min_y.min(y);
                max_y = max_y.max(y);
            }
        }
    }
    if !min_y.is_finite() || !max_y.is_finite() {
        return None;
    }

    let y_range = max_y - min_y;
    let view_box_percent = view_box
        .map(|vb| vb.height)
        .filter(|h| *h > 0.0)
        .map(|h| y_range / h * 100.0);
    Some(VerticalCoverage {
        min_y,
        max_y,
        y_range,
        view_box_percent,
    })
}
