//! Aggregate comparison of two analyzed documents (typically an original and its roundtrip).
//!
//! Only tag-keyed aggregates are compared; element `n` of one document is never aligned with
//! element `n` of the other.

use crate::analyze::{
    AnalysisOptions, BackgroundCandidate, DocumentAnalysis, LayerStats, StrokeAssessment,
    analyze_document,
};
use crate::header::ViewBox;
use crate::model::{Element, ElementTag, ParsePath};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Attribute value samples kept per side.
const SAMPLE_LIMIT: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentSummary {
    pub size_bytes: usize,
    pub element_count: usize,
    pub view_box: Option<ViewBox>,
    pub parse_path: ParsePath,
}

impl DocumentSummary {
    fn of(doc: &DocumentAnalysis) -> Self {
        Self {
            size_bytes: doc.size_bytes,
            element_count: doc.elements.len(),
            view_box: doc.header.view_box,
            parse_path: doc.parse_path,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TagCountDelta {
    pub tag: ElementTag,
    pub left: usize,
    pub right: usize,
    /// `right - left`.
    pub delta: i64,
}

/// Uses of one attribute across a document: how often it is set and which values occur.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AttributeUsage {
    pub uses: usize,
    pub distinct: BTreeSet<String>,
    /// First values in document order, for previews.
    pub samples: Vec<String>,
}

impl AttributeUsage {
    fn collect<'a>(values: impl Iterator<Item = &'a str>) -> Self {
        let mut usage = Self::default();
        for v in values {
            usage.uses += 1;
            usage.distinct.insert(v.to_string());
            if usage.samples.len() < SAMPLE_LIMIT {
                usage.samples.push(v.to_string());
            }
        }
        usage
    }
}

/// Set difference of the full values of one attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttributeDiff {
    pub attribute: &'static str,
    pub left: AttributeUsage,
    pub right: AttributeUsage,
    pub only_left: Vec<String>,
    pub only_right: Vec<String>,
}

impl AttributeDiff {
    fn between(
        attribute: &'static str,
        left: &DocumentAnalysis,
        right: &DocumentAnalysis,
        get: fn(&Element) -> Option<&str>,
    ) -> Self {
        let left = AttributeUsage::collect(left.elements.iter().filter_map(get));
        let right = AttributeUsage::collect(right.elements.iter().filter_map(get));
        let only_left = left.distinct.difference(&right.distinct).cloned().collect();
        let only_right = right.distinct.difference(&left.distinct).cloned().collect();
        Self {
            attribute,
            left,
            right,
            only_left,
            only_right,
        }
    }

    pub fn is_same_set(&self) -> bool {
        self.only_left.is_empty() && self.only_right.is_empty()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PairingSummary {
    pub pairs: usize,
    pub same_path_data: usize,
    pub highlight_composites: usize,
}

impl PairingSummary {
    fn of(doc: &DocumentAnalysis) -> Self {
        Self {
            pairs: doc.path_pairs.len(),
            same_path_data: doc.path_pairs.iter().filter(|p| p.same_path_data).count(),
            highlight_composites: doc
                .path_pairs
                .iter()
                .filter(|p| p.is_highlight_composite())
                .count(),
        }
    }
}

/// A value per side of the comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sides<T> {
    pub left: T,
    pub right: T,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonReport {
    pub summary: Sides<DocumentSummary>,
    pub tag_counts: Vec<TagCountDelta>,
    pub fills: AttributeDiff,
    pub strokes: AttributeDiff,
    pub dash_arrays: AttributeDiff,
    pub thick_strokes: Sides<Vec<StrokeAssessment>>,
    pub backgrounds: Sides<Vec<BackgroundCandidate>>,
    pub layering: Sides<Vec<LayerStats>>,
    pub pairing: Sides<PairingSummary>,
}

impl ComparisonReport {
    pub fn element_count_delta(&self) -> i64 {
        signed_delta(
            self.summary.left.element_count,
            self.summary.right.element_count,
        )
    }

    pub fn size_delta(&self) -> i64 {
        signed_delta(self.summary.left.size_bytes, self.summary.right.size_bytes)
    }

    pub fn tag_delta(&self, tag: ElementTag) -> i64 {
        self.tag_counts
            .iter()
            .find(|t| t.tag == tag)
            .map_or(0, |t| t.delta)
    }
}

fn signed_delta(left: usize, right: usize) -> i64 {
    let as_i64 = |v: usize| i64::try_from(v).unwrap_or(i64::MAX);
    as_i64(right) - as_i64(left)
}

fn tag_counts(doc: &DocumentAnalysis) -> BTreeMap<&'static str, (ElementTag, usize)> {
    let mut counts: BTreeMap<&'static str, (ElementTag, usize)> = BTreeMap::new();
    for el in &doc.elements {
        counts.entry(el.tag.as_str()).or_insert((el.tag, 0)).1 += 1;
    }
    counts
}

/// Compares two analyses. Tags present in either document are listed, sorted by tag name.
pub fn compare_documents(left: &DocumentAnalysis, right: &DocumentAnalysis) -> ComparisonReport {
    let left_counts = tag_counts(left);
    let right_counts = tag_counts(right);
    let names: BTreeSet<&'static str> = left_counts
        .keys()
        .chain(right_counts.keys())
        .copied()
        .collect();

    let tag_counts = names
        .into_iter()
        .filter_map(|name| {
            let l = left_counts.get(name);
            let r = right_counts.get(name);
            let tag = l.or(r)?.0;
            let left = l.map_or(0, |c| c.1);
            let right = r.map_or(0, |c| c.1);
            Some(TagCountDelta {
                tag,
                left,
                right,
                delta: signed_delta(left, right),
            })
        })
        .collect();

    let thick = |doc: &DocumentAnalysis| doc.thick_strokes().cloned().collect::<Vec<_>>();

    ComparisonReport {
        summary: Sides {
            left: DocumentSummary::of(left),
            right: DocumentSummary::of(right),
        },
        tag_counts,
        fills: AttributeDiff::between("fill", left, right, |e| e.attributes.fill.as_deref()),
        strokes: AttributeDiff::between("stroke", left, right, |e| {
            e.attributes.stroke.as_deref()
        }),
        dash_arrays: AttributeDiff::between("stroke-dasharray", left, right, |e| {
            e.attributes.stroke_dasharray.as_deref()
        }),
        thick_strokes: Sides {
            left: thick(left),
            right: thick(right),
        },
        backgrounds: Sides {
            left: left.backgrounds.clone(),
            right: right.backgrounds.clone(),
        },
        layering: Sides {
            left: left.layering.clone(),
            right: right.layering.clone(),
        },
        pairing: Sides {
            left: PairingSummary::of(left),
            right: PairingSummary::of(right),
        },
    }
}

/// Analyzes both texts independently, then compares them.
pub fn compare_texts(left: &str, right: &str, options: &AnalysisOptions) -> ComparisonReport {
    let left = analyze_document(left, options);
    let right = analyze_document(right, options);
    compare_documents(&left, &right)
}
