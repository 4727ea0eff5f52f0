//! Stroke widths relative to the canvas.

use crate::header::ViewBox;
use crate::model::{Element, ElementTag};
use serde::Serialize;
use std::fmt;

/// Thresholds in percent of the canvas size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StrokeThresholds {
    pub default_canvas_size: f64,
    pub thick_percent: f64,
    pub very_thick_percent: f64,
}

impl Default for StrokeThresholds {
    fn default() -> Self {
        Self {
            default_canvas_size: 1000.0,
            thick_percent: 0.5,
            very_thick_percent: 1.0,
        }
    }
}

impl StrokeThresholds {
    /// `max(width, height)` of the viewBox; the default size when it is absent or degenerate.
    pub fn canvas_size(&self, view_box: Option<&ViewBox>) -> f64 {
        view_box
            .map(ViewBox::canvas_size)
            .filter(|s| *s > 0.0)
            .unwrap_or(self.default_canvas_size)
    }

    /// Both bounds are strict: exactly `thick_percent` is still normal.
    pub fn classify(&self, relative_percent: f64) -> StrokeClass {
        if relative_percent > self.very_thick_percent {
            StrokeClass::VeryThick
        } else if relative_percent > self.thick_percent {
            StrokeClass::Thick
        } else {
            StrokeClass::Normal
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StrokeClass {
    Normal,
    Thick,
    VeryThick,
}

impl StrokeClass {
    pub fn is_thick(self) -> bool {
        self != Self::Normal
    }
}

impl fmt::Display for StrokeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Normal => "NORMAL",
            Self::Thick => "THICK",
            Self::VeryThick => "VERY THICK",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrokeAssessment {
    pub tag: ElementTag,
    pub order: usize,
    pub stroke_width: f64,
    pub relative_percent: f64,
    pub class: StrokeClass,
}

/// Literal numeric stroke width; unit suffixes and non-finite values are not numbers here.
pub fn numeric_stroke_width(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Assesses every element with a numeric `stroke-width`. Non-numeric values are skipped.
pub fn assess_stroke_widths(
    elements: &[Element],
    view_box: Option<&ViewBox>,
    thresholds: &StrokeThresholds,
) -> Vec<StrokeAssessment> {
    let canvas = thresholds.canvas_size(view_box);
    elements
        .iter()
        .filter_map(|el| {
            let raw = el.attributes.stroke_width.as_deref()?;
            let Some(stroke_width) = numeric_stroke_width(raw) else {
                tracing::trace!(order = el.order, value = raw, "non-numeric stroke-width skipped");
                return None;
            };
            // Multiply first so widths landing exactly on a threshold stay exact.
            let relative_percent = stroke_width * 100.0 / canvas;
            Some(StrokeAssessment {
                tag: el.tag,
                order: el.order,
                stroke_width,
                relative_percent,
                class: thresholds.classify(relative_percent),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::extract_element;

    fn stroked(order: usize, width: &str) -> Element {
        extract_element(ElementTag::Path, order, 0, [("stroke-width", width)])
    }

    #[test]
    fn classification_boundaries_are_strict() {
        let t = StrokeThresholds::default();
        let elements = vec![stroked(0, "5"), stroked(1, "10"), stroked(2, "10.5"), stroked(3, "4")];
        let out = assess_stroke_widths(&elements, None, &t);
        let classes: Vec<StrokeClass> = out.iter().map(|a| a.class).collect();
        assert_eq!(
            classes,
            vec![
                StrokeClass::Normal,
                StrokeClass::Thick,
                StrokeClass::VeryThick,
                StrokeClass::Normal
            ]
        );
        assert_eq!(out[0].relative_percent, 0.5);
        assert_eq!(out[1].relative_percent, 1.0);
    }

    #[test]
    fn view_box_sets_canvas_size() {
        let vb = ViewBox::parse("0 0 100 100");
        let out = assess_stroke_widths(&[stroked(0, "2")], vb.as_ref(), &StrokeThresholds::default());
        assert_eq!(out[0].relative_percent, 2.0);
        assert_eq!(out[0].class, StrokeClass::VeryThick);
        assert_eq!(out[0].class.to_string(), "VERY THICK");
    }

    #[test]
    fn non_numeric_widths_are_skipped() {
        let elements = vec![stroked(0, "2px"), stroked(1, "inherit"), stroked(2, " 1 ")];
        let out = assess_stroke_widths(&elements, None, &StrokeThresholds::default());
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].order, 2);
    }

    #[test]
    fn degenerate_view_box_uses_default_canvas() {
        let vb = ViewBox::parse("0 0 0 0");
        let t = StrokeThresholds::default();
        assert_eq!(t.canvas_size(vb.as_ref()), 1000.0);
    }
}
