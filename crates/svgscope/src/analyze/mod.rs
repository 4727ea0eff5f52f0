//! Read-only heuristic passes over an element sequence, and the per-document pipeline.

pub mod layering;
pub mod nesting;
pub mod pairing;
pub mod stroke;

pub use layering::{BackgroundCandidate, BackgroundKind, LayerStats};
pub use nesting::{Distribution, GroupNesting, TransformUsage, TransformedGroup, VerticalCoverage};
pub use pairing::{PaintSignature, PathPair};
pub use stroke::{StrokeAssessment, StrokeClass, StrokeThresholds};

use crate::header::{NamespaceReport, SvgHeader, check_namespaces, read_header};
use crate::model::{Element, ElementTag, ParsePath};
use crate::parse::{parse_elements, parse_resilient};
use serde::Serialize;

/// Tunables of the analysis pipeline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalysisOptions {
    /// Paths considered as pair starts.
    pub pair_window: usize,
    /// Leading elements inspected for background coverage.
    pub background_window: usize,
    pub strokes: StrokeThresholds,
    /// Skip the structural parse and scan patterns directly.
    pub force_resilient: bool,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            pair_window: 20,
            background_window: 10,
            strokes: StrokeThresholds::default(),
            force_resilient: false,
        }
    }
}

impl AnalysisOptions {
    pub fn with_pair_window(mut self, pair_window: usize) -> Self {
        self.pair_window = pair_window;
        self
    }

    pub fn resilient(mut self) -> Self {
        self.force_resilient = true;
        self
    }
}

/// Everything the engine derives from one SVG text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentAnalysis {
    pub size_bytes: usize,
    pub header: SvgHeader,
    pub namespaces: NamespaceReport,
    pub parse_path: ParsePath,
    pub elements: Vec<Element>,
    pub layering: Vec<LayerStats>,
    pub backgrounds: Vec<BackgroundCandidate>,
    pub strokes: Vec<StrokeAssessment>,
    pub path_pairs: Vec<PathPair>,
    pub nesting: GroupNesting,
    pub transforms: TransformUsage,
    pub transformed_groups: Vec<TransformedGroup>,
    pub distribution: Distribution,
    pub vertical_coverage: Option<VerticalCoverage>,
}

impl DocumentAnalysis {
    pub fn thick_strokes(&self) -> impl Iterator<Item = &StrokeAssessment> {
        self.strokes.iter().filter(|s| s.class.is_thick())
    }

    pub fn count_of(&self, tag: ElementTag) -> usize {
        self.elements.iter().filter(|e| e.tag == tag).count()
    }

    pub fn images(&self) -> impl Iterator<Item = &Element> {
        self.elements.iter().filter(|e| e.tag == ElementTag::Image)
    }
}

/// Runs the parser and every analyzer over `svg`.
pub fn analyze_document(svg: &str, options: &AnalysisOptions) -> DocumentAnalysis {
    let (parse_path, elements) = if options.force_resilient {
        (ParsePath::Resilient, parse_resilient(svg))
    } else {
        let parsed = parse_elements(svg);
        (parsed.path, parsed.elements)
    };
    let header = read_header(svg);
    let view_box = header.view_box;

    let analysis = DocumentAnalysis {
        size_bytes: svg.len(),
        namespaces: check_namespaces(svg),
        parse_path,
        layering: layering::analyze_layering(&elements),
        backgrounds: layering::find_background_candidates(&elements, options.background_window),
        strokes: stroke::assess_stroke_widths(&elements, view_box.as_ref(), &options.strokes),
        path_pairs: pairing::find_path_pairs(&elements, options.pair_window),
        nesting: nesting::analyze_group_nesting(&elements),
        transforms: nesting::analyze_transforms(&elements),
        transformed_groups: nesting::transformed_groups(&elements),
        distribution: nesting::analyze_distribution(&elements),
        vertical_coverage: nesting::analyze_vertical_coverage(&elements, view_box.as_ref()),
        header,
        elements,
    };

    tracing::debug!(
        parse_path = %analysis.parse_path,
        elements = analysis.elements.len(),
        thick_strokes = analysis.thick_strokes().count(),
        backgrounds = analysis.backgrounds.len(),
        "analyzed svg document"
    );
    analysis
}
