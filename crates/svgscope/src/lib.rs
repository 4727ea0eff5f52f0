#![forbid(unsafe_code)]

//! Structural extraction and heuristic diagnosis for SVG documents.
//!
//! The engine turns SVG text into an ordered element model (tag, paint attributes, z-order,
//! group depth) and runs read-only heuristics over it:
//! - layering / z-order statistics and early background coverage
//! - fill + stroke path pairs (the "highlighter" composite)
//! - stroke widths relative to the canvas
//! - group nesting, transforms and vertical coverage
//!
//! Two analyses can be compared with [`compare_documents`] to surface regressions between an
//! original SVG and a regenerated ("roundtrip") one. Malformed markup never fails: it is scanned
//! with a pattern-based fallback instead of the tree parser.

pub mod analyze;
pub mod compare;
pub mod error;
pub mod extract;
pub mod header;
pub mod model;
pub mod parse;

pub use analyze::{AnalysisOptions, DocumentAnalysis, analyze_document};
pub use compare::{ComparisonReport, compare_documents, compare_texts};
pub use error::{Error, Result};
pub use header::{NamespaceReport, SvgHeader, ViewBox};
pub use model::{Element, ElementTag, PaintAttributes, ParsePath, display_href, display_value};
pub use parse::{ParsedElements, parse_elements};

use std::path::Path;

/// Reads an SVG file as UTF-8 text.
pub fn read_svg(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    std::fs::read_to_string(path).map_err(|source| Error::FileAccess {
        path: path.to_path_buf(),
        source,
    })
}

/// [`read_svg`] followed by [`analyze_document`].
pub fn analyze_file(path: impl AsRef<Path>, options: &AnalysisOptions) -> Result<DocumentAnalysis> {
    let text = read_svg(path)?;
    Ok(analyze_document(&text, options))
}
