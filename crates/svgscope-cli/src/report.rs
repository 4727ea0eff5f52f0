//! Human-readable reports. The layout is for people, not for parsers; use `--json` for that.

use std::fmt::Write as _;
use svgscope::analyze::nesting::Placement;
use svgscope::compare::{AttributeDiff, Sides};
use svgscope::{ComparisonReport, DocumentAnalysis, Element, display_href, display_value};

const RULE: &str = "============================================================";
const THICK_PREVIEW: usize = 10;
const GROUP_PREVIEW: usize = 5;
const FIRST_ELEMENTS: usize = 10;
const LAST_ELEMENTS: usize = 5;
const TRANSFORM_PREVIEW_CHARS: usize = 60;

fn signed(v: i64) -> String {
    if v > 0 { format!("+{v}") } else { v.to_string() }
}

fn or_unset(v: Option<&str>) -> &str {
    v.unwrap_or("NONE")
}

fn preview(value: &str, max_chars: usize) -> String {
    match value.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &value[..idx]),
        None => value.to_string(),
    }
}

/// `Order 3: <path> | fill=... | stroke=...` line used by the element listings.
fn element_line(el: &Element, detailed: bool) -> String {
    let a = &el.attributes;
    let mut parts = vec![format!("Order {}: <{}>", el.order, el.tag)];
    if let Some(v) = a.fill.as_deref() {
        parts.push(format!("fill={}", display_value(v)));
    }
    if let Some(v) = a.stroke.as_deref() {
        parts.push(format!("stroke={}", display_value(v)));
    }
    if let Some(v) = a.stroke_width.as_deref() {
        parts.push(format!("sw={}", display_value(v)));
    }
    if detailed {
        if let Some(v) = a.opacity.as_deref() {
            parts.push(format!("opacity={}", display_value(v)));
        }
        if let Some(len) = el.path_data_length {
            parts.push(format!("d_len={len}"));
        }
        if let Some(v) = a.href.as_deref() {
            parts.push(format!("href={}", display_href(v)));
        }
    }
    parts.join(" | ")
}

pub fn render_document(name: &str, doc: &DocumentAnalysis) -> String {
    let mut out = String::new();
    let _ = writeln!(&mut out, "\n{RULE}\nSVG DIAGNOSIS: {name}\n{RULE}");

    let _ = writeln!(
        &mut out,
        "\nFILE SIZE: {} bytes ({} KB)",
        doc.size_bytes,
        doc.size_bytes / 1024
    );

    let _ = writeln!(&mut out, "\nDIMENSIONS:");
    let _ = writeln!(&mut out, "   Width: {}", or_unset(doc.header.width.as_deref()));
    let _ = writeln!(&mut out, "   Height: {}", or_unset(doc.header.height.as_deref()));
    if let Some(vb) = doc.header.view_box {
        let _ = writeln!(
            &mut out,
            "   ViewBox: {} {} {} {}",
            vb.min_x, vb.min_y, vb.width, vb.height
        );
    }
    let _ = writeln!(&mut out, "\nPARSE: {}", doc.parse_path);

    let ns = &doc.namespaces;
    if ns.has_prefixed_elements() {
        let _ = writeln!(&mut out, "\nWARNING: NAMESPACE PREFIXES DETECTED:");
        let _ = writeln!(&mut out, "   Prefixed elements: {}", ns.prefixed_element_count);
        let _ = writeln!(&mut out, "   Prefixes used: {}", ns.unique_prefixes.join(", "));
        let _ = writeln!(
            &mut out,
            "   Note: Some browsers may not render prefixed elements correctly!"
        );
    }

    let _ = writeln!(&mut out, "\nELEMENTS FOUND: {}", doc.elements.len());

    let _ = writeln!(&mut out, "\nELEMENT LAYERING (z-order):");
    for s in &doc.layering {
        let _ = writeln!(&mut out, "   {}: {} elements, {}", s.tag, s.count, s.range_label());
    }

    if !doc.backgrounds.is_empty() {
        let _ = writeln!(&mut out, "\nWARNING: POTENTIAL BACKGROUND/LAYERING ISSUES:");
        for b in &doc.backgrounds {
            let _ = writeln!(&mut out, "   Order {}: {} - {}", b.order, b.tag, b.issue());
            if let Some(fill) = b.fill.as_deref() {
                let _ = writeln!(&mut out, "      Fill: {}", display_value(fill));
            }
        }
    }

    let thick: Vec<_> = doc.thick_strokes().collect();
    if !thick.is_empty() {
        let _ = writeln!(
            &mut out,
            "\nWARNING: THICK STROKE WIDTHS DETECTED ({} elements):",
            thick.len()
        );
        for s in thick.iter().take(THICK_PREVIEW) {
            let _ = writeln!(
                &mut out,
                "   Order {}: {} - width={} ({:.2}% of canvas, {})",
                s.order, s.tag, s.stroke_width, s.relative_percent, s.class
            );
        }
        if thick.len() > THICK_PREVIEW {
            let _ = writeln!(&mut out, "   ... and {} more", thick.len() - THICK_PREVIEW);
        }
    }

    write_structure(&mut out, doc);
    write_pairs(&mut out, doc);
    write_images(&mut out, doc);

    let _ = writeln!(&mut out, "\nFIRST {FIRST_ELEMENTS} ELEMENTS (in z-order):");
    for el in doc.elements.iter().take(FIRST_ELEMENTS) {
        let _ = writeln!(&mut out, "   {}", element_line(el, true));
    }
    if doc.elements.len() > FIRST_ELEMENTS {
        let _ = writeln!(&mut out, "\nLAST {LAST_ELEMENTS} ELEMENTS (top of z-order):");
        let skip = doc.elements.len() - LAST_ELEMENTS;
        for el in doc.elements.iter().skip(skip) {
            let _ = writeln!(&mut out, "   {}", element_line(el, false));
        }
    }

    out
}

fn write_structure(out: &mut String, doc: &DocumentAnalysis) {
    let nesting = &doc.nesting;
    let _ = writeln!(out, "\nGROUP NESTING:");
    let _ = writeln!(out, "   Groups: {}", nesting.group_count);
    let _ = writeln!(out, "   Max depth: {}", nesting.max_depth);
    let levels: Vec<String> = nesting
        .groups_at_depth
        .iter()
        .map(|(level, n)| format!("{level}: {n}"))
        .collect();
    let _ = writeln!(out, "   Groups at each depth: {{{}}}", levels.join(", "));

    let used: Vec<_> = doc
        .transforms
        .entries()
        .into_iter()
        .filter(|(_, n)| *n > 0)
        .collect();
    if !used.is_empty() {
        let _ = writeln!(out, "\nTRANSFORMS USED:");
        for (name, n) in used {
            let _ = writeln!(out, "   {name}: {n}");
        }
    }
    if !doc.transformed_groups.is_empty() {
        let _ = writeln!(
            out,
            "\nGROUPS WITH TRANSFORMS: {}",
            doc.transformed_groups.len()
        );
        for g in doc.transformed_groups.iter().take(GROUP_PREVIEW) {
            let _ = writeln!(
                out,
                "   transform: {}",
                preview(&g.transform, TRANSFORM_PREVIEW_CHARS)
            );
        }
    }

    let dist = &doc.distribution;
    let _ = writeln!(out, "\nELEMENT DISTRIBUTION:");
    let line = |label: &str, p: &Placement| {
        format!(
            "   {label}: {} (in groups: {}, top level: {})",
            p.total(),
            p.nested,
            p.top_level
        )
    };
    let _ = writeln!(out, "{}", line("Drawables", &dist.overall));
    if let Some(pct) = dist.nested_percent() {
        let _ = writeln!(out, "   Nested share: {pct:.1}%");
    }
    for (tag, p) in &dist.by_tag {
        let _ = writeln!(out, "{}", line(tag.as_str(), p));
    }

    if let Some(cov) = doc.vertical_coverage {
        let _ = writeln!(out, "\nY-COORDINATE RANGE:");
        let _ = writeln!(out, "   Min Y: {:.2}", cov.min_y);
        let _ = writeln!(out, "   Max Y: {:.2}", cov.max_y);
        let _ = writeln!(out, "   Range: {:.2}", cov.y_range);
        if let (Some(vb), Some(pct)) = (doc.header.view_box, cov.view_box_percent) {
            let _ = writeln!(out, "   ViewBox height: {}", vb.height);
            let _ = writeln!(out, "   Content covers: {pct:.1}% of viewBox height");
        }
    }
}

fn write_pairs(out: &mut String, doc: &DocumentAnalysis) {
    if doc.path_pairs.is_empty() {
        return;
    }
    let _ = writeln!(
        out,
        "\nPATH PAIR PATTERNS (checking if paths come in fill+stroke pairs):"
    );
    for p in &doc.path_pairs {
        let (a, b) = (&p.first, &p.second);
        let _ = writeln!(out, "\n   {}:", p.label());
        let _ = writeln!(out, "      Same path data: {}", p.same_path_data);
        let _ = writeln!(
            out,
            "      Path 1: fill={}, stroke={}, opacity={}, fill-opacity={}",
            or_unset(a.fill.as_deref()),
            or_unset(a.stroke.as_deref()),
            or_unset(a.opacity.as_deref()),
            or_unset(a.fill_opacity.as_deref())
        );
        let _ = writeln!(
            out,
            "      Path 2: fill={}, stroke={}, sw={}",
            or_unset(b.fill.as_deref()),
            or_unset(b.stroke.as_deref()),
            or_unset(b.stroke_width.as_deref())
        );
        if p.is_highlight_composite() {
            let _ = writeln!(out, "      Highlight composite: fill layer + stroke outline");
        }
    }
}

fn write_images(out: &mut String, doc: &DocumentAnalysis) {
    let images: Vec<&Element> = doc.images().collect();
    if images.is_empty() {
        return;
    }
    let _ = writeln!(out, "\nIMAGES ({}):", images.len());
    for (i, img) in images.iter().enumerate() {
        let attr = |name: &str| img.extra(name).unwrap_or("N/A").to_string();
        let _ = writeln!(out, "   Image {i} at order {}:", img.order);
        let _ = writeln!(out, "      x={}, y={}", attr("x"), attr("y"));
        let _ = writeln!(out, "      w={}, h={}", attr("width"), attr("height"));
        let _ = writeln!(out, "      mask={}", or_unset(img.extra("mask")));
        if let Some(href) = img.attributes.href.as_deref() {
            let _ = writeln!(out, "      href={}", display_href(href));
        }
    }
}

fn join_values<'a>(values: impl Iterator<Item = &'a String>) -> String {
    values
        .map(|v| display_value(v))
        .collect::<Vec<_>>()
        .join(", ")
}

fn write_attribute_diff(out: &mut String, label: &str, diff: &AttributeDiff) {
    let _ = writeln!(
        out,
        "\n{label} - Original: {}, Roundtrip: {}",
        diff.left.uses, diff.right.uses
    );
    let _ = writeln!(out, "  Orig unique: {{{}}}", join_values(diff.left.distinct.iter()));
    let _ = writeln!(out, "  RT unique: {{{}}}", join_values(diff.right.distinct.iter()));
    if !diff.only_left.is_empty() {
        let _ = writeln!(out, "  Only in original: {}", join_values(diff.only_left.iter()));
    }
    if !diff.only_right.is_empty() {
        let _ = writeln!(out, "  Only in roundtrip: {}", join_values(diff.only_right.iter()));
    }
}

fn write_sides<T>(out: &mut String, label: &str, sides: &Sides<Vec<T>>) {
    let _ = writeln!(
        out,
        "\n{label}: File1={}, File2={}",
        sides.left.len(),
        sides.right.len()
    );
}

pub fn render_comparison(left_name: &str, right_name: &str, report: &ComparisonReport) -> String {
    let mut out = String::new();
    let (l, r) = (&report.summary.left, &report.summary.right);
    let _ = writeln!(&mut out, "\n{RULE}\nCOMPARISON SUMMARY\n{RULE}");
    let _ = writeln!(&mut out, "\nOriginal: {left_name}");
    let _ = writeln!(&mut out, "Roundtrip: {right_name}");
    let _ = writeln!(
        &mut out,
        "\nFile 1: {} elements, {}KB ({})",
        l.element_count,
        l.size_bytes / 1024,
        l.parse_path
    );
    let _ = writeln!(
        &mut out,
        "File 2: {} elements, {}KB ({})",
        r.element_count,
        r.size_bytes / 1024,
        r.parse_path
    );
    let _ = writeln!(
        &mut out,
        "Element delta: {}, size delta: {} bytes",
        signed(report.element_count_delta()),
        signed(report.size_delta())
    );

    let _ = writeln!(&mut out, "\nELEMENT COUNTS:");
    let _ = writeln!(
        &mut out,
        "{:<12} {:>10} {:>10} {:>10}",
        "Tag", "Original", "Roundtrip", "Diff"
    );
    let _ = writeln!(&mut out, "{}", "-".repeat(44));
    for t in &report.tag_counts {
        let _ = writeln!(
            &mut out,
            "{:<12} {:>10} {:>10} {:>10}",
            t.tag.as_str(),
            t.left,
            t.right,
            signed(t.delta)
        );
    }

    let _ = writeln!(&mut out, "\nATTRIBUTE ANALYSIS:");
    write_attribute_diff(&mut out, "Fills", &report.fills);
    write_attribute_diff(&mut out, "Strokes", &report.strokes);
    let dash = &report.dash_arrays;
    let _ = writeln!(
        &mut out,
        "\nDash arrays - Original: {}, Roundtrip: {}",
        dash.left.uses, dash.right.uses
    );
    if !dash.left.samples.is_empty() {
        let _ = writeln!(&mut out, "  Orig: {:?}...", dash.left.samples);
    }
    if !dash.right.samples.is_empty() {
        let _ = writeln!(&mut out, "  RT: {:?}...", dash.right.samples);
    }

    write_sides(&mut out, "Thick strokes", &report.thick_strokes);
    write_sides(&mut out, "Background candidates", &report.backgrounds);

    let _ = writeln!(&mut out, "\nLAYERING:");
    for (label, stats) in [("File1", &report.layering.left), ("File2", &report.layering.right)] {
        let ranges: Vec<String> = stats
            .iter()
            .map(|s| format!("{} x{} @{}-{}", s.tag, s.count, s.first_order, s.last_order))
            .collect();
        let _ = writeln!(&mut out, "   {label}: {}", ranges.join(", "));
    }

    let (pl, pr) = (&report.pairing.left, &report.pairing.right);
    let _ = writeln!(
        &mut out,
        "\nPath pairs: File1={} (same data {}, highlight {}), File2={} (same data {}, highlight {})",
        pl.pairs,
        pl.same_path_data,
        pl.highlight_composites,
        pr.pairs,
        pr.same_path_data,
        pr.highlight_composites
    );

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use svgscope::{AnalysisOptions, analyze_document, compare_documents};

    const SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 100 100" width="100">
<image href="bg.png" x="0" y="0"/>
<g transform="translate(1 1)"><path d="M0 0 L10 10" fill="#ff0" opacity=".1"/>
<path d="M0 0 L10 10" fill="none" stroke="#000" stroke-width="2"/></g></svg>"##;

    #[test]
    fn document_report_lists_heuristics() {
        let doc = analyze_document(SVG, &AnalysisOptions::default());
        let text = render_document("a.svg", &doc);
        assert!(text.contains("SVG DIAGNOSIS: a.svg"));
        assert!(text.contains("Width: 100"));
        assert!(text.contains("Height: NONE"));
        assert!(text.contains("ViewBox: 0 0 100 100"));
        assert!(text.contains("Order 0: image - Image early in document"));
        assert!(text.contains("width=2 (2.00% of canvas, VERY THICK)"));
        assert!(text.contains("Groups at each depth: {1: 1}"));
        assert!(text.contains("translate: 1"));
        assert!(text.contains("Highlight composite"));
        assert!(text.contains("IMAGES (1):"));
        assert!(!text.contains("LAST 5 ELEMENTS"));
    }

    #[test]
    fn thick_preview_is_capped() {
        let mut svg = String::from(r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 10 10">"#);
        for _ in 0..13 {
            svg.push_str(r#"<line stroke-width="1"/>"#);
        }
        svg.push_str("</svg>");
        let doc = analyze_document(&svg, &AnalysisOptions::default());
        let text = render_document("lines.svg", &doc);
        assert!(text.contains("THICK STROKE WIDTHS DETECTED (13 elements)"));
        assert!(text.contains("... and 3 more"));
        assert!(text.contains("LAST 5 ELEMENTS (top of z-order):"));
        assert!(text.contains("Order 12: <line>"));
    }

    #[test]
    fn comparison_report_shows_signed_deltas() {
        let left = analyze_document(SVG, &AnalysisOptions::default());
        let right = analyze_document(
            r#"<svg xmlns="http://www.w3.org/2000/svg"><path d="M0 0" fill="red"/></svg>"#,
            &AnalysisOptions::default(),
        );
        let text = render_comparison("a.svg", "b.svg", &compare_documents(&left, &right));
        assert!(text.contains("COMPARISON SUMMARY"));
        assert!(text.contains(&format!("{:<12} {:>10} {:>10} {:>10}", "path", 2, 1, "-1")));
        assert!(text.contains(&format!("{:<12} {:>10} {:>10} {:>10}", "image", 1, 0, "-1")));
        assert!(text.contains("Only in roundtrip: red"));
        assert!(text.contains("Thick strokes: File1=1, File2=0"));
    }

    #[test]
    fn reports_are_deterministic() {
        let a = render_document("a.svg", &analyze_document(SVG, &AnalysisOptions::default()));
        let b = render_document("a.svg", &analyze_document(SVG, &AnalysisOptions::default()));
        assert_eq!(a, b);
    }
}
