mod report;

use serde::Serialize;
use std::io::IsTerminal;
use svgscope::{AnalysisOptions, ComparisonReport, DocumentAnalysis, analyze_file, compare_documents};
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Svg(svgscope::Error),
    Json(serde_json::Error),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Svg(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
        }
    }
}

impl From<svgscope::Error> for CliError {
    fn from(value: svgscope::Error) -> Self {
        Self::Svg(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Debug, Default)]
struct Args {
    inputs: Vec<String>,
    json: bool,
    pretty: bool,
    pair_window: Option<usize>,
    resilient: bool,
}

#[derive(Serialize)]
struct DocumentOut<'a> {
    file: &'a str,
    analysis: &'a DocumentAnalysis,
}

#[derive(Serialize)]
struct CompareOut<'a> {
    original: DocumentOut<'a>,
    roundtrip: DocumentOut<'a>,
    comparison: &'a ComparisonReport,
}

fn usage() -> &'static str {
    "svgscope\n\
\n\
USAGE:\n\
  svgscope [--json [--pretty]] [--pair-window <n>] [--resilient] <file.svg>\n\
  svgscope [--json [--pretty]] [--pair-window <n>] [--resilient] <original.svg> <roundtrip.svg>\n\
\n\
DIAGNOSES:\n\
  - stroke width issues (too thick relative to the canvas)\n\
  - layering/z-order problems (background covering content)\n\
  - fill + stroke path pairs (highlighter composites)\n\
  - group nesting, transforms, namespace prefixes, viewBox coverage\n\
\n\
NOTES:\n\
  - With two files, both are analyzed, then compared (original vs roundtrip).\n\
  - --resilient skips the XML parser and scans tag patterns directly.\n\
  - Set SVGSCOPE_LOG (e.g. `debug`) to see diagnostics on stderr.\n\
"
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args::default();

    let mut it = argv.iter().skip(1);
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "--json" => args.json = true,
            "--pretty" => args.pretty = true,
            "--resilient" => args.resilient = true,
            "--pair-window" => {
                let Some(n) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.pair_window = Some(n.parse::<usize>().map_err(|_| CliError::Usage(usage()))?);
            }
            "--" => args.inputs.extend(it.by_ref().cloned()),
            other if other.starts_with('-') => return Err(CliError::Usage(usage())),
            path => args.inputs.push(path.to_string()),
        }
    }

    if args.inputs.is_empty() || args.inputs.len() > 2 {
        return Err(CliError::Usage(usage()));
    }
    Ok(args)
}

fn write_json(value: &impl Serialize, pretty: bool) -> Result<(), CliError> {
    if pretty {
        serde_json::to_writer_pretty(std::io::stdout().lock(), value)?;
    } else {
        serde_json::to_writer(std::io::stdout().lock(), value)?;
    }
    println!();
    Ok(())
}

fn run(args: Args) -> Result<(), CliError> {
    let mut options = AnalysisOptions::default();
    if let Some(n) = args.pair_window {
        options = options.with_pair_window(n);
    }
    if args.resilient {
        options = options.resilient();
    }

    let docs = args
        .inputs
        .iter()
        .map(|path| {
            tracing::debug!(file = %path, "analyzing");
            analyze_file(path, &options)
        })
        .collect::<Result<Vec<_>, _>>()?;

    match (args.inputs.as_slice(), docs.as_slice()) {
        ([path], [doc]) => {
            if args.json {
                write_json(&DocumentOut { file: path, analysis: doc }, args.pretty)?;
            } else {
                print!("{}", report::render_document(path, doc));
            }
        }
        ([left_path, right_path], [left, right]) => {
            let comparison = compare_documents(left, right);
            if args.json {
                let out = CompareOut {
                    original: DocumentOut {
                        file: left_path,
                        analysis: left,
                    },
                    roundtrip: DocumentOut {
                        file: right_path,
                        analysis: right,
                    },
                    comparison: &comparison,
                };
                write_json(&out, args.pretty)?;
            } else {
                println!("\n{}\nCOMPARING TWO SVG FILES\n{}", "=".repeat(60), "=".repeat(60));
                print!("{}", report::render_document(left_path, left));
                print!("{}", report::render_document(right_path, right));
                print!(
                    "{}",
                    report::render_comparison(left_path, right_path, &comparison)
                );
            }
        }
        _ => return Err(CliError::Usage(usage())),
    }
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("SVGSCOPE_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .try_init();
}

fn main() {
    init_tracing();

    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    if let Err(err) = run(args) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}
