use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

/// Hard failures of the engine.
///
/// Everything wrong *inside* an SVG (malformed markup, non-numeric values, missing `viewBox`)
/// degrades to partial results instead; only reading the input can fail.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to read SVG file {}: {source}", path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
