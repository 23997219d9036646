use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("input file '{}' not found", .0.display())]
    InputNotFound(PathBuf),

    #[error("{name} must be 1 or greater (got {value})")]
    InvalidParameter { name: &'static str, value: i64 },

    #[error("no `{marker} = [ ... ]` list found in the document")]
    MissingMarker { marker: String },

    #[error("no topics to print")]
    NoTopics,

    #[error("font file '{}' not found", .0.display())]
    FontNotFound(PathBuf),

    #[error("font file '{}' could not be read: {source}", path.display())]
    FontUnreadable {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("font file '{}' is not a usable TrueType/OpenType font: {reason}", path.display())]
    FontInvalid { path: PathBuf, reason: String },

    #[error("could not read '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("could not write '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}
