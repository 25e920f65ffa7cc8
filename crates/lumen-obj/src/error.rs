use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failure to produce a [`Scene`](crate::Scene).
///
/// `path` is the source name handed to the reader: the file path for
/// [`load`](crate::load), or the caller's label for in-memory sources.
#[derive(Debug, Error)]
pub enum ObjError {
    /// The path does not carry the `.obj` extension. Nothing was opened.
    #[error("{}: not a `.obj` file", .path.display())]
    FormatMismatch { path: PathBuf },

    /// Opening or reading the source failed.
    #[error("{path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    /// A line could not be interpreted. `line` is 1-based.
    #[error("{path}:{line}: {fault} (`{content}`)")]
    MalformedRecord {
        path: String,
        line: usize,
        content: String,
        fault: RecordFault,
    },
}

impl ObjError {
    /// Line number of a malformed record, if this is one.
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::MalformedRecord { line, .. } => Some(*line),
            _ => None,
        }
    }
}

/// What was wrong with a single line.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RecordFault {
    #[error("`{directive}` needs at least {expected} values, found {found}")]
    MissingValues {
        directive: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("invalid number {0:?}")]
    InvalidNumber(String),

    #[error("number {0:?} is not finite")]
    NonFiniteNumber(String),

    #[error("invalid face vertex {0:?}")]
    InvalidIndex(String),

    #[error("{pool} index {index} is out of range ({len} declared so far)")]
    IndexOutOfRange { pool: Pool, index: i64, len: usize },

    #[error("face has {0} vertices, at least 3 are required")]
    TooFewVertices(usize),
}

/// The per-run attribute pools a face can index into.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Pool {
    Vertex,
    TexCoord,
    Normal,
}

impl fmt::Display for Pool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Pool::Vertex => "vertex",
            Pool::TexCoord => "texture coordinate",
            Pool::Normal => "normal",
        })
    }
}
