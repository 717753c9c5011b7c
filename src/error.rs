//! Error types shared by every layer of the crate.

use std::fmt;
use std::num::ParseIntError;
use std::path::PathBuf;

use thiserror::Error;

use crate::model::LegacyMarkerType;

/// Errors produced by the annotation persistence core
#[derive(Error, Debug)]
pub enum Error {
    /// A line of a marker file could not be read. The whole read is aborted.
    #[error("{}line {line_number}: {cause} in line \"{line}\"", file_prefix(.file))]
    Parse {
        /// 1-based line number within the file
        line_number: usize,
        /// The offending line, verbatim
        line: String,
        /// File being read, when reading from disk
        file: Option<PathBuf>,
        #[source]
        cause: ParseCause,
    },

    #[error("unsupported file version {found}")]
    UnsupportedVersion { found: u32 },

    #[error("unknown ant kind \"{name}\"")]
    UnknownIdentityKind { name: String },

    #[error("legacy marker type {tag} has no current equivalent")]
    UnmappableLegacyType { tag: LegacyMarkerType },

    /// A frame image loader failed. Only surfaced by [`crate::FrameImageCache::try_get`].
    #[error("failed to load frame {index}")]
    LoadFailure {
        index: usize,
        #[source]
        source: std::io::Error,
    },

    #[error("could not {operation} {}", path.display())]
    Io {
        operation: IoOperation,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(
        "frame {requested} out of bounds: lowest allowed frame {first}, highest allowed frame {last}"
    )]
    FrameOutOfRange { first: u32, requested: u32, last: u32 },

    #[error("no JPEG frame images in {}", dir.display())]
    NoFrames { dir: PathBuf },

    #[error("file name \"{name}\" does not end in a frame number")]
    BadFrameName { name: String },

    #[error("invalid config {}: {message}", path.display())]
    Config { path: PathBuf, message: String },
}

pub type Result<T> = std::result::Result<T, Error>;

fn file_prefix(file: &Option<PathBuf>) -> String {
    file.as_ref()
        .map(|path| format!("{}: ", path.display()))
        .unwrap_or_default()
}

/// Why a single line was rejected
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ParseCause {
    #[error("line does not match any known record layout")]
    Unrecognized,

    #[error("unrecognized {field} \"{token}\"")]
    UnknownToken { field: &'static str, token: String },

    #[error("interaction fields must be all present or all empty")]
    PartialInteraction,

    #[error("expected the column header after the version line")]
    MissingColumnHeader,

    #[error("number out of range")]
    Number(#[from] ParseIntError),

    #[error("unknown ant kind \"{0}\"")]
    Identity(String),

    #[error("legacy marker type {0} has no current equivalent")]
    Unmappable(LegacyMarkerType),
}

impl ParseCause {
    /// Attach line context, producing a [`Error::Parse`]
    pub(crate) fn at(self, line_number: usize, line: &str, file: Option<PathBuf>) -> Error {
        Error::Parse {
            line_number,
            line: line.to_string(),
            file,
            cause: self,
        }
    }
}

impl From<Error> for ParseCause {
    /// Folds lookup failures raised while decoding a line into a line-level cause
    fn from(err: Error) -> Self {
        match err {
            Error::UnknownIdentityKind { name } => Self::Identity(name),
            Error::UnmappableLegacyType { tag } => Self::Unmappable(tag),
            _ => Self::Unrecognized,
        }
    }
}

/// File operation that failed, for [`Error::Io`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoOperation {
    Open,
    Read,
    Create,
    Write,
    Replace,
    ListDirectory,
}

impl fmt::Display for IoOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self {
            Self::Open => "open",
            Self::Read => "read",
            Self::Create => "create",
            Self::Write => "write",
            Self::Replace => "replace",
            Self::ListDirectory => "list directory",
        };
        f.write_str(verb)
    }
}

impl Error {
    pub(crate) fn io(operation: IoOperation, path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| Self::Io {
            operation,
            path,
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_names_file_and_line() {
        let err = ParseCause::Unrecognized.at(4, "garbage", Some(PathBuf::from("/tmp/ants.csv")));
        let message = err.to_string();
        assert!(message.starts_with("/tmp/ants.csv: line 4:"));
        assert!(message.contains("\"garbage\""));
    }

    #[test]
    fn parse_error_without_file() {
        let err = ParseCause::PartialInteraction.at(3, "1,2,3", None);
        assert_eq!(
            err.to_string(),
            "line 3: interaction fields must be all present or all empty in line \"1,2,3\""
        );
    }

    #[test]
    fn lookup_errors_fold_into_causes() {
        let cause: ParseCause = Error::UnknownIdentityKind {
            name: "Drone".into(),
        }
        .into();
        assert_eq!(cause, ParseCause::Identity("Drone".into()));
    }

    #[test]
    fn io_error_message() {
        let err = Error::io(IoOperation::Replace, "/data/out.csv")(std::io::Error::other("denied"));
        assert_eq!(err.to_string(), "could not replace /data/out.csv");
    }
}
