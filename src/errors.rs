//! Error types.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using the crate's `Error`.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The control socket could not be reached.
    #[error("failed to connect to {}: {source}", .path.display())]
    Connection {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Writing the command or reading the response failed mid-exchange.
    #[error("socket I/O failed: {0}")]
    Transport(#[source] io::Error),

    /// The response is not well-formed tabular data, or a row is too short.
    #[error("malformed response: {0}")]
    MalformedInput(String),

    /// The header cannot serve the requested record shape.
    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),

    /// A cell bound to an integer field is not a base-10 integer.
    #[error("invalid integer {value:?} for field `{field}` in row {row}")]
    Value {
        field: &'static str,
        /// Position of the row in the dataset; the header is row 0.
        row: usize,
        value: String,
    },
}

#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum SchemaError {
    /// No column names remain once the prefix and trailing columns are removed.
    #[error("header is empty after normalization")]
    EmptyHeader,

    /// The first header cell is shorter than the comment prefix it must carry.
    #[error("header cell {0:?} is missing its comment prefix")]
    MissingCommentPrefix(String),

    /// A field or selector is bound to a column the header does not contain.
    #[error("column `{0}` not found in header")]
    MissingColumn(String),

    /// A field or selector is bound to a column the header names more than once.
    #[error("column `{0}` appears more than once in header")]
    DuplicateColumn(String),
}

/// I/O on an established connection; failures to connect are built explicitly.
impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Transport(err)
    }
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        Error::MalformedInput(err.to_string())
    }
}
