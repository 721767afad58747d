use std::path::PathBuf;

/// Fatal errors. Any of these aborts the conversion of the file (or run)
/// in which it occurs.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The AIML document is not well-formed XML.
    #[error("XML parse error: {0}")]
    Xml(#[from] xml::reader::Error),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{0} is not a directory")]
    NotADirectory(PathBuf),

    #[error("{0} exists but is not a directory")]
    OutputNotADirectory(PathBuf),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io { path: path.into(), source }
    }
}

/// Non-fatal diagnostics collected while converting a file. None of these
/// stop the run; they are reported once the file is done.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Warning {
    /// A `<random>` inside another `<random>`. The whole category is dropped.
    #[error("Embedded randoms in pattern '{pattern}'")]
    NestedRandom { pattern: String },

    /// A condition `<li>` with no variable name in scope. The item is skipped.
    #[error("Condition too complicated to handle in pattern '{pattern}'")]
    AmbiguousCondition { pattern: String },

    /// The trigger has characters RiveScript does not allow. The category is
    /// dropped from the output.
    #[error("Trigger '{trigger}' has syntax errors. Skipping.")]
    InvalidTrigger { trigger: String },

    #[error("Unhandled AIML tag: {markup}")]
    UnhandledTag { markup: String },
}
