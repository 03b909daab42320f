use std::error::Error as StdError;
use std::fmt;
use std::path::PathBuf;

use tracing_error::SpanTrace;

use crate::segment::Segment;

/* 📖 # Why a custom error type and not use anyhow/eyre/thiserror etc?

- Better control over error handling
- No dependencies to compile and integrate
- More transparency into error handling logic

Traversal needs this control in particular: callers must be able to tell a
"this segment is missing" miss apart from a real I/O failure, because boolean
checks swallow the former and propagate the latter.
 */

/// Error variants that can occur while building or traversing paths.
#[derive(Debug)]
pub enum ErrorKind {
    /// A segment could not be resolved against its parent node.
    NotFound { segment: Option<Segment> },

    /// A resolved node cannot enumerate its children.
    NotTraversable { segment: Option<Segment> },

    /// The segment type does not fit the node kind (e.g. a text key against a sequence).
    TypeMismatch {
        segment: Segment,
        expected: &'static str,
    },

    /// Invalid constructor argument or invalid derived-path input.
    Construction { message: String },

    /// File system operation failed
    FileError {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Catch-all for other errors with a message
    Message { message: String },
}

/* 📖 # Why separate ErrorKind and Error?
ErrorKind carries the structural facts (which segment failed, which file). Error wraps
it with context strings attached during propagation and the span trace captured at
construction, so pattern matching stays on the kind while reports get the full story.
*/

/// Error wrapping an ErrorKind with context and the span trace at creation.
#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    context: Vec<String>,
    span_trace: SpanTrace,
}

impl Error {
    /// Creates a new error from an ErrorKind, capturing the current span trace.
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: vec![],
            span_trace: SpanTrace::capture(),
        }
    }

    pub fn not_found(segment: Option<Segment>) -> Self {
        Self::new(ErrorKind::NotFound { segment })
    }

    pub fn not_traversable(segment: Option<Segment>) -> Self {
        Self::new(ErrorKind::NotTraversable { segment })
    }

    pub fn type_mismatch(segment: Segment, expected: &'static str) -> Self {
        Self::new(ErrorKind::TypeMismatch { segment, expected })
    }

    pub fn construction(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Construction {
            message: message.into(),
        })
    }

    pub fn file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::new(ErrorKind::FileError {
            path: path.into(),
            source,
        })
    }

    pub fn message(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Message {
            message: message.into(),
        })
    }

    /// Attaches context to an error.
    /// Context is displayed before the error message.
    pub fn context(mut self, context: impl Into<String>) -> Self {
        self.context.push(context.into());
        self
    }

    /// Attaches context using lazy evaluation.
    pub fn with_context<F>(mut self, f: F) -> Self
    where
        F: FnOnce() -> String,
    {
        self.context.push(f());
        self
    }

    /// Returns a reference to the underlying ErrorKind.
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn get_context(&self) -> &[String] {
        &self.context
    }

    /// Span trace captured when the error was created.
    pub fn span_trace(&self) -> &SpanTrace {
        &self.span_trace
    }

    /// The segment the error points at, if the kind carries one.
    pub fn segment(&self) -> Option<&Segment> {
        match &self.kind {
            ErrorKind::NotFound { segment } | ErrorKind::NotTraversable { segment } => {
                segment.as_ref()
            }
            ErrorKind::TypeMismatch { segment, .. } => Some(segment),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self.kind, ErrorKind::NotFound { .. })
    }

    /// True for the resolution failures that boolean checks report as `false`.
    ///
    /// I/O failures are never a traversal miss.
    pub fn is_traversal_miss(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::NotFound { .. }
                | ErrorKind::NotTraversable { .. }
                | ErrorKind::TypeMismatch { .. }
        )
    }

    /// The OS error kind of a `FileError`.
    pub fn io_kind(&self) -> Option<std::io::ErrorKind> {
        match &self.kind {
            ErrorKind::FileError { source, .. } => Some(source.kind()),
            _ => None,
        }
    }

    /// Returns the innermost error in the chain.
    pub fn root_cause(&self) -> &(dyn StdError + 'static) {
        let mut current: &(dyn StdError + 'static) = self;
        while let Some(next) = current.source() {
            current = next;
        }
        current
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Self::new(kind)
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match &self.kind {
            ErrorKind::FileError { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::NotFound {
                segment: Some(segment),
            } => write!(f, "segment not found: {}", segment),
            ErrorKind::NotFound { segment: None } => write!(f, "path not found"),
            ErrorKind::NotTraversable {
                segment: Some(segment),
            } => write!(f, "node at segment '{}' is not traversable", segment),
            ErrorKind::NotTraversable { segment: None } => {
                write!(f, "root node is not traversable")
            }
            ErrorKind::TypeMismatch { segment, expected } => {
                write!(f, "segment '{}' has the wrong type: expected {}", segment, expected)
            }
            ErrorKind::Construction { message } => {
                write!(f, "invalid path construction: {}", message)
            }
            ErrorKind::FileError { path, source } => {
                write!(f, "File error at {}: {}", path.display(), source)
            }
            ErrorKind::Message { message } => write!(f, "{}", message),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for ctx in &self.context {
            write!(f, "{}: ", ctx)?;
        }
        write!(f, "{}", self.kind)
    }
}

/// Standard result type for pathable operations.
pub type Result<T> = std::result::Result<T, Box<Error>>;

/// Extension trait for attaching context to Results.
pub trait ResultExt<T> {
    /// Attaches context to an error, consuming and re-wrapping it.
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Attaches context using lazy evaluation.
    /// Context is only evaluated if the result is an error.
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|err| Box::new(err.context(context)))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|err| Box::new(err.with_context(f)))
    }
}

/// Builds a boxed `Message` error from format arguments.
#[macro_export]
macro_rules! err {
    ($($arg:tt)*) => {
        Box::new($crate::error::Error::message(format!($($arg)*)))
    };
}

/// Builds a boxed `Construction` error from format arguments.
#[macro_export]
macro_rules! construction_err {
    ($($arg:tt)*) => {
        Box::new($crate::error::Error::construction(format!($($arg)*)))
    };
}
