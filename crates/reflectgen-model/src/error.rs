use std::fmt;
use thiserror::Error;

/// A location in an input header, used to anchor diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation {
    pub file: String,
    pub line: u32,
    pub column: u32,
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({}:{})", self.file, self.line, self.column)
    }
}

/// Errors the reflection pipeline can fail with.
///
/// Every variant is fatal for the invocation (see spec §7): there is no
/// partial-output recovery mode.
#[derive(Debug, Error)]
pub enum ReflectError {
    #[error("clang front-end failed to produce an AST for {path}: {diagnostics}")]
    Frontend { path: String, diagnostics: String },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{location}: error: {kind} \"{name}\" access specifier expected \"public\", found \"{found}\".")]
    AccessSpecifier {
        location: SourceLocation,
        kind: String,
        name: String,
        found: String,
    },

    #[error("{location}: error: malformed reflection metadata: {message}")]
    MetadataParse {
        location: SourceLocation,
        message: String,
    },
}

pub type ReflectResult<T> = Result<T, ReflectError>;
