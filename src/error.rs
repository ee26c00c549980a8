use thiserror::Error;

/// Errors raised while compiling scan configuration.
///
/// These are the only fatal errors a scan can produce; they surface
/// synchronously before any traversal or file I/O begins. Per-file
/// read failures during a scan are absorbed and never reach the caller.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The pattern map was empty, leaving nothing to scan for
    #[error("no annotation patterns configured")]
    EmptyPatterns,

    /// A pattern fragment does not define the capture group named after it
    #[error("pattern `{name}` does not define a capture group named `{name}`")]
    MissingCaptureGroup { name: String },

    /// The same capture group name appears in more than one pattern fragment
    #[error("capture group `{name}` is defined by more than one pattern")]
    DuplicateCaptureGroup { name: String },

    /// The combined annotation expression failed to compile
    #[error("failed to compile annotation patterns: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// An exclude glob translated to an invalid expression
    #[error("invalid exclude pattern `{pattern}`: {source}")]
    InvalidExclude {
        pattern: String,
        source: regex::Error,
    },
}
