// ABOUTME: Error types for the idetools adapter
// ABOUTME: All faults surface to the caller, no local recovery or retry

/// Errors surfaced to the host framework.
#[derive(Debug, thiserror::Error)]
pub enum CompleterError {
    /// The compiler process failed to start or I/O with it faulted.
    #[error("nim invocation failed: {0}")]
    Tool(#[from] std::io::Error),

    /// Definition lookup did not resolve to a symbol.
    #[error("no such symbol")]
    NoSuchSymbol,

    /// A definition record carried a non-numeric line or column field.
    #[error("malformed definition record: {0}")]
    MalformedDefinition(String),

    /// The requested subcommand is not in the supported set.
    #[error("unknown subcommand '{0}'. Supported subcommands: GoTo, GetType")]
    UnknownSubcommand(String),

    /// No subcommand was given.
    #[error("no subcommand given. Supported subcommands: GoTo, GetType")]
    MissingSubcommand,
}

pub type Result<T> = std::result::Result<T, CompleterError>;
