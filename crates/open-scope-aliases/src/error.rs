//! Parser error types.

/// Errors surfaced while parsing command text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, miette::Diagnostic)]
pub enum ParseError {
    /// Alias expansion ran out of passes, which points at a definition
    /// that expands to itself directly or through another alias.
    #[error("alias expansion exceeded {0} passes; a definition likely references itself")]
    AliasRecursion(u32),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, ParseError>;
