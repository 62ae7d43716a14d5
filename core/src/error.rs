//! Error types for tree construction, parsing, and dispatch.
//!
//! The split follows the life of a command tree: [`BuildError`] covers
//! structural violations during the build phase (developer errors surfaced
//! at the offending call), [`ParseError`] covers user input rejected during
//! a parse pass, and [`ExecuteError`] is what [`execute`](crate::Cli::execute)
//! returns, carrying the path of the command the pass failed against.

use thiserror::Error;

/// Structural violations detected while building the command tree.
///
/// These are developer errors, not runtime conditions: they surface
/// immediately at the offending `add_*` call and are not meant to be
/// handled at run time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    /// Command name is empty.
    #[error("command name cannot be empty")]
    EmptyCommandName,
    /// A child declared an empty alias string.
    #[error("command '{0}' declares an empty alias")]
    EmptyAlias(String),
    /// The child is already attached; a command is attached exactly once.
    #[error("command '{0}' already has a parent")]
    CommandAlreadyHasParent(String),
    /// Two flags on the same command share a name or shortcut.
    #[error("duplicate flag '{flag}' on command '{command}'")]
    DuplicateFlag {
        /// Command the flag was added to.
        command: String,
        /// Name of the rejected flag.
        flag: String,
    },
    /// A positional definition was appended after a variadic one.
    #[error("variadic positional must be last on command '{0}'")]
    VariadicArgumentNotLast(String),
    /// A required positional definition follows an optional one.
    #[error("required positional cannot follow an optional one on command '{0}'")]
    RequiredArgumentAfterOptional(String),
    /// The handle does not address a node in this arena.
    #[error("unknown command id {0}")]
    UnknownCommandId(usize),
}

/// User-input failures from a parse or validation pass.
///
/// Returned to the dispatcher, which is the single point that renders
/// diagnostics and decides the exit code. Also produced by the context
/// accessors when converting environment-sourced text or narrowing a
/// numeric value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// No flag with this name or shortcut on the command or its ancestors.
    #[error("unknown flag '{0}'")]
    UnknownFlag(String),
    /// A value-taking flag reached the end of the argument vector.
    #[error("flag '{0}' requires a value")]
    MissingFlagValue(String),
    /// A value-taking shortcut appeared mid-group with trailing characters.
    #[error("flag '-{shortcut}' takes a value and must be last in group '-{group}'")]
    InvalidFlagGrouping {
        /// The full shortcut run, without the leading dash.
        group: String,
        /// The value-taking shortcut that was not last.
        shortcut: char,
    },
    /// Fewer positional tokens than required definitions.
    #[error("missing required argument <{0}>")]
    MissingRequiredArgument(String),
    /// More positional tokens than definitions (and no variadic to absorb them).
    #[error("too many arguments: expected at most {expected}, got {got}")]
    TooManyArguments {
        /// Defined positional capacity.
        expected: usize,
        /// Parsed positional count.
        got: usize,
    },
    /// Text is not `true` or `false` (case-insensitive).
    #[error("invalid boolean '{0}': expected 'true' or 'false'")]
    InvalidBoolString(String),
    /// Text is not a signed 64-bit decimal integer.
    #[error("invalid integer '{0}'")]
    InvalidIntegerLiteral(String),
    /// Text is not a floating-point number.
    #[error("invalid number '{0}'")]
    InvalidFloatLiteral(String),
    /// Integer does not fit the requested representation.
    #[error("integer value {0} is out of range for the requested type")]
    IntegerValueOutOfRange(String),
    /// Float does not fit the requested representation.
    #[error("float value {0} is out of range for the requested type")]
    FloatValueOutOfRange(String),
}

/// Error carried by a handler back through [`execute`](crate::Cli::execute).
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

/// Outcome of a failed dispatch.
#[derive(Debug, Error)]
pub enum ExecuteError {
    /// User input failed to parse or validate against the resolved command.
    #[error("{source} (in '{command}')")]
    Parse {
        /// Path of the command the pass failed against, for diagnostics.
        command: String,
        /// The underlying parse or validation failure.
        source: ParseError,
    },
    /// The command handler returned an error; propagated unchanged.
    #[error("{0}")]
    Handler(HandlerError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_messages_name_the_offender() {
        assert_eq!(
            ParseError::UnknownFlag("--frob".to_string()).to_string(),
            "unknown flag '--frob'"
        );
        assert_eq!(
            ParseError::InvalidFlagGrouping {
                group: "vof".to_string(),
                shortcut: 'o',
            }
            .to_string(),
            "flag '-o' takes a value and must be last in group '-vof'"
        );
    }

    #[test]
    fn test_execute_error_carries_failing_command_path() {
        let err = ExecuteError::Parse {
            command: "vgit remote add".to_string(),
            source: ParseError::MissingRequiredArgument("name".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "missing required argument <name> (in 'vgit remote add')"
        );
    }
}
