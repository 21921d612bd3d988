//! Error types for the formula language.

use crate::datemath::DateError;
use thiserror::Error;

/// Result of evaluating a formula expression or script.
pub type ScriptResult<T> = Result<T, ScriptError>;

/// Error produced while tokenizing, parsing or evaluating a formula.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScriptError {
    /// A binding tried to shadow one of the evaluation builtins.
    #[error("cannot redefine evaluation builtin '{name}'")]
    ReservedBinding { name: String },

    /// The lexer hit a character that starts no token.
    #[error("unexpected character '{character}' at position {position}")]
    UnexpectedCharacter { character: char, position: usize },

    /// A string literal was never closed.
    #[error("unterminated string literal at position {position}")]
    UnterminatedString { position: usize },

    /// The parser hit a token it could not use.
    #[error("unexpected token '{token}' at position {position}")]
    UnexpectedToken { token: String, position: usize },

    /// The input ended in the middle of an expression.
    #[error("unexpected end of expression")]
    UnexpectedEndOfInput,

    /// The expression was empty.
    #[error("empty expression")]
    EmptyExpression,

    /// A variable was referenced that is not bound in scope.
    #[error("undefined variable '{name}'")]
    UndefinedVariable { name: String },

    /// A function was called that the evaluator does not provide.
    #[error("unknown function '{name}'")]
    UnknownFunction { name: String },

    /// A builtin was called with the wrong number of arguments.
    #[error("wrong number of arguments for '{name}'")]
    WrongArity { name: String },

    /// An operator was applied to values it does not support.
    #[error("type error: {message}")]
    Type { message: String },

    /// The left-hand side of an assignment was not a variable path.
    #[error("invalid assignment target")]
    InvalidAssignment,

    /// A date helper rejected its argument.
    #[error(transparent)]
    Date(#[from] DateError),
}

impl ScriptError {
    pub(crate) fn type_error(message: impl Into<String>) -> Self {
        ScriptError::Type {
            message: message.into(),
        }
    }
}
