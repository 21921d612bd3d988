//! Error types for dashboard evaluation.

use crate::script::ScriptError;
use thiserror::Error;

/// Result of evaluating a widget tree.
pub type EvaluateResult<T> = Result<T, EvaluateError>;

/// Error produced while evaluating a dashboard.
///
/// Evaluation is fail-fast: the first error aborts the run.
#[derive(Debug, Error)]
pub enum EvaluateError {
    /// A template, expression or script failed to parse or evaluate.
    #[error("script error: {0}")]
    Script(#[from] ScriptError),

    /// A search query could not be completed.
    #[error(transparent)]
    Api(#[from] dashboard_api::Error),

    /// A graph element evaluated to something other than a number widget.
    #[error("graph widget elements must be number widgets")]
    GraphElementNotNumber,

    /// A table header or cell evaluated to a non-scalar widget.
    #[error("table widget elements must be string or number widgets")]
    TableElementNotScalar,
}
