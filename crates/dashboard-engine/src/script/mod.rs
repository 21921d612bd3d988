//! The formula language: templates, expressions and scripts.
//!
//! Dashboard configurations embed expressions in `{{ ... }}` template
//! spans, use standalone expressions for computed widget values, and run
//! multi-statement scripts at setup and shutdown. All three go through a
//! [`ScriptHost`], so the language implementation can be swapped out
//! without touching widget evaluation.
//!
//! The built-in [`FormulaHost`] is a small, restricted language: literals,
//! arithmetic, comparisons, logical operators, a ternary, property and
//! index access, object literals, and the `date`/`time`/`datetime` date
//! arithmetic helpers. It executes nothing outside the provided [`Scope`].

mod ast;
mod error;
mod eval;
mod lexer;
mod parser;
mod template;
mod value;

pub use error::{ScriptError, ScriptResult};
pub use eval::Scope;
pub use value::{format_number, Value};

use parser::Parser;

/// Evaluates expressions and scripts for the widget tree.
///
/// Implementations must be pure with respect to everything except the
/// scope passed to [`eval_script`](ScriptHost::eval_script): expression
/// evaluation may not mutate bindings.
pub trait ScriptHost: Send + Sync {
    /// Evaluates a single expression against a read-only scope.
    fn eval_expression(&self, source: &str, scope: &Scope) -> ScriptResult<Value>;

    /// Runs a script. Assignments persist in the scope; the value of the
    /// last statement is returned.
    fn eval_script(&self, source: &str, scope: &mut Scope) -> ScriptResult<Value>;
}

/// The built-in restricted formula language.
#[derive(Debug, Clone, Copy, Default)]
pub struct FormulaHost;

impl FormulaHost {
    pub fn new() -> Self {
        Self
    }
}

impl ScriptHost for FormulaHost {
    fn eval_expression(&self, source: &str, scope: &Scope) -> ScriptResult<Value> {
        let expr = Parser::parse_expression(source)?;
        eval::eval_expr(&expr, scope)
    }

    fn eval_script(&self, source: &str, scope: &mut Scope) -> ScriptResult<Value> {
        let script = Parser::parse_script(source)?;
        eval::eval_script(&script, scope)
    }
}

/// Resolves every `{{ ... }}` span in a template string against a scope.
pub fn resolve_template(
    host: &dyn ScriptHost,
    template: &str,
    scope: &Scope,
) -> ScriptResult<String> {
    template::resolve(host, template, scope)
}
