//! Tree-walking evaluator for formula expressions and scripts.

use std::collections::BTreeMap;

use super::ast::{BinaryOp, Expr, Script, Stmt, UnaryOp};
use super::error::{ScriptError, ScriptResult};
use super::value::Value;
use crate::datemath;

/// The evaluation builtins. Bindings may not shadow these.
const BUILTINS: [&str; 3] = ["date", "time", "datetime"];

/// The set of variable bindings visible to an expression or script.
#[derive(Debug, Clone, Default)]
pub struct Scope {
    bindings: BTreeMap<String, Value>,
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds a name to a value, replacing any previous binding.
    ///
    /// Fails if the name would shadow one of the builtin helpers.
    pub fn bind(&mut self, name: impl Into<String>, value: Value) -> ScriptResult<()> {
        let name = name.into();
        if BUILTINS.contains(&name.as_str()) {
            return Err(ScriptError::ReservedBinding { name });
        }
        self.bindings.insert(name, value);
        Ok(())
    }

    /// Looks up a binding.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.bindings.get(name)
    }

    fn get_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.bindings.get_mut(name)
    }
}

/// Evaluates a single expression against a scope.
pub fn eval_expr(expr: &Expr, scope: &Scope) -> ScriptResult<Value> {
    match expr {
        Expr::Number(n) => Ok(Value::Number(*n)),
        Expr::Str(s) => Ok(Value::String(s.clone())),
        Expr::Bool(b) => Ok(Value::Bool(*b)),
        Expr::Null => Ok(Value::Null),

        Expr::Var(name) => match scope.get(name) {
            Some(value) => Ok(value.clone()),
            None => Err(ScriptError::UndefinedVariable { name: name.clone() }),
        },

        Expr::Call { name, args } => eval_call(name, args, scope),

        Expr::Property { target, name } => {
            let target = eval_expr(target, scope)?;
            eval_property(&target, name)
        }

        Expr::Index { target, index } => {
            let target = eval_expr(target, scope)?;
            let index = eval_expr(index, scope)?;
            eval_index(&target, &index)
        }

        Expr::Unary { op, expr } => {
            let value = eval_expr(expr, scope)?;
            match op {
                UnaryOp::Not => Ok(Value::Bool(!value.truthy())),
                UnaryOp::Neg => match value.as_number() {
                    Some(n) => Ok(Value::Number(-n)),
                    None => Err(ScriptError::type_error("cannot negate a non-number")),
                },
            }
        }

        Expr::Binary { op, left, right } => eval_binary(*op, left, right, scope),

        Expr::Ternary {
            condition,
            then,
            otherwise,
        } => {
            if eval_expr(condition, scope)?.truthy() {
                eval_expr(then, scope)
            } else {
                eval_expr(otherwise, scope)
            }
        }

        Expr::Object(entries) => {
            let mut map = BTreeMap::new();
            for (key, value) in entries {
                map.insert(key.clone(), eval_expr(value, scope)?);
            }
            Ok(Value::Object(map))
        }
    }
}

/// Evaluates a script against a mutable scope. Assignments persist in the
/// scope; the value of the last statement is returned, or null for an
/// empty script.
pub fn eval_script(script: &Script, scope: &mut Scope) -> ScriptResult<Value> {
    let mut last = Value::Null;

    for statement in &script.statements {
        last = match statement {
            Stmt::Expr(expr) => eval_expr(expr, scope)?,
            Stmt::Assign { target, value } => {
                let value = eval_expr(value, scope)?;
                assign(scope, &target.root, &target.path, value.clone())?;
                value
            }
        };
    }

    Ok(last)
}

/// Writes a value through a variable path. A bare name creates or
/// replaces a binding; a dotted path requires every intermediate step
/// to be an object already in scope.
fn assign(scope: &mut Scope, root: &str, path: &[String], value: Value) -> ScriptResult<()> {
    if path.is_empty() {
        return scope.bind(root, value);
    }

    let mut current = match scope.get_mut(root) {
        Some(current) => current,
        None => {
            return Err(ScriptError::UndefinedVariable {
                name: root.to_string(),
            })
        }
    };

    for step in &path[..path.len() - 1] {
        current = match current {
            Value::Object(map) => match map.get_mut(step) {
                Some(next) => next,
                None => {
                    return Err(ScriptError::type_error(format!(
                        "cannot assign through missing property '{}'",
                        step
                    )))
                }
            },
            _ => {
                return Err(ScriptError::type_error(format!(
                    "cannot assign through non-object at '{}'",
                    step
                )))
            }
        };
    }

    let last = &path[path.len() - 1];
    match current {
        Value::Object(map) => {
            map.insert(last.clone(), value);
            Ok(())
        }
        _ => Err(ScriptError::type_error(format!(
            "cannot assign property '{}' of a non-object",
            last
        ))),
    }
}

fn eval_call(name: &str, args: &[Expr], scope: &Scope) -> ScriptResult<Value> {
    let helper = match name {
        "date" => datemath::date as fn(&str) -> datemath::DateResult<String>,
        "time" => datemath::time,
        "datetime" => datemath::datetime,
        _ => {
            return Err(ScriptError::UnknownFunction {
                name: name.to_string(),
            })
        }
    };

    let input = match args {
        [] => String::new(),
        [arg] => eval_expr(arg, scope)?.to_string(),
        _ => {
            return Err(ScriptError::WrongArity {
                name: name.to_string(),
            })
        }
    };

    Ok(Value::String(helper(&input)?))
}

fn eval_property(target: &Value, name: &str) -> ScriptResult<Value> {
    match target {
        // Missing object properties read as null, like absent JSON keys.
        Value::Object(map) => Ok(map.get(name).cloned().unwrap_or(Value::Null)),
        Value::Array(items) if name == "length" => Ok(Value::Number(items.len() as f64)),
        Value::String(s) if name == "length" => Ok(Value::Number(s.chars().count() as f64)),
        Value::Null => Err(ScriptError::type_error(format!(
            "cannot read property '{}' of null",
            name
        ))),
        other => Err(ScriptError::type_error(format!(
            "cannot read property '{}' of {}",
            name,
            kind(other)
        ))),
    }
}

fn eval_index(target: &Value, index: &Value) -> ScriptResult<Value> {
    match (target, index) {
        (Value::Array(items), Value::Number(n)) => {
            if n.fract() != 0.0 || *n < 0.0 {
                return Ok(Value::Null);
            }
            Ok(items.get(*n as usize).cloned().unwrap_or(Value::Null))
        }
        (Value::Object(map), Value::String(key)) => {
            Ok(map.get(key).cloned().unwrap_or(Value::Null))
        }
        _ => Err(ScriptError::type_error(format!(
            "cannot index {} with {}",
            kind(target),
            kind(index)
        ))),
    }
}

fn eval_binary(op: BinaryOp, left: &Expr, right: &Expr, scope: &Scope) -> ScriptResult<Value> {
    // Logical operators short-circuit and yield an operand, so that
    // `x || 'fallback'` works as a default.
    match op {
        BinaryOp::And => {
            let left = eval_expr(left, scope)?;
            if !left.truthy() {
                return Ok(left);
            }
            return eval_expr(right, scope);
        }
        BinaryOp::Or => {
            let left = eval_expr(left, scope)?;
            if left.truthy() {
                return Ok(left);
            }
            return eval_expr(right, scope);
        }
        _ => {}
    }

    let left = eval_expr(left, scope)?;
    let right = eval_expr(right, scope)?;

    match op {
        BinaryOp::Add => match (&left, &right) {
            (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + b)),
            // `+` with a string on either side concatenates.
            (Value::String(_), _) | (_, Value::String(_)) => {
                Ok(Value::String(format!("{}{}", left, right)))
            }
            _ => Err(ScriptError::type_error(format!(
                "cannot add {} and {}",
                kind(&left),
                kind(&right)
            ))),
        },

        BinaryOp::Sub => numeric(op, &left, &right, |a, b| a - b),
        BinaryOp::Mul => numeric(op, &left, &right, |a, b| a * b),
        BinaryOp::Div => numeric(op, &left, &right, |a, b| a / b),
        BinaryOp::Rem => numeric(op, &left, &right, |a, b| a % b),

        BinaryOp::Eq => Ok(Value::Bool(left == right)),
        BinaryOp::Ne => Ok(Value::Bool(left != right)),

        BinaryOp::Lt => compare(op, &left, &right),
        BinaryOp::Le => compare(op, &left, &right),
        BinaryOp::Gt => compare(op, &left, &right),
        BinaryOp::Ge => compare(op, &left, &right),

        BinaryOp::And | BinaryOp::Or => unreachable!("handled above"),
    }
}

fn numeric(op: BinaryOp, left: &Value, right: &Value, f: fn(f64, f64) -> f64) -> ScriptResult<Value> {
    match (left.as_number(), right.as_number()) {
        (Some(a), Some(b)) => Ok(Value::Number(f(a, b))),
        _ => Err(ScriptError::type_error(format!(
            "{:?} requires numbers, got {} and {}",
            op,
            kind(left),
            kind(right)
        ))),
    }
}

fn compare(op: BinaryOp, left: &Value, right: &Value) -> ScriptResult<Value> {
    let ordering = match (left, right) {
        (Value::Number(a), Value::Number(b)) => a.partial_cmp(b),
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        _ => {
            return Err(ScriptError::type_error(format!(
                "cannot compare {} and {}",
                kind(left),
                kind(right)
            )))
        }
    };

    // NaN comparisons are always false.
    let result = match (op, ordering) {
        (_, None) => false,
        (BinaryOp::Lt, Some(ord)) => ord.is_lt(),
        (BinaryOp::Le, Some(ord)) => ord.is_le(),
        (BinaryOp::Gt, Some(ord)) => ord.is_gt(),
        (BinaryOp::Ge, Some(ord)) => ord.is_ge(),
        _ => unreachable!("not a comparison operator"),
    };

    Ok(Value::Bool(result))
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
