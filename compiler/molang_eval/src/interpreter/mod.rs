//! Tree-walking evaluation of compiled expressions.
//!
//! Missing data never fails an evaluation: an absent member, an unbound host
//! scope, an unset `temp` or a path through a non-struct all read as
//! [`absent`]. Only a binding that reports an error aborts the evaluation.

mod control;

use std::sync::Arc;

use molang_ir::{BinaryOp, ScopeKind};
use molang_stack::ensure_sufficient_stack;
use smallvec::SmallVec;

use crate::binding::StructValue;
use crate::compiled::{CompiledExpression, Node, ScopedPath};
use crate::errors::BindingError;
use crate::operators::{evaluate_binary, evaluate_unary};
use crate::{Environment, Value};

pub(crate) use control::{ControlAction, EvalResult};

/// The value read in place of anything that is missing.
#[inline]
fn absent() -> Value {
    Value::ZERO
}

/// Evaluate a compiled expression against one environment.
///
/// `temp` storage is cleared first. A top-level `return` yields its value.
pub(crate) fn run(
    compiled: &CompiledExpression,
    env: &mut Environment<'_>,
    max_loop_iterations: u32,
) -> Result<Value, BindingError> {
    env.clear_temps();
    let mut interpreter = Interpreter {
        env,
        query_override: None,
        max_loop_iterations,
    };
    match interpreter.eval(compiled.root()) {
        Ok(value) | Err(ControlAction::Return(value)) => Ok(value),
        Err(ControlAction::Error(error)) => Err(error),
        // Rejected at compile time; harmless if ever reached.
        Err(ControlAction::Break | ControlAction::Continue) => Ok(Value::Void),
    }
}

pub(crate) struct Interpreter<'e, 'a> {
    env: &'e mut Environment<'a>,
    /// Struct standing in for the `query` scope inside `receiver -> expr`.
    query_override: Option<Arc<dyn StructValue>>,
    max_loop_iterations: u32,
}

impl Interpreter<'_, '_> {
    pub(crate) fn eval(&mut self, node: &Node) -> EvalResult {
        ensure_sufficient_stack(|| self.eval_inner(node))
    }

    fn eval_inner(&mut self, node: &Node) -> EvalResult {
        match node {
            Node::Number(n) => Ok(Value::Number(*n)),
            Node::Str(s) => Ok(Value::String(Arc::clone(s))),
            Node::Path(path) => Ok(self.read(path).unwrap_or_else(absent)),
            Node::Binary { op, left, right } => self.eval_binary(*op, left, right),
            Node::Unary { op, operand } => {
                let value = self.eval(operand)?;
                Ok(evaluate_unary(*op, &value))
            }
            Node::Assign { target, value } => {
                let value = self.eval(value)?;
                self.write(target, value.clone())?;
                Ok(value)
            }
            Node::Ternary {
                cond,
                then_branch,
                else_branch,
            } => {
                if self.eval(cond)?.is_truthy() {
                    self.eval(then_branch)
                } else if let Some(else_branch) = else_branch {
                    self.eval(else_branch)
                } else {
                    Ok(absent())
                }
            }
            Node::Loop { count, body } => self.eval_loop(count, body),
            Node::ForEach {
                variable,
                collection,
                body,
            } => self.eval_for_each(variable, collection, body),
            Node::Block { stmts, tail } => {
                for stmt in stmts.iter() {
                    self.eval(stmt)?;
                }
                match tail {
                    Some(tail) => self.eval(tail),
                    None => Ok(Value::Void),
                }
            }
            Node::HostCall { target, args } => {
                let args = self.eval_args(args)?;
                Ok(self.invoke(target, &args)?.unwrap_or_else(absent))
            }
            Node::MathCall { func, args } => {
                let mut numbers: SmallVec<[f64; 3]> = SmallVec::with_capacity(args.len());
                for arg in args.iter() {
                    numbers.push(self.eval(arg)?.as_number());
                }
                Ok(Value::Number(func.apply(&numbers, self.env.rng())))
            }
            Node::Index { base, index } => {
                let base = self.eval(base)?;
                let index = self.eval(index)?.as_number();
                Ok(index_array(&base, index))
            }
            Node::Arrow { receiver, body } => {
                let Value::Struct(target) = self.eval(receiver)? else {
                    return Ok(absent());
                };
                let saved = self.query_override.replace(target);
                let result = self.eval(body);
                self.query_override = saved;
                result
            }
            Node::Break => Err(ControlAction::Break),
            Node::Continue => Err(ControlAction::Continue),
            Node::Return(value) => {
                let value = self.eval(value)?;
                Err(ControlAction::Return(value))
            }
            Node::Void => Ok(Value::Void),
        }
    }

    fn eval_binary(&mut self, op: BinaryOp, left: &Node, right: &Node) -> EvalResult {
        match op {
            BinaryOp::And => {
                if !self.eval(left)?.is_truthy() {
                    return Ok(Value::from(false));
                }
                Ok(Value::from(self.eval(right)?.is_truthy()))
            }
            BinaryOp::Or => {
                if self.eval(left)?.is_truthy() {
                    return Ok(Value::from(true));
                }
                Ok(Value::from(self.eval(right)?.is_truthy()))
            }
            BinaryOp::Coalesce => self.coalesce(left, right).map(|v| v.unwrap_or_else(absent)),
            _ => {
                let left = self.eval(left)?;
                let right = self.eval(right)?;
                Ok(evaluate_binary(op, &left, &right))
            }
        }
    }

    /// `left ?? right`: the first operand that resolves to a non-void value.
    fn coalesce(&mut self, left: &Node, right: &Node) -> Result<Option<Value>, ControlAction> {
        match self.lookup(left)? {
            Some(value) if !value.is_void() => Ok(Some(value)),
            _ => self.lookup(right),
        }
    }

    /// Evaluate a node, keeping a missing path distinguishable from a value.
    fn lookup(&mut self, node: &Node) -> Result<Option<Value>, ControlAction> {
        match node {
            Node::Path(path) => Ok(self.read(path)),
            Node::Binary {
                op: BinaryOp::Coalesce,
                left,
                right,
            } => self.coalesce(left, right),
            other => self.eval(other).map(Some),
        }
    }

    fn eval_args(&mut self, args: &[Node]) -> Result<SmallVec<[Value; 4]>, ControlAction> {
        let mut values = SmallVec::with_capacity(args.len());
        for arg in args {
            values.push(self.eval(arg)?);
        }
        Ok(values)
    }

    /// Read the first member of a path from its scope.
    fn read_root(&self, scope: ScopeKind, member: &str) -> Option<Value> {
        match (scope, &self.query_override) {
            (ScopeKind::Temp, _) => self.env.temp(member).cloned(),
            (ScopeKind::Query, Some(target)) => target.get(member),
            // `math` constants fold at compile time; nothing else is readable.
            (ScopeKind::Math, _) => None,
            _ => self.env.binding(scope)?.get(member),
        }
    }

    /// Read a full path, walking struct members past the first segment.
    fn read(&self, path: &ScopedPath) -> Option<Value> {
        self.read_prefix(path.scope, &path.members)
    }

    fn read_prefix(&self, scope: ScopeKind, members: &[Arc<str>]) -> Option<Value> {
        let (first, rest) = members.split_first()?;
        let mut value = self.read_root(scope, first)?;
        for member in rest {
            let Value::Struct(object) = value else {
                return None;
            };
            value = object.get(member)?;
        }
        Some(value)
    }

    /// Write through a path. Writes into an unbound scope or through a
    /// non-struct parent are dropped.
    pub(crate) fn write(&mut self, path: &ScopedPath, value: Value) -> Result<(), BindingError> {
        let Some((last, parents)) = path.members.split_last() else {
            return Ok(());
        };
        if !parents.is_empty() {
            return match self.read_prefix(path.scope, parents) {
                Some(Value::Struct(object)) => object.set(last, value),
                _ => Ok(()),
            };
        }
        match (path.scope, &self.query_override) {
            (ScopeKind::Temp, _) => {
                self.env.set_temp(Arc::clone(last), value);
                Ok(())
            }
            (ScopeKind::Query, Some(target)) => target.set(last, value),
            _ => match self.env.binding_mut(path.scope) {
                Some(binding) => binding.set(last, value),
                None => Ok(()),
            },
        }
    }

    fn invoke(
        &mut self,
        path: &ScopedPath,
        args: &[Value],
    ) -> Result<Option<Value>, BindingError> {
        let Some((last, parents)) = path.members.split_last() else {
            return Ok(None);
        };
        if !parents.is_empty() {
            return match self.read_prefix(path.scope, parents) {
                Some(Value::Struct(object)) => object.invoke(last, args),
                _ => Ok(None),
            };
        }
        match (path.scope, &self.query_override) {
            // `temp` holds values only.
            (ScopeKind::Temp | ScopeKind::Math, _) => Ok(None),
            (ScopeKind::Query, Some(target)) => target.invoke(last, args),
            _ => match self.env.binding_mut(path.scope) {
                Some(binding) => binding.invoke(last, args),
                None => Ok(None),
            },
        }
    }
}

/// `base[index]` with the index truncated and clamped into the array.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn index_array(base: &Value, index: f64) -> Value {
    let Value::Array(items) = base else {
        return absent();
    };
    let Some(last) = items.len().checked_sub(1) else {
        return absent();
    };
    let index = if index.is_nan() || index < 0.0 {
        0
    } else {
        (index.trunc() as usize).min(last)
    };
    items[index].clone()
}
