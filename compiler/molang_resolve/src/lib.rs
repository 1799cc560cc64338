//! Scope resolution, validation and constant folding.
//!
//! Runs over a [`ParsedProgram`] in place:
//!
//! - every identifier chain must start with a known scope (or alias) and name
//!   at least one member; it becomes [`ExprKind::Scoped`]
//! - `math.*` members are checked against the built-in table; calls become
//!   [`ExprKind::MathCall`] after an arity check, `math.pi` becomes a literal
//! - assignment and `for_each` targets must be writable scoped paths
//! - `break`/`continue` must sit inside a loop body
//! - operations over literals are folded using the same operator functions
//!   the interpreter calls
//!
//! Host members past the scope are not checked; they are resolved at
//! evaluation time.

mod error;
mod fold;

pub use error::SemanticError;

use molang_ir::builtins::math_constant;
use molang_ir::{Expr, ExprArena, ExprId, ExprKind, ExprRange, MathFn, NameRange, ScopeKind, Span};
use molang_parse::ParsedProgram;
use molang_stack::ensure_sufficient_stack;
use tracing::debug;

/// A program that passed resolution. Only constructible through [`resolve`].
#[derive(Clone, Debug)]
pub struct ResolvedProgram {
    arena: ExprArena,
    root: ExprId,
}

impl ResolvedProgram {
    pub fn arena(&self) -> &ExprArena {
        &self.arena
    }

    pub fn root(&self) -> ExprId {
        self.root
    }
}

/// Resolve and fold a parsed program.
pub fn resolve(program: ParsedProgram) -> Result<ResolvedProgram, SemanticError> {
    let mut resolver = Resolver {
        arena: program.arena,
        loop_depth: 0,
        folded: 0,
    };
    resolver.resolve_expr(program.root)?;
    debug!(
        exprs = resolver.arena.expr_count(),
        folded = resolver.folded,
        "resolved"
    );
    Ok(ResolvedProgram {
        arena: resolver.arena,
        root: program.root,
    })
}

struct Resolver {
    arena: ExprArena,
    loop_depth: u32,
    folded: u32,
}

impl Resolver {
    fn resolve_expr(&mut self, id: ExprId) -> Result<(), SemanticError> {
        ensure_sufficient_stack(|| self.resolve_expr_inner(id))
    }

    fn resolve_all(&mut self, ids: &[ExprId]) -> Result<(), SemanticError> {
        for &id in ids {
            self.resolve_expr(id)?;
        }
        Ok(())
    }

    fn resolve_expr_inner(&mut self, id: ExprId) -> Result<(), SemanticError> {
        let Expr { kind, span } = *self.arena.get_expr(id);
        match kind {
            ExprKind::Number(_)
            | ExprKind::Str(_)
            | ExprKind::Scoped { .. }
            | ExprKind::MathCall { .. } => Ok(()),
            ExprKind::Path(path) => self.resolve_read(id, path, span),
            ExprKind::Binary { op, left, right } => {
                self.resolve_expr(left)?;
                self.resolve_expr(right)?;
                self.fold_binary(id, op, left, right);
                Ok(())
            }
            ExprKind::Unary { op, operand } => {
                self.resolve_expr(operand)?;
                self.fold_unary(id, op, operand);
                Ok(())
            }
            ExprKind::Assign { target, value } => {
                self.resolve_target(target)?;
                self.resolve_expr(value)
            }
            ExprKind::Ternary {
                cond,
                then_branch,
                else_branch,
            } => {
                self.resolve_expr(cond)?;
                self.resolve_expr(then_branch)?;
                self.resolve_expr(else_branch)?;
                self.fold_ternary(id, cond, then_branch, Some(else_branch));
                Ok(())
            }
            ExprKind::Conditional { cond, then_branch } => {
                self.resolve_expr(cond)?;
                self.resolve_expr(then_branch)?;
                self.fold_ternary(id, cond, then_branch, None);
                Ok(())
            }
            ExprKind::Loop { count, body } => {
                self.resolve_expr(count)?;
                self.resolve_loop_body(body)
            }
            ExprKind::ForEach {
                variable,
                collection,
                body,
            } => {
                self.resolve_target(variable)?;
                self.resolve_expr(collection)?;
                self.resolve_loop_body(body)
            }
            ExprKind::Block { stmts, tail } => {
                let stmts = self.arena.get_list(stmts).to_vec();
                self.resolve_all(&stmts)?;
                if let Some(tail) = tail {
                    self.resolve_expr(tail)?;
                }
                Ok(())
            }
            ExprKind::Call { callee, args } => self.resolve_call(id, callee, args, span),
            ExprKind::Index { base, index } => {
                self.resolve_expr(base)?;
                self.resolve_expr(index)
            }
            ExprKind::Arrow { receiver, body } => {
                self.resolve_expr(receiver)?;
                self.resolve_expr(body)
            }
            ExprKind::Break => self.check_in_loop("break", span),
            ExprKind::Continue => self.check_in_loop("continue", span),
            ExprKind::Return(value) => self.resolve_expr(value),
        }
    }

    fn resolve_loop_body(&mut self, body: ExprId) -> Result<(), SemanticError> {
        self.loop_depth += 1;
        let result = self.resolve_expr(body);
        self.loop_depth -= 1;
        result
    }

    fn check_in_loop(&self, keyword: &'static str, span: Span) -> Result<(), SemanticError> {
        if self.loop_depth == 0 {
            return Err(SemanticError::ControlOutsideLoop { keyword, span });
        }
        Ok(())
    }

    /// Split a path into its scope and member names.
    fn split_scope(&self, path: NameRange, span: Span) -> Result<(ScopeKind, NameRange), SemanticError> {
        let segments = self.arena.get_path(path);
        let root = self.arena.name(segments[0]);
        let Some(scope) = ScopeKind::from_name(root) else {
            return Err(SemanticError::UnknownScope {
                name: root.to_string(),
                span,
            });
        };
        let members = path.skip(1);
        if members.is_empty() {
            return Err(SemanticError::MissingMember { scope, span });
        }
        Ok((scope, members))
    }

    /// The single member name of a `math.<name>` path.
    fn math_member(&self, members: NameRange, span: Span) -> Result<&str, SemanticError> {
        let names = self.arena.get_path(members);
        if names.len() > 1 {
            return Err(SemanticError::BuiltinMisuse {
                message: format!("`math.{}` has no members", self.arena.name(names[0])),
                span,
            });
        }
        Ok(self.arena.name(names[0]))
    }

    fn resolve_read(&mut self, id: ExprId, path: NameRange, span: Span) -> Result<(), SemanticError> {
        let (scope, members) = self.split_scope(path, span)?;
        if scope != ScopeKind::Math {
            self.arena.set_kind(id, ExprKind::Scoped { scope, members });
            return Ok(());
        }

        let name = self.math_member(members, span)?;
        if let Some(value) = math_constant(name) {
            self.arena.set_kind(id, ExprKind::Number(value));
            self.folded += 1;
            return Ok(());
        }
        if let Some(func) = MathFn::lookup(name) {
            return Err(SemanticError::BuiltinMisuse {
                message: format!("`math.{}` is a function and must be called", func.name()),
                span,
            });
        }
        Err(SemanticError::UnknownBuiltin {
            name: name.to_string(),
            span,
        })
    }

    /// Targets of `=` and `for_each` must be scoped paths outside `math`.
    fn resolve_target(&mut self, id: ExprId) -> Result<(), SemanticError> {
        let Expr { kind, span } = *self.arena.get_expr(id);
        let ExprKind::Path(path) = kind else {
            return Err(SemanticError::InvalidAssignmentTarget {
                reason: "only scoped paths such as `temp.x` can be assigned",
                span,
            });
        };
        let (scope, members) = self.split_scope(path, span)?;
        if !scope.is_writable() {
            return Err(SemanticError::InvalidAssignmentTarget {
                reason: "`math` is read-only",
                span,
            });
        }
        self.arena.set_kind(id, ExprKind::Scoped { scope, members });
        Ok(())
    }

    fn resolve_call(
        &mut self,
        id: ExprId,
        callee: ExprId,
        args: ExprRange,
        span: Span,
    ) -> Result<(), SemanticError> {
        let arg_ids = self.arena.get_list(args).to_vec();
        self.resolve_all(&arg_ids)?;

        let Expr {
            kind: callee_kind,
            span: callee_span,
        } = *self.arena.get_expr(callee);
        let ExprKind::Path(path) = callee_kind else {
            // Only reachable for already-resolved calls.
            return Ok(());
        };
        let (scope, members) = self.split_scope(path, callee_span)?;
        if scope != ScopeKind::Math {
            self.arena.set_kind(callee, ExprKind::Scoped { scope, members });
            return Ok(());
        }

        let name = self.math_member(members, callee_span)?;
        let Some(func) = MathFn::lookup(name) else {
            if math_constant(name).is_some() {
                return Err(SemanticError::BuiltinMisuse {
                    message: format!("`math.{name}` is a constant and cannot be called"),
                    span,
                });
            }
            return Err(SemanticError::UnknownBuiltin {
                name: name.to_string(),
                span: callee_span,
            });
        };
        if arg_ids.len() != func.arity() {
            return Err(SemanticError::ArityMismatch {
                name: func.name(),
                expected: func.arity(),
                found: arg_ids.len(),
                span,
            });
        }

        self.arena.set_kind(id, ExprKind::MathCall { func, args });
        self.fold_math_call(id, func, &arg_ids);
        Ok(())
    }
}

#[cfg(test)]
mod tests;
