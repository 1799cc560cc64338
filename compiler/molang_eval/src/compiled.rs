//! Compiled artifacts.
//!
//! A resolved arena is lowered into an owned node tree: scoped paths carry
//! their [`ScopeKind`] and pre-lowered member names, math calls carry their
//! [`MathFn`]. The tree is immutable and shared behind an `Arc`, so one
//! [`CompiledExpression`] can be evaluated from many threads at once.

use std::fmt;
use std::sync::Arc;

use molang_ir::{BinaryOp, ExprArena, ExprId, ExprKind, MathFn, NameRange, ScopeKind, UnaryOp};
use molang_resolve::ResolvedProgram;
use molang_stack::ensure_sufficient_stack;

/// A scoped identifier chain: `scope.member(.member)*`.
#[derive(Clone, Debug)]
pub(crate) struct ScopedPath {
    pub scope: ScopeKind,
    /// Never empty.
    pub members: Box<[Arc<str>]>,
}

#[derive(Clone, Debug)]
pub(crate) enum Node {
    Number(f64),
    Str(Arc<str>),
    Path(ScopedPath),
    Binary {
        op: BinaryOp,
        left: Box<Node>,
        right: Box<Node>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Node>,
    },
    Assign {
        target: ScopedPath,
        value: Box<Node>,
    },
    /// `cond ? then : else` and, with no else branch, `cond ? then`, which
    /// reads as zero when `cond` is falsy.
    Ternary {
        cond: Box<Node>,
        then_branch: Box<Node>,
        else_branch: Option<Box<Node>>,
    },
    Loop {
        count: Box<Node>,
        body: Box<Node>,
    },
    ForEach {
        variable: ScopedPath,
        collection: Box<Node>,
        body: Box<Node>,
    },
    Block {
        stmts: Box<[Node]>,
        tail: Option<Box<Node>>,
    },
    HostCall {
        target: ScopedPath,
        args: Box<[Node]>,
    },
    MathCall {
        func: MathFn,
        args: Box<[Node]>,
    },
    Index {
        base: Box<Node>,
        index: Box<Node>,
    },
    Arrow {
        receiver: Box<Node>,
        body: Box<Node>,
    },
    Break,
    Continue,
    Return(Box<Node>),
    Void,
}

/// An immutable, reusable compiled expression.
///
/// Holds no per-evaluation state and never refers to an environment.
#[derive(Clone)]
pub struct CompiledExpression {
    source: Arc<str>,
    root: Arc<Node>,
}

impl CompiledExpression {
    /// The (trimmed) source text this artifact was compiled from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Whether the whole expression folded to a single number.
    pub fn as_constant(&self) -> Option<f64> {
        match *self.root {
            Node::Number(n) => Some(n),
            _ => None,
        }
    }

    /// Whether both handles share one compiled tree.
    pub fn ptr_eq(&self, other: &CompiledExpression) -> bool {
        Arc::ptr_eq(&self.root, &other.root)
    }

    pub(crate) fn root(&self) -> &Node {
        &self.root
    }

    pub(crate) fn lower(source: &str, program: &ResolvedProgram) -> Self {
        let lowering = Lowering {
            arena: program.arena(),
        };
        CompiledExpression {
            source: Arc::from(source),
            root: Arc::new(lowering.lower(program.root())),
        }
    }
}

impl fmt::Debug for CompiledExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledExpression")
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

struct Lowering<'a> {
    arena: &'a ExprArena,
}

impl Lowering<'_> {
    fn lower(&self, id: ExprId) -> Node {
        ensure_sufficient_stack(|| self.lower_inner(id))
    }

    fn boxed(&self, id: ExprId) -> Box<Node> {
        Box::new(self.lower(id))
    }

    fn list(&self, ids: &[ExprId]) -> Box<[Node]> {
        ids.iter().map(|&id| self.lower(id)).collect()
    }

    fn path(&self, scope: ScopeKind, members: NameRange) -> ScopedPath {
        ScopedPath {
            scope,
            members: self
                .arena
                .get_path(members)
                .iter()
                .map(|&name| Arc::from(self.arena.name(name)))
                .collect(),
        }
    }

    /// The scoped path behind a resolved target expression.
    fn target(&self, id: ExprId) -> Option<ScopedPath> {
        match self.arena.get_expr(id).kind {
            ExprKind::Scoped { scope, members } => Some(self.path(scope, members)),
            _ => None,
        }
    }

    fn lower_inner(&self, id: ExprId) -> Node {
        match self.arena.get_expr(id).kind {
            ExprKind::Number(n) => Node::Number(n),
            ExprKind::Str(name) => Node::Str(Arc::from(self.arena.name(name))),
            ExprKind::Scoped { scope, members } => Node::Path(self.path(scope, members)),
            // Resolution rewrites every path; an unresolved one reads as void.
            ExprKind::Path(_) => Node::Void,
            ExprKind::Binary { op, left, right } => Node::Binary {
                op,
                left: self.boxed(left),
                right: self.boxed(right),
            },
            ExprKind::Unary { op, operand } => Node::Unary {
                op,
                operand: self.boxed(operand),
            },
            ExprKind::Assign { target, value } => match self.target(target) {
                Some(target) => Node::Assign {
                    target,
                    value: self.boxed(value),
                },
                None => self.lower(value),
            },
            ExprKind::Ternary {
                cond,
                then_branch,
                else_branch,
            } => Node::Ternary {
                cond: self.boxed(cond),
                then_branch: self.boxed(then_branch),
                else_branch: Some(self.boxed(else_branch)),
            },
            ExprKind::Conditional { cond, then_branch } => Node::Ternary {
                cond: self.boxed(cond),
                then_branch: self.boxed(then_branch),
                else_branch: None,
            },
            ExprKind::Loop { count, body } => Node::Loop {
                count: self.boxed(count),
                body: self.boxed(body),
            },
            ExprKind::ForEach {
                variable,
                collection,
                body,
            } => match self.target(variable) {
                Some(variable) => Node::ForEach {
                    variable,
                    collection: self.boxed(collection),
                    body: self.boxed(body),
                },
                None => Node::Void,
            },
            ExprKind::Block { stmts, tail } => Node::Block {
                stmts: self.list(self.arena.get_list(stmts)),
                tail: tail.map(|tail| self.boxed(tail)),
            },
            ExprKind::Call { callee, args } => match self.target(callee) {
                Some(target) => Node::HostCall {
                    target,
                    args: self.list(self.arena.get_list(args)),
                },
                None => Node::Void,
            },
            ExprKind::MathCall { func, args } => Node::MathCall {
                func,
                args: self.list(self.arena.get_list(args)),
            },
            ExprKind::Index { base, index } => Node::Index {
                base: self.boxed(base),
                index: self.boxed(index),
            },
            ExprKind::Arrow { receiver, body } => Node::Arrow {
                receiver: self.boxed(receiver),
                body: self.boxed(body),
            },
            ExprKind::Break => Node::Break,
            ExprKind::Continue => Node::Continue,
            ExprKind::Return(value) => Node::Return(self.boxed(value)),
        }
    }
}
