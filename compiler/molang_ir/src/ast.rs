//! Flat expression AST.
//!
//! All nodes live in an [`ExprArena`] and refer to each other by [`ExprId`].
//! Variable-length children (call arguments, block statements, path segments)
//! are stored in side tables and referenced by range. The parser produces
//! [`ExprKind::Path`] for every identifier chain; the resolver rewrites those
//! into [`ExprKind::Scoped`] and [`ExprKind::MathCall`] and folds constants
//! in place.

use std::fmt;

use rustc_hash::FxHashMap;

use crate::{BinaryOp, MathFn, ScopeKind, Span, UnaryOp};

/// Index of an expression in the arena.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct ExprId(u32);

impl ExprId {
    #[inline]
    pub const fn new(index: u32) -> Self {
        ExprId(index)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for ExprId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ExprId({})", self.0)
    }
}

/// Range of expression ids in the arena's list table.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct ExprRange {
    start: u32,
    len: u32,
}

impl ExprRange {
    pub const EMPTY: ExprRange = ExprRange { start: 0, len: 0 };

    #[inline]
    pub const fn len(self) -> usize {
        self.len as usize
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.len == 0
    }
}

/// Interned identifier, local to one arena.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Name(u32);

/// Range of names in the arena's path table.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct NameRange {
    start: u32,
    len: u32,
}

impl NameRange {
    #[inline]
    pub const fn len(self) -> usize {
        self.len as usize
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.len == 0
    }

    /// Drop the first `n` names (used to strip the scope prefix).
    #[must_use]
    pub fn skip(self, n: u32) -> NameRange {
        let n = n.min(self.len);
        NameRange {
            start: self.start + n,
            len: self.len - n,
        }
    }
}

/// Expression node.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ExprKind {
    /// Numeric literal. `true`/`false` lower to `1`/`0`.
    Number(f64),
    /// Single-quoted string literal.
    Str(Name),
    /// Identifier chain as written: `variable.target.health`.
    Path(NameRange),
    /// Identifier chain after scope resolution; `members` excludes the scope.
    Scoped {
        scope: ScopeKind,
        members: NameRange,
    },
    Binary {
        op: BinaryOp,
        left: ExprId,
        right: ExprId,
    },
    Unary {
        op: UnaryOp,
        operand: ExprId,
    },
    Assign {
        target: ExprId,
        value: ExprId,
    },
    /// `cond ? then : else`
    Ternary {
        cond: ExprId,
        then_branch: ExprId,
        else_branch: ExprId,
    },
    /// `cond ? then`, yields `0` when `cond` is falsy.
    Conditional {
        cond: ExprId,
        then_branch: ExprId,
    },
    Loop {
        count: ExprId,
        body: ExprId,
    },
    ForEach {
        variable: ExprId,
        collection: ExprId,
        body: ExprId,
    },
    /// Statement sequence. `tail` is the trailing expression without `;`.
    Block {
        stmts: ExprRange,
        tail: Option<ExprId>,
    },
    /// Host call through a scoped path.
    Call {
        callee: ExprId,
        args: ExprRange,
    },
    /// Built-in `math.*` call, produced by the resolver.
    MathCall {
        func: MathFn,
        args: ExprRange,
    },
    Index {
        base: ExprId,
        index: ExprId,
    },
    /// `receiver -> body`
    Arrow {
        receiver: ExprId,
        body: ExprId,
    },
    Break,
    Continue,
    Return(ExprId),
}

impl ExprKind {
    /// Literal numeric value, if this node is one.
    #[inline]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            ExprKind::Number(n) => Some(*n),
            _ => None,
        }
    }
}

/// Expression node with its source span.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    #[inline]
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Expr { kind, span }
    }
}

crate::static_assert_size!(ExprId, 4);
crate::static_assert_size!(Name, 4);

/// Storage for one program's expressions, lists and identifiers.
#[derive(Clone, Debug, Default)]
pub struct ExprArena {
    exprs: Vec<Expr>,
    expr_lists: Vec<ExprId>,
    names: Vec<Box<str>>,
    name_lookup: FxHashMap<Box<str>, Name>,
    name_lists: Vec<Name>,
}

impl ExprArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate an expression and return its id.
    pub fn alloc_expr(&mut self, expr: Expr) -> ExprId {
        let id = ExprId(to_u32(self.exprs.len()));
        self.exprs.push(expr);
        id
    }

    #[inline]
    pub fn get_expr(&self, id: ExprId) -> &Expr {
        &self.exprs[id.index()]
    }

    /// Overwrite a node's kind, keeping its span. Used by constant folding.
    #[inline]
    pub fn set_kind(&mut self, id: ExprId, kind: ExprKind) {
        self.exprs[id.index()].kind = kind;
    }

    #[inline]
    pub fn expr_count(&self) -> usize {
        self.exprs.len()
    }

    /// Allocate a contiguous list of expression ids.
    pub fn alloc_list(&mut self, ids: impl IntoIterator<Item = ExprId>) -> ExprRange {
        let start = to_u32(self.expr_lists.len());
        self.expr_lists.extend(ids);
        let len = to_u32(self.expr_lists.len()) - start;
        ExprRange { start, len }
    }

    #[inline]
    pub fn get_list(&self, range: ExprRange) -> &[ExprId] {
        let start = range.start as usize;
        &self.expr_lists[start..start + range.len()]
    }

    /// Intern an identifier or string literal.
    pub fn intern(&mut self, text: &str) -> Name {
        if let Some(&name) = self.name_lookup.get(text) {
            return name;
        }
        let name = Name(to_u32(self.names.len()));
        self.names.push(text.into());
        self.name_lookup.insert(text.into(), name);
        name
    }

    #[inline]
    pub fn name(&self, name: Name) -> &str {
        &self.names[name.0 as usize]
    }

    /// Allocate a path from already-interned names.
    pub fn alloc_path(&mut self, names: impl IntoIterator<Item = Name>) -> NameRange {
        let start = to_u32(self.name_lists.len());
        self.name_lists.extend(names);
        let len = to_u32(self.name_lists.len()) - start;
        NameRange { start, len }
    }

    #[inline]
    pub fn get_path(&self, range: NameRange) -> &[Name] {
        let start = range.start as usize;
        &self.name_lists[start..start + range.len()]
    }

    /// Path segments joined with `.`, for diagnostics and debug output.
    pub fn path_text(&self, range: NameRange) -> String {
        let mut out = String::new();
        for (i, &name) in self.get_path(range).iter().enumerate() {
            if i > 0 {
                out.push('.');
            }
            out.push_str(self.name(name));
        }
        out
    }
}

/// Arena indices are `u32`; a single expression never approaches that limit.
#[inline]
fn to_u32(len: usize) -> u32 {
    u32::try_from(len).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_alloc_and_get() {
        let mut arena = ExprArena::new();
        let one = arena.alloc_expr(Expr::new(ExprKind::Number(1.0), Span::new(0, 1)));
        let two = arena.alloc_expr(Expr::new(ExprKind::Number(2.0), Span::new(4, 5)));
        let sum = arena.alloc_expr(Expr::new(
            ExprKind::Binary {
                op: BinaryOp::Add,
                left: one,
                right: two,
            },
            Span::new(0, 5),
        ));

        assert_eq!(arena.expr_count(), 3);
        assert_eq!(arena.get_expr(two).kind, ExprKind::Number(2.0));
        assert_eq!(arena.get_expr(sum).span, Span::new(0, 5));
    }

    #[test]
    fn test_lists_are_contiguous() {
        let mut arena = ExprArena::new();
        let ids: Vec<_> = (0..3)
            .map(|i| arena.alloc_expr(Expr::new(ExprKind::Number(f64::from(i)), Span::DUMMY)))
            .collect();
        let first = arena.alloc_list(ids[..2].iter().copied());
        let second = arena.alloc_list([ids[2]]);

        assert_eq!(arena.get_list(first), &ids[..2]);
        assert_eq!(arena.get_list(second), &ids[2..]);
        assert!(arena.alloc_list([]).is_empty());
    }

    #[test]
    fn test_intern_deduplicates() {
        let mut arena = ExprArena::new();
        let a = arena.intern("health");
        let b = arena.intern("health");
        let c = arena.intern("speed");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(arena.name(c), "speed");
    }

    #[test]
    fn test_path_text_and_skip() {
        let mut arena = ExprArena::new();
        let names = ["variable", "target", "health"].map(|s| arena.intern(s));
        let path = arena.alloc_path(names);
        assert_eq!(arena.path_text(path), "variable.target.health");
        assert_eq!(arena.path_text(path.skip(1)), "target.health");
        assert!(path.skip(5).is_empty());
    }
}
