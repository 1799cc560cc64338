//! Constant folding.
//!
//! Folds only what evaluation would compute identically every time: pure
//! operators and built-ins over numeric literals, and branches selected by a
//! literal condition. Nothing touching a scope, an assignment or a random
//! built-in is folded. Folded nodes keep their original span.

use molang_ir::{is_truthy, BinaryOp, ExprId, ExprKind, MathFn, UnaryOp};

use crate::Resolver;

impl Resolver {
    fn literal(&self, id: ExprId) -> Option<f64> {
        self.arena.get_expr(id).kind.as_number()
    }

    fn replace(&mut self, id: ExprId, kind: ExprKind) {
        self.arena.set_kind(id, kind);
        self.folded += 1;
    }

    pub(crate) fn fold_binary(&mut self, id: ExprId, op: BinaryOp, left: ExprId, right: ExprId) {
        let lhs = self.literal(left);
        let rhs = self.literal(right);

        if let (Some(l), Some(r)) = (lhs, rhs) {
            self.replace(id, ExprKind::Number(op.apply_numeric(l, r)));
            return;
        }

        // A literal left operand decides short-circuit operators on its own.
        let Some(l) = lhs else { return };
        match op {
            BinaryOp::And if !is_truthy(l) => self.replace(id, ExprKind::Number(0.0)),
            BinaryOp::Or if is_truthy(l) => self.replace(id, ExprKind::Number(1.0)),
            BinaryOp::Coalesce => self.replace(id, ExprKind::Number(l)),
            _ => {}
        }
    }

    pub(crate) fn fold_unary(&mut self, id: ExprId, op: UnaryOp, operand: ExprId) {
        if let Some(value) = self.literal(operand) {
            self.replace(id, ExprKind::Number(op.apply_numeric(value)));
        }
    }

    /// Fold `c ? a : b` and `c ? a` when `c` is a literal. A false
    /// else-less conditional is left alone so it still evaluates to void.
    pub(crate) fn fold_ternary(
        &mut self,
        id: ExprId,
        cond: ExprId,
        then_branch: ExprId,
        else_branch: Option<ExprId>,
    ) {
        let Some(c) = self.literal(cond) else { return };
        let chosen = if is_truthy(c) {
            Some(then_branch)
        } else {
            else_branch
        };
        let kind = match chosen {
            Some(branch) => self.arena.get_expr(branch).kind,
            None => ExprKind::Number(0.0),
        };
        self.replace(id, kind);
    }

    pub(crate) fn fold_math_call(&mut self, id: ExprId, func: MathFn, args: &[ExprId]) {
        if !func.is_pure() {
            return;
        }
        let values: Option<Vec<f64>> = args.iter().map(|&a| self.literal(a)).collect();
        if let Some(value) = values.and_then(|v| func.apply_pure(&v)) {
            self.replace(id, ExprKind::Number(value));
        }
    }
}

