//! Stack growth guard for the recursive phases of the MoLang pipeline.
//!
//! The parser, resolver, lowering pass and tree-walking interpreter all recurse
//! once per nesting level of the source expression. Host-authored scripts are
//! small, but generated or hostile input such as `((((...))))` or `-----x`
//! can nest thousands of levels deep. Every recursive entry point wraps its body
//! in [`ensure_sufficient_stack`], which moves execution onto a freshly
//! allocated segment when the current one runs low.
//!
//! On `wasm32` the guard is a plain call.

/// Remaining stack below which a new segment is allocated.
const RED_ZONE: usize = 128 * 1024;

/// Size of each freshly allocated stack segment.
const SEGMENT_SIZE: usize = 2 * 1024 * 1024;

/// Run `f`, growing the stack first if less than [`RED_ZONE`] bytes remain.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, SEGMENT_SIZE, f)
}

/// Run `f` directly; the wasm runtime owns stack management.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}

#[cfg(test)]
mod tests {
    use super::ensure_sufficient_stack;

    enum Nested {
        Leaf(f64),
        Neg(Box<Nested>),
    }

    fn build(depth: usize) -> Nested {
        let mut node = Nested::Leaf(1.0);
        for _ in 0..depth {
            node = Nested::Neg(Box::new(node));
        }
        node
    }

    fn eval(node: &Nested) -> f64 {
        ensure_sufficient_stack(|| match node {
            Nested::Leaf(v) => *v,
            Nested::Neg(inner) => -eval(inner),
        })
    }

    fn dismantle(node: Nested) {
        // Iterative drop so the test itself cannot overflow on teardown.
        let mut current = node;
        while let Nested::Neg(inner) = current {
            current = *inner;
        }
    }

    #[test]
    fn test_shallow_nesting() {
        let tree = build(3);
        assert!((eval(&tree) - -1.0).abs() < f64::EPSILON);
        dismantle(tree);
    }

    #[test]
    fn test_deep_nesting_does_not_overflow() {
        let tree = build(200_000);
        assert!((eval(&tree) - 1.0).abs() < f64::EPSILON);
        dismantle(tree);
    }

    #[test]
    fn test_propagates_results() {
        let result: Result<u8, &str> = ensure_sufficient_stack(|| Err("bad token"));
        assert_eq!(result, Err("bad token"));
    }
}
