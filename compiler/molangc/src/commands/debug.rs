//! Debug commands: `lex` and `parse` for inspecting the front end.

use molang_ir::{ExprArena, ExprId, ExprKind};
use molang_lexer::{lex, LexError};
use molang_parse::parse;
use molang_stack::ensure_sufficient_stack;

use super::render_diagnostic;

/// The token stream of `source`, one token per line.
pub fn render_tokens(source: &str) -> Result<String, LexError> {
    let tokens = lex(source)?;
    let mut out = format!("Tokens ({}):\n", tokens.len());
    for token in tokens.iter() {
        out.push_str(&format!("  {} @ {}\n", token.kind, token.span));
    }
    Ok(out)
}

/// The syntax tree under `root`, indented by depth.
pub fn render_tree(arena: &ExprArena, root: ExprId) -> String {
    let mut out = String::new();
    write_node(arena, root, 0, &mut out);
    out
}

fn write_node(arena: &ExprArena, id: ExprId, depth: usize, out: &mut String) {
    ensure_sufficient_stack(|| {
        let expr = arena.get_expr(id);
        let (label, children) = describe(arena, expr.kind);
        out.push_str(&"  ".repeat(depth));
        out.push_str(&format!("{label} @ {}\n", expr.span));
        for child in children {
            write_node(arena, child, depth + 1, out);
        }
    });
}

fn describe(arena: &ExprArena, kind: ExprKind) -> (String, Vec<ExprId>) {
    match kind {
        ExprKind::Number(n) => (format!("Number {n}"), Vec::new()),
        ExprKind::Str(name) => (format!("Str '{}'", arena.name(name)), Vec::new()),
        ExprKind::Path(path) => (format!("Path {}", arena.path_text(path)), Vec::new()),
        ExprKind::Scoped { scope, members } => (
            format!("Scoped {scope}.{}", arena.path_text(members)),
            Vec::new(),
        ),
        ExprKind::Binary { op, left, right } => (format!("Binary {op}"), vec![left, right]),
        ExprKind::Unary { op, operand } => (format!("Unary {op}"), vec![operand]),
        ExprKind::Assign { target, value } => ("Assign".to_string(), vec![target, value]),
        ExprKind::Ternary {
            cond,
            then_branch,
            else_branch,
        } => (
            "Ternary".to_string(),
            vec![cond, then_branch, else_branch],
        ),
        ExprKind::Conditional { cond, then_branch } => {
            ("Conditional".to_string(), vec![cond, then_branch])
        }
        ExprKind::Loop { count, body } => ("Loop".to_string(), vec![count, body]),
        ExprKind::ForEach {
            variable,
            collection,
            body,
        } => ("ForEach".to_string(), vec![variable, collection, body]),
        ExprKind::Block { stmts, tail } => {
            let mut children = arena.get_list(stmts).to_vec();
            children.extend(tail);
            ("Block".to_string(), children)
        }
        ExprKind::Call { callee, args } => {
            let mut children = vec![callee];
            children.extend_from_slice(arena.get_list(args));
            ("Call".to_string(), children)
        }
        ExprKind::MathCall { func, args } => (
            format!("MathCall math.{}", func.name()),
            arena.get_list(args).to_vec(),
        ),
        ExprKind::Index { base, index } => ("Index".to_string(), vec![base, index]),
        ExprKind::Arrow { receiver, body } => ("Arrow".to_string(), vec![receiver, body]),
        ExprKind::Break => ("Break".to_string(), Vec::new()),
        ExprKind::Continue => ("Continue".to_string(), Vec::new()),
        ExprKind::Return(value) => ("Return".to_string(), vec![value]),
    }
}

/// Lex an expression and display the token stream.
pub fn lex_expr(source: &str) {
    match render_tokens(source) {
        Ok(tokens) => print!("{tokens}"),
        Err(e) => {
            eprint!("{}", render_diagnostic(&e.to_diagnostic(), source));
            std::process::exit(1);
        }
    }
}

/// Parse an expression and display its syntax tree.
pub fn parse_expr(source: &str) {
    let tokens = match lex(source) {
        Ok(tokens) => tokens,
        Err(e) => {
            eprint!("{}", render_diagnostic(&e.to_diagnostic(), source));
            std::process::exit(1);
        }
    };
    match parse(&tokens) {
        Ok(program) => {
            println!("Expressions: {}", program.arena.expr_count());
            print!("{}", render_tree(&program.arena, program.root));
        }
        Err(e) => {
            eprint!("{}", render_diagnostic(&e.to_diagnostic(), source));
            std::process::exit(1);
        }
    }
}
