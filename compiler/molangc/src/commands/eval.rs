//! `molang eval`: compile and evaluate one expression.

use molang_eval::{Engine, Environment, EvalError, MapBinding, Value};

use super::{cli_query, host_environment, render_diagnostic, RunOptions};

/// Evaluate `source` and print its value, or its diagnostic and exit 1.
pub fn eval_expr(source: &str, options: &RunOptions) {
    let engine = options.engine();
    let mut query = cli_query();
    let mut variables = MapBinding::new();
    let mut env = match host_environment(options, &mut query, &mut variables) {
        Ok(env) => env,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    };

    match evaluate_line(&engine, &mut env, source) {
        Ok(value) => println!("{value}"),
        Err(rendered) => {
            eprint!("{rendered}");
            std::process::exit(1);
        }
    }
}

/// Compile (through the engine's cache) and evaluate one line.
///
/// Failures come back as a rendered diagnostic.
pub(crate) fn evaluate_line(
    engine: &Engine,
    env: &mut Environment<'_>,
    source: &str,
) -> Result<Value, String> {
    engine
        .eval(source, env)
        .map_err(|e: EvalError| render_diagnostic(&e.to_diagnostic(), source))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_evaluate_line_value() {
        let engine = Engine::new();
        let mut env = Environment::new();
        assert_eq!(
            evaluate_line(&engine, &mut env, "math.clamp(10, 0, 5)"),
            Ok(Value::from(5.0))
        );
    }

    #[test]
    fn test_evaluate_line_renders_diagnostic() {
        let engine = Engine::new();
        let mut env = Environment::new();
        let Err(rendered) = evaluate_line(&engine, &mut env, "  foo.x + 1") else {
            panic!("expected a diagnostic");
        };
        assert!(rendered.starts_with("error[E2001]: unknown scope `foo`"));
        assert!(rendered.contains("1 | foo.x + 1"));
    }
}
