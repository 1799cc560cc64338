//! `molang repl`: one expression per input line.
//!
//! `variable` persists across lines; `temp` does not.

use std::io::{self, BufRead, Write};

use molang_eval::{Engine, MapBinding};
use tracing::debug;

use super::eval::evaluate_line;
use super::{cli_query, host_environment, RunOptions};

/// Run the REPL on stdin and stdout until end of input.
pub fn run_repl(options: &RunOptions) {
    let engine = options.engine();
    let stdin = io::stdin();
    let stdout = io::stdout();
    if let Err(e) = run_repl_on(&engine, options, stdin.lock(), stdout.lock()) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

/// Evaluate each non-empty line of `input`, writing `>>> <value>` or the
/// rendered diagnostic to `output`.
pub fn run_repl_on<R: BufRead, W: Write>(
    engine: &Engine,
    options: &RunOptions,
    input: R,
    mut output: W,
) -> io::Result<()> {
    let mut query = cli_query();
    let mut variables = MapBinding::new();
    let mut env = host_environment(options, &mut query, &mut variables).map_err(io::Error::other)?;

    let mut evaluated = 0usize;
    for line in input.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match evaluate_line(engine, &mut env, &line) {
            Ok(value) => writeln!(output, ">>> {value}")?,
            Err(rendered) => write!(output, "{rendered}")?,
        }
        output.flush()?;
        evaluated += 1;
    }
    debug!(evaluated, "repl input exhausted");
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn session(input: &str) -> String {
        let engine = Engine::new();
        let mut output = Vec::new();
        run_repl_on(&engine, &RunOptions::default(), input.as_bytes(), &mut output).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_variables_persist_across_lines() {
        let output = session("v.speed = 2\n\nv.speed * 3\nmath.sqrt(16)\n");
        assert_eq!(output, ">>> 2\n>>> 6\n>>> 4\n");
    }

    #[test]
    fn test_temps_reset_per_line() {
        let output = session("t.x = 5\nt.x\n");
        assert_eq!(output, ">>> 5\n>>> 0\n");
    }

    #[test]
    fn test_errors_do_not_end_the_session() {
        let output = session("math.clamp(1, 2)\n1 + 1\n");
        assert!(output.starts_with("error[E2004]: `math.clamp` expects 3 argument(s), found 2"));
        assert!(output.ends_with(">>> 2\n"));
    }
}
