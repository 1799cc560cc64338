//! `molang golden`: render expected results for a fixture file.
//!
//! A fixture holds one expression per line; blank lines and lines starting
//! with `#` are skipped. Every expression gets its own environment, so no
//! state leaks between records. Each record is a `# <expr> ` line (note the
//! trailing space) followed by the result, matching existing MoLang
//! expectation files.

use std::path::Path;

use molang_eval::{Engine, MapBinding};
use tracing::debug;

use super::{host_environment, read_file, RunOptions};

/// First line of every generated golden file.
pub const GOLDEN_HEADER: &str = "# molang golden output; regenerate with `molang golden`\n";

/// Seed used when none is given, so `math.random*` output is reproducible.
const DEFAULT_GOLDEN_SEED: u64 = 0;

/// Render the golden file for `fixture`.
pub fn render_golden(engine: &Engine, options: &RunOptions, fixture: &str) -> String {
    let options = RunOptions {
        seed: Some(options.seed.unwrap_or(DEFAULT_GOLDEN_SEED)),
        ..options.clone()
    };
    let mut out = String::from(GOLDEN_HEADER);
    let mut records = 0usize;

    for expression in fixture
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
    {
        let mut query = MapBinding::new();
        let mut variables = MapBinding::new();
        let result = match host_environment(&options, &mut query, &mut variables) {
            Ok(mut env) => engine.eval(expression, &mut env).map_err(|e| e.to_string()),
            Err(e) => Err(e.to_string()),
        };

        out.push('\n');
        out.push_str("# ");
        out.push_str(expression);
        out.push_str(" \n");
        match result {
            Ok(value) => out.push_str(&value.to_string()),
            Err(message) => {
                out.push_str("error: ");
                out.push_str(&message);
            }
        }
        out.push('\n');
        records += 1;
    }

    debug!(records, "rendered golden file");
    out
}

/// Render `fixture_path` and write it to `output`, or stdout when absent.
pub fn run_golden(fixture_path: &str, output: Option<&Path>, options: &RunOptions) {
    let fixture = read_file(fixture_path);
    let engine = options.engine();
    let rendered = render_golden(&engine, options, &fixture);

    match output {
        Some(path) => {
            if let Err(e) = std::fs::write(path, rendered) {
                eprintln!("error writing '{}': {e}", path.display());
                std::process::exit(1);
            }
        }
        None => print!("{rendered}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_golden_format() {
        let fixture = "\
# arithmetic
1 + 2 * 3

  math.clamp(10, 0, 5)
'a' + 'b'
unknown_scope.x
t.x = 4; return t.x;
";
        let rendered = render_golden(&Engine::new(), &RunOptions::default(), fixture);
        let expected = [
            GOLDEN_HEADER,
            "\n# 1 + 2 * 3 \n7\n",
            "\n# math.clamp(10, 0, 5) \n5\n",
            "\n# 'a' + 'b' \nab\n",
            "\n# unknown_scope.x \nerror: unknown scope `unknown_scope`\n",
            "\n# t.x = 4; return t.x; \n4\n",
        ]
        .concat();
        assert_eq!(rendered, expected);
    }

    #[test]
    fn test_golden_records_are_independent() {
        let fixture = "v.x = 3\nv.x\n";
        let rendered = render_golden(&Engine::new(), &RunOptions::default(), fixture);
        assert!(rendered.ends_with("# v.x \n0\n"));
    }

    #[test]
    fn test_golden_random_is_reproducible() {
        let fixture = "math.random(0, 100)\nmath.die_roll(3, 1, 6)\n";
        let first = render_golden(&Engine::new(), &RunOptions::default(), fixture);
        let second = render_golden(&Engine::new(), &RunOptions::default(), fixture);
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_fixture_is_header_only() {
        let rendered = render_golden(&Engine::new(), &RunOptions::default(), "# nothing\n\n");
        assert_eq!(rendered, GOLDEN_HEADER);
    }
}
