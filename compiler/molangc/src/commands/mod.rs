//! Command handlers for the `molang` CLI.
//!
//! Each submodule implements one subcommand. Option parsing and the host
//! bindings every evaluating command shares live here in the module root.

use std::num::NonZeroUsize;

use molang_diagnostic::emitter::render;
use molang_diagnostic::Diagnostic;
use molang_eval::{
    Engine, EngineConfig, Environment, MapBinding, RegisterError, ScopeKind, Value,
};

mod debug;
mod eval;
mod golden;
mod repl;

pub use debug::{lex_expr, parse_expr, render_tokens, render_tree};
pub use eval::eval_expr;
pub use golden::{render_golden, run_golden, GOLDEN_HEADER};
pub use repl::{run_repl, run_repl_on};

/// Engine and environment settings shared by `eval`, `repl` and `golden`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Bound on cached artifacts; unbounded when absent.
    pub cache_capacity: Option<NonZeroUsize>,
    /// Overrides the engine's default loop cap.
    pub max_loop_iterations: Option<u32>,
    /// Seed for `math.random*`; fresh entropy when absent.
    pub seed: Option<u64>,
}

impl RunOptions {
    pub fn engine_config(&self) -> EngineConfig {
        let defaults = EngineConfig::default();
        EngineConfig {
            cache_capacity: self.cache_capacity,
            max_loop_iterations: self
                .max_loop_iterations
                .unwrap_or(defaults.max_loop_iterations),
        }
    }

    pub fn engine(&self) -> Engine {
        Engine::with_config(self.engine_config())
    }

    pub fn environment<'a>(&self) -> Environment<'a> {
        match self.seed {
            Some(seed) => Environment::with_seed(seed),
            None => Environment::new(),
        }
    }
}

/// Split run options from positional arguments.
///
/// Unrecognized or malformed `--` options are reported and skipped.
pub fn parse_run_options(args: &[String]) -> (RunOptions, Vec<String>) {
    let mut options = RunOptions::default();
    let mut positional = Vec::new();

    for arg in args {
        if let Some(value) = arg.strip_prefix("--cache-capacity=") {
            match value.parse::<NonZeroUsize>() {
                Ok(capacity) => options.cache_capacity = Some(capacity),
                Err(_) => {
                    eprintln!("warning: invalid cache capacity '{value}', cache is unbounded");
                }
            }
        } else if let Some(value) = arg.strip_prefix("--max-loop-iterations=") {
            match value.parse::<u32>() {
                Ok(max) => options.max_loop_iterations = Some(max),
                Err(_) => {
                    eprintln!("warning: invalid loop cap '{value}', using the default");
                }
            }
        } else if let Some(value) = arg.strip_prefix("--seed=") {
            match value.parse::<u64>() {
                Ok(seed) => options.seed = Some(seed),
                Err(_) => eprintln!("warning: invalid seed '{value}', ignoring"),
            }
        } else if arg.starts_with("--") {
            eprintln!("warning: unknown option '{arg}'");
        } else {
            positional.push(arg.clone());
        }
    }

    (options, positional)
}

/// The CLI's `query` scope: `query.log(...)` prints its arguments.
pub(crate) fn cli_query() -> MapBinding {
    MapBinding::new().with_function("log", |args| {
        let line: Vec<String> = args.iter().map(ToString::to_string).collect();
        println!("{}", line.join(" "));
        Value::Void
    })
}

/// An environment with `query` and `variable` bound to host maps.
pub(crate) fn host_environment<'a>(
    options: &RunOptions,
    query: &'a mut MapBinding,
    variables: &'a mut MapBinding,
) -> Result<Environment<'a>, RegisterError> {
    options
        .environment()
        .with_binding(ScopeKind::Query, query)?
        .with_binding(ScopeKind::Variable, variables)
}

/// Render a diagnostic against the expression it was reported for.
pub(crate) fn render_diagnostic(diagnostic: &Diagnostic, source: &str) -> String {
    render(diagnostic, source.trim())
}

/// Read a file, exiting with a message on failure.
pub(super) fn read_file(path: &str) -> String {
    match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            let msg = match e.kind() {
                std::io::ErrorKind::NotFound => format!("cannot find file '{path}'"),
                std::io::ErrorKind::PermissionDenied => {
                    format!("permission denied reading '{path}'")
                }
                std::io::ErrorKind::InvalidData => {
                    format!("'{path}' contains invalid UTF-8 data")
                }
                _ => format!("error reading '{path}': {e}"),
            };
            eprintln!("{msg}");
            std::process::exit(1);
        }
    }
}
