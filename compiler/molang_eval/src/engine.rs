//! The compile pipeline and the [`Engine`] that owns a compilation cache.

use std::num::NonZeroUsize;
use std::time::Instant;

use tracing::debug;

use crate::cache::CompilationCache;
use crate::compiled::CompiledExpression;
use crate::errors::{BindingError, CompileError, EvalError};
use crate::{interpreter, Environment, Value};

/// Default upper bound on iterations of a single `loop` or `for_each`.
pub const DEFAULT_MAX_LOOP_ITERATIONS: u32 = 1024;

/// Compile source text: lex, parse, resolve and lower. Not cached.
///
/// Surrounding whitespace is ignored, so spans in the returned errors are
/// relative to the trimmed text.
pub fn compile(source: &str) -> Result<CompiledExpression, CompileError> {
    let source = source.trim();
    let start = Instant::now();
    let tokens = molang_lexer::lex(source)?;
    let parsed = molang_parse::parse(&tokens)?;
    let resolved = molang_resolve::resolve(parsed)?;
    let compiled = CompiledExpression::lower(source, &resolved);
    debug!(
        source,
        tokens = tokens.len(),
        elapsed_us = u64::try_from(start.elapsed().as_micros()).unwrap_or(u64::MAX),
        "compiled"
    );
    Ok(compiled)
}

/// Evaluate with the default loop cap.
///
/// `loop` and `for_each` stop after [`DEFAULT_MAX_LOOP_ITERATIONS`] (1024)
/// iterations even when the count asks for more. Use an [`Engine`] built with
/// [`Engine::with_config`] to raise or lower the cap.
pub fn evaluate(
    compiled: &CompiledExpression,
    env: &mut Environment<'_>,
) -> Result<Value, BindingError> {
    interpreter::run(compiled, env, DEFAULT_MAX_LOOP_ITERATIONS)
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct EngineConfig {
    /// Maximum number of cached artifacts; `None` keeps everything.
    pub cache_capacity: Option<NonZeroUsize>,
    pub max_loop_iterations: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            cache_capacity: None,
            max_loop_iterations: DEFAULT_MAX_LOOP_ITERATIONS,
        }
    }
}

/// Compiles through a shared cache and evaluates with one configuration.
///
/// `Engine` is `Send + Sync`; share it by reference or `Arc` and give each
/// evaluating thread its own [`Environment`].
#[derive(Debug, Default)]
pub struct Engine {
    config: EngineConfig,
    cache: CompilationCache,
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Engine {
            config,
            cache: CompilationCache::with_capacity(config.cache_capacity),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Compile through the cache.
    pub fn compile(&self, source: &str) -> Result<CompiledExpression, CompileError> {
        self.cache.get_or_compile(source)
    }

    /// Compile without consulting or filling the cache.
    pub fn compile_uncached(&self, source: &str) -> Result<CompiledExpression, CompileError> {
        compile(source)
    }

    pub fn evaluate(
        &self,
        compiled: &CompiledExpression,
        env: &mut Environment<'_>,
    ) -> Result<Value, BindingError> {
        interpreter::run(compiled, env, self.config.max_loop_iterations)
    }

    /// Compile (cached) and evaluate in one call.
    pub fn eval(&self, source: &str, env: &mut Environment<'_>) -> Result<Value, EvalError> {
        let compiled = self.compile(source)?;
        Ok(self.evaluate(&compiled, env)?)
    }

    pub fn cache(&self) -> &CompilationCache {
        &self.cache
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
    }
}
