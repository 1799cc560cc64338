//! MoLang compiled expressions and their evaluation.
//!
//! # Usage
//!
//! Compile once, evaluate many times against fresh environments:
//!
//! ```
//! use molang_eval::{Engine, Environment, MapBinding, ScopeKind, Value};
//!
//! let engine = Engine::new();
//! let compiled = engine.compile("variable.speed * 2").unwrap();
//!
//! let mut variables = MapBinding::new().with_value("speed", 1.5);
//! let mut env = Environment::new()
//!     .with_binding(ScopeKind::Variable, &mut variables)
//!     .unwrap();
//! assert_eq!(engine.evaluate(&compiled, &mut env).unwrap(), Value::from(3.0));
//! ```
//!
//! # Architecture
//!
//! - [`compile`]: lexer, parser, resolver, then lowering into an immutable
//!   [`CompiledExpression`]
//! - [`CompilationCache`]: concurrent cache of artifacts keyed by trimmed text
//! - [`Environment`]: per-evaluation host bindings, `temp` storage and random
//!   source
//! - [`Binding`] / [`StructValue`]: the host boundary; absence is `None`
//! - [`Engine`]: cache plus configuration

mod binding;
mod cache;
mod compiled;
mod engine;
mod environment;
pub mod errors;
mod interpreter;
mod operators;
mod value;

pub use binding::{Binding, MapBinding, MapStruct, NativeFn, StructValue};
pub use cache::{CacheStats, CompilationCache};
pub use compiled::CompiledExpression;
pub use engine::{compile, evaluate, Engine, EngineConfig, DEFAULT_MAX_LOOP_ITERATIONS};
pub use environment::Environment;
pub use errors::{BindingError, CompileError, EvalError, RegisterError};
pub use value::Value;

pub use molang_ir::ScopeKind;
