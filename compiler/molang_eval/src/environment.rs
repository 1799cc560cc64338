//! Per-evaluation state: the host binding table, `temp` storage and the
//! random source.

use std::fmt;
use std::sync::Arc;

use molang_ir::{RandomSource, ScopeKind};
use rustc_hash::FxHashMap;

use crate::binding::Binding;
use crate::errors::RegisterError;
use crate::Value;

struct EnvRng(fastrand::Rng);

impl RandomSource for EnvRng {
    fn next_f64(&mut self) -> f64 {
        self.0.f64()
    }
}

/// State for one evaluation.
///
/// Bindings are borrowed from the host for the lifetime `'a`; the engine never
/// keeps them past the environment. `temp` storage is cleared at the start of
/// every evaluation and can be inspected afterwards.
pub struct Environment<'a> {
    bindings: [Option<&'a mut dyn Binding>; 4],
    temps: FxHashMap<Arc<str>, Value>,
    rng: EnvRng,
}

impl<'a> Environment<'a> {
    pub fn new() -> Self {
        Self::from_rng(fastrand::Rng::new())
    }

    /// An environment whose `math.random*` sequence is reproducible.
    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(fastrand::Rng::with_seed(seed))
    }

    fn from_rng(rng: fastrand::Rng) -> Self {
        Environment {
            bindings: [None, None, None, None],
            temps: FxHashMap::default(),
            rng: EnvRng(rng),
        }
    }

    /// Bind a host scope for this evaluation, replacing any earlier binding.
    /// `temp` and `math` belong to the engine and are rejected.
    pub fn register_binding(
        &mut self,
        scope: ScopeKind,
        binding: &'a mut dyn Binding,
    ) -> Result<(), RegisterError> {
        let Some(slot) = scope.host_slot() else {
            return Err(RegisterError::EngineOwned(scope));
        };
        self.bindings[slot] = Some(binding);
        Ok(())
    }

    /// Builder form of [`register_binding`](Self::register_binding).
    pub fn with_binding(
        mut self,
        scope: ScopeKind,
        binding: &'a mut dyn Binding,
    ) -> Result<Self, RegisterError> {
        self.register_binding(scope, binding)?;
        Ok(self)
    }

    pub fn is_bound(&self, scope: ScopeKind) -> bool {
        scope
            .host_slot()
            .is_some_and(|slot| self.bindings[slot].is_some())
    }

    pub(crate) fn binding(&self, scope: ScopeKind) -> Option<&(dyn Binding + 'a)> {
        let slot = scope.host_slot()?;
        self.bindings[slot].as_deref()
    }

    pub(crate) fn binding_mut(&mut self, scope: ScopeKind) -> Option<&mut (dyn Binding + 'a)> {
        let slot = scope.host_slot()?;
        self.bindings[slot].as_deref_mut()
    }

    /// Value of a `temp` variable left by the last evaluation.
    pub fn temp(&self, name: &str) -> Option<&Value> {
        self.temps.get(name)
    }

    pub(crate) fn set_temp(&mut self, name: Arc<str>, value: Value) {
        self.temps.insert(name, value);
    }

    pub(crate) fn clear_temps(&mut self) {
        self.temps.clear();
    }

    pub(crate) fn rng(&mut self) -> &mut dyn RandomSource {
        &mut self.rng
    }
}

impl Default for Environment<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Environment<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bound: Vec<ScopeKind> = ScopeKind::HOST
            .into_iter()
            .filter(|scope| self.is_bound(*scope))
            .collect();
        f.debug_struct("Environment")
            .field("bound", &bound)
            .field("temps", &self.temps)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::MapBinding;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_register_host_scopes() {
        let mut variables = MapBinding::new().with_value("x", 2.0);
        let mut env = Environment::new();
        env.register_binding(ScopeKind::Variable, &mut variables)
            .unwrap();
        assert!(env.is_bound(ScopeKind::Variable));
        assert!(!env.is_bound(ScopeKind::Query));
        assert_eq!(
            env.binding(ScopeKind::Variable).and_then(|b| b.get("x")),
            Some(Value::from(2.0))
        );
    }

    #[test]
    fn test_engine_owned_scopes_are_rejected() {
        let mut binding = MapBinding::new();
        let mut env = Environment::new();
        assert_eq!(
            env.register_binding(ScopeKind::Temp, &mut binding),
            Err(RegisterError::EngineOwned(ScopeKind::Temp))
        );
        let mut other = MapBinding::new();
        assert_eq!(
            Environment::new()
                .with_binding(ScopeKind::Math, &mut other)
                .err(),
            Some(RegisterError::EngineOwned(ScopeKind::Math))
        );
    }

    #[test]
    fn test_seeded_random_is_reproducible() {
        let mut a = Environment::with_seed(7);
        let mut b = Environment::with_seed(7);
        let xs: Vec<f64> = (0..4).map(|_| a.rng().next_f64()).collect();
        let ys: Vec<f64> = (0..4).map(|_| b.rng().next_f64()).collect();
        assert_eq!(xs, ys);
        assert!(xs.iter().all(|x| (0.0..1.0).contains(x)));
    }

    #[test]
    fn test_temps() {
        let mut env = Environment::new();
        env.set_temp(Arc::from("x"), Value::from(3.0));
        assert_eq!(env.temp("x"), Some(&Value::from(3.0)));
        env.clear_temps();
        assert_eq!(env.temp("x"), None);
    }
}
