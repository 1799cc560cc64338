//! The closed scope vocabulary.

use std::fmt;

/// Namespace selected by the first segment of an identifier chain.
///
/// The set is fixed at compile time. Host scopes are backed by a binding the
/// embedder registers per evaluation; `temp` is engine-owned scratch storage
/// and `math` is the built-in function table.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ScopeKind {
    Query,
    Variable,
    Context,
    Global,
    Temp,
    Math,
}

impl ScopeKind {
    /// Scopes whose members are supplied by the host.
    pub const HOST: [ScopeKind; 4] = [
        ScopeKind::Query,
        ScopeKind::Variable,
        ScopeKind::Context,
        ScopeKind::Global,
    ];

    /// Look up a scope by its (lower-cased) name or short alias.
    pub fn from_name(name: &str) -> Option<ScopeKind> {
        match name {
            "query" | "q" => Some(ScopeKind::Query),
            "variable" | "v" => Some(ScopeKind::Variable),
            "context" | "c" => Some(ScopeKind::Context),
            "global" => Some(ScopeKind::Global),
            "temp" | "t" => Some(ScopeKind::Temp),
            "math" => Some(ScopeKind::Math),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ScopeKind::Query => "query",
            ScopeKind::Variable => "variable",
            ScopeKind::Context => "context",
            ScopeKind::Global => "global",
            ScopeKind::Temp => "temp",
            ScopeKind::Math => "math",
        }
    }

    /// Slot index into a per-evaluation binding table, for host scopes only.
    pub fn host_slot(self) -> Option<usize> {
        match self {
            ScopeKind::Query => Some(0),
            ScopeKind::Variable => Some(1),
            ScopeKind::Context => Some(2),
            ScopeKind::Global => Some(3),
            ScopeKind::Temp | ScopeKind::Math => None,
        }
    }

    /// Whether expressions may assign into this scope.
    pub fn is_writable(self) -> bool {
        !matches!(self, ScopeKind::Math)
    }
}

impl fmt::Display for ScopeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aliases() {
        assert_eq!(ScopeKind::from_name("q"), Some(ScopeKind::Query));
        assert_eq!(ScopeKind::from_name("variable"), Some(ScopeKind::Variable));
        assert_eq!(ScopeKind::from_name("t"), Some(ScopeKind::Temp));
        assert_eq!(ScopeKind::from_name("c"), Some(ScopeKind::Context));
        assert_eq!(ScopeKind::from_name("g"), None);
        assert_eq!(ScopeKind::from_name("unknown_scope"), None);
    }

    #[test]
    fn test_host_slots_are_distinct() {
        let slots: Vec<_> = ScopeKind::HOST.iter().filter_map(|s| s.host_slot()).collect();
        assert_eq!(slots, vec![0, 1, 2, 3]);
        assert_eq!(ScopeKind::Temp.host_slot(), None);
        assert_eq!(ScopeKind::Math.host_slot(), None);
    }

    #[test]
    fn test_name_round_trip() {
        for scope in [
            ScopeKind::Query,
            ScopeKind::Variable,
            ScopeKind::Context,
            ScopeKind::Global,
            ScopeKind::Temp,
            ScopeKind::Math,
        ] {
            assert_eq!(ScopeKind::from_name(scope.name()), Some(scope));
        }
    }
}
