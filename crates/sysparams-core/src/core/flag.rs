// crates/sysparams-core/src/core/flag.rs
// ============================================================================
// Module: Tri-State Flags
// Description: Explicit unset/true/false flag for inheritable booleans.
// Purpose: Keep "not configured" distinct from "configured false".
// Dependencies: serde
// ============================================================================

//! ## Overview
//! [`Flag`] carries a boolean that may not have been configured yet. Readers
//! resolve it against a default at the accessor boundary.

use serde::Deserialize;
use serde::Serialize;

/// Boolean parameter that may be unset.
///
/// # Invariants
/// - `Unset` always resolves to the caller-supplied default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Flag {
    /// No value configured.
    #[default]
    Unset,
    /// Explicitly enabled.
    True,
    /// Explicitly disabled.
    False,
}

impl Flag {
    /// Resolves the flag, falling back to `default` when unset.
    #[must_use]
    pub const fn resolve(self, default: bool) -> bool {
        match self {
            Self::Unset => default,
            Self::True => true,
            Self::False => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Flag;

    #[test]
    fn unset_resolves_to_default_and_explicit_values_win() {
        assert!(Flag::Unset.resolve(true));
        assert!(!Flag::Unset.resolve(false));
        assert!(Flag::True.resolve(false));
        assert!(!Flag::False.resolve(true));
        assert_eq!(Flag::default(), Flag::Unset);
    }
}
