// crates/sysparams-core/src/runtime/registry.rs
// ============================================================================
// Module: Built-in Encoding Registry
// Description: Static charset alias table and shared registry wrapper.
// Purpose: Resolve MySQL and IANA charset names without external tables.
// Dependencies: crate::core, crate::interfaces
// ============================================================================

//! ## Overview
//! [`BuiltinEncodingRegistry`] maps charset names to [`Charset`] handles using
//! a fixed alias table. Lookups are ASCII case-insensitive.

use std::sync::Arc;

use crate::core::Charset;
use crate::core::Decoder;
use crate::interfaces::EncodingRegistry;

// ============================================================================
// SECTION: Alias Table
// ============================================================================

/// Known charset aliases, MySQL names first.
const CHARSET_ALIASES: &[(&str, Charset)] = &[
    ("utf8", Charset::Utf8),
    ("utf8mb3", Charset::Utf8),
    ("utf8mb4", Charset::Utf8),
    ("utf-8", Charset::Utf8),
    ("utf16", Charset::Utf16),
    ("utf-16", Charset::Utf16),
    ("utf-16be", Charset::Utf16),
    ("latin1", Charset::Latin1),
    ("iso-8859-1", Charset::Latin1),
    ("iso8859_1", Charset::Latin1),
    ("ascii", Charset::Ascii),
    ("us-ascii", Charset::Ascii),
];

/// Resolves a charset alias.
fn lookup_alias(name: &str) -> Option<Charset> {
    CHARSET_ALIASES
        .iter()
        .find(|(alias, _)| alias.eq_ignore_ascii_case(name))
        .map(|(_, charset)| *charset)
}

// ============================================================================
// SECTION: Registry
// ============================================================================

/// Registry backed by the built-in alias table.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinEncodingRegistry;

impl EncodingRegistry for BuiltinEncodingRegistry {
    fn lookup_decoder(&self, name: &str) -> Option<Decoder> {
        lookup_alias(name).map(Decoder::new)
    }

    fn lookup_encoding(&self, name: &str) -> Option<Charset> {
        lookup_alias(name)
    }
}

/// Shared encoding registry backed by an `Arc` trait object.
#[derive(Clone)]
pub struct SharedEncodingRegistry {
    /// Inner registry implementation.
    inner: Arc<dyn EncodingRegistry + Send + Sync>,
}

impl SharedEncodingRegistry {
    /// Wraps a registry in a shared, clonable wrapper.
    #[must_use]
    pub fn from_registry(registry: impl EncodingRegistry + Send + Sync + 'static) -> Self {
        Self {
            inner: Arc::new(registry),
        }
    }
}

impl Default for SharedEncodingRegistry {
    fn default() -> Self {
        Self::from_registry(BuiltinEncodingRegistry)
    }
}

impl EncodingRegistry for SharedEncodingRegistry {
    fn lookup_decoder(&self, name: &str) -> Option<Decoder> {
        self.inner.lookup_decoder(name)
    }

    fn lookup_encoding(&self, name: &str) -> Option<Charset> {
        self.inner.lookup_encoding(name)
    }
}
