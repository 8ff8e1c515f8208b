//! Bidirectional broker code / internal symbol resolution.

use parking_lot::RwLock;
use std::collections::HashMap;

use crate::domain::shared::Symbol;

/// Maps broker symbol codes (e.g. `AUD/USD`) to internal symbols
/// (`AUDUSD`) and back.
///
/// The underlying tables are loaded once at startup and never change;
/// resolution results are cached so the hot inbound path avoids
/// re-normalizing codes. The cache is append-only at runtime and safe
/// for concurrent readers.
pub struct SymbolMap {
    to_internal: HashMap<String, Symbol>,
    to_broker: HashMap<Symbol, String>,
    cache: RwLock<HashMap<String, Option<Symbol>>>,
}

impl SymbolMap {
    /// Build the map from (broker code, internal symbol) pairs.
    #[must_use]
    pub fn new(pairs: impl IntoIterator<Item = (String, Symbol)>) -> Self {
        let mut to_internal = HashMap::new();
        let mut to_broker = HashMap::new();
        for (code, symbol) in pairs {
            to_broker.insert(symbol.clone(), code.clone());
            to_internal.insert(code, symbol);
        }
        Self {
            to_internal,
            to_broker,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Resolve a broker code to the internal symbol.
    ///
    /// Misses are cached too, so repeated unknown codes only pay the
    /// lookup once.
    #[must_use]
    pub fn resolve(&self, broker_code: &str) -> Option<Symbol> {
        if let Some(cached) = self.cache.read().get(broker_code) {
            return cached.clone();
        }
        let resolved = self.to_internal.get(broker_code).cloned();
        self.cache
            .write()
            .insert(broker_code.to_string(), resolved.clone());
        resolved
    }

    /// Resolve an internal symbol to its broker code.
    #[must_use]
    pub fn broker_code(&self, symbol: &Symbol) -> Option<&str> {
        self.to_broker.get(symbol).map(String::as_str)
    }

    /// Number of mapped instruments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.to_internal.len()
    }

    /// True when no instruments are mapped.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.to_internal.is_empty()
    }
}

impl std::fmt::Debug for SymbolMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SymbolMap")
            .field("instruments", &self.to_internal.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map() -> SymbolMap {
        SymbolMap::new([
            ("AUD/USD".to_string(), Symbol::new("AUDUSD")),
            ("EUR/USD".to_string(), Symbol::new("EURUSD")),
        ])
    }

    #[test]
    fn resolves_both_directions() {
        let map = map();
        let symbol = map.resolve("AUD/USD").unwrap();
        assert_eq!(symbol, Symbol::new("AUDUSD"));
        assert_eq!(map.broker_code(&symbol), Some("AUD/USD"));
    }

    #[test]
    fn unknown_code_returns_none() {
        let map = map();
        assert!(map.resolve("XAG/USD").is_none());
        // Second lookup hits the negative cache.
        assert!(map.resolve("XAG/USD").is_none());
    }

    #[test]
    fn repeated_resolution_uses_cache() {
        let map = map();
        assert!(map.resolve("EUR/USD").is_some());
        assert!(map.cache.read().contains_key("EUR/USD"));
        assert!(map.resolve("EUR/USD").is_some());
    }
}
