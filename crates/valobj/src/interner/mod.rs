//! Sharded symbol table for field, class, and selector names.
//!
//! Provides O(1) interning and lookup with thread-safe concurrent access
//! via per-shard locking. Every descriptor, class, and setter table in the
//! crate keys its names by [`Symbol`], so a single process-wide table backs
//! them all.

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::LazyLock;

use crate::Symbol;

/// Per-shard storage for interned strings.
struct SymbolShard {
    /// Map from string content to local index.
    map: FxHashMap<&'static str, u32>,
    /// Storage for string contents.
    strings: Vec<&'static str>,
}

/// Error when interning a string fails.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InternError {
    /// Shard exceeded the 28-bit local index space.
    #[error("symbol shard {shard_idx} exceeded capacity: {count} strings, max is {max}", max = Symbol::MAX_LOCAL)]
    ShardOverflow { shard_idx: usize, count: usize },
}

impl SymbolShard {
    fn new() -> Self {
        Self {
            map: FxHashMap::default(),
            strings: Vec::with_capacity(64),
        }
    }

    fn with_empty() -> Self {
        let mut shard = Self::new();
        // Pre-intern empty string at index 0
        let empty: &'static str = "";
        shard.map.insert(empty, 0);
        shard.strings.push(empty);
        shard
    }
}

/// Sharded string interner for concurrent access.
///
/// # Thread Safety
/// Uses `RwLock` per shard; readers of already-interned names never block
/// each other.
pub struct SymbolTable {
    shards: [RwLock<SymbolShard>; Symbol::NUM_SHARDS],
    /// Total count of interned strings across all shards (O(1) `len()`).
    total_count: AtomicUsize,
}

impl SymbolTable {
    /// Create a table holding only the empty string.
    pub fn new() -> Self {
        let shards = std::array::from_fn(|i| {
            if i == 0 {
                RwLock::new(SymbolShard::with_empty())
            } else {
                RwLock::new(SymbolShard::new())
            }
        });

        Self {
            shards,
            total_count: AtomicUsize::new(1),
        }
    }

    /// Compute shard for a string based on its hash.
    #[inline]
    fn shard_for(s: &str) -> usize {
        if s.is_empty() {
            return 0;
        }
        let mut hash = 0u32;
        for byte in s.bytes().take(8) {
            hash = hash.wrapping_mul(31).wrapping_add(u32::from(byte));
        }
        (hash as usize) % Symbol::NUM_SHARDS
    }

    /// Try to intern a string, returning its Symbol or an error on overflow.
    pub fn try_intern(&self, s: &str) -> Result<Symbol, InternError> {
        let shard_idx = Self::shard_for(s);
        let shard_idx_u32 = shard_idx as u32;
        let shard = &self.shards[shard_idx];

        // Fast path: check if already interned
        {
            let guard = shard.read();
            if let Some(&local) = guard.map.get(s) {
                return Ok(Symbol::new(shard_idx_u32, local));
            }
        }

        let mut guard = shard.write();

        // Double-check after acquiring write lock
        if let Some(&local) = guard.map.get(s) {
            return Ok(Symbol::new(shard_idx_u32, local));
        }

        let count = guard.strings.len();
        let local = u32::try_from(count)
            .ok()
            .filter(|&local| local <= Symbol::MAX_LOCAL)
            .ok_or(InternError::ShardOverflow { shard_idx, count })?;

        // Leak the string to get 'static lifetime
        let leaked: &'static str = Box::leak(s.to_owned().into_boxed_str());
        guard.strings.push(leaked);
        guard.map.insert(leaked, local);

        self.total_count.fetch_add(1, Ordering::Relaxed);

        Ok(Symbol::new(shard_idx_u32, local))
    }

    /// Intern a string, returning its Symbol.
    ///
    /// # Panics
    /// Panics if a shard exceeds its capacity. Use `try_intern` for
    /// fallible interning.
    #[inline]
    pub fn intern(&self, s: &str) -> Symbol {
        self.try_intern(s).unwrap_or_else(|e| panic!("{e}"))
    }

    /// Look up an already-interned string without inserting it.
    pub fn get(&self, s: &str) -> Option<Symbol> {
        let shard_idx = Self::shard_for(s);
        let guard = self.shards[shard_idx].read();
        guard
            .map
            .get(s)
            .map(|&local| Symbol::new(shard_idx as u32, local))
    }

    /// Look up the string for a Symbol.
    ///
    /// All interned strings are leaked, so the result is `'static`.
    pub fn lookup(&self, symbol: Symbol) -> &'static str {
        let guard = self.shards[symbol.shard()].read();
        guard.strings.get(symbol.local()).copied().unwrap_or("<unknown>")
    }

    /// Get the number of interned strings (O(1)).
    pub fn len(&self) -> usize {
        self.total_count.load(Ordering::Relaxed)
    }

    /// Check if the table is empty (only has the empty string).
    pub fn is_empty(&self) -> bool {
        self.len() <= 1
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

static SYMBOLS: LazyLock<SymbolTable> = LazyLock::new(SymbolTable::new);

/// The process-wide symbol table.
pub fn symbols() -> &'static SymbolTable {
    &SYMBOLS
}
