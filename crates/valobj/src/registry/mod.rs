//! Sharded instance registry for uniquing immutable value objects.
//!
//! Maps a structural fingerprint to the weakly-held instances constructed
//! with it. The registry never keeps an instance alive: once the last
//! external handle drops, its entry expires. Expired entries are pruned
//! when their bucket is next written, and a shard sweeps all of its buckets
//! whenever it has doubled in size since the previous sweep.
//!
//! # Thread Safety
//! Uses `RwLock` per shard. A lookup scans under the read lock; a miss takes
//! the write lock and re-scans before inserting, so check-then-insert is
//! atomic per bucket.

use std::sync::{LazyLock, Weak};

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::engine::{self, ValueInstance};
use crate::object::{ImmutableObject, ValueObject};

/// Number of shards.
const NUM_SHARDS: usize = 16;

/// Fingerprints a shard holds before its first full sweep.
const SWEEP_FLOOR: usize = 64;

/// Instances sharing one fingerprint. Collisions are rare, so one inline
/// slot covers the common case.
type Bucket = SmallVec<[Weak<ImmutableObject>; 1]>;

/// Per-shard buckets keyed by fingerprint.
#[derive(Default)]
struct RegistryShard {
    buckets: FxHashMap<u64, Bucket>,
    /// Bucket count left by the last sweep.
    swept_len: usize,
}

impl RegistryShard {
    /// Drop expired entries from every bucket, and buckets left empty, once
    /// the shard has doubled since the last sweep.
    fn maybe_sweep(&mut self) {
        if self.buckets.len() < SWEEP_FLOOR.max(self.swept_len * 2) {
            return;
        }
        let before = self.buckets.len();
        self.buckets.retain(|_, bucket| {
            bucket.retain(|weak| weak.strong_count() > 0);
            !bucket.is_empty()
        });
        self.swept_len = self.buckets.len();
        tracing::trace!(before, after = self.swept_len, "swept registry shard");
    }
}

/// Fingerprint -> weakly-held canonical instances.
pub struct InstanceRegistry {
    shards: [RwLock<RegistryShard>; NUM_SHARDS],
}

impl InstanceRegistry {
    pub fn new() -> Self {
        Self {
            shards: std::array::from_fn(|_| RwLock::new(RegistryShard::default())),
        }
    }

    #[inline]
    fn shard_for(fingerprint: u64) -> usize {
        (fingerprint >> 60) as usize % NUM_SHARDS
    }

    /// The canonical instance equal to `candidate`.
    ///
    /// Instances without a cached hash (classes without a stable hash)
    /// bypass the registry and are returned unchanged.
    pub fn unique_or_register(&self, candidate: ValueObject) -> ValueObject {
        match candidate.cached_hash() {
            Some(fingerprint) => self.unique_with_fingerprint(fingerprint, candidate),
            None => candidate,
        }
    }

    /// Unique `candidate` within the bucket for `fingerprint`.
    ///
    /// Every match is re-verified with structural equality, so colliding
    /// but unequal instances coexist in one bucket.
    pub(crate) fn unique_with_fingerprint(
        &self,
        fingerprint: u64,
        candidate: ValueObject,
    ) -> ValueObject {
        let shard = &self.shards[Self::shard_for(fingerprint)];

        // Fast path: an equal instance is already registered
        {
            let guard = shard.read();
            if let Some(existing) = guard
                .buckets
                .get(&fingerprint)
                .and_then(|bucket| find_equal(bucket, &candidate))
            {
                tracing::trace!(fingerprint, "uniquing hit");
                return existing;
            }
        }

        let mut guard = shard.write();
        guard.maybe_sweep();
        let bucket = guard.buckets.entry(fingerprint).or_default();

        // Prune expired entries, then double-check under the write lock
        bucket.retain(|weak| weak.strong_count() > 0);
        if let Some(existing) = find_equal(bucket, &candidate) {
            tracing::trace!(fingerprint, "uniquing hit");
            return existing;
        }

        bucket.push(candidate.downgrade());
        tracing::trace!(fingerprint, bucket_len = bucket.len(), "registered new instance");
        candidate
    }

    /// Registered entries whose instance is still alive.
    pub fn live_count(&self) -> usize {
        self.shards
            .iter()
            .map(|shard| {
                shard
                    .read()
                    .buckets
                    .values()
                    .flat_map(|bucket| bucket.iter())
                    .filter(|weak| weak.strong_count() > 0)
                    .count()
            })
            .sum()
    }

    /// Fingerprints currently held across all shards, including those whose
    /// entries have expired but not yet been swept.
    pub fn fingerprint_count(&self) -> usize {
        self.shards.iter().map(|shard| shard.read().buckets.len()).sum()
    }

    /// Entries stored under `fingerprint`, including expired ones not yet
    /// pruned.
    pub fn bucket_len(&self, fingerprint: u64) -> usize {
        self.shards[Self::shard_for(fingerprint)]
            .read()
            .buckets
            .get(&fingerprint)
            .map_or(0, SmallVec::len)
    }
}

impl Default for InstanceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn find_equal(bucket: &Bucket, candidate: &ValueObject) -> Option<ValueObject> {
    bucket
        .iter()
        .filter_map(Weak::upgrade)
        .map(ValueObject::from_arc)
        .find(|existing| engine::equals(existing, candidate))
}

static INSTANCES: LazyLock<InstanceRegistry> = LazyLock::new(InstanceRegistry::new);

/// The process-wide instance registry.
pub fn instance_registry() -> &'static InstanceRegistry {
    &INSTANCES
}
