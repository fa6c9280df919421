use std::collections::BTreeMap;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use lru::LruCache;
use tracing::{debug, warn};

use crate::certifiers::seed::Seed;
use crate::error::{Error, Result};
use crate::types::Hash;

/// Untrusted source of historical seeds, queryable by height or by the hash
/// of the validator set a seed can update to.
///
/// `get_by_height` may return the closest seed at or below the requested
/// height when the exact one is unavailable. Callers re-verify everything a
/// provider returns; a provider is an input channel, never a trust anchor.
/// Implementations own their blocking behavior (network deadlines map to
/// `Io` or `SeedNotFound`).
pub trait Provider: Send + Sync {
    fn get_by_height(&self, height: u64) -> Result<Seed>;
    fn get_by_hash(&self, hash: &Hash) -> Result<Seed>;
    /// Persist a verified seed for future queries. Last write wins; seeds
    /// are self-describing and idempotently re-derivable.
    fn store_seed(&self, seed: &Seed) -> Result<()>;
}

/// In-memory provider. Doubles as the mock provider in tests.
pub struct MemProvider {
    inner: Mutex<MemInner>,
}

struct MemInner {
    by_height: BTreeMap<u64, Seed>,
    by_hash: LruCache<Hash, u64>,
}

impl MemProvider {
    pub fn new() -> Self {
        Self::with_capacity(1024)
    }

    pub fn with_capacity(hash_index: usize) -> Self {
        let cap = NonZeroUsize::new(hash_index.max(1)).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner: Mutex::new(MemInner {
                by_height: BTreeMap::new(),
                by_hash: LruCache::new(cap),
            }),
        }
    }
}

impl Default for MemProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl Provider for MemProvider {
    fn get_by_height(&self, height: u64) -> Result<Seed> {
        let inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        // closest seed at or below the requested height
        inner
            .by_height
            .range(..=height)
            .next_back()
            .map(|(_, s)| s.clone())
            .ok_or(Error::SeedNotFound)
    }

    fn get_by_hash(&self, hash: &Hash) -> Result<Seed> {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        let height = *inner.by_hash.get(hash).ok_or(Error::SeedNotFound)?;
        inner
            .by_height
            .get(&height)
            .cloned()
            .ok_or(Error::SeedNotFound)
    }

    fn store_seed(&self, seed: &Seed) -> Result<()> {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.by_hash.put(seed.hash(), seed.height());
        inner.by_height.insert(seed.height(), seed.clone());
        Ok(())
    }
}

/// Directory of binary seed files, one per height, named by zero-padded
/// height so lexical order is height order.
pub struct FileProvider {
    dir: PathBuf,
}

impl FileProvider {
    pub fn new(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn seed_path(&self, height: u64) -> PathBuf {
        self.dir.join(format!("{:020}.seed", height))
    }

    /// Heights available on disk, ascending.
    fn heights(&self) -> Result<Vec<u64>> {
        let mut out = Vec::new();
        for entry in std::fs::read_dir(&self.dir)? {
            let name = entry?.file_name();
            let name = name.to_string_lossy();
            if let Some(stem) = name.strip_suffix(".seed") {
                if let Ok(h) = stem.parse::<u64>() {
                    out.push(h);
                }
            }
        }
        out.sort_unstable();
        Ok(out)
    }
}

impl Provider for FileProvider {
    fn get_by_height(&self, height: u64) -> Result<Seed> {
        // exact hit first, then walk down to the closest lower height
        match Seed::load(&self.seed_path(height)) {
            Err(Error::SeedNotFound) => {}
            other => return other,
        }
        let heights = self.heights()?;
        let below = heights
            .iter()
            .rev()
            .find(|h| **h <= height)
            .ok_or(Error::SeedNotFound)?;
        Seed::load(&self.seed_path(*below))
    }

    fn get_by_hash(&self, hash: &Hash) -> Result<Seed> {
        for h in self.heights()? {
            match Seed::load(&self.seed_path(h)) {
                Ok(seed) if &seed.hash() == hash => return Ok(seed),
                Ok(_) => {}
                Err(e) => {
                    warn!(height = h, error = %e, "skipping unreadable seed file");
                }
            }
        }
        Err(Error::SeedNotFound)
    }

    fn store_seed(&self, seed: &Seed) -> Result<()> {
        seed.write(&self.seed_path(seed.height()))
    }
}

/// Layers a fast writable cache over a slower source. Reads hit the cache
/// first and populate it on a source hit; writes go to both.
pub struct CacheProvider<C, S> {
    cache: C,
    source: S,
}

impl<C: Provider, S: Provider> CacheProvider<C, S> {
    pub fn new(cache: C, source: S) -> Self {
        Self { cache, source }
    }
}

impl<C: Provider, S: Provider> Provider for CacheProvider<C, S> {
    fn get_by_height(&self, height: u64) -> Result<Seed> {
        // an inexact (lower) cached seed is no reason to skip the source,
        // which may hold the exact height
        if let Ok(seed) = self.cache.get_by_height(height) {
            if seed.height() == height {
                return Ok(seed);
            }
        }
        match self.source.get_by_height(height) {
            Ok(seed) => {
                if let Err(e) = self.cache.store_seed(&seed) {
                    debug!(error = %e, "seed cache write failed");
                }
                Ok(seed)
            }
            Err(Error::SeedNotFound) => self.cache.get_by_height(height),
            Err(e) => Err(e),
        }
    }

    fn get_by_hash(&self, hash: &Hash) -> Result<Seed> {
        match self.cache.get_by_hash(hash) {
            Ok(seed) => Ok(seed),
            Err(_) => {
                let seed = self.source.get_by_hash(hash)?;
                if let Err(e) = self.cache.store_seed(&seed) {
                    debug!(error = %e, "seed cache write failed");
                }
                Ok(seed)
            }
        }
    }

    fn store_seed(&self, seed: &Seed) -> Result<()> {
        let cached = self.cache.store_seed(seed);
        self.source.store_seed(seed)?;
        cached
    }
}
