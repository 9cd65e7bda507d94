use std::mem;

use tracing::{debug, trace};

use crate::distance;
use crate::error::{IndexError, Result};
use crate::index::bucket::PagedBucket;
use crate::index::keytable::{ChainedKeyTable, SENTINEL};
use crate::index::masks::build_mask_table;
use crate::index::store::PagedBlobStore;
use crate::index::{
    IndexParams, MultiIndex, ITEM_SIZE_ALIGNMENT, NUM_WORD_VALUES, WORD_BITS, WORD_BYTES,
};
use crate::popcnt::PopcountBackend;

impl MultiIndex {
    /// Constructs an index for items of `item_bytes` bytes with the
    /// default parameters. The default hash directory is sized for
    /// corpora around 10^8 items; pass [`MultiIndex::with_params`] a
    /// smaller [`IndexParams::hash_table_size`] for small datasets.
    pub fn new(item_bytes: usize) -> Result<Self> {
        Self::with_params(item_bytes, IndexParams::default())
    }

    /// Constructs an index with explicit parameters and an
    /// auto-detected popcount backend.
    pub fn with_params(item_bytes: usize, params: IndexParams) -> Result<Self> {
        Self::with_backend(item_bytes, params, PopcountBackend::detect())
    }

    /// Constructs an index with explicit parameters and popcount
    /// backend. Fails with [`IndexError::PopcountUnsupported`] when the
    /// backend cannot run on the current CPU.
    pub fn with_backend(
        item_bytes: usize,
        params: IndexParams,
        backend: PopcountBackend,
    ) -> Result<Self> {
        if item_bytes == 0 {
            return Err(IndexError::BadParameter("item length must be nonzero"));
        }
        if params.bucket_page_size == 0 {
            return Err(IndexError::BadParameter("bucket page size must be nonzero"));
        }
        if params.hash_table_size == 0 {
            return Err(IndexError::BadParameter("hash table size must be nonzero"));
        }
        if params.blob_page_size == 0 {
            return Err(IndexError::BadParameter("blob page size must be nonzero"));
        }
        if !(0.0..=1.0).contains(&params.brute_force_bound) {
            return Err(IndexError::BadParameter(
                "brute-force bound must lie in [0, 1]",
            ));
        }
        if item_bytes % ITEM_SIZE_ALIGNMENT != 0 {
            return Err(IndexError::BadAlignment(item_bytes));
        }
        if !backend.is_supported() {
            return Err(IndexError::PopcountUnsupported(backend));
        }

        let words_per_item = item_bytes / WORD_BYTES;
        let buckets = (0..words_per_item * NUM_WORD_VALUES)
            .map(|_| PagedBucket::new(params.bucket_page_size))
            .collect();
        let key_table = ChainedKeyTable::new(params.hash_table_size, params.blob_page_size)?;
        let items = PagedBlobStore::new(item_bytes, params.blob_page_size)?;
        let masks = build_mask_table(backend);

        debug!(item_bytes, words_per_item, ?backend, "multi-index created");

        Ok(Self {
            item_bytes,
            words_per_item,
            brute_force_bound: params.brute_force_bound,
            backend,
            buckets,
            key_table,
            items,
            masks,
        })
    }

    /// Number of bytes in every stored item.
    pub fn item_bytes(&self) -> usize {
        self.item_bytes
    }

    /// Popcount backend selected at construction.
    pub fn backend(&self) -> PopcountBackend {
        self.backend
    }

    /// Number of items in the index.
    pub fn len(&self) -> u32 {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains_key(&self, key: u32) -> bool {
        self.key_table.contains_key(key)
    }

    /// Removes all items. Ordinal assignment restarts at zero.
    pub fn clear(&mut self) {
        for bucket in &mut self.buckets {
            bucket.clear();
        }
        self.key_table.clear();
        self.items.clear();
        debug!("index cleared");
    }

    /// Adds one item under `key`.
    ///
    /// Fails with [`IndexError::DuplicateKey`] when `key` is already
    /// present, in which case the index is left unchanged: the key
    /// table insert is the only fallible step and runs before any
    /// bucket or storage append.
    ///
    /// # Panics
    ///
    /// Panics if `item` is not exactly `item_bytes` long.
    pub fn add_item(&mut self, key: u32, item: &[u8]) -> Result<()> {
        assert_eq!(item.len(), self.item_bytes, "item length mismatch");

        self.key_table.insert(key)?;
        for position in 0..self.words_per_item {
            let word = word_at(item, position) as usize;
            self.buckets[position * NUM_WORD_VALUES + word].push(key);
        }
        self.items.push(item);
        Ok(())
    }

    /// Adds a batch of items and returns how many were truly added.
    /// Duplicate keys are skipped; the remaining items still insert.
    pub fn add_many<I: AsRef<[u8]>>(&mut self, keys: &[u32], items: &[I]) -> u32 {
        assert_eq!(keys.len(), items.len(), "keys and items length mismatch");

        let mut added = 0;
        for (&key, item) in keys.iter().zip(items) {
            match self.add_item(key, item.as_ref()) {
                Ok(()) => added += 1,
                Err(err) => debug!(key, %err, "item rejected"),
            }
        }
        added
    }

    /// Finds every item within normalized Hamming distance `range` of
    /// `query` by scanning the whole store. Returns `(key, distance)`
    /// pairs sorted by ascending distance, ties by ascending key.
    pub fn range_query_bruteforce(&self, query: &[u8], range: f32) -> Result<Vec<(u32, f32)>> {
        let mut results = Vec::new();
        self.range_query_bruteforce_with_buf(query, range, &mut results)?;
        Ok(results)
    }

    /// Same as [`MultiIndex::range_query_bruteforce`], reusing the
    /// caller's result buffer.
    pub fn range_query_bruteforce_with_buf(
        &self,
        query: &[u8],
        range: f32,
        results: &mut Vec<(u32, f32)>,
    ) -> Result<()> {
        assert_eq!(query.len(), self.item_bytes, "query length mismatch");

        results.clear();
        if !(0.0..=1.0).contains(&range) {
            return Err(IndexError::BadRange(range));
        }

        debug_assert_eq!(self.items.len(), self.key_table.len());
        for ordinal in 0..self.items.len() {
            let bits = distance::hamming_bits(query, self.items.get(ordinal), self.backend);
            let dist = distance::normalized(bits, self.item_bytes);
            if dist <= range {
                results.push((self.key_table.key_at(ordinal), dist));
            }
        }
        sort_results(results);
        Ok(())
    }

    /// Finds every item within normalized Hamming distance `range` of
    /// `query` through the multi-index. Exact: returns the same
    /// results as the brute-force scan, in the same order.
    pub fn range_query_optimized(&self, query: &[u8], range: f32) -> Result<Vec<(u32, f32)>> {
        let mut results = Vec::new();
        self.range_query_optimized_with_buf(query, range, &mut results)?;
        Ok(results)
    }

    /// Same as [`MultiIndex::range_query_optimized`], reusing the
    /// caller's result buffer.
    pub fn range_query_optimized_with_buf(
        &self,
        query: &[u8],
        range: f32,
        results: &mut Vec<(u32, f32)>,
    ) -> Result<()> {
        // Above the bound the candidate set approaches the whole
        // corpus and the linear scan wins: no deduplication, no key
        // lookups.
        if range > self.brute_force_bound {
            trace!(
                range,
                bound = self.brute_force_bound,
                "falling back to linear scan"
            );
            return self.range_query_bruteforce_with_buf(query, range, results);
        }

        assert_eq!(query.len(), self.item_bytes, "query length mismatch");

        results.clear();
        if !(0.0..=1.0).contains(&range) {
            return Err(IndexError::BadRange(range));
        }

        // Pigeonhole bound: an item within `range` differs from the
        // query by at most floor(range * 16) bits in at least one
        // 16-bit word, so probing every mask up to that popcount per
        // word position yields a superset of all true answers.
        let budget = (range * WORD_BITS as f32) as u16;

        let mut candidates = Vec::new();
        for position in 0..self.words_per_item {
            let query_word = word_at(query, position);
            let base = position * NUM_WORD_VALUES;
            for &(mask, bits) in &self.masks {
                if bits > budget {
                    break;
                }
                self.buckets[base + (query_word ^ mask) as usize].collect_into(&mut candidates);
            }
        }
        if candidates.is_empty() {
            return Ok(());
        }

        candidates.sort_unstable();
        candidates.dedup();

        for &key in &candidates {
            let ordinal = self.key_table.lookup(key);
            debug_assert_ne!(ordinal, SENTINEL);
            let bits = distance::hamming_bits(query, self.items.get(ordinal), self.backend);
            let dist = distance::normalized(bits, self.item_bytes);
            if dist <= range {
                results.push((key, dist));
            }
        }
        sort_results(results);
        Ok(())
    }

    /// Heap bytes held by the index: bucket directory and pages, key
    /// table, item store, and the mask table.
    pub fn allocated_bytes(&self) -> u64 {
        let mut total = mem::size_of::<Self>() as u64;
        for bucket in &self.buckets {
            total += bucket.allocated_bytes();
        }
        total += self.key_table.allocated_bytes();
        total += self.items.allocated_bytes();
        total += (self.masks.capacity() * mem::size_of::<(u16, u16)>()) as u64;
        total
    }
}

#[inline]
fn word_at(item: &[u8], position: usize) -> u16 {
    u16::from_le_bytes([item[WORD_BYTES * position], item[WORD_BYTES * position + 1]])
}

fn sort_results(results: &mut [(u32, f32)]) {
    results.sort_unstable_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));
}
