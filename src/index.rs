mod bucket;
mod keytable;
mod masks;
mod ops;
mod store;

use crate::popcnt::PopcountBackend;
use bucket::PagedBucket;
use keytable::ChainedKeyTable;
use store::PagedBlobStore;

/// Item bytes are split into 16-bit words, so a vector of L bytes
/// spans L/2 bucket positions.
pub(crate) const WORD_BYTES: usize = 2;

/// Number of bits in one word.
pub(crate) const WORD_BITS: usize = 16;

/// Number of possible values of a 16-bit word; buckets per position.
pub(crate) const NUM_WORD_VALUES: usize = 1 << WORD_BITS;

/// Item byte length must be divisible by this to use the 64-bit
/// popcount kernel.
pub(crate) const ITEM_SIZE_ALIGNMENT: usize = 8;

/// Default number of key slots per bucket page.
pub const DEFAULT_BUCKET_PAGE_SIZE: u32 = 128;

/// Default number of chain heads in the key table directory. Sized for
/// corpora around 10^8 items; shrink it for smaller datasets.
pub const DEFAULT_HASH_TABLE_SIZE: u32 = 100_000_000;

/// Default number of records per storage page.
pub const DEFAULT_BLOB_PAGE_SIZE: u32 = 100_000;

/// Default radius above which a linear scan beats the multi-index.
pub const DEFAULT_BRUTE_FORCE_BOUND: f32 = 0.25;

/// Construction parameters of a [`MultiIndex`].
///
/// The item byte length is passed separately: it is a structural
/// property of the index, not a tuning knob.
#[derive(Debug, Clone)]
pub struct IndexParams {
    /// Key slots per page inside each bucket. Larger pages mean fewer
    /// allocations but more slack on partially filled pages.
    pub bucket_page_size: u32,
    /// Number of chain heads in the key table. More heads mean shorter
    /// chains at the cost of a larger fixed directory.
    pub hash_table_size: u32,
    /// Records per page in the item store and the key chain store.
    pub blob_page_size: u32,
    /// Radius threshold above which queries fall back to a linear
    /// scan. Must lie in [0, 1].
    pub brute_force_bound: f32,
}

impl Default for IndexParams {
    fn default() -> Self {
        Self {
            bucket_page_size: DEFAULT_BUCKET_PAGE_SIZE,
            hash_table_size: DEFAULT_HASH_TABLE_SIZE,
            blob_page_size: DEFAULT_BLOB_PAGE_SIZE,
            brute_force_bound: DEFAULT_BRUTE_FORCE_BOUND,
        }
    }
}

/// Spatial index for fixed-length binary vectors in Hamming space.
///
/// Supports appending items keyed by caller-supplied `u32` keys and
/// exact range queries returning `(key, normalized distance)` pairs.
/// Items cannot be removed or modified; [`MultiIndex::clear`] is the
/// only way to shrink. Single-writer by contract: the index performs no
/// internal synchronization, so embedders sharing one instance across
/// threads must serialize every operation externally.
pub struct MultiIndex {
    item_bytes: usize,
    words_per_item: usize,
    brute_force_bound: f32,
    backend: PopcountBackend,
    /// One bucket per (word position, word value) cell; cell (i, w)
    /// lives at `i * NUM_WORD_VALUES + w`.
    buckets: Vec<PagedBucket>,
    key_table: ChainedKeyTable,
    items: PagedBlobStore,
    /// Every 16-bit mask paired with its popcount, stably sorted by
    /// popcount ascending.
    masks: Vec<(u16, u16)>,
}
