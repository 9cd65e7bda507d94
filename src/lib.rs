//! # hmi-rs
//!
//! Multi-index for exact range searches over fixed-length binary
//! vectors in Hamming space, built for corpora of binary local feature
//! descriptors (BRIEF, BRISK, FREAK) reaching 10^8 items on a single
//! machine.
//!
//! ## Features
//! - **Exact range queries:** [`MultiIndex::range_query_optimized`]
//!   returns every indexed vector within a normalized Hamming radius of
//!   the query, with 100% recall by a pigeonhole argument over 16-bit
//!   substrings; [`MultiIndex::range_query_bruteforce`] is the linear
//!   scan it falls back to at large radii.
//! - **Compact paged storage:** buckets, vectors, and the key table all
//!   live in page-granular allocations, keeping per-item overhead near
//!   108 bytes for 32-byte vectors.
//! - **Append-only:** items are added one at a time and never removed
//!   or modified; [`MultiIndex::clear`] resets the whole index.
//!
//! ## Example
//!
//! ```rust
//! use hmi_rs::{IndexParams, MultiIndex};
//!
//! fn main() -> hmi_rs::Result<()> {
//!     // Shrink the key directory below its 10^8-item default.
//!     let params = IndexParams {
//!         hash_table_size: 1 << 16,
//!         ..IndexParams::default()
//!     };
//!     let mut index = MultiIndex::with_params(8, params)?;
//!
//!     index.add_item(7, &[0x00; 8])?;
//!     index.add_item(8, &[0xFF; 8])?;
//!
//!     // Vectors within 10% of the query, closest first.
//!     let neighbors = index.range_query_optimized(&[0x00; 8], 0.1)?;
//!     assert_eq!(neighbors, vec![(7, 0.0)]);
//!     Ok(())
//! }
//! ```
pub mod distance;
pub mod error;
pub mod index;
pub mod ls;
pub mod popcnt;
pub mod utils;

pub use error::{IndexError, Result};
pub use index::{IndexParams, MultiIndex};
pub use popcnt::PopcountBackend;
