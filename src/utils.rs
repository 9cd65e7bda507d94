use rand::{thread_rng, Rng};

/// Generate random binary vectors of `item_bytes` bytes each.
pub fn gen_random_vectors(count: usize, item_bytes: usize) -> Vec<Vec<u8>> {
    let mut rng = thread_rng();
    let mut vectors = Vec::with_capacity(count);
    for _ in 0..count {
        let mut v = vec![0u8; item_bytes];
        rng.fill(&mut v[..]);
        vectors.push(v);
    }
    vectors
}
