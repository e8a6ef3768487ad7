use crate::leaf::hashv;

/// Recompute the root from raw leaf bytes plus the concatenated 32-byte
/// sibling hashes in `proof`, and compare against `root`.
///
/// The operand side at each level comes from the index bits: an even index
/// puts the running hash on the left, odd on the right. The proof must
/// consume the index entirely (an index wider than the tree depth never
/// verifies), which also rejects a valid sibling path replayed under an
/// aliased index.
pub fn verify_proof(leaf: &[u8], proof: &[u8], index: u64, root: &[u8; 32]) -> bool {
    if proof.len() % 32 != 0 {
        return false;
    }
    let mut computed = hashv(&[leaf]);
    let mut idx = index;
    for sibling in proof.chunks_exact(32) {
        computed = if idx & 1 == 0 {
            hashv(&[&computed, sibling])
        } else {
            hashv(&[sibling, &computed])
        };
        idx >>= 1;
    }
    idx == 0 && computed.eq(root)
}
