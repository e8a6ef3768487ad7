use sha3::{Digest, Keccak256};

/// Fixed leaf width: claimant(32) || amount_le(8) || claimed(1).
pub const LEAF_LEN: usize = 41;

/// Keccak-256 over the concatenation of `vals`.
pub fn hashv(vals: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    for val in vals {
        hasher.update(val);
    }
    hasher.finalize().into()
}

/// Serialize one entitlement record into its fixed-width leaf form. Pure and
/// total; the amount is little-endian on the wire.
pub fn encode_leaf(claimant: &[u8; 32], amount: u64, claimed: bool) -> [u8; LEAF_LEN] {
    let mut leaf = [0u8; LEAF_LEN];
    leaf[..32].copy_from_slice(claimant);
    leaf[32..40].copy_from_slice(&amount.to_le_bytes());
    leaf[40] = claimed as u8;
    leaf
}

/// Leaf hash in the canonical pre-claim form (claimed = false). Claims are
/// always checked against this encoding; payout status lives in the on-chain
/// claim bitmap, never in the committed leaf.
pub fn hash_leaf(claimant: &[u8; 32], amount: u64) -> [u8; 32] {
    hashv(&[&encode_leaf(claimant, amount, false)])
}
