use serde::{Deserialize, Serialize};

use crate::error::MerkleTreeError;
use crate::leaf::hashv;

/// Balanced binary Keccak-256 hash tree over an ordered leaf-hash sequence.
///
/// Pairing rule, which [crate::verify::verify_proof] mirrors exactly: nodes
/// are combined pairwise left-to-right at every level, and an unpaired node
/// at the end of an odd level is paired with itself.
#[derive(Debug, Clone)]
pub struct MerkleTree {
    levels: Vec<Vec<[u8; 32]>>,
}

impl MerkleTree {
    pub fn new(leaves: Vec<[u8; 32]>) -> Result<Self, MerkleTreeError> {
        if leaves.is_empty() {
            return Err(MerkleTreeError::EmptyInput);
        }
        let mut levels = vec![leaves];
        let mut level = levels[0].clone();
        while level.len() > 1 {
            let mut next = Vec::with_capacity(level.len().div_ceil(2));
            for pair in level.chunks(2) {
                let left = pair[0];
                let right = if pair.len() == 2 { pair[1] } else { left };
                next.push(hashv(&[&left, &right]));
            }
            levels.push(next.clone());
            level = next;
        }
        Ok(Self { levels })
    }

    pub fn root(&self) -> [u8; 32] {
        // a tree always has at least the leaf level, and the top level holds
        // exactly one node
        self.levels[self.levels.len() - 1][0]
    }

    pub fn leaf_count(&self) -> usize {
        self.levels[0].len()
    }

    /// Sibling hash at every level from leaf to root. The operand side is
    /// not stored per element; it is carried by the bits of the leaf index.
    pub fn proof(&self, index: usize) -> Result<MerkleProof, MerkleTreeError> {
        if index >= self.leaf_count() {
            return Err(MerkleTreeError::IndexOutOfRange);
        }
        let mut siblings = Vec::with_capacity(self.levels.len() - 1);
        let mut idx = index;
        for level in &self.levels[..self.levels.len() - 1] {
            let sibling = idx ^ 1;
            // an unpaired node was hashed against itself
            siblings.push(if sibling < level.len() {
                level[sibling]
            } else {
                level[idx]
            });
            idx >>= 1;
        }
        Ok(MerkleProof {
            index: index as u64,
            siblings,
        })
    }
}

/// Inclusion proof for one leaf: the ordered sibling path, leaf level first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerkleProof {
    /// Leaf index the proof was derived for.
    pub index: u64,
    /// Sibling hashes, one per tree level below the root.
    pub siblings: Vec<[u8; 32]>,
}

impl MerkleProof {
    /// Wire form consumed by the claim instruction: concatenated siblings.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.siblings.len() * 32);
        for sibling in &self.siblings {
            out.extend_from_slice(sibling);
        }
        out
    }

    pub fn from_bytes(index: u64, data: &[u8]) -> Option<Self> {
        if data.len() % 32 != 0 {
            return None;
        }
        let siblings = data
            .chunks_exact(32)
            .map(|chunk| chunk.try_into().unwrap())
            .collect();
        Some(Self { index, siblings })
    }
}
