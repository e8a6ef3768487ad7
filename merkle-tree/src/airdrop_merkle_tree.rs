use serde::{Deserialize, Serialize};
use std::{
    collections::{HashMap, HashSet},
    path::PathBuf,
    result,
};

use crate::{
    csv_entry::CsvEntry,
    error::{MerkleTreeError, MerkleTreeError::MerkleValidationError},
    leaf::encode_leaf,
    merkle_tree::{MerkleProof, MerkleTree},
    tree_node::TreeNode,
    verify::verify_proof,
};

/// Helper function to compute the total committed entitlement
fn get_max_total_claim(tree_nodes: &[TreeNode]) -> Result<u64> {
    tree_nodes.iter().try_fold(0u64, |acc, node| {
        acc.checked_add(node.amount)
            .ok_or(MerkleTreeError::ArithmeticError)
    })
}

/// Merkle Tree which will be used to distribute tokens to claimants.
/// Contains all the information necessary to verify claims against it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AirdropMerkleTree {
    /// The merkle root, which is uploaded on-chain
    pub merkle_root: [u8; 32],
    pub max_num_nodes: u64,
    pub max_total_claim: u64,
    pub tree_nodes: Vec<TreeNode>,
}

pub type Result<T> = result::Result<T, MerkleTreeError>;

impl AirdropMerkleTree {
    pub fn new(tree_nodes: Vec<TreeNode>) -> Result<Self> {
        // Combine tree nodes with the same claimant: exactly one record per
        // unique address per tree snapshot
        let mut tree_nodes_map: HashMap<[u8; 32], TreeNode> = HashMap::new();
        for tree_node in tree_nodes {
            match tree_nodes_map.get_mut(&tree_node.claimant) {
                Some(existing_node) => {
                    existing_node.amount = existing_node
                        .amount
                        .checked_add(tree_node.amount)
                        .ok_or(MerkleTreeError::ArithmeticError)?;
                }
                None => {
                    tree_nodes_map.insert(tree_node.claimant, tree_node);
                }
            }
        }

        // Convert HashMap back to Vec (order may change but that's fine; the
        // leaf index is assigned here and travels with the proof)
        let mut tree_nodes: Vec<TreeNode> = tree_nodes_map.values().cloned().collect();

        let leaf_hashes: Vec<[u8; 32]> = tree_nodes.iter().map(|node| node.hash()).collect();
        let merkle_tree = MerkleTree::new(leaf_hashes)?;
        let merkle_root = merkle_tree.root();

        // Generate proofs for each tree node and store them
        for (i, tree_node) in tree_nodes.iter_mut().enumerate() {
            tree_node.proof = Some(merkle_tree.proof(i)?);
        }

        let max_total_claim = get_max_total_claim(tree_nodes.as_ref())?;
        let tree = AirdropMerkleTree {
            merkle_root,
            max_num_nodes: tree_nodes.len() as u64,
            max_total_claim,
            tree_nodes,
        };

        println!(
            "Built Merkle tree with {} nodes. Max total claim: {}",
            tree.max_num_nodes, tree.max_total_claim
        );
        tree.validate()?;
        Ok(tree)
    }

    /// Load a merkle tree from a csv path
    pub fn new_from_csv(path: &PathBuf) -> Result<Self> {
        let csv_entries = CsvEntry::new_from_file(path)?;
        let tree_nodes: Vec<TreeNode> = csv_entries
            .into_iter()
            .map(TreeNode::try_from)
            .collect::<Result<_>>()?;
        let tree = Self::new(tree_nodes)?;
        Ok(tree)
    }

    pub fn get_node(&self, claimant: &[u8; 32]) -> Option<&TreeNode> {
        self.tree_nodes
            .iter()
            .find(|node| node.claimant == *claimant)
    }

    pub fn get_proof(&self, claimant: &[u8; 32]) -> Result<MerkleProof> {
        let node = self
            .get_node(claimant)
            .ok_or_else(|| MerkleValidationError("Claimant not found".to_string()))?;

        node.proof
            .clone()
            .ok_or_else(|| MerkleValidationError("Proof not found for claimant".to_string()))
    }

    fn validate(&self) -> Result<()> {
        // Leaf indices must stay addressable by the on-chain bitmap; cap the
        // node count at 2^32 - 1
        if self.max_num_nodes > 2u64.pow(32) - 1 {
            return Err(MerkleValidationError("Merkle tree too large".to_string()));
        }

        // validate that the length is equal to the max_num_nodes
        if self.tree_nodes.len() != self.max_num_nodes as usize {
            return Err(MerkleValidationError(
                "Tree nodes length does not equal max_num_nodes".to_string(),
            ));
        }

        // validate that there are no duplicate claimants
        let unique_nodes: HashSet<_> = self.tree_nodes.iter().map(|n| n.claimant).collect();
        if unique_nodes.len() != self.tree_nodes.len() {
            return Err(MerkleValidationError(
                "Duplicate claimants found".to_string(),
            ));
        }

        Ok(())
    }

    /// Check every stored proof through the same verifier the claim handler
    /// runs on-chain.
    pub fn verify_proofs(&self) -> Result<()> {
        for node in &self.tree_nodes {
            let proof = self.get_proof(&node.claimant)?;
            let leaf = encode_leaf(&node.claimant, node.amount, false);
            if !verify_proof(&leaf, &proof.to_bytes(), proof.index, &self.merkle_root) {
                return Err(MerkleValidationError(format!(
                    "Invalid proof for claimant: {:?}",
                    node.claimant
                )));
            }
        }
        Ok(())
    }

    // Converts the tree to a map for faster key access
    pub fn convert_to_hashmap(&self) -> HashMap<[u8; 32], TreeNode> {
        self.tree_nodes
            .iter()
            .map(|node| (node.claimant, node.clone()))
            .collect()
    }
}
