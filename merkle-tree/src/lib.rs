#![cfg_attr(not(feature = "std"), no_std)]

pub mod leaf;
pub mod verify;

#[cfg(feature = "std")]
mod airdrop_merkle_tree;
#[cfg(feature = "std")]
mod csv_entry;
#[cfg(feature = "std")]
mod error;
#[cfg(feature = "std")]
mod merkle_tree;
#[cfg(feature = "std")]
mod tree_node;

// Re-export main types
#[cfg(feature = "std")]
pub use airdrop_merkle_tree::AirdropMerkleTree;
#[cfg(feature = "std")]
pub use csv_entry::CsvEntry;
#[cfg(feature = "std")]
pub use error::MerkleTreeError;
#[cfg(feature = "std")]
pub use merkle_tree::{MerkleProof, MerkleTree};
#[cfg(feature = "std")]
pub use tree_node::TreeNode;

pub use leaf::{encode_leaf, hash_leaf, hashv, LEAF_LEN};
pub use verify::verify_proof;
