use serde::{Deserialize, Serialize};

use crate::csv_entry::CsvEntry;
use crate::error::MerkleTreeError;
use crate::leaf::hash_leaf;
use crate::merkle_tree::MerkleProof;

pub const MINT_DECIMALS: u32 = 9;

/// Represents the claim information for an account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeNode {
    /// Pubkey of the claimant; will be responsible for signing the claim
    pub claimant: [u8; 32],
    /// Claimant's proof of inclusion in the Merkle Tree
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proof: Option<MerkleProof>,
    /// Entitlement in native token units
    pub amount: u64,
}

impl TreeNode {
    /// Canonical pre-claim leaf hash for this entitlement.
    pub fn hash(&self) -> [u8; 32] {
        hash_leaf(&self.claimant, self.amount)
    }
}

/// Converts a ui amount to a token amount (with decimals). Fails fast on
/// anything that would not fit in 64 bits rather than silently truncating.
fn ui_amount_to_token_amount(amount: u64) -> Result<u64, MerkleTreeError> {
    amount
        .checked_mul(10u64.pow(MINT_DECIMALS))
        .ok_or(MerkleTreeError::ArithmeticError)
}

impl TryFrom<CsvEntry> for TreeNode {
    type Error = MerkleTreeError;

    fn try_from(entry: CsvEntry) -> Result<Self, Self::Error> {
        let claimant = entry.claimant_bytes()?;
        // CSV entries carry UI amounts; convert to native amounts here
        let amount = ui_amount_to_token_amount(entry.amount)?;
        Ok(Self {
            claimant,
            proof: None,
            amount,
        })
    }
}
