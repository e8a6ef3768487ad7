use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::MerkleTreeError;

/// One row of the entitlement list: a hex-encoded 32-byte claimant address
/// and a UI amount (scaled to native units when converted to a TreeNode).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CsvEntry {
    pub claimant: String,
    pub amount: u64,
}

impl CsvEntry {
    pub fn new_from_file(path: &PathBuf) -> Result<Vec<Self>, MerkleTreeError> {
        let mut reader = csv::Reader::from_path(path)?;
        let mut entries = Vec::new();
        for result in reader.deserialize() {
            let record: CsvEntry = result?;
            entries.push(record);
        }
        Ok(entries)
    }

    pub fn claimant_bytes(&self) -> Result<[u8; 32], MerkleTreeError> {
        let hex_str = self.claimant.strip_prefix("0x").unwrap_or(&self.claimant);
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(hex_str, &mut bytes).map_err(|e| {
            MerkleTreeError::MerkleValidationError(format!(
                "invalid claimant address {:?}: {e}",
                self.claimant
            ))
        })?;
        Ok(bytes)
    }
}
